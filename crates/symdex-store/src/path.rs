use symdex_types::is_single_component;

use crate::error::{StoreError, StoreResult};

/// Reject values that cannot stand as one path component.
pub(crate) fn check_component(kind: &'static str, value: &str) -> StoreResult<()> {
    if !is_single_component(value) {
        return Err(StoreError::UnsafeComponent {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}
