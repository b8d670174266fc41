use std::io::Read;

use async_trait::async_trait;
use symdex_types::{CancellationToken, SymbolKey};

use crate::error::StoreResult;

/// Durable debug-symbol content store.
///
/// Content is addressed by `(filename, key)`. Saving the same pair twice
/// replaces the earlier content, so repeated indexing of one package is
/// idempotent. Implementations read `content` exactly once and must not
/// leave a partially written file visible under the pair.
#[async_trait]
pub trait SymbolStore: Send + Sync {
    /// Persist `content` under `filename` and `key`.
    ///
    /// Returns `Err(StoreError::Cancelled)` if `cancel` fires before the
    /// content is committed.
    async fn save(
        &self,
        filename: &str,
        key: &SymbolKey,
        content: Box<dyn Read + Send>,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;
}
