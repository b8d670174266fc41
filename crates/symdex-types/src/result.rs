use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of indexing one symbol package.
///
/// These three values are the only thing callers of the indexing service
/// observe. Internal failure detail goes to the log, never to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationResult {
    /// The upload cannot be accepted: corrupt archive, disallowed entry,
    /// unparseable debug-symbol file, or a storage failure.
    InvalidSymbolPackage,
    /// The archive is well-formed but no published package matches the
    /// identifier and version its manifest declares.
    PackageNotFound,
    /// Every debug-symbol file was extracted and persisted.
    Success,
}

impl ValidationResult {
    /// Returns `true` for [`ValidationResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSymbolPackage => write!(f, "InvalidSymbolPackage"),
            Self::PackageNotFound => write!(f, "PackageNotFound"),
            Self::Success => write!(f, "Success"),
        }
    }
}
