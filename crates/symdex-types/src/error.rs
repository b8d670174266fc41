use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("symbol key must end with '{expected}', got '{actual}'")]
    InvalidKeySuffix { expected: String, actual: String },

    #[error("symbol key must be uppercase hex: {0}")]
    LowercaseKey(String),

    #[error("invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("package identifier must not be empty")]
    EmptyIdentifier,
}
