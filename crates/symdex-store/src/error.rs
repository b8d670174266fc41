use symdex_types::{Cancelled, CopyError};

/// Errors from symbol store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A filename or key cannot be used as a single path component.
    #[error("unsafe {kind} path component: {value:?}")]
    UnsafeComponent { kind: &'static str, value: String },

    /// The write was cancelled before it completed.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    /// A blocking storage task failed to run to completion.
    #[error("storage task failed: {0}")]
    Task(String),

    /// Storage backend is read-only or otherwise unavailable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<CopyError> for StoreError {
    fn from(err: CopyError) -> Self {
        match err {
            CopyError::Io(e) => StoreError::Io(e),
            CopyError::Cancelled(c) => StoreError::Cancelled(c),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
