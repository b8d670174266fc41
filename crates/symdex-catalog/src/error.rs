use symdex_types::TypeError;

/// Errors from package catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// I/O error while loading a catalog file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog document is not valid JSON.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A catalog record declares an unusable identifier or version.
    #[error("invalid catalog record {index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: TypeError,
    },

    /// The catalog backend cannot answer right now.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
