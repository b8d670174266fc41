use symdex_types::TypeError;

/// Errors from symbol package archive access.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The zip container is malformed or an entry cannot be read.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error while reading entry content.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No entry with this path exists in the archive.
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// An entry path escapes the archive root or is otherwise unusable.
    #[error("unsafe entry path: {0:?}")]
    UnsafeEntryPath(String),

    /// The archive has no `.nuspec` manifest at its root.
    #[error("archive has no root .nuspec manifest")]
    MissingManifest,

    /// The archive has more than one root `.nuspec` manifest.
    #[error("archive has multiple root manifests: {0:?}")]
    MultipleManifests(Vec<String>),

    /// The manifest exceeds the size limit.
    #[error("manifest {path} is {size} bytes, limit is {limit}")]
    ManifestTooLarge { path: String, size: u64, limit: u64 },

    /// The manifest is not well-formed or misses required metadata.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// The manifest declares an unusable identifier or version.
    #[error("invalid package identity: {0}")]
    InvalidIdentity(#[from] TypeError),
}

/// Result alias for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;
