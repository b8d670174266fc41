use symdex_archive::ArchiveError;
use symdex_catalog::CatalogError;
use symdex_pdb::PdbError;
use symdex_store::StoreError;
use symdex_types::{Cancelled, CopyError};

/// Why one debug-symbol entry could not be extracted.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The entry could not be opened or decompressed.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// The entry is not a readable portable PDB.
    #[error("debug-symbol header: {0}")]
    Pdb(#[from] PdbError),

    /// The entry's base name cannot be stored as a single path component.
    #[error("unsafe debug-symbol filename {0:?}")]
    UnsafeFilename(String),

    /// Copying into scratch storage failed.
    #[error("scratch I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

impl From<CopyError> for ExtractError {
    fn from(err: CopyError) -> Self {
        match err {
            CopyError::Io(e) => ExtractError::Io(e),
            CopyError::Cancelled(c) => ExtractError::Cancelled(c),
        }
    }
}

/// Internal failure of one indexing call.
///
/// Never leaves the service: [`SymbolIndexingService::index`] logs it and
/// collapses it into a [`ValidationResult`](symdex_types::ValidationResult),
/// except for [`IndexError::Cancelled`].
///
/// [`SymbolIndexingService::index`]: crate::service::SymbolIndexingService::index
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The input is not a readable archive or its entry table is corrupt.
    #[error("invalid archive: {0}")]
    Archive(#[source] ArchiveError),

    /// An entry has no name, no extension, or an extension outside the allow-list.
    #[error("disallowed entry {path:?} (extension {extension:?})")]
    DisallowedEntry {
        path: String,
        extension: Option<String>,
    },

    /// The manifest is missing, ambiguous, or malformed.
    #[error("invalid manifest: {0}")]
    Manifest(#[source] ArchiveError),

    /// The package catalog could not answer.
    #[error("catalog lookup failed: {0}")]
    Catalog(#[from] CatalogError),

    /// A debug-symbol entry failed extraction.
    #[error("cannot extract {path}: {source}")]
    Extraction {
        path: String,
        #[source]
        source: ExtractError,
    },

    /// The content store refused an artifact.
    #[error("cannot persist {filename}: {source}")]
    Persist {
        filename: String,
        #[source]
        source: StoreError,
    },

    #[error("indexing cancelled")]
    Cancelled,
}

impl From<Cancelled> for IndexError {
    fn from(_: Cancelled) -> Self {
        IndexError::Cancelled
    }
}

/// Result alias for pipeline steps.
pub type IndexResult<T> = Result<T, IndexError>;
