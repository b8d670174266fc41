//! Symbol package indexing pipeline for symdex.
//!
//! [`SymbolIndexingService`] takes an uploaded symbol package and runs it
//! through validate, extract and persist:
//!
//! 1. Open the archive and check every entry-table record.
//! 2. Reject the package if any entry's extension is outside
//!    [`ALLOWED_EXTENSIONS`].
//! 3. Read the manifest identity and require a matching published package.
//! 4. Copy each `.pdb` entry to scratch storage and derive its
//!    [`SymbolKey`](symdex_types::SymbolKey).
//! 5. Persist the batch only after every entry has extracted cleanly.
//!
//! The call resolves to a [`ValidationResult`](symdex_types::ValidationResult)
//! or to [`Cancelled`](symdex_types::Cancelled).

pub mod allowlist;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scratch;
pub mod service;
pub mod staging;

pub use allowlist::{check_entries, is_allowed, ALLOWED_EXTENSIONS};
pub use config::IndexerConfig;
pub use error::{ExtractError, IndexError, IndexResult};
pub use extractor::{normalized_filename, DebugSymbolExtractor, SymbolArtifact};
pub use scratch::{ScratchFile, ScratchSpace};
pub use service::SymbolIndexingService;
pub use staging::StagingBatch;
