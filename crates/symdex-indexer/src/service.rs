use std::io::{Read, Seek};
use std::sync::Arc;

use symdex_archive::{ArchiveEntry, PackageArchive, SymbolPackage};
use symdex_catalog::PackageCatalog;
use symdex_store::{StoreError, SymbolStore};
use symdex_types::{CancellationToken, Cancelled, PackageIdentity, ValidationResult};
use tracing::{debug, field, info, info_span, warn, Instrument, Span};

use crate::allowlist::check_entries;
use crate::config::IndexerConfig;
use crate::error::{ExtractError, IndexError, IndexResult};
use crate::extractor::{DebugSymbolExtractor, SymbolArtifact};
use crate::scratch::ScratchSpace;
use crate::staging::StagingBatch;

enum Outcome {
    NotFound(PackageIdentity),
    Indexed {
        identity: PackageIdentity,
        persisted: usize,
    },
}

/// Validates symbol packages and persists the debug-symbol files they carry.
///
/// A call either persists every `.pdb` entry of an accepted package or none
/// of them. The service keeps no per-call state, so one instance can serve
/// concurrent uploads.
pub struct SymbolIndexingService {
    catalog: Arc<dyn PackageCatalog>,
    store: Arc<dyn SymbolStore>,
    extractor: DebugSymbolExtractor,
}

impl SymbolIndexingService {
    pub fn new(
        catalog: Arc<dyn PackageCatalog>,
        store: Arc<dyn SymbolStore>,
        config: IndexerConfig,
    ) -> Self {
        let scratch = ScratchSpace::new(config.scratch_spool_threshold);
        Self {
            catalog,
            store,
            extractor: DebugSymbolExtractor::new(scratch, config.copy_chunk_size),
        }
    }

    /// Scratch storage used for extraction.
    pub fn scratch(&self) -> &ScratchSpace {
        self.extractor.scratch()
    }

    /// Index one symbol package read from `stream`.
    ///
    /// The stream stays owned by the caller. Every failure other than
    /// cancellation is logged and reported as
    /// [`ValidationResult::InvalidSymbolPackage`].
    pub async fn index<R>(
        &self,
        stream: &mut R,
        cancel: &CancellationToken,
    ) -> Result<ValidationResult, Cancelled>
    where
        R: Read + Seek + Send,
    {
        let span = info_span!(
            "index_symbol_package",
            package_id = field::Empty,
            package_version = field::Empty
        );
        let run_span = span.clone();
        async move {
            match self.run(stream, cancel, &run_span).await {
                Ok(Outcome::Indexed {
                    identity,
                    persisted,
                }) => {
                    info!(package = %identity, persisted, "symbol package indexed");
                    Ok(ValidationResult::Success)
                }
                Ok(Outcome::NotFound(identity)) => {
                    warn!(package = %identity, "no published package matches symbol package");
                    Ok(ValidationResult::PackageNotFound)
                }
                Err(IndexError::Cancelled) => {
                    info!("symbol package indexing cancelled");
                    Err(Cancelled)
                }
                Err(error) => {
                    warn!(%error, "rejected symbol package");
                    Ok(ValidationResult::InvalidSymbolPackage)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run<R>(
        &self,
        stream: &mut R,
        cancel: &CancellationToken,
        span: &Span,
    ) -> IndexResult<Outcome>
    where
        R: Read + Seek + Send,
    {
        cancel.check()?;
        let mut package = SymbolPackage::open(stream).map_err(IndexError::Archive)?;
        let entries = package.validate_entries().map_err(IndexError::Archive)?;
        check_entries(&entries)?;

        cancel.check()?;
        let identity = package.manifest().map_err(IndexError::Manifest)?;
        span.record("package_id", identity.id.as_str());
        span.record("package_version", field::display(&identity.version));

        cancel.check()?;
        if self.catalog.find(&identity, true).await?.is_none() {
            return Ok(Outcome::NotFound(identity));
        }

        let candidates: Vec<&ArchiveEntry> =
            entries.iter().filter(|e| e.is_symbol_file()).collect();
        debug!(candidates = candidates.len(), "extracting debug-symbol files");

        let batch = self.extract_all(&mut package, &candidates, cancel)?;
        drop(package);

        let persisted = self.persist_all(batch, cancel).await?;
        Ok(Outcome::Indexed {
            identity,
            persisted,
        })
    }

    fn extract_all<A>(
        &self,
        archive: &mut A,
        candidates: &[&ArchiveEntry],
        cancel: &CancellationToken,
    ) -> IndexResult<StagingBatch>
    where
        A: PackageArchive + ?Sized,
    {
        let mut batch = StagingBatch::new();
        for entry in candidates {
            cancel.check()?;
            let artifact = self
                .extractor
                .extract(&mut *archive, &entry.path, cancel)
                .map_err(|source| match source {
                    ExtractError::Cancelled(_) => IndexError::Cancelled,
                    source => IndexError::Extraction {
                        path: entry.path.clone(),
                        source,
                    },
                })?;
            batch.push(artifact);
        }
        Ok(batch)
    }

    async fn persist_all(
        &self,
        mut batch: StagingBatch,
        cancel: &CancellationToken,
    ) -> IndexResult<usize> {
        let mut persisted = 0;
        while let Some(artifact) = batch.next_for_commit() {
            cancel.check()?;
            let SymbolArtifact {
                filename,
                key,
                content,
                ..
            } = artifact;
            self.store
                .save(&filename, &key, Box::new(content), cancel)
                .await
                .map_err(|source| match source {
                    StoreError::Cancelled(_) => IndexError::Cancelled,
                    source => IndexError::Persist {
                        filename: filename.clone(),
                        source,
                    },
                })?;
            debug!(%filename, %key, "persisted debug-symbol file");
            persisted += 1;
        }
        Ok(persisted)
    }
}

impl std::fmt::Debug for SymbolIndexingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolIndexingService")
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}
