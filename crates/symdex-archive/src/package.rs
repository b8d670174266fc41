use std::io::{Read, Seek};

use symdex_types::PackageIdentity;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::entry::ArchiveEntry;
use crate::error::{ArchiveError, ArchiveResult};
use crate::manifest::{parse_nuspec, MAX_MANIFEST_SIZE};

/// Read access to an opened symbol package.
///
/// Implementations own the archive handle for the duration of one indexing
/// call and never write to it.
pub trait PackageArchive {
    /// Verify the integrity of every entry-table record and return the file
    /// entries in table order. Directory records are not included.
    fn validate_entries(&mut self) -> ArchiveResult<Vec<ArchiveEntry>>;

    /// Entry paths in table order.
    fn list_entries(&mut self) -> ArchiveResult<Vec<String>> {
        Ok(self
            .validate_entries()?
            .into_iter()
            .map(|entry| entry.path)
            .collect())
    }

    /// Open the entry at `path` as a decompressing, forward-only stream.
    fn open_entry(&mut self, path: &str) -> ArchiveResult<Box<dyn Read + '_>>;

    /// The package identity declared by the archive's root manifest.
    fn manifest(&mut self) -> ArchiveResult<PackageIdentity>;
}

/// A zip-backed symbol package (`.snupkg`).
///
/// Borrowing or owning the underlying reader is up to the caller: pass
/// `&mut R` to keep the stream after the package is dropped.
pub struct SymbolPackage<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> SymbolPackage<R> {
    /// Open a package by parsing the zip central directory.
    pub fn open(reader: R) -> ArchiveResult<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Number of records in the entry table, directories included.
    pub fn record_count(&self) -> usize {
        self.archive.len()
    }

    /// Consume the package and hand back the underlying reader.
    pub fn into_inner(self) -> R {
        self.archive.into_inner()
    }
}

impl<R: Read + Seek> PackageArchive for SymbolPackage<R> {
    fn validate_entries(&mut self) -> ArchiveResult<Vec<ArchiveEntry>> {
        let mut entries = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            // Raw access checks the local header without decompressing.
            let file = self.archive.by_index_raw(index)?;
            let name = file.name().to_string();
            if file.is_dir() {
                debug!(entry = %name, "skipping directory record");
                continue;
            }
            if file.enclosed_name().is_none() || name.contains('\\') {
                return Err(ArchiveError::UnsafeEntryPath(name));
            }
            entries.push(ArchiveEntry::new(name, file.size()));
        }
        debug!(count = entries.len(), "validated archive entries");
        Ok(entries)
    }

    fn open_entry(&mut self, path: &str) -> ArchiveResult<Box<dyn Read + '_>> {
        match self.archive.by_name(path) {
            Ok(file) => Ok(Box::new(file)),
            Err(ZipError::FileNotFound) => Err(ArchiveError::EntryNotFound(path.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    fn manifest(&mut self) -> ArchiveResult<PackageIdentity> {
        let manifests: Vec<ArchiveEntry> = self
            .validate_entries()?
            .into_iter()
            .filter(ArchiveEntry::is_manifest)
            .collect();

        let manifest = match manifests.as_slice() {
            [] => return Err(ArchiveError::MissingManifest),
            [single] => single,
            many => {
                return Err(ArchiveError::MultipleManifests(
                    many.iter().map(|e| e.path.clone()).collect(),
                ))
            }
        };

        if manifest.size > MAX_MANIFEST_SIZE {
            return Err(ArchiveError::ManifestTooLarge {
                path: manifest.path.clone(),
                size: manifest.size,
                limit: MAX_MANIFEST_SIZE,
            });
        }

        let mut xml = String::new();
        self.open_entry(&manifest.path)?
            .take(MAX_MANIFEST_SIZE)
            .read_to_string(&mut xml)?;
        let identity = parse_nuspec(&xml)?;
        debug!(manifest = %manifest.path, package = %identity, "read package manifest");
        Ok(identity)
    }
}

impl<R: Read + Seek> std::fmt::Debug for SymbolPackage<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolPackage")
            .field("record_count", &self.archive.len())
            .finish()
    }
}
