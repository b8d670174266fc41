use std::fmt;
use std::io::Seek;

use symdex_archive::{file_name_of, PackageArchive};
use symdex_pdb::read_pdb_id;
use symdex_types::{copy_chunked, is_single_component, CancellationToken, SymbolKey};
use tracing::debug;

use crate::error::ExtractError;
use crate::scratch::{ScratchFile, ScratchSpace};

/// A debug-symbol file pulled out of a package, ready to persist.
pub struct SymbolArtifact {
    /// Entry path inside the package.
    pub source_path: String,
    /// Lower-cased base name of the entry.
    pub filename: String,
    pub key: SymbolKey,
    /// Private copy of the entry, positioned at offset 0.
    pub content: ScratchFile,
}

impl fmt::Debug for SymbolArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolArtifact")
            .field("source_path", &self.source_path)
            .field("filename", &self.filename)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Turns one `.pdb` entry into a [`SymbolArtifact`].
#[derive(Clone, Debug)]
pub struct DebugSymbolExtractor {
    scratch: ScratchSpace,
    chunk_size: usize,
}

impl DebugSymbolExtractor {
    pub fn new(scratch: ScratchSpace, chunk_size: usize) -> Self {
        Self {
            scratch,
            chunk_size,
        }
    }

    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }

    /// Copy the entry at `path` into scratch storage and derive its key.
    ///
    /// A base name the store could not hold as one path component fails
    /// before anything is copied. On failure the scratch copy is dropped
    /// before returning.
    pub fn extract<A>(
        &self,
        archive: &mut A,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<SymbolArtifact, ExtractError>
    where
        A: PackageArchive + ?Sized,
    {
        cancel.check()?;
        let filename = normalized_filename(path);
        if !is_single_component(&filename) {
            return Err(ExtractError::UnsafeFilename(filename));
        }

        let mut content = self.scratch.create();
        {
            let mut entry = archive.open_entry(path)?;
            copy_chunked(&mut entry, &mut content, self.chunk_size, cancel)?;
        }

        let id = read_pdb_id(&mut content)?;
        content.rewind()?;

        let artifact = SymbolArtifact {
            source_path: path.to_string(),
            filename,
            key: id.symbol_key(),
            content,
        };
        debug!(
            entry = %artifact.source_path,
            filename = %artifact.filename,
            key = %artifact.key,
            "extracted debug-symbol file"
        );
        Ok(artifact)
    }
}

/// Lower-cased base name of an entry path.
pub fn normalized_filename(path: &str) -> String {
    file_name_of(path).to_lowercase()
}
