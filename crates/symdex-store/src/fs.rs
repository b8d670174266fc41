use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use symdex_types::{copy_chunked, CancellationToken, SymbolKey, DEFAULT_CHUNK_SIZE};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::path::check_component;
use crate::traits::SymbolStore;

/// Symbol store laid out as a symbol-server directory tree.
///
/// Each file lands at `{root}/{filename}/{key}/{filename}`, the layout
/// debuggers probe with a plain HTTP or file-share symbol path. Writes go to
/// a temporary file in the target directory and are renamed into place, so
/// readers never observe partial content.
#[derive(Clone, Debug)]
pub struct FileSystemSymbolStore {
    root: PathBuf,
    chunk_size: usize,
}

impl FileSystemSymbolStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Override the copy chunk size; cancellation is checked between chunks.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of `filename` under `key`.
    pub fn path_for(&self, filename: &str, key: &SymbolKey) -> StoreResult<PathBuf> {
        check_component("filename", filename)?;
        check_component("key", key.as_str())?;
        Ok(self.root.join(filename).join(key.as_str()).join(filename))
    }

    /// Read stored content back. Returns `Ok(None)` if nothing is stored.
    pub fn read(&self, filename: &str, key: &SymbolKey) -> StoreResult<Option<Vec<u8>>> {
        let path = self.path_for(filename, key)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether content is stored under `filename` and `key`.
    pub fn exists(&self, filename: &str, key: &SymbolKey) -> StoreResult<bool> {
        Ok(self.path_for(filename, key)?.is_file())
    }
}

fn write_atomically(
    dest: &Path,
    content: &mut dyn Read,
    chunk_size: usize,
    cancel: &CancellationToken,
) -> StoreResult<u64> {
    let dir = dest
        .parent()
        .ok_or_else(|| StoreError::Unavailable(format!("no parent for {}", dest.display())))?;
    fs::create_dir_all(dir)?;

    // Dropping the temp file on any early return removes it.
    let mut tmp = NamedTempFile::new_in(dir)?;
    let written = copy_chunked(content, &mut tmp, chunk_size, cancel)?;
    tmp.as_file().sync_all()?;
    cancel.check()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(written)
}

#[async_trait]
impl SymbolStore for FileSystemSymbolStore {
    async fn save(
        &self,
        filename: &str,
        key: &SymbolKey,
        mut content: Box<dyn Read + Send>,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        let dest = self.path_for(filename, key)?;
        cancel.check()?;

        let chunk_size = self.chunk_size;
        let token = cancel.clone();
        let task_dest = dest.clone();
        let written = tokio::task::spawn_blocking(move || {
            write_atomically(&task_dest, &mut *content, chunk_size, &token)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))??;

        debug!(path = %dest.display(), bytes = written, "stored symbol file");
        Ok(())
    }
}
