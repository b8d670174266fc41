use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::SpooledTempFile;

/// Allocator of private, seekable scratch files.
///
/// Clones share one live counter, which drops back to zero once every
/// handed-out [`ScratchFile`] has been released.
#[derive(Clone)]
pub struct ScratchSpace {
    spool_threshold: usize,
    live: Arc<AtomicUsize>,
}

impl ScratchSpace {
    /// Scratch files stay in memory up to `spool_threshold` bytes.
    pub fn new(spool_threshold: usize) -> Self {
        Self {
            spool_threshold,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn create(&self) -> ScratchFile {
        self.live.fetch_add(1, Ordering::SeqCst);
        ScratchFile {
            inner: SpooledTempFile::new(self.spool_threshold),
            live: Arc::clone(&self.live),
        }
    }

    /// Number of scratch files not yet released.
    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn spool_threshold(&self) -> usize {
        self.spool_threshold
    }
}

impl fmt::Debug for ScratchSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchSpace")
            .field("spool_threshold", &self.spool_threshold)
            .field("live", &self.live_count())
            .finish()
    }
}

/// One scratch file. Its storage is released on drop.
pub struct ScratchFile {
    inner: SpooledTempFile,
    live: Arc<AtomicUsize>,
}

impl ScratchFile {
    /// Whether the content has spilled from memory to a temporary file.
    pub fn is_spilled(&self) -> bool {
        self.inner.is_rolled()
    }

    /// Length of the content in bytes. Leaves the position unchanged.
    pub fn len(&mut self) -> io::Result<u64> {
        let pos = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(end)
    }

    pub fn is_empty(&mut self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Read for ScratchFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for ScratchFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Seek for ScratchFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl fmt::Debug for ScratchFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchFile")
            .field("spilled", &self.is_spilled())
            .finish()
    }
}
