use std::io::{self, Read, Write};

use crate::cancel::{CancellationToken, Cancelled};

/// Default chunk size for [`copy_chunked`].
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Failure of a cancellable copy.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

/// Copy `reader` into `writer` in chunks of `chunk_size` bytes, checking
/// `cancel` before every chunk. Returns the number of bytes copied.
pub fn copy_chunked<R, W>(
    reader: &mut R,
    writer: &mut W,
    chunk_size: usize,
    cancel: &CancellationToken,
) -> Result<u64, CopyError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut copied: u64 = 0;
    loop {
        cancel.check()?;
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        writer.write_all(&buffer[..read])?;
        copied += read as u64;
    }
    writer.flush()?;
    Ok(copied)
}
