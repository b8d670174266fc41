use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use symdex_types::SymbolKey;
use uuid::Uuid;

use crate::error::{PdbError, PdbResult};
use crate::metadata::{read_exact, MetadataRoot};

/// Name of the stream carrying the PDB id.
pub const PDB_STREAM_NAME: &str = "#Pdb";

/// Size of the PDB id at the start of the `#Pdb` stream.
pub const PDB_ID_LEN: usize = 20;

/// The content identifier of a portable PDB.
///
/// The compiler writes the same 20 bytes into the debug directory of the
/// binary the PDB describes, which is how a debugger pairs the two. The
/// first 16 bytes form a GUID in .NET mixed-endian layout; the remaining
/// four are a timestamp-like stamp.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PdbId {
    pub guid: Uuid,
    pub stamp: u32,
}

impl PdbId {
    /// Decode the 20-byte on-disk PDB id.
    pub fn from_bytes(bytes: &[u8; PDB_ID_LEN]) -> Self {
        let mut guid_bytes = [0u8; 16];
        guid_bytes.copy_from_slice(&bytes[..16]);
        let mut stamp_bytes = [0u8; 4];
        stamp_bytes.copy_from_slice(&bytes[16..]);
        Self {
            guid: Uuid::from_bytes_le(guid_bytes),
            stamp: u32::from_le_bytes(stamp_bytes),
        }
    }

    /// Encode as the 20-byte on-disk PDB id.
    pub fn to_bytes(&self) -> [u8; PDB_ID_LEN] {
        let mut out = [0u8; PDB_ID_LEN];
        out[..16].copy_from_slice(&self.guid.to_bytes_le());
        out[16..].copy_from_slice(&self.stamp.to_le_bytes());
        out
    }

    /// Storage key for the file with this id.
    pub fn symbol_key(&self) -> SymbolKey {
        SymbolKey::from_guid(&self.guid)
    }
}

impl fmt::Debug for PdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PdbId({}, stamp={:#010x})", self.guid, self.stamp)
    }
}

/// Read the PDB id of a portable PDB.
///
/// Parses the metadata root, locates the `#Pdb` stream and reads its first
/// 20 bytes. The reader's position afterwards is unspecified; callers that
/// need the content again must seek back themselves.
pub fn read_pdb_id<R: Read + Seek>(reader: &mut R) -> PdbResult<PdbId> {
    let file_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let root = MetadataRoot::read(reader)?;
    let stream = root
        .stream(PDB_STREAM_NAME)
        .ok_or(PdbError::MissingPdbStream)?;

    if stream.end() > file_len {
        return Err(PdbError::StreamOutOfBounds {
            name: stream.name.clone(),
            offset: stream.offset,
            size: stream.size,
            file_len,
        });
    }
    if (stream.size as usize) < PDB_ID_LEN {
        return Err(PdbError::InvalidHeader(format!(
            "#Pdb stream is {} bytes, shorter than the {PDB_ID_LEN}-byte id",
            stream.size
        )));
    }

    reader.seek(SeekFrom::Start(u64::from(stream.offset)))?;
    let mut id_bytes = [0u8; PDB_ID_LEN];
    read_exact(reader, &mut id_bytes, "PDB id")?;
    let id = PdbId::from_bytes(&id_bytes);
    tracing::trace!(guid = %id.guid, stamp = id.stamp, "read portable PDB id");
    Ok(id)
}
