use uuid::Uuid;

use crate::id::{PdbId, PDB_STREAM_NAME};
use crate::metadata::METADATA_SIGNATURE;

/// Writes minimal portable PDB images.
///
/// The output carries a valid metadata root, a `#Pdb` stream holding the PDB
/// id, and an empty `#~` table stream. That is enough for tools that only
/// need the content identifier, and it is what fixtures and smoke tests use.
#[derive(Clone, Debug)]
pub struct PortablePdbBuilder {
    guid: Uuid,
    stamp: u32,
    version: String,
    include_pdb_stream: bool,
    pdb_stream_last: bool,
}

impl PortablePdbBuilder {
    pub fn new(guid: Uuid) -> Self {
        Self {
            guid,
            stamp: 0,
            version: "PDB v1.0".into(),
            include_pdb_stream: true,
            pdb_stream_last: false,
        }
    }

    pub fn stamp(mut self, stamp: u32) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Omit the `#Pdb` stream, producing metadata with no content identifier.
    pub fn without_pdb_stream(mut self) -> Self {
        self.include_pdb_stream = false;
        self
    }

    /// Place the `#Pdb` stream after the table stream in the directory.
    pub fn pdb_stream_last(mut self) -> Self {
        self.pdb_stream_last = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let id = PdbId {
            guid: self.guid,
            stamp: self.stamp,
        };
        let mut pdb_stream = id.to_bytes().to_vec();
        // Entry point token, then the referenced type-system table mask.
        pdb_stream.extend_from_slice(&0u32.to_le_bytes());
        pdb_stream.extend_from_slice(&0u64.to_le_bytes());

        // Header, reserved, major/minor versions and an empty row-count mask.
        let table_stream = vec![0u8; 24];

        let mut streams: Vec<(&str, Vec<u8>)> = vec![("#~", table_stream)];
        if self.include_pdb_stream {
            if self.pdb_stream_last {
                streams.push((PDB_STREAM_NAME, pdb_stream));
            } else {
                streams.insert(0, (PDB_STREAM_NAME, pdb_stream));
            }
        }

        let mut version = self.version.as_bytes().to_vec();
        version.push(0);
        pad4(&mut version);

        let directory_len: usize = streams
            .iter()
            .map(|(name, _)| 8 + padded_len(name.len() + 1))
            .sum();
        let header_len = 16 + version.len() + 4 + directory_len;

        let mut out = Vec::with_capacity(header_len + 64);
        out.extend_from_slice(&METADATA_SIGNATURE.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(version.len() as u32).to_le_bytes());
        out.extend_from_slice(&version);
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&(streams.len() as u16).to_le_bytes());

        let mut offset = header_len;
        for (name, data) in &streams {
            out.extend_from_slice(&(offset as u32).to_le_bytes());
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            let mut name_bytes = name.as_bytes().to_vec();
            name_bytes.push(0);
            pad4(&mut name_bytes);
            out.extend_from_slice(&name_bytes);
            offset += padded_len(data.len());
        }
        debug_assert_eq!(out.len(), header_len);

        for (_, data) in &streams {
            let mut data = data.clone();
            pad4(&mut data);
            out.extend_from_slice(&data);
        }
        out
    }
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn pad4(bytes: &mut Vec<u8>) {
    bytes.resize(padded_len(bytes.len()), 0);
}
