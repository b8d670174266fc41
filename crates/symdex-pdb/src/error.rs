/// Errors from portable PDB header parsing.
#[derive(Debug, thiserror::Error)]
pub enum PdbError {
    /// The file does not start with the ECMA-335 metadata signature.
    #[error("not a portable PDB: expected signature 0x424A5342, found {found:#010x}")]
    NotPortable { found: u32 },

    /// The file is a legacy (MSF container) Windows PDB.
    #[error("legacy MSF-format PDB is not supported")]
    LegacyMsf,

    /// The content ended before the header was complete.
    #[error("truncated metadata: {0}")]
    Truncated(&'static str),

    /// The metadata root has no `#Pdb` stream, so no content identifier.
    #[error("metadata has no #Pdb stream")]
    MissingPdbStream,

    /// A stream header points outside the file.
    #[error("stream '{name}' at offset {offset} with size {size} exceeds file length {file_len}")]
    StreamOutOfBounds {
        name: String,
        offset: u32,
        size: u32,
        file_len: u64,
    },

    /// A header field holds a value the format does not allow.
    #[error("invalid metadata header: {0}")]
    InvalidHeader(String),

    /// I/O error from the underlying reader.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for PDB operations.
pub type PdbResult<T> = Result<T, PdbError>;
