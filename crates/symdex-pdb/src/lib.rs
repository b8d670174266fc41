//! Portable PDB header parsing for symdex.
//!
//! A portable PDB is an ECMA-335 metadata image. Its `#Pdb` stream opens
//! with a 20-byte id that the compiler also embeds in the matching binary.
//! This crate reads just enough of the metadata root to recover that id.
//! It never decodes tables, documents or sequence points.
//!
//! Legacy (MSF container) Windows PDBs are not supported. They are reported
//! as [`PdbError::LegacyMsf`] so callers can reject them like any other
//! malformed input.

pub mod builder;
pub mod error;
pub mod id;
pub mod metadata;

pub use builder::PortablePdbBuilder;
pub use error::{PdbError, PdbResult};
pub use id::{read_pdb_id, PdbId, PDB_ID_LEN, PDB_STREAM_NAME};
pub use metadata::{MetadataRoot, StreamHeader, METADATA_SIGNATURE, MSF_MAGIC};
