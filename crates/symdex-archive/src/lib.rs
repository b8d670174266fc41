//! Symbol package archive access for symdex.
//!
//! A symbol package (`.snupkg`) is a zip archive holding a root `.nuspec`
//! manifest, packaging parts, and the debug-symbol files themselves. This
//! crate opens such archives, checks each entry-table record, lists file
//! entries with their derived extension, streams entry content and reads
//! the manifest's package identity.
//!
//! The indexing pipeline consumes archives through the [`PackageArchive`]
//! trait; [`SymbolPackage`] is the zip-backed implementation.

pub mod builder;
pub mod entry;
pub mod error;
pub mod manifest;
pub mod package;

pub use builder::SymbolPackageBuilder;
pub use entry::{extension_of, file_name_of, ArchiveEntry, MANIFEST_EXTENSION, SYMBOL_EXTENSION};
pub use error::{ArchiveError, ArchiveResult};
pub use manifest::{parse_nuspec, render_nuspec, MAX_MANIFEST_SIZE};
pub use package::{PackageArchive, SymbolPackage};
