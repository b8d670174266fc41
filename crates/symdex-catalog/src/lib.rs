//! Published package catalog for symdex.
//!
//! A symbol package is accepted only if the package it belongs to has
//! already been published. [`PackageCatalog`] is the lookup seam the indexer
//! consumes; [`InMemoryPackageCatalog`] is a reference backend loadable from
//! a JSON file.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{CatalogError, CatalogResult};
pub use memory::InMemoryPackageCatalog;
pub use traits::{PackageCatalog, PublishedPackage};
