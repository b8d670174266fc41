//! Debug-symbol content storage for symdex.
//!
//! The [`SymbolStore`] trait persists one debug-symbol file under its
//! filename and [`SymbolKey`](symdex_types::SymbolKey). Two backends ship:
//!
//! - [`InMemorySymbolStore`] for tests and embedding
//! - [`FileSystemSymbolStore`] writing the `{filename}/{key}/{filename}`
//!   symbol-server tree

pub mod error;
pub mod fs;
pub mod memory;
mod path;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FileSystemSymbolStore;
pub use memory::InMemorySymbolStore;
pub use traits::SymbolStore;
