//! Foundation types for symdex.
//!
//! This crate provides the value types shared by every symdex crate: the
//! content-addressed key under which a debug-symbol file is stored, the
//! identity of the published package a symbol package belongs to, and the
//! tri-state outcome of one indexing call.
//!
//! # Key Types
//!
//! - [`SymbolKey`]: `UPPERCASE_HEX(guid) + "ffffffff"` storage key
//! - [`PackageIdentity`]: package identifier plus normalized version
//! - [`NormalizedVersion`]: parsed, normalized package version
//! - [`ValidationResult`]: `InvalidSymbolPackage`, `PackageNotFound`, or `Success`
//! - [`CancellationToken`]: cooperative cancellation signal
//!
//! [`copy_chunked`] is the cancellable stream copy shared by extraction and
//! storage, and [`is_single_component`] is the filename rule both enforce.

pub mod cancel;
pub mod component;
pub mod copy;
pub mod error;
pub mod key;
pub mod package;
pub mod result;
pub mod version;

pub use cancel::{CancellationToken, Cancelled};
pub use component::is_single_component;
pub use copy::{copy_chunked, CopyError, DEFAULT_CHUNK_SIZE};
pub use error::TypeError;
pub use key::{SymbolKey, KEY_LEN, KEY_SUFFIX};
pub use package::PackageIdentity;
pub use result::ValidationResult;
pub use version::NormalizedVersion;
