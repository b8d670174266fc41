use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::version::NormalizedVersion;

/// The (identifier, version) pair a symbol package declares in its manifest.
///
/// Identifiers compare ASCII case-insensitively and versions compare in
/// normalized form, so `MyLib 1.0` and `mylib 1.0.0` name the same package.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawIdentity")]
pub struct PackageIdentity {
    /// Package identifier as declared (original case preserved).
    pub id: String,
    /// Normalized package version.
    pub version: NormalizedVersion,
}

#[derive(Deserialize)]
struct RawIdentity {
    id: String,
    version: NormalizedVersion,
}

impl TryFrom<RawIdentity> for PackageIdentity {
    type Error = TypeError;

    fn try_from(raw: RawIdentity) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.version)
    }
}

impl PackageIdentity {
    /// Create an identity from an already-parsed version.
    pub fn new(id: impl Into<String>, version: NormalizedVersion) -> Result<Self, TypeError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(TypeError::EmptyIdentifier);
        }
        Ok(Self { id, version })
    }

    /// Create an identity from raw manifest strings.
    pub fn parse(id: &str, version: &str) -> Result<Self, TypeError> {
        Self::new(id, NormalizedVersion::parse(version)?)
    }

    /// Returns `true` if both identities name the same published package.
    pub fn matches(&self, other: &PackageIdentity) -> bool {
        self.id.eq_ignore_ascii_case(&other.id) && self.version == other.version
    }

    /// Lower-cased identifier, suitable as a lookup key.
    pub fn folded_id(&self) -> String {
        self.id.to_ascii_lowercase()
    }
}

impl PartialEq for PackageIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for PackageIdentity {}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}
