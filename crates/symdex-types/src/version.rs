use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A package version in normalized form.
///
/// Accepts `major[.minor[.patch[.revision]]][-prerelease][+metadata]`.
/// Normalization drops leading zeros, fills missing minor/patch with zero,
/// omits a zero revision and discards build metadata, so `01.2` and
/// `1.2.0.0+sha.5` both normalize to `1.2.0`.
///
/// Equality ignores ASCII case in the prerelease label.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NormalizedVersion {
    major: u64,
    minor: u64,
    patch: u64,
    revision: u64,
    prerelease: Option<String>,
}

impl NormalizedVersion {
    /// A release version with no prerelease label.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            revision: 0,
            prerelease: None,
        }
    }

    /// Parse and normalize a version string.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::InvalidVersion {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("version is empty"));
        }

        let without_metadata = match trimmed.split_once('+') {
            Some((head, metadata)) => {
                if !is_label_list(metadata) {
                    return Err(invalid("malformed build metadata"));
                }
                head
            }
            None => trimmed,
        };

        let (numeric, prerelease) = match without_metadata.split_once('-') {
            Some((numeric, label)) => {
                if !is_label_list(label) {
                    return Err(invalid("malformed prerelease label"));
                }
                (numeric, Some(label.to_string()))
            }
            None => (without_metadata, None),
        };

        let parts: Vec<&str> = numeric.split('.').collect();
        if parts.len() > 4 {
            return Err(invalid("more than four numeric components"));
        }

        let mut components = [0u64; 4];
        for (slot, part) in components.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("numeric component is not a number"));
            }
            *slot = part
                .parse()
                .map_err(|_| invalid("numeric component overflows"))?;
        }

        Ok(Self {
            major: components[0],
            minor: components[1],
            patch: components[2],
            revision: components[3],
            prerelease,
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The prerelease label, if any, in its original case.
    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    /// Returns `true` if the version carries a prerelease label.
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    fn folded_prerelease(&self) -> Option<String> {
        self.prerelease.as_ref().map(|p| p.to_ascii_lowercase())
    }
}

fn is_label_list(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|label| {
            !label.is_empty() && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

impl PartialEq for NormalizedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.patch == other.patch
            && self.revision == other.revision
            && self.folded_prerelease() == other.folded_prerelease()
    }
}

impl Eq for NormalizedVersion {}

impl Hash for NormalizedVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.revision.hash(state);
        self.folded_prerelease().hash(state);
    }
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.revision > 0 {
            write!(f, ".{}", self.revision)?;
        }
        if let Some(label) = &self.prerelease {
            write!(f, "-{label}")?;
        }
        Ok(())
    }
}

impl FromStr for NormalizedVersion {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NormalizedVersion {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NormalizedVersion> for String {
    fn from(version: NormalizedVersion) -> Self {
        version.to_string()
    }
}
