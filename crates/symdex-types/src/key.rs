use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Literal suffix appended to every symbol key.
///
/// Symbol servers reserve the trailing eight hex digits of a key for an
/// age discriminator. Portable debug-symbol files have no age, so the value
/// is fixed.
pub const KEY_SUFFIX: &str = "ffffffff";

/// Total length of a symbol key: 32 hex digits of GUID plus the suffix.
pub const KEY_LEN: usize = 40;

const GUID_HEX_LEN: usize = 32;

/// Content-addressed storage key for one debug-symbol file.
///
/// A `SymbolKey` is the uppercase hexadecimal form of the file's 16-byte
/// content identifier (no separators) followed by [`KEY_SUFFIX`]. The same
/// debug-symbol file always produces the same key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolKey(String);

impl SymbolKey {
    /// Derive the key for a content identifier.
    pub fn from_guid(guid: &Uuid) -> Self {
        let mut key = hex::encode_upper(guid.as_bytes());
        key.push_str(KEY_SUFFIX);
        Self(key)
    }

    /// Parse and validate an existing key string.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.len() != KEY_LEN {
            return Err(TypeError::InvalidLength {
                expected: KEY_LEN,
                actual: s.len(),
            });
        }
        if !s.is_ascii() {
            return Err(TypeError::InvalidHex(s.to_string()));
        }
        let (guid_hex, suffix) = s.split_at(GUID_HEX_LEN);
        if suffix != KEY_SUFFIX {
            return Err(TypeError::InvalidKeySuffix {
                expected: KEY_SUFFIX.into(),
                actual: suffix.into(),
            });
        }
        hex::decode(guid_hex).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if guid_hex.bytes().any(|b| b.is_ascii_lowercase()) {
            return Err(TypeError::LowercaseKey(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// The content identifier this key was derived from.
    pub fn guid(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        // Validated on construction.
        if hex::decode_to_slice(&self.0[..GUID_HEX_LEN], &mut bytes).is_err() {
            return Uuid::nil();
        }
        Uuid::from_bytes(bytes)
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolKey({})", self.0)
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SymbolKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SymbolKey {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SymbolKey> for String {
    fn from(key: SymbolKey) -> Self {
        key.0
    }
}

impl From<&Uuid> for SymbolKey {
    fn from(guid: &Uuid) -> Self {
        Self::from_guid(guid)
    }
}
