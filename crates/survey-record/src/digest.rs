//! SHA-256 hex digests for one-way field hashing.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::DigestFormatError;

/// Length of a hex-encoded SHA-256 digest in characters.
pub const SHA256_HEX_LEN: usize = 64;

/// Lowercase hex-encoded SHA-256 digest.
///
/// ## Invariants
/// - Exactly [`SHA256_HEX_LEN`] characters.
/// - Only `0-9` and `a-f`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Hex(String);

/// Hash the UTF-8 bytes of `value` with SHA-256.
///
/// # Examples
/// ```
/// use survey_record::sha256_hex;
///
/// assert_eq!(
///     sha256_hex("30").as_str(),
///     "624b60c58c9d8bfb6ff1886c2fd605d2adeb6ea4da576068201b6c6958ce93f4"
/// );
/// ```
#[must_use]
pub fn sha256_hex(value: &str) -> Sha256Hex {
    let digest = Sha256::digest(value.as_bytes());
    Sha256Hex(hex::encode(digest))
}

impl Sha256Hex {
    /// Validate a stored digest string.
    ///
    /// # Errors
    ///
    /// Returns [`DigestFormatError`] when the value is not 64 lowercase hex
    /// characters.
    pub fn parse(value: impl Into<String>) -> Result<Self, DigestFormatError> {
        Self::from_owned(value.into())
    }

    fn from_owned(value: String) -> Result<Self, DigestFormatError> {
        if value.len() != SHA256_HEX_LEN {
            return Err(DigestFormatError::InvalidLength {
                expected: SHA256_HEX_LEN,
                actual: value.len(),
            });
        }
        if !value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(DigestFormatError::InvalidCharacter);
        }
        Ok(Self(value))
    }

    /// Borrow the hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Sha256Hex {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Sha256Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Sha256Hex> for String {
    fn from(value: Sha256Hex) -> Self {
        value.0
    }
}

impl TryFrom<String> for Sha256Hex {
    type Error = DigestFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
