//! Random opaque identifiers for stored submissions.

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::digest::{Sha256Hex, sha256_hex};
use crate::error::EntropyError;

/// Bytes of entropy drawn for each identifier.
const ENTROPY_BYTES: usize = 32;

/// Unguessable identifier for a stored submission.
///
/// Derived from fresh random bytes only, never from submitted fields, so it
/// cannot be used to correlate or recover an email address or age. The
/// random bytes are hex-encoded and that token is hashed with SHA-256, which
/// gives every identifier the same 64-character shape as the field hashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(Sha256Hex);

impl SubmissionId {
    /// Generate an identifier from the operating system's secure RNG.
    ///
    /// # Errors
    ///
    /// Returns [`EntropyError`] when the OS random source is unavailable.
    ///
    /// # Examples
    /// ```
    /// use survey_record::SubmissionId;
    ///
    /// let first = SubmissionId::generate().expect("entropy available");
    /// let second = SubmissionId::generate().expect("entropy available");
    /// assert_ne!(first, second);
    /// ```
    pub fn generate() -> Result<Self, EntropyError> {
        Self::generate_with(&mut OsRng)
    }

    /// Generate an identifier from the supplied cryptographic RNG.
    ///
    /// # Errors
    ///
    /// Returns [`EntropyError`] when `rng` fails to fill the buffer.
    pub fn generate_with<R>(rng: &mut R) -> Result<Self, EntropyError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let mut entropy = [0_u8; ENTROPY_BYTES];
        rng.try_fill_bytes(&mut entropy)
            .map_err(|err| EntropyError::new(err.to_string()))?;
        let token = hex::encode(entropy);
        Ok(Self(sha256_hex(&token)))
    }

    /// Borrow the identifier as a hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for SubmissionId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
