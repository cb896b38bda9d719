//! Storage-ready survey records.
//!
//! A [`StoredRecord`] keeps non-identifying fields in cleartext and replaces
//! `email` and `age` with SHA-256 digests. The digests are deterministic so
//! repeat submissions can be matched; the [`SubmissionId`] is random so it
//! cannot be.

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::digest::{Sha256Hex, sha256_hex};
use crate::error::EntropyError;
use crate::submission::ValidatedSubmission;
use crate::submission_id::SubmissionId;

/// Immutable record handed to persistence.
///
/// ## Invariants
/// - `email_hash` is SHA-256 of the normalised email, byte for byte.
/// - `age_hash` is SHA-256 of the age's decimal string form.
/// - `submission_id` is independent random data.
/// - `consent` is always `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    name: String,
    email_hash: Sha256Hex,
    age_hash: Sha256Hex,
    consent: bool,
    rating: i64,
    comments: Option<String>,
    user_agent: Option<String>,
    submission_id: SubmissionId,
    received_at: DateTime<Utc>,
    ip: String,
}

impl ValidatedSubmission {
    /// Derive a storage record using the operating system's secure RNG.
    ///
    /// `received_at` and `ip` are supplied by the caller and copied through
    /// unchanged; no clock or network is consulted here.
    ///
    /// # Errors
    ///
    /// Returns [`EntropyError`] when the OS random source is unavailable.
    pub fn to_stored_record(
        &self,
        received_at: DateTime<Utc>,
        ip: impl Into<String>,
    ) -> Result<StoredRecord, EntropyError> {
        self.to_stored_record_with(&mut OsRng, received_at, ip)
    }

    /// Derive a storage record drawing the identifier from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`EntropyError`] when `rng` cannot supply entropy.
    pub fn to_stored_record_with<R>(
        &self,
        rng: &mut R,
        received_at: DateTime<Utc>,
        ip: impl Into<String>,
    ) -> Result<StoredRecord, EntropyError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let submission_id = SubmissionId::generate_with(rng)?;
        Ok(StoredRecord {
            name: self.name.clone(),
            email_hash: sha256_hex(&self.email),
            age_hash: sha256_hex(&self.age.to_string()),
            consent: self.consent(),
            rating: self.rating,
            comments: self.comments.clone(),
            user_agent: self.user_agent.clone(),
            submission_id,
            received_at,
            ip: ip.into(),
        })
    }
}

impl StoredRecord {
    /// Respondent name, verbatim.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// SHA-256 of the respondent's email address.
    #[must_use]
    pub const fn email_hash(&self) -> &Sha256Hex {
        &self.email_hash
    }

    /// SHA-256 of the respondent's age in decimal.
    #[must_use]
    pub const fn age_hash(&self) -> &Sha256Hex {
        &self.age_hash
    }

    /// Consent flag; always `true`.
    #[must_use]
    pub const fn consent(&self) -> bool {
        self.consent
    }

    /// Satisfaction rating.
    #[must_use]
    pub const fn rating(&self) -> i64 {
        self.rating
    }

    /// Trimmed comments, if supplied.
    #[must_use]
    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    /// Client user agent, if supplied.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Random identifier for this record.
    #[must_use]
    pub const fn submission_id(&self) -> &SubmissionId {
        &self.submission_id
    }

    /// When the submission was received.
    #[must_use]
    pub const fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Originating network address as supplied by the caller.
    #[must_use]
    pub fn ip(&self) -> &str {
        self.ip.as_str()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::submission::RawSubmission;
    use crate::submission_id::tests::FailingRng;
    use crate::validation::validate;

    const EMAIL_DIGEST: &str = "08168cd80dfd534ab0f10af10f1303fe00af2d43ab5c1432360d137f8197e17a";
    const AGE_30_DIGEST: &str = "624b60c58c9d8bfb6ff1886c2fd605d2adeb6ea4da576068201b6c6958ce93f4";

    #[fixture]
    fn submission() -> ValidatedSubmission {
        validate(RawSubmission {
            name: "Ada".to_owned(),
            email: "a@example.com".to_owned(),
            age: 30,
            consent: true,
            rating: 5,
            comments: Some("  Lovely  ".to_owned()),
            user_agent: Some("curl/8.0".to_owned()),
        })
        .expect("valid submission")
    }

    #[fixture]
    fn received_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    fn hashes_email_and_age(submission: ValidatedSubmission, received_at: DateTime<Utc>) {
        let record = submission
            .to_stored_record(received_at, "203.0.113.7")
            .expect("entropy available");

        assert_eq!(record.email_hash().as_str(), EMAIL_DIGEST);
        assert_eq!(record.age_hash().as_str(), AGE_30_DIGEST);
    }

    #[rstest]
    #[case("a@EXAMPLE.com")]
    #[case("  a@example.com\t")]
    #[case("Respondent <a@Example.Com>")]
    fn hashes_the_normalised_email(received_at: DateTime<Utc>, #[case] entered: &str) {
        let submission = validate(RawSubmission {
            name: "Ada".to_owned(),
            email: entered.to_owned(),
            age: 30,
            consent: true,
            rating: 5,
            comments: None,
            user_agent: None,
        })
        .expect("entered address is accepted");

        let record = submission
            .to_stored_record(received_at, "203.0.113.7")
            .expect("entropy available");

        assert_eq!(record.email_hash().as_str(), EMAIL_DIGEST);
    }

    #[rstest]
    fn keeps_local_part_case_when_hashing(received_at: DateTime<Utc>) {
        let submission = validate(RawSubmission {
            name: "Ada".to_owned(),
            email: "A@example.com".to_owned(),
            age: 30,
            consent: true,
            rating: 5,
            comments: None,
            user_agent: None,
        })
        .expect("valid submission");

        let record = submission
            .to_stored_record(received_at, "203.0.113.7")
            .expect("entropy available");

        assert_eq!(record.email_hash(), &sha256_hex("A@example.com"));
        assert_ne!(record.email_hash().as_str(), EMAIL_DIGEST);
    }

    #[rstest]
    fn copies_remaining_fields_unchanged(
        submission: ValidatedSubmission,
        received_at: DateTime<Utc>,
    ) {
        let record = submission
            .to_stored_record(received_at, "203.0.113.7")
            .expect("entropy available");

        assert_eq!(record.name(), "Ada");
        assert!(record.consent());
        assert_eq!(record.rating(), 5);
        assert_eq!(record.comments(), Some("Lovely"));
        assert_eq!(record.user_agent(), Some("curl/8.0"));
        assert_eq!(record.received_at(), received_at);
        assert_eq!(record.ip(), "203.0.113.7");
    }

    #[rstest]
    fn repeated_derivation_keeps_hashes_but_changes_identifier(
        submission: ValidatedSubmission,
        received_at: DateTime<Utc>,
    ) {
        let first = submission
            .to_stored_record(received_at, "198.51.100.1")
            .expect("entropy available");
        let second = submission
            .to_stored_record(received_at, "198.51.100.1")
            .expect("entropy available");

        assert_eq!(first.email_hash(), second.email_hash());
        assert_eq!(first.age_hash(), second.age_hash());
        assert_ne!(first.submission_id(), second.submission_id());
    }

    #[rstest]
    fn identifier_is_not_derived_from_fields(
        submission: ValidatedSubmission,
        received_at: DateTime<Utc>,
    ) {
        let record = submission
            .to_stored_record(received_at, "198.51.100.1")
            .expect("entropy available");

        let id = record.submission_id().as_str();
        assert_ne!(id, record.email_hash().as_str());
        assert_ne!(id, record.age_hash().as_str());
    }

    #[rstest]
    fn seeded_rng_gives_reproducible_identifier(
        submission: ValidatedSubmission,
        received_at: DateTime<Utc>,
    ) {
        let first = submission
            .to_stored_record_with(&mut ChaCha20Rng::seed_from_u64(9), received_at, "::1")
            .expect("entropy available");
        let second = submission
            .to_stored_record_with(&mut ChaCha20Rng::seed_from_u64(9), received_at, "::1")
            .expect("entropy available");

        assert_eq!(first, second);
    }

    #[rstest]
    fn entropy_failure_propagates(submission: ValidatedSubmission, received_at: DateTime<Utc>) {
        let result = submission.to_stored_record_with(&mut FailingRng, received_at, "::1");
        assert!(result.is_err());
    }

    #[rstest]
    fn serialises_with_snake_case_keys(
        submission: ValidatedSubmission,
        received_at: DateTime<Utc>,
    ) {
        let record = submission
            .to_stored_record_with(&mut ChaCha20Rng::seed_from_u64(1), received_at, "::1")
            .expect("entropy available");

        let value = serde_json::to_value(&record).expect("record serialises");

        assert_eq!(value["email_hash"], json!(EMAIL_DIGEST));
        assert_eq!(value["age_hash"], json!(AGE_30_DIGEST));
        assert_eq!(value["received_at"], json!("2024-05-01T12:30:00Z"));
        assert_eq!(value["submission_id"], json!(record.submission_id().as_str()));
        assert_eq!(value["consent"], json!(true));
        assert!(value.get("email").is_none());
        assert!(value.get("age").is_none());
    }

    #[rstest]
    fn deserialising_restores_the_record(
        submission: ValidatedSubmission,
        received_at: DateTime<Utc>,
    ) {
        let record = submission
            .to_stored_record(received_at, "203.0.113.7")
            .expect("entropy available");

        let encoded = serde_json::to_string(&record).expect("record serialises");
        let decoded: StoredRecord = serde_json::from_str(&encoded).expect("record decodes");

        assert_eq!(decoded, record);
    }
}
