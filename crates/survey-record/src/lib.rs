//! Survey submission validation and storage record derivation.
//!
//! This crate holds the decision logic for accepting a survey submission:
//! field constraints, aggregated violation reporting, and the derivation of
//! a storage-ready record in which personally identifiable fields are
//! replaced by one-way hashes. It performs no I/O, reads no clock, and keeps
//! no state between calls; adapters supply the receipt timestamp and the
//! originating address.
//!
//! # Overview
//!
//! - [`RawSubmission`] is untrusted input, usually decoded from JSON.
//! - [`ValidatedSubmission`] can only be obtained through [`validate`] (or
//!   `TryFrom<RawSubmission>`), which reports every violated constraint in
//!   one [`ValidationError`].
//! - [`StoredRecord`] is produced by
//!   [`ValidatedSubmission::to_stored_record`], hashing `email` and `age`
//!   with SHA-256 and attaching a random [`SubmissionId`].
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use survey_record::{RawSubmission, ValidatedSubmission};
//!
//! let raw = RawSubmission {
//!     name: "Ada".to_owned(),
//!     email: "ada@example.com".to_owned(),
//!     age: 36,
//!     consent: true,
//!     rating: 5,
//!     comments: Some("  Lovely walk  ".to_owned()),
//!     user_agent: None,
//! };
//!
//! let submission = ValidatedSubmission::try_from(raw).expect("valid submission");
//! assert_eq!(submission.comments(), Some("Lovely walk"));
//!
//! let received_at = Utc
//!     .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
//!     .single()
//!     .expect("valid timestamp");
//! let record = submission
//!     .to_stored_record(received_at, "203.0.113.7")
//!     .expect("secure random source available");
//!
//! assert_eq!(record.email_hash().as_str().len(), 64);
//! assert_eq!(record.ip(), "203.0.113.7");
//! ```

mod digest;
mod error;
mod field;
mod record;
mod submission;
mod submission_id;
mod validation;

pub use digest::{SHA256_HEX_LEN, Sha256Hex, sha256_hex};
pub use error::{DigestFormatError, EntropyError, FieldViolation, ValidationError, Violation};
pub use field::SurveyField;
pub use record::StoredRecord;
pub use submission::{RawSubmission, ValidatedSubmission};
pub use submission_id::SubmissionId;
pub use validation::{
    AGE_MAX, AGE_MIN, EMAIL_MAX, EMAIL_LOCAL_MAX, FREE_TEXT_MAX, NAME_MAX, RATING_MAX, RATING_MIN,
    is_trimmable, is_valid_email, normalize_email, validate,
};
