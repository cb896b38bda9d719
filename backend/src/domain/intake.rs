//! Survey intake orchestration.
//!
//! Validates a raw submission, stamps it with the receipt time from the
//! injected clock, and derives the storage record. Only non-identifying
//! facts (identifier, rating, violated field names) are logged.

use std::sync::Arc;

use mockable::Clock;
use serde_json::{Value, json};
use survey_record::{
    EntropyError, RawSubmission, StoredRecord, ValidatedSubmission, ValidationError,
};
use thiserror::Error;
use tracing::{error, info, warn};

use super::DomainError;

/// Failures surfaced by [`SurveyIntakeService::accept`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    /// The submission violated one or more field constraints.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The secure random source could not produce an identifier.
    #[error(transparent)]
    Entropy(#[from] EntropyError),
}

/// Build the `details` payload listing every violated constraint.
///
/// # Examples
/// ```
/// use survey_backend::domain::violation_details;
/// use survey_record::{RawSubmission, validate};
///
/// let raw = RawSubmission {
///     name: "Ada".to_owned(),
///     email: "not-an-email".to_owned(),
///     age: 36,
///     consent: true,
///     rating: 4,
///     comments: None,
///     user_agent: None,
/// };
/// let err = validate(raw).expect_err("email is malformed");
///
/// let details = violation_details(&err);
/// assert_eq!(details["violations"][0]["field"], "email");
/// assert_eq!(details["violations"][0]["code"], "invalid_email");
/// ```
#[must_use]
pub fn violation_details(err: &ValidationError) -> Value {
    let violations: Vec<Value> = err
        .into_iter()
        .map(|entry| {
            json!({
                "field": entry.field().as_str(),
                "code": entry.violation().code(),
                "message": entry.violation().to_string(),
            })
        })
        .collect();
    json!({ "violations": violations })
}

impl From<IntakeError> for DomainError {
    fn from(value: IntakeError) -> Self {
        match value {
            IntakeError::Validation(err) => DomainError::invalid_request("submission failed validation")
                .with_details(violation_details(&err)),
            IntakeError::Entropy(err) => DomainError::internal(err.to_string()),
        }
    }
}

/// Accepts survey submissions and turns them into storage records.
pub struct SurveyIntakeService {
    clock: Arc<dyn Clock>,
}

impl SurveyIntakeService {
    /// Create a service reading receipt timestamps from `clock`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use survey_backend::domain::SurveyIntakeService;
    ///
    /// let _service = SurveyIntakeService::new(Arc::new(DefaultClock));
    /// ```
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Validate `raw` and derive a record received now from `ip`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Validation`] listing every violated constraint,
    /// or [`IntakeError::Entropy`] when no identifier could be generated.
    pub fn accept(&self, raw: RawSubmission, ip: &str) -> Result<StoredRecord, IntakeError> {
        let submission = ValidatedSubmission::try_from(raw).inspect_err(|err| {
            let fields: Vec<&str> = err.into_iter().map(|entry| entry.field().as_str()).collect();
            warn!(
                violations = err.violations().len(),
                ?fields,
                "survey submission rejected"
            );
        })?;

        let received_at = self.clock.utc();
        let record = submission
            .to_stored_record(received_at, ip)
            .inspect_err(|err| error!(error = %err, "submission identifier unavailable"))?;

        info!(
            submission_id = %record.submission_id(),
            rating = record.rating(),
            received_at = %record.received_at(),
            "survey submission accepted"
        );
        Ok(record)
    }
}
