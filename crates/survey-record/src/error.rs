//! Error types for the survey-record crate.
//!
//! Validation failures are a property of the input and are reported in one
//! aggregated [`ValidationError`]. An unavailable random source is an
//! environment fault and is kept apart as [`EntropyError`].

use thiserror::Error;

use crate::field::SurveyField;

/// Reason a single field constraint failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// A required text field was empty.
    #[error("must not be empty")]
    Empty,
    /// A text field exceeded its character limit.
    #[error("must be at most {max} characters")]
    TooLong {
        /// Maximum number of characters allowed.
        max: usize,
    },
    /// The value is not a syntactically valid email address.
    #[error("must be a valid email address")]
    InvalidEmail,
    /// An integer fell outside its inclusive range.
    #[error("must be between {min} and {max} inclusive")]
    OutOfRange {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// Consent was not explicitly granted.
    #[error("consent required")]
    ConsentRequired,
}

impl Violation {
    /// Stable machine-readable code for the violation.
    ///
    /// # Examples
    /// ```
    /// use survey_record::Violation;
    ///
    /// assert_eq!(Violation::ConsentRequired.code(), "consent_required");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_email",
            Self::OutOfRange { .. } => "out_of_range",
            Self::ConsentRequired => "consent_required",
        }
    }
}

/// A violated constraint tied to the field that failed it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {violation}")]
pub struct FieldViolation {
    field: SurveyField,
    violation: Violation,
}

impl FieldViolation {
    /// Pair a field with the constraint it violated.
    #[must_use]
    pub const fn new(field: SurveyField, violation: Violation) -> Self {
        Self { field, violation }
    }

    /// Field that failed validation.
    #[must_use]
    pub const fn field(&self) -> SurveyField {
        self.field
    }

    /// Constraint the field violated.
    #[must_use]
    pub const fn violation(&self) -> &Violation {
        &self.violation
    }
}

/// Every constraint a submission violated.
///
/// ## Invariants
/// - Holds at least one [`FieldViolation`].
/// - Violations are ordered by field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("submission failed validation: {}", summarise(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

fn summarise(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Build an error from collected violations.
    ///
    /// Returns `None` when nothing was violated, so an empty report can never
    /// masquerade as a failure.
    #[must_use]
    pub fn from_violations(mut violations: Vec<FieldViolation>) -> Option<Self> {
        if violations.is_empty() {
            return None;
        }
        violations.sort_by_key(FieldViolation::field);
        Some(Self { violations })
    }

    /// Violations in field declaration order.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Whether `field` failed at least one constraint.
    #[must_use]
    pub fn has_violation(&self, field: SurveyField) -> bool {
        self.violations.iter().any(|entry| entry.field == field)
    }

    /// Violations reported against `field`.
    pub fn violations_for(&self, field: SurveyField) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |entry| entry.field == field)
            .map(FieldViolation::violation)
    }
}

impl<'a> IntoIterator for &'a ValidationError {
    type Item = &'a FieldViolation;
    type IntoIter = std::slice::Iter<'a, FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

/// The secure random source could not supply entropy.
///
/// Not recoverable by changing the input; adapters should surface it as an
/// internal fault rather than a client error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("secure random source unavailable: {message}")]
pub struct EntropyError {
    message: String,
}

impl EntropyError {
    /// Wrap the random source's failure description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Description reported by the random source.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Errors raised when parsing a stored hex digest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestFormatError {
    /// The digest had the wrong length.
    #[error("digest must be {expected} bytes of hex, got {actual} bytes")]
    InvalidLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },
    /// The digest contained something other than lowercase hex digits.
    #[error("digest must contain only lowercase hex digits")]
    InvalidCharacter,
}
