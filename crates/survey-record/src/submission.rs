//! Raw and validated survey submissions.

use serde::{Deserialize, Deserializer};

/// Untrusted survey input, exactly as received.
///
/// No invariants hold yet; pass it through [`crate::validate`] (or
/// `ValidatedSubmission::try_from`) before use.
///
/// When decoded with serde, `consent` accepts any JSON value: only the
/// boolean `true` counts as consent, everything else decodes to `false` so
/// validation can report a dedicated consent violation instead of a type
/// error. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawSubmission {
    /// Respondent name.
    pub name: String,
    /// Respondent email address.
    pub email: String,
    /// Respondent age in years.
    pub age: i64,
    /// Whether the respondent consented to storage.
    #[serde(deserialize_with = "deserialize_consent")]
    pub consent: bool,
    /// Satisfaction rating.
    pub rating: i64,
    /// Optional free-text comments.
    #[serde(default)]
    pub comments: Option<String>,
    /// Optional client user agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConsentValue {
    Flag(bool),
    Other(serde::de::IgnoredAny),
}

fn deserialize_consent<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = ConsentValue::deserialize(deserializer)?;
    Ok(matches!(value, ConsentValue::Flag(true)))
}

/// A submission that satisfied every field constraint.
///
/// ## Invariants
/// - `name` is 1 to 100 characters.
/// - `email` is a syntactically valid address in normalised form.
/// - `age` is within 13..=120 and `rating` within 1..=5.
/// - `consent` is `true`.
/// - `comments`, when present, has been trimmed; `comments` and `user_agent`
///   are at most 1000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) age: i64,
    pub(crate) rating: i64,
    pub(crate) comments: Option<String>,
    pub(crate) user_agent: Option<String>,
}

impl ValidatedSubmission {
    /// Respondent name, verbatim.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Respondent email address, trimmed with its domain lowercased.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Respondent age in years.
    #[must_use]
    pub const fn age(&self) -> i64 {
        self.age
    }

    /// Consent flag; always `true` once validated.
    #[must_use]
    pub const fn consent(&self) -> bool {
        true
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
}

impl TryFrom<RawSubmission> for ValidatedSubmission {
    type Error = crate::error::ValidationError;

    fn try_from(value: RawSubmission) -> Result<Self, Self::Error> {
        crate::validation::validate(value)
    }
}
