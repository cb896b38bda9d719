//! Survey field identifiers used in violation reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Field of a survey submission.
///
/// The string form is the snake_case key used on the wire and in violation
/// reports, so adapters can point clients at the offending input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyField {
    /// Respondent name.
    Name,
    /// Respondent email address.
    Email,
    /// Respondent age in years.
    Age,
    /// Explicit consent to store the submission.
    Consent,
    /// Satisfaction rating.
    Rating,
    /// Optional free-text comments.
    Comments,
    /// Optional client user agent string.
    UserAgent,
}

impl SurveyField {
    /// Every field, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Email,
        Self::Age,
        Self::Consent,
        Self::Rating,
        Self::Comments,
        Self::UserAgent,
    ];

    /// Stable snake_case name of the field.
    ///
    /// # Examples
    /// ```
    /// use survey_record::SurveyField;
    ///
    /// assert_eq!(SurveyField::UserAgent.as_str(), "user_agent");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Age => "age",
            Self::Consent => "consent",
            Self::Rating => "rating",
            Self::Comments => "comments",
            Self::UserAgent => "user_agent",
        }
    }
}

impl fmt::Display for SurveyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
