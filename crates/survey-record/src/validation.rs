//! Field constraints for survey submissions.
//!
//! Every constraint is evaluated independently and all failures are
//! collected, so a client sees the whole list in one response.
//!
//! # Constraints
//!
//! - `name`: 1 to [`NAME_MAX`] characters.
//! - `email`: standard address syntax, see [`is_valid_email`]. The stored
//!   value is normalised by [`normalize_email`].
//! - `age`: [`AGE_MIN`] to [`AGE_MAX`] inclusive.
//! - `consent`: must be `true`.
//! - `rating`: [`RATING_MIN`] to [`RATING_MAX`] inclusive.
//! - `comments`, `user_agent`: optional, at most [`FREE_TEXT_MAX`]
//!   characters. Comments are trimmed once validation succeeds.
//!
//! Trimming strips the characters [`is_trimmable`] accepts: Unicode
//! whitespace plus the ASCII separators `U+001C` to `U+001F`.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{FieldViolation, ValidationError, Violation};
use crate::field::SurveyField;
use crate::submission::{RawSubmission, ValidatedSubmission};

/// Maximum length of a name in characters.
pub const NAME_MAX: usize = 100;
/// Maximum length of an email address in characters.
pub const EMAIL_MAX: usize = 254;
/// Maximum length of the local part of an email address in characters.
pub const EMAIL_LOCAL_MAX: usize = 64;
/// Youngest accepted respondent age.
pub const AGE_MIN: i64 = 13;
/// Oldest accepted respondent age.
pub const AGE_MAX: i64 = 120;
/// Lowest accepted rating.
pub const RATING_MIN: i64 = 1;
/// Highest accepted rating.
pub const RATING_MAX: i64 = 5;
/// Maximum length of comments and user agent strings in characters.
pub const FREE_TEXT_MAX: usize = 1000;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static DISPLAY_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Length limits are enforced separately; this constrains the shape.
        let pattern = concat!(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
            r"@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+",
            r"[A-Za-z](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])$",
        );
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn display_name_regex() -> &'static Regex {
    DISPLAY_NAME_RE.get_or_init(|| {
        Regex::new(r"^(?s)(.*?)<([^<>]*)>$")
            .unwrap_or_else(|error| panic!("display-name regex failed to compile: {error}"))
    })
}

/// Whether `c` is stripped from the ends of free text and email input.
///
/// Covers Unicode whitespace plus the file, group, record and unit
/// separators (`U+001C` to `U+001F`).
#[must_use]
pub fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn trim_text(value: &str) -> &str {
    value.trim_matches(is_trimmable)
}

/// Normalise an email as entered into its canonical stored form.
///
/// Surrounding whitespace is removed and `Name <address>` input is reduced
/// to the bare address. The domain is lowercased; the local part keeps its
/// case. Returns `None` when the resulting address is not valid.
///
/// # Examples
/// ```
/// use survey_record::normalize_email;
///
/// assert_eq!(normalize_email(" Ada@EXAMPLE.com ").as_deref(), Some("Ada@example.com"));
/// assert_eq!(
///     normalize_email("Ada Lovelace <ada@example.com>").as_deref(),
///     Some("ada@example.com"),
/// );
/// assert_eq!(normalize_email("not-an-email"), None);
/// ```
#[must_use]
pub fn normalize_email(candidate: &str) -> Option<String> {
    let trimmed = trim_text(candidate);
    let address = display_name_regex()
        .captures(trimmed)
        .and_then(|captures| captures.get(2))
        .map_or(trimmed, |inner| trim_text(inner.as_str()));
    if !is_valid_email(address) {
        return None;
    }
    let (local, domain) = address.rsplit_once('@')?;
    Some(format!("{local}@{}", domain.to_ascii_lowercase()))
}

/// Whether `candidate` is a syntactically valid email address.
///
/// Accepts `local@domain` where the local part is a dot-separated run of
/// RFC 5322 atoms and the domain has at least two labels, the last starting
/// with a letter. Quoted local parts, IP literals, and display-name forms
/// are rejected; use [`normalize_email`] for input as a respondent typed it.
///
/// # Examples
/// ```
/// use survey_record::is_valid_email;
///
/// assert!(is_valid_email("a@example.com"));
/// assert!(!is_valid_email("not-an-email"));
/// assert!(!is_valid_email("a@localhost"));
/// ```
#[must_use]
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.chars().count() > EMAIL_MAX {
        return false;
    }
    let Some((local, _)) = candidate.split_once('@') else {
        return false;
    };
    if local.chars().count() > EMAIL_LOCAL_MAX {
        return false;
    }
    email_regex().is_match(candidate)
}

fn check_name(name: &str) -> Option<Violation> {
    if name.is_empty() {
        return Some(Violation::Empty);
    }
    check_length(name, NAME_MAX)
}

fn check_range(value: i64, min: i64, max: i64) -> Option<Violation> {
    (!(min..=max).contains(&value)).then_some(Violation::OutOfRange { min, max })
}

const fn check_consent(consent: bool) -> Option<Violation> {
    if consent {
        None
    } else {
        Some(Violation::ConsentRequired)
    }
}

fn check_length(value: &str, max: usize) -> Option<Violation> {
    (value.chars().count() > max).then_some(Violation::TooLong { max })
}

fn check_free_text(value: Option<&str>) -> Option<Violation> {
    value.and_then(|text| check_length(text, FREE_TEXT_MAX))
}

/// Validate a raw submission against every field constraint.
///
/// On success, comments are trimmed of surrounding whitespace and the email
/// is replaced by its [`normalize_email`] form. The length limit applies to
/// the comment as received.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every violated constraint when any
/// field fails.
///
/// # Examples
/// ```
/// use survey_record::{RawSubmission, SurveyField, validate};
///
/// let raw = RawSubmission {
///     name: String::new(),
///     email: "ada@example.com".to_owned(),
///     age: 200,
///     consent: false,
///     rating: 3,
///     comments: None,
///     user_agent: None,
/// };
///
/// let err = validate(raw).expect_err("three constraints fail");
/// assert_eq!(err.violations().len(), 3);
/// assert!(err.has_violation(SurveyField::Consent));
/// ```
pub fn validate(raw: RawSubmission) -> Result<ValidatedSubmission, ValidationError> {
    let RawSubmission {
        name,
        email,
        age,
        consent,
        rating,
        comments,
        user_agent,
    } = raw;

    let normalized_email = normalize_email(&email);
    let outcomes = [
        (SurveyField::Name, check_name(&name)),
        (
            SurveyField::Email,
            normalized_email.is_none().then_some(Violation::InvalidEmail),
        ),
        (SurveyField::Age, check_range(age, AGE_MIN, AGE_MAX)),
        (SurveyField::Consent, check_consent(consent)),
        (SurveyField::Rating, check_range(rating, RATING_MIN, RATING_MAX)),
        (SurveyField::Comments, check_free_text(comments.as_deref())),
        (SurveyField::UserAgent, check_free_text(user_agent.as_deref())),
    ];
    let violations = outcomes
        .into_iter()
        .filter_map(|(field, outcome)| outcome.map(|violation| FieldViolation::new(field, violation)))
        .collect();

    if let Some(error) = ValidationError::from_violations(violations) {
        return Err(error);
    }

    Ok(ValidatedSubmission {
        name,
        email: normalized_email.unwrap_or(email),
        age,
        rating,
        comments: comments.map(|text| trim_text(&text).to_owned()),
        user_agent,
    })
}
