//! JSON adapter for survey payloads.
//!
//! Decodes inbound submissions and renders records or error envelopes. The
//! domain stays unaware of the wire format.

use serde_json::json;
use survey_record::{RawSubmission, StoredRecord};
use tracing::error;

use crate::domain::DomainError;

/// Decode a JSON payload into an untrusted submission.
///
/// Field constraints are not checked here; only the payload's shape is.
///
/// # Errors
///
/// Returns an [`crate::domain::ErrorCode::InvalidRequest`] error when the
/// bytes are not JSON or required fields are missing or mistyped.
///
/// # Examples
/// ```
/// use survey_backend::inbound::json::decode_submission;
///
/// let payload = br#"{"name":"Ada","email":"ada@example.com","age":36,"consent":true,"rating":5}"#;
/// let raw = decode_submission(payload).expect("payload decodes");
/// assert_eq!(raw.age, 36);
/// ```
pub fn decode_submission(payload: &[u8]) -> Result<RawSubmission, DomainError> {
    serde_json::from_slice(payload).map_err(|err| {
        DomainError::invalid_request(format!("malformed submission payload: {err}")).with_details(
            json!({
                "code": "malformed_payload",
                "line": err.line(),
                "column": err.column(),
            }),
        )
    })
}

/// Render a stored record as JSON.
///
/// # Errors
///
/// Returns an internal error if serialisation fails.
pub fn render_record(record: &StoredRecord, pretty: bool) -> Result<String, DomainError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(record)
    } else {
        serde_json::to_string(record)
    };
    rendered.map_err(|err| DomainError::internal(format!("failed to serialise record: {err}")))
}

/// Render an error envelope, redacting internal failures.
#[must_use]
pub fn render_error(err: &DomainError) -> String {
    match serde_json::to_string(&err.redacted()) {
        Ok(body) => body,
        Err(serialise_err) => {
            error!(error = %serialise_err, "failed to serialise error envelope");
            r#"{"code":"internal_error","message":"Internal server error"}"#.to_owned()
        }
    }
}
