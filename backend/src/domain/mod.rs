//! Domain layer for survey intake.
//!
//! Public surface:
//! - DomainError (alias to `error::DomainError`): error envelope emitted on failure.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - SurveyIntakeService (alias to `intake::SurveyIntakeService`): turns a
//!   raw submission into a stored record stamped with the current time.

pub mod error;
pub mod intake;

pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::intake::{IntakeError, SurveyIntakeService, violation_details};
