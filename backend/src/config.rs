//! Intake configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `SURVEY_INTAKE_*` environment variables, or a
//! configuration file, in OrthoConfig's usual precedence.

use std::path::PathBuf;
use std::str::FromStr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_IP: &str = "127.0.0.1";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The log format is not one of the supported values.
    #[error("unsupported log format '{value}'; expected json or pretty")]
    UnsupportedLogFormat {
        /// Value supplied by the operator.
        value: String,
    },
    /// The originating address was configured but blank.
    #[error("originating address must not be empty")]
    EmptyIp,
}

/// Log output format for the intake binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(SettingsError::UnsupportedLogFormat {
                value: value.to_owned(),
            }),
        }
    }
}

/// Configuration values controlling a single intake run.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SURVEY_INTAKE")]
pub struct IntakeSettings {
    /// Path to the JSON submission; stdin is read when absent.
    pub input: Option<PathBuf>,
    /// Originating address recorded with the submission.
    pub ip: Option<String>,
    /// Pretty-print the emitted record.
    #[ortho_config(default = false)]
    pub pretty: bool,
    /// Log output format, `json` or `pretty`.
    pub log_format: Option<String>,
}

impl IntakeSettings {
    /// Return the configured address, falling back to the loopback address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::EmptyIp`] when the address is blank.
    pub fn ip(&self) -> Result<&str, SettingsError> {
        match self.ip.as_deref() {
            None => Ok(DEFAULT_IP),
            Some(value) if value.trim().is_empty() => Err(SettingsError::EmptyIp),
            Some(value) => Ok(value),
        }
    }

    /// Return the configured log format, defaulting to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnsupportedLogFormat`] for unknown values.
    pub fn log_format(&self) -> Result<LogFormat, SettingsError> {
        self.log_format
            .as_deref()
            .map_or(Ok(LogFormat::Json), LogFormat::from_str)
    }
}
