//! `survey-intake` entry-point: validates one JSON survey submission and
//! prints its storage record.
//!
//! The record goes to stdout as JSON. On failure a JSON error envelope is
//! printed instead and the process exits with 1 for rejected submissions or
//! 2 for configuration and environment faults. Logs go to stderr.

use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use survey_backend::config::{IntakeSettings, LogFormat};
use survey_backend::domain::{DomainError, ErrorCode, SurveyIntakeService};
use survey_backend::inbound::json::{decode_submission, render_error, render_record};

const EXIT_REJECTED: u8 = 1;
const EXIT_FAULT: u8 = 2;

fn main() -> ExitCode {
    let settings = match IntakeSettings::load_from_iter(std::env::args_os()) {
        Ok(settings) => settings,
        Err(err) => {
            write_line(io::stderr(), &format!("failed to load configuration: {err}"));
            return ExitCode::from(EXIT_FAULT);
        }
    };

    let log_format = match settings.log_format() {
        Ok(format) => format,
        Err(err) => {
            write_line(io::stderr(), &err.to_string());
            return ExitCode::from(EXIT_FAULT);
        }
    };
    init_tracing(log_format);

    match run(&settings) {
        Ok(body) => {
            write_line(io::stdout(), &body);
            ExitCode::SUCCESS
        }
        Err(err) => {
            write_line(io::stdout(), &render_error(&err));
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn init_tracing(format: LogFormat) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

fn run(settings: &IntakeSettings) -> Result<String, DomainError> {
    let ip = settings
        .ip()
        .map_err(|err| DomainError::internal(format!("invalid configuration: {err}")))?;
    let payload = read_payload(settings.input.as_deref()).map_err(|err| {
        error!(error = %err, "failed to read submission payload");
        DomainError::internal(format!("failed to read submission payload: {err}"))
    })?;

    let raw = decode_submission(&payload)?;
    let service = SurveyIntakeService::new(Arc::new(DefaultClock));
    let record = service.accept(raw, ip)?;
    render_record(&record, settings.pretty)
}

fn exit_code_for(err: &DomainError) -> u8 {
    match err.code() {
        ErrorCode::InvalidRequest => EXIT_REJECTED,
        _ => EXIT_FAULT,
    }
}

/// Read the payload from `path`, or from stdin when no path is configured.
fn read_payload(path: Option<&Path>) -> io::Result<Vec<u8>> {
    let Some(path) = path else {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        return Ok(buffer);
    };

    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "input path must be a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open input parent directory '{}': {error}",
            parent.display()
        ))
    })?;
    directory
        .read(Path::new(file_name))
        .map_err(|error| io::Error::other(format!("read input file '{}': {error}", path.display())))
}

fn write_line(mut out: impl Write, message: &str) {
    if let Err(err) = writeln!(out, "{message}") {
        drop(err);
    }
}
