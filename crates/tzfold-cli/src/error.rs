//! CLI error plumbing: exit codes and the JSON/text error envelopes.

use std::fmt;
use std::process::ExitCode;

use serde::Serialize;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_INPUT_ERROR: u8 = 2;
pub const EXIT_RUNTIME_ERROR: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    pub fn parse(s: &str) -> CliResult<OutputFormat> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => Err(CliError::input(format!(
                "Invalid output_format '{}'. Expected: json, text",
                s
            ))),
        }
    }

    /// Best guess at the requested format, for rendering the error about
    /// the format argument itself.
    pub fn hint(s: &str) -> OutputFormat {
        if s.eq_ignore_ascii_case("json") {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    message: String,
    exit_code: u8,
}

impl CliError {
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: EXIT_INPUT_ERROR,
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: EXIT_RUNTIME_ERROR,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a str,
    exit_code: u8,
}

pub fn render_error(err: &CliError, output_format: OutputFormat) -> ExitCode {
    match output_format {
        OutputFormat::Json => {
            let envelope = ErrorEnvelope {
                error: &err.message,
                exit_code: err.exit_code(),
            };

            match serde_json::to_string_pretty(&envelope) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("Error: {}", err.message),
            }
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", err.message);
        }
    }

    ExitCode::from(err.exit_code())
}
