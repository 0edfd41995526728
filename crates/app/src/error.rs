use serde::Serialize;
use std::fmt;

use crate::config::ConfigError;

/// The one error shape a UI has to display.
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub message: String,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<umbral_import::ImportError> for CommandError {
    fn from(e: umbral_import::ImportError) -> Self {
        CommandError { message: e.to_string() }
    }
}

impl From<umbral_core::SelectionError> for CommandError {
    fn from(e: umbral_core::SelectionError) -> Self {
        CommandError { message: e.to_string() }
    }
}

impl From<umbral_report::ReportError> for CommandError {
    fn from(e: umbral_report::ReportError) -> Self {
        CommandError { message: e.to_string() }
    }
}

impl From<umbral_submit::SubmitError> for CommandError {
    fn from(e: umbral_submit::SubmitError) -> Self {
        CommandError { message: e.to_string() }
    }
}

impl From<ConfigError> for CommandError {
    fn from(e: ConfigError) -> Self {
        CommandError { message: e.to_string() }
    }
}
