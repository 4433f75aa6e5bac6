use std::path::PathBuf;

use gitscape_diagram::error::InputError;
use thiserror::Error;

use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read entries from {source_name}: {error}")]
    ReadEntries {
        source_name: String,
        error: std::io::Error,
    },
    #[error("failed to parse entries from {source_name}: {error}")]
    ParseEntries {
        source_name: String,
        error: InputError,
    },
    #[error("failed to create log file {path}: {error}")]
    Log {
        path: PathBuf,
        error: std::io::Error,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
