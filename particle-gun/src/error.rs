use crate::config::ConfigKey;
use std::path::PathBuf;
use thiserror::Error;

pub(crate) type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("Could not open configuration file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("IO Error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Invalid JSON Configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed line {line_number}: \"{line}\" (expected \"key value\")")]
    MalformedLine { line_number: usize, line: String },
    #[error("Missing required key: {0}")]
    MissingKey(ConfigKey),
    #[error("Invalid value \"{value}\" for {key}: {reason}")]
    InvalidValue {
        key: ConfigKey,
        value: String,
        reason: String,
    },
    #[error("Value out of range for {key}: {reason}")]
    OutOfRange { key: ConfigKey, reason: String },
}

#[derive(Debug, Error)]
pub(crate) enum GeneratorError {
    #[error("Particle id list is empty")]
    EmptyPidList,
    #[error("Invalid {name} range: {reason}")]
    InvalidRange { name: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub(crate) enum WriterError {
    #[error("IO Error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Event {0} written after the listing was finished")]
    Finished(u64),
}
