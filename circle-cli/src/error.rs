//! CLI error types

use circle_reader::{ConfigError, ReaderError};
use circle_tracer::TracerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Backend name must not be empty")]
    EmptyBackendName,

    #[error("Executor name must not be empty")]
    EmptyExecutorName,

    #[error("Unknown backend: {name}")]
    UnknownBackend { name: String },

    #[error("No executor registered for {path}")]
    NoExecutor { path: String },

    #[error("Invalid decoder configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Reader(#[from] ReaderError),

    #[error("Provenance error: {0}")]
    Tracer(#[from] TracerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_errors_display() {
        assert_eq!(
            CliError::EmptyBackendName.to_string(),
            "Backend name must not be empty"
        );
        let err = CliError::UnknownBackend {
            name: "npu".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown backend: npu");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: CliError = ConfigError::IdentifierLength(3).into();
        assert_eq!(
            err.to_string(),
            "Invalid decoder configuration: identifier must be 4 bytes, got 3"
        );
    }
}
