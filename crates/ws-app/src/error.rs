//! Error types for the ws-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Input error: {0}")]
    Project(String),

    #[error("Failed to read run definition: {path}")]
    DefinitionRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write run definition: {path}")]
    DefinitionWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Run definition validation failed: {0}")]
    Validation(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ws-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ws_project::ProjectError> for AppError {
    fn from(err: ws_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<ws_project::ValidationError> for AppError {
    fn from(err: ws_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<ws_model::ModelError> for AppError {
    fn from(err: ws_model::ModelError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<ws_results::ResultsError> for AppError {
    fn from(err: ws_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<ws_core::WsError> for AppError {
    fn from(err: ws_core::WsError) -> Self {
        AppError::Backend {
            message: err.to_string(),
        }
    }
}
