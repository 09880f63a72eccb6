//! Error types for model operations.

use thiserror::Error;

/// Errors raised while simulating households and meshblocks.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Meshblock {index} has non-positive area {area_m2} m^2")]
    InvalidArea { index: usize, area_m2: f64 },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type ModelResult<T> = Result<T, ModelError>;

impl From<ws_core::WsError> for ModelError {
    fn from(e: ws_core::WsError) -> Self {
        ModelError::Backend {
            message: e.to_string(),
        }
    }
}
