//! ws-results: persisted run outputs.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::compute_run_id;
pub use store::{CITY_EMISSIONS_FILE, HOURLY_EMISSIONS_FILE, MANIFEST_FILE, RunStore};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found in {path}")]
    RunNotFound { path: String },

    #[error("Row count mismatch: {rows} meshblock rows, {values} emission values")]
    RowMismatch { rows: usize, values: usize },

    #[error("Malformed results file: {message}")]
    Malformed { message: String },
}

impl From<ws_project::ProjectError> for ResultsError {
    fn from(e: ws_project::ProjectError) -> Self {
        ResultsError::Malformed {
            message: e.to_string(),
        }
    }
}

impl From<ws_core::WsError> for ResultsError {
    fn from(e: ws_core::WsError) -> Self {
        ResultsError::Malformed {
            message: e.to_string(),
        }
    }
}
