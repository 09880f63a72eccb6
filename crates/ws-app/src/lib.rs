//! Shared application service layer for woodsmoke.
//!
//! Centralizes run orchestration, result queries and input preparation so
//! the CLI stays a thin shell over these services.

pub mod error;
pub mod generate;
pub mod profile;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod weather_prep;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use generate::{GenerateRequest, GenerateResponse, generate_inputs};
pub use profile::{EmissionProfile, ProfilePoint, emission_profile, profile_csv};
pub use progress::{MeshblockProgress, RunProgressEvent, RunStage};
pub use project_service::{InputSummary, load_definition, save_definition, summarize_inputs};
pub use query::{LedgerSummary, QuerySession, QueryStats, sum_between, summarize};
pub use run_service::{
    CitySimulation, RunOptions, RunRequest, RunResponse, RunTimingSummary, load_run,
    load_run_ledger, run, run_with_progress, simulate_city,
};
pub use weather_prep::{WeatherPrepRequest, WeatherPrepResponse, prepare_weather};
