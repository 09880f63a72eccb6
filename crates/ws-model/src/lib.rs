//! Bottom-up woodsmoke emissions model.
//!
//! Provides:
//! - Parabolic emission-rate pieces and the five-segment woodburner curve
//! - Burner archetypes (wood type + appliance)
//! - Household ignition decisions against a city temperature series
//! - Meshblock aggregation and area normalisation
//! - A run-scoped emissions ledger and pluggable random sources

pub mod burner;
pub mod error;
pub mod household;
pub mod ignition;
pub mod ledger;
pub mod meshblock;
pub mod parabola;
pub mod random;
pub mod weather;
pub mod woodburner;

// Re-exports for public API
pub use burner::{BurnerArchetype, BurnerType};
pub use error::{ModelError, ModelResult};
pub use household::Household;
pub use ignition::{CANDIDATE_HOURS, IgnitionTable, TemperatureGate};
pub use ledger::{EmissionsLedger, MissCounts, MissKind};
pub use meshblock::{Meshblock, MeshblockSpec};
pub use parabola::Parabola;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use weather::WeatherStep;
pub use woodburner::{Segment, Woodburner};
