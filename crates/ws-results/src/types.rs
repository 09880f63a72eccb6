//! Result data types.

use serde::{Deserialize, Serialize};
use ws_core::Timestamp;
use ws_model::{EmissionsLedger, MissCounts};

pub type RunId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    /// RFC 3339 creation time.
    pub timestamp: String,
    pub model_version: String,
    pub city_data: String,
    pub weather_data: String,
    pub timesteps: usize,
    pub seed: u64,
    pub meshblocks: usize,
    pub households: u64,
    pub ignitions: u64,
    /// Sum of every ledger entry.
    pub total_emissions: f64,
    #[serde(default)]
    pub misses: MissCounts,
}

/// One row of `hourly_emissions.csv`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyRecord {
    pub time: Timestamp,
    pub emissions: f64,
}

impl HourlyRecord {
    /// Ledger entries in chronological order.
    pub fn from_ledger(ledger: &EmissionsLedger) -> Vec<HourlyRecord> {
        ledger
            .iter()
            .map(|(time, emissions)| HourlyRecord {
                time: *time,
                emissions: *emissions,
            })
            .collect()
    }

    pub fn into_ledger(records: &[HourlyRecord]) -> EmissionsLedger {
        records.iter().map(|r| (r.time, r.emissions)).collect()
    }
}
