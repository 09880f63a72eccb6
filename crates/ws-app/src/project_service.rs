//! Run definition loading, saving and input inspection.

use std::path::Path;

use ws_core::Timestamp;
use ws_project::{MeshblockTable, RunDefinition, load_weather};

use crate::error::{AppError, AppResult};

/// What a run definition's inputs contain.
#[derive(Debug, Clone)]
pub struct InputSummary {
    pub meshblocks: usize,
    pub households: u64,
    pub weather_rows: usize,
    pub first_time: Option<Timestamp>,
    pub last_time: Option<Timestamp>,
}

/// Load a run definition from YAML, resolving its paths.
pub fn load_definition(path: &Path) -> AppResult<RunDefinition> {
    if !path.exists() {
        return Err(AppError::DefinitionRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    Ok(ws_project::load_yaml(path)?)
}

pub fn save_definition(path: &Path, def: &RunDefinition) -> AppResult<()> {
    ws_project::validate_run(def)?;
    let content = serde_yaml::to_string(def)
        .map_err(|e| AppError::Project(format!("Failed to serialize run definition: {}", e)))?;

    std::fs::write(path, content).map_err(|e| AppError::DefinitionWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Parse both input tables and report what a run would see.
pub fn summarize_inputs(def: &RunDefinition) -> AppResult<InputSummary> {
    let city = MeshblockTable::load(&def.city_data)?;
    let weather = load_weather(&def.weather_data, def.timesteps)?;

    if let Some(row) = city.rows.iter().find(|r| {
        let area = ws_core::area_m2(r.area);
        area.is_nan() || area <= 0.0
    }) {
        return Err(AppError::Validation(format!(
            "meshblock {} has non-positive area",
            row.index
        )));
    }

    Ok(InputSummary {
        meshblocks: city.rows.len(),
        households: city
            .rows
            .iter()
            .flat_map(|r| r.counts.iter())
            .map(|&c| u64::from(c))
            .sum(),
        weather_rows: weather.len(),
        first_time: weather.first().map(|w| w.time),
        last_time: weather.last().map(|w| w.time),
    })
}
