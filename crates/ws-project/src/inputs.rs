//! Meshblock attribute and weather tables.

use std::path::Path;

use tracing::debug;
use ws_core::{Area, Real, Timestamp, m2, parse_timestamp};

use crate::table::CsvTable;
use crate::{ProjectError, ProjectResult};

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const AREA: &str = "area";
/// Household-count columns, one per burner type in type-number order.
pub const COUNT_COLUMNS: [&str; 3] = ["num_woodburner1", "num_woodburner2", "num_woodburner3"];

pub const TIME: &str = "time";
pub const AIR_TEMPERATURE: &str = "air_temperature";

/// One parsed meshblock row.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshblockRow {
    pub index: usize,
    pub latitude: Real,
    pub longitude: Real,
    pub area: Area,
    pub counts: [u32; 3],
}

/// The meshblock table as read, plus its parsed rows in the same order.
#[derive(Debug, Clone)]
pub struct MeshblockTable {
    pub table: CsvTable,
    pub rows: Vec<MeshblockRow>,
}

impl MeshblockTable {
    pub fn load(path: &Path) -> ProjectResult<Self> {
        let table = CsvTable::read(path)?;
        let out = Self::from_table(table)?;
        debug!(path = %path.display(), meshblocks = out.rows.len(), "loaded city data");
        Ok(out)
    }

    pub fn from_table(table: CsvTable) -> ProjectResult<Self> {
        let source = "city data";
        let lat = table.require(LATITUDE, source)?;
        let lon = table.require(LONGITUDE, source)?;
        let area = table.require(AREA, source)?;
        let mut count_cols = [0usize; 3];
        for (slot, name) in count_cols.iter_mut().zip(COUNT_COLUMNS) {
            *slot = table.require(name, source)?;
        }

        let mut rows = Vec::with_capacity(table.len());
        for index in 0..table.len() {
            let mut counts = [0u32; 3];
            for (slot, &col) in counts.iter_mut().zip(count_cols.iter()) {
                *slot = table.count(index, col)?;
            }
            rows.push(MeshblockRow {
                index,
                latitude: table.real(index, lat)?,
                longitude: table.real(index, lon)?,
                area: m2(table.real(index, area)?),
                counts,
            });
        }
        Ok(Self { table, rows })
    }
}

/// One parsed weather row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherRow {
    pub time: Timestamp,
    pub air_temperature_c: Real,
}

/// Read the weather series, keeping only the first `timesteps` rows.
///
/// The file must hold at least `timesteps` rows.
pub fn load_weather(path: &Path, timesteps: usize) -> ProjectResult<Vec<WeatherRow>> {
    let table = CsvTable::read(path)?;
    let rows = weather_from_table(&table, timesteps)?;
    debug!(
        path = %path.display(),
        available = table.len(),
        used = rows.len(),
        "loaded weather"
    );
    Ok(rows)
}

pub fn weather_from_table(table: &CsvTable, timesteps: usize) -> ProjectResult<Vec<WeatherRow>> {
    let source = "weather data";
    let time_col = table.require(TIME, source)?;
    let temp_col = table.require(AIR_TEMPERATURE, source)?;
    if table.len() < timesteps {
        return Err(ProjectError::ShortWeather {
            available: table.len(),
            requested: timesteps,
        });
    }

    (0..timesteps)
        .map(|row| -> ProjectResult<WeatherRow> {
            Ok(WeatherRow {
                time: parse_timestamp(table.cell(row, time_col))?,
                air_temperature_c: table.real(row, temp_col)?,
            })
        })
        .collect()
}
