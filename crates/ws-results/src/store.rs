//! Run storage API.
//!
//! A run directory holds the two tables downstream tools read plus a JSON
//! manifest describing how they were produced.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use ws_core::{format_timestamp, parse_timestamp};
use ws_model::EmissionsLedger;
use ws_project::CsvTable;
use ws_project::table::join_record;

use crate::types::{HourlyRecord, RunManifest};
use crate::{ResultsError, ResultsResult};

pub const CITY_EMISSIONS_FILE: &str = "city_emissions.csv";
pub const HOURLY_EMISSIONS_FILE: &str = "hourly_emissions.csv";
pub const MANIFEST_FILE: &str = "manifest.json";

const STAGING_SUFFIX: &str = ".partial";

const EMISSIONS_COLUMN: &str = "emissions";
const TIMES_COLUMN: &str = "times";

#[derive(Debug, Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Open an existing run directory without creating it.
    pub fn open(root_dir: &Path) -> ResultsResult<Self> {
        if !root_dir.is_dir() {
            return Err(ResultsError::RunNotFound {
                path: root_dir.display().to_string(),
            });
        }
        Ok(Self {
            root_dir: root_dir.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    pub fn path_of(&self, file: &str) -> PathBuf {
        self.root_dir.join(file)
    }

    pub fn has_run(&self) -> bool {
        self.path_of(MANIFEST_FILE).exists()
    }

    /// Write the city table, the hourly ledger and the manifest.
    ///
    /// All three files are staged under temporary names first and only
    /// renamed into place once every write succeeded.
    pub fn save_run(
        &self,
        manifest: &RunManifest,
        city: &CsvTable,
        emissions: &[f64],
        hourly: &[HourlyRecord],
    ) -> ResultsResult<()> {
        let files = [
            (CITY_EMISSIONS_FILE, city_emissions_csv(city, emissions)?),
            (HOURLY_EMISSIONS_FILE, hourly_csv(hourly)),
            (MANIFEST_FILE, serde_json::to_string_pretty(manifest)?),
        ];

        fs::create_dir_all(&self.root_dir)?;
        let mut staged = Vec::with_capacity(files.len());
        for (name, content) in &files {
            let tmp = self.staging_path(name);
            if let Err(e) = fs::write(&tmp, content) {
                for path in staged.iter().chain(std::iter::once(&tmp)) {
                    let _ = fs::remove_file(path);
                }
                return Err(e.into());
            }
            staged.push(tmp);
        }

        for ((name, _), tmp) in files.iter().zip(&staged) {
            let path = self.path_of(name);
            fs::rename(tmp, &path)?;
            info!(path = %path.display(), "wrote run output");
        }
        info!(
            rows = emissions.len(),
            hours = hourly.len(),
            run_id = %manifest.run_id,
            "saved run"
        );
        Ok(())
    }

    fn staging_path(&self, file: &str) -> PathBuf {
        self.root_dir.join(format!("{file}{STAGING_SUFFIX}"))
    }

    pub fn load_manifest(&self) -> ResultsResult<RunManifest> {
        let manifest_path = self.path_of(MANIFEST_FILE);

        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                path: self.root_dir.display().to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    /// Read `hourly_emissions.csv`, sorted chronologically.
    pub fn load_hourly(&self) -> ResultsResult<Vec<HourlyRecord>> {
        let path = self.path_of(HOURLY_EMISSIONS_FILE);
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                path: self.root_dir.display().to_string(),
            });
        }

        let table = CsvTable::read(&path)?;
        let time_col = table.require(TIMES_COLUMN, HOURLY_EMISSIONS_FILE)?;
        let value_col = table.require(EMISSIONS_COLUMN, HOURLY_EMISSIONS_FILE)?;

        let mut records = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            records.push(HourlyRecord {
                time: parse_timestamp(table.cell(row, time_col))?,
                emissions: table.real(row, value_col)?,
            });
        }
        records.sort_by(|a, b| a.time.cmp(&b.time));
        Ok(records)
    }

    pub fn load_ledger(&self) -> ResultsResult<EmissionsLedger> {
        Ok(HourlyRecord::into_ledger(&self.load_hourly()?))
    }

    pub fn load_city(&self) -> ResultsResult<CsvTable> {
        Ok(CsvTable::read(&self.path_of(CITY_EMISSIONS_FILE))?)
    }
}

/// The meshblock table with an `emissions` column; an existing column of
/// that name is overwritten in place.
pub fn city_emissions_csv(city: &CsvTable, emissions: &[f64]) -> ResultsResult<String> {
    if city.len() != emissions.len() {
        return Err(ResultsError::RowMismatch {
            rows: city.len(),
            values: emissions.len(),
        });
    }

    let existing = city.column(EMISSIONS_COLUMN);
    let mut headers = city.headers.clone();
    if existing.is_none() {
        headers.push(EMISSIONS_COLUMN.to_string());
    }

    let mut csv = join_record(&headers);
    csv.push('\n');
    for (row, value) in city.rows.iter().zip(emissions) {
        let mut cells = row.clone();
        match existing {
            Some(col) => cells[col] = value.to_string(),
            None => cells.push(value.to_string()),
        }
        csv.push_str(&join_record(&cells));
        csv.push('\n');
    }
    Ok(csv)
}

pub fn hourly_csv(records: &[HourlyRecord]) -> String {
    let mut csv = format!("{},{}\n", TIMES_COLUMN, EMISSIONS_COLUMN);
    for r in records {
        csv.push_str(&format!("{},{}\n", format_timestamp(&r.time), r.emissions));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use ws_core::Timestamp;

    fn ts(s: &str) -> Timestamp {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn emissions_column_is_appended() {
        let city = CsvTable::parse("latitude,area\n-43.5,1000\n-43.6,2000\n").unwrap();
        let csv = city_emissions_csv(&city, &[0.5, 0.25]).unwrap();
        assert_eq!(csv, "latitude,area,emissions\n-43.5,1000,0.5\n-43.6,2000,0.25\n");
    }

    #[test]
    fn existing_emissions_column_is_replaced() {
        let city = CsvTable::parse("area,emissions,note\n1000,9,a\n").unwrap();
        let csv = city_emissions_csv(&city, &[0.125]).unwrap();
        assert_eq!(csv, "area,emissions,note\n1000,0.125,a\n");
    }

    #[test]
    fn row_mismatch_is_rejected() {
        let city = CsvTable::parse("area\n1\n2\n").unwrap();
        assert!(matches!(
            city_emissions_csv(&city, &[1.0]),
            Err(ResultsError::RowMismatch { rows: 2, values: 1 })
        ));
    }

    #[test]
    fn hourly_uses_canonical_times() {
        let csv = hourly_csv(&[HourlyRecord {
            time: ts("2019-06-01T17:00:00"),
            emissions: 1.5,
        }]);
        assert_eq!(csv, "times,emissions\n2019-06-01 17:00:00,1.5\n");
    }
}
