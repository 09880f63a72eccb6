//! Raw weather observations to an hourly model input.
//!
//! Observations are averaged per clock hour. Hours without observations are
//! left out rather than written as blanks.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use ws_core::{Timestamp, celsius, format_timestamp, k, parse_timestamp};
use ws_core::time::floor_hour;
use ws_project::CsvTable;
use ws_project::inputs::{AIR_TEMPERATURE, TIME};

use crate::error::AppResult;

pub const WEATHER_FILE: &str = "weather.csv";

#[derive(Debug, Clone)]
pub struct WeatherPrepRequest {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Column holding the timestamps.
    pub time_column: String,
    /// Column holding the temperature.
    pub variable: String,
    /// Source temperatures are in kelvin.
    pub kelvin: bool,
}

impl WeatherPrepRequest {
    pub fn new(source: PathBuf, output: PathBuf) -> Self {
        Self {
            source,
            output,
            time_column: TIME.to_string(),
            variable: AIR_TEMPERATURE.to_string(),
            kelvin: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherPrepResponse {
    pub output: PathBuf,
    pub observations: usize,
    pub hours: usize,
    /// Hours inside the observed span with no observation.
    pub gaps: usize,
    /// Rows whose value was blank or not a number.
    pub skipped: usize,
}

/// Hourly means of `(time, value)` observations, in chronological order.
pub fn hourly_means(observations: &[(Timestamp, f64)]) -> Vec<(Timestamp, f64)> {
    let mut bins: BTreeMap<Timestamp, (f64, usize)> = BTreeMap::new();
    for (time, value) in observations {
        let bin = bins.entry(floor_hour(time)).or_insert((0.0, 0));
        bin.0 += value;
        bin.1 += 1;
    }
    bins.into_iter()
        .map(|(hour, (sum, n))| (hour, sum / n as f64))
        .collect()
}

fn count_gaps(hours: &[(Timestamp, f64)]) -> usize {
    hours
        .windows(2)
        .map(|w| ((w[1].0 - w[0].0).num_hours() - 1).max(0) as usize)
        .sum()
}

pub fn weather_csv(hours: &[(Timestamp, f64)]) -> String {
    let mut csv = format!("{},{}\n", TIME, AIR_TEMPERATURE);
    for (time, value) in hours {
        csv.push_str(&format!("{},{}\n", format_timestamp(time), value));
    }
    csv
}

pub fn prepare_weather(request: &WeatherPrepRequest) -> AppResult<WeatherPrepResponse> {
    let table = CsvTable::read(&request.source)?;
    let source = request.source.display().to_string();
    let time_col = table.require(&request.time_column, &source)?;
    let value_col = table.require(&request.variable, &source)?;

    let mut observations = Vec::with_capacity(table.len());
    let mut skipped = 0;
    for row in 0..table.len() {
        let time = parse_timestamp(table.cell(row, time_col))?;
        match table.real(row, value_col) {
            Ok(v) => {
                let c = if request.kelvin { celsius(k(v)) } else { v };
                observations.push((time, c));
            }
            Err(_) => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "rows without a usable temperature were dropped");
    }

    let hours = hourly_means(&observations);
    let gaps = count_gaps(&hours);
    if gaps > 0 {
        warn!(gaps, "hours without observations were left out");
    }

    write_output(&request.output, &hours)?;
    info!(
        output = %request.output.display(),
        observations = observations.len(),
        hours = hours.len(),
        "prepared weather"
    );

    Ok(WeatherPrepResponse {
        output: request.output.clone(),
        observations: observations.len(),
        hours: hours.len(),
        gaps,
        skipped,
    })
}

fn write_output(path: &Path, hours: &[(Timestamp, f64)]) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, weather_csv(hours))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn averages_within_the_hour() {
        let hours = hourly_means(&[
            (ts("2019-06-01 17:10:00"), 2.0),
            (ts("2019-06-01 17:50:00"), 4.0),
            (ts("2019-06-01 18:00:00"), 1.0),
            (ts("2019-06-01 16:30:00"), 0.0),
        ]);
        assert_eq!(
            hours,
            vec![
                (ts("2019-06-01 16:00:00"), 0.0),
                (ts("2019-06-01 17:00:00"), 3.0),
                (ts("2019-06-01 18:00:00"), 1.0),
            ]
        );
    }

    #[test]
    fn gaps_are_counted() {
        let hours = vec![
            (ts("2019-06-01 16:00:00"), 0.0),
            (ts("2019-06-01 19:00:00"), 0.0),
            (ts("2019-06-01 20:00:00"), 0.0),
        ];
        assert_eq!(count_gaps(&hours), 2);
    }

    #[test]
    fn output_uses_model_columns() {
        let csv = weather_csv(&[(ts("2019-06-01T16:00:00"), -1.5)]);
        assert_eq!(csv, "time,air_temperature\n2019-06-01 16:00:00,-1.5\n");
    }
}
