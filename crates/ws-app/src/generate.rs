//! Synthetic input generation.
//!
//! Writes a `city_data.csv` of random meshblocks over Christchurch and a
//! `README.txt` describing the input files a run needs.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use ws_project::inputs::{AREA, COUNT_COLUMNS, LATITUDE, LONGITUDE};

use crate::error::{AppError, AppResult};

pub const CITY_DATA_FILE: &str = "city_data.csv";
pub const README_FILE: &str = "README.txt";

pub const LATITUDE_RANGE: (f64, f64) = (-43.6058, -43.398);
pub const LONGITUDE_RANGE: (f64, f64) = (172.446, 172.776);
/// Meshblock area bounds (m^2).
pub const AREA_RANGE: (f64, f64) = (1541.19677734, 30404601.6421);
/// Households per burner type, half-open.
pub const COUNT_RANGE: (u32, u32) = (100, 150);

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub outdir: PathBuf,
    pub meshblocks: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub city_data: PathBuf,
    pub readme: PathBuf,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMeshblock {
    pub latitude: f64,
    pub longitude: f64,
    pub area_m2: f64,
    pub counts: [u32; 3],
}

pub fn random_meshblocks(n: usize, rng: &mut StdRng) -> Vec<GeneratedMeshblock> {
    (0..n)
        .map(|_| GeneratedMeshblock {
            latitude: rng.random_range(LATITUDE_RANGE.0..LATITUDE_RANGE.1),
            longitude: rng.random_range(LONGITUDE_RANGE.0..LONGITUDE_RANGE.1),
            area_m2: rng.random_range(AREA_RANGE.0..AREA_RANGE.1),
            counts: [
                rng.random_range(COUNT_RANGE.0..COUNT_RANGE.1),
                rng.random_range(COUNT_RANGE.0..COUNT_RANGE.1),
                rng.random_range(COUNT_RANGE.0..COUNT_RANGE.1),
            ],
        })
        .collect()
}

pub fn city_data_csv(meshblocks: &[GeneratedMeshblock]) -> String {
    let mut csv = format!(
        "{},{},{},{}\n",
        LATITUDE,
        LONGITUDE,
        AREA,
        COUNT_COLUMNS.join(",")
    );
    for mb in meshblocks {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            mb.latitude, mb.longitude, mb.area_m2, mb.counts[0], mb.counts[1], mb.counts[2]
        ));
    }
    csv
}

pub fn generate_inputs(request: &GenerateRequest) -> AppResult<GenerateResponse> {
    if request.meshblocks == 0 {
        return Err(AppError::InvalidInput(
            "at least one meshblock is needed".to_string(),
        ));
    }
    std::fs::create_dir_all(&request.outdir)?;

    let seed = request.seed.unwrap_or_else(rand::random::<u64>);
    let mut rng = StdRng::seed_from_u64(seed);
    let meshblocks = random_meshblocks(request.meshblocks, &mut rng);

    let city_data = request.outdir.join(CITY_DATA_FILE);
    std::fs::write(&city_data, city_data_csv(&meshblocks))?;
    let readme = request.outdir.join(README_FILE);
    std::fs::write(&readme, readme_text())?;

    info!(
        outdir = %request.outdir.display(),
        meshblocks = meshblocks.len(),
        seed,
        "Finished generating input files"
    );
    Ok(GenerateResponse {
        city_data,
        readme,
        seed,
    })
}

pub fn readme_text() -> String {
    let columns = [LATITUDE, LONGITUDE, AREA]
        .iter()
        .chain(COUNT_COLUMNS.iter())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "\
Bottom-up woodsmoke emissions model
===================================

The model estimates PM2.5 emissions from household wood burners across a city.
Every household has a usual hour and temperature at which it lights its fire.
Each hour of the weather series, a household compares the city temperature and
the time of day against those habits and may light its burner, which then burns
until 22:00. Emissions are summed per meshblock and divided by its area, giving
grams per square metre.

Input files
-----------
city_data.csv
  One row per meshblock with the columns: {columns}.
  num_woodburner1..3 are the number of households with burner types 1 to 3:
    1  radiata pine
    2  macrocarpa
    3  blue gum
  Extra columns are carried through to the output untouched.

weather.csv
  Two columns: time (YYYY-MM-DD HH:MM:SS) and air_temperature (degrees Celsius),
  one row per hour. `ws-cli prepare-weather` builds it from raw observations.

Running
-------
  ws-cli run inputs city_data.csv weather.csv --outdir output --timesteps 10
or, with a run definition file:
  ws-cli run config run.yaml

Outputs
-------
  city_emissions.csv   the city table with an emissions column (g/m^2)
  hourly_emissions.csv times,emissions summed over the city per ignition hour
  manifest.json        run id, seed and diagnostics

Query a finished run with `ws-cli query output`.
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ws_project::{CsvTable, MeshblockTable};

    #[test]
    fn draws_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for mb in random_meshblocks(200, &mut rng) {
            assert!((LATITUDE_RANGE.0..LATITUDE_RANGE.1).contains(&mb.latitude));
            assert!((LONGITUDE_RANGE.0..LONGITUDE_RANGE.1).contains(&mb.longitude));
            assert!((AREA_RANGE.0..AREA_RANGE.1).contains(&mb.area_m2));
            assert!(mb.counts.iter().all(|c| (100..150).contains(c)));
        }
    }

    #[test]
    fn generated_csv_loads_as_city_data() {
        let mut rng = StdRng::seed_from_u64(9);
        let csv = city_data_csv(&random_meshblocks(5, &mut rng));
        let table = MeshblockTable::from_table(CsvTable::parse(&csv).unwrap()).unwrap();
        assert_eq!(table.rows.len(), 5);
    }

    #[test]
    fn readme_lists_columns() {
        let text = readme_text();
        assert!(text.contains("num_woodburner3"));
        assert!(text.contains("air_temperature"));
    }
}
