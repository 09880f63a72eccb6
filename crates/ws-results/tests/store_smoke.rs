use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use ws_core::parse_timestamp;
use ws_model::{EmissionsLedger, MissCounts};
use ws_project::CsvTable;
use ws_results::*;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn manifest() -> RunManifest {
    RunManifest {
        run_id: "abc123".to_string(),
        timestamp: "2026-02-25T12:00:00Z".to_string(),
        model_version: "0.1.0".to_string(),
        city_data: "city.csv".to_string(),
        weather_data: "weather.csv".to_string(),
        timesteps: 3,
        seed: 42,
        meshblocks: 2,
        households: 5,
        ignitions: 2,
        total_emissions: 3.0,
        misses: MissCounts {
            ignition_hour: 4,
            ..MissCounts::default()
        },
    }
}

#[test]
fn save_and_load_run() {
    let dir = unique_temp_dir("ws_results_save");
    let store = RunStore::new(dir.clone()).unwrap();
    assert!(!store.has_run());

    let city = CsvTable::parse(
        ",latitude,longitude,area,num_woodburner1,num_woodburner2,num_woodburner3\n\
         0,-43.5,172.6,1000,1,0,0\n\
         1,-43.4,172.5,2000,2,1,1\n",
    )
    .unwrap();
    let ledger: EmissionsLedger = [
        (parse_timestamp("2019-06-01 18:00:00").unwrap(), 2.0),
        (parse_timestamp("2019-06-01 17:00:00").unwrap(), 1.0),
    ]
    .into_iter()
    .collect();
    let hourly = HourlyRecord::from_ledger(&ledger);

    store
        .save_run(&manifest(), &city, &[0.001, 0.0005], &hourly)
        .unwrap();
    assert!(store.has_run());

    let loaded = store.load_manifest().unwrap();
    assert_eq!(loaded, manifest());

    let records = store.load_hourly().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].emissions, 1.0);
    assert_eq!(records[1].emissions, 2.0);

    let city_out = store.load_city().unwrap();
    assert_eq!(city_out.headers.last().map(String::as_str), Some("emissions"));
    assert_eq!(city_out.cell(1, 7), "0.0005");
    assert_eq!(city_out.cell(0, 0), "0");

    let raw = fs::read_to_string(store.path_of(HOURLY_EMISSIONS_FILE)).unwrap();
    assert!(raw.starts_with("times,emissions\n2019-06-01 17:00:00,1\n"));
}

/// A file whose keys mix `T` and space separators sorts differently as
/// strings than as times. Loading always yields chronological order.
#[test]
fn hourly_load_is_chronological_not_lexicographic() {
    let dir = unique_temp_dir("ws_results_order");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(HOURLY_EMISSIONS_FILE),
        "times,emissions\n2019-06-01 10:00:00,2\n2019-06-01T09:00:00,1\n2019-06-02 08:00:00,3\n",
    )
    .unwrap();

    let mut lexicographic = vec!["2019-06-01T09:00:00", "2019-06-01 10:00:00"];
    lexicographic.sort();
    assert_eq!(lexicographic[0], "2019-06-01 10:00:00");

    let store = RunStore::open(&dir).unwrap();
    let records = store.load_hourly().unwrap();
    let values: Vec<f64> = records.iter().map(|r| r.emissions).collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0]);

    let ledger = store.load_ledger().unwrap();
    assert_eq!(ledger.total(), 6.0);
}

#[test]
fn missing_run_is_reported() {
    let dir = unique_temp_dir("ws_results_missing");
    assert!(matches!(
        RunStore::open(&dir),
        Err(ResultsError::RunNotFound { .. })
    ));

    let store = RunStore::new(dir).unwrap();
    assert!(matches!(
        store.load_manifest(),
        Err(ResultsError::RunNotFound { .. })
    ));
    assert!(store.load_hourly().is_err());
}

#[test]
fn failed_save_leaves_no_outputs() {
    let dir = unique_temp_dir("ws_results_partial");
    let store = RunStore::new(dir.clone()).unwrap();
    // a directory where the manifest would be staged makes the last write fail
    fs::create_dir_all(dir.join(format!("{MANIFEST_FILE}.partial"))).unwrap();

    let city = CsvTable::parse(
        "latitude,longitude,area,num_woodburner1,num_woodburner2,num_woodburner3\n\
         -43.5,172.6,1000,1,0,0\n",
    )
    .unwrap();
    let ledger: EmissionsLedger = [(parse_timestamp("2019-06-01 17:00:00").unwrap(), 1.0)]
        .into_iter()
        .collect();

    let result = store.save_run(&manifest(), &city, &[0.001], &HourlyRecord::from_ledger(&ledger));
    assert!(result.is_err());
    assert!(!store.has_run());
    for name in [CITY_EMISSIONS_FILE, HOURLY_EMISSIONS_FILE] {
        assert!(!store.path_of(name).exists(), "{name} was written");
        assert!(!dir.join(format!("{name}.partial")).exists(), "{name} staging left behind");
    }
}
