//! Run execution service.
//!
//! Loads the meshblock and weather tables, simulates every meshblock in row
//! order against one run-scoped ledger, and persists the outputs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;
use ws_model::{
    EmissionsLedger, Meshblock, MeshblockSpec, RandomSource, SeededRandom, WeatherStep,
};
use ws_project::{MeshblockRow, MeshblockTable, RunDefinition, WeatherRow, load_weather};
use ws_results::{HourlyRecord, RunManifest, RunStore, compute_run_id};

use crate::error::{AppError, AppResult};
use crate::progress::{MeshblockProgress, RunProgressEvent, RunStage};

pub const MODEL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Seed for the random stream; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    pub model_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: None,
            model_version: MODEL_VERSION.to_string(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub city_data: &'a Path,
    pub weather_data: &'a Path,
    pub outdir: &'a Path,
    pub timesteps: usize,
    pub options: RunOptions,
}

impl<'a> RunRequest<'a> {
    pub fn from_definition(def: &'a RunDefinition) -> Self {
        Self {
            city_data: &def.city_data,
            weather_data: &def.weather_data,
            outdir: &def.outdir,
            timesteps: def.timesteps,
            options: RunOptions {
                seed: def.seed,
                ..RunOptions::default()
            },
        }
    }
}

/// Concise timing and execution summary for a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub load_time_s: f64,
    pub simulate_time_s: f64,
    pub save_time_s: f64,
    pub total_time_s: f64,
    pub meshblocks: usize,
    pub households: u64,
    pub ignitions: u64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub outdir: PathBuf,
    /// Area-normalised emissions per meshblock, in input row order.
    pub scaled_emissions: Vec<f64>,
    pub ledger: EmissionsLedger,
    pub timing: RunTimingSummary,
}

/// Per-city totals from [`simulate_city`].
#[derive(Debug, Clone, Default)]
pub struct CitySimulation {
    pub scaled_emissions: Vec<f64>,
    pub households: u64,
    pub ignitions: u64,
}

pub fn meshblock_spec(row: &MeshblockRow) -> MeshblockSpec {
    MeshblockSpec {
        index: row.index,
        latitude: row.latitude,
        longitude: row.longitude,
        area: row.area,
        counts: row.counts,
    }
}

pub fn weather_steps(rows: &[WeatherRow]) -> Vec<WeatherStep> {
    rows.iter()
        .map(|r| WeatherStep::new(r.time, r.air_temperature_c))
        .collect()
}

/// Simulate every meshblock in order, calling `on_meshblock` after each.
///
/// The first failing meshblock aborts the whole city.
pub fn simulate_city(
    rows: &[MeshblockRow],
    weather: &[WeatherStep],
    ledger: &mut EmissionsLedger,
    rng: &mut dyn RandomSource,
    on_meshblock: &mut dyn FnMut(&Meshblock),
) -> AppResult<CitySimulation> {
    let mut out = CitySimulation {
        scaled_emissions: Vec::with_capacity(rows.len()),
        ..CitySimulation::default()
    };
    for row in rows {
        let meshblock = Meshblock::simulate(meshblock_spec(row), weather, ledger, rng)?;
        info!(
            index = row.index,
            scaled_emissions = meshblock.scaled_emissions,
            "Finished simulating meshblock"
        );
        out.scaled_emissions.push(meshblock.scaled_emissions);
        out.households += meshblock.households;
        out.ignitions += meshblock.ignitions as u64;
        on_meshblock(&meshblock);
    }
    Ok(out)
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    meshblocks: Option<MeshblockProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
            meshblocks,
        });
    }
}

/// Execute a run.
pub fn run(request: &RunRequest) -> AppResult<RunResponse> {
    run_with_progress(request, None)
}

/// Execute a run and stream progress events.
pub fn run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    if request.timesteps == 0 {
        return Err(AppError::InvalidInput(
            "timesteps must be at least 1".to_string(),
        ));
    }

    emit_progress(
        &mut progress_cb,
        RunStage::LoadingInputs,
        started,
        Some("Loading inputs".to_string()),
        None,
    );

    let load_start = Instant::now();
    let city_bytes = std::fs::read(request.city_data)?;
    let weather_bytes = std::fs::read(request.weather_data)?;
    let city = MeshblockTable::load(request.city_data)?;
    let weather = weather_steps(&load_weather(request.weather_data, request.timesteps)?);
    timing.load_time_s = load_start.elapsed().as_secs_f64();

    let mut rng = match request.options.seed {
        Some(seed) => SeededRandom::new(seed),
        None => {
            let rng = SeededRandom::from_entropy();
            info!(seed = rng.seed(), "no seed given, drew one");
            rng
        }
    };
    let seed = rng.seed();
    let run_id = compute_run_id(
        &city_bytes,
        &weather_bytes,
        request.timesteps,
        seed,
        &request.options.model_version,
    );
    info!(
        run_id = %run_id,
        seed,
        meshblocks = city.rows.len(),
        timesteps = weather.len(),
        "starting run"
    );

    let total = city.rows.len();
    let mut ledger = EmissionsLedger::new();
    let simulate_start = Instant::now();
    let mut completed = 0usize;
    let mut households = 0u64;
    let mut ignitions = 0u64;
    let simulation = simulate_city(
        &city.rows,
        &weather,
        &mut ledger,
        &mut rng,
        &mut |mb: &Meshblock| {
            completed += 1;
            households += mb.households;
            ignitions += mb.ignitions as u64;
            emit_progress(
                &mut progress_cb,
                RunStage::Simulating,
                started,
                None,
                Some(MeshblockProgress {
                    completed,
                    total,
                    fraction_complete: completed as f64 / total.max(1) as f64,
                    households,
                    ignitions,
                }),
            );
        },
    )?;
    timing.simulate_time_s = simulate_start.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        RunStage::SavingResults,
        started,
        Some("Saving results".to_string()),
        None,
    );

    let save_start = Instant::now();
    let manifest = RunManifest {
        run_id: run_id.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        model_version: request.options.model_version.clone(),
        city_data: request.city_data.display().to_string(),
        weather_data: request.weather_data.display().to_string(),
        timesteps: weather.len(),
        seed,
        meshblocks: total,
        households: simulation.households,
        ignitions: simulation.ignitions,
        total_emissions: ledger.total(),
        misses: ledger.misses(),
    };
    let store = RunStore::new(request.outdir.to_path_buf())?;
    store.save_run(
        &manifest,
        &city.table,
        &simulation.scaled_emissions,
        &HourlyRecord::from_ledger(&ledger),
    )?;
    timing.save_time_s = save_start.elapsed().as_secs_f64();

    let misses = ledger.misses();
    if misses.total() > 0 {
        info!(
            temperature_bin = misses.temperature_bin,
            ignition_hour = misses.ignition_hour,
            segment = misses.segment,
            ledger_key = misses.ledger_key,
            "recovered misses"
        );
    }

    timing.total_time_s = started.elapsed().as_secs_f64();
    timing.meshblocks = total;
    timing.households = simulation.households;
    timing.ignitions = simulation.ignitions;

    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        Some("Run completed".to_string()),
        None,
    );

    Ok(RunResponse {
        run_id,
        manifest,
        outdir: request.outdir.to_path_buf(),
        scaled_emissions: simulation.scaled_emissions,
        ledger,
        timing,
    })
}

/// Load a persisted run's manifest and hourly ledger.
pub fn load_run(outdir: &Path) -> AppResult<(RunManifest, Vec<HourlyRecord>)> {
    let store = RunStore::open(outdir)?;
    let manifest = store.load_manifest()?;
    let hourly = store.load_hourly()?;
    Ok((manifest, hourly))
}

/// Load a persisted run's manifest and rebuild its ledger.
pub fn load_run_ledger(outdir: &Path) -> AppResult<(RunManifest, EmissionsLedger)> {
    let (manifest, hourly) = load_run(outdir)?;
    Ok((manifest, HourlyRecord::into_ledger(&hourly)))
}
