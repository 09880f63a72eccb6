use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use ws_app::{
    AppError, AppResult, GenerateRequest, QuerySession, RunOptions, RunProgressEvent, RunRequest,
    RunStage, WeatherPrepRequest, project_service, query, run_service,
};
use ws_core::format_timestamp;
use ws_model::{BurnerType, EmissionsLedger};

#[derive(Parser)]
#[command(name = "ws-cli")]
#[command(about = "Woodsmoke CLI - bottom-up household woodburner emissions model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a run definition and summarize its inputs
    Validate {
        /// Path to the run definition YAML file
        run_path: PathBuf,
    },
    /// Run the model
    #[command(subcommand)]
    Run(RunCommands),
    /// Query the emissions of a finished run
    Query {
        /// Output directory of the run
        outdir: PathBuf,
        /// Start of the range (YYYY-MM-DD HH:MM:SS); prompts when omitted
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// End of the range, inclusive
        #[arg(long, requires = "start")]
        end: Option<String>,
    },
    /// Generate a synthetic city_data.csv and README.txt
    Generate {
        /// Directory to write into
        outdir: PathBuf,
        /// Number of meshblocks
        #[arg(long, default_value_t = 50)]
        meshblocks: usize,
        /// Seed for the generator
        #[arg(long)]
        seed: Option<u64>,
        /// Raw weather table to prepare alongside the city data
        #[arg(long)]
        weather_source: Option<PathBuf>,
        /// Temperature column in the raw weather table
        #[arg(long, default_value = "air_temperature")]
        variable: String,
        /// Raw temperatures are already in Celsius
        #[arg(long)]
        celsius: bool,
    },
    /// Resample raw weather observations to an hourly weather.csv
    PrepareWeather {
        /// Raw weather table
        source: PathBuf,
        /// Output file
        #[arg(short, long, default_value = "weather.csv")]
        output: PathBuf,
        /// Timestamp column in the raw table
        #[arg(long, default_value = "time")]
        time_column: String,
        /// Temperature column in the raw table
        #[arg(long, default_value = "air_temperature")]
        variable: String,
        /// Raw temperatures are already in Celsius
        #[arg(long)]
        celsius: bool,
    },
    /// Sample the emission-rate curve of one fire
    Profile {
        /// Burner type (1-3)
        #[arg(long, default_value_t = 1)]
        burner: u8,
        /// Hour the fire is lit (0-23)
        #[arg(long, default_value_t = 16)]
        start_hour: u32,
        /// Samples per curve segment
        #[arg(long, default_value_t = ws_core::DEFAULT_SAMPLES)]
        samples: usize,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum RunCommands {
    /// Run from input tables given on the command line
    Inputs {
        /// Meshblock attributes table
        city_data: PathBuf,
        /// Hourly weather table
        weather_data: PathBuf,
        /// Output directory
        #[arg(long, default_value = "output")]
        outdir: PathBuf,
        /// Number of weather rows to simulate
        #[arg(long)]
        timesteps: usize,
        /// Seed for the random stream
        #[arg(long)]
        seed: Option<u64>,
        /// Query the ledger interactively after the run
        #[arg(long)]
        interactive: bool,
    },
    /// Run from a run definition YAML file
    Config {
        /// Path to the run definition YAML file
        run_path: PathBuf,
        /// Override the seed in the file
        #[arg(long)]
        seed: Option<u64>,
        /// Query the ledger interactively after the run
        #[arg(long)]
        interactive: bool,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { run_path } => cmd_validate(&run_path),
        Commands::Run(run_cmd) => match run_cmd {
            RunCommands::Inputs {
                city_data,
                weather_data,
                outdir,
                timesteps,
                seed,
                interactive,
            } => {
                let request = RunRequest {
                    city_data: &city_data,
                    weather_data: &weather_data,
                    outdir: &outdir,
                    timesteps,
                    options: RunOptions {
                        seed,
                        ..RunOptions::default()
                    },
                };
                cmd_run(&request, interactive)
            }
            RunCommands::Config {
                run_path,
                seed,
                interactive,
            } => {
                let def = project_service::load_definition(&run_path)?;
                let mut request = RunRequest::from_definition(&def);
                if seed.is_some() {
                    request.options.seed = seed;
                }
                cmd_run(&request, interactive)
            }
        },
        Commands::Query { outdir, start, end } => cmd_query(&outdir, start, end),
        Commands::Generate {
            outdir,
            meshblocks,
            seed,
            weather_source,
            variable,
            celsius,
        } => cmd_generate(outdir, meshblocks, seed, weather_source, variable, celsius),
        Commands::PrepareWeather {
            source,
            output,
            time_column,
            variable,
            celsius,
        } => {
            let request = WeatherPrepRequest {
                source,
                output,
                time_column,
                variable,
                kelvin: !celsius,
            };
            cmd_prepare_weather(&request)
        }
        Commands::Profile {
            burner,
            start_hour,
            samples,
            output,
        } => cmd_profile(burner, start_hour, samples, output.as_deref()),
    }
}

fn cmd_validate(run_path: &Path) -> AppResult<()> {
    println!("Validating run definition: {}", run_path.display());
    let def = project_service::load_definition(run_path)?;
    let summary = project_service::summarize_inputs(&def)?;
    println!("✓ Run definition is valid");
    println!("  Meshblocks: {}", summary.meshblocks);
    println!("  Households: {}", summary.households);
    println!("  Weather rows used: {}", summary.weather_rows);
    if let (Some(first), Some(last)) = (summary.first_time, summary.last_time) {
        println!(
            "  Weather span: {} - {}",
            format_timestamp(&first),
            format_timestamp(&last)
        );
    }
    Ok(())
}

fn cmd_run(request: &RunRequest, interactive: bool) -> AppResult<()> {
    println!(
        "Running {} timesteps: {} x {}",
        request.timesteps,
        request.city_data.display(),
        request.weather_data.display()
    );

    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let response = run_service::run_with_progress(
        request,
        Some(&mut |event| {
            let fraction = event
                .meshblocks
                .as_ref()
                .map(|m| m.fraction_complete)
                .unwrap_or(-1.0);
            let emit_now = (fraction >= 0.0 && (fraction - last_fraction).abs() >= 0.005)
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                if fraction >= 0.0 {
                    last_fraction = fraction;
                }
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    println!("✓ Simulation completed: {}", response.run_id);
    println!("  Seed: {}", response.manifest.seed);
    println!("  Output: {}", response.outdir.display());
    print_timing_summary(&response.timing);

    let misses = response.manifest.misses;
    if misses.total() > 0 {
        println!("\nRecovered misses:");
        println!("  No temperature table: {}", misses.temperature_bin);
        println!("  Hour outside window:  {}", misses.ignition_hour);
        println!("  No curve segment:     {}", misses.segment);
        println!("  Absent ledger key:    {}", misses.ledger_key);
    }

    if interactive {
        run_query_session(&response.ledger)?;
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (event.stage, &event.meshblocks) {
        (RunStage::Simulating, Some(m)) => {
            let width = 28usize;
            let filled = ((m.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  meshblock={}/{}  households={}  ignitions={}  elapsed={:.1}s",
                bar,
                m.fraction_complete * 100.0,
                m.completed,
                m.total,
                m.households,
                m.ignitions,
                event.elapsed_wall_s
            );
            let _ = io::stdout().flush();
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
            let _ = io::stdout().flush();
        }
    }
}

fn print_timing_summary(timing: &ws_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);
    let load_pct = 100.0 * timing.load_time_s / total;
    let simulate_pct = 100.0 * timing.simulate_time_s / total;
    let save_pct = 100.0 * timing.save_time_s / total;

    println!("\nTiming summary:");
    println!("  Load:     {:.3}s ({:.1}%)", timing.load_time_s, load_pct);
    println!(
        "  Simulate: {:.3}s ({:.1}%)",
        timing.simulate_time_s, simulate_pct
    );
    println!("  Save:     {:.3}s ({:.1}%)", timing.save_time_s, save_pct);
    println!("  Total:    {:.3}s", timing.total_time_s);
    println!("  Meshblocks: {}", timing.meshblocks);
    println!("  Households: {}", timing.households);
    println!("  Ignitions:  {}", timing.ignitions);
}

fn run_query_session(ledger: &EmissionsLedger) -> AppResult<()> {
    let stdin = io::stdin();
    let stats = QuerySession::new(ledger).run(stdin.lock(), io::stdout())?;
    println!(
        "Answered {} queries ({} invalid)",
        stats.answered, stats.invalid
    );
    Ok(())
}

fn cmd_query(outdir: &Path, start: Option<String>, end: Option<String>) -> AppResult<()> {
    let (manifest, ledger) = run_service::load_run_ledger(outdir)?;

    match (start, end) {
        (Some(start), Some(end)) => {
            let emissions = query::sum_between(&ledger, &start, &end)?;
            println!("The emissions between {start} and {end} are: {emissions}");
        }
        _ => {
            println!("Loaded run {} ({} timesteps)", manifest.run_id, manifest.timesteps);
            run_query_session(&ledger)?;
        }
    }
    Ok(())
}

fn cmd_generate(
    outdir: PathBuf,
    meshblocks: usize,
    seed: Option<u64>,
    weather_source: Option<PathBuf>,
    variable: String,
    celsius: bool,
) -> AppResult<()> {
    let response = ws_app::generate_inputs(&GenerateRequest {
        outdir: outdir.clone(),
        meshblocks,
        seed,
    })?;
    println!(
        "✓ Generated {} meshblocks (seed {}) in {}",
        meshblocks,
        response.seed,
        response.city_data.display()
    );
    println!("  Instructions: {}", response.readme.display());

    if let Some(source) = weather_source {
        let mut request =
            WeatherPrepRequest::new(source, outdir.join(ws_app::weather_prep::WEATHER_FILE));
        request.variable = variable;
        request.kelvin = !celsius;
        cmd_prepare_weather(&request)?;
    }
    println!("Finished generating input files in directory: {}", outdir.display());
    Ok(())
}

fn cmd_prepare_weather(request: &WeatherPrepRequest) -> AppResult<()> {
    let response = ws_app::prepare_weather(request)?;
    println!(
        "✓ Wrote {} hourly rows from {} observations to {}",
        response.hours,
        response.observations,
        response.output.display()
    );
    if response.gaps > 0 {
        println!("  Hours without observations: {}", response.gaps);
    }
    if response.skipped > 0 {
        println!("  Rows without a temperature: {}", response.skipped);
    }
    Ok(())
}

fn cmd_profile(burner: u8, start_hour: u32, samples: usize, output: Option<&Path>) -> AppResult<()> {
    let burner_type =
        BurnerType::from_number(burner).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let profile = ws_app::emission_profile(burner_type, start_hour, samples)?;
    let csv = ws_app::profile_csv(&profile);

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} profile points to {}",
            profile.points.len(),
            path.display()
        );
        println!("  Burn time: {:.2} h", profile.burn_time_hours);
        println!("  Wood burnt: {:.3} kg", profile.burnt_wood_kg);
        println!("  Fuel emissions: {:.3} g", profile.fuel_emissions);
        for (segment, area) in &profile.segment_areas {
            println!("  {:<22} {:.6}", segment.label(), area);
        }
    } else {
        print!("{}", csv);
    }

    Ok(())
}
