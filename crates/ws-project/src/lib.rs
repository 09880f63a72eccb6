//! ws-project: run definition format and input tables.

pub mod inputs;
pub mod schema;
pub mod table;
pub mod validate;

pub use inputs::{MeshblockRow, MeshblockTable, WeatherRow, load_weather};
pub use schema::RunDefinition;
pub use table::CsvTable;
pub use validate::{ValidationError, validate_inputs_exist, validate_run};

pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("CSV error in {path} line {line}: {message}")]
    Csv {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Missing column {column:?} in {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("Invalid value {value:?} in column {column:?} at row {row}")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Weather data has {available} rows but {requested} timesteps were requested")]
    ShortWeather { available: usize, requested: usize },

    #[error("Core error: {0}")]
    Core(#[from] ws_core::WsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Load a run definition, resolving relative paths against the file's
/// directory, and check that its inputs exist.
pub fn load_yaml(path: &std::path::Path) -> ProjectResult<RunDefinition> {
    let content = std::fs::read_to_string(path)?;
    let mut def: RunDefinition = serde_yaml::from_str(&content)?;
    validate_run(&def)?;
    if let Some(base) = path.parent() {
        def.resolve_paths(base);
    }
    validate_inputs_exist(&def)?;
    Ok(def)
}

pub fn save_yaml(path: &std::path::Path, def: &RunDefinition) -> ProjectResult<()> {
    validate_run(def)?;
    let content = serde_yaml::to_string(def)?;
    std::fs::write(path, content)?;
    Ok(())
}
