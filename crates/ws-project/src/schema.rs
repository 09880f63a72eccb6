//! Run definition file format.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A simulation run as written in YAML.
///
/// ```yaml
/// version: 1
/// name: christchurch-june
/// city_data: inputs/city_data.csv
/// weather_data: inputs/weather.csv
/// outdir: out
/// timesteps: 720
/// seed: 2019
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDefinition {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub city_data: PathBuf,
    pub weather_data: PathBuf,
    #[serde(default = "default_outdir")]
    pub outdir: PathBuf,
    pub timesteps: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_version() -> u32 {
    crate::LATEST_VERSION
}

fn default_outdir() -> PathBuf {
    PathBuf::from("out")
}

impl RunDefinition {
    pub fn new(city_data: PathBuf, weather_data: PathBuf, outdir: PathBuf, timesteps: usize) -> Self {
        Self {
            version: crate::LATEST_VERSION,
            name: None,
            city_data,
            weather_data,
            outdir,
            timesteps,
            seed: None,
        }
    }

    /// Make relative paths relative to `base` instead of the working directory.
    pub fn resolve_paths(&mut self, base: &Path) {
        for p in [&mut self.city_data, &mut self.weather_data, &mut self.outdir] {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }
}
