//! Content-based hashing for run IDs.

use sha2::{Digest, Sha256};

/// Digest of everything that determines a run's output.
pub fn compute_run_id(
    city_data: &[u8],
    weather_data: &[u8],
    timesteps: usize,
    seed: u64,
    model_version: &str,
) -> String {
    let mut hasher = Sha256::new();

    hasher.update((city_data.len() as u64).to_le_bytes());
    hasher.update(city_data);
    hasher.update((weather_data.len() as u64).to_le_bytes());
    hasher.update(weather_data);
    hasher.update((timesteps as u64).to_le_bytes());
    hasher.update(seed.to_le_bytes());
    hasher.update(model_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
