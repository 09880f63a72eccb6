//! Run definition validation.

use std::path::Path;

use crate::schema::RunDefinition;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing input: {field} -> {path}")]
    MissingInput { field: String, path: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// Structural checks that do not touch the filesystem.
pub fn validate_run(def: &RunDefinition) -> Result<(), ValidationError> {
    if def.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: def.version,
        });
    }
    if def.timesteps == 0 {
        return Err(ValidationError::InvalidValue {
            field: "timesteps".to_string(),
            value: "0".to_string(),
            reason: "at least one weather row is needed".to_string(),
        });
    }
    for (field, path) in [
        ("city_data", &def.city_data),
        ("weather_data", &def.weather_data),
        ("outdir", &def.outdir),
    ] {
        if path.as_os_str().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: String::new(),
                reason: "path is empty".to_string(),
            });
        }
    }
    Ok(())
}

/// Check that both input tables exist.
pub fn validate_inputs_exist(def: &RunDefinition) -> Result<(), ValidationError> {
    check_file("city_data", &def.city_data)?;
    check_file("weather_data", &def.weather_data)
}

fn check_file(field: &str, path: &Path) -> Result<(), ValidationError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ValidationError::MissingInput {
            field: field.to_string(),
            path: path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn def(timesteps: usize) -> RunDefinition {
        RunDefinition::new(
            PathBuf::from("city.csv"),
            PathBuf::from("weather.csv"),
            PathBuf::from("out"),
            timesteps,
        )
    }

    #[test]
    fn zero_timesteps_rejected() {
        assert!(matches!(
            validate_run(&def(0)),
            Err(ValidationError::InvalidValue { .. })
        ));
        assert!(validate_run(&def(1)).is_ok());
    }

    #[test]
    fn future_version_rejected() {
        let mut d = def(4);
        d.version = crate::LATEST_VERSION + 1;
        assert!(matches!(
            validate_run(&d),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn empty_path_rejected() {
        let mut d = def(4);
        d.outdir = PathBuf::new();
        assert!(validate_run(&d).is_err());
    }

    #[test]
    fn missing_inputs_reported() {
        let mut d = def(4);
        d.city_data = std::env::temp_dir().join("ws_project_no_such_city.csv");
        let err = validate_inputs_exist(&d).unwrap_err();
        assert!(matches!(err, ValidationError::MissingInput { ref field, .. } if field == "city_data"));
    }
}
