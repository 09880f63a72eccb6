//! Burner archetypes.
//!
//! Each archetype pairs a wood type with an authorised appliance:
//!
//! | type | wood                | appliance                        | g/kg | min/kg | steady PM |
//! |------|---------------------|----------------------------------|------|--------|-----------|
//! | 1    | seasoned radiata    | Froling S4 Turbo 15              | 2.6  | 169    | 0.31      |
//! | 2    | seasoned macrocarpa | Bionic Fire Studio               | 1.9  | 148    | 0.50      |
//! | 3    | seasoned blue gum   | Masport Cromwell                 | 1.6  | 173    | 0.47      |

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BurnerType {
    Radiata,
    Macrocarpa,
    BlueGum,
}

/// Constant parameters of one archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnerArchetype {
    /// Appliance emission factor; the steady-burn emission rate.
    pub woodburner_emission_factor: f64,
    /// Emissions per kilogram of this wood (g/kg).
    pub wood_emission_factor: f64,
    /// Minutes one kilogram of this wood burns for.
    pub burn_minutes_per_kg: f64,
}

impl BurnerType {
    pub const ALL: [BurnerType; 3] = [BurnerType::Radiata, BurnerType::Macrocarpa, BurnerType::BlueGum];

    /// 1-based archetype number used by the input tables.
    pub fn number(self) -> u8 {
        match self {
            BurnerType::Radiata => 1,
            BurnerType::Macrocarpa => 2,
            BurnerType::BlueGum => 3,
        }
    }

    pub fn from_number(n: u8) -> ModelResult<Self> {
        match n {
            1 => Ok(BurnerType::Radiata),
            2 => Ok(BurnerType::Macrocarpa),
            3 => Ok(BurnerType::BlueGum),
            _ => Err(ModelError::InvalidArg {
                what: "burner type must be 1, 2 or 3",
            }),
        }
    }

    pub fn archetype(self) -> BurnerArchetype {
        match self {
            BurnerType::Radiata => BurnerArchetype {
                woodburner_emission_factor: 0.31,
                wood_emission_factor: 2.6,
                burn_minutes_per_kg: 169.0,
            },
            BurnerType::Macrocarpa => BurnerArchetype {
                woodburner_emission_factor: 0.50,
                wood_emission_factor: 1.9,
                burn_minutes_per_kg: 148.0,
            },
            BurnerType::BlueGum => BurnerArchetype {
                woodburner_emission_factor: 0.47,
                wood_emission_factor: 1.6,
                burn_minutes_per_kg: 173.0,
            },
        }
    }
}
