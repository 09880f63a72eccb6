//! Meshblock aggregation.

use tracing::debug;
use ws_core::{Area, Real, area_m2};

use crate::burner::BurnerType;
use crate::error::{ModelError, ModelResult};
use crate::household::Household;
use crate::ledger::EmissionsLedger;
use crate::random::RandomSource;
use crate::weather::WeatherStep;

/// One row of the meshblock attributes table.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshblockSpec {
    /// Row position in the input table.
    pub index: usize,
    pub latitude: Real,
    pub longitude: Real,
    pub area: Area,
    /// Household counts per burner type, in `BurnerType::ALL` order.
    pub counts: [u32; 3],
}

impl MeshblockSpec {
    pub fn households(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }
}

/// Simulated meshblock. Households are dropped once their emissions are
/// summed; only the totals are kept.
#[derive(Debug, Clone)]
pub struct Meshblock {
    pub spec: MeshblockSpec,
    pub households: u64,
    /// Summed household emissions per burner type, in `BurnerType::ALL` order.
    pub emissions_by_type: [Real; 3],
    pub total_emissions: Real,
    /// `total_emissions / area`.
    pub scaled_emissions: Real,
    pub ignitions: usize,
}

impl Meshblock {
    /// Build and simulate every household of `spec`, type by type.
    pub fn simulate(
        spec: MeshblockSpec,
        weather: &[WeatherStep],
        ledger: &mut EmissionsLedger,
        rng: &mut dyn RandomSource,
    ) -> ModelResult<Self> {
        let area = area_m2(spec.area);
        if !(area.is_finite() && area > 0.0) {
            return Err(ModelError::InvalidArea {
                index: spec.index,
                area_m2: area,
            });
        }

        let mut households = 0u64;
        let mut emissions_by_type = [0.0; 3];
        let mut ignitions = 0;
        for ((burner_type, &count), type_total) in BurnerType::ALL
            .iter()
            .zip(spec.counts.iter())
            .zip(emissions_by_type.iter_mut())
        {
            for _ in 0..count {
                let mut household = Household::new(*burner_type, area, rng);
                *type_total += household.simulate(weather, ledger, rng)?;
                ignitions += household.ignitions;
                households += 1;
            }
        }
        let total_emissions: Real = emissions_by_type.iter().sum();

        let scaled_emissions = total_emissions / area;
        debug!(
            index = spec.index,
            households,
            ignitions,
            total_emissions,
            scaled_emissions,
            "meshblock simulated"
        );

        Ok(Self {
            spec,
            households,
            emissions_by_type,
            total_emissions,
            scaled_emissions,
            ignitions,
        })
    }

    /// Undo the area normalisation.
    pub fn unscaled(&self) -> Real {
        self.scaled_emissions * area_m2(self.spec.area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use ws_core::{m2, parse_timestamp};

    fn spec(area: f64, counts: [u32; 3]) -> MeshblockSpec {
        MeshblockSpec {
            index: 4,
            latitude: -43.5,
            longitude: 172.6,
            area: m2(area),
            counts,
        }
    }

    fn cold_evening() -> Vec<WeatherStep> {
        ["2019-06-01 17:00:00", "2019-06-01 18:00:00", "2019-06-01 19:00:00"]
            .iter()
            .map(|t| WeatherStep::new(parse_timestamp(t).unwrap(), -2.0))
            .collect()
    }

    #[test]
    fn zero_area_is_rejected() {
        let mut ledger = EmissionsLedger::new();
        let mut rng = ScriptedRandom::default();
        let err = Meshblock::simulate(spec(0.0, [1, 0, 0]), &cold_evening(), &mut ledger, &mut rng)
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidArea { index: 4, .. }));
    }

    #[test]
    fn households_are_built_per_type() {
        let mut ledger = EmissionsLedger::new();
        let mut rng = ScriptedRandom::new(vec![0.5], vec![18, 1, 3]);
        let mb =
            Meshblock::simulate(spec(2000.0, [2, 0, 3]), &cold_evening(), &mut ledger, &mut rng)
                .unwrap();
        assert_eq!(mb.households, 5);
        assert!(mb.emissions_by_type[0] > 0.0);
        assert_eq!(mb.emissions_by_type[1], 0.0);
        assert!(mb.emissions_by_type[2] > 0.0);
        assert_eq!(mb.total_emissions, mb.emissions_by_type.iter().sum::<Real>());
        // freezing weather lights every household at both evaluated steps
        assert_eq!(mb.ignitions, 10);
        assert!((mb.scaled_emissions - mb.total_emissions / 2000.0).abs() < 1e-15);
    }

    #[test]
    fn large_counts_keep_only_totals() {
        let mut ledger = EmissionsLedger::new();
        let mut rng = ScriptedRandom::new(vec![0.5], vec![18, 1, 3]);
        let warm: Vec<WeatherStep> = cold_evening()
            .into_iter()
            .map(|w| WeatherStep::new(w.time, 15.0))
            .collect();
        let mb = Meshblock::simulate(spec(50.0, [20_000, 0, 0]), &warm, &mut ledger, &mut rng)
            .unwrap();
        assert_eq!(mb.households, 20_000);
        assert_eq!(mb.ignitions, 0);
        assert_eq!(mb.total_emissions, 0.0);
        // one uniform draw per household per evaluated step
        assert_eq!(rng.uniform_draws(), 40_000);
    }

    #[test]
    fn empty_meshblock_emits_nothing() {
        let mut ledger = EmissionsLedger::new();
        let mut rng = ScriptedRandom::default();
        let mb = Meshblock::simulate(spec(10.0, [0, 0, 0]), &cold_evening(), &mut ledger, &mut rng)
            .unwrap();
        assert_eq!(mb.scaled_emissions, 0.0);
        assert!(ledger.is_empty());
    }
}
