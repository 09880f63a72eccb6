//! Fire-lighting behaviour of one household.
//!
//! A household has a usual lighting hour, a spread around that hour and a
//! usual lighting temperature, all drawn at construction. It walks the city
//! weather series one timestep at a time and decides whether its fire is lit.

use tracing::{debug, trace};
use ws_core::Real;
use ws_core::time::hour_of;

use crate::burner::BurnerType;
use crate::error::ModelResult;
use crate::ignition::{TemperatureGate, build_tables, round_temperature};
use crate::ledger::{EmissionsLedger, MissKind};
use crate::random::RandomSource;
use crate::weather::WeatherStep;
use crate::woodburner::Woodburner;

/// Usual lighting hour is drawn from `[16, 23)`.
pub const IGNITION_HOUR_RANGE: (i64, i64) = (16, 23);
/// Hour spread is drawn from `[1, 3)`.
pub const HOUR_SPREAD_RANGE: (i64, i64) = (1, 3);
/// Usual lighting temperature (°C) is drawn from `[0, 8)`.
pub const IGNITION_TEMPERATURE_RANGE: (i64, i64) = (0, 8);

#[derive(Debug, Clone)]
pub struct Household {
    pub burner_type: BurnerType,
    /// Area of the owning meshblock (m^2).
    pub area: Real,
    pub mean_ignition_hour: i64,
    /// Starts as an integer draw and shrinks as ignition tables are built.
    pub ignition_hour_spread: Real,
    pub mean_ignition_temperature: i64,
    pub emissions: Real,
    pub ignitions: usize,
}

impl Household {
    pub fn new(burner_type: BurnerType, area: Real, rng: &mut dyn RandomSource) -> Self {
        let mean_ignition_hour = rng.randrange(IGNITION_HOUR_RANGE.0, IGNITION_HOUR_RANGE.1);
        let ignition_hour_spread = rng.randrange(HOUR_SPREAD_RANGE.0, HOUR_SPREAD_RANGE.1) as Real;
        let mean_ignition_temperature =
            rng.randrange(IGNITION_TEMPERATURE_RANGE.0, IGNITION_TEMPERATURE_RANGE.1);
        Self {
            burner_type,
            area,
            mean_ignition_hour,
            ignition_hour_spread,
            mean_ignition_temperature,
            emissions: 0.0,
            ignitions: 0,
        }
    }

    /// Scan every timestep except the last (each decision looks ahead to the
    /// next timestamp) and return the accumulated emissions.
    pub fn simulate(
        &mut self,
        weather: &[WeatherStep],
        ledger: &mut EmissionsLedger,
        rng: &mut dyn RandomSource,
    ) -> ModelResult<Real> {
        for pair in weather.windows(2) {
            let (step, next) = (&pair[0], &pair[1]);
            self.step(step, next, ledger, rng)?;
        }
        debug!(
            burner = self.burner_type.number(),
            mean_hour = self.mean_ignition_hour,
            ignitions = self.ignitions,
            emissions = self.emissions,
            "household finished"
        );
        Ok(self.emissions)
    }

    fn step(
        &mut self,
        step: &WeatherStep,
        next: &WeatherStep,
        ledger: &mut EmissionsLedger,
        rng: &mut dyn RandomSource,
    ) -> ModelResult<()> {
        let hour = hour_of(&step.time);
        let tables = build_tables(self.mean_ignition_hour as Real, &mut self.ignition_hour_spread);
        // drawn before the gate, even when the step is skipped
        let compval = rng.uniform();
        let rounded = round_temperature(step.celsius());

        let table = match TemperatureGate::classify(rounded) {
            TemperatureGate::TooWarm => return Ok(()),
            TemperatureGate::NoBin => {
                trace!(time = %step.time, rounded, "no ignition table for temperature");
                ledger.record_miss(MissKind::TemperatureBin);
                return Ok(());
            }
            TemperatureGate::Bin(bin) => &tables[bin],
            TemperatureGate::Freezing => &tables[0],
        };

        let Some(probability) = table.probability(hour) else {
            trace!(time = %step.time, hour, "hour outside ignition window");
            ledger.record_miss(MissKind::IgnitionHour);
            return Ok(());
        };

        if compval < probability || rounded < 0 {
            let burner = Woodburner::new(self.burner_type, step.time);
            let area = burner.pollute(step.time, next.time, ledger)?;
            self.emissions += area;
            self.ignitions += 1;

            let booked = ledger.lookup(&step.time);
            trace!(
                time = %step.time,
                area,
                booked,
                per_m2 = self.emissions / self.area,
                "fire lit"
            );
        }
        Ok(())
    }
}
