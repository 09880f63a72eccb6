//! Ignition probability tables.
//!
//! A household's chance of having lit its fire by a given hour is the normal
//! CDF around its usual lighting hour. One table is built per whole-degree
//! temperature bin 0..=8 °C, and the household's hour spread shrinks by
//! [`SPREAD_DECAY`] after each bin, so colder bins see a wider spread.

use std::collections::BTreeMap;

use statrs::distribution::{ContinuousCDF, Normal};

/// Hours at which a fire may be lit. 17 appears twice; the second entry
/// rewrites the same probability and has no effect.
pub const CANDIDATE_HOURS: [u32; 8] = [15, 16, 17, 17, 18, 19, 20, 21];

pub const TEMPERATURE_BINS: usize = 9;

pub const SPREAD_DECAY: f64 = 0.05;

/// Rounded temperatures above this never light a fire.
pub const MAX_IGNITION_TEMPERATURE: i64 = 9;

/// `hour -> P(ignited by hour)` for one temperature bin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IgnitionTable {
    probabilities: BTreeMap<u32, f64>,
}

impl IgnitionTable {
    pub fn build(mean_hour: f64, spread: f64) -> Self {
        let scale = spread * spread;
        let mut probabilities = BTreeMap::new();
        for hour in CANDIDATE_HOURS {
            probabilities.insert(hour, normal_cdf(hour as f64, mean_hour, scale));
        }
        Self { probabilities }
    }

    pub fn probability(&self, hour: u32) -> Option<f64> {
        self.probabilities.get(&hour).copied()
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }
}

/// Build the tables for bins 0..=8, decaying `spread` after each one.
pub fn build_tables(mean_hour: f64, spread: &mut f64) -> Vec<IgnitionTable> {
    let mut tables = Vec::with_capacity(TEMPERATURE_BINS);
    for _ in 0..TEMPERATURE_BINS {
        tables.push(IgnitionTable::build(mean_hour, *spread));
        *spread -= SPREAD_DECAY;
    }
    tables
}

/// Normal CDF with standard deviation `scale`.
///
/// A zero (or non-finite) scale collapses to a step at `mean`.
pub fn normal_cdf(x: f64, mean: f64, scale: f64) -> f64 {
    match Normal::new(mean, scale) {
        Ok(dist) if scale > 0.0 && scale.is_finite() => dist.cdf(x),
        _ if x >= mean => 1.0,
        _ => 0.0,
    }
}

/// Round half to even, so 0.5 goes to 0 and 1.5 to 2.
pub fn round_temperature(celsius: f64) -> i64 {
    celsius.round_ties_even() as i64
}

/// What the rounded city temperature allows this timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureGate {
    /// Above [`MAX_IGNITION_TEMPERATURE`]: nobody lights a fire.
    TooWarm,
    /// No table for this temperature: exactly 9 °C, or colder than
    /// `-TEMPERATURE_BINS` °C.
    NoBin,
    /// Use the table for this bin.
    Bin(usize),
    /// -1 to -9 °C: ignition is forced at any candidate hour.
    Freezing,
}

impl TemperatureGate {
    pub fn classify(rounded: i64) -> Self {
        if rounded > MAX_IGNITION_TEMPERATURE {
            TemperatureGate::TooWarm
        } else if rounded < -(TEMPERATURE_BINS as i64) {
            TemperatureGate::NoBin
        } else if rounded < 0 {
            TemperatureGate::Freezing
        } else if (rounded as usize) < TEMPERATURE_BINS {
            TemperatureGate::Bin(rounded as usize)
        } else {
            TemperatureGate::NoBin
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_hour_is_a_no_op() {
        let table = IgnitionTable::build(18.0, 2.0);
        assert_eq!(table.len(), 7);
        assert!(table.probability(17).is_some());
        assert!(table.probability(14).is_none());
        assert!(table.probability(22).is_none());
    }

    #[test]
    fn cdf_is_half_at_mean() {
        let table = IgnitionTable::build(18.0, 1.0);
        assert!((table.probability(18).unwrap() - 0.5).abs() < 1e-12);
        assert!(table.probability(15).unwrap() < table.probability(21).unwrap());
    }

    #[test]
    fn spread_decays_per_bin() {
        let mut spread = 2.0;
        let tables = build_tables(19.0, &mut spread);
        assert_eq!(tables.len(), TEMPERATURE_BINS);
        assert!((spread - (2.0 - 9.0 * SPREAD_DECAY)).abs() < 1e-12);
        // a narrower spread pulls early hours further from the mean
        assert!(tables[8].probability(16).unwrap() < tables[0].probability(16).unwrap());
    }

    #[test]
    fn zero_scale_is_a_step() {
        assert_eq!(normal_cdf(17.0, 18.0, 0.0), 0.0);
        assert_eq!(normal_cdf(18.0, 18.0, 0.0), 1.0);
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round_temperature(0.5), 0);
        assert_eq!(round_temperature(1.5), 2);
        assert_eq!(round_temperature(2.5), 2);
        assert_eq!(round_temperature(-0.5), 0);
        assert_eq!(round_temperature(-0.6), -1);
        assert_eq!(round_temperature(9.4), 9);
    }

    #[test]
    fn gate_classification() {
        assert_eq!(TemperatureGate::classify(10), TemperatureGate::TooWarm);
        assert_eq!(TemperatureGate::classify(9), TemperatureGate::NoBin);
        assert_eq!(TemperatureGate::classify(8), TemperatureGate::Bin(8));
        assert_eq!(TemperatureGate::classify(0), TemperatureGate::Bin(0));
        assert_eq!(TemperatureGate::classify(-1), TemperatureGate::Freezing);
        assert_eq!(TemperatureGate::classify(-9), TemperatureGate::Freezing);
        assert_eq!(TemperatureGate::classify(-10), TemperatureGate::NoBin);
        assert_eq!(TemperatureGate::classify(-25), TemperatureGate::NoBin);
    }
}
