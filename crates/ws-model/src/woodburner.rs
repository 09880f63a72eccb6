//! Emission-rate curve of a single fire.
//!
//! A fire lit at `start_hour` burns until 22:00. Its PM2.5 emission rate is a
//! five-piece curve over that window:
//!
//! ```text
//!  rate
//!   |                              E
//!   |           B                 / \
//!   |          / \               /   \
//!   |         /   C_____________D     \
//!   |        /                         \
//!   |______A/___________________________\F____ hour
//!          start evap  evap_steady  steady  damp_time  smolder
//! ```
//!
//! A→B evaporation, B→C evaporation to steady burn, C→D steady burn,
//! D→E manual dampening, E→F smoulder to extinction. B is `3 × steady_pm`,
//! E is `4 × steady_pm`. The windows take 1/6, 1/6, 2/6, 1/6 and 1/6 of the
//! burn time.

use tracing::{trace, warn};
use ws_core::{
    DEFAULT_SAMPLES, Real, Timestamp, hours, linspace, minutes_of, trapezoid, trapezoid_over_span,
};

use crate::burner::BurnerType;
use crate::error::ModelResult;
use crate::ledger::{EmissionsLedger, MissKind};
use crate::parabola::Parabola;

/// Hour of day at which every fire is put out.
pub const EXTINGUISH_HOUR: u32 = 22;

/// Share of the burn time spent in each segment, in order.
pub const SEGMENT_FRACTIONS: [Real; 5] = [1.0 / 6.0, 1.0 / 6.0, 2.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Evaporation,
    EvaporationToSteady,
    Steady,
    Dampening,
    Smolder,
}

impl Segment {
    pub const ALL: [Segment; 5] = [
        Segment::Evaporation,
        Segment::EvaporationToSteady,
        Segment::Steady,
        Segment::Dampening,
        Segment::Smolder,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Segment::Evaporation => "evaporation",
            Segment::EvaporationToSteady => "evaporation_to_steady",
            Segment::Steady => "steady",
            Segment::Dampening => "dampening",
            Segment::Smolder => "smolder",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Woodburner {
    pub burner_type: BurnerType,
    pub start_time: Timestamp,
    /// Whole hour of day the fire was lit.
    pub start_hour: Real,
    pub burn_time_hours: Real,
    /// Mass of wood consumed over the burn (kg).
    pub burnt_wood_kg: Real,
    /// Emissions attributable to the wood alone (g).
    pub fuel_emissions: Real,

    pub evap: Real,
    pub max_evap: Real,
    pub evap_steady: Real,
    pub steady: Real,
    pub steady_pm: Real,
    pub max_damp: Real,
    pub damp_time: Real,
    pub smolder: Real,
}

impl Woodburner {
    pub fn new(burner_type: BurnerType, start_time: Timestamp) -> Self {
        let start = ws_core::time::hour_of(&start_time);
        let burn_time_hours = EXTINGUISH_HOUR.saturating_sub(start) as Real;
        let archetype = burner_type.archetype();

        let burn_minutes = minutes_of(hours(burn_time_hours));
        let burnt_wood_kg = burn_minutes / archetype.burn_minutes_per_kg;
        let fuel_emissions = burnt_wood_kg * archetype.wood_emission_factor;

        let steady_pm = archetype.woodburner_emission_factor;
        let start_hour = start as Real;

        let mut edge = start_hour;
        let mut edges = [0.0; 5];
        for (slot, fraction) in edges.iter_mut().zip(SEGMENT_FRACTIONS) {
            edge += fraction * burn_time_hours;
            *slot = edge;
        }
        let [evap, evap_steady, steady, damp_time, smolder] = edges;

        Self {
            burner_type,
            start_time,
            start_hour,
            burn_time_hours,
            burnt_wood_kg,
            fuel_emissions,
            evap,
            max_evap: 3.0 * steady_pm,
            evap_steady,
            steady,
            steady_pm,
            max_damp: 4.0 * steady_pm,
            damp_time,
            smolder,
        }
    }

    /// `(lower, upper)` hour bounds of a segment.
    pub fn bounds(&self, segment: Segment) -> (Real, Real) {
        match segment {
            Segment::Evaporation => (self.start_hour, self.evap),
            Segment::EvaporationToSteady => (self.evap, self.evap_steady),
            Segment::Steady => (self.evap_steady, self.steady),
            Segment::Dampening => (self.steady, self.damp_time),
            Segment::Smolder => (self.damp_time, self.smolder),
        }
    }

    pub fn curve(&self, segment: Segment) -> Parabola {
        match segment {
            Segment::Evaporation => Parabola::through(self.start_hour, 0.0, self.evap, self.max_evap),
            Segment::EvaporationToSteady => {
                Parabola::through(self.evap_steady, self.steady_pm, self.evap, self.max_evap)
            }
            Segment::Steady => Parabola::flat(self.steady_pm),
            Segment::Dampening => {
                Parabola::through(self.steady, self.steady_pm, self.damp_time, self.max_damp)
            }
            Segment::Smolder => Parabola::through(self.smolder, 0.0, self.damp_time, self.max_damp),
        }
    }

    /// First segment whose closed bounds contain `hour`.
    pub fn segment_containing(&self, hour: Real) -> Option<Segment> {
        Segment::ALL.into_iter().find(|&seg| {
            let (lo, hi) = self.bounds(seg);
            hour >= lo && hour <= hi
        })
    }

    /// Emission rate at a fractional hour; zero outside the burn window.
    pub fn rate_at(&self, hour: Real) -> Real {
        match self.segment_containing(hour) {
            Some(seg) => self.curve(seg).eval(hour).max(0.0),
            None => 0.0,
        }
    }

    /// Segment domain sampled at `n` points with the curve values.
    pub fn sample_segment(&self, segment: Segment, n: usize) -> (Vec<Real>, Vec<Real>) {
        let (lo, hi) = self.bounds(segment);
        let xs = linspace(lo, hi, n);
        let ys = self.curve(segment).sample(&xs);
        (xs, ys)
    }

    /// Trapezoidal area under one segment.
    pub fn segment_area(&self, segment: Segment) -> ModelResult<Real> {
        let (xs, ys) = self.sample_segment(segment, DEFAULT_SAMPLES);
        Ok(trapezoid(&ys, &xs)?)
    }

    /// Emissions booked for one segment.
    ///
    /// Every one of the `DEFAULT_SAMPLES - 1` sample intervals is weighted
    /// by the whole segment width, so this is 49 times [`Self::segment_area`].
    /// Calibrated emission totals are on this scale.
    pub fn segment_emissions(&self, segment: Segment) -> ModelResult<Real> {
        let (lo, hi) = self.bounds(segment);
        let (_, ys) = self.sample_segment(segment, DEFAULT_SAMPLES);
        Ok(trapezoid_over_span(&ys, lo, hi)?)
    }

    /// Emissions of this fire for the interval starting at `start`.
    ///
    /// Books [`Self::segment_emissions`] of the segment that contains the
    /// fire's start hour in `ledger` under `start`. A start hour outside every segment
    /// contributes nothing and is counted as a miss.
    pub fn pollute(
        &self,
        start: Timestamp,
        end: Timestamp,
        ledger: &mut EmissionsLedger,
    ) -> ModelResult<Real> {
        let Some(segment) = self.segment_containing(self.start_hour) else {
            warn!(
                start_hour = self.start_hour,
                burner = self.burner_type.number(),
                "start hour outside every curve segment"
            );
            ledger.record_miss(MissKind::Segment);
            return Ok(0.0);
        };

        let area = self.segment_emissions(segment)?;
        ledger.accumulate(start, area);
        trace!(
            %start,
            %end,
            segment = segment.label(),
            area,
            "woodburner polluted"
        );
        Ok(area)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use ws_core::parse_timestamp;

    proptest! {
        #[test]
        fn segments_are_ordered(hour in 0u32..22, kind in 1u8..4) {
            let burner = BurnerType::from_number(kind).unwrap();
            let ts = parse_timestamp(&format!("2019-07-04 {hour:02}:00:00")).unwrap();
            let wb = Woodburner::new(burner, ts);
            prop_assert!(wb.start_hour < wb.evap);
            prop_assert!(wb.evap < wb.evap_steady);
            prop_assert!(wb.evap_steady < wb.steady);
            prop_assert!(wb.steady < wb.damp_time);
            prop_assert!(wb.damp_time < wb.smolder);
            prop_assert!(((wb.smolder - wb.start_hour) - wb.burn_time_hours).abs() < 1e-9);
        }

        #[test]
        fn pollute_is_non_negative(hour in 0u32..24, kind in 1u8..4) {
            let burner = BurnerType::from_number(kind).unwrap();
            let ts = parse_timestamp(&format!("2019-07-04 {hour:02}:00:00")).unwrap();
            let wb = Woodburner::new(burner, ts);
            let mut ledger = EmissionsLedger::new();
            let area = wb.pollute(ts, ts, &mut ledger).unwrap();
            prop_assert!(area >= 0.0);
        }

        #[test]
        fn rate_is_non_negative(hour in 0u32..22, x in 0.0f64..24.0) {
            let ts = parse_timestamp(&format!("2019-07-04 {hour:02}:00:00")).unwrap();
            let wb = Woodburner::new(BurnerType::Radiata, ts);
            prop_assert!(wb.rate_at(x) >= 0.0);
        }
    }
}
