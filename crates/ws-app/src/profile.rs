//! Emission-rate profile of a single fire, for plotting and inspection.

use chrono::NaiveDate;
use ws_model::{BurnerType, Segment, Woodburner};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePoint {
    pub segment: Segment,
    pub hour: f64,
    pub rate: f64,
}

#[derive(Debug, Clone)]
pub struct EmissionProfile {
    pub burner_type: BurnerType,
    pub start_hour: u32,
    pub burn_time_hours: f64,
    pub burnt_wood_kg: f64,
    pub fuel_emissions: f64,
    /// Area under each segment, in segment order.
    pub segment_areas: Vec<(Segment, f64)>,
    pub points: Vec<ProfilePoint>,
}

/// Sample every segment of the curve for a fire lit at `start_hour`.
pub fn emission_profile(
    burner_type: BurnerType,
    start_hour: u32,
    samples: usize,
) -> AppResult<EmissionProfile> {
    if samples < 2 {
        return Err(AppError::InvalidInput(
            "at least two samples per segment are needed".to_string(),
        ));
    }
    let start = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(start_hour, 0, 0))
        .ok_or_else(|| AppError::InvalidInput(format!("hour {start_hour} is not 0-23")))?;

    let burner = Woodburner::new(burner_type, start);
    let mut points = Vec::with_capacity(samples * Segment::ALL.len());
    let mut segment_areas = Vec::with_capacity(Segment::ALL.len());
    for segment in Segment::ALL {
        let (xs, ys) = burner.sample_segment(segment, samples);
        points.extend(xs.into_iter().zip(ys).map(|(hour, rate)| ProfilePoint {
            segment,
            hour,
            rate,
        }));
        segment_areas.push((segment, burner.segment_area(segment)?));
    }

    Ok(EmissionProfile {
        burner_type,
        start_hour,
        burn_time_hours: burner.burn_time_hours,
        burnt_wood_kg: burner.burnt_wood_kg,
        fuel_emissions: burner.fuel_emissions,
        segment_areas,
        points,
    })
}

pub fn profile_csv(profile: &EmissionProfile) -> String {
    let mut csv = String::from("segment,hour,rate\n");
    for p in &profile.points {
        csv.push_str(&format!("{},{},{}\n", p.segment.label(), p.hour, p.rate));
    }
    csv
}
