use ws_core::{Temperature, Timestamp, celsius, degc};

/// One row of the city-wide weather series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherStep {
    pub time: Timestamp,
    pub temperature: Temperature,
}

impl WeatherStep {
    pub fn new(time: Timestamp, temperature_c: f64) -> Self {
        Self {
            time,
            temperature: degc(temperature_c),
        }
    }

    pub fn celsius(&self) -> f64 {
        celsius(self.temperature)
    }
}
