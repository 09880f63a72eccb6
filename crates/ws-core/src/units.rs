// ws-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, ThermodynamicTemperature as UomThermodynamicTemperature,
    Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn area_m2(a: Area) -> f64 {
    use uom::si::area::square_meter;
    a.get::<square_meter>()
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn celsius(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}

#[inline]
pub fn hours(v: f64) -> Time {
    use uom::si::time::hour;
    Time::new::<hour>(v)
}

#[inline]
pub fn minutes_of(t: Time) -> f64 {
    use uom::si::time::minute;
    t.get::<minute>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tolerances, nearly_equal};

    #[test]
    fn constructors_smoke() {
        let _a = m2(1000.0);
        let _t = degc(5.0);
        let _k = k(278.15);
        let _h = hours(2.0);
    }

    #[test]
    fn kelvin_to_celsius() {
        let tol = Tolerances::default();
        assert!(nearly_equal(celsius(k(273.15)), 0.0, tol));
        assert!(nearly_equal(celsius(k(268.15)), -5.0, Tolerances { abs: 1e-9, rel: 1e-9 }));
    }

    #[test]
    fn area_round_trip() {
        assert!(nearly_equal(area_m2(m2(1541.19677734)), 1541.19677734, Tolerances::default()));
    }

    #[test]
    fn hours_to_minutes() {
        assert!(nearly_equal(minutes_of(hours(6.0)), 360.0, Tolerances::default()));
    }
}
