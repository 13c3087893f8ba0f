// tc-core/src/units.rs

use uom::si::f64::{
    Length as UomLength, Ratio as UomRatio,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn percent(v: f64) -> Ratio {
    use uom::si::ratio::percent;
    Ratio::new::<percent>(v)
}

/// Length in meters.
#[inline]
pub fn meters(l: Length) -> f64 {
    use uom::si::length::meter;
    l.get::<meter>()
}

/// Temperature in degrees Celsius.
#[inline]
pub fn celsius(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}

/// Speed in meters per second.
#[inline]
pub fn meters_per_second(v: Velocity) -> f64 {
    use uom::si::velocity::meter_per_second;
    v.get::<meter_per_second>()
}

/// Ratio as a fraction (1.0 = 100 %).
#[inline]
pub fn fraction(r: Ratio) -> f64 {
    use uom::si::ratio::ratio;
    r.get::<ratio>()
}

pub mod constants {
    /// Offset between the Celsius and Kelvin scales.
    pub const ZERO_CELSIUS_K: f64 = 273.15;

    /// Stefan-Boltzmann constant, W/(m²·K⁴).
    pub const STEFAN_BOLTZMANN: f64 = 5.67e-8;

    /// Gravitational acceleration used by the free-convection correlations, m/s².
    pub const GRAVITY_MPS2: f64 = 9.81;

    #[inline]
    pub fn celsius_to_kelvin(t_c: f64) -> f64 {
        t_c + ZERO_CELSIUS_K
    }
}
