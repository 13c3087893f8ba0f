//! Surface-to-surroundings radiation.

use tc_core::units::constants::{STEFAN_BOLTZMANN, celsius_to_kelvin};

/// Net radiative flux (W/m²) from a grey surface to large surroundings.
pub fn radiative_flux(emissivity: f64, t_surface_c: f64, t_ambient_c: f64) -> f64 {
    let ts = celsius_to_kelvin(t_surface_c);
    let ta = celsius_to_kelvin(t_ambient_c);
    emissivity * STEFAN_BOLTZMANN * (ts.powi(4) - ta.powi(4))
}
