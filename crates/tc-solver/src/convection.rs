//! External convection from the insulation surface to ambient air.
//!
//! Free convection uses the plate correlation `Nu = 0.27·Ra^(1/4)` or the
//! Churchill-Chu horizontal cylinder correlation; forced convection (wind at
//! or above 1 m/s) uses the laminar / turbulent flat-plate correlations.

use tc_core::units::constants::{GRAVITY_MPS2, celsius_to_kelvin};

use crate::geometry::Geometry;

/// Reference temperature of the air property fits, K.
const REFERENCE_TEMPERATURE_K: f64 = 293.15;
/// Thermal conductivity of air, W/(m·K).
pub const AIR_CONDUCTIVITY: f64 = 0.0263;
/// Wind speed at which forced convection takes over, m/s.
pub const FORCED_WIND_THRESHOLD: f64 = 1.0;
/// Transition Reynolds number for a flat plate.
pub const CRITICAL_REYNOLDS: f64 = 5e5;
/// Length used for forced flow over a flat plate and as the pipe fallback.
const FORCED_FLAT_LENGTH: f64 = 1.0;
/// Length used for free convection from a flat plate.
const FREE_FLAT_LENGTH: f64 = 0.1;
/// Rayleigh number above which a free-convection boundary layer is turbulent.
const FREE_TURBULENT_RAYLEIGH: f64 = 1e9;

/// Air properties at the film temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirProperties {
    pub film_temperature_k: f64,
    /// Kinematic viscosity, m²/s.
    pub kinematic_viscosity: f64,
    /// Thermal diffusivity, m²/s.
    pub thermal_diffusivity: f64,
    pub prandtl: f64,
    /// Volumetric expansion coefficient (ideal gas), 1/K.
    pub expansion_coefficient: f64,
}

impl AirProperties {
    pub fn at_film(t_surface_c: f64, t_ambient_c: f64) -> Self {
        let film = 0.5 * (celsius_to_kelvin(t_surface_c) + celsius_to_kelvin(t_ambient_c));
        let ratio = film / REFERENCE_TEMPERATURE_K;
        let nu = 1.589e-5 * ratio.powf(0.7);
        let alpha = 2.25e-5 * ratio.powf(0.8);
        Self {
            film_temperature_k: film,
            kinematic_viscosity: nu,
            thermal_diffusivity: alpha,
            prandtl: nu / alpha,
            expansion_coefficient: 1.0 / film,
        }
    }

    pub fn rayleigh(&self, delta_t: f64, length: f64) -> f64 {
        GRAVITY_MPS2 * self.expansion_coefficient * delta_t * length.powi(3)
            / (self.kinematic_viscosity * self.thermal_diffusivity)
    }

    pub fn reynolds(&self, wind_speed: f64, length: f64) -> f64 {
        wind_speed * length / self.kinematic_viscosity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvectionMode {
    Free,
    Forced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Laminar,
    Turbulent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvectionRegime {
    pub mode: ConvectionMode,
    pub flow: FlowState,
}

/// Full convection estimate, useful for reports and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvectionEstimate {
    /// Heat-transfer coefficient, W/(m²·K).
    pub h: f64,
    pub nusselt: f64,
    /// Length actually used by the correlation, m.
    pub length: f64,
    /// `None` when there is no temperature difference or no usable length.
    pub regime: Option<ConvectionRegime>,
}

impl ConvectionEstimate {
    fn none(length: f64) -> Self {
        Self {
            h: 0.0,
            nusselt: 0.0,
            length,
            regime: None,
        }
    }
}

/// Convective heat-transfer coefficient, W/(m²·K).
///
/// `characteristic_length` is the outer diameter for pipes. Flat plates use
/// fixed lengths and ignore it.
pub fn convection_coefficient(
    t_surface_c: f64,
    t_ambient_c: f64,
    geometry: &Geometry,
    characteristic_length: f64,
    wind_speed: f64,
) -> f64 {
    estimate_convection(
        t_surface_c,
        t_ambient_c,
        geometry,
        characteristic_length,
        wind_speed,
    )
    .h
}

pub fn estimate_convection(
    t_surface_c: f64,
    t_ambient_c: f64,
    geometry: &Geometry,
    characteristic_length: f64,
    wind_speed: f64,
) -> ConvectionEstimate {
    let delta_t = (t_surface_c - t_ambient_c).abs();
    if delta_t == 0.0 {
        return ConvectionEstimate::none(characteristic_length);
    }
    let air = AirProperties::at_film(t_surface_c, t_ambient_c);

    if wind_speed >= FORCED_WIND_THRESHOLD {
        let length = match geometry {
            Geometry::FlatPlate => FORCED_FLAT_LENGTH,
            Geometry::Pipe { .. } if characteristic_length > 0.0 => characteristic_length,
            Geometry::Pipe { .. } => FORCED_FLAT_LENGTH,
        };
        let re = air.reynolds(wind_speed, length);
        let pr_third = air.prandtl.cbrt();
        let (nusselt, flow) = if re < CRITICAL_REYNOLDS {
            (0.664 * re.sqrt() * pr_third, FlowState::Laminar)
        } else {
            ((0.037 * re.powf(0.8) - 871.0) * pr_third, FlowState::Turbulent)
        };
        return finish(nusselt, length, ConvectionMode::Forced, flow);
    }

    let (length, nusselt) = match geometry {
        Geometry::FlatPlate => {
            let ra = air.rayleigh(delta_t, FREE_FLAT_LENGTH);
            (FREE_FLAT_LENGTH, 0.27 * ra.powf(0.25))
        }
        Geometry::Pipe { .. } => {
            if characteristic_length <= 0.0 {
                return ConvectionEstimate::none(characteristic_length);
            }
            let ra = air.rayleigh(delta_t, characteristic_length);
            let denominator = (1.0 + (0.559 / air.prandtl).powf(9.0 / 16.0)).powf(8.0 / 27.0);
            let root = 0.60 + 0.387 * ra.powf(1.0 / 6.0) / denominator;
            (characteristic_length, root * root)
        }
    };
    let flow = if air.rayleigh(delta_t, length) < FREE_TURBULENT_RAYLEIGH {
        FlowState::Laminar
    } else {
        FlowState::Turbulent
    };
    finish(nusselt, length, ConvectionMode::Free, flow)
}

fn finish(nusselt: f64, length: f64, mode: ConvectionMode, flow: FlowState) -> ConvectionEstimate {
    if length <= 0.0 {
        return ConvectionEstimate::none(length);
    }
    ConvectionEstimate {
        h: nusselt * AIR_CONDUCTIVITY / length,
        nusselt,
        length,
        regime: Some(ConvectionRegime { mode, flow }),
    }
}
