//! Dew point and minimum anti-condensation thickness.

use tc_core::ensure_finite;
use tc_core::units::{Ratio, Temperature, Velocity, celsius, fraction, meters_per_second};
use tc_materials::ConductivityFunction;
use tracing::{debug, warn};

use crate::equilibrium::{EquilibriumConfig, EquilibriumProblem, solve};
use crate::error::{SolverError, SolverResult};
use crate::geometry::Geometry;

/// Magnus coefficients over water.
const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

/// Jacket emissivity assumed by the thickness search.
pub const CONDENSATION_EMISSIVITY: f64 = 0.9;

pub const DEFAULT_MAX_THICKNESS_MM: u32 = 500;

/// Dew point (°C) from the Magnus approximation.
///
/// `relative_humidity` is in percent and must lie in (0, 100].
pub fn dew_point(t_ambient_c: f64, relative_humidity: f64) -> SolverResult<f64> {
    if !(relative_humidity > 0.0 && relative_humidity <= 100.0) {
        return Err(SolverError::InvalidArg {
            what: "relative humidity must be within (0, 100] %",
        });
    }
    ensure_finite(t_ambient_c, "ambient temperature")?;
    let gamma = MAGNUS_A * t_ambient_c / (MAGNUS_B + t_ambient_c) + (relative_humidity / 100.0).ln();
    Ok(MAGNUS_B * gamma / (MAGNUS_A - gamma))
}

/// How far above the dew point the surface must stay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DewPointMargin {
    /// Surface at or above the dew point is enough.
    Exact,
    /// Surface must clear the dew point by this many kelvin.
    Above(f64),
}

impl DewPointMargin {
    /// Margin applied when condensation is checked as part of a heat-loss calculation.
    pub const HEAT_LOSS: Self = DewPointMargin::Above(2.0);
    /// Margin applied by the dedicated condensation calculation.
    pub const CONDENSATION: Self = DewPointMargin::Exact;

    pub fn kelvin(&self) -> f64 {
        match *self {
            DewPointMargin::Exact => 0.0,
            DewPointMargin::Above(margin) => margin,
        }
    }
}

/// Inputs of a minimum-thickness search. Temperatures in °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CondensationProblem {
    /// Process (cold side) temperature.
    pub t_internal: f64,
    pub t_ambient: f64,
    pub geometry: Geometry,
    /// m/s
    pub wind_speed: f64,
    /// Percent.
    pub relative_humidity: f64,
    pub max_thickness_mm: u32,
    pub margin: DewPointMargin,
}

impl CondensationProblem {
    pub fn new(
        internal: Temperature,
        ambient: Temperature,
        geometry: Geometry,
        relative_humidity: Ratio,
    ) -> Self {
        Self {
            t_internal: celsius(internal),
            t_ambient: celsius(ambient),
            geometry,
            wind_speed: 0.0,
            relative_humidity: 100.0 * fraction(relative_humidity),
            max_thickness_mm: DEFAULT_MAX_THICKNESS_MM,
            margin: DewPointMargin::CONDENSATION,
        }
    }

    pub fn with_wind(mut self, wind: Velocity) -> Self {
        self.wind_speed = meters_per_second(wind);
        self
    }

    pub fn with_max_thickness_mm(mut self, max_thickness_mm: u32) -> Self {
        self.max_thickness_mm = max_thickness_mm;
        self
    }

    pub fn with_margin(mut self, margin: DewPointMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Equilibrium problem for one candidate thickness.
    pub fn candidate(&self, thickness_mm: u32) -> EquilibriumProblem {
        EquilibriumProblem {
            t_hot: self.t_internal,
            t_ambient: self.t_ambient,
            thickness: f64::from(thickness_mm) * 1e-3,
            geometry: self.geometry,
            emissivity: CONDENSATION_EMISSIVITY,
            wind_speed: self.wind_speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CondensationResult {
    pub thickness_mm: u32,
    /// °C
    pub dew_point: f64,
    /// Surface temperature reached at `thickness_mm`, °C.
    pub surface_temperature: f64,
}

/// Smallest whole-millimeter thickness whose surface clears the dew point.
///
/// Scans 1..=max mm and stops at the first accepted candidate. Candidates
/// that do not converge are skipped; other errors end the search.
pub fn min_thickness(
    problem: &CondensationProblem,
    conductivity: &ConductivityFunction,
    config: &EquilibriumConfig,
) -> SolverResult<CondensationResult> {
    problem.geometry.validate()?;
    if problem.max_thickness_mm == 0 {
        return Err(SolverError::InvalidArg {
            what: "maximum thickness must be at least 1 mm",
        });
    }
    let dew = dew_point(problem.t_ambient, problem.relative_humidity)?;
    let threshold = dew + problem.margin.kelvin();
    debug!(dew_point = dew, threshold, "searching condensation-safe thickness");

    for thickness_mm in 1..=problem.max_thickness_mm {
        match solve(&problem.candidate(thickness_mm), conductivity, config) {
            Ok(result) if result.surface_temperature >= threshold => {
                debug!(thickness_mm, t_surface = result.surface_temperature, "thickness accepted");
                return Ok(CondensationResult {
                    thickness_mm,
                    dew_point: dew,
                    surface_temperature: result.surface_temperature,
                });
            }
            Ok(_) => {}
            Err(err) if err.is_non_convergence() => {}
            Err(err) => return Err(err),
        }
    }

    warn!(
        dew_point = dew,
        max_thickness_mm = problem.max_thickness_mm,
        "no thickness clears the dew point"
    );
    Err(SolverError::NotFound { dew_point: dew })
}
