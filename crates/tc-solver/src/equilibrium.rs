//! Outer-surface equilibrium solve.
//!
//! The unknown is the outer-face temperature `Tf`. The residual is conduction
//! through the insulation minus convection and radiation from the surface:
//!
//! ```text
//! r(Tf) = q_cond(Tf) - (h(Tf)·(Tf - Ta) + ε·σ·(Tf⁴ - Ta⁴))
//! ```
//!
//! `r` falls as `Tf` rises, so the solver walks `Tf` up while `r > 0` and down
//! otherwise, halving the step each time the residual changes sign.

use tc_core::units::{Length, Temperature, Velocity, celsius, meters, meters_per_second};
use tc_core::{ensure_finite, ensure_positive, ensure_within};
use tc_materials::ConductivityFunction;
use tracing::{debug, trace, warn};

use crate::convection::convection_coefficient;
use crate::error::{NonConvergenceReason, SolverError, SolverResult};
use crate::geometry::Geometry;
use crate::radiation::radiative_flux;

/// Adaptive-step solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumConfig {
    /// First trial surface temperature, above ambient, K.
    pub initial_offset: f64,
    /// Initial temperature step, K.
    pub initial_step: f64,
    /// The step is never halved below this, K.
    pub min_step: f64,
    /// Converged when `|residual|` is below this, W/m².
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for EquilibriumConfig {
    fn default() -> Self {
        Self {
            initial_offset: 10.0,
            initial_step: 50.0,
            min_step: 0.001,
            tolerance: 0.5,
            max_iterations: 1000,
        }
    }
}

impl EquilibriumConfig {
    pub fn validate(&self) -> SolverResult<()> {
        ensure_finite(self.initial_offset, "initial offset")?;
        ensure_positive(self.initial_step, "initial step")?;
        ensure_positive(self.tolerance, "tolerance")?;
        if !(self.min_step > 0.0 && self.min_step <= self.initial_step) {
            return Err(SolverError::InvalidArg {
                what: "minimum step must be positive and not above the initial step",
            });
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidArg {
                what: "iteration limit must be at least 1",
            });
        }
        Ok(())
    }
}

/// Inputs of one equilibrium solve. Temperatures in °C, lengths in m.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumProblem {
    pub t_hot: f64,
    pub t_ambient: f64,
    /// Total insulation thickness.
    pub thickness: f64,
    pub geometry: Geometry,
    pub emissivity: f64,
    /// m/s
    pub wind_speed: f64,
}

impl EquilibriumProblem {
    /// Still air, emissivity 0.9.
    pub fn new(hot: Temperature, ambient: Temperature, thickness: Length, geometry: Geometry) -> Self {
        Self {
            t_hot: celsius(hot),
            t_ambient: celsius(ambient),
            thickness: meters(thickness),
            geometry,
            emissivity: 0.9,
            wind_speed: 0.0,
        }
    }

    pub fn with_emissivity(mut self, emissivity: f64) -> Self {
        self.emissivity = emissivity;
        self
    }

    pub fn with_wind(mut self, wind: Velocity) -> Self {
        self.wind_speed = meters_per_second(wind);
        self
    }

    /// Same problem with a different thickness in meters.
    pub fn with_thickness_m(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn validate(&self) -> SolverResult<()> {
        self.geometry.validate()?;
        ensure_finite(self.t_hot, "hot-face temperature")?;
        ensure_finite(self.t_ambient, "ambient temperature")?;
        ensure_within(self.emissivity, 0.0, 1.0, "emissivity")?;
        if !(self.wind_speed >= 0.0 && self.wind_speed.is_finite()) {
            return Err(SolverError::InvalidArg {
                what: "wind speed must be zero or positive",
            });
        }
        Ok(())
    }

    fn has_shell(&self) -> bool {
        self.thickness.is_finite() && self.thickness > 0.0
    }
}

/// Working variables of a single solve at one trial surface temperature.
#[derive(Debug, Clone, Copy)]
pub struct ThermalState {
    pub t_hot: f64,
    pub t_surface: f64,
    pub t_ambient: f64,
    pub thickness: f64,
    pub inner_radius: Option<f64>,
    pub wind_speed: f64,
    pub emissivity: f64,
    geometry: Geometry,
}

impl ThermalState {
    pub fn new(problem: &EquilibriumProblem, t_surface: f64) -> Self {
        Self {
            t_hot: problem.t_hot,
            t_surface,
            t_ambient: problem.t_ambient,
            thickness: problem.thickness,
            inner_radius: problem.geometry.inner_radius(),
            wind_speed: problem.wind_speed,
            emissivity: problem.emissivity,
            geometry: problem.geometry,
        }
    }

    pub fn mean_temperature(&self) -> f64 {
        0.5 * (self.t_hot + self.t_surface)
    }

    /// Conductive flux for conductivity `k`, referred to the outer surface.
    pub fn conduction_flux(&self, k: f64) -> f64 {
        let driving = self.t_hot - self.t_surface;
        match self.inner_radius {
            None => k * driving / self.thickness,
            Some(ri) => {
                let ro = ri + self.thickness;
                k * driving / (ro * (ro / ri).ln())
            }
        }
    }

    /// Length handed to the convection model: thickness (flat) or outer diameter (pipe).
    pub fn characteristic_length(&self) -> f64 {
        self.geometry
            .outer_diameter(self.thickness)
            .unwrap_or(self.thickness)
    }

    pub fn balance(&self, conductivity: &ConductivityFunction) -> SolverResult<FluxBalance> {
        let k = conductivity.evaluate(self.mean_temperature())?;
        Ok(self.balance_with(k))
    }

    fn balance_with(&self, k: f64) -> FluxBalance {
        let q_conduction = self.conduction_flux(k);
        let h = convection_coefficient(
            self.t_surface,
            self.t_ambient,
            &self.geometry,
            self.characteristic_length(),
            self.wind_speed,
        );
        let q_convection = h * (self.t_surface - self.t_ambient);
        let q_radiation = radiative_flux(self.emissivity, self.t_surface, self.t_ambient);
        FluxBalance {
            t_surface: self.t_surface,
            conductivity: k,
            h,
            q_conduction,
            q_convection,
            q_radiation,
            residual: q_conduction - (q_convection + q_radiation),
        }
    }
}

/// Individual flux terms at one surface temperature, W/m².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxBalance {
    pub t_surface: f64,
    /// `k(T_mean)`, W/(m·K).
    pub conductivity: f64,
    /// Convection coefficient, W/(m²·K).
    pub h: f64,
    pub q_conduction: f64,
    pub q_convection: f64,
    pub q_radiation: f64,
    /// Conduction minus dissipation.
    pub residual: f64,
}

impl FluxBalance {
    /// Heat leaving the surface by convection and radiation.
    pub fn dissipated(&self) -> f64 {
        self.q_convection + self.q_radiation
    }
}

/// Converged equilibrium.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveResult {
    /// Outer-face temperature, °C.
    pub surface_temperature: f64,
    /// Heat flux leaving the surface, W/m².
    pub heat_flux: f64,
    pub converged: bool,
    pub iterations: usize,
    /// Conductivity at the final mean temperature, W/(m·K).
    pub conductivity: f64,
    pub residual: f64,
}

/// Evaluate the flux terms of `problem` at a given surface temperature.
pub fn flux_balance(
    problem: &EquilibriumProblem,
    conductivity: &ConductivityFunction,
    t_surface: f64,
) -> SolverResult<FluxBalance> {
    problem.validate()?;
    if !problem.has_shell() {
        return Err(SolverError::InvalidArg {
            what: "insulation thickness must be positive",
        });
    }
    ThermalState::new(problem, t_surface).balance(conductivity)
}

/// Find the outer-face temperature where conduction equals surface dissipation.
pub fn solve(
    problem: &EquilibriumProblem,
    conductivity: &ConductivityFunction,
    config: &EquilibriumConfig,
) -> SolverResult<SolveResult> {
    config.validate()?;
    problem.validate()?;

    let mut state = ThermalState::new(problem, problem.t_ambient + config.initial_offset);
    if !problem.has_shell() {
        return Err(non_convergence(&state, 0, NonConvergenceReason::DegenerateShell));
    }

    let mut step = config.initial_step;
    let mut previous: Option<f64> = None;

    for iteration in 0..config.max_iterations {
        let k = match conductivity.evaluate(state.mean_temperature()) {
            Ok(k) => k,
            Err(err) => {
                debug!(%err, t_mean = state.mean_temperature(), "conductivity undefined");
                return Err(non_convergence(
                    &state,
                    iteration,
                    NonConvergenceReason::UndefinedConductivity,
                ));
            }
        };
        if k <= 0.0 {
            return Err(non_convergence(
                &state,
                iteration,
                NonConvergenceReason::NonPositiveConductivity,
            ));
        }

        let balance = state.balance_with(k);
        trace!(
            iteration,
            t_surface = state.t_surface,
            k,
            q_cond = balance.q_conduction,
            h = balance.h,
            q_conv = balance.q_convection,
            q_rad = balance.q_radiation,
            residual = balance.residual,
            "equilibrium iteration"
        );

        if balance.residual.abs() < config.tolerance {
            debug!(
                iterations = iteration + 1,
                t_surface = state.t_surface,
                heat_flux = balance.dissipated(),
                "equilibrium converged"
            );
            return Ok(SolveResult {
                surface_temperature: state.t_surface,
                heat_flux: balance.dissipated(),
                converged: true,
                iterations: iteration + 1,
                conductivity: k,
                residual: balance.residual,
            });
        }

        if previous.is_some_and(|p| p * balance.residual < 0.0) {
            step = (0.5 * step).max(config.min_step);
        }
        state.t_surface += if balance.residual > 0.0 { step } else { -step };
        previous = Some(balance.residual);
    }

    Err(non_convergence(
        &state,
        config.max_iterations,
        NonConvergenceReason::IterationLimit,
    ))
}

fn non_convergence(state: &ThermalState, iterations: usize, reason: NonConvergenceReason) -> SolverError {
    warn!(
        %reason,
        iterations,
        t_surface = state.t_surface,
        thickness = state.thickness,
        "equilibrium did not converge"
    );
    SolverError::NonConvergence {
        last_temperature: state.t_surface,
        iterations,
        reason,
    }
}

/// Loss from a bare surface, W/m².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLoss {
    pub h: f64,
    pub q_convection: f64,
    pub q_radiation: f64,
}

impl SurfaceLoss {
    pub fn total(&self) -> f64 {
        self.q_convection + self.q_radiation
    }
}

/// Uninsulated loss: convection and radiation at the hot temperature.
///
/// For pipes the bare pipe diameter is the characteristic length.
pub fn bare_surface_flux(
    t_hot: f64,
    t_ambient: f64,
    geometry: &Geometry,
    emissivity: f64,
    wind_speed: f64,
) -> SolverResult<SurfaceLoss> {
    geometry.validate()?;
    let length = match *geometry {
        Geometry::FlatPlate => 0.0,
        Geometry::Pipe { diameter } => diameter,
    };
    let h = convection_coefficient(t_hot, t_ambient, geometry, length, wind_speed);
    Ok(SurfaceLoss {
        h,
        q_convection: h * (t_hot - t_ambient),
        q_radiation: radiative_flux(emissivity, t_hot, t_ambient),
    })
}

/// Interface temperatures between `layers` equal-drop layers (hot side first).
///
/// Splits `t_hot - t_surface` evenly; a single layer has no interfaces.
pub fn layer_interface_temperatures(t_hot: f64, t_surface: f64, layers: usize) -> Vec<f64> {
    if layers < 2 {
        return Vec::new();
    }
    let drop = (t_hot - t_surface) / layers as f64;
    (1..layers).map(|i| t_hot - i as f64 * drop).collect()
}
