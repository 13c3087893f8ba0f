//! Steady-state heat transfer through insulation shells.
//!
//! This crate balances conduction through a flat or cylindrical insulation
//! layer against convection and radiation from its outer surface to find the
//! surface temperature, and searches for the thinnest layer that keeps the
//! surface above the ambient dew point.

pub mod condensation;
pub mod convection;
pub mod equilibrium;
pub mod error;
pub mod geometry;
pub mod radiation;
pub mod sweep;

pub use condensation::{
    CondensationProblem, CondensationResult, DewPointMargin, dew_point, min_thickness,
};
pub use convection::{
    AirProperties, ConvectionEstimate, ConvectionMode, ConvectionRegime, FlowState,
    convection_coefficient, estimate_convection,
};
pub use equilibrium::{
    EquilibriumConfig, EquilibriumProblem, FluxBalance, SolveResult, SurfaceLoss, ThermalState,
    bare_surface_flux, flux_balance, layer_interface_temperatures, solve,
};
pub use error::{NonConvergenceReason, SolverError, SolverResult};
pub use geometry::Geometry;
pub use radiation::radiative_flux;
pub use sweep::{SweepPoint, linear_thicknesses, thickness_sweep};
