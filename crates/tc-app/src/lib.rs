//! Shared application service layer for thermalcalc.
//!
//! This crate turns catalog-level requests (material and finish names,
//! millimeters, °C) into solver inputs, runs the heat-loss, condensation and
//! sweep calculations, and renders their reports for the CLI.

pub mod condensation;
pub mod deadline;
pub mod error;
pub mod finance;
pub mod heat_loss;
pub mod report;
pub mod request;
pub mod settings;
pub mod sweep;
pub mod validate;

// Re-export key types for convenience
pub use condensation::CondensationReport;
pub use deadline::run_with_deadline;
pub use error::{AppError, AppResult};
pub use finance::{Savings, Schedule, compute_savings};
pub use heat_loss::{CondensationCheck, HeatLossReport};
pub use report::{render_condensation_text, render_heat_loss_text, render_sweep_text};
pub use request::{
    CondensationRequest, FinancialRequest, GeometryKind, HeatLossRequest, MarginPolicy,
    load_request,
};
pub use settings::{AppSettings, SolverSettings, load_settings, load_settings_or_default};
pub use sweep::{SweepRange, SweepReport, SweepRow};
pub use validate::{TemperatureCheck, check_temperature};
