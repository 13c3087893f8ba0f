//! Error types for equilibrium and condensation solves.

use std::fmt;

use tc_core::TcError;
use tc_materials::FormulaError;
use thiserror::Error;

/// Why an equilibrium solve stopped without converging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonConvergenceReason {
    /// Iteration budget exhausted.
    IterationLimit,
    /// `k(T_mean)` evaluated to zero or a negative value.
    NonPositiveConductivity,
    /// `k(T_mean)` could not be evaluated (math domain error, non-finite value).
    UndefinedConductivity,
    /// Insulation thickness is zero or negative.
    DegenerateShell,
}

impl fmt::Display for NonConvergenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::IterationLimit => "iteration limit reached",
            Self::NonPositiveConductivity => "conductivity is not positive",
            Self::UndefinedConductivity => "conductivity is undefined",
            Self::DegenerateShell => "insulation thickness must be positive",
        };
        f.write_str(text)
    }
}

/// Errors that can occur while solving for the outer-surface temperature.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Conductivity formula error: {0}")]
    Formula(#[from] FormulaError),

    #[error("Invalid geometry: {what}")]
    InvalidGeometry { what: String },

    #[error(
        "No convergence after {iterations} iteration(s): {reason} (last surface temperature {last_temperature:.2} °C)"
    )]
    NonConvergence {
        last_temperature: f64,
        iterations: usize,
        reason: NonConvergenceReason,
    },

    #[error("No thickness keeps the surface above the dew point ({dew_point:.1} °C)")]
    NotFound { dew_point: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    pub fn is_non_convergence(&self) -> bool {
        matches!(self, Self::NonConvergence { .. })
    }
}

impl From<TcError> for SolverError {
    fn from(e: TcError) -> Self {
        match e {
            TcError::NonFinite { what, .. }
            | TcError::InvalidArg { what }
            | TcError::OutOfRange { what, .. }
            | TcError::Invariant { what } => SolverError::InvalidArg { what },
        }
    }
}

impl From<SolverError> for TcError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Formula(err) => err.into(),
            SolverError::InvalidGeometry { .. } => TcError::InvalidArg { what: "geometry" },
            SolverError::NonConvergence { .. } => TcError::Invariant {
                what: "equilibrium convergence",
            },
            SolverError::NotFound { .. } => TcError::Invariant {
                what: "condensation-safe thickness",
            },
            SolverError::InvalidArg { what } => TcError::InvalidArg { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_errors_become_invalid_args() {
        let err: SolverError = tc_core::ensure_within(1.5, 0.0, 1.0, "emissivity")
            .unwrap_err()
            .into();
        assert_eq!(err, SolverError::InvalidArg { what: "emissivity" });
    }

    #[test]
    fn non_convergence_message_names_the_reason() {
        let err = SolverError::NonConvergence {
            last_temperature: 41.234,
            iterations: 1000,
            reason: NonConvergenceReason::IterationLimit,
        };
        assert!(err.is_non_convergence());
        let text = err.to_string();
        assert!(text.contains("iteration limit reached"));
        assert!(text.contains("41.23"));

        let tc: TcError = err.into();
        assert!(matches!(tc, TcError::Invariant { .. }));
    }
}
