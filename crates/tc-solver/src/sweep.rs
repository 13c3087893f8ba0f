//! Parallel thickness sweeps.

use rayon::prelude::*;
use tc_materials::ConductivityFunction;

use crate::equilibrium::{EquilibriumConfig, EquilibriumProblem, SolveResult, solve};
use crate::error::{SolverError, SolverResult};

/// One sweep point. Failed solves are kept, not dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    /// Insulation thickness, m.
    pub thickness: f64,
    pub outcome: SolverResult<SolveResult>,
}

impl SweepPoint {
    pub fn converged(&self) -> Option<&SolveResult> {
        self.outcome.as_ref().ok()
    }
}

/// Solve `problem` at every thickness (m) independently, in parallel.
///
/// Results come back in input order.
pub fn thickness_sweep(
    problem: &EquilibriumProblem,
    conductivity: &ConductivityFunction,
    thicknesses: &[f64],
    config: &EquilibriumConfig,
) -> Vec<SweepPoint> {
    thicknesses
        .par_iter()
        .map(|&thickness| SweepPoint {
            thickness,
            outcome: solve(&problem.with_thickness_m(thickness), conductivity, config),
        })
        .collect()
}

/// Evenly spaced thicknesses from `start` to `end` inclusive.
pub fn linear_thicknesses(start: f64, end: f64, points: usize) -> SolverResult<Vec<f64>> {
    if points < 2 {
        return Err(SolverError::InvalidArg {
            what: "sweep must have at least 2 points",
        });
    }
    if !(start > 0.0 && end > start) {
        return Err(SolverError::InvalidArg {
            what: "sweep bounds must be positive and increasing",
        });
    }

    let delta = (end - start) / (points - 1) as f64;
    let mut values: Vec<f64> = (0..points).map(|i| start + i as f64 * delta).collect();
    // Ensure exact endpoint
    values[points - 1] = end;
    Ok(values)
}
