//! Surface temperature and heat loss over a range of insulation thicknesses.

use serde::{Deserialize, Serialize};
use tc_core::units::{degc, mm, mps};
use tc_materials::Catalog;
use tc_solver::{EquilibriumProblem, linear_thicknesses, thickness_sweep};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::request::HeatLossRequest;
use crate::settings::AppSettings;
use crate::validate::validate_heat_loss;

/// Sweep range in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepRange {
    pub from_mm: f64,
    pub to_mm: f64,
    pub points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepRow {
    pub thickness_mm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_temperature: Option<f64>,
    /// kW/m²
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_loss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub material: String,
    pub finish: String,
    pub hot_temperature: f64,
    pub ambient_temperature: f64,
    pub rows: Vec<SweepRow>,
}

/// Re-solve a heat-loss request at evenly spaced total thicknesses.
///
/// The request's own layer thicknesses are only validated, not used.
pub fn run(
    request: &HeatLossRequest,
    range: SweepRange,
    catalog: &Catalog,
    settings: &AppSettings,
) -> AppResult<SweepReport> {
    let valid = validate_heat_loss(request, catalog)?;
    let config = settings.equilibrium_config()?;
    let thicknesses = linear_thicknesses(range.from_mm / 1000.0, range.to_mm / 1000.0, range.points)
        .map_err(|e| AppError::Validation(format!("sweep range: {e}")))?;
    info!(
        material = %valid.material.name,
        from_mm = range.from_mm,
        to_mm = range.to_mm,
        points = range.points,
        "thickness sweep"
    );

    let problem = EquilibriumProblem::new(
        degc(request.hot_temp),
        degc(request.ambient_temp),
        mm(valid.total_thickness_mm),
        valid.geometry,
    )
    .with_emissivity(valid.finish.emissivity)
    .with_wind(mps(request.wind_speed));

    let rows = thickness_sweep(&problem, &valid.material.conductivity, &thicknesses, &config)
        .into_iter()
        .map(|point| match point.outcome {
            Ok(result) => SweepRow {
                thickness_mm: point.thickness * 1000.0,
                surface_temperature: Some(result.surface_temperature),
                heat_loss: Some(result.heat_flux / 1000.0),
                error: None,
            },
            Err(err) => SweepRow {
                thickness_mm: point.thickness * 1000.0,
                surface_temperature: None,
                heat_loss: None,
                error: Some(err.to_string()),
            },
        })
        .collect();

    Ok(SweepReport {
        material: valid.material.name.clone(),
        finish: valid.finish.name.clone(),
        hot_temperature: request.hot_temp,
        ambient_temperature: request.ambient_temp,
        rows,
    })
}
