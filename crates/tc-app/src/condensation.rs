//! Minimum insulation thickness against surface condensation.

use serde::{Deserialize, Serialize};
use tc_core::units::{degc, mps, percent};
use tc_materials::Catalog;
use tc_solver::{CondensationProblem, SolverError, min_thickness};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::request::{CondensationRequest, GeometryKind, MarginPolicy};
use crate::settings::AppSettings;
use crate::validate::validate_condensation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CondensationReport {
    pub material: String,
    pub geometry: GeometryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipe_diameter: Option<f64>,
    pub internal_temperature: f64,
    pub ambient_temperature: f64,
    pub relative_humidity: f64,
    pub wind_speed: f64,
    pub dew_point: f64,
    pub margin_policy: MarginPolicy,
    /// Required clearance above the dew point, K.
    pub margin: f64,
    /// mm
    pub min_thickness: u32,
    /// Surface temperature at `min_thickness`, °C.
    pub surface_temperature: f64,
}

pub fn run(
    request: &CondensationRequest,
    catalog: &Catalog,
    settings: &AppSettings,
) -> AppResult<CondensationReport> {
    let valid = validate_condensation(request, catalog, settings.max_condensation_thickness)?;
    let config = settings.equilibrium_config()?;
    info!(
        material = %valid.material.name,
        geometry = valid.geometry.label(),
        internal = request.internal_temp,
        ambient = request.ambient_temp,
        rh = request.relative_humidity,
        margin = ?request.margin,
        "condensation calculation"
    );

    let margin = request.margin.dew_point_margin();
    let problem = CondensationProblem::new(
        degc(request.internal_temp),
        degc(request.ambient_temp),
        valid.geometry,
        percent(request.relative_humidity),
    )
    .with_wind(mps(request.wind_speed))
    .with_max_thickness_mm(valid.max_thickness_mm)
    .with_margin(margin);

    let found = match min_thickness(&problem, &valid.material.conductivity, &config) {
        Ok(found) => found,
        Err(SolverError::NotFound { dew_point }) => {
            return Err(AppError::NoSafeThickness {
                dew_point,
                max_thickness_mm: valid.max_thickness_mm,
            });
        }
        Err(err) => return Err(err.into()),
    };

    Ok(CondensationReport {
        material: valid.material.name.clone(),
        geometry: request.geometry,
        pipe_diameter: request
            .pipe_diameter
            .filter(|_| request.geometry == GeometryKind::Pipe),
        internal_temperature: request.internal_temp,
        ambient_temperature: request.ambient_temp,
        relative_humidity: request.relative_humidity,
        wind_speed: request.wind_speed,
        dew_point: found.dew_point,
        margin_policy: request.margin,
        margin: margin.kelvin(),
        min_thickness: found.thickness_mm,
        surface_temperature: found.surface_temperature,
    })
}
