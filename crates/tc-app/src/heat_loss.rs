//! Heat loss through insulation, compared with the bare surface.

use serde::{Deserialize, Serialize};
use tc_core::units::{degc, mm, mps};
use tc_materials::Catalog;
use tc_solver::{
    DewPointMargin, EquilibriumProblem, bare_surface_flux, dew_point,
    layer_interface_temperatures, solve,
};
use tracing::info;

use crate::error::AppResult;
use crate::finance::{Savings, Schedule, compute_savings, reduction_percent};
use crate::request::{GeometryKind, HeatLossRequest};
use crate::settings::AppSettings;
use crate::validate::validate_heat_loss;

/// Dew point check attached to a heat-loss report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CondensationCheck {
    pub relative_humidity: f64,
    pub dew_point: f64,
    /// Required clearance above the dew point, K.
    pub margin: f64,
    /// The computed surface clears the dew point by the margin.
    pub surface_clears: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatLossReport {
    pub material: String,
    pub finish: String,
    pub emissivity: f64,
    pub geometry: GeometryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipe_diameter: Option<f64>,
    pub hot_temperature: f64,
    pub ambient_temperature: f64,
    pub wind_speed: f64,
    pub layer_thicknesses: Vec<f64>,
    pub total_thickness: f64,
    /// Outer diameter at each layer boundary for pipes, mm.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layer_diameters: Vec<f64>,
    pub surface_temperature: f64,
    /// kW/m²
    pub heat_loss_with_insulation: f64,
    /// kW/m²
    pub heat_loss_without_insulation: f64,
    pub reduction_percent: f64,
    /// Interface temperatures between layers, hot side first.
    pub layer_temperatures: Vec<f64>,
    /// W/(m·K) at the mean insulation temperature.
    pub mean_conductivity: f64,
    pub iterations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condensation: Option<CondensationCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<Savings>,
}

pub fn run(
    request: &HeatLossRequest,
    catalog: &Catalog,
    settings: &AppSettings,
) -> AppResult<HeatLossReport> {
    let valid = validate_heat_loss(request, catalog)?;
    let config = settings.equilibrium_config()?;
    info!(
        material = %valid.material.name,
        geometry = valid.geometry.label(),
        hot = request.hot_temp,
        ambient = request.ambient_temp,
        thickness_mm = valid.total_thickness_mm,
        "heat loss calculation"
    );

    let problem = EquilibriumProblem::new(
        degc(request.hot_temp),
        degc(request.ambient_temp),
        mm(valid.total_thickness_mm),
        valid.geometry,
    )
    .with_emissivity(valid.finish.emissivity)
    .with_wind(mps(request.wind_speed));
    let insulated = solve(&problem, &valid.material.conductivity, &config)?;

    let bare = bare_surface_flux(
        request.hot_temp,
        request.ambient_temp,
        &valid.geometry,
        valid.finish.emissivity,
        request.wind_speed,
    )?;

    let loss_with_kw = insulated.heat_flux / 1000.0;
    let loss_without_kw = bare.total() / 1000.0;

    let condensation = match request.relative_humidity {
        Some(rh) => {
            let margin = DewPointMargin::HEAT_LOSS;
            let dew = dew_point(request.ambient_temp, rh)?;
            Some(CondensationCheck {
                relative_humidity: rh,
                dew_point: dew,
                margin: margin.kelvin(),
                surface_clears: insulated.surface_temperature >= dew + margin.kelvin(),
            })
        }
        None => None,
    };

    let savings = match (&request.financial, valid.fuel) {
        (Some(financial), Some(fuel)) => {
            let schedule = Schedule {
                area: financial.area,
                hours_per_day: financial.hours_per_day,
                days_per_week: financial.days_per_week,
            };
            let unit_cost = financial.fuel_cost.unwrap_or(fuel.unit_cost);
            Some(compute_savings(loss_with_kw, loss_without_kw, fuel, &schedule, unit_cost))
        }
        _ => None,
    };

    let layer_diameters = valid
        .geometry
        .layer_boundary_diameters(
            &request
                .layer_thicknesses
                .iter()
                .map(|t| t / 1000.0)
                .collect::<Vec<_>>(),
        )
        .into_iter()
        .map(|d| d * 1000.0)
        .collect();

    Ok(HeatLossReport {
        material: valid.material.name.clone(),
        finish: valid.finish.name.clone(),
        emissivity: valid.finish.emissivity,
        geometry: request.geometry,
        pipe_diameter: request
            .pipe_diameter
            .filter(|_| request.geometry == GeometryKind::Pipe),
        hot_temperature: request.hot_temp,
        ambient_temperature: request.ambient_temp,
        wind_speed: request.wind_speed,
        layer_thicknesses: request.layer_thicknesses.clone(),
        total_thickness: valid.total_thickness_mm,
        layer_diameters,
        surface_temperature: insulated.surface_temperature,
        heat_loss_with_insulation: loss_with_kw,
        heat_loss_without_insulation: loss_without_kw,
        reduction_percent: reduction_percent(loss_with_kw, loss_without_kw),
        layer_temperatures: layer_interface_temperatures(
            request.hot_temp,
            insulated.surface_temperature,
            request.layer_thicknesses.len(),
        ),
        mean_conductivity: insulated.conductivity,
        iterations: insulated.iterations,
        condensation,
        savings,
    })
}
