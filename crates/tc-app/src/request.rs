//! Request schemas for the heat-loss and condensation calculations.
//!
//! Field names are camelCase on the wire; thicknesses and diameters are in
//! millimeters, temperatures in °C, wind in m/s and humidity in percent.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tc_solver::DewPointMargin;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeometryKind {
    #[serde(alias = "flatPlate", alias = "plate")]
    Flat,
    Pipe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatLossRequest {
    pub material: String,
    pub finish: String,
    pub geometry: GeometryKind,
    pub hot_temp: f64,
    pub ambient_temp: f64,
    pub layer_thicknesses: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipe_diameter: Option<f64>,
    #[serde(default)]
    pub wind_speed: f64,
    /// When present, the surface is also checked against the dew point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial: Option<FinancialRequest>,
}

impl HeatLossRequest {
    pub fn total_thickness_mm(&self) -> f64 {
        self.layer_thicknesses.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRequest {
    pub fuel: String,
    /// Overrides the catalog unit cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_cost: Option<f64>,
    /// Insulated area, m².
    #[serde(default = "default_area")]
    pub area: f64,
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
    #[serde(default = "default_days_per_week")]
    pub days_per_week: f64,
}

fn default_area() -> f64 {
    10.0
}

fn default_hours_per_day() -> f64 {
    8.0
}

fn default_days_per_week() -> f64 {
    5.0
}

/// Dew point clearance required by the minimum-thickness search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarginPolicy {
    /// Surface at or above the dew point.
    #[default]
    Condensation,
    /// Surface at least 2 K above the dew point.
    HeatLoss,
}

impl MarginPolicy {
    pub fn dew_point_margin(self) -> DewPointMargin {
        match self {
            MarginPolicy::Condensation => DewPointMargin::CONDENSATION,
            MarginPolicy::HeatLoss => DewPointMargin::HEAT_LOSS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CondensationRequest {
    pub material: String,
    pub geometry: GeometryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipe_diameter: Option<f64>,
    pub internal_temp: f64,
    pub ambient_temp: f64,
    pub relative_humidity: f64,
    #[serde(default)]
    pub wind_speed: f64,
    /// Search limit in mm; falls back to the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_thickness: Option<u32>,
    #[serde(default)]
    pub margin: MarginPolicy,
}

/// Load a request from a YAML (or `.json`) file.
pub fn load_request<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::RequestRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(serde_json::from_str(&content)?),
        _ => Ok(serde_yaml::from_str(&content)?),
    }
}
