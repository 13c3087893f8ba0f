//! Request validation against the catalog.

use serde::{Deserialize, Serialize};
use tc_core::units::mm;
use tc_materials::{Catalog, Finish, FuelProfile, Material};
use tc_solver::Geometry;

use crate::error::{AppError, AppResult};
use crate::request::{CondensationRequest, GeometryKind, HeatLossRequest};

/// A heat-loss request resolved against the catalog.
#[derive(Debug, Clone)]
pub struct ValidHeatLoss<'a> {
    pub material: &'a Material,
    pub finish: &'a Finish,
    pub fuel: Option<&'a FuelProfile>,
    pub geometry: Geometry,
    pub total_thickness_mm: f64,
}

#[derive(Debug, Clone)]
pub struct ValidCondensation<'a> {
    pub material: &'a Material,
    pub geometry: Geometry,
    pub max_thickness_mm: u32,
}

/// Outcome of a material temperature-range check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureCheck {
    pub material: String,
    pub temperature: f64,
    pub valid: bool,
    pub t_min: f64,
    pub t_max: f64,
    pub message: String,
}

pub fn validate_heat_loss<'a>(
    request: &HeatLossRequest,
    catalog: &'a Catalog,
) -> AppResult<ValidHeatLoss<'a>> {
    let material = catalog.require_material(&request.material)?;
    let finish = catalog.require_finish(&request.finish)?;

    ensure_finite(request.hot_temp, "hotTemp")?;
    ensure_finite(request.ambient_temp, "ambientTemp")?;
    if !material.accepts_temperature(request.hot_temp) {
        return Err(AppError::Validation(format!(
            "hot temperature {} °C is outside the range of '{}' ({} °C to {} °C)",
            request.hot_temp, material.name, material.t_min, material.t_max
        )));
    }
    if request.hot_temp <= request.ambient_temp {
        return Err(AppError::validation(
            "hot-face temperature must be above the ambient temperature",
        ));
    }

    if request.layer_thicknesses.is_empty() {
        return Err(AppError::validation("at least one insulation layer is required"));
    }
    if let Some((i, t)) = request
        .layer_thicknesses
        .iter()
        .enumerate()
        .find(|(_, t)| !(t.is_finite() && **t > 0.0))
    {
        return Err(AppError::Validation(format!(
            "layer {} thickness must be positive, got {t} mm",
            i + 1
        )));
    }

    ensure_wind(request.wind_speed)?;
    if let Some(rh) = request.relative_humidity {
        ensure_humidity(rh)?;
    }

    let fuel = match &request.financial {
        Some(financial) => {
            let fuel = catalog.require_fuel(&financial.fuel)?;
            if financial.fuel_cost.is_some_and(|c| !(c.is_finite() && c >= 0.0)) {
                return Err(AppError::validation("fuelCost must not be negative"));
            }
            if !(financial.area > 0.0) {
                return Err(AppError::validation("area must be positive"));
            }
            if !(0.0..=24.0).contains(&financial.hours_per_day) {
                return Err(AppError::validation("hoursPerDay must be within 0 to 24"));
            }
            if !(0.0..=7.0).contains(&financial.days_per_week) {
                return Err(AppError::validation("daysPerWeek must be within 0 to 7"));
            }
            Some(fuel)
        }
        None => None,
    };

    Ok(ValidHeatLoss {
        material,
        finish,
        fuel,
        geometry: resolve_geometry(request.geometry, request.pipe_diameter)?,
        total_thickness_mm: request.total_thickness_mm(),
    })
}

pub fn validate_condensation<'a>(
    request: &CondensationRequest,
    catalog: &'a Catalog,
    default_max_thickness_mm: u32,
) -> AppResult<ValidCondensation<'a>> {
    let material = catalog.require_material(&request.material)?;

    ensure_finite(request.internal_temp, "internalTemp")?;
    ensure_finite(request.ambient_temp, "ambientTemp")?;
    if request.ambient_temp <= request.internal_temp {
        return Err(AppError::validation(
            "ambient temperature must be above the internal temperature",
        ));
    }
    ensure_humidity(request.relative_humidity)?;
    ensure_wind(request.wind_speed)?;

    let max_thickness_mm = request.max_thickness.unwrap_or(default_max_thickness_mm);
    if max_thickness_mm == 0 {
        return Err(AppError::validation("maxThickness must be at least 1 mm"));
    }

    Ok(ValidCondensation {
        material,
        geometry: resolve_geometry(request.geometry, request.pipe_diameter)?,
        max_thickness_mm,
    })
}

/// Check a temperature against a material's service range.
pub fn check_temperature(
    catalog: &Catalog,
    material: &str,
    temperature: f64,
) -> AppResult<TemperatureCheck> {
    let material = catalog.require_material(material)?;
    let valid = material.accepts_temperature(temperature);
    let message = if valid {
        "temperature is within the material range".to_string()
    } else {
        format!(
            "temperature must be between {} °C and {} °C",
            material.t_min, material.t_max
        )
    };
    Ok(TemperatureCheck {
        material: material.name.clone(),
        temperature,
        valid,
        t_min: material.t_min,
        t_max: material.t_max,
        message,
    })
}

/// Map the request's geometry selector and pipe diameter (mm) to a solver geometry.
pub fn resolve_geometry(kind: GeometryKind, pipe_diameter_mm: Option<f64>) -> AppResult<Geometry> {
    match kind {
        GeometryKind::Flat => Ok(Geometry::FlatPlate),
        GeometryKind::Pipe => {
            let diameter = pipe_diameter_mm
                .ok_or_else(|| AppError::validation("pipe geometry requires pipeDiameter"))?;
            if !(diameter.is_finite() && diameter > 0.0) {
                return Err(AppError::Validation(format!(
                    "pipeDiameter must be positive, got {diameter} mm"
                )));
            }
            Ok(Geometry::pipe(mm(diameter))?)
        }
    }
}

fn ensure_finite(value: f64, field: &str) -> AppResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AppError::Validation(format!("{field} must be a finite number")))
    }
}

fn ensure_wind(wind_speed: f64) -> AppResult<()> {
    if wind_speed.is_finite() && wind_speed >= 0.0 {
        Ok(())
    } else {
        Err(AppError::validation("windSpeed must be zero or positive"))
    }
}

fn ensure_humidity(rh: f64) -> AppResult<()> {
    if rh > 0.0 && rh <= 100.0 {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "relativeHumidity must be within (0, 100] %, got {rh}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn request() -> HeatLossRequest {
        HeatLossRequest {
            material: "Calcium Silicate 240 kg/m³".into(),
            finish: "Oxidized/Weathered Aluminum".into(),
            geometry: GeometryKind::Flat,
            hot_temp: 300.0,
            ambient_temp: 25.0,
            layer_thicknesses: vec![50.0],
            pipe_diameter: None,
            wind_speed: 0.0,
            relative_humidity: None,
            financial: None,
        }
    }

    #[test]
    fn valid_request_resolves() {
        let catalog = catalog();
        let valid = validate_heat_loss(&request(), &catalog).unwrap();
        assert_eq!(valid.geometry, Geometry::FlatPlate);
        assert_eq!(valid.finish.emissivity, 0.25);
        assert_eq!(valid.total_thickness_mm, 50.0);
    }

    #[test]
    fn unknown_material_is_a_catalog_error() {
        let catalog = catalog();
        let req = HeatLossRequest {
            material: "Asbestos".into(),
            ..request()
        };
        assert!(matches!(
            validate_heat_loss(&req, &catalog),
            Err(AppError::Catalog(_))
        ));
    }

    #[test]
    fn hot_temperature_outside_material_range() {
        let catalog = catalog();
        let req = HeatLossRequest {
            hot_temp: 700.0,
            ..request()
        };
        assert!(matches!(
            validate_heat_loss(&req, &catalog),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn hot_must_exceed_ambient() {
        let catalog = catalog();
        let req = HeatLossRequest {
            hot_temp: 120.0,
            ambient_temp: 120.0,
            ..request()
        };
        assert!(matches!(
            validate_heat_loss(&req, &catalog),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn layers_must_be_present_and_positive() {
        let catalog = catalog();
        for layers in [vec![], vec![50.0, 0.0], vec![-10.0]] {
            let req = HeatLossRequest {
                layer_thicknesses: layers,
                ..request()
            };
            assert!(matches!(
                validate_heat_loss(&req, &catalog),
                Err(AppError::Validation(_))
            ));
        }
    }

    #[test]
    fn pipe_needs_a_positive_diameter() {
        assert!(resolve_geometry(GeometryKind::Pipe, None).is_err());
        assert!(resolve_geometry(GeometryKind::Pipe, Some(0.0)).is_err());
        assert_eq!(
            resolve_geometry(GeometryKind::Pipe, Some(88.9)).unwrap(),
            Geometry::Pipe { diameter: 0.0889 }
        );
        assert_eq!(
            resolve_geometry(GeometryKind::Flat, Some(88.9)).unwrap(),
            Geometry::FlatPlate
        );
    }

    #[test]
    fn condensation_requires_warmer_ambient() {
        let catalog = catalog();
        let req = CondensationRequest {
            material: "Elastomeric Foam 50 kg/m³".into(),
            geometry: GeometryKind::Flat,
            pipe_diameter: None,
            internal_temp: 30.0,
            ambient_temp: 25.0,
            relative_humidity: 70.0,
            wind_speed: 0.0,
            max_thickness: None,
            margin: Default::default(),
        };
        assert!(matches!(
            validate_condensation(&req, &catalog, 500),
            Err(AppError::Validation(_))
        ));

        let ok = CondensationRequest {
            internal_temp: 5.0,
            ..req
        };
        assert_eq!(validate_condensation(&ok, &catalog, 300).unwrap().max_thickness_mm, 300);
    }

    #[test]
    fn temperature_check_reports_range() {
        let catalog = catalog();
        let check = check_temperature(&catalog, "Calcium Silicate 240 kg/m³", 700.0).unwrap();
        assert!(!check.valid);
        assert_eq!(check.t_min, 100.0);
        assert_eq!(check.t_max, 650.0);
        assert!(check_temperature(&catalog, "Calcium Silicate 240 kg/m³", 650.0).unwrap().valid);
    }
}
