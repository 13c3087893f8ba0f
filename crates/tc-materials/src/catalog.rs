//! Insulation material, surface finish and fuel catalog.
//!
//! The catalog is an explicit value: build it once (built-in data or a
//! YAML/JSON file) and pass it to whatever validates requests.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::formula::ConductivityFunction;

/// Insulation material with a temperature-dependent conductivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// `k(T)` in W/(m·K), `T` in °C.
    #[serde(rename = "k_func")]
    pub conductivity: ConductivityFunction,
    /// Lowest service temperature, °C.
    pub t_min: f64,
    /// Highest service temperature, °C.
    pub t_max: f64,
}

impl Material {
    /// Inclusive service-range check.
    pub fn accepts_temperature(&self, temperature_c: f64) -> bool {
        self.t_min <= temperature_c && temperature_c <= self.t_max
    }

    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty() || self.name.to_lowercase().contains(&query)
    }
}

/// Outer jacket / surface finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finish {
    pub name: String,
    pub emissivity: f64,
}

/// Fuel used to price the heat saved by insulating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelProfile {
    pub name: String,
    /// Default price per fuel unit (currency / unit).
    pub unit_cost: f64,
    /// Usable energy per fuel unit, kWh / unit.
    pub heating_value_kwh: f64,
    /// Combustion / conversion efficiency, 0..1.
    pub efficiency: f64,
    /// kg CO2 per fuel unit.
    pub emission_factor_kg: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub finishes: Vec<Finish>,
    #[serde(default)]
    pub fuels: Vec<FuelProfile>,
}

// (name, k(T), t_min, t_max)
const BUILTIN_MATERIALS: [(&str, &str, f64, f64); 22] = [
    ("Ceramic Fiber 48 kg/m³", "0.00000014 * T**2 + 0.00015 * T + 0.048", 100.0, 800.0),
    ("Ceramic Fiber 64 kg/m³", "0.00000012 * T**2 + 0.00013 * T + 0.041", 100.0, 1000.0),
    ("Ceramic Fiber 96 kg/m³", "0.00000011 * T**2 + 0.00011 * T + 0.035", 100.0, 1260.0),
    ("Ceramic Fiber 128 kg/m³", "0.00000010 * T**2 + 0.00010 * T + 0.032", 100.0, 1400.0),
    ("Rock Wool 32 kg/m³", "0.00000021 * T**2 + 0.00008 * T + 0.034", 20.0, 350.0),
    ("Rock Wool 48 kg/m³", "0.00000019 * T**2 + 0.00007 * T + 0.033", 20.0, 450.0),
    ("Rock Wool 64 kg/m³", "0.00000017 * T**2 + 0.00007 * T + 0.032", 20.0, 650.0),
    ("Glass Fiber Blanket (Industrial) 48 kg/m³", "0.00000018 * T**2 + 0.00009 * T + 0.036", 20.0, 540.0),
    ("Glass Fiber Blanket 130 kg/m³ up to 800°C", "0.0286 * math.exp(0.0029 * T)", 25.0, 800.0),
    ("Aerogel Blanket (Industrial)", "0.021 + 0.0001 * T", -40.0, 650.0),
    ("Aerogel Blanket (Cryogenic)", "0.014 + 0.00006 * T", -200.0, 125.0),
    ("Dense Refractory Castable 1800 kg/m³", "1.1", 100.0, 1400.0),
    ("Insulating Refractory Castable 800 kg/m³", "0.0002 * T + 0.18", 100.0, 1100.0),
    ("Calcium Silicate 240 kg/m³", "0.00015 * T + 0.05", 100.0, 650.0),
    ("Elastomeric Foam 50 kg/m³", "0.0000001 * T**2 + 0.00008 * T + 0.034", -50.0, 110.0),
    ("Rigid Polyisocyanurate Foam (PIR) 35 kg/m³", "0.0001 * T + 0.023", -180.0, 150.0),
    ("Cellular Glass 120 kg/m³", "0.00017*T + 0.041", -268.0, 430.0),
    ("Expanded Perlite (Granular)", "0.00011 * T + 0.045", -200.0, 800.0),
    ("Exfoliated Vermiculite (Granular)", "0.00015 * T + 0.062", 50.0, 1100.0),
    ("Rigid Polyurethane Foam (PUR) 35 kg/m³", "0.00000005 * T**2 + 0.00008 * T + 0.025", -180.0, 110.0),
    ("Extruded Polystyrene (XPS) 30 kg/m³", "0.0001 * T + 0.029", -50.0, 75.0),
    ("Expanded Polystyrene (EPS) 20 kg/m³", "0.00011 * T + 0.034", -50.0, 80.0),
];

const BUILTIN_FINISHES: [(&str, f64); 11] = [
    ("Removable Thermal Jacket (Fabric)", 0.90),
    ("Polished Aluminum (New)", 0.05),
    ("Rough/Matte Aluminum", 0.07),
    ("Oxidized/Weathered Aluminum", 0.25),
    ("Polished Stainless Steel (New)", 0.08),
    ("Weathered Stainless Steel", 0.85),
    ("Galvanized Steel (New)", 0.23),
    ("Oxidized Galvanized Steel", 0.28),
    ("Painted Surface (White Enamel)", 0.87),
    ("Painted Surface (Matte Black Enamel)", 0.97),
    ("Painted Surface (Aluminum Paint)", 0.31),
];

// (name, unit cost, kWh per unit, efficiency, kg CO2 per unit)
const BUILTIN_FUELS: [(&str, f64, f64, f64, f64); 7] = [
    ("Steam (t)", 150.00, 628.00, 1.00, 134.0),
    ("Electricity (kWh)", 0.75, 1.00, 1.00, 0.0358),
    ("Natural Gas (m³)", 3.60, 9.65, 0.75, 2.0),
    ("LPG (kg)", 6.80, 12.78, 0.78, 3.0),
    ("Diesel Oil (L)", 6.10, 10.11, 0.82, 2.63),
    ("Heavy Fuel Oil (kg)", 3.50, 11.34, 0.80, 3.15),
    ("Eucalyptus Firewood (t)", 200.00, 3500.00, 0.70, 0.05),
];

impl Catalog {
    /// The canonical built-in catalog.
    pub fn builtin() -> CatalogResult<Self> {
        let materials = BUILTIN_MATERIALS
            .iter()
            .map(|&(name, k_func, t_min, t_max)| {
                Ok(Material {
                    name: name.to_string(),
                    conductivity: parse_formula(name, k_func)?,
                    t_min,
                    t_max,
                })
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        let finishes = BUILTIN_FINISHES
            .iter()
            .map(|&(name, emissivity)| Finish {
                name: name.to_string(),
                emissivity,
            })
            .collect();

        let fuels = BUILTIN_FUELS
            .iter()
            .map(
                |&(name, unit_cost, heating_value_kwh, efficiency, emission_factor_kg)| {
                    FuelProfile {
                        name: name.to_string(),
                        unit_cost,
                        heating_value_kwh,
                        efficiency,
                        emission_factor_kg,
                    }
                },
            )
            .collect();

        let catalog = Self {
            materials,
            finishes,
            fuels,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_yaml_str(content: &str) -> CatalogResult<Self> {
        let catalog: Self = serde_yaml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> CatalogResult<Self> {
        let catalog: Self = serde_json::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load_yaml(path: &Path) -> CatalogResult<Self> {
        Self::from_yaml_str(&read(path)?)
    }

    pub fn load_json(path: &Path) -> CatalogResult<Self> {
        Self::from_json_str(&read(path)?)
    }

    /// Load by file extension (`.json` is JSON, anything else YAML).
    pub fn load(path: &Path) -> CatalogResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::load_json(path),
            _ => Self::load_yaml(path),
        }
    }

    pub fn to_yaml_string(&self) -> CatalogResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check names are unique and values physically meaningful.
    pub fn validate(&self) -> CatalogResult<()> {
        ensure_unique("material", self.materials.iter().map(|m| m.name.as_str()))?;
        ensure_unique("finish", self.finishes.iter().map(|f| f.name.as_str()))?;
        ensure_unique("fuel", self.fuels.iter().map(|f| f.name.as_str()))?;

        for material in &self.materials {
            if !(material.t_min.is_finite()
                && material.t_max.is_finite()
                && material.t_min < material.t_max)
            {
                return Err(invalid(
                    "material",
                    &material.name,
                    "temperature range",
                    format!("t_min {} must be below t_max {}", material.t_min, material.t_max),
                ));
            }
        }

        for finish in &self.finishes {
            if !(finish.emissivity > 0.0 && finish.emissivity <= 1.0) {
                return Err(invalid(
                    "finish",
                    &finish.name,
                    "emissivity",
                    format!("{} is outside (0, 1]", finish.emissivity),
                ));
            }
        }

        for fuel in &self.fuels {
            if !(fuel.heating_value_kwh > 0.0) {
                return Err(invalid(
                    "fuel",
                    &fuel.name,
                    "heating value",
                    format!("{} must be positive", fuel.heating_value_kwh),
                ));
            }
            if !(fuel.efficiency > 0.0 && fuel.efficiency <= 1.0) {
                return Err(invalid(
                    "fuel",
                    &fuel.name,
                    "efficiency",
                    format!("{} is outside (0, 1]", fuel.efficiency),
                ));
            }
            if !(fuel.unit_cost >= 0.0 && fuel.emission_factor_kg >= 0.0) {
                return Err(invalid(
                    "fuel",
                    &fuel.name,
                    "cost or emission factor",
                    "must not be negative".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| same_name(&m.name, name))
    }

    pub fn finish(&self, name: &str) -> Option<&Finish> {
        self.finishes.iter().find(|f| same_name(&f.name, name))
    }

    pub fn fuel(&self, name: &str) -> Option<&FuelProfile> {
        self.fuels.iter().find(|f| same_name(&f.name, name))
    }

    pub fn require_material(&self, name: &str) -> CatalogResult<&Material> {
        self.material(name).ok_or_else(|| not_found("Material", name))
    }

    pub fn require_finish(&self, name: &str) -> CatalogResult<&Finish> {
        self.finish(name).ok_or_else(|| not_found("Finish", name))
    }

    pub fn require_fuel(&self, name: &str) -> CatalogResult<&FuelProfile> {
        self.fuel(name).ok_or_else(|| not_found("Fuel", name))
    }

    pub fn filter_materials<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a Material> {
        self.materials.iter().filter(move |m| m.matches_query(query))
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn parse_formula(material: &str, source: &str) -> CatalogResult<ConductivityFunction> {
    ConductivityFunction::parse(source).map_err(|source| CatalogError::Formula {
        material: material.to_string(),
        source,
    })
}

fn read(path: &Path) -> CatalogResult<String> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_unique<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> CatalogResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.trim().to_lowercase()) {
            return Err(CatalogError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn invalid(kind: &'static str, name: &str, field: &'static str, reason: String) -> CatalogError {
    CatalogError::InvalidValue {
        kind,
        name: name.to_string(),
        field,
        reason,
    }
}

fn not_found(kind: &'static str, name: &str) -> CatalogError {
    CatalogError::NotFound {
        kind,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.materials.len(), 22);
        assert_eq!(catalog.finishes.len(), 11);
        assert_eq!(catalog.fuels.len(), 7);
    }

    #[test]
    fn builtin_formulas_are_positive_in_service() {
        let catalog = Catalog::builtin().unwrap();
        for material in &catalog.materials {
            for t in [0.5 * (material.t_min + material.t_max), material.t_max] {
                let k = material.conductivity.evaluate(t).unwrap();
                assert!(k > 0.0, "{} at {t}: {k}", material.name);
            }
        }
    }

    #[test]
    fn cellular_glass_goes_non_positive_near_its_lower_limit() {
        // The linear fit crosses zero around -241 °C; the solver reports that
        // as non-positive conductivity instead of the catalog rejecting it.
        let catalog = Catalog::builtin().unwrap();
        let m = catalog.material("Cellular Glass 120 kg/m³").unwrap();
        assert!(m.conductivity.evaluate(m.t_min).unwrap() <= 0.0);
        assert!(m.conductivity.evaluate(-200.0).unwrap() > 0.0);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.material("rock wool 64 kg/m³").is_some());
        assert!(catalog.finish("  POLISHED ALUMINUM (NEW) ").is_some());
        assert!(catalog.fuel("natural gas (m³)").is_some());
        assert!(matches!(
            catalog.require_material("Unobtainium"),
            Err(CatalogError::NotFound { kind: "Material", .. })
        ));
    }

    #[test]
    fn temperature_range_is_inclusive() {
        let catalog = Catalog::builtin().unwrap();
        let m = catalog.material("Calcium Silicate 240 kg/m³").unwrap();
        assert!(m.accepts_temperature(100.0));
        assert!(m.accepts_temperature(650.0));
        assert!(!m.accepts_temperature(650.1));
        assert!(!m.accepts_temperature(99.9));
    }

    #[test]
    fn filter_by_name_fragment() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.filter_materials("ceramic").count(), 4);
        assert_eq!(catalog.filter_materials("").count(), 22);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut catalog = Catalog::builtin().unwrap();
        let dup = catalog.finishes[0].clone();
        catalog.finishes.push(Finish {
            name: dup.name.to_uppercase(),
            emissivity: dup.emissivity,
        });
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateName { kind: "finish", .. })
        ));
    }

    #[test]
    fn bad_emissivity_is_rejected() {
        let catalog = Catalog {
            finishes: vec![Finish {
                name: "Mirror".into(),
                emissivity: 0.0,
            }],
            ..Catalog::default()
        };
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::InvalidValue {
                field: "emissivity",
                ..
            })
        ));
    }

    #[test]
    fn yaml_round_trip_preserves_formulas() {
        let catalog = Catalog::builtin().unwrap();
        let yaml = catalog.to_yaml_string().unwrap();
        let back = Catalog::from_yaml_str(&yaml).unwrap();
        assert_eq!(back, catalog);
    }

    #[test]
    fn yaml_with_disallowed_formula_fails_to_load() {
        let yaml = r#"
materials:
  - name: Suspicious
    k_func: "open('/etc/passwd')"
    t_min: 0
    t_max: 100
"#;
        assert!(Catalog::from_yaml_str(yaml).is_err());
    }
}
