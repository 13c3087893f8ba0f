//! Application settings (YAML).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tc_materials::Catalog;
use tc_solver::EquilibriumConfig;
use tracing::info;

use crate::error::{AppError, AppResult};

/// Overrides for the equilibrium solver; unset fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverSettings {
    pub initial_offset: Option<f64>,
    pub initial_step: Option<f64>,
    pub min_step: Option<f64>,
    pub tolerance: Option<f64>,
    pub max_iterations: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Catalog file (YAML or JSON). The built-in catalog is used when unset.
    pub catalog: Option<PathBuf>,
    pub solver: SolverSettings,
    /// Wall-clock limit for a single calculation.
    pub deadline_ms: u64,
    /// Default search limit for condensation requests, mm.
    pub max_condensation_thickness: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            catalog: None,
            solver: SolverSettings::default(),
            deadline_ms: 10_000,
            max_condensation_thickness: tc_solver::condensation::DEFAULT_MAX_THICKNESS_MM,
        }
    }
}

impl AppSettings {
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let settings: Self = serde_yaml::from_str(content)?;
        settings.equilibrium_config()?;
        if settings.max_condensation_thickness == 0 {
            return Err(AppError::validation(
                "maxCondensationThickness must be at least 1 mm",
            ));
        }
        Ok(settings)
    }

    pub fn equilibrium_config(&self) -> AppResult<EquilibriumConfig> {
        let defaults = EquilibriumConfig::default();
        let s = &self.solver;
        let config = EquilibriumConfig {
            initial_offset: s.initial_offset.unwrap_or(defaults.initial_offset),
            initial_step: s.initial_step.unwrap_or(defaults.initial_step),
            min_step: s.min_step.unwrap_or(defaults.min_step),
            tolerance: s.tolerance.unwrap_or(defaults.tolerance),
            max_iterations: s.max_iterations.unwrap_or(defaults.max_iterations),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Resolve the catalog once; callers pass it to every use case.
    pub fn load_catalog(&self) -> AppResult<Catalog> {
        let catalog = match &self.catalog {
            Some(path) => {
                info!(path = %path.display(), "loading catalog");
                Catalog::load(path)?
            }
            None => Catalog::builtin()?,
        };
        Ok(catalog)
    }
}

/// Load settings from a YAML file.
pub fn load_settings(path: &Path) -> AppResult<AppSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::SettingsRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    AppSettings::from_yaml_str(&content)
}

/// Settings from `path` if given, defaults otherwise.
pub fn load_settings_or_default(path: Option<&Path>) -> AppResult<AppSettings> {
    match path {
        Some(path) => load_settings(path),
        None => Ok(AppSettings::default()),
    }
}
