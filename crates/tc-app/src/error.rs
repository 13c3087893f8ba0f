//! Error types for the tc-app service layer.

use std::path::PathBuf;

use tc_materials::CatalogError;
use tc_solver::SolverError;

/// Application error type shared by the use cases and the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error(
        "No insulation thickness up to {max_thickness_mm} mm keeps the surface above the dew point ({dew_point:.1} °C)"
    )]
    NoSafeThickness { dew_point: f64, max_thickness_mm: u32 },

    #[error("Calculation exceeded the {deadline_ms} ms deadline")]
    Timeout { deadline_ms: u64 },

    #[error("Calculation worker stopped without a result")]
    WorkerLost,

    #[error("Failed to read settings file: {path}")]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read request file: {path}")]
    RequestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }
}
