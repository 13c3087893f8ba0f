//! Formula and catalog errors.

use std::path::PathBuf;

use tc_core::TcError;
use thiserror::Error;

/// Result type for conductivity formula operations.
pub type FormulaResult<T> = Result<T, FormulaError>;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while parsing or evaluating a conductivity formula.
///
/// `pos` is a char index into the formula after decimal commas were rewritten
/// to points. The rewrite maps one char to one char, so the index also points
/// into the text as written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Formula is empty")]
    Empty,

    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Malformed number '{text}' at position {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("Unexpected {found} at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("Unexpected end of formula")]
    UnexpectedEnd,

    #[error("Identifier '{name}' is not allowed (only T is a variable)")]
    UnknownIdentifier { name: String, pos: usize },

    #[error("Function '{name}' is not allowed (allowed: exp, log, sqrt, pow)")]
    UnknownFunction { name: String, pos: usize },

    #[error("Formula nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("Function {func} takes {expected} argument(s), got {found}")]
    Arity {
        func: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("Math domain error in {what} (argument {value})")]
    Domain { what: &'static str, value: f64 },

    #[error("Formula evaluated to a non-finite value at T = {temperature}")]
    NonFinite { temperature: f64 },
}

/// Errors raised while building, loading or querying a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid conductivity formula for material '{material}': {source}")]
    Formula {
        material: String,
        #[source]
        source: FormulaError,
    },

    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Invalid {field} for {kind} '{name}': {reason}")]
    InvalidValue {
        kind: &'static str,
        name: String,
        field: &'static str,
        reason: String,
    },

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("Failed to read catalog file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<FormulaError> for TcError {
    fn from(err: FormulaError) -> Self {
        match err {
            FormulaError::Domain { what, .. } => TcError::InvalidArg { what },
            FormulaError::NonFinite { temperature } => TcError::NonFinite {
                what: "conductivity",
                value: temperature,
            },
            _ => TcError::InvalidArg {
                what: "conductivity formula",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FormulaError::UnknownFunction {
            name: "system".into(),
            pos: 0,
        };
        assert!(err.to_string().contains("system"));

        let err = CatalogError::NotFound {
            kind: "Material",
            name: "Unobtainium".into(),
        };
        assert!(err.to_string().contains("Unobtainium"));
    }

    #[test]
    fn error_to_tc_error() {
        let err = FormulaError::Domain {
            what: "log",
            value: -1.0,
        };
        let tc: TcError = err.into();
        assert!(matches!(tc, TcError::InvalidArg { what: "log" }));
    }
}
