//! tc-materials: insulation materials and their conductivity functions.
//!
//! - formula: restricted `k(T)` parser and evaluator
//! - catalog: materials, surface finishes and fuel profiles

pub mod catalog;
pub mod error;
pub mod formula;

pub use catalog::{Catalog, Finish, FuelProfile, Material};
pub use error::{CatalogError, CatalogResult, FormulaError, FormulaResult};
pub use formula::{ConductivityFunction, Expr};
