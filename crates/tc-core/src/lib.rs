//! tc-core: stable foundation for thermalcalc.
//!
//! Contains:
//! - units (uom SI types + constructors, physical constants)
//! - numeric (Real, finiteness and range checks, display rounding)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{TcError, TcResult};
pub use numeric::*;
pub use units::*;
