//! Insulated surface geometry.

use tc_core::units::{Length, meters};

use crate::error::{SolverError, SolverResult};

/// Shape of the insulated surface.
///
/// A pipe carries its own outer diameter in meters, which is the inner
/// diameter of the first insulation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    FlatPlate,
    Pipe { diameter: f64 },
}

impl Geometry {
    pub fn flat_plate() -> Self {
        Geometry::FlatPlate
    }

    pub fn pipe(diameter: Length) -> SolverResult<Self> {
        let geometry = Geometry::Pipe {
            diameter: meters(diameter),
        };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn validate(&self) -> SolverResult<()> {
        match *self {
            Geometry::FlatPlate => Ok(()),
            Geometry::Pipe { diameter } if diameter.is_finite() && diameter > 0.0 => Ok(()),
            Geometry::Pipe { diameter } => Err(SolverError::InvalidGeometry {
                what: format!("pipe diameter must be positive, got {diameter} m"),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Geometry::FlatPlate => "flat plate",
            Geometry::Pipe { .. } => "pipe",
        }
    }

    /// Radius of the insulated surface, `None` for flat plates.
    pub fn inner_radius(&self) -> Option<f64> {
        match *self {
            Geometry::FlatPlate => None,
            Geometry::Pipe { diameter } => Some(diameter / 2.0),
        }
    }

    /// Outer diameter after `thickness` meters of insulation.
    pub fn outer_diameter(&self, thickness: f64) -> Option<f64> {
        self.inner_radius().map(|r| 2.0 * (r + thickness))
    }

    /// Running outer diameter at each layer boundary, starting at the bare pipe.
    ///
    /// Empty for flat plates.
    pub fn layer_boundary_diameters(&self, layer_thicknesses: &[f64]) -> Vec<f64> {
        let Geometry::Pipe { diameter } = *self else {
            return Vec::new();
        };
        let mut boundaries = Vec::with_capacity(layer_thicknesses.len() + 1);
        let mut current = diameter;
        boundaries.push(current);
        for t in layer_thicknesses {
            current += 2.0 * t;
            boundaries.push(current);
        }
        boundaries
    }
}
