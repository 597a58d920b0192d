//! Physical placement of a structured index space.

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshEbError;
use crate::topology::index_range::IntVect;

/// Uniform Cartesian grid: node `(0, 0, 0)` sits at `origin` and cells are
/// `spacing` wide along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartesianGrid {
    origin: [f64; 3],
    spacing: [f64; 3],
}

impl CartesianGrid {
    /// Build a grid, rejecting non-positive or non-finite spacing.
    pub fn try_new(origin: [f64; 3], spacing: [f64; 3]) -> Result<Self, MeshEbError> {
        if spacing.iter().any(|h| !h.is_finite() || *h <= 0.0) {
            return Err(MeshEbError::InvalidOption {
                name: "spacing",
                reason: format!("{spacing:?} must be finite and positive"),
            });
        }
        Ok(CartesianGrid { origin, spacing })
    }

    /// Grid covering `[lo, hi]³` with `n` cells per axis, cell 0 starting at `lo`.
    pub fn uniform(lo: f64, hi: f64, n: u32) -> Result<Self, MeshEbError> {
        let h = (hi - lo) / f64::from(n);
        Self::try_new([lo; 3], [h; 3])
    }

    #[inline]
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    #[inline]
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// Physical position of node `iv`.
    #[inline]
    pub fn node_position(&self, iv: IntVect) -> [f64; 3] {
        [
            self.origin[0] + f64::from(iv.0[0]) * self.spacing[0],
            self.origin[1] + f64::from(iv.0[1]) * self.spacing[1],
            self.origin[2] + f64::from(iv.0[2]) * self.spacing[2],
        ]
    }

    /// Physical center of cell `iv`.
    #[inline]
    pub fn cell_center(&self, iv: IntVect) -> [f64; 3] {
        let n = self.node_position(iv);
        [
            n[0] + 0.5 * self.spacing[0],
            n[1] + 0.5 * self.spacing[1],
            n[2] + 0.5 * self.spacing[2],
        ]
    }

    /// Volume of one full cell.
    pub fn cell_volume(&self) -> f64 {
        self.spacing.iter().product()
    }

    /// Same origin, spacing multiplied by `ratio`.
    pub fn coarsen(&self, ratio: i32) -> Self {
        let r = f64::from(ratio);
        CartesianGrid {
            origin: self.origin,
            spacing: self.spacing.map(|h| h * r),
        }
    }
}

impl Default for CartesianGrid {
    /// Unit spacing anchored at the origin.
    fn default() -> Self {
        CartesianGrid {
            origin: [0.0; 3],
            spacing: [1.0; 3],
        }
    }
}
