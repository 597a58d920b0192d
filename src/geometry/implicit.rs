//! Implicit surface descriptions and nodal level-set sampling.
//!
//! Sign convention throughout the crate: a negative value is on the fluid
//! (regular) side of the surface, zero or positive is on the solid (covered)
//! side.

use serde::{Deserialize, Serialize};

use crate::algs::parallel::fill_points;
use crate::data::field::RealArray;
use crate::geometry::grid::CartesianGrid;
use crate::topology::index_range::{IndexRange, IndexType};

/// A scalar field whose zero level set is the embedded boundary.
pub trait ImplicitFunction: Sync {
    /// Level-set value at physical position `p`.
    fn value(&self, p: [f64; 3]) -> f64;
}

impl<F> ImplicitFunction for F
where
    F: Fn([f64; 3]) -> f64 + Sync,
{
    fn value(&self, p: [f64; 3]) -> f64 {
        self(p)
    }
}

/// Sphere of `radius` around `center`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: [f64; 3],
    pub radius: f64,
    /// Fluid inside the sphere (a cavity) instead of outside (an obstacle).
    pub fluid_inside: bool,
}

impl ImplicitFunction for Sphere {
    fn value(&self, p: [f64; 3]) -> f64 {
        let d = dist(p, self.center) - self.radius;
        if self.fluid_inside { d } else { -d }
    }
}

/// Half-space bounded by the plane through `point`; fluid lies on the side
/// opposite to `normal`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub point: [f64; 3],
    pub normal: [f64; 3],
}

impl ImplicitFunction for Plane {
    fn value(&self, p: [f64; 3]) -> f64 {
        (0..3)
            .map(|d| (p[d] - self.point[d]) * self.normal[d])
            .sum()
    }
}

fn dist(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Sample `f` at every node bounding the cells of `cells`.
pub fn sample_level_set<F>(f: &F, grid: &CartesianGrid, cells: &IndexRange) -> RealArray
where
    F: ImplicitFunction + ?Sized,
{
    let nodes = cells.convert(IndexType::NODE);
    let mut out = RealArray::new(nodes, 1, 0.0);
    fill_points(&mut out, &nodes, |iv| f.value(grid.node_position(iv)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::index_range::IntVect;

    #[test]
    fn sphere_sign_convention() {
        let cavity = Sphere {
            center: [0.0; 3],
            radius: 1.0,
            fluid_inside: true,
        };
        assert!(cavity.value([0.0; 3]) < 0.0);
        assert!(cavity.value([2.0, 0.0, 0.0]) > 0.0);
        let obstacle = Sphere {
            fluid_inside: false,
            ..cavity
        };
        assert!(obstacle.value([0.0; 3]) > 0.0);
    }

    #[test]
    fn samples_cover_bounding_nodes() {
        let grid = CartesianGrid::default();
        let cells = IndexRange::cube(2);
        let plane = Plane {
            point: [1.0, 0.0, 0.0],
            normal: [1.0, 0.0, 0.0],
        };
        let ls = sample_level_set(&plane, &grid, &cells);
        assert_eq!(ls.range().num_points(), 27);
        assert_eq!(ls[IntVect::new(0, 2, 2)], -1.0);
        assert_eq!(ls[IntVect::new(1, 0, 0)], 0.0);
        assert_eq!(ls[IntVect::new(2, 1, 0)], 1.0);

        let closure = |p: [f64; 3]| p[2] - 0.5;
        let ls = sample_level_set(&closure, &grid, &cells);
        assert_eq!(ls[IntVect::new(0, 0, 1)], 0.5);
    }
}
