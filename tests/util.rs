#![allow(dead_code)]
use mesh_eb::prelude::*;
use mesh_eb::topology::index_range::IndexType;

/// Nodal level set over the nodes of `cells`, evaluated on integer indices.
pub fn nodal(cells: &IndexRange, f: impl Fn(IntVect) -> f64) -> RealArray {
    let nodes = cells.convert(IndexType::NODE);
    let mut s = RealArray::new(nodes, 1, 0.0);
    for iv in nodes.iter() {
        s[iv] = f(iv);
    }
    s
}

/// Off-center spherical cavity on `[-1, 1]³` with `n` cells per axis.
pub fn sphere_cavity() -> Sphere {
    Sphere {
        center: [0.01, -0.02, 0.015],
        radius: 0.45,
        fluid_inside: true,
    }
}

pub fn build_on_unit_box<F: ImplicitFunction>(f: &F, n: i32, ngrow: i32) -> EbLevel {
    let grid = CartesianGrid::uniform(-1.0, 1.0, n as u32).unwrap();
    let opts = BuildOptions {
        ngrow,
        ..Default::default()
    };
    build_level(f, grid, IndexRange::cube(n), &opts).unwrap()
}
