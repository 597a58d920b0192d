//! Fine-level construction from an implicit function.
//!
//! The pipeline is: sample the level set on the nodes of the grown domain,
//! classify cells, faces and edges, estimate the cut moments of everything
//! that is cut, and finally derive neighbor connectivity from the apertures.

use serde::{Deserialize, Serialize};

use crate::algs::classify::classify_level;
use crate::algs::connectivity::build_connectivity_level;
use crate::algs::parallel::map_points;
use crate::data::eb_level::EbLevel;
use crate::debug_invariants::DebugInvariants;
use crate::geometry::grid::CartesianGrid;
use crate::geometry::implicit::{ImplicitFunction, sample_level_set};
use crate::geometry::moments::{cell_moments, edge_centroid, face_moments};
use crate::mesh_error::MeshEbError;
use crate::topology::axis::Axis;
use crate::topology::cell_type::CellKind;
use crate::topology::index_range::{IndexRange, IndexType};

/// Options for [`build_level`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Halo width of the level. Coarsening `n` times with one coarse halo
    /// cell needs `2^n` here.
    pub ngrow: i32,
    /// Samples per axis used to estimate cut-cell and cut-face moments.
    pub subsamples: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            ngrow: 2,
            subsamples: 6,
        }
    }
}

impl BuildOptions {
    pub fn validate(&self) -> Result<(), MeshEbError> {
        if self.ngrow < 1 {
            return Err(MeshEbError::InvalidOption {
                name: "ngrow",
                reason: format!("need at least one halo cell, got {}", self.ngrow),
            });
        }
        if !(1..=64).contains(&self.subsamples) {
            return Err(MeshEbError::InvalidOption {
                name: "subsamples",
                reason: format!("must be in 1..=64, got {}", self.subsamples),
            });
        }
        Ok(())
    }
}

/// Build the geometry of `domain` on `grid` for the surface `f`.
pub fn build_level<F>(
    f: &F,
    grid: CartesianGrid,
    domain: IndexRange,
    opts: &BuildOptions,
) -> Result<EbLevel, MeshEbError>
where
    F: ImplicitFunction + ?Sized,
{
    opts.validate()?;
    let mut level = EbLevel::new(domain, opts.ngrow, grid)?;
    let grown = level.grown();
    let n = opts.subsamples;

    level.level_set = sample_level_set(f, &grid, &grown);
    let s = &level.level_set;
    let types = classify_level(s, &grown)?;
    crate::debug_invariants!(types.validate_invariants(), "fine-level classification");

    let cells = map_points(&grown, |iv| cell_moments(s, iv, types.cells[iv].kind(), n));
    let faces = Axis::ALL.map(|axis| {
        let r = grown.surrounding_nodes(axis);
        (r, map_points(&r, |iv| face_moments(s, axis, iv, types.face(axis, iv), n)))
    });
    let edges = Axis::ALL.map(|axis| {
        let r = grown.convert(IndexType::edge(axis));
        (r, map_points(&r, |iv| edge_centroid(s, axis, iv, types.edge(axis, iv))))
    });

    for (iv, m) in grown.iter().zip(cells) {
        level.set_cell(iv, &m);
    }
    for (axis, (r, moments)) in Axis::ALL.into_iter().zip(faces) {
        for (iv, m) in r.iter().zip(moments) {
            level.set_face(axis, iv, &m);
        }
    }
    for (axis, (r, centroids)) in Axis::ALL.into_iter().zip(edges) {
        let out = &mut level.edge_centroid[axis.index()];
        for (iv, e) in r.iter().zip(centroids) {
            out[iv] = e;
        }
    }

    build_connectivity_level(&mut level.flags, &level.area_frac);
    level.debug_assert_invariants();

    log::info!(
        "built level {}: {} regular, {} single-valued, {} covered cells",
        domain,
        level.count_cells(CellKind::Regular),
        level.count_cells(CellKind::SingleValued),
        level.count_cells(CellKind::Covered)
    );
    Ok(level)
}
