//! Coarsening of embedded-boundary geometry by a factor of two.
//!
//! Coarse cell `iv` covers fine cells `2 iv + {0, 1}³`. Fine centroids are
//! remapped into the coarse cell's frame before averaging: a fine coordinate
//! `c` in octant offset `o` along an axis becomes `c / 2 - 1/4` for `o = 0`
//! and `c / 2 + 1/4` for `o = 1`.
//!
//! The per-index kernel [`coarsen_at`] is pure. [`coarsen_level`] maps it
//! over the whole coarse index space, reduces the per-cell outcomes and
//! assembles the coarse [`EbLevel`].

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::algs::connectivity::build_connectivity_level;
use crate::algs::mvmc::check_multivalued;
use crate::algs::parallel::{fill_points, map_points};
use crate::algs::reduction::{AmbiguityReason, Coarsenability, CoarsenReport, reduce};
use crate::data::eb_level::{CellMoments, EDGE_COVERED, EDGE_REGULAR, EbLevel, FaceMoments, NO_BOUNDARY};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshEbError;
use crate::topology::axis::Axis;
use crate::topology::cell_type::CellKind;
use crate::topology::index_range::{IndexRange, IndexType, IntVect};

/// Options for [`coarsen_level`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoarsenOptions {
    /// Halo width of the coarse level. The fine level needs twice as many.
    pub ngrow: i32,
    /// Run the multi-valued cell check on every coarse cell.
    pub check_multivalued: bool,
}

impl Default for CoarsenOptions {
    fn default() -> Self {
        CoarsenOptions {
            ngrow: 1,
            check_multivalued: true,
        }
    }
}

impl CoarsenOptions {
    pub fn validate(&self) -> Result<(), MeshEbError> {
        if self.ngrow < 1 {
            return Err(MeshEbError::InvalidOption {
                name: "ngrow",
                reason: format!("coarse levels need at least one halo cell, got {}", self.ngrow),
            });
        }
        Ok(())
    }
}

/// Combine the centroids of the two fine sub-edges of a coarse edge.
///
/// Inputs and output are edge centroids: a position in `[-0.5, 0.5]` or one of
/// the sentinels `1.0` (fully open) and `-1.0` (fully covered).
pub fn coarsen_edge_centroid(f1: f64, f2: f64) -> f64 {
    if f1 == EDGE_REGULAR && f2 == EDGE_REGULAR {
        return EDGE_REGULAR;
    }
    if f1 == EDGE_COVERED && f2 == EDGE_COVERED {
        return EDGE_COVERED;
    }
    let f1 = if f1 == EDGE_COVERED {
        0.0
    } else if f1 == EDGE_REGULAR {
        -0.25
    } else {
        0.5 * f1 - 0.25
    };
    let f2 = if f2 == EDGE_COVERED {
        0.0
    } else if f2 == EDGE_REGULAR {
        0.25
    } else {
        0.5 * f2 + 0.25
    };
    let r = (f2 * f2 - f1 * f1) / (f2 - f1 + 1.0e-30);
    r.clamp(-0.5, 0.5)
}

/// Fine centroid component remapped into the coarse frame.
#[inline]
fn remap(c: f64, octant: i32) -> f64 {
    if octant == 0 { 0.5 * c - 0.25 } else { 0.5 * c + 0.25 }
}

/// The eight fine cells of coarse cell `iv` with their octant offsets.
fn octants(iv: IntVect) -> impl Iterator<Item = (IntVect, IntVect)> {
    let base = iv * 2;
    iproduct!(0..2, 0..2, 0..2).map(move |(c, b, a)| {
        let o = IntVect::new(a, b, c);
        (base + o, o)
    })
}

/// Whether all 24 fine faces on the boundary of coarse cell `iv` are fully
/// open.
fn boundary_faces_open(iv: IntVect, fine: &EbLevel) -> bool {
    let base = iv * 2;
    Axis::ALL.into_iter().all(|axis| {
        let (p1, p2) = axis.perpendicular();
        iproduct!([0, 2], 0..2, 0..2).all(|(side, b, a)| {
            let f = base.shift(axis, side).shift(p1, a).shift(p2, b);
            fine.area_frac[axis.index()][f] == 1.0
        })
    })
}

/// Coarsen cell `iv` from `fine`.
pub fn coarsen_cell(iv: IntVect, fine: &EbLevel) -> (CellMoments, Coarsenability) {
    if octants(iv).all(|(f, _)| fine.flags[f].is_regular()) {
        return (CellMoments::REGULAR, Coarsenability::Valid);
    }
    if octants(iv).all(|(f, _)| fine.flags[f].is_covered()) {
        return (CellMoments::COVERED, Coarsenability::Valid);
    }

    let mut vol = 0.0;
    let mut vcent = [0.0; 3];
    let mut area = 0.0;
    let mut bcent = [0.0; 3];
    let mut normal = [0.0; 3];
    for (f, o) in octants(iv) {
        let fv = fine.vol_frac[f];
        let fa = fine.bndry_area[f];
        vol += fv;
        area += fa;
        for d in 0..3 {
            vcent[d] += fv * remap(fine.centroid[(f, d)], o.0[d]);
            bcent[d] += fa * remap(fine.bndry_centroid[(f, d)], o.0[d]);
            normal[d] += fa * fine.bndry_normal[(f, d)];
        }
    }

    let vol_frac = 0.125 * vol;
    let centroid = if vol_frac != 0.0 {
        vcent.map(|x| 0.125 * x / vol_frac)
    } else {
        [0.0; 3]
    };
    let bndry_area = 0.25 * area;
    let bndry_centroid = if bndry_area != 0.0 {
        bcent.map(|x| 0.25 * x / bndry_area)
    } else {
        [NO_BOUNDARY; 3]
    };
    let nfac = 1.0 / (normal.iter().map(|x| x * x).sum::<f64>() + 1.0e-30).sqrt();
    let bndry_normal = normal.map(|x| x * nfac);

    let status = if normal == [0.0; 3] {
        Coarsenability::Ambiguous(AmbiguityReason::DegenerateNormal)
    } else if boundary_faces_open(iv, fine) {
        Coarsenability::Ambiguous(AmbiguityReason::EnclosedObject)
    } else {
        Coarsenability::Valid
    };

    (
        CellMoments {
            kind: CellKind::SingleValued,
            vol_frac,
            centroid,
            bndry_area,
            bndry_centroid,
            bndry_normal,
        },
        status,
    )
}

/// Coarsen the face normal to `axis` with lowest node `iv`.
pub fn coarsen_face(axis: Axis, iv: IntVect, fine: &EbLevel) -> FaceMoments {
    let d = axis.index();
    let (p1, p2) = axis.perpendicular();
    let base = iv * 2;

    let mut sum = 0.0;
    let mut cent = [0.0; 2];
    for (b, a) in iproduct!(0..2, 0..2) {
        let f = base.shift(p1, a).shift(p2, b);
        let ap = fine.area_frac[d][f];
        sum += ap;
        cent[0] += ap * remap(fine.face_centroid[d][(f, 0)], a);
        cent[1] += ap * remap(fine.face_centroid[d][(f, 1)], b);
    }

    let area = 0.25 * sum;
    if area == 0.0 {
        return FaceMoments::CLOSED;
    }
    FaceMoments {
        area,
        centroid: cent.map(|x| 0.25 * x / area),
    }
}

/// Coarsen the edge along `axis` with lower node `iv`.
pub fn coarsen_edge(axis: Axis, iv: IntVect, fine: &EbLevel) -> f64 {
    let ec = &fine.edge_centroid[axis.index()];
    let f = iv * 2;
    coarsen_edge_centroid(ec[f], ec[f + axis.unit()])
}

/// Everything [`coarsen_at`] computes for one coarse index.
///
/// Each part is `None` when the index lies outside the grown range of that
/// entity type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoarsenedPoint {
    pub cell: Option<CellMoments>,
    pub faces: [Option<FaceMoments>; 3],
    pub edges: [Option<f64>; 3],
    pub status: Coarsenability,
}

/// Coarsen every entity numbered `iv`: the cell, the three faces and the
/// three edges whose lowest node is `iv`.
///
/// Entities inside `bx` are computed from `fine`. Entities inside
/// `bx.grow(ngrow)` but outside `bx` get the regular sentinels.
pub fn coarsen_at(iv: IntVect, bx: &IndexRange, ngrow: i32, fine: &EbLevel) -> CoarsenedPoint {
    let gbx = bx.grow(ngrow);
    let mut status = Coarsenability::Valid;

    let cell = if bx.contains(iv) {
        let (m, s) = coarsen_cell(iv, fine);
        status = s;
        Some(m)
    } else if gbx.contains(iv) {
        Some(CellMoments::REGULAR)
    } else {
        None
    };

    let faces = Axis::ALL.map(|axis| {
        if bx.surrounding_nodes(axis).contains(iv) {
            Some(coarsen_face(axis, iv, fine))
        } else if gbx.surrounding_nodes(axis).contains(iv) {
            Some(FaceMoments::OPEN)
        } else {
            None
        }
    });

    let edges = Axis::ALL.map(|axis| {
        let ixtype = IndexType::edge(axis);
        if bx.convert(ixtype).contains(iv) {
            Some(coarsen_edge(axis, iv, fine))
        } else if gbx.convert(ixtype).contains(iv) {
            Some(EDGE_REGULAR)
        } else {
            None
        }
    });

    CoarsenedPoint {
        cell,
        faces,
        edges,
        status,
    }
}

fn store(coarse: &mut EbLevel, iv: IntVect, p: &CoarsenedPoint) {
    if let Some(m) = &p.cell {
        coarse.set_cell(iv, m);
    }
    for axis in Axis::ALL {
        if let Some(m) = &p.faces[axis.index()] {
            coarse.set_face(axis, iv, m);
        }
        if let Some(e) = p.edges[axis.index()] {
            coarse.edge_centroid[axis.index()][iv] = e;
        }
    }
}

/// Build the next coarser level of `fine`.
///
/// Returns the coarse level together with the list of coarse cells whose
/// geometry is ambiguous. An ambiguous report does not make the coarse level
/// invalid as data, but it should not be used for further coarsening or for
/// stencils that rely on single-valued cells. Internal inconsistencies are
/// returned as errors after all cells have been processed; the first one in
/// index order is reported.
pub fn coarsen_level(fine: &EbLevel, opts: &CoarsenOptions) -> Result<(EbLevel, CoarsenReport), MeshEbError> {
    opts.validate()?;
    let fdomain = *fine.domain();
    if !fdomain.is_coarsenable(2) {
        return Err(MeshEbError::NotCoarsenable(fdomain));
    }
    let required = fdomain.grow(2 * opts.ngrow);
    if !fine.grown().contains_range(&required) {
        return Err(MeshEbError::InsufficientHalo {
            what: "fine level for coarsening",
            required,
            available: fine.grown(),
        });
    }

    let bx = fdomain.coarsen(2);
    let mut coarse = EbLevel::new(bx, opts.ngrow, fine.grid().coarsen(2))?;

    let nodes = coarse.grown().convert(IndexType::NODE);
    let points = map_points(&nodes, |iv| {
        let mut p = coarsen_at(iv, &bx, opts.ngrow, fine);
        if opts.check_multivalued && bx.contains(iv) {
            p.status = check_multivalued(iv, &fine.level_set)?.combine(p.status);
        }
        Ok::<_, MeshEbError>(p)
    });

    let report = reduce(
        nodes
            .iter()
            .zip(&points)
            .filter(|(iv, _)| bx.contains(*iv))
            .map(|(iv, p)| (iv, p.as_ref().map(|p| p.status).map_err(Clone::clone))),
    )?;

    for (iv, p) in nodes.iter().zip(points) {
        store(&mut coarse, iv, &p?);
    }
    log::debug!(
        "{} halo cells around {} set to regular",
        coarse.grown().num_points() - bx.num_points(),
        bx
    );

    let fine_ls = &fine.level_set;
    let ls_range = *coarse.level_set.range();
    fill_points(&mut coarse.level_set, &ls_range, |iv| fine_ls[iv * 2]);

    build_connectivity_level(&mut coarse.flags, &coarse.area_frac);

    coarse.debug_assert_invariants();

    if report.is_valid() {
        log::info!(
            "coarsened {} -> {}: {} single-valued, {} covered",
            fdomain,
            bx,
            coarse.count_cells(CellKind::SingleValued),
            coarse.count_cells(CellKind::Covered)
        );
    } else {
        log::warn!(
            "coarsened {} -> {} with {} ambiguous cells (first at {})",
            fdomain,
            bx,
            report.ambiguous.len(),
            report.ambiguous[0].0
        );
    }
    Ok((coarse, report))
}
