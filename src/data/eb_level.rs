//! `EbLevel`: all embedded-boundary geometry arrays of one mesh level.
//!
//! A level owns its arrays. Cell arrays cover the grown range
//! `domain.grow(ngrow)`; face arrays along `d` cover
//! `surrounding_nodes(grown, d)`; edge arrays along `d` cover
//! `convert(grown, edge d)`; the level set covers the nodes of the grown
//! range. A freshly allocated level describes all-fluid space: every entity
//! holds its regular sentinel.
//!
//! Moments are normalized: centroids are in cell (or face, or edge) units
//! relative to the center, fractions are relative to the full cell, face or
//! edge.

use serde::{Deserialize, Serialize};

use crate::data::field::{FieldArray, RealArray};
use crate::debug_invariants::DebugInvariants;
use crate::geometry::grid::CartesianGrid;
use crate::mesh_error::MeshEbError;
use crate::topology::axis::Axis;
use crate::topology::cell_flag::CellFlag;
use crate::topology::cell_type::CellKind;
use crate::topology::index_range::{IndexRange, IndexType, IntVect};

/// Boundary centroid component stored for cells without a boundary.
pub const NO_BOUNDARY: f64 = -1.0;
/// Edge centroid of a fully open edge.
pub const EDGE_REGULAR: f64 = 1.0;
/// Edge centroid of a fully covered edge.
pub const EDGE_COVERED: f64 = -1.0;

/// Per-cell cut geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellMoments {
    pub kind: CellKind,
    pub vol_frac: f64,
    pub centroid: [f64; 3],
    pub bndry_area: f64,
    pub bndry_centroid: [f64; 3],
    pub bndry_normal: [f64; 3],
}

impl CellMoments {
    pub const REGULAR: CellMoments = CellMoments {
        kind: CellKind::Regular,
        vol_frac: 1.0,
        centroid: [0.0; 3],
        bndry_area: 0.0,
        bndry_centroid: [NO_BOUNDARY; 3],
        bndry_normal: [0.0; 3],
    };

    pub const COVERED: CellMoments = CellMoments {
        kind: CellKind::Covered,
        vol_frac: 0.0,
        ..CellMoments::REGULAR
    };
}

/// Per-face aperture and in-face centroid.
///
/// Centroid components follow the two perpendicular axes in ascending order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceMoments {
    pub area: f64,
    pub centroid: [f64; 2],
}

impl FaceMoments {
    pub const OPEN: FaceMoments = FaceMoments {
        area: 1.0,
        centroid: [0.0; 2],
    };

    pub const CLOSED: FaceMoments = FaceMoments {
        area: 0.0,
        centroid: [0.0; 2],
    };
}

/// Geometry of one level.
#[derive(Clone, Debug)]
pub struct EbLevel {
    domain: IndexRange,
    ngrow: i32,
    grid: CartesianGrid,
    /// Nodal level set over the grown range.
    pub level_set: RealArray,
    pub flags: FieldArray<CellFlag>,
    pub vol_frac: RealArray,
    /// Volume centroid, 3 components.
    pub centroid: RealArray,
    pub bndry_area: RealArray,
    /// Boundary centroid, 3 components.
    pub bndry_centroid: RealArray,
    /// Outward boundary normal, 3 components.
    pub bndry_normal: RealArray,
    /// Face apertures indexed by face-normal axis.
    pub area_frac: [RealArray; 3],
    /// In-face centroids, 2 components, indexed by face-normal axis.
    pub face_centroid: [RealArray; 3],
    /// Edge centroids indexed by edge direction.
    pub edge_centroid: [RealArray; 3],
}

impl EbLevel {
    /// Allocate an all-regular level over `domain` with `ngrow` halo cells.
    pub fn new(domain: IndexRange, ngrow: i32, grid: CartesianGrid) -> Result<Self, MeshEbError> {
        if ngrow < 0 {
            return Err(MeshEbError::InvalidOption {
                name: "ngrow",
                reason: format!("halo width must be non-negative, got {ngrow}"),
            });
        }
        if domain.is_empty() || !domain.ixtype().is_cell() {
            return Err(MeshEbError::InvalidOption {
                name: "domain",
                reason: format!("expected a non-empty cell range, got {domain}"),
            });
        }
        let g = domain.grow(ngrow);
        Ok(EbLevel {
            domain,
            ngrow,
            grid,
            level_set: RealArray::new(g.convert(IndexType::NODE), 1, -1.0),
            flags: FieldArray::new(g, 1, CellFlag::default()),
            vol_frac: RealArray::new(g, 1, 1.0),
            centroid: RealArray::new(g, 3, 0.0),
            bndry_area: RealArray::new(g, 1, 0.0),
            bndry_centroid: RealArray::new(g, 3, NO_BOUNDARY),
            bndry_normal: RealArray::new(g, 3, 0.0),
            area_frac: Axis::ALL.map(|d| RealArray::new(g.surrounding_nodes(d), 1, 1.0)),
            face_centroid: Axis::ALL.map(|d| RealArray::new(g.surrounding_nodes(d), 2, 0.0)),
            edge_centroid: Axis::ALL
                .map(|d| RealArray::new(g.convert(IndexType::edge(d)), 1, EDGE_REGULAR)),
        })
    }

    /// Valid cells of this level.
    #[inline]
    pub fn domain(&self) -> &IndexRange {
        &self.domain
    }

    #[inline]
    pub fn ngrow(&self) -> i32 {
        self.ngrow
    }

    #[inline]
    pub fn grid(&self) -> &CartesianGrid {
        &self.grid
    }

    /// Valid cells plus halo.
    #[inline]
    pub fn grown(&self) -> IndexRange {
        self.domain.grow(self.ngrow)
    }

    /// Store the moments of cell `iv`. Connectivity is left untouched except
    /// that covered cells lose it.
    pub fn set_cell(&mut self, iv: IntVect, m: &CellMoments) {
        self.flags[iv].set_kind(m.kind);
        self.vol_frac[iv] = m.vol_frac;
        self.bndry_area[iv] = m.bndry_area;
        for c in 0..3 {
            self.centroid[(iv, c)] = m.centroid[c];
            self.bndry_centroid[(iv, c)] = m.bndry_centroid[c];
            self.bndry_normal[(iv, c)] = m.bndry_normal[c];
        }
    }

    pub fn cell(&self, iv: IntVect) -> CellMoments {
        CellMoments {
            kind: self.flags[iv].kind(),
            vol_frac: self.vol_frac[iv],
            centroid: self.centroid.vec3(iv),
            bndry_area: self.bndry_area[iv],
            bndry_centroid: self.bndry_centroid.vec3(iv),
            bndry_normal: self.bndry_normal.vec3(iv),
        }
    }

    pub fn set_face(&mut self, axis: Axis, iv: IntVect, m: &FaceMoments) {
        let d = axis.index();
        self.area_frac[d][iv] = m.area;
        self.face_centroid[d][(iv, 0)] = m.centroid[0];
        self.face_centroid[d][(iv, 1)] = m.centroid[1];
    }

    pub fn face(&self, axis: Axis, iv: IntVect) -> FaceMoments {
        let d = axis.index();
        FaceMoments {
            area: self.area_frac[d][iv],
            centroid: [self.face_centroid[d][(iv, 0)], self.face_centroid[d][(iv, 1)]],
        }
    }

    /// Fluid volume of the valid cells in physical units.
    pub fn fluid_volume(&self) -> f64 {
        let dv = self.grid.cell_volume();
        self.domain.iter().map(|iv| self.vol_frac[iv]).sum::<f64>() * dv
    }

    /// Number of valid cells of the given kind.
    pub fn count_cells(&self, kind: CellKind) -> usize {
        self.domain
            .iter()
            .filter(|&iv| self.flags[iv].kind() == kind)
            .count()
    }
}

fn violation(index: IntVect, message: impl Into<String>) -> MeshEbError {
    MeshEbError::InvariantViolation {
        index,
        message: message.into(),
    }
}

impl DebugInvariants for EbLevel {
    fn validate_invariants(&self) -> Result<(), MeshEbError> {
        self.flags.validate_invariants()?;
        for iv in self.grown().iter() {
            let v = self.vol_frac[iv];
            if !(0.0..=1.0).contains(&v) {
                return Err(violation(iv, format!("volume fraction {v} outside [0, 1]")));
            }
            match self.flags[iv].kind() {
                CellKind::Regular if v != 1.0 || self.bndry_area[iv] != 0.0 => {
                    return Err(violation(iv, "regular cell with partial volume or boundary"));
                }
                CellKind::Covered if v != 0.0 => {
                    return Err(violation(iv, "covered cell with fluid volume"));
                }
                _ => {}
            }
        }
        for axis in Axis::ALL {
            let d = axis.index();
            for (iv, &a) in self.area_frac[d].iter_comp(0) {
                if !(0.0..=1.0).contains(&a) {
                    return Err(violation(iv, format!("{axis}-face aperture {a} outside [0, 1]")));
                }
            }
            for (iv, &e) in self.edge_centroid[d].iter_comp(0) {
                if !((-0.5..=0.5).contains(&e) || e == EDGE_REGULAR || e == EDGE_COVERED) {
                    return Err(violation(iv, format!("{axis}-edge centroid {e} out of range")));
                }
            }
        }
        Ok(())
    }
}
