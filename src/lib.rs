#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-eb
//!
//! mesh-eb computes embedded-boundary (cut-cell) geometry on a structured 3-D
//! Cartesian mesh and coarsens it level by level for geometric multigrid.
//!
//! ## Features
//! - Classification of cells, faces and edges as regular, covered or cut from
//!   the signs of a nodal level set
//! - 26-neighbor connectivity masks derived from face apertures
//! - Factor-two coarsening of volume fractions, centroids, boundary area and
//!   normal, face apertures and edge centroids, with detection of coarse cells
//!   that cannot be represented as a single cut cell
//! - Optional data-parallel kernels on rayon (`rayon` feature)
//! - Invariant checking in debug builds or with the `strict-invariants` /
//!   `check-invariants` features
//!
//! ## Sign convention
//! A negative level-set value is fluid, zero or positive is solid.
//!
//! ## Usage
//! ```no_run
//! use mesh_eb::prelude::*;
//!
//! let sphere = Sphere { center: [0.0; 3], radius: 0.5, fluid_inside: true };
//! let grid = CartesianGrid::uniform(-1.0, 1.0, 32)?;
//! let fine = build_level(&sphere, grid, IndexRange::cube(32), &BuildOptions::default())?;
//! let (coarse, report) = coarsen_level(&fine, &CoarsenOptions::default())?;
//! if !report.is_valid() {
//!     // stop coarsening here
//! }
//! # let _ = coarse;
//! # Ok::<(), MeshEbError>(())
//! ```
//!
//! Geometric ambiguity during coarsening is reported through
//! [`CoarsenReport`](algs::reduction::CoarsenReport); internal inconsistencies
//! come back as [`MeshEbError`](mesh_error::MeshEbError).

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::build::{BuildOptions, build_level};
    pub use crate::algs::classify::{TypeArrays, classify_level};
    pub use crate::algs::coarsen::{CoarsenOptions, coarsen_edge_centroid, coarsen_level};
    pub use crate::algs::connectivity::build_connectivity;
    pub use crate::algs::mvmc::check_multivalued;
    pub use crate::algs::reduction::{AmbiguityReason, Coarsenability, CoarsenReport};
    pub use crate::data::eb_level::{CellMoments, EbLevel, FaceMoments};
    pub use crate::data::field::{FieldArray, RealArray};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::grid::CartesianGrid;
    pub use crate::geometry::implicit::{ImplicitFunction, Plane, Sphere};
    pub use crate::mesh_error::MeshEbError;
    pub use crate::topology::axis::{Axis, Face, Side};
    pub use crate::topology::cell_flag::{CellFlag, Neighbors};
    pub use crate::topology::cell_type::{CellKind, EbType};
    pub use crate::topology::index_range::{IndexRange, IndexType, IntVect};
}
