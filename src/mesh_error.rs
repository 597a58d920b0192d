//! MeshEbError: unified error type for mesh-eb public APIs
//!
//! Two classes of failure exist in embedded-boundary processing. Geometric
//! ambiguity during coarsening is *recoverable* and is reported through
//! [`Coarsenability`](crate::algs::reduction::Coarsenability), never through
//! this type. Everything here is either a plumbing error (bad ranges, missing
//! halo) or an internal invariant violation that has no defined recovery.

use crate::topology::axis::Face;
use crate::topology::index_range::{IndexRange, IntVect};
use thiserror::Error;

/// Unified error type for mesh-eb operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshEbError {
    /// A coarse face accumulated a crossing count outside `{0, 2, 4}`.
    ///
    /// This is a logic or upstream-data defect, not an ambiguous geometry.
    #[error("invariant violation: coarse cell {cell} has {count} level-set crossings on its {face} face")]
    CrossingCount {
        cell: IntVect,
        face: Face,
        count: u32,
    },
    /// All six coarse faces have a single cut but the number of fluid corners
    /// is not in `{2, 4, 6}`.
    #[error("invariant violation: coarse cell {cell} has {count} fluid corners with six simple faces")]
    OpenCornerCount { cell: IntVect, count: u32 },
    /// Index lies outside the range an array was allocated over.
    #[error("index {index} lies outside array range {range}")]
    IndexOutOfRange { index: IntVect, range: IndexRange },
    /// Component index exceeds the number of components of an array.
    #[error("component {comp} out of range (array has {ncomp} components)")]
    ComponentOutOfRange { comp: usize, ncomp: usize },
    /// Buffer length does not match the range and component count.
    #[error("buffer of length {found} does not fit range of {expected} elements")]
    ShapeMismatch { expected: usize, found: usize },
    /// A required range is not covered by the data that was supplied.
    #[error("{what}: required range {required} is not covered by {available}")]
    InsufficientHalo {
        what: &'static str,
        required: IndexRange,
        available: IndexRange,
    },
    /// The fine range cannot be coarsened by a factor of two.
    #[error("range {0} is not coarsenable by 2")]
    NotCoarsenable(IndexRange),
    /// Configuration value rejected by `validate()`.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption {
        name: &'static str,
        reason: String,
    },
    /// A data-structure invariant checked by [`DebugInvariants`](crate::DebugInvariants) failed.
    #[error("invariant violation at {index}: {message}")]
    InvariantViolation { index: IntVect, message: String },
}

impl MeshEbError {
    /// Returns `true` for errors that indicate a bug or corrupt input rather
    /// than misuse of the API.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            MeshEbError::CrossingCount { .. }
                | MeshEbError::OpenCornerCount { .. }
                | MeshEbError::InvariantViolation { .. }
        )
    }
}
