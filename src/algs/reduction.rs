//! Coarsenability status and its reduction over many cells.
//!
//! Per-cell checks return `Result<Coarsenability, MeshEbError>`. Geometric
//! ambiguity is the `Ok(Ambiguous(_))` case and only means the level cannot
//! be coarsened further; an `Err` is an internal inconsistency. Reduction
//! keeps the index order of its input, so the reported fatal error is the
//! first one in range order no matter how the per-cell work was scheduled.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshEbError;
use crate::topology::axis::Face;
use crate::topology::index_range::IntVect;

/// Why a coarse cell cannot be represented by a single cut cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmbiguityReason {
    /// A coarse face is crossed by the boundary twice.
    AmbiguousFace(Face),
    /// Every face is cut once but the fluid corners do not split four to four.
    SaddleCorners,
    /// The fine boundary normals cancel exactly.
    DegenerateNormal,
    /// All coarse faces are fully open although the cell is cut: the boundary
    /// encloses an object smaller than the coarse cell.
    EnclosedObject,
}

impl fmt::Display for AmbiguityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmbiguityReason::AmbiguousFace(face) => write!(f, "{face} face cut twice"),
            AmbiguityReason::SaddleCorners => f.write_str("saddle corner configuration"),
            AmbiguityReason::DegenerateNormal => f.write_str("boundary normals cancel"),
            AmbiguityReason::EnclosedObject => f.write_str("object enclosed in cell"),
        }
    }
}

/// Recoverable outcome of checking whether something can be coarsened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coarsenability {
    #[default]
    Valid,
    Ambiguous(AmbiguityReason),
}

impl Coarsenability {
    /// Integer code: 0 for valid, 1 for ambiguous.
    #[inline]
    pub fn code(self) -> i32 {
        match self {
            Coarsenability::Valid => 0,
            Coarsenability::Ambiguous(_) => 1,
        }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self == Coarsenability::Valid
    }

    /// Logical OR of two outcomes; the first ambiguity is kept.
    #[inline]
    pub fn combine(self, other: Coarsenability) -> Coarsenability {
        match self {
            Coarsenability::Valid => other,
            ambiguous => ambiguous,
        }
    }
}

/// Summary of a level-wide coarsening check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoarsenReport {
    /// Coarse cells found ambiguous, in range order.
    pub ambiguous: Vec<(IntVect, AmbiguityReason)>,
}

impl CoarsenReport {
    /// Combined status: ambiguous if any cell is.
    pub fn status(&self) -> Coarsenability {
        self.ambiguous
            .first()
            .map_or(Coarsenability::Valid, |&(_, r)| Coarsenability::Ambiguous(r))
    }

    /// See [`Coarsenability::code`].
    pub fn code(&self) -> i32 {
        self.status().code()
    }

    pub fn is_valid(&self) -> bool {
        self.ambiguous.is_empty()
    }

    /// Add one cell's outcome.
    pub fn record(&mut self, iv: IntVect, status: Coarsenability) {
        if let Coarsenability::Ambiguous(r) = status {
            self.ambiguous.push((iv, r));
        }
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: CoarsenReport) {
        self.ambiguous.extend(other.ambiguous);
    }
}

/// Reduce per-cell outcomes.
///
/// Returns the first error in iteration order if any cell failed, otherwise a
/// report of all ambiguous cells.
pub fn reduce<I>(results: I) -> Result<CoarsenReport, MeshEbError>
where
    I: IntoIterator<Item = (IntVect, Result<Coarsenability, MeshEbError>)>,
{
    let mut report = CoarsenReport::default();
    for (iv, r) in results {
        report.record(iv, r?);
    }
    Ok(report)
}
