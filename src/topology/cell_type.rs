//! Embedded-boundary type metadata for cells, faces and edges.

use serde::{Deserialize, Serialize};

/// Classification of a face or an edge against the embedded boundary.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum EbType {
    /// Entirely on the fluid side (all corners negative).
    #[default]
    Regular,
    /// Entirely on the solid side (all corners non-negative).
    Covered,
    /// Cut by the boundary.
    Irregular,
}

/// Classification of a cell against the embedded boundary.
///
/// A cell is always exactly one of these; the type system enforces it.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Regular,
    Covered,
    /// Cut by the boundary into a single fluid region.
    SingleValued,
}

impl From<EbType> for CellKind {
    fn from(t: EbType) -> Self {
        match t {
            EbType::Regular => CellKind::Regular,
            EbType::Covered => CellKind::Covered,
            EbType::Irregular => CellKind::SingleValued,
        }
    }
}
