//! `CellFlag`: cell kind plus 3×3×3 neighbor connectivity.
//!
//! A flag pairs a [`CellKind`] with a [`Neighbors`] mask holding one bit per
//! offset in `{-1, 0, 1}³`. Offset `(0, 0, 0)` is the self bit. Covered cells
//! never carry connectivity: [`CellFlag::set_covered`] clears the mask and
//! [`CellFlag::set_connected`] refuses to set bits on a covered cell.
//!
//! The default flag is a regular cell connected to all 26 neighbors, the state
//! of a cell far away from any boundary.

use std::fmt;

use serde::{Deserialize, Serialize};
use static_assertions::{assert_impl_all, const_assert};

use super::cell_type::CellKind;
use super::index_range::IntVect;
use crate::data::field::FieldArray;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshEbError;

/// Bit index of the neighbor at offset `(dx, dy, dz)`.
#[inline]
const fn bit(dx: i32, dy: i32, dz: i32) -> u32 {
    ((dx + 1) + 3 * (dy + 1) + 9 * (dz + 1)) as u32
}

/// Connectivity to the 26 neighbors and to self.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Neighbors(u32);

const_assert!(Neighbors::ALL_BITS < (1u32 << 27));

impl Neighbors {
    const ALL_BITS: u32 = (1u32 << 27) - 1;
    const SELF_BIT: u32 = 1u32 << bit(0, 0, 0);

    /// No connectivity at all, not even to self.
    pub const NONE: Neighbors = Neighbors(0);
    /// Connected to self and all 26 neighbors.
    pub const ALL: Neighbors = Neighbors(Self::ALL_BITS);

    /// Every offset in `{-1, 0, 1}³`, x fastest.
    pub fn offsets() -> impl Iterator<Item = IntVect> {
        (-1..=1).flat_map(|dz| (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| IntVect::new(dx, dy, dz))))
    }

    #[inline]
    pub fn contains(self, dx: i32, dy: i32, dz: i32) -> bool {
        debug_assert!(in_stencil(dx, dy, dz));
        self.0 & (1u32 << bit(dx, dy, dz)) != 0
    }

    #[inline]
    pub fn insert(&mut self, dx: i32, dy: i32, dz: i32) {
        debug_assert!(in_stencil(dx, dy, dz));
        self.0 |= 1u32 << bit(dx, dy, dz);
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether the self bit is set.
    #[inline]
    pub fn has_self(self) -> bool {
        self.0 & Self::SELF_BIT != 0
    }

    /// Number of connected offsets, self included.
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Raw mask, bit `(dx+1) + 3(dy+1) + 9(dz+1)` per offset.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Neighbors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Neighbors({:#029b})", self.0)
    }
}

#[inline]
const fn in_stencil(dx: i32, dy: i32, dz: i32) -> bool {
    dx >= -1 && dx <= 1 && dy >= -1 && dy <= 1 && dz >= -1 && dz <= 1
}

/// Per-cell flag: kind plus neighbor connectivity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellFlag {
    kind: CellKind,
    neighbors: Neighbors,
}

assert_impl_all!(CellFlag: Copy, Send, Sync);

impl Default for CellFlag {
    fn default() -> Self {
        CellFlag {
            kind: CellKind::Regular,
            neighbors: Neighbors::ALL,
        }
    }
}

impl CellFlag {
    /// A covered cell (empty connectivity).
    pub const COVERED: CellFlag = CellFlag {
        kind: CellKind::Covered,
        neighbors: Neighbors::NONE,
    };

    #[inline]
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    #[inline]
    pub fn neighbors(&self) -> Neighbors {
        self.neighbors
    }

    #[inline]
    pub fn set_regular(&mut self) {
        self.kind = CellKind::Regular;
    }

    /// Mark covered and drop all connectivity.
    #[inline]
    pub fn set_covered(&mut self) {
        self.kind = CellKind::Covered;
        self.neighbors = Neighbors::NONE;
    }

    #[inline]
    pub fn set_single_valued(&mut self) {
        self.kind = CellKind::SingleValued;
    }

    /// Set the kind from a [`CellKind`].
    #[inline]
    pub fn set_kind(&mut self, kind: CellKind) {
        match kind {
            CellKind::Regular => self.set_regular(),
            CellKind::Covered => self.set_covered(),
            CellKind::SingleValued => self.set_single_valued(),
        }
    }

    /// Clear all connectivity, the self bit included.
    #[inline]
    pub fn set_disconnected(&mut self) {
        self.neighbors = Neighbors::NONE;
    }

    /// Connect to the neighbor at `(dx, dy, dz)`; `(0, 0, 0)` is self.
    ///
    /// Has no effect on covered cells.
    #[inline]
    pub fn set_connected(&mut self, dx: i32, dy: i32, dz: i32) {
        debug_assert!(!self.is_covered(), "covered cells carry no connectivity");
        if !self.is_covered() {
            self.neighbors.insert(dx, dy, dz);
        }
    }

    #[inline]
    pub fn is_connected(&self, dx: i32, dy: i32, dz: i32) -> bool {
        self.neighbors.contains(dx, dy, dz)
    }

    #[inline]
    pub fn is_regular(&self) -> bool {
        self.kind == CellKind::Regular
    }

    #[inline]
    pub fn is_covered(&self) -> bool {
        self.kind == CellKind::Covered
    }

    #[inline]
    pub fn is_single_valued(&self) -> bool {
        self.kind == CellKind::SingleValued
    }

    /// Number of connected offsets, self included.
    pub fn num_connected(&self) -> u32 {
        self.neighbors.count()
    }

    /// Check the kind/connectivity pairing: covered cells are disconnected,
    /// every other cell is connected to itself.
    pub fn check(&self) -> Result<(), &'static str> {
        match (self.kind, self.neighbors.is_empty(), self.neighbors.has_self()) {
            (CellKind::Covered, false, _) => Err("covered cell carries connectivity"),
            (CellKind::Regular | CellKind::SingleValued, _, false) => {
                Err("non-covered cell is not connected to itself")
            }
            _ => Ok(()),
        }
    }
}

impl DebugInvariants for FieldArray<CellFlag> {
    fn validate_invariants(&self) -> Result<(), MeshEbError> {
        for (iv, flag) in self.iter_comp(0) {
            flag.check()
                .map_err(|message| MeshEbError::InvariantViolation {
                    index: iv,
                    message: message.to_string(),
                })?;
        }
        Ok(())
    }
}
