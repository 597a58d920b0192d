//! Integer index space for structured Cartesian meshes.
//!
//! An [`IndexRange`] is an inclusive rectangular region of [`IntVect`]s plus an
//! [`IndexType`] saying, per axis, whether the indices name cells or nodes.
//! The same cell region therefore has several derived ranges:
//!
//! | entity          | index type                        | derived with                      |
//! |-----------------|-----------------------------------|-----------------------------------|
//! | cells           | cell in x, y, z                   | -                                 |
//! | faces normal d  | node in d, cell in the others     | [`IndexRange::surrounding_nodes`] |
//! | edges along d   | cell in d, node in the others     | [`IndexRange::convert`]           |
//! | nodes           | node in x, y, z                   | [`IndexRange::convert`]           |
//!
//! Faces and edges are numbered by their lowest node, so the low x-face of cell
//! `(i, j, k)` is x-face `(i, j, k)` and its high x-face is `(i + 1, j, k)`.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use super::axis::Axis;

/// A point in 3-D integer index space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct IntVect(pub [i32; 3]);

impl IntVect {
    pub const ZERO: IntVect = IntVect([0, 0, 0]);

    #[inline]
    pub const fn new(i: i32, j: i32, k: i32) -> Self {
        IntVect([i, j, k])
    }

    /// Unit vector along `axis`.
    #[inline]
    pub fn unit(axis: Axis) -> Self {
        let mut v = [0; 3];
        v[axis.index()] = 1;
        IntVect(v)
    }

    /// Same value in every component.
    #[inline]
    pub const fn splat(n: i32) -> Self {
        IntVect([n, n, n])
    }

    #[inline]
    pub fn get(self, axis: Axis) -> i32 {
        self.0[axis.index()]
    }

    #[inline]
    pub fn with(mut self, axis: Axis, value: i32) -> Self {
        self.0[axis.index()] = value;
        self
    }

    /// Shift by `n` along `axis`.
    #[inline]
    pub fn shift(mut self, axis: Axis, n: i32) -> Self {
        self.0[axis.index()] += n;
        self
    }

    /// Floor division of every component.
    #[inline]
    pub fn coarsen(self, ratio: i32) -> Self {
        IntVect(self.0.map(|c| c.div_euclid(ratio)))
    }
}

impl From<[i32; 3]> for IntVect {
    fn from(v: [i32; 3]) -> Self {
        IntVect(v)
    }
}

impl From<(i32, i32, i32)> for IntVect {
    fn from((i, j, k): (i32, i32, i32)) -> Self {
        IntVect([i, j, k])
    }
}

impl Add for IntVect {
    type Output = IntVect;
    #[inline]
    fn add(self, rhs: IntVect) -> IntVect {
        IntVect([self.0[0] + rhs.0[0], self.0[1] + rhs.0[1], self.0[2] + rhs.0[2]])
    }
}

impl Sub for IntVect {
    type Output = IntVect;
    #[inline]
    fn sub(self, rhs: IntVect) -> IntVect {
        IntVect([self.0[0] - rhs.0[0], self.0[1] - rhs.0[1], self.0[2] - rhs.0[2]])
    }
}

impl Mul<i32> for IntVect {
    type Output = IntVect;
    #[inline]
    fn mul(self, rhs: i32) -> IntVect {
        IntVect(self.0.map(|c| c * rhs))
    }
}

impl Neg for IntVect {
    type Output = IntVect;
    #[inline]
    fn neg(self) -> IntVect {
        IntVect(self.0.map(|c| -c))
    }
}

impl fmt::Display for IntVect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0[0], self.0[1], self.0[2])
    }
}

/// Cell- or node-centering of an index range, per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexType {
    nodal: [bool; 3],
}

impl IndexType {
    /// Cell-centered in every direction.
    pub const CELL: IndexType = IndexType { nodal: [false; 3] };
    /// Node-centered in every direction.
    pub const NODE: IndexType = IndexType { nodal: [true; 3] };

    pub const fn new(nodal: [bool; 3]) -> Self {
        IndexType { nodal }
    }

    /// Faces normal to `axis`: nodal along `axis` only.
    pub fn face(axis: Axis) -> Self {
        let mut nodal = [false; 3];
        nodal[axis.index()] = true;
        IndexType { nodal }
    }

    /// Edges parallel to `axis`: cell-centered along `axis`, nodal elsewhere.
    pub fn edge(axis: Axis) -> Self {
        let mut nodal = [true; 3];
        nodal[axis.index()] = false;
        IndexType { nodal }
    }

    #[inline]
    pub fn is_nodal(self, axis: Axis) -> bool {
        self.nodal[axis.index()]
    }

    pub fn is_cell(self) -> bool {
        self == IndexType::CELL
    }
}

/// Inclusive rectangular region `[lo, hi]` of index space.
///
/// A range with `hi < lo` along any axis is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    lo: IntVect,
    hi: IntVect,
    ixtype: IndexType,
}

impl IndexRange {
    /// Cell-centered range `[lo, hi]`.
    pub fn new(lo: impl Into<IntVect>, hi: impl Into<IntVect>) -> Self {
        Self::with_type(lo, hi, IndexType::CELL)
    }

    pub fn with_type(lo: impl Into<IntVect>, hi: impl Into<IntVect>, ixtype: IndexType) -> Self {
        IndexRange {
            lo: lo.into(),
            hi: hi.into(),
            ixtype,
        }
    }

    /// Cells `[0, n-1]` along every axis.
    pub fn cube(n: i32) -> Self {
        IndexRange::new(IntVect::ZERO, IntVect::splat(n - 1))
    }

    #[inline]
    pub fn lo(&self) -> IntVect {
        self.lo
    }

    #[inline]
    pub fn hi(&self) -> IntVect {
        self.hi
    }

    #[inline]
    pub fn ixtype(&self) -> IndexType {
        self.ixtype
    }

    pub fn is_empty(&self) -> bool {
        Axis::ALL.iter().any(|&a| self.hi.get(a) < self.lo.get(a))
    }

    /// Number of indices along `axis` (0 for an empty range).
    pub fn len_along(&self, axis: Axis) -> usize {
        let n = self.hi.get(axis) - self.lo.get(axis) + 1;
        if self.is_empty() { 0 } else { n as usize }
    }

    /// Total number of indices.
    pub fn num_points(&self) -> usize {
        Axis::ALL.iter().map(|&a| self.len_along(a)).product()
    }

    #[inline]
    pub fn contains(&self, iv: IntVect) -> bool {
        Axis::ALL
            .iter()
            .all(|&a| iv.get(a) >= self.lo.get(a) && iv.get(a) <= self.hi.get(a))
    }

    /// Whether `other` lies entirely inside `self`. Empty ranges are contained
    /// everywhere.
    pub fn contains_range(&self, other: &IndexRange) -> bool {
        other.is_empty() || (self.contains(other.lo) && self.contains(other.hi))
    }

    /// Grow by `n` in every direction (negative `n` shrinks).
    pub fn grow(&self, n: i32) -> Self {
        IndexRange {
            lo: self.lo - IntVect::splat(n),
            hi: self.hi + IntVect::splat(n),
            ixtype: self.ixtype,
        }
    }

    /// Grow by `n` along a single axis.
    pub fn grow_along(&self, axis: Axis, n: i32) -> Self {
        IndexRange {
            lo: self.lo.shift(axis, -n),
            hi: self.hi.shift(axis, n),
            ixtype: self.ixtype,
        }
    }

    /// Convert a cell-centered direction to the nodes bounding it.
    ///
    /// Applied to a cell range this yields the faces normal to `axis`.
    pub fn surrounding_nodes(&self, axis: Axis) -> Self {
        if self.ixtype.is_nodal(axis) {
            return *self;
        }
        let mut nodal = self.ixtype.nodal;
        nodal[axis.index()] = true;
        IndexRange {
            lo: self.lo,
            hi: self.hi.shift(axis, 1),
            ixtype: IndexType { nodal },
        }
    }

    /// Change centering axis by axis: cell → node appends the upper node,
    /// node → cell drops it.
    pub fn convert(&self, ixtype: IndexType) -> Self {
        let mut hi = self.hi;
        for a in Axis::ALL {
            match (self.ixtype.is_nodal(a), ixtype.is_nodal(a)) {
                (false, true) => hi = hi.shift(a, 1),
                (true, false) => hi = hi.shift(a, -1),
                _ => {}
            }
        }
        IndexRange {
            lo: self.lo,
            hi,
            ixtype,
        }
    }

    /// Intersection of two ranges of the same index type.
    pub fn intersection(&self, other: &IndexRange) -> Self {
        debug_assert_eq!(self.ixtype, other.ixtype, "intersecting mixed index types");
        let mut lo = self.lo;
        let mut hi = self.hi;
        for a in Axis::ALL {
            lo = lo.with(a, lo.get(a).max(other.lo.get(a)));
            hi = hi.with(a, hi.get(a).min(other.hi.get(a)));
        }
        IndexRange {
            lo,
            hi,
            ixtype: self.ixtype,
        }
    }

    /// Coarsen by `ratio`. Nodal directions keep the upper node when it is not
    /// aligned with the coarse grid.
    pub fn coarsen(&self, ratio: i32) -> Self {
        let lo = self.lo.coarsen(ratio);
        let mut hi = self.hi.coarsen(ratio);
        for a in Axis::ALL {
            if self.ixtype.is_nodal(a) && self.hi.get(a).rem_euclid(ratio) != 0 {
                hi = hi.shift(a, 1);
            }
        }
        IndexRange {
            lo,
            hi,
            ixtype: self.ixtype,
        }
    }

    /// Refine by `ratio`.
    pub fn refine(&self, ratio: i32) -> Self {
        let lo = self.lo * ratio;
        let mut hi = self.hi;
        for a in Axis::ALL {
            let h = hi.get(a);
            let refined = if self.ixtype.is_nodal(a) {
                h * ratio
            } else {
                (h + 1) * ratio - 1
            };
            hi = hi.with(a, refined);
        }
        IndexRange {
            lo,
            hi,
            ixtype: self.ixtype,
        }
    }

    /// Whether coarsening by `ratio` loses no index.
    pub fn is_coarsenable(&self, ratio: i32) -> bool {
        self.coarsen(ratio).refine(ratio) == *self
    }

    /// Linear offset of `iv` with x varying fastest, or `None` outside the range.
    #[inline]
    pub fn offset_of(&self, iv: IntVect) -> Option<usize> {
        if !self.contains(iv) {
            return None;
        }
        let nx = self.len_along(Axis::X);
        let ny = self.len_along(Axis::Y);
        let d = iv - self.lo;
        Some(d.0[0] as usize + nx * (d.0[1] as usize + ny * d.0[2] as usize))
    }

    /// All indices in the range, x fastest then y then z.
    pub fn iter(&self) -> impl Iterator<Item = IntVect> + Clone + use<> {
        let (lo, hi) = (self.lo, self.hi);
        let empty = self.is_empty();
        let (zs, ys, xs) = if empty {
            (0..=-1, 0..=-1, 0..=-1)
        } else {
            (lo.0[2]..=hi.0[2], lo.0[1]..=hi.0[1], lo.0[0]..=hi.0[0])
        };
        iproduct!(zs, ys, xs).map(|(k, j, i)| IntVect::new(i, j, k))
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = |a: Axis| if self.ixtype.is_nodal(a) { 'N' } else { 'C' };
        write!(
            f,
            "[{} - {}; {}{}{}]",
            self.lo,
            self.hi,
            t(Axis::X),
            t(Axis::Y),
            t(Axis::Z)
        )
    }
}
