//! Coordinate axes and cell sides.
//!
//! Kernels that the x/y/z directions share are written once and parameterized
//! by an [`Axis`]. The two perpendicular axes are always reported in ascending
//! order, which is also the component order of in-face centroids.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::index_range::IntVect;

/// One of the three coordinate directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of this axis in an `[_; 3]` array.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Inverse of [`Axis::index`]. Panics on values above 2.
    #[inline]
    pub const fn from_index(d: usize) -> Axis {
        match d {
            0 => Axis::X,
            1 => Axis::Y,
            2 => Axis::Z,
            _ => panic!("axis index out of range"),
        }
    }

    /// The two other axes, ascending.
    #[inline]
    pub const fn perpendicular(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    /// The axis that is neither `self` nor `other`.
    ///
    /// `self` and `other` must differ.
    #[inline]
    pub fn third(self, other: Axis) -> Axis {
        debug_assert_ne!(self, other);
        Axis::from_index(3 - self.index() - other.index())
    }

    /// Unit vector along this axis.
    #[inline]
    pub fn unit(self) -> IntVect {
        IntVect::unit(self)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(s)
    }
}

/// Low or high side of a cell along an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Lo,
    Hi,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Lo, Side::Hi];

    /// `-1` for [`Side::Lo`], `+1` for [`Side::Hi`].
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Side::Lo => -1,
            Side::Hi => 1,
        }
    }

    /// Offset of the face on this side relative to the cell index along the
    /// face-normal axis (faces are numbered by their low node).
    #[inline]
    pub const fn face_offset(self) -> i32 {
        match self {
            Side::Lo => 0,
            Side::Hi => 1,
        }
    }
}

/// A cell face identified by its normal axis and side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face {
    pub axis: Axis,
    pub side: Side,
}

impl Face {
    /// The six faces of a cell: xlo, xhi, ylo, yhi, zlo, zhi.
    pub const ALL: [Face; 6] = [
        Face { axis: Axis::X, side: Side::Lo },
        Face { axis: Axis::X, side: Side::Hi },
        Face { axis: Axis::Y, side: Side::Lo },
        Face { axis: Axis::Y, side: Side::Hi },
        Face { axis: Axis::Z, side: Side::Lo },
        Face { axis: Axis::Z, side: Side::Hi },
    ];

    pub const fn new(axis: Axis, side: Side) -> Self {
        Face { axis, side }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            Side::Lo => "lo",
            Side::Hi => "hi",
        };
        write!(f, "{}{}", self.axis, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perpendicular_axes_are_ascending_and_distinct() {
        for axis in Axis::ALL {
            let (p1, p2) = axis.perpendicular();
            assert!(p1 < p2);
            assert_ne!(p1, axis);
            assert_ne!(p2, axis);
            assert_eq!(p1.third(p2), axis);
        }
    }

    #[test]
    fn face_display() {
        assert_eq!(Face::new(Axis::Y, Side::Hi).to_string(), "yhi");
        assert_eq!(Face::ALL.len(), 6);
    }
}
