//! Multi-valued coarse cell detection.
//!
//! A coarse cell can be represented by a single cut cell only if the fine
//! level-set samples on its boundary describe one simple cut. The check walks
//! the 12 coarse edges (each split into two fine sub-edges), counts sign
//! crossings per coarse face, and, when every face carries exactly one cut,
//! requires the 8 outer corners to split evenly between fluid and solid.
//!
//! Counts that cannot arise from valid input are reported as fatal
//! [`MeshEbError`] values instead of aborting, so parallel callers can finish
//! the remaining cells and reduce the errors afterwards.

use itertools::iproduct;

use crate::algs::reduction::{AmbiguityReason, Coarsenability};
use crate::data::field::RealArray;
use crate::mesh_error::MeshEbError;
use crate::topology::axis::{Axis, Face};
use crate::topology::index_range::IntVect;

/// Whether exactly one of `a` and `b` lies on the fluid side.
#[inline]
pub fn crosses(a: f64, b: f64) -> bool {
    (a >= 0.0 && b < 0.0) || (b >= 0.0 && a < 0.0)
}

/// Crossings on the coarse edge along `axis` starting at fine node `origin`
/// (two fine sub-edges, so 0, 1 or 2).
#[inline]
fn edge_crossings(fine: &RealArray, origin: IntVect, axis: Axis) -> u32 {
    let s0 = fine[origin];
    let s1 = fine[origin.shift(axis, 1)];
    let s2 = fine[origin.shift(axis, 2)];
    u32::from(crosses(s0, s1)) + u32::from(crosses(s1, s2))
}

/// Total crossings on the four coarse edges bounding `face` of the coarse cell
/// whose lowest fine node is `origin`.
fn face_crossings(fine: &RealArray, origin: IntVect, face: Face) -> u32 {
    let normal = face.axis;
    let base = origin.shift(normal, 2 * face.side.face_offset());
    let (p1, p2) = normal.perpendicular();
    let mut n = 0;
    for (along, across) in [(p1, p2), (p2, p1)] {
        for t in [0, 2] {
            n += edge_crossings(fine, base.shift(across, t), along);
        }
    }
    n
}

/// Outcome of one coarse face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FaceCut {
    Open,
    Simple,
    Ambiguous,
}

/// Check whether coarse cell `iv` can be represented as one cut cell.
///
/// `fine` holds nodal level-set values at twice the coarse resolution; coarse
/// cell `iv` spans fine nodes `2 iv ..= 2 iv + 2`.
pub fn check_multivalued(iv: IntVect, fine: &RealArray) -> Result<Coarsenability, MeshEbError> {
    let origin = iv * 2;

    let mut status = Coarsenability::Valid;
    let mut fatal = None;
    let mut all_simple = true;
    for face in Face::ALL {
        let count = face_crossings(fine, origin, face);
        let cut = match count {
            0 => FaceCut::Open,
            2 => FaceCut::Simple,
            4 => FaceCut::Ambiguous,
            _ => {
                fatal.get_or_insert(MeshEbError::CrossingCount {
                    cell: iv,
                    face,
                    count,
                });
                FaceCut::Ambiguous
            }
        };
        if cut == FaceCut::Ambiguous {
            status = status.combine(Coarsenability::Ambiguous(AmbiguityReason::AmbiguousFace(face)));
        }
        all_simple &= cut == FaceCut::Simple;
    }
    if let Some(e) = fatal {
        return Err(e);
    }

    if all_simple {
        let fluid_corners = iproduct!([0, 2], [0, 2], [0, 2])
            .filter(|&(c, b, a)| fine[origin + IntVect::new(a, b, c)] < 0.0)
            .count() as u32;
        match fluid_corners {
            4 => {}
            2 | 6 => status = Coarsenability::Ambiguous(AmbiguityReason::SaddleCorners),
            count => return Err(MeshEbError::OpenCornerCount { cell: iv, count }),
        }
    }

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::index_range::{IndexRange, IndexType};

    /// Fine nodes for a single coarse cell at the origin.
    fn fine_nodes(f: impl Fn(i32, i32, i32) -> f64) -> RealArray {
        let nodes = IndexRange::with_type((0, 0, 0), (2, 2, 2), IndexType::NODE);
        let mut s = RealArray::new(nodes, 1, 0.0);
        for iv in nodes.iter() {
            s[iv] = f(iv.0[0], iv.0[1], iv.0[2]);
        }
        s
    }

    #[test]
    fn crossing_predicate() {
        assert!(crosses(-1.0, 0.0));
        assert!(crosses(2.0, -0.5));
        assert!(!crosses(0.0, 3.0));
        assert!(!crosses(-1.0, -2.0));
    }

    #[test]
    fn uncut_blocks_are_valid() {
        let s = fine_nodes(|_, _, _| -1.0);
        assert_eq!(check_multivalued(IntVect::ZERO, &s), Ok(Coarsenability::Valid));
        let s = fine_nodes(|_, _, _| 1.0);
        assert_eq!(check_multivalued(IntVect::ZERO, &s), Ok(Coarsenability::Valid));
    }

    #[test]
    fn planar_cut_is_valid() {
        let s = fine_nodes(|i, _, _| f64::from(i) - 0.7);
        assert_eq!(check_multivalued(IntVect::ZERO, &s), Ok(Coarsenability::Valid));
        // Cuts all six faces once and splits the corners four to four.
        let s = fine_nodes(|i, j, k| f64::from(i + j + k) - 3.0);
        assert_eq!(check_multivalued(IntVect::ZERO, &s), Ok(Coarsenability::Valid));
    }

    #[test]
    fn opposite_corner_caps_are_a_saddle() {
        let s = fine_nodes(|i, j, k| f64::from((i + j + k).min(6 - i - j - k)) - 1.5);
        assert_eq!(
            check_multivalued(IntVect::ZERO, &s),
            Ok(Coarsenability::Ambiguous(AmbiguityReason::SaddleCorners))
        );
    }

    #[test]
    fn works_away_from_the_origin() {
        let nodes = IndexRange::with_type((2, 4, 0), (4, 6, 2), IndexType::NODE);
        let mut s = RealArray::new(nodes, 1, 0.0);
        for iv in nodes.iter() {
            s[iv] = f64::from(iv.0[0] + iv.0[1] + iv.0[2] - 2 - 4) - 3.0;
        }
        assert_eq!(check_multivalued(IntVect::new(1, 2, 0), &s), Ok(Coarsenability::Valid));
    }

    #[test]
    fn thin_slab_gives_ambiguous_faces() {
        // Fluid only on the i = 1 node plane: the four y/z faces see the cut twice.
        let s = fine_nodes(|i, _, _| if i == 1 { -1.0 } else { 1.0 });
        let status = check_multivalued(IntVect::ZERO, &s).unwrap();
        assert!(matches!(
            status,
            Coarsenability::Ambiguous(AmbiguityReason::AmbiguousFace(f)) if f.axis != Axis::X
        ));
        assert_eq!(status.code(), 1);
    }

    #[test]
    fn impossible_face_count_is_fatal() {
        // Four coarse edges of the ylo face each cut twice.
        let s = fine_nodes(|i, j, k| {
            if j == 0 && (i == 1) != (k == 1) { 1.0 } else { -1.0 }
        });
        let err = check_multivalued(IntVect::ZERO, &s).unwrap_err();
        assert!(matches!(err, MeshEbError::CrossingCount { count: 8, .. }));
        assert!(err.is_internal());
    }
}
