//! Sub-sampled cut-cell moments on the finest level.
//!
//! Cut faces and cells are sampled on a regular `n × n` (or `n × n × n`)
//! lattice of interior points. The level set is interpolated (bi- or
//! trilinearly) from the corner nodes and a sample counts as fluid when the
//! interpolated value is negative. Edge centroids use the exact linear
//! crossing. The boundary normal and area follow from the divergence theorem
//! applied to the face apertures, so they stay consistent with the faces
//! actually stored on the level.
//!
//! Regular and covered entities never reach the sampler; they receive their
//! exact sentinels.

use itertools::iproduct;

use crate::algs::classify::face_type_at;
use crate::data::eb_level::{CellMoments, EDGE_COVERED, EDGE_REGULAR, FaceMoments, NO_BOUNDARY};
use crate::data::field::RealArray;
use crate::topology::axis::Axis;
use crate::topology::cell_type::{CellKind, EbType};
use crate::topology::index_range::IntVect;

#[inline]
fn sample_points(n: usize) -> impl Iterator<Item = f64> + Clone {
    let inv = 1.0 / n as f64;
    (0..n).map(move |i| (i as f64 + 0.5) * inv)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Centroid of the uncovered part of the edge along `axis` starting at node
/// `iv`, in `[-0.5, 0.5]`, or a sentinel for uncut edges.
pub fn edge_centroid(s: &RealArray, axis: Axis, iv: IntVect, t: EbType) -> f64 {
    match t {
        EbType::Regular => EDGE_REGULAR,
        EbType::Covered => EDGE_COVERED,
        EbType::Irregular => {
            let a = s[iv];
            let b = s[iv + axis.unit()];
            let cut = (a / (a - b)).clamp(0.0, 1.0);
            if a < 0.0 {
                0.5 * (cut - 1.0)
            } else {
                0.5 * cut
            }
        }
    }
}

/// Aperture and centroid of the face normal to `axis` with lowest node `iv`.
pub fn face_moments(s: &RealArray, axis: Axis, iv: IntVect, t: EbType, n: usize) -> FaceMoments {
    match t {
        EbType::Regular => FaceMoments::OPEN,
        EbType::Covered => FaceMoments::CLOSED,
        EbType::Irregular => {
            let (p1, p2) = axis.perpendicular();
            let c00 = s[iv];
            let c10 = s[iv + p1.unit()];
            let c01 = s[iv + p2.unit()];
            let c11 = s[iv + p1.unit() + p2.unit()];

            let (mut count, mut m1, mut m2) = (0usize, 0.0, 0.0);
            for (w, u) in iproduct!(sample_points(n), sample_points(n)) {
                let v = lerp(lerp(c00, c10, u), lerp(c01, c11, u), w);
                if v < 0.0 {
                    count += 1;
                    m1 += u - 0.5;
                    m2 += w - 0.5;
                }
            }
            if count == 0 {
                return FaceMoments::CLOSED;
            }
            let c = count as f64;
            FaceMoments {
                area: c / (n * n) as f64,
                centroid: [m1 / c, m2 / c],
            }
        }
    }
}

/// Mean position of the level-set zero on the 12 edges of cell `iv`,
/// relative to the cell center.
fn boundary_centroid(s: &RealArray, iv: IntVect) -> Option<[f64; 3]> {
    let mut sum = [0.0; 3];
    let mut hits = 0usize;
    for axis in Axis::ALL {
        let (p1, p2) = axis.perpendicular();
        for (b, a) in iproduct!(0..2, 0..2) {
            let lo = iv.shift(p1, a).shift(p2, b);
            let (va, vb) = (s[lo], s[lo + axis.unit()]);
            if (va < 0.0) == (vb < 0.0) {
                continue;
            }
            let t = (va / (va - vb)).clamp(0.0, 1.0);
            sum[axis.index()] += t - 0.5;
            sum[p1.index()] += f64::from(a) - 0.5;
            sum[p2.index()] += f64::from(b) - 0.5;
            hits += 1;
        }
    }
    (hits > 0).then(|| sum.map(|x| x / hits as f64))
}

/// Moments of cell `iv` of the given kind.
pub fn cell_moments(s: &RealArray, iv: IntVect, kind: CellKind, n: usize) -> CellMoments {
    match kind {
        CellKind::Regular => return CellMoments::REGULAR,
        CellKind::Covered => return CellMoments::COVERED,
        CellKind::SingleValued => {}
    }

    let mut c = [[[0.0; 2]; 2]; 2];
    for (k, j, i) in iproduct!(0..2usize, 0..2usize, 0..2usize) {
        c[k][j][i] = s[iv + IntVect::new(i as i32, j as i32, k as i32)];
    }

    let (mut count, mut m) = (0usize, [0.0; 3]);
    for (z, y, x) in iproduct!(sample_points(n), sample_points(n), sample_points(n)) {
        let lo = lerp(lerp(c[0][0][0], c[0][0][1], x), lerp(c[0][1][0], c[0][1][1], x), y);
        let hi = lerp(lerp(c[1][0][0], c[1][0][1], x), lerp(c[1][1][0], c[1][1][1], x), y);
        if lerp(lo, hi, z) < 0.0 {
            count += 1;
            m[0] += x - 0.5;
            m[1] += y - 0.5;
            m[2] += z - 0.5;
        }
    }
    let vol_frac = count as f64 / (n * n * n) as f64;
    let centroid = if count > 0 {
        m.map(|x| x / count as f64)
    } else {
        [0.0; 3]
    };

    // Outward (fluid to solid) area vector from the aperture difference.
    let mut da = [0.0; 3];
    for axis in Axis::ALL {
        let lo = iv;
        let hi = iv + axis.unit();
        let ap_lo = face_moments(s, axis, lo, face_type_at(s, axis, lo), n).area;
        let ap_hi = face_moments(s, axis, hi, face_type_at(s, axis, hi), n).area;
        da[axis.index()] = ap_lo - ap_hi;
    }
    let area = da.iter().map(|x| x * x).sum::<f64>().sqrt();

    let (bndry_area, bndry_centroid, bndry_normal) = if area > 0.0 {
        (
            area,
            boundary_centroid(s, iv).unwrap_or([NO_BOUNDARY; 3]),
            da.map(|x| x / area),
        )
    } else {
        (0.0, [NO_BOUNDARY; 3], [0.0; 3])
    };

    CellMoments {
        kind,
        vol_frac,
        centroid,
        bndry_area,
        bndry_centroid,
        bndry_normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::classify::cell_kind_at;
    use crate::topology::index_range::{IndexRange, IndexType};

    fn nodes(f: impl Fn(IntVect) -> f64) -> RealArray {
        let r = IndexRange::cube(1).convert(IndexType::NODE);
        let mut s = RealArray::new(r, 1, 0.0);
        for iv in r.iter() {
            s[iv] = f(iv);
        }
        s
    }

    #[test]
    fn sentinels_for_uncut_entities() {
        let s = nodes(|_| -1.0);
        assert_eq!(cell_moments(&s, IntVect::ZERO, CellKind::Regular, 4), CellMoments::REGULAR);
        assert_eq!(cell_moments(&s, IntVect::ZERO, CellKind::Covered, 4), CellMoments::COVERED);
        assert_eq!(face_moments(&s, Axis::X, IntVect::ZERO, EbType::Covered, 4), FaceMoments::CLOSED);
        assert_eq!(edge_centroid(&s, Axis::Z, IntVect::ZERO, EbType::Regular), 1.0);
        assert_eq!(edge_centroid(&s, Axis::Z, IntVect::ZERO, EbType::Covered), -1.0);
    }

    #[test]
    fn edge_centroid_of_uncovered_part() {
        // Crossing at t = 0.25 along x; fluid on the low side.
        let s = nodes(|iv| if iv.0[0] == 0 { -1.0 } else { 3.0 });
        assert_eq!(edge_centroid(&s, Axis::X, IntVect::ZERO, EbType::Irregular), -0.375);
        // Fluid on the high side.
        let s = nodes(|iv| if iv.0[0] == 0 { 1.0 } else { -3.0 });
        assert_eq!(edge_centroid(&s, Axis::X, IntVect::ZERO, EbType::Irregular), 0.125);
    }

    #[test]
    fn half_cell_plane() {
        // x < 0.5 is fluid.
        let s = nodes(|iv| f64::from(iv.0[0]) - 0.5);
        let kind = cell_kind_at(&s, IntVect::ZERO);
        assert_eq!(kind, CellKind::SingleValued);
        let m = cell_moments(&s, IntVect::ZERO, kind, 8);
        assert!((m.vol_frac - 0.5).abs() < 1e-12);
        assert!((m.centroid[0] + 0.25).abs() < 1e-12);
        assert!(m.centroid[1].abs() < 1e-12);
        assert!((m.bndry_area - 1.0).abs() < 1e-12);
        assert_eq!(m.bndry_normal, [1.0, 0.0, 0.0]);
        assert_eq!(m.bndry_centroid, [0.0, 0.0, 0.0]);

        let f = face_moments(&s, Axis::Y, IntVect::ZERO, EbType::Irregular, 8);
        assert!((f.area - 0.5).abs() < 1e-12);
        assert!((f.centroid[0] + 0.25).abs() < 1e-12);
        assert!(f.centroid[1].abs() < 1e-12);
    }
}
