//! Neighbor connectivity from face apertures.
//!
//! A cell is connected to a face neighbor when the shared face is open, to an
//! edge neighbor when one of the two L-shaped paths of face crossings is open,
//! and to a corner neighbor when it reaches the edge neighbor and that cell's
//! face toward the corner is open. All 12 edge diagonals and 8 corners come
//! from one loop over axis pairs.

use crate::algs::parallel::map_points;
use crate::data::field::{FieldArray, RealArray};
use crate::topology::axis::{Axis, Face, Side};
use crate::topology::cell_flag::CellFlag;
use crate::topology::index_range::IntVect;

const AXIS_PAIRS: [(Axis, Axis); 3] = [(Axis::X, Axis::Y), (Axis::X, Axis::Z), (Axis::Y, Axis::Z)];

#[inline]
fn connect(flag: &mut CellFlag, offset: IntVect) {
    let [dx, dy, dz] = offset.0;
    flag.set_connected(dx, dy, dz);
}

/// Rebuild the connectivity of `flag` at cell `iv`.
///
/// `apertures[d]` holds face apertures normal to axis `d` and must cover every
/// face of `iv` and of its 26 neighbors. The cell kind is kept; covered cells
/// come back disconnected.
pub fn build_connectivity(flag: CellFlag, iv: IntVect, apertures: &[RealArray; 3]) -> CellFlag {
    let mut out = flag;
    out.set_disconnected();
    if out.is_covered() {
        return out;
    }
    out.set_connected(0, 0, 0);

    let open = |axis: Axis, side: Side, cell: IntVect| {
        apertures[axis.index()][cell.shift(axis, side.face_offset())] != 0.0
    };

    for Face { axis, side } in Face::ALL {
        if open(axis, side, iv) {
            connect(&mut out, IntVect::ZERO.shift(axis, side.sign()));
        }
    }

    for (d1, d2) in AXIS_PAIRS {
        let d3 = d1.third(d2);
        for s1 in Side::BOTH {
            for s2 in Side::BOTH {
                let n1 = iv.shift(d1, s1.sign());
                let n2 = iv.shift(d2, s2.sign());
                let via_d1 = open(d1, s1, iv) && open(d2, s2, n1);
                let via_d2 = open(d2, s2, iv) && open(d1, s1, n2);
                if !(via_d1 || via_d2) {
                    continue;
                }
                let edge = IntVect::ZERO.shift(d1, s1.sign()).shift(d2, s2.sign());
                connect(&mut out, edge);

                let diagonal = iv + edge;
                for s3 in Side::BOTH {
                    if open(d3, s3, diagonal) {
                        connect(&mut out, edge.shift(d3, s3.sign()));
                    }
                }
            }
        }
    }
    out
}

/// Rebuild connectivity for every cell of `flags`.
///
/// Cells on the outermost ring of the array lack the neighbor faces needed
/// for the full stencil; non-covered ones there are connected to themselves
/// only.
pub fn build_connectivity_level(flags: &mut FieldArray<CellFlag>, apertures: &[RealArray; 3]) {
    let all = *flags.range();
    let interior = all.grow(-1);
    let built = map_points(&interior, |iv| build_connectivity(flags[iv], iv, apertures));
    for (iv, f) in interior.iter().zip(built) {
        flags[iv] = f;
    }

    let mut ring = 0usize;
    for iv in all.iter().filter(|&iv| !interior.contains(iv)) {
        let f = &mut flags[iv];
        f.set_disconnected();
        if !f.is_covered() {
            f.set_connected(0, 0, 0);
        }
        ring += 1;
    }
    log::trace!("connectivity built for {} cells, {ring} on the outer ring", interior.num_points());
}
