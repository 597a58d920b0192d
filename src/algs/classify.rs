//! Cell, face and edge classification from nodal level-set signs.
//!
//! Every entity is classified from the level-set values at its corner nodes
//! with one rule, [`classify_corners`]: all values `< 0` is regular, all values
//! `>= 0` is covered, anything else is cut. Because a face's corners are a
//! subset of its cells' corners and an edge's corners a subset of its faces',
//! a regular cell can only have regular faces and edges, and a covered cell
//! only covered ones.

use itertools::iproduct;

use crate::algs::parallel::map_points;
use crate::data::field::{FieldArray, RealArray};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshEbError;
use crate::topology::axis::Axis;
use crate::topology::cell_flag::CellFlag;
use crate::topology::cell_type::{CellKind, EbType};
use crate::topology::index_range::{IndexRange, IndexType, IntVect};

/// Output of the classifier: cell flags plus face and edge types per axis.
#[derive(Clone, Debug)]
pub struct TypeArrays {
    /// Cell flags; only the kind is set by classification.
    pub cells: FieldArray<CellFlag>,
    /// Face types, indexed by face-normal axis.
    pub faces: [FieldArray<EbType>; 3],
    /// Edge types, indexed by edge direction.
    pub edges: [FieldArray<EbType>; 3],
}

impl TypeArrays {
    /// Allocate arrays for the cells of `cells` and all their faces and edges.
    pub fn new(cells: &IndexRange) -> Self {
        TypeArrays {
            cells: FieldArray::new(*cells, 1, CellFlag::default()),
            faces: Axis::ALL.map(|d| FieldArray::new(cells.surrounding_nodes(d), 1, EbType::default())),
            edges: Axis::ALL
                .map(|d| FieldArray::new(cells.convert(IndexType::edge(d)), 1, EbType::default())),
        }
    }

    #[inline]
    pub fn face(&self, axis: Axis, iv: IntVect) -> EbType {
        self.faces[axis.index()][iv]
    }

    #[inline]
    pub fn edge(&self, axis: Axis, iv: IntVect) -> EbType {
        self.edges[axis.index()][iv]
    }
}

/// Classify a set of corner values.
#[inline]
pub fn classify_corners(values: &[f64]) -> EbType {
    if values.iter().all(|&v| v < 0.0) {
        EbType::Regular
    } else if values.iter().all(|&v| v >= 0.0) {
        EbType::Covered
    } else {
        EbType::Irregular
    }
}

/// Kind of cell `iv` from its 8 corner nodes.
pub fn cell_kind_at(s: &RealArray, iv: IntVect) -> CellKind {
    let mut corners = [0.0; 8];
    for (n, (c, b, a)) in iproduct!(0..2, 0..2, 0..2).enumerate() {
        corners[n] = s[iv + IntVect::new(a, b, c)];
    }
    classify_corners(&corners).into()
}

/// Type of the face normal to `axis` whose lowest node is `iv`.
pub fn face_type_at(s: &RealArray, axis: Axis, iv: IntVect) -> EbType {
    let (p1, p2) = axis.perpendicular();
    let corners = [
        s[iv],
        s[iv + p1.unit()],
        s[iv + p2.unit()],
        s[iv + p1.unit() + p2.unit()],
    ];
    classify_corners(&corners)
}

/// Type of the edge along `axis` whose lower node is `iv`.
pub fn edge_type_at(s: &RealArray, axis: Axis, iv: IntVect) -> EbType {
    classify_corners(&[s[iv], s[iv + axis.unit()]])
}

/// Classify cells, faces and edges of `target` that also lie in `padded`.
///
/// Both ranges are cell-centered; faces and edges use the corresponding
/// derived ranges of each. Only entries inside `out`'s arrays are written.
/// The level set must cover every node touched.
pub fn build_types(
    target: &IndexRange,
    padded: &IndexRange,
    s: &RealArray,
    out: &mut TypeArrays,
) -> Result<(), MeshEbError> {
    let cells = target
        .intersection(padded)
        .intersection(out.cells.range());
    let nodes = cells.convert(IndexType::NODE);
    if !s.range().contains_range(&nodes) {
        return Err(MeshEbError::InsufficientHalo {
            what: "level set for classification",
            required: nodes,
            available: *s.range(),
        });
    }

    let kinds = map_points(&cells, |iv| cell_kind_at(s, iv));
    for (iv, kind) in cells.iter().zip(kinds) {
        out.cells[iv].set_kind(kind);
    }

    for axis in Axis::ALL {
        let d = axis.index();
        let faces = target
            .surrounding_nodes(axis)
            .intersection(&padded.surrounding_nodes(axis))
            .intersection(out.faces[d].range());
        let types = map_points(&faces, |iv| face_type_at(s, axis, iv));
        for (iv, t) in faces.iter().zip(types) {
            out.faces[d][iv] = t;
        }

        let ixtype = IndexType::edge(axis);
        let edges = target
            .convert(ixtype)
            .intersection(&padded.convert(ixtype))
            .intersection(out.edges[d].range());
        let types = map_points(&edges, |iv| edge_type_at(s, axis, iv));
        for (iv, t) in edges.iter().zip(types) {
            out.edges[d][iv] = t;
        }
    }

    log::debug!(
        "classified {} cells of {} ({} single-valued)",
        cells.num_points(),
        target,
        cells
            .iter()
            .filter(|&iv| out.cells[iv].is_single_valued())
            .count()
    );
    Ok(())
}

/// Allocate [`TypeArrays`] over `cells` and classify all of it.
pub fn classify_level(s: &RealArray, cells: &IndexRange) -> Result<TypeArrays, MeshEbError> {
    let mut out = TypeArrays::new(cells);
    build_types(cells, cells, s, &mut out)?;
    Ok(out)
}

impl DebugInvariants for TypeArrays {
    /// Every regular (covered) cell must be bounded by regular (covered)
    /// faces and edges.
    fn validate_invariants(&self) -> Result<(), MeshEbError> {
        for (iv, flag) in self.cells.iter_comp(0) {
            let expected = match flag.kind() {
                CellKind::Regular => EbType::Regular,
                CellKind::Covered => EbType::Covered,
                CellKind::SingleValued => continue,
            };
            for axis in Axis::ALL {
                let (p1, p2) = axis.perpendicular();
                for side in 0..2 {
                    let face = iv.shift(axis, side);
                    if let Some(t) = self.faces[axis.index()].get(face, 0) {
                        if t != expected {
                            return Err(bounding_mismatch(iv, "face", axis, t, flag.kind()));
                        }
                    }
                }
                for (a, b) in iproduct!(0..2, 0..2) {
                    let edge = iv.shift(p1, a).shift(p2, b);
                    if let Some(t) = self.edges[axis.index()].get(edge, 0) {
                        if t != expected {
                            return Err(bounding_mismatch(iv, "edge", axis, t, flag.kind()));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn bounding_mismatch(iv: IntVect, what: &str, axis: Axis, t: EbType, kind: CellKind) -> MeshEbError {
    MeshEbError::InvariantViolation {
        index: iv,
        message: format!("{kind:?} cell bounded by {t:?} {axis}-{what}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_set(cells: &IndexRange, f: impl Fn(IntVect) -> f64) -> RealArray {
        let nodes = cells.convert(IndexType::NODE);
        let mut s = RealArray::new(nodes, 1, 0.0);
        for iv in nodes.iter() {
            s[iv] = f(iv);
        }
        s
    }

    #[test]
    fn corner_rule() {
        assert_eq!(classify_corners(&[-1.0, -0.1]), EbType::Regular);
        assert_eq!(classify_corners(&[0.0, 2.0]), EbType::Covered);
        assert_eq!(classify_corners(&[-1.0, 0.0]), EbType::Irregular);
        assert_eq!(classify_corners(&[-1.0, f64::NAN]), EbType::Irregular);
    }

    #[test]
    fn zero_counts_as_covered() {
        let cells = IndexRange::cube(1);
        let s = level_set(&cells, |_| 0.0);
        let t = classify_level(&s, &cells).unwrap();
        assert!(t.cells[IntVect::ZERO].is_covered());
        assert_eq!(t.face(Axis::Z, IntVect::new(0, 0, 1)), EbType::Covered);
        assert_eq!(t.edge(Axis::Y, IntVect::new(1, 0, 1)), EbType::Covered);
    }

    #[test]
    fn single_positive_node_cuts_its_neighbors() {
        let cells = IndexRange::cube(2);
        let s = level_set(&cells, |iv| if iv == IntVect::new(1, 1, 1) { 1.0 } else { -1.0 });
        let t = classify_level(&s, &cells).unwrap();
        for iv in cells.iter() {
            assert!(t.cells[iv].is_single_valued(), "cell {iv}");
        }
        assert_eq!(t.edge(Axis::X, IntVect::new(0, 1, 1)), EbType::Irregular);
        assert_eq!(t.edge(Axis::X, IntVect::new(0, 0, 0)), EbType::Regular);
        assert_eq!(t.face(Axis::X, IntVect::new(1, 0, 0)), EbType::Irregular);
        assert_eq!(t.face(Axis::X, IntVect::new(0, 0, 0)), EbType::Regular);
        assert!(t.validate_invariants().is_ok());
    }

    #[test]
    fn partial_target_leaves_rest_untouched() {
        let cells = IndexRange::cube(4);
        let s = level_set(&cells, |_| 1.0);
        let mut t = TypeArrays::new(&cells);
        let target = IndexRange::new((0, 0, 0), (1, 3, 3));
        build_types(&target, &cells, &s, &mut t).unwrap();
        assert!(t.cells[IntVect::new(1, 0, 0)].is_covered());
        assert!(t.cells[IntVect::new(2, 0, 0)].is_regular());
        assert_eq!(t.face(Axis::X, IntVect::new(2, 0, 0)), EbType::Covered);
        assert_eq!(t.face(Axis::X, IntVect::new(3, 0, 0)), EbType::Regular);
    }

    #[test]
    fn missing_level_set_is_an_error() {
        let cells = IndexRange::cube(4);
        let s = level_set(&IndexRange::cube(2), |_| -1.0);
        assert!(matches!(
            classify_level(&s, &cells),
            Err(MeshEbError::InsufficientHalo { .. })
        ));
    }
}
