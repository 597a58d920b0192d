mod util;
use mesh_eb::algs::classify::{classify_corners, classify_level};
use mesh_eb::prelude::*;
use proptest::prelude::*;
use util::*;

#[test]
fn planar_cut_classifies_by_column() {
    // Fluid for x < 1.5 on a unit grid.
    let cells = IndexRange::cube(4);
    let s = nodal(&cells, |iv| f64::from(iv.0[0]) - 1.5);
    let t = classify_level(&s, &cells).unwrap();

    for iv in cells.iter() {
        let f = t.cells[iv];
        match iv.0[0] {
            0 => assert!(f.is_regular(), "{iv}"),
            1 => assert!(f.is_single_valued(), "{iv}"),
            _ => assert!(f.is_covered(), "{iv}"),
        }
    }
    // x-faces sit on node planes and are never cut by this plane.
    assert_eq!(t.face(Axis::X, IntVect::new(1, 2, 2)), EbType::Regular);
    assert_eq!(t.face(Axis::X, IntVect::new(2, 2, 2)), EbType::Covered);
    // y- and z-faces of the cut column are cut.
    assert_eq!(t.face(Axis::Y, IntVect::new(1, 0, 3)), EbType::Irregular);
    assert_eq!(t.face(Axis::Z, IntVect::new(1, 3, 4)), EbType::Irregular);
    assert_eq!(t.edge(Axis::X, IntVect::new(1, 4, 4)), EbType::Irregular);
    assert_eq!(t.edge(Axis::Y, IntVect::new(1, 0, 0)), EbType::Regular);
    assert_eq!(t.edge(Axis::Z, IntVect::new(4, 0, 0)), EbType::Covered);
    assert!(t.validate_invariants().is_ok());
}

fn corner_value() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), -1.0f64..1.0]
}

proptest! {
    #[test]
    fn corner_rule(values in prop::collection::vec(corner_value(), 2..=8)) {
        let t = classify_corners(&values);
        let neg = values.iter().filter(|&&v| v < 0.0).count();
        let expected = if neg == values.len() {
            EbType::Regular
        } else if neg == 0 {
            EbType::Covered
        } else {
            EbType::Irregular
        };
        prop_assert_eq!(t, expected);
    }

    #[test]
    fn bounding_entities_agree_with_cells(values in prop::collection::vec(corner_value(), 64)) {
        // 3³ cells, 4³ nodes.
        let cells = IndexRange::cube(3);
        let s = nodal(&cells, |iv| values[(iv.0[0] + 4 * (iv.0[1] + 4 * iv.0[2])) as usize]);
        let t = classify_level(&s, &cells).unwrap();
        prop_assert!(t.validate_invariants().is_ok());
    }
}
