mod util;
use mesh_eb::algs::coarsen::coarsen_at;
use mesh_eb::data::eb_level::{EDGE_COVERED, EDGE_REGULAR};
use mesh_eb::prelude::*;
use std::f64::consts::PI;
use util::*;

#[test]
fn sphere_end_to_end() {
    let sphere = sphere_cavity();
    let exact = 4.0 / 3.0 * PI * sphere.radius.powi(3);

    let fine = build_on_unit_box(&sphere, 32, 2);
    assert!(fine.validate_invariants().is_ok());
    let vf = fine.fluid_volume();
    assert!((vf - exact).abs() / exact < 0.03, "fine volume {vf} vs {exact}");

    let (coarse, report) = coarsen_level(&fine, &CoarsenOptions::default())
        .expect("coarsening a smooth sphere must not fail");
    assert_eq!(*coarse.domain(), IndexRange::cube(16));
    assert!(coarse.validate_invariants().is_ok());
    let vc = coarse.fluid_volume();
    assert!((vc - vf).abs() < 1e-9 * vf, "coarse {vc} vs fine {vf}");
    assert!(report.ambiguous.len() < coarse.count_cells(CellKind::SingleValued));

    // Cells well inside and well outside keep their sentinels.
    let center = IntVect::splat(8);
    assert_eq!(coarse.cell(center), CellMoments::REGULAR);
    assert_eq!(coarse.cell(IntVect::ZERO), CellMoments::COVERED);
    assert!(coarse.count_cells(CellKind::SingleValued) > 0);
}

#[test]
fn two_levels_of_coarsening() {
    let sphere = sphere_cavity();
    let fine = build_on_unit_box(&sphere, 32, 4);
    let (mid, _) = coarsen_level(
        &fine,
        &CoarsenOptions {
            ngrow: 2,
            ..Default::default()
        },
    )
    .unwrap();
    let (coarse, _) = coarsen_level(&mid, &CoarsenOptions::default()).unwrap();
    assert_eq!(*coarse.domain(), IndexRange::cube(8));
    assert_eq!(coarse.grid().spacing(), [0.25; 3]);
    assert!((coarse.fluid_volume() - fine.fluid_volume()).abs() < 1e-9);

    // Not enough halo left for a third pass.
    assert!(matches!(
        coarsen_level(&coarse, &CoarsenOptions::default()),
        Err(MeshEbError::InsufficientHalo { .. })
    ));
}

#[test]
fn half_space_sentinels() {
    // Fluid below z = 0.3.
    let plane = Plane {
        point: [0.0, 0.0, 0.3],
        normal: [0.0, 0.0, 1.0],
    };
    let fine = build_on_unit_box(&plane, 16, 2);
    let (coarse, report) = coarsen_level(&fine, &CoarsenOptions::default()).unwrap();
    assert!(report.is_valid());

    assert_eq!(coarse.cell(IntVect::new(3, 3, 0)), CellMoments::REGULAR);
    assert_eq!(coarse.cell(IntVect::new(3, 3, 7)), CellMoments::COVERED);
    assert_eq!(coarse.face(Axis::Z, IntVect::new(3, 3, 7)), FaceMoments::CLOSED);
    assert_eq!(coarse.face(Axis::X, IntVect::new(3, 3, 0)), FaceMoments::OPEN);
    assert_eq!(coarse.edge_centroid[0][IntVect::new(2, 2, 0)], EDGE_REGULAR);
    assert_eq!(coarse.edge_centroid[0][IntVect::new(2, 2, 8)], EDGE_COVERED);

    // The cut layer conserves fine volume and points its normal up.
    let cut = IntVect::new(3, 3, 5);
    let m = coarse.cell(cut);
    assert_eq!(m.kind, CellKind::SingleValued);
    let mean: f64 = (0..2)
        .flat_map(|k| (0..2).flat_map(move |j| (0..2).map(move |i| IntVect::new(i, j, k))))
        .map(|o| fine.vol_frac[cut * 2 + o])
        .sum::<f64>()
        / 8.0;
    assert!((m.vol_frac - mean).abs() < 1e-12);
    assert!((m.bndry_normal[2] - 1.0).abs() < 1e-12);
    assert!(m.bndry_normal[0].abs() < 1e-12);

    // The cut layer's connectivity stays within the layer and below it.
    let f = coarse.flags[cut];
    assert!(f.is_connected(1, 0, 0));
    assert!(f.is_connected(0, 0, -1));
    assert!(!f.is_connected(0, 0, 1));
}

#[test]
fn halo_of_coarse_level_is_regular() {
    let plane = Plane {
        point: [0.0, 0.0, 0.3],
        normal: [0.0, 0.0, 1.0],
    };
    let fine = build_on_unit_box(&plane, 16, 2);
    let (coarse, _) = coarsen_level(&fine, &CoarsenOptions::default()).unwrap();

    // Above the domain everything is solid, but the halo is forced open.
    let halo = IntVect::new(3, 3, 8);
    assert_eq!(coarse.cell(halo), CellMoments::REGULAR);
    assert_eq!(coarse.face(Axis::Z, IntVect::new(3, 3, 9)), FaceMoments::OPEN);
    assert_eq!(coarse.edge_centroid[2][IntVect::new(3, 3, 8)], EDGE_REGULAR);

    let p = coarsen_at(halo, coarse.domain(), 1, &fine);
    assert_eq!(p.cell, Some(CellMoments::REGULAR));
    assert_eq!(p.status, Coarsenability::Valid);
}

#[test]
fn options_load_from_json() {
    let opts: CoarsenOptions = serde_json::from_str(r#"{"ngrow": 2, "check_multivalued": false}"#).unwrap();
    assert_eq!(
        opts,
        CoarsenOptions {
            ngrow: 2,
            check_multivalued: false
        }
    );
    let build: BuildOptions = serde_json::from_str(r#"{"ngrow": 4, "subsamples": 0}"#).unwrap();
    assert!(build.validate().is_err());
}
