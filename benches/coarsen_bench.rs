use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use mesh_eb::prelude::*;

fn sphere() -> Sphere {
    Sphere {
        center: [0.01, -0.02, 0.015],
        radius: 0.45,
        fluid_inside: true,
    }
}

fn fine_level(n: i32) -> EbLevel {
    let grid = CartesianGrid::uniform(-1.0, 1.0, n as u32).expect("valid grid");
    build_level(&sphere(), grid, IndexRange::cube(n), &BuildOptions::default()).expect("fine level")
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_level");
    for &n in &[16i32, 32] {
        let grid = CartesianGrid::uniform(-1.0, 1.0, n as u32).expect("valid grid");
        group.bench_with_input(BenchmarkId::new("sphere", n), &n, |b, &n| {
            b.iter(|| {
                let level = build_level(&sphere(), grid, IndexRange::cube(n), &BuildOptions::default());
                black_box(level)
            });
        });
    }
    group.finish();
}

fn bench_coarsen(c: &mut Criterion) {
    let mut group = c.benchmark_group("coarsen_level");
    for &n in &[16i32, 32] {
        let fine = fine_level(n);
        group.bench_with_input(BenchmarkId::new("with_mvmc", n), &fine, |b, fine| {
            b.iter(|| black_box(coarsen_level(fine, &CoarsenOptions::default())));
        });
        let opts = CoarsenOptions {
            check_multivalued: false,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("without_mvmc", n), &fine, |b, fine| {
            b.iter(|| black_box(coarsen_level(fine, &opts)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_coarsen);
criterion_main!(benches);
