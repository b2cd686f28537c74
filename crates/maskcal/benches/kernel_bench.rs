//! Criterion benchmarks for the geometry kernel and metric projection.
//! Focus sizes: n in {16, 128, 1024} vertices (a long freehand stroke is ~1k).
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p maskcal

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use maskcal::calib::{ActiveCalibration, Calibration, CalibrationId};
use maskcal::geom::{band_polygon, point_in_polygon, polygon_area, Point, Polyline, Side};
use maskcal::metrics::MetricsProjector;
use maskcal::store::{MaskDraft, MaskStore, Shape};
use maskcal::EngineCfg;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Star-shaped ring around (500, 500): jittered radius, increasing angle.
fn random_ring(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let theta = i as f64 / n as f64 * std::f64::consts::TAU;
            let r = rng.gen_range(200.0..400.0);
            Point::new(500.0 + r * theta.cos(), 500.0 + r * theta.sin())
        })
        .collect()
}

/// Random walk to the right, like a waterline traced along a pool edge.
fn random_stroke(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut p = Point::new(0.0, 300.0);
    (0..n)
        .map(|_| {
            p += Point::new(rng.gen_range(2.0..6.0), rng.gen_range(-3.0..3.0));
            p
        })
        .collect()
}

fn bench_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel");
    for &n in &[16usize, 128, 1024] {
        let ring = random_ring(n, 41);
        group.bench_with_input(BenchmarkId::new("polygon_area", n), &ring, |b, ring| {
            b.iter(|| polygon_area(ring).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("point_in_polygon", n), &ring, |b, ring| {
            let q = Point::new(510.0, 490.0);
            b.iter(|| point_in_polygon(q, ring))
        });

        let stroke = random_stroke(n, 42);
        group.bench_with_input(BenchmarkId::new("band_polygon", n), &stroke, |b, stroke| {
            b.iter(|| band_polygon(stroke, 15.0, Side::Outside, 4.0))
        });
    }
    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");
    let active = ActiveCalibration {
        id: CalibrationId(1),
        calibration: Calibration::from_pixels_per_meter(120.0).unwrap(),
    };
    for &masks in &[10usize, 100] {
        let mut store = MaskStore::with_seed(0, 7);
        for k in 0..masks {
            let line = Polyline::new(random_stroke(256, 100 + k as u64)).unwrap();
            let shape = Shape::waterline(line, 0.15).unwrap();
            store.insert(MaskDraft::new(shape)).unwrap();
        }
        group.bench_with_input(BenchmarkId::new("totals_cold", masks), &store, |b, store| {
            b.iter_batched(
                || MetricsProjector::new(&EngineCfg::default()),
                |mut proj| proj.totals_by_material(store, Some(&active)),
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("totals_memoized", masks), &store, |b, store| {
            let mut proj = MetricsProjector::new(&EngineCfg::default());
            proj.totals_by_material(store, Some(&active));
            b.iter(|| proj.totals_by_material(store, Some(&active)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kernel, bench_metrics);
criterion_main!(benches);
