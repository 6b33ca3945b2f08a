//! Benchmarks for constrained Delaunay triangulation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use triangulum::{constrained_triangulation, Point2, Polygon, Triangulator};

/// Generates deterministic pseudo-random points in [0, 100]².
///
/// The four corners are always included so hole polygons stay inside the
/// cloud's bounding box.
fn generate_random_points(count: usize, seed: u64) -> Vec<Point2<f64>> {
    let mut points = Vec::with_capacity(count + 4);
    points.push(Point2::new(0.0, 0.0));
    points.push(Point2::new(100.0, 0.0));
    points.push(Point2::new(100.0, 100.0));
    points.push(Point2::new(0.0, 100.0));

    let mut state = seed;
    for _ in 0..count {
        // xorshift for deterministic random
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let x = (state as f64 / u64::MAX as f64) * 100.0;

        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let y = (state as f64 / u64::MAX as f64) * 100.0;

        points.push(Point2::new(x, y));
    }

    points
}

fn square_hole() -> Polygon<f64> {
    Polygon::new(vec![
        Point2::new(40.0, 40.0),
        Point2::new(60.0, 40.0),
        Point2::new(60.0, 60.0),
        Point2::new(40.0, 60.0),
    ])
}

fn bench_bulk_triangulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_triangulation");

    for count in [100, 1000, 5000] {
        let points = generate_random_points(count, 12345);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("points", count), &points, |b, pts| {
            b.iter(|| constrained_triangulation(black_box(pts), &[]))
        });
    }

    group.finish();
}

fn bench_triangulation_with_hole(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulation_with_hole");

    for count in [100, 1000] {
        let points = generate_random_points(count, 9876);
        let holes = [square_hole()];
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("points", count), &points, |b, pts| {
            b.iter(|| constrained_triangulation(black_box(pts), black_box(&holes)))
        });
    }

    group.finish();
}

fn bench_reused_triangulator(c: &mut Criterion) {
    let points = generate_random_points(1000, 4242);
    let mut engine = Triangulator::new();
    let mut out = Vec::new();

    c.bench_function("reused_triangulator_1000", |b| {
        b.iter(|| {
            engine
                .triangulate_into(black_box(&points), &[], &mut out)
                .unwrap();
            out.len()
        })
    });
}

criterion_group!(
    benches,
    bench_bulk_triangulation,
    bench_triangulation_with_hole,
    bench_reused_triangulator
);
criterion_main!(benches);
