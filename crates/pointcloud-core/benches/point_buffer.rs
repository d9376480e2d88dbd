use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pointcloud_core::{Point3D, PointBuffer};

fn grid_points(n: usize) -> Vec<Point3D> {
    (0..n)
        .map(|i| {
            let f = i as f32;
            Point3D::new(f * 0.01, (f * 0.37).sin(), (f * 0.11).cos())
        })
        .collect()
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_buffer_fill");
    group.sample_size(10);
    for n in [500usize, 2000, 8000] {
        let pts = grid_points(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &pts, |b, pts| {
            b.iter(|| {
                let mut buf = PointBuffer::with_capacity(pts.len());
                buf.extend_unique(pts.iter().copied());
                black_box(buf.count())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fill);
criterion_main!(benches);
