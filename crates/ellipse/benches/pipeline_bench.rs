//! Criterion benchmarks for the construction pipeline.
//! Focus: full draw-plan recompute per method, and assembly of noisy point clouds
//! with n in {16, 64, 256}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p ellipse

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use ellipse::{assemble, fit_closed, ConstructionPlan, Engine, EngineCfg, MethodKind, Point2};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn noisy_ellipse(n: usize, seed: u64) -> Vec<Point2> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let t: f64 = rng.gen::<f64>() * std::f64::consts::TAU;
            let s: f64 = rng.gen_range(0.98..1.02);
            Point2::new(300.0 * s * t.cos(), 180.0 * s * t.sin())
        })
        .collect()
}

fn bench_draw_plan(c: &mut Criterion) {
    let engine = Engine::default();
    let mut group = c.benchmark_group("draw_plan");
    for kind in MethodKind::ALL {
        let plan = ConstructionPlan::defaults(kind).unwrap();
        group.bench_with_input(BenchmarkId::new("reveal_all", kind), &plan, |b, plan| {
            b.iter(|| engine.draw_plan(plan, 0, true))
        });
    }
    group.finish();
}

fn bench_assemble_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_fit");
    for &n in &[16usize, 64, 256] {
        group.bench_with_input(BenchmarkId::new("noisy_ellipse", n), &n, |b, &n| {
            b.iter_batched(
                || noisy_ellipse(n, 11),
                |pts| {
                    if let Ok(contour) = assemble(&pts, None, EngineCfg::default()) {
                        let _curve = fit_closed(contour.points());
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_draw_plan, bench_assemble_fit);
criterion_main!(benches);
