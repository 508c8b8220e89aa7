use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sgprop::constants::{KEPLER_MAX_ITER, KEPLER_TOLERANCE};
use sgprop::kepler::solve_kepler_long_period;

/// Uniform random in [0, 2π)
#[inline]
fn rand_angle(rng: &mut StdRng) -> f64 {
    rng.random::<f64>() * std::f64::consts::TAU
}

/// `(U, axn, ayn)` with the eccentricity drawn from `range`.
fn make_cases(rng: &mut StdRng, range: std::ops::Range<f64>, samples: usize) -> Vec<(f64, f64, f64)> {
    (0..samples)
        .map(|_| {
            let e = rng.random_range(range.clone());
            let omega = rand_angle(rng);
            (rand_angle(rng), e * omega.cos(), e * omega.sin())
        })
        .collect()
}

/// Near-earth regime: e ∈ [0, 0.1)
fn bench_near_earth(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);

    c.bench_function("solve_kepler_long_period/near_earth_e<0.1", |b| {
        b.iter_batched(
            || make_cases(&mut rng, 0.0..0.1, 10_000),
            |cases| {
                for (capu, axn, ayn) in cases {
                    black_box(solve_kepler_long_period(
                        black_box(capu),
                        axn,
                        ayn,
                        KEPLER_TOLERANCE,
                        KEPLER_MAX_ITER,
                    ));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Molniya-like regime: e ∈ [0.6, 0.75)
fn bench_high_e(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBADF00D);

    c.bench_function("solve_kepler_long_period/high_e_0.6..0.75", |b| {
        b.iter_batched(
            || make_cases(&mut rng, 0.6..0.75, 10_000),
            |cases| {
                for (capu, axn, ayn) in cases {
                    black_box(solve_kepler_long_period(
                        black_box(capu),
                        axn,
                        ayn,
                        KEPLER_TOLERANCE,
                        KEPLER_MAX_ITER,
                    ));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_near_earth, bench_high_e
);
criterion_main!(benches);
