use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sgprop::{OrbitalElements, Propagator};

fn iss() -> OrbitalElements {
    OrbitalElements::builder()
        .satellite_number(25544)
        .epoch(2457152.3696104102)
        .inclination(51.6464)
        .right_ascension(275.3867)
        .eccentricity(0.0006524)
        .argument_of_perigee(289.1638)
        .mean_anomaly(208.5861)
        .mean_motion(15.55704207)
        .bstar(0.23097e-3)
        .build()
        .unwrap()
}

fn molniya() -> OrbitalElements {
    OrbitalElements::builder()
        .satellite_number(8195)
        .epoch(2453911.83215444)
        .inclination(64.1586)
        .right_ascension(279.0717)
        .eccentricity(0.6877146)
        .argument_of_perigee(264.7651)
        .mean_anomaly(20.2257)
        .mean_motion(2.00491383)
        .bstar(0.11873e-3)
        .build()
        .unwrap()
}

fn random_offsets(rng: &mut StdRng, span: f64, samples: usize) -> Vec<f64> {
    (0..samples).map(|_| rng.random_range(-span..span)).collect()
}

fn bench_init(c: &mut Criterion) {
    let near = iss();
    let deep = molniya();

    c.bench_function("propagator/init_sgp4", |b| {
        b.iter(|| black_box(Propagator::new(black_box(&near))))
    });
    c.bench_function("propagator/init_sdp4_half_day", |b| {
        b.iter(|| black_box(Propagator::new(black_box(&deep))))
    });
}

fn bench_predict_sgp4(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let propagator = Propagator::new(&iss());

    c.bench_function("propagator/predict_sgp4_1d", |b| {
        b.iter_batched(
            || random_offsets(&mut rng, 1440.0, 1_000),
            |offsets| {
                for t in offsets {
                    black_box(propagator.predict(black_box(t)));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// The resonance integrator restarts at epoch on every call, so the cost grows with |tsince|.
fn bench_predict_sdp4_resonant(c: &mut Criterion) {
    let propagator = Propagator::new(&molniya());
    let mut group = c.benchmark_group("propagator/predict_sdp4_half_day");

    for days in [1.0, 30.0, 365.0] {
        let mut rng = StdRng::seed_from_u64(7);
        group.bench_function(format!("{days}d"), |b| {
            b.iter_batched(
                || random_offsets(&mut rng, days * 1440.0, 100),
                |offsets| {
                    for t in offsets {
                        black_box(propagator.predict(black_box(t)));
                    }
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_init, bench_predict_sgp4, bench_predict_sdp4_resonant
);
criterion_main!(benches);
