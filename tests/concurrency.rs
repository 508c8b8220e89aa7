mod common;

use rayon::prelude::*;
use sgprop::{ModelOutput, Propagator};

use crate::common::{init_logger, ALL_FIXTURES};

fn offsets() -> Vec<f64> {
    (-40..=40).map(|k| k as f64 * 97.5).collect()
}

#[test]
fn test_parallel_predictions_match_sequential() {
    init_logger();

    for fixture in ALL_FIXTURES {
        let propagator = Propagator::new(&fixture.elements());
        let tsince = offsets();

        let sequential: Vec<ModelOutput> = tsince.iter().map(|&t| propagator.predict(t)).collect();
        let parallel: Vec<ModelOutput> = tsince.par_iter().map(|&t| propagator.predict(t)).collect();
        assert_eq!(sequential, parallel, "satellite {}", fixture.satellite_number);

        // reversed order, shuffled across threads
        let mut reversed: Vec<ModelOutput> = tsince
            .par_iter()
            .rev()
            .map(|&t| propagator.predict(t))
            .collect();
        reversed.reverse();
        assert_eq!(sequential, reversed);
    }
}

#[test]
fn test_parallel_element_sets() {
    let propagators: Vec<Propagator> = ALL_FIXTURES
        .iter()
        .map(|fixture| Propagator::new(&fixture.elements()))
        .collect();

    let parallel: Vec<ModelOutput> = propagators.par_iter().map(|p| p.predict(1440.0)).collect();
    for (propagator, out) in propagators.iter().zip(&parallel) {
        assert_eq!(&propagator.predict(1440.0), out);
    }
}

#[test]
fn test_epoch_prediction_is_deterministic() {
    for fixture in ALL_FIXTURES {
        let elements = fixture.elements();
        let first = sgprop::propagate(&elements, 0.0);
        let second = Propagator::new(&elements).predict(0.0);

        assert_eq!(first, second);
        assert_eq!(first.tsince, 0.0);
    }
}

#[test]
fn test_far_offsets_keep_eccentricity_floor() {
    for fixture in ALL_FIXTURES {
        let propagator = Propagator::new(&fixture.elements());
        for tsince in [-1.0e6, 1.0e6] {
            let out = propagator.predict(tsince);
            assert!(out.eccentricity >= propagator.params().eccentricity_floor);
        }
    }
}
