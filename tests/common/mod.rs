#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use nalgebra::Vector3;
use sgprop::OrbitalElements;

/// Position tolerance against the reference vectors (km)
pub const POSITION_EPSILON: f64 = 1e-3;

/// Velocity tolerance against the reference vectors (km/s)
pub const VELOCITY_EPSILON: f64 = 1e-6;

/// Mean element set in the units of a two-line element set.
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    pub satellite_number: u32,
    pub epoch: f64,
    pub inclination: f64,
    pub right_ascension: f64,
    pub eccentricity: f64,
    pub argument_of_perigee: f64,
    pub mean_anomaly: f64,
    pub mean_motion: f64,
    pub bstar: f64,
}

impl Fixture {
    pub fn elements(&self) -> OrbitalElements {
        OrbitalElements::builder()
            .satellite_number(self.satellite_number)
            .epoch(self.epoch)
            .inclination(self.inclination)
            .right_ascension(self.right_ascension)
            .eccentricity(self.eccentricity)
            .argument_of_perigee(self.argument_of_perigee)
            .mean_anomaly(self.mean_anomaly)
            .mean_motion(self.mean_motion)
            .bstar(self.bstar)
            .build()
            .unwrap()
    }
}

/// Near-earth, perigee below 220 km
pub const SAT_88888: Fixture = Fixture {
    satellite_number: 88888,
    epoch: 2444514.48708465,
    inclination: 72.8435,
    right_ascension: 115.9689,
    eccentricity: 0.0086731,
    argument_of_perigee: 52.6988,
    mean_anomaly: 110.5714,
    mean_motion: 16.05824518,
    bstar: 0.66816e-4,
};

/// Deep-space, outside the resonance bands
pub const SAT_11801: Fixture = Fixture {
    satellite_number: 11801,
    epoch: 2444468.79629788,
    inclination: 46.7916,
    right_ascension: 230.4354,
    eccentricity: 0.7318036,
    argument_of_perigee: 47.4722,
    mean_anomaly: 10.4117,
    mean_motion: 2.28537848,
    bstar: 0.14311e-1,
};

/// ISS, near-earth with the full drag model
pub const SAT_25544: Fixture = Fixture {
    satellite_number: 25544,
    epoch: 2457152.3696104102,
    inclination: 51.6464,
    right_ascension: 275.3867,
    eccentricity: 0.0006524,
    argument_of_perigee: 289.1638,
    mean_anomaly: 208.5861,
    mean_motion: 15.55704207,
    bstar: 0.23097e-3,
};

/// Geostationary, synchronous resonance
pub const SAT_28626: Fixture = Fixture {
    satellite_number: 28626,
    epoch: 2453911.96683397,
    inclination: 0.0019,
    right_ascension: 286.9433,
    eccentricity: 0.0000335,
    argument_of_perigee: 13.7918,
    mean_anomaly: 55.6504,
    mean_motion: 1.00270176,
    bstar: 0.1e-3,
};

/// Molniya, half-day resonance
pub const SAT_08195: Fixture = Fixture {
    satellite_number: 8195,
    epoch: 2453911.83215444,
    inclination: 64.1586,
    right_ascension: 279.0717,
    eccentricity: 0.6877146,
    argument_of_perigee: 264.7651,
    mean_anomaly: 20.2257,
    mean_motion: 2.00491383,
    bstar: 0.11873e-3,
};

pub const ALL_FIXTURES: [Fixture; 5] = [SAT_88888, SAT_11801, SAT_25544, SAT_28626, SAT_08195];

pub fn assert_vec_close(actual: &Vector3<f64>, expected: [f64; 3], epsilon: f64) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(a, e, epsilon = epsilon);
    }
}

/// Install a logger once for the whole test binary.
pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}
