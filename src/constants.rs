//! # Constants and type definitions for sgprop
//!
//! This module centralizes the **model constants**, **conversion factors**, and **unit aliases**
//! used throughout the `sgprop` library.
//!
//! ## Overview
//!
//! - Time constants (minutes/seconds per day, Unix epoch as a Julian date)
//! - WGS-72 geopotential terms in the canonical units of the SGP4/SDP4 family
//!   (Earth radii, minutes)
//! - Earth shape used to scale the model output to kilometres
//! - Thresholds selecting between the near-earth and deep-space models
//!
//! Deep-space lunar/solar coefficients and resonance harmonics only make sense inside the
//! deep-space engine and live in [`crate::propagation::deep_space`].

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of minutes in a day
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// Julian date of the Unix epoch (1970-01-01T00:00:00 UTC)
pub const JD_UNIX_EPOCH: f64 = 2_440_587.5;

/// Julian date of 1950-01-00 0h, origin of the `ds50` day count used by the deep-space model
pub const JD_1950: f64 = 2_433_281.5;

/// Earth equatorial radius in kilometres (WGS-84), used to scale canonical output
pub const EARTH_RADIUS_KM: f64 = 6_378.137;

/// Flattening of the WGS-84 ellipsoid
pub const EARTH_FLATTENING: f64 = 3.352_810_664_747_48E-3;

/// Earth rotations per sidereal day
pub const EARTH_ROTATIONS_PER_SIDEREAL_DAY: f64 = 1.002_737_909_34;

// -------------------------------------------------------------------------------------------------
// SGP4/SDP4 geopotential terms (canonical units: Earth radii, minutes)
// -------------------------------------------------------------------------------------------------

/// sqrt(GM) in Earth radii^1.5 / minute
pub const XKE: f64 = 7.436_691_61E-2;

/// ½ J2 · AE²
pub const CK2: f64 = 5.413_079E-4;

/// -⅜ J4 · AE⁴
pub const CK4: f64 = 6.209_887E-7;

/// Third zonal harmonic
pub const J3: f64 = -2.538_81E-6;

/// (q0 - s)⁴ with q0 = 120 km and s = 78 km, in Earth radii
pub const QOMS2T: f64 = 1.880_279E-09;

/// Atmospheric density parameter s, in Earth radii
pub const S_DENSITY: f64 = 1.012_229;

/// Distance unit: Earth radii per Earth radius
pub const AE: f64 = 1.0;

/// ⅔
pub const TWO_THIRD: f64 = 2.0 / 3.0;

// -------------------------------------------------------------------------------------------------
// Model thresholds
// -------------------------------------------------------------------------------------------------

/// Orbital period (minutes) at and above which the deep-space model is selected
pub const DEEP_SPACE_PERIOD_MINUTES: f64 = 225.0;

/// Perigee height (km) under which the higher-order drag terms are dropped
pub const SIMPLE_DRAG_PERIGEE_KM: f64 = 220.0;

/// Lower bound of the eccentricity allowed in the propagated mean elements
pub const ECCENTRICITY_FLOOR: f64 = 1.0E-6;

/// Convergence tolerance (radians) of the Kepler solver
pub const KEPLER_TOLERANCE: f64 = 1.0E-6;

/// Maximum number of Kepler iterations
pub const KEPLER_MAX_ITER: usize = 10;

/// Geosynchronous window on the mean motion (revolutions/day)
pub const GEOSYNCHRONOUS_LOWER_MEAN_MOTION: f64 = 0.9;
pub const GEOSYNCHRONOUS_UPPER_MEAN_MOTION: f64 = 1.1;

/// Largest eccentricity still considered geosynchronous
pub const GEOSYNCHRONOUS_ECCENTRICITY_THRESHOLD: f64 = 0.2;

/// Largest inclination (degrees) still considered geosynchronous
pub const GEOSYNCHRONOUS_INCLINATION_THRESHOLD_DEGREES: f64 = 70.0;

/// Mean motion (revolutions/day) at which an orbit is taken as re-entered
pub const DECAY_MEAN_MOTION: f64 = 16.666666;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;

/// Angle in radians
pub type Radian = f64;

/// Julian date (days)
pub type JulianDate = f64;

/// Time offset from the element epoch, in minutes
pub type Minutes = f64;

/// Length in kilometres
pub type Kilometer = f64;
