//! # Orbital element model and classification
//!
//! This module holds the mean element set fed to the propagator and decides, once per element
//! set, which member of the SGP4/SDP4 family propagates it:
//!
//! - [`orbital_elements`](crate::orbit_type::orbital_elements) – the validated, immutable
//!   [`OrbitalElements`](crate::orbit_type::orbital_elements::OrbitalElements) and its builder.
//! - [`OrbitClass`] – near-earth (SGP4) or deep-space (SDP4), selected from the orbital period
//!   recovered with the Brouwer mean-motion correction.
//!
//! ## Typical workflow
//!
//! ```rust, no_run
//! use sgprop::orbit_type::{orbital_elements::OrbitalElements, OrbitClass};
//!
//! let elements = OrbitalElements::builder()
//!     .epoch(2457152.36961041)
//!     .inclination(51.6464)
//!     .right_ascension(275.3867)
//!     .eccentricity(0.0006524)
//!     .argument_of_perigee(289.1638)
//!     .mean_anomaly(208.5861)
//!     .mean_motion(15.55704207)
//!     .bstar(0.23097e-3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(elements.classify(), OrbitClass::NearEarth);
//! ```
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{Radian, CK2, DEEP_SPACE_PERIOD_MINUTES, DPI, TWO_THIRD, XKE};

/// Validated mean element set and its derived quantities.
pub mod orbital_elements;

/// Propagation model selected for an element set.
///
/// Variants
/// --------
/// * `NearEarth` – period below 225 minutes, propagated by SGP4.
/// * `DeepSpace` – period of 225 minutes or more, propagated by SDP4 (lunar-solar terms and, in
///   the 12 h and 24 h bands, Earth resonance terms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrbitClass {
    NearEarth,
    DeepSpace,
}

impl OrbitClass {
    /// Classify an orbital period expressed in minutes.
    ///
    /// The boundary is inclusive on the deep-space side: exactly 225 minutes is
    /// [`OrbitClass::DeepSpace`].
    pub fn from_period_minutes(period: f64) -> Self {
        if period < DEEP_SPACE_PERIOD_MINUTES {
            OrbitClass::NearEarth
        } else {
            OrbitClass::DeepSpace
        }
    }
}

impl fmt::Display for OrbitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrbitClass::NearEarth => write!(f, "near-earth (SGP4)"),
            OrbitClass::DeepSpace => write!(f, "deep-space (SDP4)"),
        }
    }
}

/// Mean motion and semi-major axis recovered from the element set mean motion.
///
/// Element sets carry a Kozai-style mean motion. The J2 secular contribution is removed in two
/// steps to obtain the Brouwer mean motion `xnodp` and semi-major axis `aodp` the models work
/// with, together with a few inclination/eccentricity functions reused by every later stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BrouwerMean {
    /// Brouwer mean motion (radians/minute)
    pub xnodp: f64,
    /// Brouwer semi-major axis (Earth radii)
    pub aodp: f64,
    pub cosio: f64,
    pub theta2: f64,
    pub x3thm1: f64,
    pub eosq: f64,
    pub betao2: f64,
    pub betao: f64,
}

impl BrouwerMean {
    /// Recover the Brouwer mean motion.
    ///
    /// Arguments
    /// ---------
    /// * `xno`: element set mean motion (radians/minute)
    /// * `eo`: eccentricity
    /// * `xincl`: inclination (radians)
    pub(crate) fn recover(xno: f64, eo: f64, xincl: Radian) -> Self {
        let a1 = (XKE / xno).powf(TWO_THIRD);
        let cosio = xincl.cos();
        let theta2 = cosio * cosio;
        let x3thm1 = 3.0 * theta2 - 1.0;
        let eosq = eo * eo;
        let betao2 = 1.0 - eosq;
        let betao = betao2.sqrt();

        let del1 = 1.5 * CK2 * x3thm1 / (a1 * a1 * betao * betao2);
        let ao = a1 * (1.0 - del1 * (0.5 * TWO_THIRD + del1 * (1.0 + 134.0 / 81.0 * del1)));
        let delo = 1.5 * CK2 * x3thm1 / (ao * ao * betao * betao2);

        BrouwerMean {
            xnodp: xno / (1.0 + delo),
            aodp: ao / (1.0 - delo),
            cosio,
            theta2,
            x3thm1,
            eosq,
            betao2,
            betao,
        }
    }

    /// Anomalistic period in minutes.
    pub(crate) fn period_minutes(&self) -> f64 {
        DPI / self.xnodp
    }
}
