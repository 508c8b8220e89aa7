//! # Orbit propagation
//!
//! Entry point of the SGP4/SDP4 family. An [`OrbitalElements`] set is turned once into a
//! [`Propagator`], which holds the immutable [`SatelliteModel`] chosen for it:
//!
//! - [`SatelliteModel::NearEarth`] – SGP4, periods below 225 minutes;
//! - [`SatelliteModel::DeepSpace`] – SDP4, periods of 225 minutes or more.
//!
//! [`Propagator::predict`] then returns a fresh [`ModelOutput`] for any signed offset from epoch,
//! in any order. A prediction reads the model and owns its scratch state, so one propagator may
//! serve any number of threads at once.
//!
//! ## Example
//!
//! ```rust, no_run
//! use sgprop::orbit_type::orbital_elements::OrbitalElements;
//! use sgprop::propagation::{propagate, Propagator};
//!
//! let elements = OrbitalElements::builder()
//!     .satellite_number(25544)
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
//! // one-shot
//! let out = propagate(&elements, 90.0);
//! println!("{:?}", out.position);
//!
//! // or keep the model around for many predictions
//! let propagator = Propagator::new(&elements);
//! let track: Vec<_> = (0..96).map(|k| propagator.predict(k as f64 * 15.0)).collect();
//! ```
use std::cmp::Ordering::Greater;
use std::fmt;

use nalgebra::Vector3;
use serde::Serialize;

use crate::constants::{
    JulianDate, Minutes, Radian, ECCENTRICITY_FLOOR, KEPLER_MAX_ITER, KEPLER_TOLERANCE,
    MINUTES_PER_DAY,
};
use crate::orbit_type::orbital_elements::OrbitalElements;
use crate::orbit_type::OrbitClass;
use crate::sgprop_errors::SgpropError;

use self::deep_space::{DeepSpaceParams, ResonanceClass};
use self::near_earth::{NearEarthParams, SecularBase};

/// Lunar-solar and resonance perturbations for SDP4.
pub mod deep_space;
/// SGP4 and the parts of the model shared with SDP4.
pub mod near_earth;

/// Numerical configuration of the propagator.
///
/// Fields
/// -----------------
/// * `kepler_tolerance`: convergence threshold on the eccentric longitude (radians).
/// * `kepler_max_iter`: iteration budget of the Kepler solve. When exhausted the last iterate is
///   used.
/// * `eccentricity_floor`: lower bound applied to the eccentricity after drag decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropagationParams {
    pub kepler_tolerance: f64,
    pub kepler_max_iter: usize,
    pub eccentricity_floor: f64,
}

impl PropagationParams {
    /// Start building a configuration from the defaults.
    ///
    /// See also
    /// -----------------
    /// * [`PropagationParamsBuilder::build`] – validation rules.
    pub fn builder() -> PropagationParamsBuilder {
        PropagationParamsBuilder::new()
    }
}

impl Default for PropagationParams {
    fn default() -> Self {
        PropagationParams {
            kepler_tolerance: KEPLER_TOLERANCE,
            kepler_max_iter: KEPLER_MAX_ITER,
            eccentricity_floor: ECCENTRICITY_FLOOR,
        }
    }
}

/// Builder for [`PropagationParams`], with validation.
#[derive(Debug, Clone)]
pub struct PropagationParamsBuilder {
    params: PropagationParams,
}

impl Default for PropagationParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PropagationParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: PropagationParams::default(),
        }
    }

    pub fn kepler_tolerance(mut self, v: f64) -> Self {
        self.params.kepler_tolerance = v;
        self
    }
    pub fn kepler_max_iter(mut self, v: usize) -> Self {
        self.params.kepler_max_iter = v;
        self
    }
    pub fn eccentricity_floor(mut self, v: f64) -> Self {
        self.params.eccentricity_floor = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `kepler_tolerance > 0`
    /// * `kepler_max_iter ≥ 1`
    /// * `0 < eccentricity_floor < 1`
    ///
    /// NaN fails every rule.
    pub fn build(self) -> Result<PropagationParams, SgpropError> {
        let p = &self.params;

        if !Self::gt0(p.kepler_tolerance) {
            return Err(SgpropError::InvalidPropagationParameter(
                "kepler_tolerance must be > 0".into(),
            ));
        }
        if p.kepler_max_iter == 0 {
            return Err(SgpropError::InvalidPropagationParameter(
                "kepler_max_iter must be >= 1".into(),
            ));
        }
        if !Self::gt0(p.eccentricity_floor) || p.eccentricity_floor >= 1.0 {
            return Err(SgpropError::InvalidPropagationParameter(
                "require 0 < eccentricity_floor < 1".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for PropagationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Propagation Parameters")?;
            writeln!(f, "----------------------")?;
            writeln!(
                f,
                "  kepler_tolerance   = {:.3e}   # Convergence threshold of the Kepler solve",
                self.kepler_tolerance
            )?;
            writeln!(
                f,
                "  kepler_max_iter    = {:<9}   # Kepler iteration budget",
                self.kepler_max_iter
            )?;
            write!(
                f,
                "  eccentricity_floor = {:.3e}   # Lower bound on the decayed eccentricity",
                self.eccentricity_floor
            )
        } else {
            write!(
                f,
                "PropagationParams(kepler_tol={:.1e}, kepler_max_iter={}, e_floor={:.1e})",
                self.kepler_tolerance, self.kepler_max_iter, self.eccentricity_floor
            )
        }
    }
}

/// State of the satellite at `tsince` minutes from epoch.
///
/// Position and velocity are in the Earth-Centered Inertial frame of the element set (true
/// equator, mean equinox), in kilometres and kilometres per second. The osculating angles are in
/// radians.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelOutput {
    /// Minutes from epoch
    pub tsince: Minutes,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    /// Mean anomaly proxy in `[0, 2π)`
    pub phase: Radian,
    pub inclination: Radian,
    /// Right ascension of the ascending node in `[0, 2π)`
    pub ascending_node: Radian,
    pub argument_of_perigee: Radian,
    pub eccentricity: f64,
}

/// Propagation model of one element set, selected once at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum SatelliteModel {
    NearEarth(NearEarthParams),
    DeepSpace(DeepSpaceParams),
}

impl SatelliteModel {
    /// Classify the element set and build the matching model.
    pub fn new(elements: &OrbitalElements) -> Self {
        let base = SecularBase::new(elements);
        match OrbitClass::from_period_minutes(base.period_minutes()) {
            OrbitClass::NearEarth => SatelliteModel::NearEarth(NearEarthParams::from_base(base)),
            OrbitClass::DeepSpace => SatelliteModel::DeepSpace(DeepSpaceParams::new(base)),
        }
    }

    pub fn class(&self) -> OrbitClass {
        match self {
            SatelliteModel::NearEarth(_) => OrbitClass::NearEarth,
            SatelliteModel::DeepSpace(_) => OrbitClass::DeepSpace,
        }
    }

    /// Secular base shared by both models.
    pub fn base(&self) -> &SecularBase {
        match self {
            SatelliteModel::NearEarth(p) => p.base(),
            SatelliteModel::DeepSpace(p) => p.base(),
        }
    }

    /// Resonance class, [`ResonanceClass::None`] for a near-earth model.
    pub fn resonance(&self) -> ResonanceClass {
        match self {
            SatelliteModel::NearEarth(_) => ResonanceClass::None,
            SatelliteModel::DeepSpace(p) => p.resonance(),
        }
    }

    /// Evaluate the model at `tsince` minutes from epoch.
    pub fn predict(&self, tsince: Minutes, params: &PropagationParams) -> ModelOutput {
        match self {
            SatelliteModel::NearEarth(p) => p.predict(tsince, params),
            SatelliteModel::DeepSpace(p) => p.predict(tsince, params),
        }
    }
}

/// An initialized propagator for one element set.
///
/// The model and its configuration are fixed at construction. A new element set requires a new
/// propagator.
#[derive(Debug, Clone, PartialEq)]
pub struct Propagator {
    epoch: JulianDate,
    model: SatelliteModel,
    params: PropagationParams,
}

impl Propagator {
    /// Build a propagator with the default [`PropagationParams`].
    pub fn new(elements: &OrbitalElements) -> Self {
        Self::with_params(elements, PropagationParams::default())
    }

    /// Build a propagator with an explicit configuration.
    pub fn with_params(elements: &OrbitalElements, params: PropagationParams) -> Self {
        let model = SatelliteModel::new(elements);

        let simple = match &model {
            SatelliteModel::NearEarth(p) => p.is_simple(),
            SatelliteModel::DeepSpace(_) => false,
        };
        log::debug!(
            "satellite #{:05}: period {:.3} min, {} model, resonance {:?}, simple drag {}",
            elements.satellite_number(),
            model.base().period_minutes(),
            model.class(),
            model.resonance(),
            simple
        );

        Propagator {
            epoch: elements.epoch(),
            model,
            params,
        }
    }

    /// Position and velocity at `tsince` minutes from epoch (negative values go backward).
    pub fn predict(&self, tsince: Minutes) -> ModelOutput {
        self.model.predict(tsince, &self.params)
    }

    /// Position and velocity at the Julian date `jd`.
    pub fn predict_at_jd(&self, jd: JulianDate) -> ModelOutput {
        self.predict((jd - self.epoch) * MINUTES_PER_DAY)
    }

    pub fn class(&self) -> OrbitClass {
        self.model.class()
    }

    pub fn resonance(&self) -> ResonanceClass {
        self.model.resonance()
    }

    pub fn model(&self) -> &SatelliteModel {
        &self.model
    }

    pub fn params(&self) -> &PropagationParams {
        &self.params
    }
}

/// Propagate an element set to `tsince` minutes from its epoch.
///
/// Builds the model and evaluates it once. Prefer a [`Propagator`] when predicting the same
/// element set repeatedly.
pub fn propagate(elements: &OrbitalElements, tsince: Minutes) -> ModelOutput {
    Propagator::new(elements).predict(tsince)
}

#[cfg(test)]
mod propagation_test {
    use super::*;
    use crate::unit_test_global::ELEMENTS_MOLNIYA;

    #[test]
    fn test_params_builder_defaults() {
        let params = PropagationParams::builder().build().unwrap();
        assert_eq!(params, PropagationParams::default());
        assert_eq!(params.kepler_tolerance, 1e-6);
        assert_eq!(params.kepler_max_iter, 10);
        assert_eq!(params.eccentricity_floor, 1e-6);
    }

    #[test]
    fn test_params_builder_rejects_invalid_values() {
        let err = PropagationParams::builder()
            .kepler_tolerance(f64::NAN)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SgpropError::InvalidPropagationParameter("kepler_tolerance must be > 0".into())
        );

        assert!(PropagationParams::builder().kepler_max_iter(0).build().is_err());
        assert!(PropagationParams::builder().eccentricity_floor(0.0).build().is_err());
        assert!(PropagationParams::builder().eccentricity_floor(1.0).build().is_err());
        assert!(PropagationParams::builder()
            .eccentricity_floor(f64::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn test_params_display() {
        let params = PropagationParams::default();
        let plain = format!("{params}");
        assert!(plain.starts_with("PropagationParams("));
        assert!(!plain.contains('\n'));

        let pretty = format!("{params:#}");
        assert_eq!(pretty.lines().count(), 5);
        assert!(pretty.contains("kepler_max_iter    = 10"));
    }

    #[test]
    fn test_dispatch_on_period() {
        let propagator = Propagator::new(&ELEMENTS_MOLNIYA);
        assert_eq!(propagator.class(), OrbitClass::DeepSpace);
        assert_eq!(propagator.resonance(), ResonanceClass::HalfDay);
        assert!(matches!(propagator.model(), SatelliteModel::DeepSpace(_)));
    }

    #[test]
    fn test_predict_at_jd_matches_tsince() {
        let elements = &*ELEMENTS_MOLNIYA;
        let propagator = Propagator::new(elements);

        let at_jd = propagator.predict_at_jd(elements.epoch() + 0.5);
        let at_tsince = propagator.predict(720.0);
        assert!((at_jd.position - at_tsince.position).norm() < 1e-3);
        assert_eq!(propagate(elements, 720.0), at_tsince);
    }
}
