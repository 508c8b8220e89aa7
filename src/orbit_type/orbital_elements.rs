use std::cmp::Ordering::{Equal, Greater};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    Degree, JulianDate, Kilometer, Minutes, Radian, AE, DPI, EARTH_RADIUS_KM,
    DECAY_MEAN_MOTION, GEOSYNCHRONOUS_ECCENTRICITY_THRESHOLD,
    GEOSYNCHRONOUS_INCLINATION_THRESHOLD_DEGREES,
    GEOSYNCHRONOUS_LOWER_MEAN_MOTION, GEOSYNCHRONOUS_UPPER_MEAN_MOTION, MINUTES_PER_DAY, RADEG,
    TWO_THIRD,
};
use crate::orbit_type::{BrouwerMean, OrbitClass};
use crate::sgprop_errors::SgpropError;
use crate::time::julian_from_timestamp_ms;

/// Mean orbital element set of one satellite, as distributed in two-line element sets.
///
/// Angles are stored in degrees, the unit of the source format, and converted to radians by the
/// propagator. Instances are immutable once built: every field is private, the only way in is
/// [`OrbitalElements::builder`] (or deserialization, which goes through the same validation), and
/// a new element set means a new value.
///
/// Invariants
/// ----------
/// * `0 ≤ eccentricity < 1`
/// * `0° ≤ inclination ≤ 180°`
/// * `mean_motion > 0` (revolutions/day)
/// * every floating-point field is finite
///
/// See also
/// --------
/// * [`OrbitalElementsBuilder::build`] – validation rules.
/// * [`crate::propagation::Propagator::new`] – builds the propagation model for these elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OrbitalElementsBuilder")]
pub struct OrbitalElements {
    satellite_number: u32,
    element_set_number: u32,
    ephemeris_type: u8,
    epoch: JulianDate,
    inclination: Degree,
    right_ascension: Degree,
    eccentricity: f64,
    argument_of_perigee: Degree,
    mean_anomaly: Degree,
    mean_motion: f64,
    mean_motion_dot: f64,
    mean_motion_ddot: f64,
    bstar: f64,
    revolutions_at_epoch: u32,
}

impl OrbitalElements {
    /// Create a new [`OrbitalElementsBuilder`] with every field zeroed.
    pub fn builder() -> OrbitalElementsBuilder {
        OrbitalElementsBuilder::new()
    }

    /// NORAD catalogue number
    pub fn satellite_number(&self) -> u32 {
        self.satellite_number
    }

    pub fn element_set_number(&self) -> u32 {
        self.element_set_number
    }

    pub fn ephemeris_type(&self) -> u8 {
        self.ephemeris_type
    }

    /// Epoch of the element set (Julian date, UTC)
    pub fn epoch(&self) -> JulianDate {
        self.epoch
    }

    pub fn inclination(&self) -> Degree {
        self.inclination
    }

    pub fn right_ascension(&self) -> Degree {
        self.right_ascension
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn argument_of_perigee(&self) -> Degree {
        self.argument_of_perigee
    }

    pub fn mean_anomaly(&self) -> Degree {
        self.mean_anomaly
    }

    /// Mean motion in revolutions/day
    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// First time derivative of the mean motion divided by two (rev/day²)
    pub fn mean_motion_dot(&self) -> f64 {
        self.mean_motion_dot
    }

    /// Second time derivative of the mean motion divided by six (rev/day³)
    pub fn mean_motion_ddot(&self) -> f64 {
        self.mean_motion_ddot
    }

    /// Drag term B* (inverse Earth radii)
    pub fn bstar(&self) -> f64 {
        self.bstar
    }

    /// Revolution number at epoch
    pub fn revolutions_at_epoch(&self) -> u32 {
        self.revolutions_at_epoch
    }

    /// Mean motion in radians/minute.
    pub(crate) fn xno(&self) -> f64 {
        self.mean_motion * DPI / MINUTES_PER_DAY
    }

    pub(crate) fn xincl(&self) -> Radian {
        self.inclination * RADEG
    }

    pub(crate) fn xnodeo(&self) -> Radian {
        self.right_ascension * RADEG
    }

    pub(crate) fn omegao(&self) -> Radian {
        self.argument_of_perigee * RADEG
    }

    pub(crate) fn xmo(&self) -> Radian {
        self.mean_anomaly * RADEG
    }

    pub(crate) fn brouwer_mean(&self) -> BrouwerMean {
        BrouwerMean::recover(self.xno(), self.eccentricity, self.xincl())
    }

    /// Anomalistic period in minutes, from the Brouwer-recovered mean motion.
    pub fn period_minutes(&self) -> Minutes {
        self.brouwer_mean().period_minutes()
    }

    /// Propagation model for these elements.
    ///
    /// See also
    /// --------
    /// * [`OrbitClass::from_period_minutes`] – the 225 minute rule.
    pub fn classify(&self) -> OrbitClass {
        OrbitClass::from_period_minutes(self.period_minutes())
    }

    /// Perigee height above the equatorial radius, from the Brouwer semi-major axis (km).
    pub fn perigee_km(&self) -> Kilometer {
        let mean = self.brouwer_mean();
        (mean.aodp * (1.0 - self.eccentricity) - AE) * EARTH_RADIUS_KM
    }

    /// Apogee height above the equatorial radius (km).
    ///
    /// Uses the Kepler semi-major axis `331.25·(1440/n)^(2/3)` km with `n` in revolutions/day.
    pub fn apogee_km(&self) -> Kilometer {
        let sma = 331.25 * ((MINUTES_PER_DAY / self.mean_motion).ln() * TWO_THIRD).exp();
        sma * (1.0 + self.eccentricity) - EARTH_RADIUS_KM
    }

    /// Whether the orbit is close to geosynchronous: about one revolution per day, low
    /// eccentricity and inclination below 70°.
    pub fn is_geosynchronous(&self) -> bool {
        (GEOSYNCHRONOUS_LOWER_MEAN_MOTION..=GEOSYNCHRONOUS_UPPER_MEAN_MOTION)
            .contains(&self.mean_motion)
            && self.eccentricity.abs() <= GEOSYNCHRONOUS_ECCENTRICITY_THRESHOLD
            && self.inclination.abs() <= GEOSYNCHRONOUS_INCLINATION_THRESHOLD_DEGREES
    }

    /// Whether a ground station at geodetic `latitude` (radians) can ever see the satellite.
    ///
    /// The orbit reaches latitudes up to its inclination (folded below 90° for retrograde
    /// orbits); from apogee the horizon extends a further `acos(R / (R + h))` of arc.
    pub fn aos_happens(&self, latitude: Radian) -> bool {
        let reach = if self.inclination >= 90.0 {
            180.0 - self.inclination
        } else {
            self.inclination
        };
        let horizon = (EARTH_RADIUS_KM / (self.apogee_km() + EARTH_RADIUS_KM)).acos();

        horizon + reach * RADEG > latitude.abs()
    }

    /// Orbit number at a Julian date.
    ///
    /// Counts whole revolutions from the mean anomaly at epoch, with the mean motion drifting by
    /// B* per day, and adds [`OrbitalElements::revolutions_at_epoch`].
    pub fn revolutions_at(&self, jd: JulianDate) -> i64 {
        let age = jd - self.epoch;
        let revs = (self.mean_motion + age * self.bstar) * age + self.mean_anomaly / 360.0;
        revs.floor() as i64 + i64::from(self.revolutions_at_epoch)
    }

    /// Whether the orbit has re-entered by a Julian date.
    ///
    /// The decay date extrapolates the first derivative of the mean motion until the mean motion
    /// reaches 16.666666 revolutions/day. Without a mean motion derivative no decay is predicted.
    pub fn is_decayed(&self, jd: JulianDate) -> bool {
        let days_to_decay =
            (DECAY_MEAN_MOTION - self.mean_motion) / (10.0 * self.mean_motion_dot.abs());
        self.epoch + days_to_decay < jd
    }

    /// Minutes elapsed from the element epoch to a Julian date (negative before the epoch).
    pub fn tsince_minutes(&self, jd: JulianDate) -> Minutes {
        (jd - self.epoch) * MINUTES_PER_DAY
    }

    /// Minutes elapsed from the element epoch to a Unix timestamp in milliseconds.
    pub fn tsince_from_timestamp_ms(&self, milliseconds: i64) -> Minutes {
        self.tsince_minutes(julian_from_timestamp_ms(milliseconds))
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Orbital elements of #{:05}", self.satellite_number)?;
            writeln!(f, "-----------------------------")?;
            writeln!(f, "  epoch (JD)          = {:.8}", self.epoch)?;
            writeln!(f, "  inclination         = {:.4}°", self.inclination)?;
            writeln!(f, "  right ascension     = {:.4}°", self.right_ascension)?;
            writeln!(f, "  eccentricity        = {:.7}", self.eccentricity)?;
            writeln!(f, "  argument of perigee = {:.4}°", self.argument_of_perigee)?;
            writeln!(f, "  mean anomaly        = {:.4}°", self.mean_anomaly)?;
            writeln!(f, "  mean motion         = {:.8} rev/day", self.mean_motion)?;
            writeln!(f, "  B*                  = {:.5e}", self.bstar)?;
            writeln!(f, "  element set         = {}", self.element_set_number)?;
            write!(f, "  revolution at epoch = {}", self.revolutions_at_epoch)
        } else {
            write!(
                f,
                "OrbitalElements(#{:05}, epoch={:.5}, i={:.4}°, Ω={:.4}°, e={:.7}, ω={:.4}°, M={:.4}°, n={:.8} rev/d, B*={:.4e})",
                self.satellite_number,
                self.epoch,
                self.inclination,
                self.right_ascension,
                self.eccentricity,
                self.argument_of_perigee,
                self.mean_anomaly,
                self.mean_motion,
                self.bstar,
            )
        }
    }
}

/// Builder for [`OrbitalElements`], with validation.
///
/// Also the serde representation of an element set: deserializing an [`OrbitalElements`] goes
/// through [`OrbitalElementsBuilder::build`], so a malformed set is rejected on load. Missing
/// fields default to zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitalElementsBuilder {
    satellite_number: u32,
    element_set_number: u32,
    ephemeris_type: u8,
    epoch: JulianDate,
    inclination: Degree,
    right_ascension: Degree,
    eccentricity: f64,
    argument_of_perigee: Degree,
    mean_anomaly: Degree,
    mean_motion: f64,
    mean_motion_dot: f64,
    mean_motion_ddot: f64,
    bstar: f64,
    revolutions_at_epoch: u32,
}

impl OrbitalElementsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn satellite_number(mut self, v: u32) -> Self {
        self.satellite_number = v;
        self
    }
    pub fn element_set_number(mut self, v: u32) -> Self {
        self.element_set_number = v;
        self
    }
    pub fn ephemeris_type(mut self, v: u8) -> Self {
        self.ephemeris_type = v;
        self
    }
    pub fn epoch(mut self, v: JulianDate) -> Self {
        self.epoch = v;
        self
    }
    pub fn inclination(mut self, v: Degree) -> Self {
        self.inclination = v;
        self
    }
    pub fn right_ascension(mut self, v: Degree) -> Self {
        self.right_ascension = v;
        self
    }
    pub fn eccentricity(mut self, v: f64) -> Self {
        self.eccentricity = v;
        self
    }
    pub fn argument_of_perigee(mut self, v: Degree) -> Self {
        self.argument_of_perigee = v;
        self
    }
    pub fn mean_anomaly(mut self, v: Degree) -> Self {
        self.mean_anomaly = v;
        self
    }
    pub fn mean_motion(mut self, v: f64) -> Self {
        self.mean_motion = v;
        self
    }
    pub fn mean_motion_dot(mut self, v: f64) -> Self {
        self.mean_motion_dot = v;
        self
    }
    pub fn mean_motion_ddot(mut self, v: f64) -> Self {
        self.mean_motion_ddot = v;
        self
    }
    pub fn bstar(mut self, v: f64) -> Self {
        self.bstar = v;
        self
    }
    pub fn revolutions_at_epoch(mut self, v: u32) -> Self {
        self.revolutions_at_epoch = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Finalize the builder and produce an [`OrbitalElements`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * every floating-point field is finite;
    /// * `0 ≤ eccentricity < 1` – the models are elliptic only;
    /// * `0 ≤ inclination ≤ 180` degrees;
    /// * `mean_motion > 0` revolutions/day.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(OrbitalElements)` if all values are valid.
    /// * `Err(SgpropError::InvalidOrbitalElements)` naming the first rule that failed.
    pub fn build(self) -> Result<OrbitalElements, SgpropError> {
        let fields = [
            ("epoch", self.epoch),
            ("inclination", self.inclination),
            ("right_ascension", self.right_ascension),
            ("eccentricity", self.eccentricity),
            ("argument_of_perigee", self.argument_of_perigee),
            ("mean_anomaly", self.mean_anomaly),
            ("mean_motion", self.mean_motion),
            ("mean_motion_dot", self.mean_motion_dot),
            ("mean_motion_ddot", self.mean_motion_ddot),
            ("bstar", self.bstar),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SgpropError::InvalidOrbitalElements(format!(
                "{name} must be finite"
            )));
        }

        if !Self::ge0(self.eccentricity) || self.eccentricity >= 1.0 {
            return Err(SgpropError::InvalidOrbitalElements(format!(
                "eccentricity must lie in [0, 1), got {}",
                self.eccentricity
            )));
        }
        if !Self::ge0(self.inclination) || self.inclination > 180.0 {
            return Err(SgpropError::InvalidOrbitalElements(format!(
                "inclination must lie in [0, 180] degrees, got {}",
                self.inclination
            )));
        }
        if !Self::gt0(self.mean_motion) {
            return Err(SgpropError::InvalidOrbitalElements(format!(
                "mean_motion must be > 0, got {}",
                self.mean_motion
            )));
        }

        Ok(OrbitalElements {
            satellite_number: self.satellite_number,
            element_set_number: self.element_set_number,
            ephemeris_type: self.ephemeris_type,
            epoch: self.epoch,
            inclination: self.inclination,
            right_ascension: self.right_ascension,
            eccentricity: self.eccentricity,
            argument_of_perigee: self.argument_of_perigee,
            mean_anomaly: self.mean_anomaly,
            mean_motion: self.mean_motion,
            mean_motion_dot: self.mean_motion_dot,
            mean_motion_ddot: self.mean_motion_ddot,
            bstar: self.bstar,
            revolutions_at_epoch: self.revolutions_at_epoch,
        })
    }
}

impl TryFrom<OrbitalElementsBuilder> for OrbitalElements {
    type Error = SgpropError;

    fn try_from(builder: OrbitalElementsBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}
