//! # Reference frame transformations
//!
//! - [`orbital_plane_to_eci`] rotates the osculating radius/argument of latitude pair produced by
//!   the short-period corrections into the Earth-Centered Inertial frame (true equator, mean
//!   equinox of the element set).
//! - [`eci_to_geodetic`] maps an inertial position onto the WGS-84 ellipsoid to get the
//!   sub-satellite point.
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{JulianDate, Kilometer, Radian, DPI, EARTH_FLATTENING, EARTH_RADIUS_KM};
use crate::kepler::principal_angle;
use crate::time::theta_g_jd;

/// Osculating in-plane quantities after the short-period corrections, in canonical units.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OsculatingPlane {
    /// Radius (Earth radii)
    pub rk: f64,
    /// Argument of latitude (radians)
    pub uk: Radian,
    /// Right ascension of the ascending node (radians)
    pub xnodek: Radian,
    /// Inclination (radians)
    pub xinck: Radian,
    /// Radial velocity (Earth radii/minute)
    pub rdotk: f64,
    /// Transverse velocity r·du/dt (Earth radii/minute)
    pub rfdotk: f64,
}

/// Rotate an osculating orbital-plane state into the inertial frame.
///
/// The unit vector `U` points towards the satellite and `V` is the in-plane direction 90° ahead
/// of it. Position is `rk·U` and velocity is `rdotk·U + rfdotk·V`.
///
/// Return
/// ------
/// * `(position, velocity)` in Earth radii and Earth radii per minute.
pub(crate) fn orbital_plane_to_eci(plane: &OsculatingPlane) -> (Vector3<f64>, Vector3<f64>) {
    let (sinuk, cosuk) = plane.uk.sin_cos();
    let (sinik, cosik) = plane.xinck.sin_cos();
    let (sinnok, cosnok) = plane.xnodek.sin_cos();

    let xmx = -sinnok * cosik;
    let xmy = cosnok * cosik;

    let u = Vector3::new(
        xmx * sinuk + cosnok * cosuk,
        xmy * sinuk + sinnok * cosuk,
        sinik * sinuk,
    );
    let v = Vector3::new(
        xmx * cosuk - cosnok * sinuk,
        xmy * cosuk - sinnok * sinuk,
        sinik * cosuk,
    );

    (plane.rk * u, plane.rdotk * u + plane.rfdotk * v)
}

/// Geodetic coordinates on the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    /// Geodetic latitude in `[-π/2, π/2]` (radians)
    pub latitude: Radian,
    /// East longitude in `(-π, π]` (radians)
    pub longitude: Radian,
    /// Height above the ellipsoid (km)
    pub altitude_km: Kilometer,
}

impl Geodetic {
    /// Diameter of the footprint (km): the ground circle from which the satellite is above the
    /// horizon, measured along the surface of a spherical Earth.
    ///
    /// Zero at or below the surface.
    pub fn footprint_km(&self) -> Kilometer {
        let altitude = self.altitude_km.max(0.0);
        2.0 * EARTH_RADIUS_KM * (EARTH_RADIUS_KM / (EARTH_RADIUS_KM + altitude)).acos()
    }
}

/// Sub-satellite point of an inertial position.
///
/// Longitude is measured from Greenwich using [`theta_g_jd`]. Latitude is found by fixed-point
/// iteration on the ellipsoid normal until it moves by less than 1e-10 rad (bounded to 50 steps).
///
/// Arguments
/// ---------
/// * `position`: ECI position (km), e.g. [`ModelOutput::position`](crate::propagation::ModelOutput::position)
/// * `jd`: Julian date of the position
///
/// Return
/// ------
/// * the [`Geodetic`] latitude, longitude and altitude
pub fn eci_to_geodetic(position: &Vector3<f64>, jd: JulianDate) -> Geodetic {
    const MAX_ITER: usize = 50;

    let theta = position.y.atan2(position.x);
    let mut longitude = principal_angle(theta - theta_g_jd(jd));
    if longitude > std::f64::consts::PI {
        longitude -= DPI;
    }

    let r = position.x.hypot(position.y);
    let e2 = EARTH_FLATTENING * (2.0 - EARTH_FLATTENING);

    let mut latitude = position.z.atan2(r);
    let mut c = 1.0;
    for _ in 0..MAX_ITER {
        let phi = latitude;
        let sin_phi = phi.sin();
        c = 1.0 / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        latitude = (position.z + EARTH_RADIUS_KM * c * e2 * sin_phi).atan2(r);
        if (latitude - phi).abs() < 1e-10 {
            break;
        }
    }

    Geodetic {
        latitude,
        longitude,
        altitude_km: r / latitude.cos() - EARTH_RADIUS_KM * c,
    }
}
