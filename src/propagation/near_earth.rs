//! # Near-earth model (SGP4)
//!
//! This module holds the pieces both members of the family share, plus the SGP4 drag model
//! itself:
//!
//! - [`SecularBase`] – Brouwer recovery, atmospheric drag coefficients and the secular rates of
//!   the mean anomaly, argument of perigee and node. SDP4 builds the same base before adding its
//!   deep-space terms.
//! - [`short_period_output`] – long-period periodics, Kepler solve, short-period corrections and
//!   rotation into the inertial frame, applied to a set of updated mean elements.
//! - [`NearEarthParams`] – SGP4 proper: the base plus the higher-order drag terms used when the
//!   perigee lies above 220 km.
//!
//! See also
//! --------
//! * [`crate::propagation::deep_space`] – SDP4, which feeds its corrected mean elements into
//!   [`short_period_output`].
use crate::constants::{
    Minutes, Radian, AE, CK2, CK4, DPI, EARTH_RADIUS_KM, J3, MINUTES_PER_DAY, QOMS2T,
    S_DENSITY, SECONDS_PER_DAY, SIMPLE_DRAG_PERIGEE_KM, TWO_THIRD, XKE,
};
use crate::kepler::{principal_angle, solve_kepler_long_period};
use crate::orbit_type::orbital_elements::OrbitalElements;
use crate::propagation::{ModelOutput, PropagationParams};
use crate::ref_system::{orbital_plane_to_eci, OsculatingPlane};

/// Below this eccentricity the `1/e` drag terms (C3, δM) are dropped.
const SMALL_ECCENTRICITY: f64 = 1.0E-4;

/// Floor on `1 + cos i` in the long-period coefficient.
///
/// Keeps the coefficient bounded, and continuous in `i`, within about 0.8° of a retrograde
/// equatorial plane.
const MIN_ONE_PLUS_COSIO: f64 = 1.0E-4;

/// Secular part of the model shared by SGP4 and SDP4.
///
/// Built once per element set and never mutated afterwards. Angles are in radians, lengths in
/// Earth radii and times in minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct SecularBase {
    // Epoch mean elements
    pub(crate) epoch: f64,
    pub(crate) xmo: Radian,
    pub(crate) xnodeo: Radian,
    pub(crate) omegao: Radian,
    pub(crate) xincl: Radian,
    pub(crate) eo: f64,
    pub(crate) bstar: f64,

    // Brouwer recovery and inclination functions
    pub(crate) aodp: f64,
    pub(crate) xnodp: f64,
    pub(crate) cosio: f64,
    pub(crate) sinio: f64,
    pub(crate) theta2: f64,
    pub(crate) x3thm1: f64,
    pub(crate) x1mth2: f64,
    pub(crate) x7thm1: f64,
    pub(crate) eosq: f64,
    pub(crate) betao: f64,
    pub(crate) betao2: f64,

    // Atmospheric drag
    pub(crate) s4: f64,
    pub(crate) tsi: f64,
    pub(crate) eta: f64,
    pub(crate) coef: f64,
    pub(crate) coef1: f64,
    pub(crate) c1: f64,
    pub(crate) c4: f64,
    pub(crate) xnodcf: f64,
    pub(crate) t2cof: f64,

    // Secular rates (radians/minute)
    pub(crate) xmdot: f64,
    pub(crate) omgdot: f64,
    pub(crate) xnodot: f64,

    // Long-period periodics
    pub(crate) a3ovk2: f64,
    pub(crate) xlcof: f64,
    pub(crate) aycof: f64,
}

impl SecularBase {
    /// Derive the secular drift and drag coefficients of an element set.
    pub(crate) fn new(elements: &OrbitalElements) -> Self {
        let mean = elements.brouwer_mean();
        let eo = elements.eccentricity();
        let xincl = elements.xincl();
        let omegao = elements.omegao();
        let bstar = elements.bstar() / AE;

        let aodp = mean.aodp;
        let xnodp = mean.xnodp;
        let cosio = mean.cosio;
        let theta2 = mean.theta2;
        let x3thm1 = mean.x3thm1;
        let betao = mean.betao;
        let betao2 = mean.betao2;

        // Perigees below 156 km use an altered density parameter
        let mut s4 = S_DENSITY;
        let mut qoms24 = QOMS2T;
        let perigee = (aodp * (1.0 - eo) - AE) * EARTH_RADIUS_KM;
        if perigee < 156.0 {
            s4 = if perigee <= 98.0 { 20.0 } else { perigee - 78.0 };
            qoms24 = ((120.0 - s4) * AE / EARTH_RADIUS_KM).powi(4);
            s4 = s4 / EARTH_RADIUS_KM + AE;
        }

        let pinvsq = 1.0 / (aodp * aodp * betao2 * betao2);
        let tsi = 1.0 / (aodp - s4);
        let eta = aodp * eo * tsi;
        let etasq = eta * eta;
        let eeta = eo * eta;
        let psisq = (1.0 - etasq).abs();
        let coef = qoms24 * tsi.powi(4);
        let coef1 = coef / psisq.powf(3.5);

        let c2 = coef1
            * xnodp
            * (aodp * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
                + 0.75 * CK2 * tsi / psisq * x3thm1 * (8.0 + 3.0 * etasq * (8.0 + etasq)));
        let c1 = bstar * c2;
        let sinio = xincl.sin();
        let a3ovk2 = -J3 / CK2 * AE.powi(3);
        let x1mth2 = 1.0 - theta2;

        let c4 = 2.0
            * xnodp
            * coef1
            * aodp
            * betao2
            * (eta * (2.0 + 0.5 * etasq) + eo * (0.5 + 2.0 * etasq)
                - 2.0 * CK2 * tsi / (aodp * psisq)
                    * (-3.0 * x3thm1 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                        + 0.75
                            * x1mth2
                            * (2.0 * etasq - eeta * (1.0 + etasq))
                            * (2.0 * omegao).cos()));

        let theta4 = theta2 * theta2;
        let temp1 = 3.0 * CK2 * pinvsq * xnodp;
        let temp2 = temp1 * CK2 * pinvsq;
        let temp3 = 1.25 * CK4 * pinvsq * pinvsq * xnodp;

        let xmdot = xnodp
            + 0.5 * temp1 * betao * x3thm1
            + 0.0625 * temp2 * betao * (13.0 - 78.0 * theta2 + 137.0 * theta4);
        let x1m5th = 1.0 - 5.0 * theta2;
        let omgdot = -0.5 * temp1 * x1m5th
            + 0.0625 * temp2 * (7.0 - 114.0 * theta2 + 395.0 * theta4)
            + temp3 * (3.0 - 36.0 * theta2 + 49.0 * theta4);
        let xhdot1 = -temp1 * cosio;
        let xnodot = xhdot1
            + (0.5 * temp2 * (4.0 - 19.0 * theta2) + 2.0 * temp3 * (3.0 - 7.0 * theta2)) * cosio;

        let one_plus_cosio = if (1.0 + cosio).abs() > MIN_ONE_PLUS_COSIO {
            1.0 + cosio
        } else {
            MIN_ONE_PLUS_COSIO
        };

        SecularBase {
            epoch: elements.epoch(),
            xmo: elements.xmo(),
            xnodeo: elements.xnodeo(),
            omegao,
            xincl,
            eo,
            bstar,
            aodp,
            xnodp,
            cosio,
            sinio,
            theta2,
            x3thm1,
            x1mth2,
            x7thm1: 7.0 * theta2 - 1.0,
            eosq: mean.eosq,
            betao,
            betao2,
            s4,
            tsi,
            eta,
            coef,
            coef1,
            c1,
            c4,
            xnodcf: 3.5 * betao2 * xhdot1 * c1,
            t2cof: 1.5 * c1,
            xmdot,
            omgdot,
            xnodot,
            a3ovk2,
            xlcof: 0.125 * a3ovk2 * sinio * (3.0 + 5.0 * cosio) / one_plus_cosio,
            aycof: 0.25 * a3ovk2 * sinio,
        }
    }

    /// Brouwer mean motion (radians/minute)
    pub fn mean_motion(&self) -> f64 {
        self.xnodp
    }

    /// Brouwer semi-major axis (Earth radii)
    pub fn semi_major_axis(&self) -> f64 {
        self.aodp
    }

    /// Secular rates `(dM/dt, dω/dt, dΩ/dt)` in radians/minute.
    pub fn secular_rates(&self) -> (f64, f64, f64) {
        (self.xmdot, self.omgdot, self.xnodot)
    }

    /// Anomalistic period in minutes.
    pub fn period_minutes(&self) -> Minutes {
        DPI / self.xnodp
    }
}

/// Mean elements at `tsince` after the secular (and, for SDP4, lunar-solar) updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MeanState {
    /// Semi-major axis (Earth radii)
    pub a: f64,
    pub e: f64,
    /// Mean longitude `M + ω + Ω`
    pub xl: Radian,
    /// Argument of perigee used by the long-period periodics
    pub omega: Radian,
    /// Argument of perigee reported in the output
    pub omgadf: Radian,
    pub xnode: Radian,
    pub xinc: Radian,
}

/// Long-period periodics, Kepler solve, short-period corrections and rotation to the inertial
/// frame.
///
/// Arguments
/// ---------
/// * `base`: secular base of the model
/// * `mean`: mean elements at `tsince`
/// * `tsince`: minutes from epoch, echoed in the output
/// * `params`: Kepler solver configuration
///
/// Return
/// ------
/// * the [`ModelOutput`] in kilometres and kilometres per second
pub(crate) fn short_period_output(
    base: &SecularBase,
    mean: &MeanState,
    tsince: Minutes,
    params: &PropagationParams,
) -> ModelOutput {
    let MeanState {
        a,
        e,
        xl,
        omega,
        omgadf,
        xnode,
        xinc,
    } = *mean;

    let beta = (1.0 - e * e).sqrt();
    let xn = XKE / a.powf(1.5);

    // Long period periodics
    let axn = e * omega.cos();
    let temp = 1.0 / (a * beta * beta);
    let xll = temp * base.xlcof * axn;
    let aynl = temp * base.aycof;
    let xlt = xl + xll;
    let ayn = e * omega.sin() + aynl;

    let capu = principal_angle(xlt - xnode);
    let kepler = solve_kepler_long_period(
        capu,
        axn,
        ayn,
        params.kepler_tolerance,
        params.kepler_max_iter,
    );

    // Short period preliminary quantities
    let elsq = axn * axn + ayn * ayn;
    let temp = 1.0 - elsq;
    let pl = a * temp;
    let r = a * (1.0 - kepler.ecose);
    let temp1 = 1.0 / r;
    let rdot = XKE * a.sqrt() * kepler.esine * temp1;
    let rfdot = XKE * pl.sqrt() * temp1;
    let temp2 = a * temp1;
    let betal = temp.sqrt();
    let temp3 = 1.0 / (1.0 + betal);
    let cosu = temp2 * (kepler.cos_epw - axn + ayn * kepler.esine * temp3);
    let sinu = temp2 * (kepler.sin_epw - ayn - axn * kepler.esine * temp3);
    let u = sinu.atan2(cosu);
    let sin2u = 2.0 * sinu * cosu;
    let cos2u = 2.0 * cosu * cosu - 1.0;
    let temp = 1.0 / pl;
    let temp1 = CK2 * temp;
    let temp2 = temp1 * temp;

    // Update for short periodics
    let plane = OsculatingPlane {
        rk: r * (1.0 - 1.5 * temp2 * betal * base.x3thm1) + 0.5 * temp1 * base.x1mth2 * cos2u,
        uk: u - 0.25 * temp2 * base.x7thm1 * sin2u,
        xnodek: xnode + 1.5 * temp2 * base.cosio * sin2u,
        xinck: xinc + 1.5 * temp2 * base.cosio * base.sinio * cos2u,
        rdotk: rdot - xn * temp1 * base.x1mth2 * sin2u,
        rfdotk: rfdot + xn * temp1 * (base.x1mth2 * cos2u + 1.5 * base.x3thm1),
    };
    let (position, velocity) = orbital_plane_to_eci(&plane);

    let mut phase = xlt - xnode - omgadf + DPI;
    if phase < 0.0 {
        phase += DPI;
    }

    ModelOutput {
        tsince,
        position: position * EARTH_RADIUS_KM,
        velocity: velocity * (EARTH_RADIUS_KM * MINUTES_PER_DAY / SECONDS_PER_DAY),
        phase: principal_angle(phase),
        inclination: plane.xinck,
        ascending_node: principal_angle(plane.xnodek),
        argument_of_perigee: omgadf,
        eccentricity: e,
    }
}

/// Higher-order drag terms, only used when the perigee lies above 220 km.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HigherOrderDrag {
    c5: f64,
    omgcof: f64,
    xmcof: f64,
    delmo: f64,
    sinmo: f64,
    d2: f64,
    d3: f64,
    d4: f64,
    t3cof: f64,
    t4cof: f64,
    t5cof: f64,
}

impl HigherOrderDrag {
    fn new(base: &SecularBase) -> Self {
        let SecularBase {
            aodp,
            xnodp,
            sinio,
            eo,
            eta,
            tsi,
            s4,
            coef,
            coef1,
            betao2,
            bstar,
            c1,
            a3ovk2,
            omegao,
            xmo,
            ..
        } = *base;

        let etasq = eta * eta;
        let eeta = eo * eta;

        let (c3, xmcof) = if eo > SMALL_ECCENTRICITY {
            (
                coef * tsi * a3ovk2 * xnodp * AE * sinio / eo,
                -TWO_THIRD * coef * bstar * AE / eeta,
            )
        } else {
            (0.0, 0.0)
        };

        let c1sq = c1 * c1;
        let d2 = 4.0 * aodp * tsi * c1sq;
        let temp = d2 * tsi * c1 / 3.0;
        let d3 = (17.0 * aodp + s4) * temp;
        let d4 = 0.5 * temp * aodp * tsi * (221.0 * aodp + 31.0 * s4) * c1;

        HigherOrderDrag {
            c5: 2.0 * coef1 * aodp * betao2 * (1.0 + 2.75 * (etasq + eeta) + eeta * etasq),
            omgcof: bstar * c3 * omegao.cos(),
            xmcof,
            delmo: (1.0 + eta * xmo.cos()).powi(3),
            sinmo: xmo.sin(),
            d2,
            d3,
            d4,
            t3cof: d2 + 2.0 * c1sq,
            t4cof: 0.25 * (3.0 * d3 + c1 * (12.0 * d2 + 10.0 * c1sq)),
            t5cof: 0.2 * (3.0 * d4 + 12.0 * c1 * d3 + 6.0 * d2 * d2 + 15.0 * c1sq * (2.0 * d2 + c1sq)),
        }
    }
}

/// SGP4 model parameters, immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct NearEarthParams {
    pub(crate) base: SecularBase,
    /// `None` when the perigee is below 220 km ("simple" drag model)
    pub(crate) drag: Option<HigherOrderDrag>,
}

impl NearEarthParams {
    pub(crate) fn from_base(base: SecularBase) -> Self {
        let simple = base.aodp * (1.0 - base.eo) / AE < SIMPLE_DRAG_PERIGEE_KM / EARTH_RADIUS_KM + AE;
        let drag = if simple {
            None
        } else {
            Some(HigherOrderDrag::new(&base))
        };

        NearEarthParams { base, drag }
    }

    /// Secular base shared with the deep-space model.
    pub fn base(&self) -> &SecularBase {
        &self.base
    }

    /// Whether the truncated drag model (perigee below 220 km) is in use.
    pub fn is_simple(&self) -> bool {
        self.drag.is_none()
    }

    /// Position and velocity at `tsince` minutes from epoch.
    ///
    /// The mean elements are advanced by the secular gravity and drag terms, the eccentricity is
    /// held at or above `params.eccentricity_floor`, and the result goes through
    /// [`short_period_output`].
    pub(crate) fn predict(&self, tsince: Minutes, params: &PropagationParams) -> ModelOutput {
        let base = &self.base;

        // Secular gravity and atmospheric drag
        let xmdf = base.xmo + base.xmdot * tsince;
        let omgadf = base.omegao + base.omgdot * tsince;
        let xnoddf = base.xnodeo + base.xnodot * tsince;
        let mut omega = omgadf;
        let mut xmp = xmdf;
        let tsq = tsince * tsince;
        let xnode = xnoddf + base.xnodcf * tsq;
        let mut tempa = 1.0 - base.c1 * tsince;
        let mut tempe = base.bstar * base.c4 * tsince;
        let mut templ = base.t2cof * tsq;

        if let Some(drag) = &self.drag {
            let delomg = drag.omgcof * tsince;
            let delm = drag.xmcof * ((1.0 + base.eta * xmdf.cos()).powi(3) - drag.delmo);
            let temp = delomg + delm;
            xmp = xmdf + temp;
            omega = omgadf - temp;
            let tcube = tsq * tsince;
            let tfour = tsince * tcube;
            tempa = tempa - drag.d2 * tsq - drag.d3 * tcube - drag.d4 * tfour;
            tempe += base.bstar * drag.c5 * (xmp.sin() - drag.sinmo);
            templ += drag.t3cof * tcube + tfour * (drag.t4cof + tsince * drag.t5cof);
        }

        let a = base.aodp * tempa * tempa;
        let e = (base.eo - tempe).max(params.eccentricity_floor);
        let xl = xmp + omega + xnode + base.xnodp * templ;

        let mean = MeanState {
            a,
            e,
            xl,
            omega,
            omgadf,
            xnode,
            xinc: base.xincl,
        };
        short_period_output(base, &mean, tsince, params)
    }
}

#[cfg(test)]
mod near_earth_test {
    use super::*;
    use crate::unit_test_global::{ELEMENTS_88888, ELEMENTS_ISS};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_simple_flag_follows_perigee() {
        let low = NearEarthParams::from_base(SecularBase::new(&ELEMENTS_88888));
        assert!(low.is_simple());

        let iss = NearEarthParams::from_base(SecularBase::new(&ELEMENTS_ISS));
        assert!(!iss.is_simple());
    }

    #[test]
    fn test_secular_rates_of_prograde_orbit() {
        // the node regresses on a prograde orbit
        let params = NearEarthParams::from_base(SecularBase::new(&ELEMENTS_ISS));
        let (xmdot, _omgdot, xnodot) = params.base().secular_rates();
        assert!(xnodot < 0.0);
        assert!(xmdot > 0.0);
        assert_relative_eq!(
            params.base().period_minutes(),
            ELEMENTS_ISS.period_minutes()
        );
    }

    #[test]
    fn test_epoch_state_88888() {
        let params = NearEarthParams::from_base(SecularBase::new(&ELEMENTS_88888));
        let out = params.predict(0.0, &PropagationParams::default());

        assert_abs_diff_eq!(out.position.x, 2328.9714339745, epsilon = 1e-3);
        assert_abs_diff_eq!(out.position.y, -5995.2227114824, epsilon = 1e-3);
        assert_abs_diff_eq!(out.position.z, 1719.9711949248, epsilon = 1e-3);
        assert_abs_diff_eq!(out.velocity.x, 2.912073166170, epsilon = 1e-6);
        assert_abs_diff_eq!(out.velocity.y, -0.983415617229, epsilon = 1e-6);
        assert_abs_diff_eq!(out.velocity.z, -7.090819193128, epsilon = 1e-6);
        assert!((0.0..DPI).contains(&out.phase));
    }

    #[test]
    fn test_circular_orbit_stays_finite_and_floored() {
        let circular = OrbitalElements::builder()
            .epoch(2457152.5)
            .inclination(51.6)
            .eccentricity(0.0)
            .mean_motion(15.5)
            .bstar(1e-4)
            .build()
            .unwrap();
        let params = NearEarthParams::from_base(SecularBase::new(&circular));
        assert!(!params.is_simple());

        for tsince in [-1440.0, 0.0, 1440.0] {
            let out = params.predict(tsince, &PropagationParams::default());
            assert!(out.eccentricity >= 1e-6);
            assert!(out.position.iter().all(|x| x.is_finite()));
            assert!(out.velocity.iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn test_retrograde_equatorial_guard() {
        let retro = OrbitalElements::builder()
            .epoch(2457152.5)
            .inclination(180.0)
            .eccentricity(0.001)
            .mean_motion(15.0)
            .build()
            .unwrap();
        let base = SecularBase::new(&retro);
        assert!(base.xlcof.is_finite());

        let tilted = OrbitalElements::builder()
            .epoch(2457152.5)
            .inclination(179.999)
            .eccentricity(0.001)
            .mean_motion(15.0)
            .build()
            .unwrap();
        let near = SecularBase::new(&tilted);
        assert!(near.xlcof.abs() < 1e-3, "xlcof = {}", near.xlcof);
        assert!((near.xlcof - base.xlcof).abs() < 1e-3);
    }
}
