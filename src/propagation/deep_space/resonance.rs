//! # Earth-gravity resonance terms
//!
//! Orbits whose mean motion is commensurate with the Earth's rotation accumulate tesseral
//! harmonic effects that do not average out:
//!
//! - **synchronous** (≈ 1 rev/day) through the J22, J31 and J33 terms;
//! - **half-day** (≈ 2 rev/day, eccentric, e.g. Molniya) through ten J22–J54 terms.
//!
//! The resonant mean motion and longitude are integrated with a fixed ±720 minute step and a
//! second-order Taylor scheme. Integration always starts again at epoch. The accumulator is
//! therefore created per prediction and its cost grows linearly with `|tsince|`.
use serde::{Deserialize, Serialize};

use super::THDT;
use crate::constants::{Minutes, Radian};

const STEP: f64 = 720.0;
const STEP2: f64 = 259_200.0;

const Q22: f64 = 1.789_167_9E-6;
const Q31: f64 = 2.146_074_8E-6;
const Q33: f64 = 2.212_301_5E-7;

const G22: f64 = 5.768_639_6;
const G32: f64 = 0.952_408_98;
const G44: f64 = 1.801_499_8;
const G52: f64 = 1.050_833_0;
const G54: f64 = 4.410_889_8;

const ROOT22: f64 = 1.789_167_9E-6;
const ROOT32: f64 = 3.739_379_2E-7;
const ROOT44: f64 = 7.363_695_3E-9;
const ROOT52: f64 = 1.142_863_9E-7;
const ROOT54: f64 = 2.176_580_3E-9;

const FASX2: f64 = 0.131_309_08;
const FASX4: f64 = 2.884_319_8;
const FASX6: f64 = 0.374_480_87;

/// Synchronous band on the Brouwer mean motion (radians/minute), bounds excluded.
const SYNCHRONOUS_BAND: (f64, f64) = (0.003_490_658_5, 0.005_235_987_7);

/// Half-day band on the Brouwer mean motion (radians/minute), bounds included.
const HALF_DAY_BAND: (f64, f64) = (0.008_26, 0.009_24);

/// Minimum eccentricity for half-day resonance.
const HALF_DAY_MIN_ECCENTRICITY: f64 = 0.5;

/// Resonance class of a deep-space orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResonanceClass {
    None,
    HalfDay,
    Synchronous,
}

impl ResonanceClass {
    /// Select the resonance class from the Brouwer mean motion and eccentricity.
    pub fn from_mean_motion(xnq: f64, eccentricity: f64) -> Self {
        if xnq > SYNCHRONOUS_BAND.0 && xnq < SYNCHRONOUS_BAND.1 {
            ResonanceClass::Synchronous
        } else if (HALF_DAY_BAND.0..=HALF_DAY_BAND.1).contains(&xnq)
            && eccentricity >= HALF_DAY_MIN_ECCENTRICITY
        {
            ResonanceClass::HalfDay
        } else {
            ResonanceClass::None
        }
    }
}

/// Quantities of the mean orbit at epoch needed to build the resonance terms.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResonanceInputs {
    pub xnq: f64,
    pub aqnv: f64,
    pub eq: f64,
    pub eosq: f64,
    pub cosio: f64,
    pub sinio: f64,
    pub theta2: f64,
    pub xmao: Radian,
    pub xnodeo: Radian,
    pub omegao: Radian,
    pub thgr: Radian,
    pub xmdot: f64,
    pub omgdot: f64,
    pub xnodot: f64,
    pub ssl: f64,
    pub ssg: f64,
    pub ssh: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HalfDayTerms {
    d2201: f64,
    d2211: f64,
    d3210: f64,
    d3222: f64,
    d4410: f64,
    d4422: f64,
    d5220: f64,
    d5232: f64,
    d5421: f64,
    d5433: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SynchronousTerms {
    del1: f64,
    del2: f64,
    del3: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Harmonics {
    HalfDay(HalfDayTerms),
    Synchronous(SynchronousTerms),
}

/// Fixed resonance constants, built once at init.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResonanceModel {
    pub(crate) harmonics: Harmonics,
    /// Resonant longitude at epoch
    pub(crate) xlamo: Radian,
    /// Drift of the resonant longitude not carried by the integrated mean motion
    pub(crate) xfact: f64,
}

/// Integration state of the resonant mean motion and longitude.
///
/// Scratch for a single prediction: always created at epoch by
/// [`ResonanceModel::accumulator_at_epoch`] and dropped with the call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ResonanceAccumulator {
    pub atime: Minutes,
    pub xni: f64,
    pub xli: Radian,
}

impl ResonanceModel {
    /// Build the resonance constants, or `None` outside both resonance bands.
    pub(crate) fn new(inputs: &ResonanceInputs) -> Option<Self> {
        match ResonanceClass::from_mean_motion(inputs.xnq, inputs.eq) {
            ResonanceClass::None => None,
            ResonanceClass::HalfDay => Some(Self::half_day(inputs)),
            ResonanceClass::Synchronous => Some(Self::synchronous(inputs)),
        }
    }

    pub(crate) fn class(&self) -> ResonanceClass {
        match self.harmonics {
            Harmonics::HalfDay(_) => ResonanceClass::HalfDay,
            Harmonics::Synchronous(_) => ResonanceClass::Synchronous,
        }
    }

    fn half_day(p: &ResonanceInputs) -> Self {
        let eq = p.eq;
        let eosq = p.eosq;
        let eoc = eq * eosq;
        let (cosio, sinio, theta2) = (p.cosio, p.sinio, p.theta2);

        let g201 = -0.306 - (eq - 0.64) * 0.440;
        let (g211, g310, g322, g410, g422, g520);
        if eq <= 0.65 {
            g211 = 3.616 - 13.247 * eq + 16.290 * eosq;
            g310 = -19.302 + 117.390 * eq - 228.419 * eosq + 156.591 * eoc;
            g322 = -18.9068 + 109.7927 * eq - 214.6334 * eosq + 146.5816 * eoc;
            g410 = -41.122 + 242.694 * eq - 471.094 * eosq + 313.953 * eoc;
            g422 = -146.407 + 841.880 * eq - 1629.014 * eosq + 1083.435 * eoc;
            g520 = -532.114 + 3017.977 * eq - 5740.0 * eosq + 3708.276 * eoc;
        } else {
            g211 = -72.099 + 331.819 * eq - 508.738 * eosq + 266.724 * eoc;
            g310 = -346.844 + 1582.851 * eq - 2415.925 * eosq + 1246.113 * eoc;
            g322 = -342.585 + 1554.908 * eq - 2366.899 * eosq + 1215.972 * eoc;
            g410 = -1052.797 + 4758.686 * eq - 7193.992 * eosq + 3651.957 * eoc;
            g422 = -3581.69 + 16178.11 * eq - 24462.77 * eosq + 12422.52 * eoc;
            g520 = if eq <= 0.715 {
                1464.74 - 4664.75 * eq + 3763.64 * eosq
            } else {
                -5149.66 + 29936.92 * eq - 54087.36 * eosq + 31324.56 * eoc
            };
        }

        let (g533, g521, g532);
        if eq < 0.7 {
            g533 = -919.2277 + 4988.61 * eq - 9064.77 * eosq + 5542.21 * eoc;
            g521 = -822.71072 + 4568.6173 * eq - 8491.4146 * eosq + 5337.524 * eoc;
            g532 = -853.666 + 4690.25 * eq - 8624.77 * eosq + 5341.4 * eoc;
        } else {
            g533 = -37995.78 + 161616.52 * eq - 229838.2 * eosq + 109377.94 * eoc;
            g521 = -51752.104 + 218913.95 * eq - 309468.16 * eosq + 146349.42 * eoc;
            g532 = -40023.88 + 170470.89 * eq - 242699.48 * eosq + 115605.82 * eoc;
        }

        let sini2 = sinio * sinio;
        let f220 = 0.75 * (1.0 + 2.0 * cosio + theta2);
        let f221 = 1.5 * sini2;
        let f321 = 1.875 * sinio * (1.0 - 2.0 * cosio - 3.0 * theta2);
        let f322 = -1.875 * sinio * (1.0 + 2.0 * cosio - 3.0 * theta2);
        let f441 = 35.0 * sini2 * f220;
        let f442 = 39.3750 * sini2 * sini2;
        let f522 = 9.84375
            * sinio
            * (sini2 * (1.0 - 2.0 * cosio - 5.0 * theta2)
                + 0.33333333 * (-2.0 + 4.0 * cosio + 6.0 * theta2));
        let f523 = sinio
            * (4.92187512 * sini2 * (-2.0 - 4.0 * cosio + 10.0 * theta2)
                + 6.56250012 * (1.0 + 2.0 * cosio - 3.0 * theta2));
        let f542 = 29.53125
            * sinio
            * (2.0 - 8.0 * cosio + theta2 * (-12.0 + 8.0 * cosio + 10.0 * theta2));
        let f543 = 29.53125
            * sinio
            * (-2.0 - 8.0 * cosio + theta2 * (12.0 + 8.0 * cosio - 10.0 * theta2));

        let xno2 = p.xnq * p.xnq;
        let ainv2 = p.aqnv * p.aqnv;
        let mut temp1 = 3.0 * xno2 * ainv2;
        let mut temp = temp1 * ROOT22;
        let d2201 = temp * f220 * g201;
        let d2211 = temp * f221 * g211;
        temp1 *= p.aqnv;
        temp = temp1 * ROOT32;
        let d3210 = temp * f321 * g310;
        let d3222 = temp * f322 * g322;
        temp1 *= p.aqnv;
        temp = 2.0 * temp1 * ROOT44;
        let d4410 = temp * f441 * g410;
        let d4422 = temp * f442 * g422;
        temp1 *= p.aqnv;
        temp = temp1 * ROOT52;
        let d5220 = temp * f522 * g520;
        let d5232 = temp * f523 * g532;
        temp = 2.0 * temp1 * ROOT54;
        let d5421 = temp * f542 * g521;
        let d5433 = temp * f543 * g533;

        let xlamo = p.xmao + p.xnodeo + p.xnodeo - p.thgr - p.thgr;
        let bfact = p.xmdot + p.xnodot + p.xnodot - THDT - THDT;
        let bfact = bfact + p.ssl + p.ssh + p.ssh;

        ResonanceModel {
            harmonics: Harmonics::HalfDay(HalfDayTerms {
                d2201,
                d2211,
                d3210,
                d3222,
                d4410,
                d4422,
                d5220,
                d5232,
                d5421,
                d5433,
            }),
            xlamo,
            xfact: bfact - p.xnq,
        }
    }

    fn synchronous(p: &ResonanceInputs) -> Self {
        let (cosio, sinio, eosq) = (p.cosio, p.sinio, p.eosq);

        let g200 = 1.0 + eosq * (-2.5 + 0.8125 * eosq);
        let g310 = 1.0 + 2.0 * eosq;
        let g300 = 1.0 + eosq * (-6.0 + 6.60937 * eosq);
        let f220 = 0.75 * (1.0 + cosio) * (1.0 + cosio);
        let f311 = 0.9375 * sinio * sinio * (1.0 + 3.0 * cosio) - 0.75 * (1.0 + cosio);
        let f330 = 1.0 + cosio;
        let f330 = 1.875 * f330 * f330 * f330;

        let del1 = 3.0 * p.xnq * p.xnq * p.aqnv * p.aqnv;
        let del2 = 2.0 * del1 * f220 * g200 * Q22;
        let del3 = 3.0 * del1 * f330 * g300 * Q33 * p.aqnv;
        let del1 = del1 * f311 * g310 * Q31 * p.aqnv;

        let xlamo = p.xmao + p.xnodeo + p.omegao - p.thgr;
        let bfact = p.xmdot + (p.omgdot + p.xnodot) - THDT;
        let bfact = bfact + p.ssl + p.ssg + p.ssh;

        ResonanceModel {
            harmonics: Harmonics::Synchronous(SynchronousTerms { del1, del2, del3 }),
            xlamo,
            xfact: bfact - p.xnq,
        }
    }

    /// Fresh integration state at epoch.
    pub(crate) fn accumulator_at_epoch(&self, xnq: f64) -> ResonanceAccumulator {
        ResonanceAccumulator {
            atime: 0.0,
            xni: xnq,
            xli: self.xlamo,
        }
    }

    /// First and second derivatives of the resonant mean motion at `xli`, `atime`.
    fn derivatives(&self, xli: Radian, atime: Minutes, omegaq: Radian, omgdot: f64) -> (f64, f64) {
        match &self.harmonics {
            Harmonics::Synchronous(s) => {
                let xndot = s.del1 * (xli - FASX2).sin()
                    + s.del2 * (2.0 * (xli - FASX4)).sin()
                    + s.del3 * (3.0 * (xli - FASX6)).sin();
                let xnddt = s.del1 * (xli - FASX2).cos()
                    + 2.0 * s.del2 * (2.0 * (xli - FASX4)).cos()
                    + 3.0 * s.del3 * (3.0 * (xli - FASX6)).cos();
                (xndot, xnddt)
            }
            Harmonics::HalfDay(h) => {
                let xomi = omegaq + omgdot * atime;
                let x2omi = xomi + xomi;
                let x2li = xli + xli;
                let xndot = h.d2201 * (x2omi + xli - G22).sin()
                    + h.d2211 * (xli - G22).sin()
                    + h.d3210 * (xomi + xli - G32).sin()
                    + h.d3222 * (-xomi + xli - G32).sin()
                    + h.d4410 * (x2omi + x2li - G44).sin()
                    + h.d4422 * (x2li - G44).sin()
                    + h.d5220 * (xomi + xli - G52).sin()
                    + h.d5232 * (-xomi + xli - G52).sin()
                    + h.d5421 * (xomi + x2li - G54).sin()
                    + h.d5433 * (-xomi + x2li - G54).sin();
                let xnddt = h.d2201 * (x2omi + xli - G22).cos()
                    + h.d2211 * (xli - G22).cos()
                    + h.d3210 * (xomi + xli - G32).cos()
                    + h.d3222 * (-xomi + xli - G32).cos()
                    + h.d5220 * (xomi + xli - G52).cos()
                    + h.d5232 * (-xomi + xli - G52).cos()
                    + 2.0
                        * (h.d4410 * (x2omi + x2li - G44).cos()
                            + h.d4422 * (x2li - G44).cos()
                            + h.d5421 * (xomi + x2li - G54).cos()
                            + h.d5433 * (-xomi + x2li - G54).cos());
                (xndot, xnddt)
            }
        }
    }

    /// Integrate the resonant mean motion and longitude from the accumulator state to `tsince`.
    ///
    /// Whole steps of ±720 minutes are taken while `tsince` is at least one step away, then the
    /// remainder `ft` is covered by a second-order Taylor expansion. The accumulator is advanced
    /// in place. A non-finite `tsince` yields `(NaN, NaN)` without stepping.
    ///
    /// Return
    /// ------
    /// * `(xn, xl)`: resonant mean motion (radians/minute) and longitude at `tsince`
    pub(crate) fn integrate(
        &self,
        acc: &mut ResonanceAccumulator,
        tsince: Minutes,
        omegaq: Radian,
        omgdot: f64,
    ) -> (f64, Radian) {
        if !tsince.is_finite() {
            log::warn!("resonance integration skipped for non-finite tsince = {tsince}");
            return (f64::NAN, f64::NAN);
        }

        let delt = if tsince >= 0.0 { STEP } else { -STEP };
        let mut steps = 0usize;

        let (ft, xndot, xnddt, xldot) = loop {
            let stepping = (tsince - acc.atime).abs() >= STEP;
            let (xndot, xnddt) = self.derivatives(acc.xli, acc.atime, omegaq, omgdot);
            let xldot = acc.xni + self.xfact;
            let xnddt = xnddt * xldot;

            if !stepping {
                break (tsince - acc.atime, xndot, xnddt, xldot);
            }

            acc.xli += xldot * delt + xndot * STEP2;
            acc.xni += xndot * delt + xnddt * STEP2;
            acc.atime += delt;
            steps += 1;
        };

        log::trace!("resonance integration reached tsince = {tsince} in {steps} steps");

        let xn = acc.xni + xndot * ft + xnddt * ft * ft * 0.5;
        let xl = acc.xli + xldot * ft + xndot * ft * ft * 0.5;
        (xn, xl)
    }
}

#[cfg(test)]
mod resonance_test {
    use super::*;

    #[test]
    fn test_resonance_bands() {
        // GEO, ~1 rev/day
        assert_eq!(
            ResonanceClass::from_mean_motion(0.004375, 0.0),
            ResonanceClass::Synchronous
        );
        // Molniya, ~2 rev/day, eccentric
        assert_eq!(
            ResonanceClass::from_mean_motion(0.00875, 0.69),
            ResonanceClass::HalfDay
        );
        // same period, nearly circular
        assert_eq!(
            ResonanceClass::from_mean_motion(0.00875, 0.1),
            ResonanceClass::None
        );
        // bounds
        assert_eq!(
            ResonanceClass::from_mean_motion(0.0034906585, 0.0),
            ResonanceClass::None
        );
        assert_eq!(
            ResonanceClass::from_mean_motion(0.00826, 0.5),
            ResonanceClass::HalfDay
        );
        assert_eq!(
            ResonanceClass::from_mean_motion(0.00997, 0.73),
            ResonanceClass::None
        );
    }

    fn synchronous_model() -> ResonanceModel {
        ResonanceModel::new(&ResonanceInputs {
            xnq: 0.004375,
            aqnv: 1.0 / 6.6107,
            eq: 0.0001,
            eosq: 1e-8,
            cosio: 1.0,
            sinio: 0.0,
            theta2: 1.0,
            xmao: 1.0,
            xnodeo: 0.5,
            omegao: 0.2,
            thgr: 3.0,
            xmdot: 0.004375,
            omgdot: 1e-7,
            xnodot: -1e-7,
            ssl: 0.0,
            ssg: 0.0,
            ssh: 0.0,
        })
        .unwrap()
    }

    #[test]
    fn test_accumulator_always_starts_at_epoch() {
        let model = synchronous_model();
        assert_eq!(model.class(), ResonanceClass::Synchronous);

        let mut first = model.accumulator_at_epoch(0.004375);
        let forward = model.integrate(&mut first, 10_000.0, 0.2, 1e-7);
        assert_eq!(first.atime, 13.0 * 720.0);

        let mut second = model.accumulator_at_epoch(0.004375);
        assert_eq!(second.atime, 0.0);
        assert_eq!(second.xli, model.xlamo);
        let again = model.integrate(&mut second, 10_000.0, 0.2, 1e-7);
        assert_eq!(forward, again);
    }

    #[test]
    fn test_non_finite_tsince_does_not_step() {
        let model = synchronous_model();
        for tsince in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let mut acc = model.accumulator_at_epoch(0.004375);
            let (xn, xl) = model.integrate(&mut acc, tsince, 0.2, 1e-7);

            assert!(xn.is_nan());
            assert!(xl.is_nan());
            assert_eq!(acc.atime, 0.0);
        }
    }

    #[test]
    fn test_backward_integration_steps_backward() {
        let model = synchronous_model();
        let mut acc = model.accumulator_at_epoch(0.004375);
        model.integrate(&mut acc, -1500.0, 0.2, 1e-7);
        assert_eq!(acc.atime, -1440.0);

        let mut acc = model.accumulator_at_epoch(0.004375);
        model.integrate(&mut acc, 719.0, 0.2, 1e-7);
        assert_eq!(acc.atime, 0.0);
    }
}
