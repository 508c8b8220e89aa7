//! Lunar-solar perturbations of the mean elements.
//!
//! [`DeepSpaceFixed::new`] builds the lunar and solar terms once, at epoch. Each prediction then
//! runs two phases on a [`DeepSpaceScratch`] created for that call:
//!
//! 1. [`DeepSpaceFixed::apply_secular`] – linear lunar-solar drift of e, i, Ω, ω and M, plus the
//!    resonance integration when the orbit sits in a resonance band.
//! 2. [`DeepSpaceFixed::apply_periodic`] – lunar and solar periodics, evaluated at `tsince`.
use std::f64::consts::PI;

use super::resonance::{ResonanceClass, ResonanceInputs, ResonanceModel};
use super::{DeepSpaceScratch, C1L, C1SS, THDT, ZCOSGS, ZCOSIS, ZEL, ZES, ZNL, ZNS, ZSINGS, ZSINIS};
use crate::constants::{Minutes, Radian, DPI, JD_1950};
use crate::kepler::principal_angle;
use crate::propagation::near_earth::SecularBase;

/// Within this distance of an equatorial plane (3°) the lunar-solar node rate is dropped.
const NODE_SUPPRESSION_INCLINATION: Radian = 5.235_987_7E-2;

/// Within this distance of an equatorial plane the periodics are applied with the Lyddane
/// modification.
const LYDDANE_INCLINATION: Radian = 0.2;

/// `|sin i|` below which a division by `sin i` is taken as zero.
const SINIO_EPSILON: f64 = 1.5E-12;

/// True when `xincl` lies within `margin` of 0 or of π.
fn near_equatorial(xincl: Radian, margin: Radian) -> bool {
    xincl < margin || xincl > PI - margin
}

/// Periodic amplitudes of one perturbing body.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct LunarSolarTerms {
    e2: f64,
    e3: f64,
    i2: f64,
    i3: f64,
    l2: f64,
    l3: f64,
    l4: f64,
    gh2: f64,
    gh3: f64,
    gh4: f64,
    h2: f64,
    h3: f64,
}

/// Periodic contributions of one body at a given time.
#[derive(Debug, Clone, Copy, Default)]
struct Periodics {
    e: f64,
    i: f64,
    l: f64,
    gh: f64,
    h: f64,
}

impl std::ops::Add for Periodics {
    type Output = Periodics;

    fn add(self, rhs: Periodics) -> Periodics {
        Periodics {
            e: self.e + rhs.e,
            i: self.i + rhs.i,
            l: self.l + rhs.l,
            gh: self.gh + rhs.gh,
            h: self.h + rhs.h,
        }
    }
}

impl LunarSolarTerms {
    /// Evaluate the periodics of a body whose mean anomaly is `zm` and orbital eccentricity `ze`.
    fn periodics(&self, zm: Radian, ze: f64) -> Periodics {
        let zf = zm + 2.0 * ze * zm.sin();
        let sinzf = zf.sin();
        let f2 = 0.5 * sinzf * sinzf - 0.25;
        let f3 = -0.5 * sinzf * zf.cos();

        Periodics {
            e: self.e2 * f2 + self.e3 * f3,
            i: self.i2 * f2 + self.i3 * f3,
            l: self.l2 * f2 + self.l3 * f3 + self.l4 * sinzf,
            gh: self.gh2 * f2 + self.gh3 * f3 + self.gh4 * sinzf,
            h: self.h2 * f2 + self.h3 * f3,
        }
    }
}

/// Orientation and strength of a perturbing body.
struct ThirdBody {
    zcosg: f64,
    zsing: f64,
    zcosi: f64,
    zsini: f64,
    zcosh: f64,
    zsinh: f64,
    cc: f64,
    zn: f64,
    ze: f64,
}

/// Secular rates and periodic amplitudes contributed by one body.
struct BodyContribution {
    se: f64,
    si: f64,
    sl: f64,
    sgh: f64,
    sh: f64,
    terms: LunarSolarTerms,
}

fn body_contribution(base: &SecularBase, body: &ThirdBody) -> BodyContribution {
    let ThirdBody {
        zcosg,
        zsing,
        zcosi,
        zsini,
        zcosh,
        zsinh,
        cc,
        zn,
        ze,
    } = *body;
    let (cosio, sinio, eosq, betao, betao2) =
        (base.cosio, base.sinio, base.eosq, base.betao, base.betao2);
    let (sing, cosg) = base.omegao.sin_cos();

    let a1 = zcosg * zcosh + zsing * zcosi * zsinh;
    let a3 = -zsing * zcosh + zcosg * zcosi * zsinh;
    let a7 = -zcosg * zsinh + zsing * zcosi * zcosh;
    let a8 = zsing * zsini;
    let a9 = zsing * zsinh + zcosg * zcosi * zcosh;
    let a10 = zcosg * zsini;
    let a2 = cosio * a7 + sinio * a8;
    let a4 = cosio * a9 + sinio * a10;
    let a5 = -sinio * a7 + cosio * a8;
    let a6 = -sinio * a9 + cosio * a10;

    let x1 = a1 * cosg + a2 * sing;
    let x2 = a3 * cosg + a4 * sing;
    let x3 = -a1 * sing + a2 * cosg;
    let x4 = -a3 * sing + a4 * cosg;
    let x5 = a5 * sing;
    let x6 = a6 * sing;
    let x7 = a5 * cosg;
    let x8 = a6 * cosg;

    let z31 = 12.0 * x1 * x1 - 3.0 * x3 * x3;
    let z32 = 24.0 * x1 * x2 - 6.0 * x3 * x4;
    let z33 = 12.0 * x2 * x2 - 3.0 * x4 * x4;
    let z1 = 3.0 * (a1 * a1 + a2 * a2) + z31 * eosq;
    let z2 = 6.0 * (a1 * a3 + a2 * a4) + z32 * eosq;
    let z3 = 3.0 * (a3 * a3 + a4 * a4) + z33 * eosq;
    let z11 = -6.0 * a1 * a5 + eosq * (-24.0 * x1 * x7 - 6.0 * x3 * x5);
    let z12 = -6.0 * (a1 * a6 + a3 * a5)
        + eosq * (-24.0 * (x2 * x7 + x1 * x8) - 6.0 * (x3 * x6 + x4 * x5));
    let z13 = -6.0 * a3 * a6 + eosq * (-24.0 * x2 * x8 - 6.0 * x4 * x6);
    let z21 = 6.0 * a2 * a5 + eosq * (24.0 * x1 * x5 - 6.0 * x3 * x7);
    let z22 = 6.0 * (a4 * a5 + a2 * a6)
        + eosq * (24.0 * (x2 * x5 + x1 * x6) - 6.0 * (x4 * x7 + x3 * x8));
    let z23 = 6.0 * a4 * a6 + eosq * (24.0 * x2 * x6 - 6.0 * x4 * x8);
    let z1 = z1 + z1 + betao2 * z31;
    let z2 = z2 + z2 + betao2 * z32;
    let z3 = z3 + z3 + betao2 * z33;

    let s3 = cc / base.xnodp;
    let s2 = -0.5 * s3 / betao;
    let s4 = s3 * betao;
    let s1 = -15.0 * base.eo * s4;
    let s5 = x1 * x3 + x2 * x4;
    let s6 = x2 * x3 + x1 * x4;
    let s7 = x2 * x4 - x1 * x3;

    let sh = if near_equatorial(base.xincl, NODE_SUPPRESSION_INCLINATION) {
        0.0
    } else {
        -zn * s2 * (z21 + z23)
    };

    BodyContribution {
        se: s1 * zn * s5,
        si: s2 * zn * (z11 + z13),
        sl: -zn * s3 * (z1 + z3 - 14.0 - 6.0 * eosq),
        sgh: s4 * zn * (z31 + z33 - 6.0),
        sh,
        terms: LunarSolarTerms {
            e2: 2.0 * s1 * s6,
            e3: 2.0 * s1 * s7,
            i2: 2.0 * s2 * z12,
            i3: 2.0 * s2 * (z13 - z11),
            l2: -2.0 * s3 * z2,
            l3: -2.0 * s3 * (z3 - z1),
            l4: -2.0 * s3 * (-21.0 - 9.0 * eosq) * ze,
            gh2: 2.0 * s4 * z32,
            gh3: 2.0 * s4 * (z33 - z31),
            gh4: -18.0 * s4 * ze,
            h2: -2.0 * s2 * z22,
            h3: -2.0 * s2 * (z23 - z21),
        },
    }
}

/// `x / sin i`, taken as zero for an equatorial orbit, prograde or retrograde.
fn over_sinio(x: f64, sinio: f64) -> f64 {
    if sinio.abs() < SINIO_EPSILON {
        0.0
    } else {
        x / sinio
    }
}

/// Deep-space constants computed once at epoch and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepSpaceFixed {
    /// Greenwich sidereal angle at epoch
    pub(crate) thgr: Radian,
    /// Brouwer mean motion at epoch
    pub(crate) xnq: f64,
    /// Inclination at epoch
    pub(crate) xqncl: Radian,
    /// Argument of perigee at epoch
    pub(crate) omegaq: Radian,
    /// Lunar and solar mean anomalies at epoch
    pub(crate) zmol: Radian,
    pub(crate) zmos: Radian,

    // Lunar-solar secular rates (per minute)
    pub(crate) sse: f64,
    pub(crate) ssi: f64,
    pub(crate) ssl: f64,
    pub(crate) ssg: f64,
    pub(crate) ssh: f64,

    pub(crate) solar: LunarSolarTerms,
    pub(crate) lunar: LunarSolarTerms,
    pub(crate) resonance: Option<ResonanceModel>,
}

impl DeepSpaceFixed {
    /// Build the lunar-solar terms and, in a resonance band, the resonance constants.
    pub(crate) fn new(base: &SecularBase) -> Self {
        let ds50 = base.epoch - JD_1950;
        let thgr = principal_angle(6.300_388_098_7 * ds50 + 1.729_444_94);
        let (sinq, cosq) = base.xnodeo.sin_cos();

        // Lunar orbit at epoch
        let day = ds50 + 18_261.5;
        let xnodce = 4.523_602_0 - 9.242_202_9E-4 * day;
        let (stem, ctem) = xnodce.sin_cos();
        let zcosil = 0.913_751_64 - 0.035_680_96 * ctem;
        let zsinil = (1.0 - zcosil * zcosil).sqrt();
        let zsinhl = 0.089_683_511 * stem / zsinil;
        let zcoshl = (1.0 - zsinhl * zsinhl).sqrt();
        let c = 4.719_967_2 + 0.229_971_50 * day;
        let gam = 5.835_151_4 + 0.001_944_368_0 * day;
        let zmol = principal_angle(c - gam);
        let zx = 0.397_854_16 * stem / zsinil;
        let zy = zcoshl * ctem + 0.917_448_67 * zsinhl * stem;
        let zx = gam + zx.atan2(zy) - xnodce;
        let (zsingl, zcosgl) = zx.sin_cos();
        let zmos = principal_angle(6.256_583_7 + 0.017_201_977 * day);

        let solar = body_contribution(
            base,
            &ThirdBody {
                zcosg: ZCOSGS,
                zsing: ZSINGS,
                zcosi: ZCOSIS,
                zsini: ZSINIS,
                zcosh: cosq,
                zsinh: sinq,
                cc: C1SS,
                zn: ZNS,
                ze: ZES,
            },
        );
        let lunar = body_contribution(
            base,
            &ThirdBody {
                zcosg: zcosgl,
                zsing: zsingl,
                zcosi: zcosil,
                zsini: zsinil,
                zcosh: zcoshl * cosq + zsinhl * sinq,
                zsinh: sinq * zcoshl - cosq * zsinhl,
                cc: C1L,
                zn: ZNL,
                ze: ZEL,
            },
        );

        let solar_ssh = over_sinio(solar.sh, base.sinio);
        let lunar_ssh = over_sinio(lunar.sh, base.sinio);
        let sse = solar.se + lunar.se;
        let ssi = solar.si + lunar.si;
        let ssl = solar.sl + lunar.sl;
        let ssg = solar.sgh - base.cosio * solar_ssh + lunar.sgh - base.cosio * lunar_ssh;
        let ssh = solar_ssh + lunar_ssh;

        let resonance = ResonanceModel::new(&ResonanceInputs {
            xnq: base.xnodp,
            aqnv: 1.0 / base.aodp,
            eq: base.eo,
            eosq: base.eosq,
            cosio: base.cosio,
            sinio: base.sinio,
            theta2: base.theta2,
            xmao: base.xmo,
            xnodeo: base.xnodeo,
            omegao: base.omegao,
            thgr,
            xmdot: base.xmdot,
            omgdot: base.omgdot,
            xnodot: base.xnodot,
            ssl,
            ssg,
            ssh,
        });

        DeepSpaceFixed {
            thgr,
            xnq: base.xnodp,
            xqncl: base.xincl,
            omegaq: base.omegao,
            zmol,
            zmos,
            sse,
            ssi,
            ssl,
            ssg,
            ssh,
            solar: solar.terms,
            lunar: lunar.terms,
            resonance,
        }
    }

    /// Resonance class selected at init.
    pub fn resonance_class(&self) -> ResonanceClass {
        self.resonance
            .as_ref()
            .map_or(ResonanceClass::None, ResonanceModel::class)
    }

    /// Greenwich sidereal angle at epoch (radians).
    pub fn sidereal_angle_at_epoch(&self) -> Radian {
        self.thgr
    }

    /// Lunar-solar secular rates `(de, di, dM, dω, dΩ)` per minute.
    pub fn secular_rates(&self) -> (f64, f64, f64, f64, f64) {
        (self.sse, self.ssi, self.ssl, self.ssg, self.ssh)
    }

    /// Secular phase: lunar-solar drift and resonance integration up to `t`.
    ///
    /// On return the scratch holds the drifted eccentricity, inclination, node, perigee and mean
    /// anomaly, and the mean motion `xn` (integrated when resonant, Brouwer otherwise).
    pub(crate) fn apply_secular(&self, base: &SecularBase, t: Minutes, scratch: &mut DeepSpaceScratch) {
        scratch.xll += self.ssl * t;
        scratch.omgadf += self.ssg * t;
        scratch.xnode += self.ssh * t;
        scratch.em = base.eo + self.sse * t;
        scratch.xinc = base.xincl + self.ssi * t;

        // fold the inclination back into [0, π]
        if scratch.xinc < 0.0 || scratch.xinc > PI {
            scratch.xinc = if scratch.xinc < 0.0 {
                -scratch.xinc
            } else {
                DPI - scratch.xinc
            };
            scratch.xnode += PI;
            scratch.omgadf -= PI;
        }

        if let Some(resonance) = &self.resonance {
            let mut acc = resonance.accumulator_at_epoch(self.xnq);
            let (xn, xl) = resonance.integrate(&mut acc, t, self.omegaq, base.omgdot);
            scratch.xn = xn;

            let temp = -scratch.xnode + self.thgr + t * THDT;
            scratch.xll = match resonance.class() {
                ResonanceClass::Synchronous => xl - scratch.omgadf + temp,
                _ => xl + temp + temp,
            };
        }
    }

    /// Periodic phase: lunar and solar periodics at `t`.
    ///
    /// Applied directly to the elements when the epoch inclination is more than 0.2 rad away
    /// from 0 and π, and through the Lyddane modification otherwise.
    pub(crate) fn apply_periodic(&self, base: &SecularBase, t: Minutes, scratch: &mut DeepSpaceScratch) {
        let (sinis, cosis) = scratch.xinc.sin_cos();

        let solar = self.solar.periodics(self.zmos + ZNS * t, ZES);
        let lunar = self.lunar.periodics(self.zmol + ZNL * t, ZEL);
        let p = solar + lunar;

        scratch.xinc += p.i;
        scratch.em += p.e;

        if !near_equatorial(self.xqncl, LYDDANE_INCLINATION) {
            let ph = p.h / base.sinio;
            let pgh = p.gh - base.cosio * ph;
            scratch.omgadf += pgh;
            scratch.xnode += ph;
            scratch.xll += p.l;
        } else {
            let (sinok, cosok) = scratch.xnode.sin_cos();
            let alfdp = sinis * sinok + p.h * cosok + p.i * cosis * sinok;
            let betdp = sinis * cosok - p.h * sinok + p.i * cosis * cosok;

            let xnode = principal_angle(scratch.xnode);
            let xls = scratch.xll + scratch.omgadf + cosis * xnode + p.l + p.gh
                - p.i * xnode * sinis;

            let mut new_node = alfdp.atan2(betdp);
            if (xnode - new_node).abs() > PI {
                if new_node < xnode {
                    new_node += DPI;
                } else {
                    new_node -= DPI;
                }
            }

            scratch.xnode = new_node;
            scratch.xll += p.l;
            scratch.omgadf = xls - scratch.xll - scratch.xinc.cos() * new_node;
        }
    }
}

