//! # Deep-space model (SDP4)
//!
//! Orbits with a period of 225 minutes or more are propagated with the near-earth secular base
//! augmented by lunar-solar perturbations and, in the 12 h and 24 h bands, Earth resonance terms.
//!
//! The state is split in two:
//!
//! - [`DeepSpaceFixed`] is built once at init and never mutated;
//! - [`DeepSpaceScratch`] is created at the start of every prediction, threaded through
//!   [`DeepSpaceFixed::apply_secular`] and [`DeepSpaceFixed::apply_periodic`], then dropped.
//!
//! No state survives from one prediction to the next, so a [`DeepSpaceParams`] may be shared
//! freely between threads.
use crate::constants::{Minutes, Radian, TWO_THIRD, XKE};
use crate::propagation::near_earth::{short_period_output, MeanState, SecularBase};
use crate::propagation::{ModelOutput, PropagationParams};

mod perturbations;
mod resonance;

pub use perturbations::DeepSpaceFixed;
pub use resonance::ResonanceClass;

// Solar perturbation constants
pub(crate) const ZNS: f64 = 1.194_59E-5;
pub(crate) const C1SS: f64 = 2.986_479_7E-6;
pub(crate) const ZES: f64 = 0.016_75;

// Lunar perturbation constants
pub(crate) const ZNL: f64 = 1.583_521_8E-4;
pub(crate) const C1L: f64 = 4.796_806_5E-7;
pub(crate) const ZEL: f64 = 0.054_90;

// Orientation of the ecliptic and of the solar perigee
pub(crate) const ZCOSIS: f64 = 0.917_448_67;
pub(crate) const ZSINIS: f64 = 0.397_854_16;
pub(crate) const ZSINGS: f64 = -0.980_884_58;
pub(crate) const ZCOSGS: f64 = 0.194_590_5;

/// Earth rotation rate (radians/minute)
pub(crate) const THDT: f64 = 4.375_269_1E-3;

/// Mean elements modified by the deep-space phases of a single prediction.
///
/// Created by [`DeepSpaceParams::predict`] for one call only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DeepSpaceScratch {
    /// Mean anomaly
    pub(crate) xll: Radian,
    pub(crate) omgadf: Radian,
    pub(crate) xnode: Radian,
    pub(crate) em: f64,
    pub(crate) xinc: Radian,
    /// Mean motion (radians/minute)
    pub(crate) xn: f64,
}

impl DeepSpaceScratch {
    fn new(base: &SecularBase, xmdf: Radian, omgadf: Radian, xnode: Radian) -> Self {
        DeepSpaceScratch {
            xll: xmdf,
            omgadf,
            xnode,
            em: base.eo,
            xinc: base.xincl,
            xn: base.xnodp,
        }
    }
}

/// SDP4 model parameters: the near-earth secular base plus the fixed deep-space state.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepSpaceParams {
    pub(crate) base: SecularBase,
    pub(crate) fixed: DeepSpaceFixed,
}

impl DeepSpaceParams {
    pub(crate) fn new(base: SecularBase) -> Self {
        let fixed = DeepSpaceFixed::new(&base);
        DeepSpaceParams { base, fixed }
    }

    pub fn base(&self) -> &SecularBase {
        &self.base
    }

    pub fn fixed(&self) -> &DeepSpaceFixed {
        &self.fixed
    }

    pub fn resonance(&self) -> ResonanceClass {
        self.fixed.resonance_class()
    }

    /// Position and velocity at `tsince` minutes from epoch.
    pub(crate) fn predict(&self, tsince: Minutes, params: &PropagationParams) -> ModelOutput {
        let base = &self.base;
        let fixed = &self.fixed;

        // Secular gravity and atmospheric drag
        let xmdf = base.xmo + base.xmdot * tsince;
        let omgadf = base.omegao + base.omgdot * tsince;
        let xnoddf = base.xnodeo + base.xnodot * tsince;
        let tsq = tsince * tsince;
        let xnode = xnoddf + base.xnodcf * tsq;
        let tempa = 1.0 - base.c1 * tsince;
        let tempe = base.bstar * base.c4 * tsince;
        let templ = base.t2cof * tsq;

        let mut scratch = DeepSpaceScratch::new(base, xmdf, omgadf, xnode);
        fixed.apply_secular(base, tsince, &mut scratch);

        let a = (XKE / scratch.xn).powf(TWO_THIRD) * tempa * tempa;
        scratch.em = (scratch.em - tempe).max(params.eccentricity_floor);
        scratch.xll += base.xnodp * templ;

        fixed.apply_periodic(base, tsince, &mut scratch);
        let e = scratch.em.max(params.eccentricity_floor);

        let mean = MeanState {
            a,
            e,
            xl: scratch.xll + scratch.omgadf + scratch.xnode,
            omega: scratch.omgadf,
            omgadf: scratch.omgadf,
            xnode: scratch.xnode,
            xinc: scratch.xinc,
        };
        short_period_output(base, &mean, tsince, params)
    }
}
