//! # Kepler equation in the long-period form
//!
//! SGP4 and SDP4 solve Kepler's equation on the quantity `E + ω` using the long-period
//! eccentricity components `axn = e cos ω` and `ayn = e sin ω`:
//!
//! ```text
//! U = (E + ω) - axn·sin(E + ω) + ayn·cos(E + ω)
//! ```
//!
//! The solver is a bounded Newton–Raphson iteration. When the budget is exhausted it returns the
//! last iterate instead of failing.
use crate::constants::{Radian, DPI};

/// Reduce an angle to its principal value in `[0, 2π)`.
pub fn principal_angle(a: Radian) -> Radian {
    let r = a.rem_euclid(DPI);
    // rem_euclid rounds up to 2π for tiny negative inputs
    if r < DPI {
        r
    } else {
        0.0
    }
}

/// Result of [`solve_kepler_long_period`].
///
/// The trigonometric terms are evaluated at the final iterate and reused directly by the
/// short-period corrections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    /// Final iterate of `E + ω` (radians)
    pub eccentric_longitude: Radian,
    pub sin_epw: f64,
    pub cos_epw: f64,
    /// `axn·cos(E + ω) + ayn·sin(E + ω)`, i.e. `e·cos E`
    pub ecose: f64,
    /// `axn·sin(E + ω) - ayn·cos(E + ω)`, i.e. `e·sin E`
    pub esine: f64,
    /// Number of Newton steps performed
    pub iterations: usize,
    /// Whether the last step moved by less than the tolerance
    pub converged: bool,
}

/// Solve the long-period Kepler equation for `E + ω`.
///
/// Arguments
/// ---------
/// * `capu`: the right-hand side `U`, reduced to `[0, 2π)`
/// * `axn`, `ayn`: long-period eccentricity components
/// * `tolerance`: stop once a Newton step moves by at most this amount (radians)
/// * `max_iter`: iteration budget
///
/// Return
/// ------
/// * a [`KeplerSolution`]. On non-convergence the last iterate is returned with
///   `converged == false`.
pub fn solve_kepler_long_period(
    capu: Radian,
    axn: f64,
    ayn: f64,
    tolerance: f64,
    max_iter: usize,
) -> KeplerSolution {
    let mut epw = capu;
    let mut solution = KeplerSolution {
        eccentric_longitude: epw,
        sin_epw: epw.sin(),
        cos_epw: epw.cos(),
        ecose: 0.0,
        esine: 0.0,
        iterations: 0,
        converged: false,
    };

    for iteration in 1..=max_iter.max(1) {
        let (sin_epw, cos_epw) = epw.sin_cos();
        let temp3 = axn * sin_epw;
        let temp4 = ayn * cos_epw;
        let temp5 = axn * cos_epw;
        let temp6 = ayn * sin_epw;

        let next = (capu - temp4 + temp3 - epw) / (1.0 - temp5 - temp6) + epw;

        solution = KeplerSolution {
            eccentric_longitude: epw,
            sin_epw,
            cos_epw,
            ecose: temp5 + temp6,
            esine: temp3 - temp4,
            iterations: iteration,
            converged: (next - epw).abs() <= tolerance,
        };

        if solution.converged {
            break;
        }
        epw = next;
    }

    if !solution.converged {
        log::debug!(
            "Kepler iteration did not converge after {} steps (U = {capu}, axn = {axn}, ayn = {ayn})",
            solution.iterations
        );
    }

    solution
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn residual(capu: f64, axn: f64, ayn: f64, epw: f64) -> f64 {
        epw - axn * epw.sin() + ayn * epw.cos() - capu
    }

    #[test]
    fn test_principal_angle() {
        assert_abs_diff_eq!(principal_angle(-0.5), DPI - 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(principal_angle(DPI + 1.0), 1.0, epsilon = 1e-15);
        assert_eq!(principal_angle(0.0), 0.0);
        assert!(principal_angle(-1e-20) < DPI);
    }

    #[test]
    fn test_circular_orbit_is_identity() {
        let sol = solve_kepler_long_period(1.234, 0.0, 0.0, 1e-6, 10);
        assert!(sol.converged);
        assert_eq!(sol.eccentric_longitude, 1.234);
        assert_eq!(sol.ecose, 0.0);
        assert_eq!(sol.esine, 0.0);
    }

    #[test]
    fn test_converges_for_moderate_eccentricity() {
        let e: f64 = 0.3;
        let omega: f64 = 0.7;
        let (axn, ayn) = (e * omega.cos(), e * omega.sin());
        let capu = 2.1;

        let sol = solve_kepler_long_period(capu, axn, ayn, 1e-12, 50);
        assert!(sol.converged);
        assert_abs_diff_eq!(
            residual(capu, axn, ayn, sol.eccentric_longitude),
            0.0,
            epsilon = 1e-10
        );
        assert_abs_diff_eq!(
            sol.ecose * sol.ecose + sol.esine * sol.esine,
            e * e,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_exhausted_budget_returns_last_iterate() {
        let e: f64 = 0.95;
        let (axn, ayn) = (e, 0.0);

        let sol = solve_kepler_long_period(0.01, axn, ayn, 1e-15, 2);
        assert!(!sol.converged);
        assert_eq!(sol.iterations, 2);
        assert!(sol.eccentric_longitude.is_finite());
    }
}
