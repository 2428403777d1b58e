//! Anomaly conversions and Kepler's equation for elliptic orbits.
//!
//! All angles are in radians. Eccentricity is assumed to be already
//! validated (`0 <= e < 1`) by the caller; see
//! [`crate::elements::check_kep_validity`].
//!
//! Two solvers are provided for `M = E - e sin(E)`:
//! - [`eccentric_from_mean`]: third-order starter followed by exactly two
//!   Halley corrections. Fixed cost, no failure mode.
//! - [`eccentric_from_mean_newton`]: Newton-Raphson bounded by a
//!   [`SolverConfig`], reports [`Error::NumericNonConvergence`] instead of
//!   looping forever.

use serde::{Deserialize, Serialize};

use crate::angles::normalize_angle_upper_pm;
use crate::constants::{NEAR_PARABOLIC_ECC, PI};
use crate::error::{fail, Error, Result};

/// Stopping rule for the iterative Newton-Raphson solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Step size below which the iteration is considered converged,
    /// scaled by `1 + |E|`.
    pub tolerance: f64,
    /// Hard cap on the number of Newton steps.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: 1e-14,
            max_iterations: 50,
        }
    }
}

impl SolverConfig {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        SolverConfig {
            tolerance,
            max_iterations,
        }
    }
}

/// Mean anomaly from eccentric anomaly (Kepler's equation).
pub fn mean_from_eccentric(e: f64, ecc_anomaly: f64) -> f64 {
    ecc_anomaly - e * ecc_anomaly.sin()
}

/// `β = e / (1 + sqrt(1 - e²))`, the half-angle substitution parameter.
fn beta(e: f64) -> f64 {
    e / (1.0 + (1.0 - e * e).sqrt())
}

/// Eccentric anomaly from true anomaly.
///
/// The true anomaly is first reduced to (-π, π], so the result lies in the
/// same interval.
pub fn eccentric_from_true(e: f64, true_anomaly: f64) -> f64 {
    let nu = normalize_angle_upper_pm(true_anomaly);
    let b = beta(e);
    nu - 2.0 * (b * nu.sin()).atan2(1.0 + b * nu.cos())
}

/// True anomaly from eccentric anomaly.
///
/// No reduction is applied: the result follows the revolution of the input.
pub fn true_from_eccentric(e: f64, ecc_anomaly: f64) -> f64 {
    let b = beta(e);
    ecc_anomaly + 2.0 * (b * ecc_anomaly.sin()).atan2(1.0 - b * ecc_anomaly.cos())
}

/// Mean anomaly from true anomaly, in (-π, π].
pub fn mean_from_true(e: f64, true_anomaly: f64) -> f64 {
    mean_from_eccentric(e, eccentric_from_true(e, true_anomaly))
}

/// True anomaly from mean anomaly.
pub fn true_from_mean(e: f64, mean_anomaly: f64) -> f64 {
    true_from_eccentric(e, eccentric_from_mean(e, mean_anomaly))
}

/// Odell & Gooding (1986) third-order starter on the reduced mean anomaly.
fn initial_guess(e: f64, reduced_m: f64) -> f64 {
    let k1 = 3.0 * PI + 2.0;
    let k2 = PI - 1.0;
    let k3 = 6.0 * PI - 1.0;
    let a = 3.0 * k2 * k2 / k1;
    let b = k3 * k3 / (6.0 * k1);

    if reduced_m.abs() < 1.0 / 6.0 {
        reduced_m + e * ((6.0 * reduced_m).cbrt() - reduced_m)
    } else if reduced_m < 0.0 {
        let w = PI + reduced_m;
        reduced_m + e * (a * w / (b - w) - PI - reduced_m)
    } else {
        let w = PI - reduced_m;
        reduced_m + e * (PI - a * w / (b - w) - reduced_m)
    }
}

/// `E - e sin(E)` without the cancellation of the direct form near E = 0.
///
/// Writes the residual as `(1 - e) sin(E) + (E - sin(E))` and sums the
/// series of `E - sin(E)` until it stops changing the result.
fn e_minus_e_sin_e(e: f64, ecc_anomaly: f64) -> f64 {
    const MAX_TERMS: usize = 30;

    let mut x = (1.0 - e) * ecc_anomaly.sin();
    let minus_e2 = -ecc_anomaly * ecc_anomaly;
    let mut term = ecc_anomaly;
    let mut d = 0.0;
    for _ in 0..MAX_TERMS {
        d += 2.0;
        term *= minus_e2 / (d * (d + 1.0));
        let previous = x;
        x -= term;
        if x == previous {
            break;
        }
    }
    x
}

/// Eccentric anomaly from mean anomaly (Halley, two fixed corrections).
///
/// The mean anomaly is reduced to (-π, π] for the solve and the removed
/// multiple of 2π is added back, so `mean_from_eccentric` of the result
/// recovers the input exactly up to rounding.
///
/// Accuracy degrades as `e` approaches 1; no near-parabolic branch exists.
pub fn eccentric_from_mean(e: f64, mean_anomaly: f64) -> f64 {
    if e > NEAR_PARABOLIC_ECC {
        log::warn!("Kepler solver called with near-parabolic eccentricity {e}; accuracy is reduced");
    }

    let reduced_m = normalize_angle_upper_pm(mean_anomaly);
    let mut ea = initial_guess(e, reduced_m);

    let no_cancellation_risk = (1.0 - e + ea * ea / 6.0) >= 0.1;

    for _ in 0..2 {
        let fdd = e * ea.sin();
        let fddd = e * ea.cos();

        let (f, mut fd) = if no_cancellation_risk {
            (ea - fdd - reduced_m, 1.0 - fddd)
        } else {
            let half_sin = (0.5 * ea).sin();
            (
                e_minus_e_sin_e(e, ea) - reduced_m,
                1.0 - e + 2.0 * e * half_sin * half_sin,
            )
        };

        let dee = f * fd / (0.5 * f * fdd - fd * fd);

        // Third-order update through the intermediate w
        let w = fd + 0.5 * dee * (fdd + dee * fddd / 3.0);
        fd += dee * (fdd + 0.5 * dee * fddd);
        ea -= (f - dee * (fd - w)) / fd;
    }

    ea + (mean_anomaly - reduced_m)
}

/// Eccentric anomaly from mean anomaly (Newton-Raphson).
///
/// Starts from `M` (or `±π` when `e >= 0.8`) on the reduced anomaly and
/// stops when a step falls below `config.tolerance * (1 + |E|)`.
pub fn eccentric_from_mean_newton(e: f64, mean_anomaly: f64, config: &SolverConfig) -> Result<f64> {
    let reduced_m = normalize_angle_upper_pm(mean_anomaly);
    let mut ea = if e < 0.8 { reduced_m } else { PI.copysign(reduced_m) };

    let mut step = f64::INFINITY;
    for iteration in 1..=config.max_iterations {
        let f = ea - e * ea.sin() - reduced_m;
        let fp = 1.0 - e * ea.cos();
        step = f / fp;
        ea -= step;
        if step.abs() <= config.tolerance * (1.0 + ea.abs()) {
            log::debug!("Newton-Raphson converged in {iteration} iterations (e={e})");
            return Ok(ea + (mean_anomaly - reduced_m));
        }
    }

    fail(Error::NumericNonConvergence {
        iterations: config.max_iterations,
        step,
    })
}
