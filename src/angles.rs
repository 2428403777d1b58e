//! Angle reduction into canonical ranges.
//!
//! Plain `%` leaves values sitting a few ulps below an upper bound, which
//! makes wrapped angles jitter between `max - ε` and `min`. The range modulo
//! below snaps values within an absolute tolerance of either bound onto the
//! lower bound, so `360 - 1e-12` deg and `0` deg normalize identically.

use crate::constants::{ANGLE_SNAP_TOL, PI, TAU};

/// Modulo with a non-negative result: `x - |m| * floor(x / |m|)`.
pub fn pmodulo(x: f64, modulo: f64) -> f64 {
    let m = modulo.abs();
    x - m * (x / m).floor()
}

/// Reduce `x` into `[x_min, x_max)` using the default snapping tolerance.
pub fn modulo_with_range(x: f64, x_min: f64, x_max: f64) -> f64 {
    modulo_with_range_tol(x, x_min, x_max, ANGLE_SNAP_TOL, ANGLE_SNAP_TOL)
}

/// Reduce `x` into `[x_min, x_max)`.
///
/// An input within `min_atol` of `x_min` is snapped to `x_min` before the
/// reduction; a result within `max_atol` of `x_max` is snapped to `x_min`.
pub fn modulo_with_range_tol(x: f64, x_min: f64, x_max: f64, min_atol: f64, max_atol: f64) -> f64 {
    let delta = x_max - x_min;
    let x = if (x - x_min).abs() < min_atol { x_min } else { x };
    let nrev = ((x - x_min) / delta).floor();
    let res = x - nrev * delta;
    if (res - x_max).abs() < max_atol {
        x_min
    } else {
        res
    }
}

/// Normalize radians to [0, 2π).
pub fn normalize_angle(angle: f64) -> f64 {
    modulo_with_range(angle, 0.0, TAU)
}

/// Normalize radians to [-π, π).
pub fn normalize_angle_pm(angle: f64) -> f64 {
    modulo_with_range(angle, -PI, PI)
}

/// Normalize radians to (-π, π]; `-π` maps to `π`.
pub fn normalize_angle_upper_pm(angle: f64) -> f64 {
    let a = normalize_angle_pm(angle);
    if a == -PI {
        PI
    } else {
        a
    }
}

/// Normalize degrees to [0, 360).
pub fn wrap_deg_360(deg: f64) -> f64 {
    modulo_with_range(deg, 0.0, 360.0)
}

/// Normalize degrees to (-180, 180]; `-180` maps to `180`.
pub fn wrap_deg_180(deg: f64) -> f64 {
    let a = modulo_with_range(deg, -180.0, 180.0);
    if a == -180.0 {
        180.0
    } else {
        a
    }
}

/// Normalize an inclination to [0, 180] degrees.
///
/// Values already inside the closed range are returned untouched so that a
/// retrograde equatorial orbit (180°) keeps its inclination.
pub fn wrap_inclination_deg(deg: f64) -> f64 {
    if (0.0..=180.0).contains(&deg) {
        deg
    } else {
        modulo_with_range(deg, 0.0, 180.0)
    }
}
