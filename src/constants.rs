//! Physical constants and numerical thresholds.

/// Earth gravitational parameter (km³/s²)
pub const MU_EARTH: f64 = 398600.4418;

/// Earth equatorial radius (km), WGS84
pub const R_EARTH: f64 = 6378.137;

/// Standard gravity (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Two pi
pub const TAU: f64 = std::f64::consts::TAU;

/// Pi
pub const PI: f64 = std::f64::consts::PI;

/// Degrees to radians
pub const DEG2RAD: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees
pub const RAD2DEG: f64 = 180.0 / std::f64::consts::PI;

/// Absolute tolerance used to snap values onto the bounds of a modulo range.
pub const ANGLE_SNAP_TOL: f64 = 1e-10;

/// Decimal places kept by rotation outputs (matrices, rotated vectors).
pub const ROUND_DECIMALS: i32 = 10;

/// Above this value of the pivot component, angle extraction is treated as gimbal lock.
pub const GIMBAL_LOCK_THRESHOLD: f64 = 1.0 - 1e-10;

/// Eccentricity above which the Halley solver loses accuracy.
pub const NEAR_PARABOLIC_ECC: f64 = 0.99;

/// Round to [`ROUND_DECIMALS`] decimal places.
pub(crate) fn round_to_decimals(x: f64) -> f64 {
    let scale = 10f64.powi(ROUND_DECIMALS);
    (x * scale).round() / scale
}
