//! # orbatt
//!
//! Orbit and attitude kinematics for flight-dynamics tooling.
//!
//! Provides Kepler's equation and anomaly conversions, classical orbital
//! elements, Keplerian to Cartesian conversion, local orbital frames
//! (TNW, LVLH), relative states between orbits, quaternion attitude
//! algebra with matrix / angle-axis / Euler-angle conversions, and the
//! rocket equation.
//!
//! ```
//! use orbatt::constants::MU_EARTH;
//! use orbatt::elements::OrbitalElements;
//! use orbatt::rotation::from_angle_axis;
//!
//! let orbit = OrbitalElements::new(7000.0, 0.01, 30.0, 90.0, 0.0, 0.0).unwrap();
//! let state = orbit.to_cartesian(MU_EARTH).unwrap();
//! assert!((state.r_mag() - 6930.0).abs() < 1e-6);
//!
//! let q = from_angle_axis(std::f64::consts::FRAC_PI_2, &[0.0, 0.0, 1.0]).unwrap();
//! assert_eq!(q.rotate(&[1.0, 0.0, 0.0]).unwrap(), [0.0, 1.0, 0.0]);
//! ```

pub mod angles;
pub mod constants;
pub mod elements;
pub mod ephemeris;
pub mod error;
pub mod frames;
pub mod geometry;
pub mod kepler;
pub mod maneuver;
pub mod quaternion;
pub mod relative;
pub mod rotation;
pub mod state;

pub use error::{Error, Result};

#[cfg(feature = "python")]
mod pybridge;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn orbatt(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pybridge::register(m)?;
    Ok(())
}
