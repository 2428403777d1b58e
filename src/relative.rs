//! Relative state of one orbit with respect to another, in the reference
//! orbit's TNW frame.

use serde::{Deserialize, Serialize};

use crate::elements::OrbitalElements;
use crate::error::{check_len, Result};
use crate::geometry::{mat_vec, sub, Vec3};
use crate::state::{kep_to_car, CartesianState};

/// Position (km) and velocity (km/s) offsets along (T, N, W).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeState {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl RelativeState {
    /// Express `target - reference` in the TNW frame of `reference`.
    pub fn between(reference: &CartesianState, target: &CartesianState) -> Self {
        let m = reference.tnw_matrix();
        RelativeState {
            position: mat_vec(&m, &sub(&target.position(), &reference.position())),
            velocity: mat_vec(&m, &sub(&target.velocity(), &reference.velocity())),
        }
    }

    /// `[dT, dN, dW, dVt, dVn, dVw]`
    pub fn as_array(&self) -> [f64; 6] {
        let [x, y, z] = self.position;
        let [vx, vy, vz] = self.velocity;
        [x, y, z, vx, vy, vz]
    }
}

fn state_from_array(kep: &[f64], mu: f64) -> Result<CartesianState> {
    check_len("Keplerian elements", kep, 6)?;
    kep_to_car(kep[0], kep[1], kep[2], kep[3], kep[4], kep[5], mu)
}

/// TNW delta of orbit `kep_b` relative to orbit `kep_a`.
///
/// Both inputs are `[sma, ecc, inc, aop, raan, ma]` with angles in radians.
/// The frame is built from the state of `kep_a`.
///
/// ```
/// use orbatt::constants::{DEG2RAD, MU_EARTH};
/// use orbatt::relative::delta_tnw_between;
///
/// let a = [7000.0, 0.0, 30.0 * DEG2RAD, 90.0 * DEG2RAD, 0.0, 0.0];
/// let d = delta_tnw_between(&a, &a, MU_EARTH).unwrap();
/// assert_eq!(d, [0.0; 6]);
/// ```
pub fn delta_tnw_between(kep_a: &[f64], kep_b: &[f64], mu: f64) -> Result<[f64; 6]> {
    let a = state_from_array(kep_a, mu)?;
    let b = state_from_array(kep_b, mu)?;
    Ok(RelativeState::between(&a, &b).as_array())
}

/// [`delta_tnw_between`] for [`OrbitalElements`].
pub fn delta_tnw_between_elements(
    reference: &OrbitalElements,
    target: &OrbitalElements,
    mu: f64,
) -> Result<RelativeState> {
    let a = reference.to_cartesian(mu)?;
    let b = target.to_cartesian(mu)?;
    Ok(RelativeState::between(&a, &b))
}
