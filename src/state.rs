//! Cartesian position/velocity states and the Keplerian → Cartesian map.

use serde::{Deserialize, Serialize};

use crate::constants::{MU_EARTH, R_EARTH};
use crate::elements::{check_kep_validity, OrbitalElements};
use crate::error::{check_len, Result};
use crate::frames::{lvlh_matrix, tnw_matrix, Frame};
use crate::geometry::{add_scaled, norm, Mat3, Vec3};
use crate::kepler;

/// Inertial position (km) and velocity (km/s) tagged with its frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartesianState {
    position: Vec3,
    velocity: Vec3,
    #[serde(default)]
    frame: Frame,
}

impl CartesianState {
    pub fn new(position: Vec3, velocity: Vec3, frame: Frame) -> Self {
        CartesianState {
            position,
            velocity,
            frame,
        }
    }

    /// Build from `[x, y, z, vx, vy, vz]`.
    pub fn from_state(state: &[f64], frame: Frame) -> Result<Self> {
        check_len("Cartesian state", state, 6)?;
        Ok(Self::new(
            [state[0], state[1], state[2]],
            [state[3], state[4], state[5]],
            frame,
        ))
    }

    pub fn from_position_velocity(
        position: &[f64],
        velocity: &[f64],
        frame: Frame,
    ) -> Result<Self> {
        check_len("position", position, 3)?;
        check_len("velocity", velocity, 3)?;
        Ok(Self::new(
            [position[0], position[1], position[2]],
            [velocity[0], velocity[1], velocity[2]],
            frame,
        ))
    }

    /// Cartesian state of a set of elements (see [`kep_to_car`]).
    pub fn from_elements(elements: &OrbitalElements, mu: f64) -> Result<Self> {
        elements.to_cartesian(mu)
    }

    /// Same vectors, relabelled with another frame. No rotation is applied.
    pub fn with_frame(self, frame: Frame) -> Self {
        CartesianState { frame, ..self }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// `[x, y, z, vx, vy, vz]`
    pub fn state(&self) -> [f64; 6] {
        let [x, y, z] = self.position;
        let [vx, vy, vz] = self.velocity;
        [x, y, z, vx, vy, vz]
    }

    /// Position magnitude (km).
    pub fn r_mag(&self) -> f64 {
        norm(&self.position)
    }

    /// Velocity magnitude (km/s).
    pub fn v_mag(&self) -> f64 {
        norm(&self.velocity)
    }

    /// Altitude above the Earth's equatorial radius (km).
    pub fn altitude(&self) -> f64 {
        self.r_mag() - R_EARTH
    }

    /// Specific orbital energy (km²/s²).
    pub fn energy(&self, mu: f64) -> f64 {
        self.v_mag().powi(2) / 2.0 - mu / self.r_mag()
    }

    /// Semi-major axis from vis-viva (km).
    pub fn sma(&self, mu: f64) -> f64 {
        -mu / (2.0 * self.energy(mu))
    }

    /// Inertial → TNW rotation at this state.
    pub fn tnw_matrix(&self) -> Mat3 {
        tnw_matrix(&self.position, &self.velocity)
    }

    /// Inertial → LVLH rotation at this state.
    pub fn lvlh_matrix(&self) -> Mat3 {
        lvlh_matrix(&self.position, &self.velocity)
    }
}

/// Keplerian → Cartesian conversion.
///
/// Angles in radians, `sma` in km and `mu` in km³/s². The eccentric anomaly
/// comes from the Halley solver, the in-plane state is built in the
/// perifocal frame and rotated by (AoP, INC, RAAN). The result is tagged
/// with the default inertial frame.
pub fn kep_to_car(
    sma: f64,
    ecc: f64,
    inc: f64,
    aop: f64,
    raan: f64,
    ma: f64,
    mu: f64,
) -> Result<CartesianState> {
    check_kep_validity(sma, ecc)?;

    let ecc_anomaly = kepler::eccentric_from_mean(ecc, ma);
    let (sin_e, cos_e) = ecc_anomaly.sin_cos();
    let r = sma * (1.0 - ecc * cos_e);
    let n = (mu / sma.powi(3)).sqrt();
    let eta = (1.0 - ecc * ecc).sqrt();

    // Perifocal position and velocity
    let x = sma * (cos_e - ecc);
    let y = sma * eta * sin_e;
    let vx = -n * sma * sma / r * sin_e;
    let vy = n * sma * sma / r * eta * cos_e;

    let (s_aop, c_aop) = aop.sin_cos();
    let (s_raan, c_raan) = raan.sin_cos();
    let (s_inc, c_inc) = inc.sin_cos();

    // First two columns of the perifocal → inertial rotation
    let p = [
        c_aop * c_raan - s_aop * s_raan * c_inc,
        c_aop * s_raan + s_aop * c_raan * c_inc,
        s_aop * s_inc,
    ];
    let q = [
        -s_aop * c_raan - c_aop * s_raan * c_inc,
        -s_aop * s_raan + c_aop * c_raan * c_inc,
        c_aop * s_inc,
    ];

    Ok(CartesianState::new(
        add_scaled(&p, x, &q, y),
        add_scaled(&p, vx, &q, vy),
        Frame::default(),
    ))
}

/// [`kep_to_car`] with the Earth's gravitational parameter.
pub fn kep_to_car_earth(
    sma: f64,
    ecc: f64,
    inc: f64,
    aop: f64,
    raan: f64,
    ma: f64,
) -> Result<CartesianState> {
    kep_to_car(sma, ecc, inc, aop, raan, ma, MU_EARTH)
}
