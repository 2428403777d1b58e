//! Reference frames and orbital local frames.
//!
//! [`to_tnw`] and [`to_lvlh`] return the rotation matrix from the inertial
//! frame of a Cartesian state to the local orbital frame: its rows are the
//! local axes expressed in inertial coordinates, so `M · v_inertial` gives
//! `v` in local coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{check_len, fail, Error, Result};
use crate::geometry::{cross, scale, unit_vector, Mat3, Vec3};

/// Named reference frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frame {
    Cirf,
    Eci,
    Teme,
    J2000,
    Eme2000,
    #[default]
    Gcrf,
    Itrf,
    Gtod,
    Ecf,
    Tnw,
    Qsw,
    Lvlh,
}

impl Frame {
    pub const ALL: [Frame; 12] = [
        Frame::Cirf,
        Frame::Eci,
        Frame::Teme,
        Frame::J2000,
        Frame::Eme2000,
        Frame::Gcrf,
        Frame::Itrf,
        Frame::Gtod,
        Frame::Ecf,
        Frame::Tnw,
        Frame::Qsw,
        Frame::Lvlh,
    ];

    /// Canonical upper-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Frame::Cirf => "CIRF",
            Frame::Eci => "ECI",
            Frame::Teme => "TEME",
            Frame::J2000 => "J2000",
            Frame::Eme2000 => "EME2000",
            Frame::Gcrf => "GCRF",
            Frame::Itrf => "ITRF",
            Frame::Gtod => "GTOD",
            Frame::Ecf => "ECF",
            Frame::Tnw => "TNW",
            Frame::Qsw => "QSW",
            Frame::Lvlh => "LVLH",
        }
    }

    /// Name under which an equivalent frame is usually exchanged.
    pub fn value_or_alias(&self) -> &'static str {
        match self {
            Frame::Cirf => Frame::Eci.name(),
            Frame::Itrf => Frame::Ecf.name(),
            Frame::J2000 => Frame::Eme2000.name(),
            other => other.name(),
        }
    }

    /// Local orbital frames built from a state rather than fixed in space.
    pub fn is_local_orbital(&self) -> bool {
        matches!(self, Frame::Tnw | Frame::Qsw | Frame::Lvlh)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Frame {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase();
        match Frame::ALL.iter().find(|f| f.name() == wanted) {
            Some(frame) => Ok(*frame),
            None => fail(Error::UnknownFrame(s.to_string())),
        }
    }
}

/// A principal rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn from_index(index: usize) -> Axis {
        match index % 3 {
            0 => Axis::X,
            1 => Axis::Y,
            _ => Axis::Z,
        }
    }

    /// Unit vector along the axis.
    pub fn unit(&self) -> Vec3 {
        let mut v = [0.0; 3];
        v[self.index()] = 1.0;
        v
    }

    fn from_char(c: char) -> Result<Axis> {
        match c.to_ascii_uppercase() {
            'X' => Ok(Axis::X),
            'Y' => Ok(Axis::Y),
            'Z' => Ok(Axis::Z),
            _ => fail(Error::UnknownAxis(c)),
        }
    }
}

/// Whether a three-axis sequence repeats its first axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationKind {
    /// Three distinct axes (XYZ, ZYX, ...)
    Cardan,
    /// First and third axes identical (ZXZ, XYX, ...)
    Euler,
}

/// An ordered triple of rotation axes, e.g. `"zxz"` or `"XYZ"`.
///
/// Parsing only checks the letters; [`RotationOrder::kind`] rejects the
/// sequences that are neither Cardan nor Euler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RotationOrder {
    pub axes: [Axis; 3],
}

impl RotationOrder {
    pub fn new(first: Axis, second: Axis, third: Axis) -> Self {
        RotationOrder {
            axes: [first, second, third],
        }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.axes[0].index(), self.axes[1].index(), self.axes[2].index()]
    }

    /// Classify the sequence, or fail for degenerate orders such as `XXY`.
    pub fn kind(&self) -> Result<RotationKind> {
        let [a, b, c] = self.axes;
        if a != b && b != c && a != c {
            Ok(RotationKind::Cardan)
        } else if a == c && a != b {
            Ok(RotationKind::Euler)
        } else {
            fail(Error::DegenerateRotationOrder(self.to_string()))
        }
    }
}

impl fmt::Display for RotationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in &self.axes {
            write!(f, "{axis:?}")?;
        }
        Ok(())
    }
}

impl FromStr for RotationOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 3 {
            return fail(Error::DegenerateRotationOrder(s.to_string()));
        }
        Ok(RotationOrder::new(
            Axis::from_char(chars[0])?,
            Axis::from_char(chars[1])?,
            Axis::from_char(chars[2])?,
        ))
    }
}

/// Split a 6-element state into position and velocity.
fn split_state(state: &[f64]) -> Result<(Vec3, Vec3)> {
    check_len("Cartesian state", state, 6)?;
    Ok((
        [state[0], state[1], state[2]],
        [state[3], state[4], state[5]],
    ))
}

/// Inertial → TNW rotation from position and velocity.
pub fn tnw_matrix(r: &Vec3, v: &Vec3) -> Mat3 {
    let u_t = unit_vector(v);
    let u_w = unit_vector(&cross(r, v));
    let u_n = cross(&u_w, &u_t);
    [u_t, u_n, u_w]
}

/// Inertial → LVLH rotation from position and velocity.
///
/// Rows are (along-track, cross-track, radial) with the radial axis
/// pointing to the central body and cross-track along `-(r × v)`.
pub fn lvlh_matrix(r: &Vec3, v: &Vec3) -> Mat3 {
    let u_r = scale(&unit_vector(r), -1.0);
    let u_h = scale(&unit_vector(&cross(r, v)), -1.0);
    let u_l = cross(&u_h, &u_r);
    [u_l, u_h, u_r]
}

/// Inertial → TNW rotation for a state `[x, y, z, vx, vy, vz]`.
pub fn to_tnw(state: &[f64]) -> Result<Mat3> {
    let (r, v) = split_state(state)?;
    Ok(tnw_matrix(&r, &v))
}

/// Inertial → LVLH rotation for a state `[x, y, z, vx, vy, vz]`.
pub fn to_lvlh(state: &[f64]) -> Result<Mat3> {
    let (r, v) = split_state(state)?;
    Ok(lvlh_matrix(&r, &v))
}
