//! Hamilton quaternions used to represent attitudes and frame rotations.
//!
//! A quaternion is stored as `real + i·I + j·J + k·K`. Attitude quaternions
//! are normally unit length, but the algebra (products, sums, norms) is
//! defined for any value; operations that interpret a quaternion as a
//! rotation normalize it first. `q` and `-q` describe the same rotation, see
//! [`Quaternion::same_rotation`] and [`Quaternion::canonical`].
//!
//! An optional timestamp and pair of frame tags can be attached. They are
//! metadata only: equality, hashing and arithmetic look at the four
//! components alone, and arithmetic results are untagged.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

use crate::constants::round_to_decimals;
use crate::error::{check_len, Result};
use crate::frames::Frame;
use crate::geometry::{to_vec3, Vec3};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quaternion {
    real: f64,
    i: f64,
    j: f64,
    k: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from_frame: Option<Frame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to_frame: Option<Frame>,
}

impl Quaternion {
    pub fn new(real: f64, i: f64, j: f64, k: f64) -> Self {
        Quaternion {
            real,
            i,
            j,
            k,
            date: None,
            from_frame: None,
            to_frame: None,
        }
    }

    /// The null rotation `1 + 0i + 0j + 0k`.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Build from `[real, i, j, k]`.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        check_len("quaternion", values, 4)?;
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    pub fn with_date(self, date: DateTime<Utc>) -> Self {
        Quaternion {
            date: Some(date),
            ..self
        }
    }

    /// Tag as the rotation from `from_frame` to `to_frame`.
    pub fn with_frames(self, from_frame: Frame, to_frame: Frame) -> Self {
        Quaternion {
            from_frame: Some(from_frame),
            to_frame: Some(to_frame),
            ..self
        }
    }

    pub fn real(&self) -> f64 {
        self.real
    }

    /// Same as [`Quaternion::real`], under the scalar-last naming.
    pub fn q4(&self) -> f64 {
        self.real
    }

    pub fn i(&self) -> f64 {
        self.i
    }

    pub fn j(&self) -> f64 {
        self.j
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn imag(&self) -> Vec3 {
        [self.i, self.j, self.k]
    }

    /// `[real, i, j, k]`
    pub fn components(&self) -> [f64; 4] {
        [self.real, self.i, self.j, self.k]
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    pub fn from_frame(&self) -> Option<Frame> {
        self.from_frame
    }

    pub fn to_frame(&self) -> Option<Frame> {
        self.to_frame
    }

    pub fn norm(&self) -> f64 {
        (self.real * self.real + self.i * self.i + self.j * self.j + self.k * self.k).sqrt()
    }

    /// `q / |q|`. The zero quaternion yields NaNs.
    pub fn unit(&self) -> Self {
        let n = self.norm();
        Self::new(self.real / n, self.i / n, self.j / n, self.k / n)
    }

    pub fn conjugate(&self) -> Self {
        Self::new(self.real, -self.i, -self.j, -self.k)
    }

    /// Rotate a 3-vector (active rotation): imaginary part of
    /// `u · (0, v) · u*` with `u = unit(q)`.
    ///
    /// Components are rounded to 10 decimals.
    pub fn rotate(&self, v: &[f64]) -> Result<Vec3> {
        Ok(self.rotate_vec(&to_vec3("vector", v)?))
    }

    pub(crate) fn rotate_vec(&self, v: &Vec3) -> Vec3 {
        let u = self.unit();
        let p = u * Self::new(0.0, v[0], v[1], v[2]) * u.conjugate();
        p.imag().map(round_to_decimals)
    }

    /// Whether `self` and `other` encode the same rotation within `eps`,
    /// accepting either sign.
    pub fn same_rotation(&self, other: &Quaternion, eps: f64) -> bool {
        let a = self.unit().components();
        let b = other.unit().components();
        let close = |sign: f64| a.iter().zip(b.iter()).all(|(x, y)| (x - sign * y).abs() <= eps);
        close(1.0) || close(-1.0)
    }

    /// Representative of `{q, -q}` with a non-negative real part.
    ///
    /// When the real part is zero, the first non-zero imaginary component is
    /// made positive. Tags are kept.
    pub fn canonical(&self) -> Self {
        let leading = [self.real, self.i, self.j, self.k]
            .into_iter()
            .find(|c| *c != 0.0)
            .unwrap_or(0.0);
        if leading < 0.0 {
            Quaternion {
                real: -self.real,
                i: -self.i,
                j: -self.j,
                k: -self.k,
                ..*self
            }
        } else {
            *self
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for Quaternion {
    fn eq(&self, other: &Self) -> bool {
        self.components() == other.components()
    }
}

// NaN components are outside the supported domain.
impl Eq for Quaternion {}

impl Hash for Quaternion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // +0.0 folds -0.0 onto 0.0 so equal values hash alike
        for c in self.components() {
            (c + 0.0).to_bits().hash(state);
        }
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    /// Hamilton product. Not commutative: `q1 * q2 != q2 * q1` in general,
    /// and `q1 * q2` rotates by `q2` first, then by `q1`.
    fn mul(self, o: Quaternion) -> Quaternion {
        Quaternion::new(
            self.real * o.real - self.i * o.i - self.j * o.j - self.k * o.k,
            self.real * o.i + self.i * o.real + self.j * o.k - self.k * o.j,
            self.real * o.j - self.i * o.k + self.j * o.real + self.k * o.i,
            self.real * o.k + self.i * o.j - self.j * o.i + self.k * o.real,
        )
    }
}

impl Add for Quaternion {
    type Output = Quaternion;

    fn add(self, o: Quaternion) -> Quaternion {
        Quaternion::new(self.real + o.real, self.i + o.i, self.j + o.j, self.k + o.k)
    }
}

impl Sub for Quaternion {
    type Output = Quaternion;

    fn sub(self, o: Quaternion) -> Quaternion {
        Quaternion::new(self.real - o.real, self.i - o.i, self.j - o.j, self.k - o.k)
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        Quaternion::new(-self.real, -self.i, -self.j, -self.k)
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quaternion({}, {}, {}, {})", self.real, self.i, self.j, self.k)
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq for Quaternion {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.components()
            .iter()
            .zip(other.components().iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for Quaternion {
    fn default_max_relative() -> f64 {
        f64::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.components()
            .iter()
            .zip(other.components().iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
