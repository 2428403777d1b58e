//! Classical Keplerian orbital elements.
//!
//! [`OrbitalElements`] stores angles in degrees, normalized once at
//! construction, and keeps the mean and true anomaly mutually consistent
//! for the stored eccentricity. Instances are immutable: changing any
//! element produces a new value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::angles::{wrap_deg_180, wrap_deg_360, wrap_inclination_deg};
use crate::constants::*;
use crate::error::{fail, Error, Result};
use crate::kepler;
use crate::state::{kep_to_car, CartesianState};

/// Which anomaly an input angle represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnomalyKind {
    Mean,
    True,
}

impl FromStr for AnomalyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MEAN" => Ok(AnomalyKind::Mean),
            "TRUE" => Ok(AnomalyKind::True),
            other => fail(Error::invalid_orbit(format!("unknown anomaly kind '{other}'"))),
        }
    }
}

/// Classical orbital elements of an elliptic orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ElementsRecord")]
pub struct OrbitalElements {
    /// Semi-major axis (km), > 0
    sma: f64,
    /// Eccentricity, in [0, 1)
    ecc: f64,
    /// Inclination (deg), in [0, 180]
    inc: f64,
    /// Argument of perigee (deg), in [0, 360)
    aop: f64,
    /// Right ascension of ascending node (deg), in (-180, 180]
    raan: f64,
    /// True anomaly (deg), in [0, 360)
    ta: f64,
    /// Mean anomaly (deg), in [0, 360), derived from `ta`
    ma: f64,
}

/// Wire shape accepted on deserialization; the mean anomaly is re-derived.
#[derive(Deserialize)]
struct ElementsRecord {
    sma: f64,
    ecc: f64,
    inc: f64,
    aop: f64,
    raan: f64,
    ta: f64,
}

impl TryFrom<ElementsRecord> for OrbitalElements {
    type Error = Error;

    fn try_from(r: ElementsRecord) -> Result<Self> {
        OrbitalElements::new(r.sma, r.ecc, r.inc, r.aop, r.raan, r.ta)
    }
}

/// Reject semi-major axes <= 0 and eccentricities outside [0, 1).
pub fn check_kep_validity(sma: f64, ecc: f64) -> Result<()> {
    if !(sma > 0.0) {
        return fail(Error::invalid_orbit(format!(
            "semi-major axis must be greater than 0, got {sma} km"
        )));
    }
    if !(0.0..1.0).contains(&ecc) {
        return fail(Error::invalid_orbit(format!(
            "eccentricity must be in the range [0, 1), got {ecc}"
        )));
    }
    Ok(())
}

/// Two-body orbital period (s) for a semi-major axis in km.
pub fn keplerian_period(sma: f64, mu: f64) -> f64 {
    TAU * (sma.powi(3) / mu).sqrt()
}

impl OrbitalElements {
    /// Build elements from a true anomaly. All angles in degrees.
    pub fn new(sma: f64, ecc: f64, inc: f64, aop: f64, raan: f64, ta: f64) -> Result<Self> {
        check_kep_validity(sma, ecc)?;

        let ta = wrap_deg_360(ta);
        let ma = wrap_deg_360(kepler::mean_from_true(ecc, ta * DEG2RAD) * RAD2DEG);

        Ok(OrbitalElements {
            sma,
            ecc,
            inc: wrap_inclination_deg(inc),
            aop: wrap_deg_360(aop),
            raan: wrap_deg_180(raan),
            ta,
            ma,
        })
    }

    /// Build elements from a mean anomaly. All angles in degrees.
    pub fn with_mean_anomaly(
        sma: f64,
        ecc: f64,
        inc: f64,
        aop: f64,
        raan: f64,
        ma: f64,
    ) -> Result<Self> {
        check_kep_validity(sma, ecc)?;
        let ta = kepler::true_from_mean(ecc, ma * DEG2RAD) * RAD2DEG;
        Self::new(sma, ecc, inc, aop, raan, ta)
    }

    /// Build elements from an anomaly of the given kind.
    pub fn with_anomaly(
        sma: f64,
        ecc: f64,
        inc: f64,
        aop: f64,
        raan: f64,
        anomaly: f64,
        kind: AnomalyKind,
    ) -> Result<Self> {
        match kind {
            AnomalyKind::True => Self::new(sma, ecc, inc, aop, raan, anomaly),
            AnomalyKind::Mean => Self::with_mean_anomaly(sma, ecc, inc, aop, raan, anomaly),
        }
    }

    /// Semi-major axis (km).
    pub fn sma(&self) -> f64 {
        self.sma
    }

    /// Eccentricity.
    pub fn ecc(&self) -> f64 {
        self.ecc
    }

    /// Inclination (deg).
    pub fn inc(&self) -> f64 {
        self.inc
    }

    /// Argument of perigee (deg).
    pub fn aop(&self) -> f64 {
        self.aop
    }

    /// Right ascension of the ascending node (deg).
    pub fn raan(&self) -> f64 {
        self.raan
    }

    /// True anomaly (deg).
    pub fn ta(&self) -> f64 {
        self.ta
    }

    /// Mean anomaly (deg).
    pub fn ma(&self) -> f64 {
        self.ma
    }

    /// Anomaly of the requested kind (deg).
    pub fn anomaly(&self, kind: AnomalyKind) -> f64 {
        match kind {
            AnomalyKind::Mean => self.ma,
            AnomalyKind::True => self.ta,
        }
    }

    /// `[sma, ecc, inc, aop, raan, anomaly]`, angles in degrees or radians.
    pub fn as_array(&self, with_mean_anomaly: bool, radians: bool) -> [f64; 6] {
        let an = if with_mean_anomaly { self.ma } else { self.ta };
        let k = if radians { DEG2RAD } else { 1.0 };
        [self.sma, self.ecc, self.inc * k, self.aop * k, self.raan * k, an * k]
    }

    /// Same orbit at a different mean anomaly (deg).
    pub fn at_mean_anomaly(&self, ma: f64) -> Result<Self> {
        Self::with_mean_anomaly(self.sma, self.ecc, self.inc, self.aop, self.raan, ma)
    }

    /// Same orbit at a different true anomaly (deg).
    pub fn at_true_anomaly(&self, ta: f64) -> Result<Self> {
        Self::new(self.sma, self.ecc, self.inc, self.aop, self.raan, ta)
    }

    /// Mean motion (rad/s).
    pub fn mean_motion(&self, mu: f64) -> f64 {
        (mu / self.sma.powi(3)).sqrt()
    }

    /// Orbital period (seconds).
    pub fn period(&self, mu: f64) -> f64 {
        keplerian_period(self.sma, mu)
    }

    /// Two-body state after `dt` seconds: only the mean anomaly moves.
    pub fn propagate(&self, dt: f64, mu: f64) -> Result<Self> {
        let ma = self.ma + self.mean_motion(mu) * dt * RAD2DEG;
        self.at_mean_anomaly(ma)
    }

    /// Cartesian position/velocity for gravitational parameter `mu`.
    pub fn to_cartesian(&self, mu: f64) -> Result<CartesianState> {
        let [sma, ecc, inc, aop, raan, ma] = self.as_array(true, true);
        kep_to_car(sma, ecc, inc, aop, raan, ma, mu)
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrbitalElements(a={:.3} km, e={:.6}, i={:.4}°, AoP={:.4}°, RAAN={:.4}°, TA={:.4}°, MA={:.4}°)",
            self.sma, self.ecc, self.inc, self.aop, self.raan, self.ta, self.ma
        )
    }
}
