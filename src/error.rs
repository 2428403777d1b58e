//! Error taxonomy shared by every fallible operation in the crate.
//!
//! All checks are fail-fast: the first violated precondition is logged and
//! returned, nothing is substituted or retried.

use thiserror::Error;

/// Errors raised by orbit, frame and attitude conversions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid orbit: {reason}")]
    InvalidOrbit { reason: String },

    #[error("{what} must have {expected} elements, got {got}")]
    Shape {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Rotation order '{0}' is neither a Cardan nor an Euler sequence")]
    DegenerateRotationOrder(String),

    #[error("Kepler solver did not converge after {iterations} iterations (last step {step:e})")]
    NumericNonConvergence { iterations: usize, step: f64 },

    #[error("Invalid masses: initial {initial} kg, final {final_} kg")]
    InvalidMass { initial: f64, final_: f64 },

    #[error("Invalid time grid: duration {duration} s with step {step} s")]
    InvalidTimeGrid { duration: f64, step: f64 },

    #[error("Unknown reference frame '{0}'")]
    UnknownFrame(String),

    #[error("Unknown rotation axis '{0}', expected one of X, Y, Z")]
    UnknownAxis(char),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_orbit(reason: impl Into<String>) -> Self {
        Error::InvalidOrbit {
            reason: reason.into(),
        }
    }
}

/// Log an error at the point of detection and return it.
pub(crate) fn fail<T>(err: Error) -> Result<T> {
    log::error!("{err}");
    Err(err)
}

/// Check that a slice has exactly `expected` elements.
pub(crate) fn check_len(what: &'static str, values: &[f64], expected: usize) -> Result<()> {
    if values.len() != expected {
        return fail(Error::Shape {
            what,
            expected,
            got: values.len(),
        });
    }
    Ok(())
}
