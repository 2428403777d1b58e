//! Impulsive maneuver budgeting with the Tsiolkovsky rocket equation.
//!
//! Specific impulse is in seconds, masses in kg and Δv in m/s; the
//! effective exhaust velocity is `Isp · g0` with standard gravity.

use crate::constants::STANDARD_GRAVITY;
use crate::error::{fail, Error, Result};

fn exhaust_velocity(isp: f64) -> f64 {
    isp * STANDARD_GRAVITY
}

/// Δv (m/s) achieved by burning from `initial_mass` down to `final_mass`.
///
/// # Arguments
/// * `isp` - Specific impulse (s)
/// * `initial_mass` - Wet mass before the burn (kg)
/// * `final_mass` - Mass after the burn (kg), must be positive and not above `initial_mass`
///
/// ```
/// let dv = orbatt::maneuver::delta_v(300.0, 1000.0, 900.0).unwrap();
/// assert!((dv - 309.9701).abs() < 1e-4);
/// ```
pub fn delta_v(isp: f64, initial_mass: f64, final_mass: f64) -> Result<f64> {
    if !(final_mass > 0.0) || !(initial_mass >= final_mass) {
        return fail(Error::InvalidMass {
            initial: initial_mass,
            final_: final_mass,
        });
    }
    Ok(exhaust_velocity(isp) * (initial_mass / final_mass).ln())
}

/// Mass left (kg) after delivering `dv` (m/s) from `initial_mass`.
pub fn final_mass(isp: f64, initial_mass: f64, dv: f64) -> Result<f64> {
    let remaining = initial_mass * (-dv / exhaust_velocity(isp)).exp();
    if !(initial_mass > 0.0) || remaining.is_nan() {
        return fail(Error::InvalidMass {
            initial: initial_mass,
            final_: remaining,
        });
    }
    Ok(remaining)
}

/// Propellant (kg) consumed to deliver `dv` (m/s) from `initial_mass`.
pub fn propellant_mass(isp: f64, initial_mass: f64, dv: f64) -> Result<f64> {
    Ok(initial_mass - final_mass(isp, initial_mass, dv)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_delta_v_reference() {
        let dv = delta_v(300.0, 1000.0, 900.0).unwrap();
        assert_relative_eq!(dv, 309.9701, epsilon = 1e-4);
    }

    #[test]
    fn test_no_burn_is_zero() {
        assert_eq!(delta_v(220.0, 500.0, 500.0).unwrap(), 0.0);
        assert_eq!(final_mass(220.0, 500.0, 0.0).unwrap(), 500.0);
    }

    #[test]
    fn test_invalid_masses() {
        assert!(matches!(
            delta_v(300.0, 1000.0, 0.0),
            Err(Error::InvalidMass { .. })
        ));
        assert!(delta_v(300.0, 1000.0, -5.0).is_err());
        assert!(delta_v(300.0, 900.0, 1000.0).is_err());
        assert!(final_mass(300.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_nan_inputs_rejected() {
        assert!(matches!(
            delta_v(300.0, f64::NAN, 900.0),
            Err(Error::InvalidMass { .. })
        ));
        assert!(delta_v(300.0, 1000.0, f64::NAN).is_err());
        assert!(final_mass(300.0, 1000.0, f64::NAN).is_err());
        assert!(propellant_mass(300.0, f64::NAN, 50.0).is_err());
    }

    #[test]
    fn test_mass_helpers_invert_delta_v() {
        let dv = delta_v(300.0, 1000.0, 900.0).unwrap();
        assert_relative_eq!(final_mass(300.0, 1000.0, dv).unwrap(), 900.0, max_relative = 1e-12);
        assert_relative_eq!(propellant_mass(300.0, 1000.0, dv).unwrap(), 100.0, max_relative = 1e-10);

        // Electric propulsion needs far less propellant for the same Δv
        let xenon = propellant_mass(1500.0, 1000.0, dv).unwrap();
        assert!(xenon < 25.0 && xenon > 15.0, "propellant {xenon} kg");
    }
}
