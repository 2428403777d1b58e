//! Two-body ephemerides sampled from Keplerian elements.
//!
//! Each sample advances the mean anomaly by `n·t` and converts the result
//! with [`kep_to_car`](crate::state::kep_to_car); nothing is integrated
//! numerically.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::elements::OrbitalElements;
use crate::error::{fail, Error, Result};
use crate::state::CartesianState;

/// One ephemeris sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EphemerisPoint {
    pub elapsed_s: f64,
    pub elements: OrbitalElements,
    pub state: CartesianState,
}

/// Upper bound on the number of samples in one ephemeris.
pub const MAX_EPHEMERIS_SAMPLES: usize = 10_000_000;

/// Number of steps on the grid, or `InvalidTimeGrid` when the grid is not
/// finite or would exceed [`MAX_EPHEMERIS_SAMPLES`].
fn check_grid(duration_s: f64, step_s: f64) -> Result<usize> {
    let steps = (duration_s / step_s).ceil();
    if !(step_s > 0.0 && step_s.is_finite())
        || !(duration_s >= 0.0 && duration_s.is_finite())
        || !(steps < MAX_EPHEMERIS_SAMPLES as f64)
    {
        return fail(Error::InvalidTimeGrid {
            duration: duration_s,
            step: step_s,
        });
    }
    Ok(steps as usize)
}

/// Sample `elements` every `step_s` seconds over `[0, duration_s]`.
///
/// The last sample always lands on `duration_s`. At most
/// [`MAX_EPHEMERIS_SAMPLES`] samples are produced.
pub fn keplerian_ephemeris(
    elements: &OrbitalElements,
    mu: f64,
    duration_s: f64,
    step_s: f64,
) -> Result<Vec<EphemerisPoint>> {
    let n_steps = check_grid(duration_s, step_s)?;
    let mut points = Vec::with_capacity(n_steps + 1);

    for i in 0..=n_steps {
        let t = (i as f64 * step_s).min(duration_s);
        let at_t = elements.propagate(t, mu)?;
        points.push(EphemerisPoint {
            elapsed_s: t,
            elements: at_t,
            state: at_t.to_cartesian(mu)?,
        });
    }
    log::trace!("Sampled {} ephemeris points over {duration_s} s", points.len());
    Ok(points)
}

/// Convert many element sets to Cartesian states in parallel.
///
/// Output order follows input order; the first failure is returned.
pub fn states_from_elements(elements: &[OrbitalElements], mu: f64) -> Result<Vec<CartesianState>> {
    log::trace!("Converting {} element sets", elements.len());
    elements.par_iter().map(|e| e.to_cartesian(mu)).collect()
}

/// Ephemerides of a whole constellation, one satellite per rayon task.
pub fn constellation_ephemeris(
    satellites: &[(u32, OrbitalElements)],
    mu: f64,
    duration_s: f64,
    step_s: f64,
) -> Result<Vec<(u32, Vec<EphemerisPoint>)>> {
    check_grid(duration_s, step_s)?;
    log::trace!("Sampling {} satellites", satellites.len());
    satellites
        .par_iter()
        .map(|(id, elems)| Ok((*id, keplerian_ephemeris(elems, mu, duration_s, step_s)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MU_EARTH, R_EARTH};
    use approx::assert_relative_eq;

    fn leo() -> OrbitalElements {
        OrbitalElements::new(R_EARTH + 550.0, 0.001, 53.0, 30.0, 10.0, 0.0).unwrap()
    }

    #[test]
    fn test_sample_grid() {
        let points = keplerian_ephemeris(&leo(), MU_EARTH, 1000.0, 300.0).unwrap();
        let times: Vec<f64> = points.iter().map(|p| p.elapsed_s).collect();
        assert_eq!(times, vec![0.0, 300.0, 600.0, 900.0, 1000.0]);
        assert_eq!(points[0].elements, leo());
    }

    #[test]
    fn test_full_period_returns_to_start() {
        let elems = leo();
        let period = elems.period(MU_EARTH);
        let points = keplerian_ephemeris(&elems, MU_EARTH, period, period / 8.0).unwrap();
        assert_eq!(points.len(), 9);
        let first = points[0].state.state();
        let last = points[8].state.state();
        for (a, b) in first.iter().zip(last.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
        // Two-body energy is conserved along the arc
        let e0 = points[0].state.energy(MU_EARTH);
        for p in &points {
            assert_relative_eq!(p.state.energy(MU_EARTH), e0, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_bad_time_grid() {
        assert!(matches!(
            keplerian_ephemeris(&leo(), MU_EARTH, 100.0, 0.0),
            Err(Error::InvalidTimeGrid { .. })
        ));
        assert!(keplerian_ephemeris(&leo(), MU_EARTH, -1.0, 10.0).is_err());
        assert!(keplerian_ephemeris(&leo(), MU_EARTH, 100.0, f64::NAN).is_err());
    }

    #[test]
    fn test_unbounded_time_grid_rejected() {
        for (duration, step) in [(1e30, 1.0), (f64::INFINITY, 1.0), (100.0, f64::INFINITY)] {
            assert!(matches!(
                keplerian_ephemeris(&leo(), MU_EARTH, duration, step),
                Err(Error::InvalidTimeGrid { .. })
            ));
        }
        let sats = vec![(7, leo())];
        assert!(matches!(
            constellation_ephemeris(&sats, MU_EARTH, 1e30, 1.0),
            Err(Error::InvalidTimeGrid { .. })
        ));
    }

    #[test]
    fn test_parallel_conversion_keeps_order() {
        let set: Vec<OrbitalElements> = (0..32)
            .map(|k| leo().at_mean_anomaly(k as f64 * 11.25).unwrap())
            .collect();
        let states = states_from_elements(&set, MU_EARTH).unwrap();
        assert_eq!(states.len(), 32);
        for (elems, state) in set.iter().zip(states.iter()) {
            assert_eq!(*state, elems.to_cartesian(MU_EARTH).unwrap());
        }
    }

    #[test]
    fn test_constellation() {
        let sats: Vec<(u32, OrbitalElements)> = (0..4)
            .map(|k| (k, leo().at_mean_anomaly(90.0 * k as f64).unwrap()))
            .collect();
        let out = constellation_ephemeris(&sats, MU_EARTH, 600.0, 60.0).unwrap();
        assert_eq!(out.len(), 4);
        for (k, (id, points)) in out.iter().enumerate() {
            assert_eq!(*id, k as u32);
            assert_eq!(points.len(), 11);
        }
    }
}
