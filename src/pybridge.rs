//! Python bindings via PyO3 for orbatt.
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::constants::MU_EARTH;
use crate::elements::{AnomalyKind, OrbitalElements};
use crate::error::Error;
use crate::geometry::Mat3;
use crate::quaternion::Quaternion;
use crate::{frames, kepler, maneuver, relative, rotation, state};

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn matrix_rows(m: &Mat3) -> Vec<Vec<f64>> {
    m.iter().map(|row| row.to_vec()).collect()
}

// OrbitalElements
#[pyclass(name = "OrbitalElements")]
#[derive(Clone)]
pub struct PyOrbitalElements {
    pub(crate) inner: OrbitalElements,
}

#[pymethods]
impl PyOrbitalElements {
    /// Build from degrees; `anomaly_kind` is "TRUE" or "MEAN".
    #[new]
    #[pyo3(signature = (sma, ecc, inc, aop, raan, anomaly, anomaly_kind="TRUE"))]
    fn new(
        sma: f64,
        ecc: f64,
        inc: f64,
        aop: f64,
        raan: f64,
        anomaly: f64,
        anomaly_kind: &str,
    ) -> PyResult<Self> {
        let kind: AnomalyKind = anomaly_kind.parse()?;
        let inner = OrbitalElements::with_anomaly(sma, ecc, inc, aop, raan, anomaly, kind)?;
        Ok(PyOrbitalElements { inner })
    }

    #[pyo3(signature = (mu=MU_EARTH))]
    fn period(&self, mu: f64) -> f64 {
        self.inner.period(mu)
    }

    #[pyo3(signature = (dt, mu=MU_EARTH))]
    fn propagate(&self, dt: f64, mu: f64) -> PyResult<Self> {
        Ok(PyOrbitalElements { inner: self.inner.propagate(dt, mu)? })
    }

    /// Cartesian state [x,y,z,vx,vy,vz] in km and km/s.
    #[pyo3(signature = (mu=MU_EARTH))]
    fn to_cartesian(&self, mu: f64) -> PyResult<Vec<f64>> {
        Ok(self.inner.to_cartesian(mu)?.state().to_vec())
    }

    #[pyo3(signature = (with_mean_anomaly=false, radians=false))]
    fn as_array(&self, with_mean_anomaly: bool, radians: bool) -> Vec<f64> {
        self.inner.as_array(with_mean_anomaly, radians).to_vec()
    }

    #[getter] fn sma(&self) -> f64 { self.inner.sma() }
    #[getter] fn ecc(&self) -> f64 { self.inner.ecc() }
    #[getter] fn inc(&self) -> f64 { self.inner.inc() }
    #[getter] fn aop(&self) -> f64 { self.inner.aop() }
    #[getter] fn raan(&self) -> f64 { self.inner.raan() }
    #[getter] fn ta(&self) -> f64 { self.inner.ta() }
    #[getter] fn ma(&self) -> f64 { self.inner.ma() }

    fn __repr__(&self) -> String {
        format!("{}", self.inner)
    }
}

// Quaternion
#[pyclass(name = "Quaternion")]
#[derive(Clone)]
pub struct PyQuaternion {
    inner: Quaternion,
}

#[pymethods]
impl PyQuaternion {
    #[new]
    fn new(real: f64, i: f64, j: f64, k: f64) -> Self {
        PyQuaternion { inner: Quaternion::new(real, i, j, k) }
    }

    #[staticmethod]
    fn from_angle_axis(angle: f64, axis: Vec<f64>) -> PyResult<Self> {
        Ok(PyQuaternion { inner: rotation::from_angle_axis(angle, &axis)? })
    }

    #[staticmethod]
    fn from_rotation_matrix(matrix: Vec<Vec<f64>>) -> PyResult<Self> {
        Ok(PyQuaternion { inner: rotation::from_rotation_matrix_rows(&matrix)? })
    }

    #[staticmethod]
    fn from_angles(angles: Vec<f64>, rot_order: &str) -> PyResult<Self> {
        Ok(PyQuaternion { inner: rotation::from_angles(&angles, rot_order)? })
    }

    fn rotate(&self, v: Vec<f64>) -> PyResult<Vec<f64>> {
        Ok(self.inner.rotate(&v)?.to_vec())
    }

    fn to_rotation_matrix(&self) -> Vec<Vec<f64>> {
        matrix_rows(&rotation::to_rotation_matrix(&self.inner))
    }

    fn to_angle_axis(&self) -> (f64, Vec<f64>) {
        let (angle, axis) = rotation::to_angle_axis(&self.inner);
        (angle, axis.to_vec())
    }

    /// Returns (angles, alternate_angles) in radians.
    fn to_angles(&self, rot_order: &str) -> PyResult<(Vec<f64>, Vec<f64>)> {
        let (angles, alternate) = rotation::to_angles(&self.inner, rot_order)?;
        Ok((angles.angles.to_vec(), alternate.angles.to_vec()))
    }

    fn conjugate(&self) -> Self {
        PyQuaternion { inner: self.inner.conjugate() }
    }

    fn unit(&self) -> Self {
        PyQuaternion { inner: self.inner.unit() }
    }

    fn norm(&self) -> f64 {
        self.inner.norm()
    }

    fn canonical(&self) -> Self {
        PyQuaternion { inner: self.inner.canonical() }
    }

    #[pyo3(signature = (other, eps=1e-10))]
    fn same_rotation(&self, other: &PyQuaternion, eps: f64) -> bool {
        self.inner.same_rotation(&other.inner, eps)
    }

    fn __mul__(&self, other: &PyQuaternion) -> Self {
        PyQuaternion { inner: self.inner * other.inner }
    }

    fn __add__(&self, other: &PyQuaternion) -> Self {
        PyQuaternion { inner: self.inner + other.inner }
    }

    fn __sub__(&self, other: &PyQuaternion) -> Self {
        PyQuaternion { inner: self.inner - other.inner }
    }

    fn __neg__(&self) -> Self {
        PyQuaternion { inner: -self.inner }
    }

    fn __eq__(&self, other: &PyQuaternion) -> bool {
        self.inner == other.inner
    }

    #[getter] fn real(&self) -> f64 { self.inner.real() }
    #[getter] fn i(&self) -> f64 { self.inner.i() }
    #[getter] fn j(&self) -> f64 { self.inner.j() }
    #[getter] fn k(&self) -> f64 { self.inner.k() }

    fn __repr__(&self) -> String {
        format!("{}", self.inner)
    }
}

// Free functions
/// Keplerian elements (radians) to [x,y,z,vx,vy,vz].
#[pyfunction]
#[pyo3(signature = (sma, ecc, inc, aop, raan, ma, mu=MU_EARTH))]
fn kep_to_car(sma: f64, ecc: f64, inc: f64, aop: f64, raan: f64, ma: f64, mu: f64) -> PyResult<Vec<f64>> {
    Ok(state::kep_to_car(sma, ecc, inc, aop, raan, ma, mu)?.state().to_vec())
}

#[pyfunction]
#[pyo3(signature = (kep_a, kep_b, mu=MU_EARTH))]
fn delta_tnw_between(kep_a: Vec<f64>, kep_b: Vec<f64>, mu: f64) -> PyResult<Vec<f64>> {
    Ok(relative::delta_tnw_between(&kep_a, &kep_b, mu)?.to_vec())
}

#[pyfunction]
fn to_tnw(state: Vec<f64>) -> PyResult<Vec<Vec<f64>>> {
    Ok(matrix_rows(&frames::to_tnw(&state)?))
}

#[pyfunction]
fn to_lvlh(state: Vec<f64>) -> PyResult<Vec<Vec<f64>>> {
    Ok(matrix_rows(&frames::to_lvlh(&state)?))
}

#[pyfunction]
fn delta_v(isp: f64, initial_mass: f64, final_mass: f64) -> PyResult<f64> {
    Ok(maneuver::delta_v(isp, initial_mass, final_mass)?)
}

#[pyfunction]
fn eccentric_from_mean(e: f64, mean_anomaly: f64) -> f64 {
    kepler::eccentric_from_mean(e, mean_anomaly)
}

#[pyfunction]
fn true_from_mean(e: f64, mean_anomaly: f64) -> f64 {
    kepler::true_from_mean(e, mean_anomaly)
}

#[pyfunction]
fn mean_from_true(e: f64, true_anomaly: f64) -> f64 {
    kepler::mean_from_true(e, true_anomaly)
}

// Module registration
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyOrbitalElements>()?;
    m.add_class::<PyQuaternion>()?;
    m.add_function(wrap_pyfunction!(kep_to_car, m)?)?;
    m.add_function(wrap_pyfunction!(delta_tnw_between, m)?)?;
    m.add_function(wrap_pyfunction!(to_tnw, m)?)?;
    m.add_function(wrap_pyfunction!(to_lvlh, m)?)?;
    m.add_function(wrap_pyfunction!(delta_v, m)?)?;
    m.add_function(wrap_pyfunction!(eccentric_from_mean, m)?)?;
    m.add_function(wrap_pyfunction!(true_from_mean, m)?)?;
    m.add_function(wrap_pyfunction!(mean_from_true, m)?)?;
    Ok(())
}
