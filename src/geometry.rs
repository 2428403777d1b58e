//! Small fixed-size vector and matrix helpers.
//!
//! Vectors are `[f64; 3]` and matrices are row-major `[[f64; 3]; 3]`.

use crate::error::{check_len, Result};

pub type Vec3 = [f64; 3];
pub type Mat3 = [[f64; 3]; 3];

pub const IDENTITY: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn norm(a: &Vec3) -> f64 {
    dot(a, a).sqrt()
}

pub fn scale(a: &Vec3, k: f64) -> Vec3 {
    [a[0] * k, a[1] * k, a[2] * k]
}

pub fn sub(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// `a * ka + b * kb`.
pub fn add_scaled(a: &Vec3, ka: f64, b: &Vec3, kb: f64) -> Vec3 {
    [
        a[0] * ka + b[0] * kb,
        a[1] * ka + b[1] * kb,
        a[2] * ka + b[2] * kb,
    ]
}

/// `v / |v|`. A zero vector yields NaNs.
pub fn unit_vector(v: &Vec3) -> Vec3 {
    scale(v, 1.0 / norm(v))
}

/// Angle between two vectors (rad), in [0, π].
pub fn angle_between(a: &Vec3, b: &Vec3) -> f64 {
    dot(&unit_vector(a), &unit_vector(b)).clamp(-1.0, 1.0).acos()
}

/// `m · v`.
pub fn mat_vec(m: &Mat3, v: &Vec3) -> Vec3 {
    [dot(&m[0], v), dot(&m[1], v), dot(&m[2], v)]
}

pub fn transpose(m: &Mat3) -> Mat3 {
    let mut t = [[0.0; 3]; 3];
    for (i, row) in m.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            t[j][i] = *value;
        }
    }
    t
}

/// `a · b`.
pub fn mat_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let bt = transpose(b);
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = dot(&a[i], &bt[j]);
        }
    }
    out
}

/// Copy a length-3 slice into a vector.
pub fn to_vec3(what: &'static str, values: &[f64]) -> Result<Vec3> {
    check_len(what, values, 3)?;
    Ok([values[0], values[1], values[2]])
}

/// Copy a 3×3 nested slice into a matrix.
pub fn to_mat3(rows: &[Vec<f64>]) -> Result<Mat3> {
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    check_len("rotation matrix", &flat, 9)?;
    let mut m = [[0.0; 3]; 3];
    for (i, row) in rows.iter().enumerate() {
        m[i] = to_vec3("rotation matrix row", row)?;
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;

    #[test]
    fn test_cross_right_handed() {
        assert_eq!(cross(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross(&[0.0, 0.0, 1.0], &[1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unit_vector_and_angle() {
        let u = unit_vector(&[3.0, 0.0, 4.0]);
        assert_relative_eq!(norm(&u), 1.0);
        assert_relative_eq!(u[2], 0.8);
        assert_relative_eq!(
            angle_between(&[1.0, 0.0, 0.0], &[1.0, 1.0, 0.0]),
            std::f64::consts::FRAC_PI_4
        );
        assert_eq!(angle_between(&[2.0, 0.0, 0.0], &[-1.0, 0.0, 0.0]), std::f64::consts::PI);
    }

    #[test]
    fn test_matrix_helpers() {
        let m = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        assert_eq!(transpose(&m)[0], [1.0, 4.0, 7.0]);
        assert_eq!(mat_mul(&m, &IDENTITY), m);
        assert_eq!(mat_vec(&m, &[1.0, 0.0, -1.0]), [-2.0, -2.0, -2.0]);
    }

    #[test]
    fn test_shape_checks() {
        assert!(matches!(
            to_vec3("axis", &[1.0, 2.0]),
            Err(Error::Shape { expected: 3, got: 2, .. })
        ));
        let rows = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]];
        assert!(to_mat3(&rows).is_err());
        let ragged = vec![vec![1.0, 0.0], vec![0.0, 1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0]];
        assert!(to_mat3(&ragged).is_err());
    }
}
