//! Conversions between quaternions and other attitude representations:
//! direction cosine matrices, angle-axis pairs and three-angle sequences.
//!
//! # Matrix convention
//!
//! [`to_rotation_matrix`] returns the transpose of the usual active rotation
//! matrix of `q`. For a vector `v` given by its components in the original
//! frame, `M · v` gives its components in the frame obtained by rotating the
//! original one by `q`. Equivalently `M · v == q.conjugate().rotate(v)` and
//! `Mᵀ · v == q.rotate(v)`. [`from_rotation_matrix`] is the inverse under
//! the same convention.
//!
//! # Angle sequences
//!
//! A sequence `"abc"` of axes means `q = R(θ1, a) · R(θ2, b) · R(θ3, c)`
//! (Hamilton products of axis rotations). Cardan sequences use three
//! distinct axes (second angle in [-π/2, π/2]), Euler sequences repeat the
//! first axis (second angle in [0, π]). Every rotation has two angle
//! triples; [`to_angles`] returns both. At gimbal lock the third angle is
//! set to zero and the whole rotation is carried by the first.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::{round_to_decimals, GIMBAL_LOCK_THRESHOLD};
use crate::error::Result;
use crate::frames::{Axis, RotationKind, RotationOrder};
use crate::geometry::{to_mat3, to_vec3, Mat3, Vec3};
use crate::quaternion::Quaternion;

/// Three rotation angles (rad) applied along `order`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleSet {
    pub angles: [f64; 3],
    pub order: RotationOrder,
}

impl AngleSet {
    pub fn to_quaternion(&self) -> Quaternion {
        compose(&self.angles, &self.order)
    }
}

/// Quaternion → rotation matrix, rounded to 10 decimals. See the module
/// docs for the convention.
pub fn to_rotation_matrix(q: &Quaternion) -> Mat3 {
    let u = q.unit();
    let (q1, q2, q3, q4) = (u.i(), u.j(), u.k(), u.real());
    let (q1s, q2s, q3s, q4s) = (q1 * q1, q2 * q2, q3 * q3, q4 * q4);

    // Already transposed
    let m = [
        [
            q1s - q2s - q3s + q4s,
            2.0 * (q1 * q2 + q3 * q4),
            2.0 * (q1 * q3 - q2 * q4),
        ],
        [
            2.0 * (q1 * q2 - q3 * q4),
            -q1s + q2s - q3s + q4s,
            2.0 * (q2 * q3 + q1 * q4),
        ],
        [
            2.0 * (q1 * q3 + q2 * q4),
            2.0 * (q2 * q3 - q1 * q4),
            -q1s - q2s + q3s + q4s,
        ],
    ];
    m.map(|row| row.map(round_to_decimals))
}

/// Rotation matrix → quaternion.
///
/// Four candidate pivots are computed from the diagonal and the largest is
/// used as divisor, so no branch divides by a value close to zero. A matrix
/// for which no pivot is positive (only possible with non-finite entries)
/// maps to the identity.
pub fn from_rotation_matrix(a: &Mat3) -> Quaternion {
    let (a11, a22, a33) = (a[0][0], a[1][1], a[2][2]);
    let ccc = [
        a11 - a22 - a33,
        a22 - a33 - a11,
        a33 - a11 - a22,
        a11 + a22 + a33,
    ];
    let v = ccc.map(|c| (1.0 + c).max(0.0).sqrt());

    let mut pivot = 0;
    for (idx, value) in v.iter().enumerate() {
        if *value > v[pivot] {
            pivot = idx;
        }
    }
    let v_max = v[pivot];
    if v_max == 0.0 {
        log::debug!("No positive pivot in rotation matrix {a:?}, using identity");
        return Quaternion::identity();
    }

    let half = v_max / 2.0;
    let d = 2.0 * v_max;
    let (q1, q2, q3, q4) = match pivot {
        0 => (
            half,
            (a[0][1] + a[1][0]) / d,
            (a[0][2] + a[2][0]) / d,
            (a[1][2] - a[2][1]) / d,
        ),
        1 => (
            (a[0][1] + a[1][0]) / d,
            half,
            (a[1][2] + a[2][1]) / d,
            (a[2][0] - a[0][2]) / d,
        ),
        2 => (
            (a[0][2] + a[2][0]) / d,
            (a[1][2] + a[2][1]) / d,
            half,
            (a[0][1] - a[1][0]) / d,
        ),
        _ => (
            (a[1][2] - a[2][1]) / d,
            (a[2][0] - a[0][2]) / d,
            (a[0][1] - a[1][0]) / d,
            half,
        ),
    };
    Quaternion::new(q4, q1, q2, q3)
}

/// [`from_rotation_matrix`] for a nested, unchecked input.
pub fn from_rotation_matrix_rows(rows: &[Vec<f64>]) -> Result<Quaternion> {
    Ok(from_rotation_matrix(&to_mat3(rows)?))
}

/// Rotation of `angle` (rad) about `axis`. The axis need not be unit length.
///
/// ```
/// use orbatt::rotation::from_angle_axis;
///
/// let q = from_angle_axis(std::f64::consts::PI, &[0.0, 0.0, 2.0]).unwrap();
/// assert!(q.real().abs() < 1e-15);
/// assert_eq!(q.k(), 1.0);
/// ```
pub fn from_angle_axis(angle: f64, axis: &[f64]) -> Result<Quaternion> {
    let axis = to_vec3("rotation axis", axis)?;
    Ok(axis_rotation(angle, &axis))
}

fn axis_rotation(angle: f64, axis: &Vec3) -> Quaternion {
    let n = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    let (s, c) = (angle / 2.0).sin_cos();
    Quaternion::new(c, s * axis[0] / n, s * axis[1] / n, s * axis[2] / n)
}

/// Rotation angle (rad, in [0, 2π]) and unit axis of `q`.
///
/// The axis is undefined for the null rotation: a quaternion with real
/// part ±1 yields NaN axis components.
pub fn to_angle_axis(q: &Quaternion) -> (f64, Vec3) {
    let u = q.unit();
    let real = u.real().clamp(-1.0, 1.0);
    let angle = 2.0 * real.acos();
    let s = (1.0 - real * real).sqrt();
    (angle, u.imag().map(|c| c / s))
}

/// Angles of `q` along the order given as a string such as `"zxz"`.
///
/// Returns the primary triple and the alternate one describing the same
/// rotation.
///
/// ```
/// use orbatt::rotation::{from_angle_axis, to_angles};
///
/// let q = from_angle_axis(std::f64::consts::FRAC_PI_2, &[1.0, 0.0, 0.0]).unwrap();
/// let (angles, _) = to_angles(&q, "xyz").unwrap();
/// assert!((angles.angles[0] - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
/// ```
pub fn to_angles(q: &Quaternion, order: &str) -> Result<(AngleSet, AngleSet)> {
    let order: RotationOrder = order.parse()?;
    angles_along(q, order)
}

/// [`to_angles`] for an already parsed order.
pub fn angles_along(q: &Quaternion, order: RotationOrder) -> Result<(AngleSet, AngleSet)> {
    let [n1, n2, n3] = order.indices();
    // +1 when (n1, n2) is a cyclic pair (x→y, y→z, z→x)
    let s = if (n2 + 3 - n1) % 3 == 1 { 1.0 } else { -1.0 };

    let (angles, alternate) = match order.kind()? {
        RotationKind::Cardan => {
            let x3 = q.rotate_vec(&Axis::from_index(n3).unit());
            let angles = if x3[n1].abs() < GIMBAL_LOCK_THRESHOLD {
                let x1r = q.conjugate().rotate_vec(&Axis::from_index(n1).unit());
                [
                    (-s * x3[n2]).atan2(x3[n3]),
                    (s * x3[n1]).asin(),
                    (-s * x1r[n2]).atan2(x1r[n1]),
                ]
            } else {
                log::debug!("Gimbal lock extracting {order} angles, third angle set to 0");
                let x2 = q.rotate_vec(&Axis::from_index(n2).unit());
                [
                    (s * x2[n3]).atan2(x2[n2]),
                    (s * x3[n1]).clamp(-1.0, 1.0).asin(),
                    0.0,
                ]
            };
            let middle = if angles[1] < 0.0 { -PI - angles[1] } else { PI - angles[1] };
            (angles, [half_turn(angles[0]), middle, half_turn(angles[2])])
        }
        RotationKind::Euler => {
            let m = 3 - n1 - n2;
            let x1 = q.rotate_vec(&Axis::from_index(n1).unit());
            let angles = if x1[n1].abs() < GIMBAL_LOCK_THRESHOLD {
                let x1r = q.conjugate().rotate_vec(&Axis::from_index(n1).unit());
                [
                    x1[n2].atan2(-s * x1[m]),
                    x1[n1].acos(),
                    x1r[n2].atan2(s * x1r[m]),
                ]
            } else {
                log::debug!("Gimbal lock extracting {order} angles, third angle set to 0");
                let x2 = q.rotate_vec(&Axis::from_index(n2).unit());
                [
                    (s * x2[m]).atan2(x2[n2]),
                    x1[n1].clamp(-1.0, 1.0).acos(),
                    0.0,
                ]
            };
            (angles, [half_turn(angles[0]), -angles[1], half_turn(angles[2])])
        }
    };

    Ok((
        AngleSet { angles, order },
        AngleSet {
            angles: alternate,
            order,
        },
    ))
}

/// Shift an angle by π towards zero.
fn half_turn(a: f64) -> f64 {
    if a < 0.0 {
        a + PI
    } else {
        a - PI
    }
}

/// Quaternion from three angles (rad) along `order`.
///
/// Any three-letter order composes; degenerate orders like `"xxy"` are
/// accepted here even though [`to_angles`] cannot invert them.
pub fn from_angles(angles: &[f64], order: &str) -> Result<Quaternion> {
    let angles = to_vec3("angles", angles)?;
    let order: RotationOrder = order.parse()?;
    Ok(compose(&angles, &order))
}

fn compose(angles: &Vec3, order: &RotationOrder) -> Quaternion {
    let [a, b, c] = order.axes;
    axis_rotation(angles[0], &a.unit())
        * axis_rotation(angles[1], &b.unit())
        * axis_rotation(angles[2], &c.unit())
}

impl Quaternion {
    /// See [`from_angle_axis`].
    pub fn from_angle_axis(angle: f64, axis: &[f64]) -> Result<Self> {
        from_angle_axis(angle, axis)
    }

    /// See [`to_angle_axis`].
    pub fn to_angle_axis(&self) -> (f64, Vec3) {
        to_angle_axis(self)
    }

    /// See [`to_rotation_matrix`].
    pub fn to_rotation_matrix(&self) -> Mat3 {
        to_rotation_matrix(self)
    }

    /// See [`from_rotation_matrix`].
    pub fn from_rotation_matrix(m: &Mat3) -> Self {
        from_rotation_matrix(m)
    }

    /// See [`to_angles`].
    pub fn to_angles(&self, order: &str) -> Result<(AngleSet, AngleSet)> {
        to_angles(self, order)
    }

    /// See [`from_angles`].
    pub fn from_angles(angles: &[f64], order: &str) -> Result<Self> {
        from_angles(angles, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::{mat_vec, transpose};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::f64::consts::FRAC_PI_2;

    const ORDERS: [&str; 12] = [
        "xyz", "xzy", "yxz", "yzx", "zxy", "zyx", "xyx", "xzx", "yxy", "yzy", "zxz", "zyz",
    ];

    const ROT_IN_TO_TNW: Mat3 = [
        [-1.0, 5.3028761936245346e-17, 3.0616169978683824e-17],
        [-6.123233995736767e-17, -0.8660254037844388, -0.5],
        [-4.009074440407614e-33, -0.5, 0.8660254037844388],
    ];

    fn random_unit(rng: &mut ChaCha8Rng) -> Quaternion {
        let mut c = [0.0; 4];
        for x in c.iter_mut() {
            *x = rng.gen::<f64>() * 2.0 - 1.0;
        }
        Quaternion::from_slice(&c).unwrap().unit()
    }

    fn assert_angles(got: &[f64; 3], want: &[f64; 3]) {
        for (g, w) in got.iter().zip(want.iter()) {
            assert_abs_diff_eq!(*g, *w, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_from_angle_axis_reference() {
        let q = from_angle_axis(PI / 4.0, &[10.0, 45.0, 77.0]).unwrap();
        let expected = Quaternion::new(0.9238795, 0.0426416, 0.1918874, 0.3283406);
        assert_abs_diff_eq!(q, expected, epsilon = 1e-7);
        assert!(matches!(
            from_angle_axis(1.0, &[1.0, 0.0]),
            Err(Error::Shape { expected: 3, got: 2, .. })
        ));
    }

    #[test]
    fn test_angle_axis_round_trip() {
        let q = from_angle_axis(1.2, &[1.0, -2.0, 0.5]).unwrap();
        let (angle, axis) = to_angle_axis(&q);
        assert_relative_eq!(angle, 1.2, epsilon = 1e-12);
        let n = (1.0f64 + 4.0 + 0.25).sqrt();
        assert_relative_eq!(axis[0], 1.0 / n, epsilon = 1e-12);
        assert_relative_eq!(axis[1], -2.0 / n, epsilon = 1e-12);
        assert_relative_eq!(axis[2], 0.5 / n, epsilon = 1e-12);

        let (zero, undefined) = to_angle_axis(&Quaternion::identity());
        assert_eq!(zero, 0.0);
        assert!(undefined.iter().all(|c| c.is_nan()));
    }

    #[test]
    fn test_quarter_turn_about_x() {
        let q = from_angle_axis(FRAC_PI_2, &[1.0, 0.0, 0.0]).unwrap();
        let h = std::f64::consts::FRAC_PI_4;
        assert_abs_diff_eq!(q, Quaternion::new(h.cos(), h.sin(), 0.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_angle_axis_round_trip_random() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        for _ in 0..200 {
            let q = random_unit(&mut rng);
            let (angle, axis) = to_angle_axis(&q);
            let back = from_angle_axis(angle, &axis).unwrap();
            assert_abs_diff_eq!(back, q, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_matrix_to_quaternion_reference() {
        let q = from_rotation_matrix(&ROT_IN_TO_TNW);
        let expected = Quaternion::new(2.957e-17, 7.924e-18, -0.2588190, 0.9659258);
        assert_abs_diff_eq!(q, expected, epsilon = 1e-7);

        let m = to_rotation_matrix(&q);
        for (row, want) in m.iter().zip(ROT_IN_TO_TNW.iter()) {
            for (a, b) in row.iter().zip(want.iter()) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_matrix_convention() {
        let q = from_angle_axis(FRAC_PI_2, &[0.0, 0.0, 1.0]).unwrap();
        let m = to_rotation_matrix(&q);
        assert_eq!(m, [[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);

        let v = [0.3, -1.2, 2.0];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let q = random_unit(&mut rng);
            let m = to_rotation_matrix(&q);
            let passive = mat_vec(&m, &v);
            let active = mat_vec(&transpose(&m), &v);
            let by_conj = q.conjugate().rotate(&v).unwrap();
            let by_q = q.rotate(&v).unwrap();
            for k in 0..3 {
                assert_abs_diff_eq!(passive[k], by_conj[k], epsilon = 1e-8);
                assert_abs_diff_eq!(active[k], by_q[k], epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_matrix_round_trip_every_pivot() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..200 {
            let q = random_unit(&mut rng);
            let back = from_rotation_matrix(&to_rotation_matrix(&q));
            assert!(back.same_rotation(&q, 1e-8), "{q} -> {back}");
        }
        // Half turns force each of the three imaginary pivots
        for axis in [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]] {
            let q = from_angle_axis(PI, &axis).unwrap();
            assert!(from_rotation_matrix(&to_rotation_matrix(&q)).same_rotation(&q, 1e-9));
        }
    }

    #[test]
    fn test_matrix_degenerate_and_shape() {
        let nan = [[f64::NAN; 3]; 3];
        assert_eq!(from_rotation_matrix(&nan), Quaternion::identity());

        let rows = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]];
        assert!(matches!(
            from_rotation_matrix_rows(&rows),
            Err(Error::Shape { .. })
        ));
        let ok = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]];
        assert_eq!(from_rotation_matrix_rows(&ok).unwrap(), Quaternion::identity());
    }

    #[test]
    fn test_zxz_principal_rotations() {
        let about_x = from_angle_axis(FRAC_PI_2, &[1.0, 0.0, 0.0]).unwrap();
        let (a, alt) = to_angles(&about_x, "zxz").unwrap();
        assert_angles(&a.angles, &[0.0, FRAC_PI_2, 0.0]);
        assert_angles(&alt.angles, &[-PI, -FRAC_PI_2, -PI]);

        let about_y = from_angle_axis(FRAC_PI_2, &[0.0, 1.0, 0.0]).unwrap();
        let (a, alt) = to_angles(&about_y, "zxz").unwrap();
        assert_angles(&a.angles, &[FRAC_PI_2, FRAC_PI_2, -FRAC_PI_2]);
        assert_angles(&alt.angles, &[-FRAC_PI_2, -FRAC_PI_2, FRAC_PI_2]);
    }

    #[test]
    fn test_gimbal_lock_sets_third_angle_to_zero() {
        let about_z = from_angle_axis(FRAC_PI_2, &[0.0, 0.0, 1.0]).unwrap();
        let (a, alt) = to_angles(&about_z, "zxz").unwrap();
        assert_angles(&a.angles, &[FRAC_PI_2, 0.0, 0.0]);
        assert_angles(&alt.angles, &[-FRAC_PI_2, 0.0, -PI]);
        assert!(a.to_quaternion().same_rotation(&about_z, 1e-9));

        let pitched = from_angles(&[0.4, FRAC_PI_2, 0.0], "xyz").unwrap();
        let (c, c_alt) = to_angles(&pitched, "xyz").unwrap();
        assert_eq!(c.angles[2], 0.0);
        assert!(c.angles.iter().all(|x| x.is_finite()));
        assert!(c.to_quaternion().same_rotation(&pitched, 1e-6));
        assert!(c_alt.to_quaternion().same_rotation(&pitched, 1e-6));
    }

    #[test]
    fn test_xyz_reference() {
        let q = from_angle_axis(PI / 4.0, &[10.0, 45.0, 77.0]).unwrap();
        let (a, alt) = to_angles(&q, "xyz").unwrap();
        assert_angles(
            &a.angles,
            &[-0.051127215025036025, 0.39256933951356465, 0.6931113779446509],
        );
        assert_angles(
            &alt.angles,
            &[3.090465438564757, 2.7490233140762284, -2.4484812756451424],
        );
    }

    #[test]
    fn test_angles_round_trip_all_orders() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for order in ORDERS {
            for _ in 0..200 {
                let q = random_unit(&mut rng);
                let (a, alt) = to_angles(&q, order).unwrap();
                let back = from_angles(&a.angles, order).unwrap();
                let back_alt = alt.to_quaternion();
                assert!(back.same_rotation(&q, 1e-8), "{order}: {q} -> {back}");
                assert!(back_alt.same_rotation(&q, 1e-8), "{order} alt: {q} -> {back_alt}");
            }
        }
    }

    #[test]
    fn test_angle_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            let q = random_unit(&mut rng);
            let (cardan, _) = to_angles(&q, "zyx").unwrap();
            assert!(cardan.angles[1].abs() <= FRAC_PI_2);
            let (euler, _) = to_angles(&q, "zyz").unwrap();
            assert!((0.0..=PI).contains(&euler.angles[1]));
        }
    }

    #[test]
    fn test_invalid_orders() {
        let q = Quaternion::identity();
        assert!(matches!(to_angles(&q, "xxy"), Err(Error::DegenerateRotationOrder(_))));
        assert!(matches!(to_angles(&q, "xy"), Err(Error::DegenerateRotationOrder(_))));
        assert!(matches!(to_angles(&q, "xya"), Err(Error::UnknownAxis('a'))));
        assert!(from_angles(&[0.1, 0.2], "xyz").is_err());
        // Composition itself does not need a valid sequence
        let q = from_angles(&[0.1, 0.2, 0.3], "xxy").unwrap();
        assert_relative_eq!(q.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quaternion_methods_delegate() {
        let q = Quaternion::from_angle_axis(0.7, &[0.0, 1.0, 1.0]).unwrap();
        assert_eq!(q.to_rotation_matrix(), to_rotation_matrix(&q));
        assert_eq!(
            Quaternion::from_rotation_matrix(&q.to_rotation_matrix()),
            from_rotation_matrix(&to_rotation_matrix(&q))
        );
        let (a, _) = q.to_angles("YZX").unwrap();
        assert!(Quaternion::from_angles(&a.angles, "yzx").unwrap().same_rotation(&q, 1e-8));
    }
}
