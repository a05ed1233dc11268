use super::*;
use nalgebra::Vector3;
use rand::{prelude::*, rng};
use serde::{Deserialize, Serialize};
use std::ops::{Mul, Neg};
use thiserror::Error;

/// A struct representing a quaternion for 3D rotations.
///
/// The scalar part is `w`. A unit quaternion maps body-frame vectors into the
/// world frame through [`RotationTrait::rotate`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// Errors that can occur when creating a `Quaternion`.
#[derive(Debug, Clone, Error, Copy, PartialEq)]
pub enum QuaternionErrors {
    #[error("got zero magnitude quaternion")]
    ZeroMagnitude,
    #[error("got zero magnitude rotation axis")]
    ZeroAxis,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Creates a new `Quaternion` from raw components.
    ///
    /// # Arguments
    ///
    /// * `x` - The x component of the quaternion.
    /// * `y` - The y component of the quaternion.
    /// * `z` - The z component of the quaternion.
    /// * `w` - The scalar component of the quaternion.
    ///
    /// # Returns
    ///
    /// A new `Quaternion`. Not normalized; use [`Quaternion::normalize`] when a
    /// unit quaternion is required.
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    // Dot product of two quaternions
    pub fn dot(&self, other: &Quaternion) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn mag(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Returns the conjugate, which inverts the rotation for a unit quaternion.
    pub fn inv(&self) -> Quaternion {
        Quaternion::new(-self.x, -self.y, -self.z, self.w)
    }

    pub fn normalize(&self) -> Result<Self, QuaternionErrors> {
        let mag = self.mag();
        if mag < f64::EPSILON {
            return Err(QuaternionErrors::ZeroMagnitude);
        }
        Ok(Quaternion::new(
            self.x / mag,
            self.y / mag,
            self.z / mag,
            self.w / mag,
        ))
    }

    /// Rescales to unit magnitude without failing.
    ///
    /// For drift correction after products of unit quaternions, where the
    /// magnitude is already near one. A degenerate input falls back to the
    /// identity.
    pub fn renormalize(&self) -> Quaternion {
        let mag = self.mag();
        if mag < f64::EPSILON {
            return Quaternion::IDENTITY;
        }
        Quaternion::new(
            self.x / mag,
            self.y / mag,
            self.z / mag,
            self.w / mag,
        )
    }

    /// Creates a quaternion rotating by `angle` radians about `axis`.
    ///
    /// # Arguments
    ///
    /// * `axis` - The rotation axis. Does not need to be unit length.
    /// * `angle` - The rotation angle in radians.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok` containing a unit `Quaternion`, or an `Err` of
    /// `QuaternionErrors::ZeroAxis` if the axis has zero magnitude.
    pub fn from_axis_angle(axis: &Vector3<f64>, angle: f64) -> Result<Self, QuaternionErrors> {
        let mag = axis.magnitude();
        if mag < f64::EPSILON {
            return Err(QuaternionErrors::ZeroAxis);
        }
        let half = angle / 2.0;
        let s = half.sin() / mag;
        Ok(Quaternion::new(
            axis[0] * s,
            axis[1] * s,
            axis[2] * s,
            half.cos(),
        ))
    }

    /// Creates a quaternion from a rotation vector `phi` whose magnitude is the
    /// angle in radians and whose direction is the axis.
    ///
    /// A zero vector yields the identity, so this is safe inside integration
    /// loops where `phi = omega * dt` may vanish.
    pub fn from_scaled_axis(phi: &Vector3<f64>) -> Quaternion {
        let angle = phi.magnitude();
        if angle < f64::EPSILON {
            return Quaternion::IDENTITY;
        }
        let half = angle / 2.0;
        let s = half.sin() / angle;
        Quaternion::new(phi[0] * s, phi[1] * s, phi[2] * s, half.cos())
    }

    /// Creates a random unit quaternion.
    ///
    /// # Returns
    ///
    /// A random unit `Quaternion`.
    pub fn rand() -> Quaternion {
        let mut rng = rng();
        let x = rng.random_range(-1.0..1.0);
        let y = rng.random_range(-1.0..1.0);
        let z = rng.random_range(-1.0..1.0);
        let w = rng.random_range(-1.0..1.0);

        Quaternion::new(x, y, z, w)
            .normalize()
            .unwrap_or(Quaternion::IDENTITY)
    }
}

impl Default for Quaternion {
    /// Provides the default value for a quaternion.
    ///
    /// # Returns
    ///
    /// The identity quaternion.
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RotationTrait for Quaternion {
    /// Rotates a vector by the quaternion.
    /// Active rotation ("alibi"): maps body-frame vectors into the world frame
    /// for a world-from-body attitude quaternion. Expects a unit quaternion.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be rotated.
    ///
    /// # Returns
    ///
    /// The rotated vector.
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);

        let out1 = (w * w + x * x - y * y - z * z) * v[0]
            + 2.0 * (x * y - w * z) * v[1]
            + 2.0 * (x * z + w * y) * v[2];

        let out2 = 2.0 * (x * y + w * z) * v[0]
            + (w * w - x * x + y * y - z * z) * v[1]
            + 2.0 * (y * z - w * x) * v[2];

        let out3 = 2.0 * (x * z - w * y) * v[0]
            + 2.0 * (y * z + w * x) * v[1]
            + (w * w - x * x - y * y + z * z) * v[2];

        Vector3::new(out1, out2, out3)
    }

    /// Transforms a vector by the quaternion.
    /// Passive rotation ("alias"): the inverse of [`RotationTrait::rotate`],
    /// mapping world-frame vectors into the body frame.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be transformed.
    ///
    /// # Returns
    ///
    /// The transformed vector.
    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);

        let out1 = (w * w + x * x - y * y - z * z) * v[0]
            + 2.0 * (x * y + w * z) * v[1]
            + 2.0 * (x * z - w * y) * v[2];

        let out2 = 2.0 * (x * y - w * z) * v[0]
            + (w * w - x * x + y * y - z * z) * v[1]
            + 2.0 * (y * z + w * x) * v[2];

        let out3 = 2.0 * (x * z + w * y) * v[0]
            + 2.0 * (y * z - w * x) * v[1]
            + (w * w - x * x - y * y + z * z) * v[2];

        Vector3::new(out1, out2, out3)
    }

    fn identity() -> Self {
        Self::IDENTITY
    }

    fn inv(&self) -> Self {
        Quaternion::inv(self)
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;

    /// Multiplies two quaternions with the Hamilton product.
    /// Composition applies the right factor first:
    /// `(a * b).rotate(&v)` equals `a.rotate(&b.rotate(&v))`.
    ///
    /// # Arguments
    ///
    /// * `rhs` - The right-hand side quaternion.
    ///
    /// # Returns
    ///
    /// The product of the two quaternions.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl From<&RotationMatrix> for Quaternion {
    /// Converts a `RotationMatrix` to a `Quaternion` using Shepperd's method,
    /// branching on the largest diagonal term for numerical stability.
    ///
    /// # Arguments
    ///
    /// * `rotation_matrix` - The rotation matrix to be converted.
    ///
    /// # Returns
    ///
    /// The corresponding unit `Quaternion`.
    fn from(rotation_matrix: &RotationMatrix) -> Self {
        let m = rotation_matrix.matrix();
        let trace = m[(0, 0)] + m[(1, 1)] + m[(2, 2)];

        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0; // s = 4w
            Quaternion::new(
                (m[(2, 1)] - m[(1, 2)]) / s,
                (m[(0, 2)] - m[(2, 0)]) / s,
                (m[(1, 0)] - m[(0, 1)]) / s,
                0.25 * s,
            )
        } else if m[(0, 0)] > m[(1, 1)] && m[(0, 0)] > m[(2, 2)] {
            let s = (1.0 + m[(0, 0)] - m[(1, 1)] - m[(2, 2)]).sqrt() * 2.0; // s = 4x
            Quaternion::new(
                0.25 * s,
                (m[(0, 1)] + m[(1, 0)]) / s,
                (m[(0, 2)] + m[(2, 0)]) / s,
                (m[(2, 1)] - m[(1, 2)]) / s,
            )
        } else if m[(1, 1)] > m[(2, 2)] {
            let s = (1.0 + m[(1, 1)] - m[(0, 0)] - m[(2, 2)]).sqrt() * 2.0; // s = 4y
            Quaternion::new(
                (m[(0, 1)] + m[(1, 0)]) / s,
                0.25 * s,
                (m[(1, 2)] + m[(2, 1)]) / s,
                (m[(0, 2)] - m[(2, 0)]) / s,
            )
        } else {
            let s = (1.0 + m[(2, 2)] - m[(0, 0)] - m[(1, 1)]).sqrt() * 2.0; // s = 4z
            Quaternion::new(
                (m[(0, 2)] + m[(2, 0)]) / s,
                (m[(1, 2)] + m[(2, 1)]) / s,
                0.25 * s,
                (m[(1, 0)] - m[(0, 1)]) / s,
            )
        }
    }
}

impl From<&EulerAngles> for Quaternion {
    /// Converts `EulerAngles` (intrinsic Z-Y-X) to a `Quaternion`, equivalent
    /// to the product `q_yaw * q_pitch * q_roll`.
    ///
    /// # Arguments
    ///
    /// * `euler_angles` - The Euler angles to be converted.
    ///
    /// # Returns
    ///
    /// The corresponding unit `Quaternion`.
    fn from(euler_angles: &EulerAngles) -> Self {
        let (sr, cr) = (euler_angles.roll / 2.0).sin_cos();
        let (sp, cp) = (euler_angles.pitch / 2.0).sin_cos();
        let (sy, cy) = (euler_angles.yaw / 2.0).sin_cos();

        Quaternion::new(
            sr * cp * cy - cr * sp * sy,
            cr * sp * cy + sr * cp * sy,
            cr * cp * sy - sr * sp * cy,
            cr * cp * cy + sr * sp * sy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;
    const TOL: f64 = 1e-12;

    /// Test for quaternion normalization.
    #[test]
    fn test_quaternion_normalization() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0).normalize().unwrap();

        assert_abs_diff_eq!(q.x, 0.18257418583505536, epsilon = TOL);
        assert_abs_diff_eq!(q.y, 0.3651483716701107, epsilon = TOL);
        assert_abs_diff_eq!(q.z, 0.5477225575051661, epsilon = TOL);
        assert_abs_diff_eq!(q.w, 0.7302967433402214, epsilon = TOL);
        assert_abs_diff_eq!(q.mag(), 1.0, epsilon = TOL);
    }

    #[test]
    fn test_zero_magnitude_errors() {
        assert_eq!(
            Quaternion::new(0.0, 0.0, 0.0, 0.0).normalize(),
            Err(QuaternionErrors::ZeroMagnitude)
        );
        assert_eq!(
            Quaternion::from_axis_angle(&Vector3::zeros(), 1.0),
            Err(QuaternionErrors::ZeroAxis)
        );
    }

    /// Test for rotation of a vector about the z axis.
    #[test]
    fn test_quaternion_rotate() {
        let q = Quaternion::from_axis_angle(&Vector3::z(), PI / 2.0).unwrap();
        let v = q.rotate(&Vector3::x());

        assert_abs_diff_eq!(v[0], 0.0, epsilon = TOL);
        assert_abs_diff_eq!(v[1], 1.0, epsilon = TOL);
        assert_abs_diff_eq!(v[2], 0.0, epsilon = TOL);
    }

    /// Test that transform inverts rotate.
    #[test]
    fn test_quaternion_transform_is_inverse() {
        let q = Quaternion::rand();
        let v = Vector3::new(0.3, -1.2, 2.5);
        let back = q.transform(&q.rotate(&v));

        assert_abs_diff_eq!(back[0], v[0], epsilon = TOL);
        assert_abs_diff_eq!(back[1], v[1], epsilon = TOL);
        assert_abs_diff_eq!(back[2], v[2], epsilon = TOL);
    }

    /// Test the composition order of the Hamilton product.
    #[test]
    fn test_quaternion_composition() {
        let a = Quaternion::from_axis_angle(&Vector3::z(), 0.7).unwrap();
        let b = Quaternion::from_axis_angle(&Vector3::x(), -0.4).unwrap();
        let v = Vector3::new(1.0, 2.0, 3.0);

        let composed = (a * b).rotate(&v);
        let sequential = a.rotate(&b.rotate(&v));

        assert_abs_diff_eq!(composed[0], sequential[0], epsilon = TOL);
        assert_abs_diff_eq!(composed[1], sequential[1], epsilon = TOL);
        assert_abs_diff_eq!(composed[2], sequential[2], epsilon = TOL);
    }

    #[test]
    fn test_quaternion_inv_round_trip() {
        let q = Quaternion::rand();
        let qi = q * q.inv();

        assert_abs_diff_eq!(qi.x, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(qi.y, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(qi.z, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(qi.w.abs(), 1.0, epsilon = TOL);
    }

    /// Test the scaled axis constructor against axis-angle and at zero.
    #[test]
    fn test_from_scaled_axis() {
        let phi = Vector3::new(0.0, 0.0, PI / 2.0);
        let q = Quaternion::from_scaled_axis(&phi);
        let expected = Quaternion::from_axis_angle(&Vector3::z(), PI / 2.0).unwrap();

        assert_abs_diff_eq!(q.x, expected.x, epsilon = TOL);
        assert_abs_diff_eq!(q.y, expected.y, epsilon = TOL);
        assert_abs_diff_eq!(q.z, expected.z, epsilon = TOL);
        assert_abs_diff_eq!(q.w, expected.w, epsilon = TOL);

        let q0 = Quaternion::from_scaled_axis(&Vector3::zeros());
        assert_eq!(q0, Quaternion::IDENTITY);
    }

    #[test]
    fn test_renormalize_drift() {
        let q = Quaternion::new(0.0, 0.0, 0.0, 1.0 + 1e-9).renormalize();
        assert_abs_diff_eq!(q.mag(), 1.0, epsilon = TOL);

        let degenerate = Quaternion::new(0.0, 0.0, 0.0, 0.0).renormalize();
        assert_eq!(degenerate, Quaternion::IDENTITY);
    }

    /// Test matrix round trip through Shepperd's method on all branches.
    #[test]
    fn test_matrix_round_trip() {
        let cases = [
            Quaternion::from_axis_angle(&Vector3::z(), 0.3).unwrap(),
            // near-pi rotations exercise the off-trace branches
            Quaternion::from_axis_angle(&Vector3::x(), PI - 1e-3).unwrap(),
            Quaternion::from_axis_angle(&Vector3::y(), PI - 1e-3).unwrap(),
            Quaternion::from_axis_angle(&Vector3::new(1.0, 1.0, 0.2), PI - 1e-3).unwrap(),
        ];
        for q in cases {
            let m = RotationMatrix::from(&q);
            let q2 = Quaternion::from(&m);
            // q and -q are the same rotation
            assert_abs_diff_eq!(q.dot(&q2).abs(), 1.0, epsilon = 1e-9);
        }
    }
}
