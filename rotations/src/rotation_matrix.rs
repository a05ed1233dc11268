use super::*;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::Mul;
use thiserror::Error;

const ORTHONORMAL_TOL: f64 = 1e-6;

/// Errors that can occur when creating a `RotationMatrix`.
#[derive(Debug, Clone, Error, Copy, PartialEq)]
pub enum RotationMatrixErrors {
    #[error("matrix is not orthonormal within tolerance")]
    NotOrthonormal,
    #[error("matrix determinant is {0}, expected +1")]
    NotProper(f64),
}

/// A proper orthonormal 3x3 rotation matrix.
///
/// Applies the same active rotation as the corresponding `Quaternion`:
/// columns are the body axes expressed in the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationMatrix(Matrix3<f64>);

impl RotationMatrix {
    pub const IDENTITY: Self = Self(Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0,
    ));

    /// Creates a new `RotationMatrix`, validating orthonormality and
    /// handedness.
    ///
    /// # Arguments
    ///
    /// * `matrix` - The candidate rotation matrix.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok` containing the `RotationMatrix`, or an `Err`
    /// of `RotationMatrixErrors` if the matrix is not a proper rotation.
    pub fn new(matrix: Matrix3<f64>) -> Result<Self, RotationMatrixErrors> {
        let candidate = Self(matrix);
        candidate.validate()?;
        Ok(candidate)
    }

    /// Creates a rotation matrix from three column vectors, normalizing each.
    pub fn from_columns(
        x: Vector3<f64>,
        y: Vector3<f64>,
        z: Vector3<f64>,
    ) -> Result<Self, RotationMatrixErrors> {
        let m = Matrix3::from_columns(&[x.normalize(), y.normalize(), z.normalize()]);
        Self::new(m)
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    /// Checks that the matrix is orthonormal with determinant +1.
    ///
    /// Serde can construct unverified matrices from configuration input, so
    /// consumers revalidate at the conversion boundary.
    pub fn validate(&self) -> Result<(), RotationMatrixErrors> {
        let residual = self.0.transpose() * self.0 - Matrix3::identity();
        if residual.norm() > ORTHONORMAL_TOL {
            return Err(RotationMatrixErrors::NotOrthonormal);
        }
        let det = self.0.determinant();
        if (det - 1.0).abs() > ORTHONORMAL_TOL {
            return Err(RotationMatrixErrors::NotProper(det));
        }
        Ok(())
    }
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RotationTrait for RotationMatrix {
    /// Rotates a vector by the matrix.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be rotated.
    ///
    /// # Returns
    ///
    /// The rotated vector.
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.0 * v
    }

    /// Transforms a vector by the inverse rotation.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be transformed.
    ///
    /// # Returns
    ///
    /// The transformed vector.
    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.0.transpose() * v
    }

    fn inv(&self) -> Self {
        Self(self.0.transpose())
    }

    fn identity() -> Self {
        Self::IDENTITY
    }
}

impl Mul<RotationMatrix> for RotationMatrix {
    type Output = Self;

    fn mul(self, rhs: RotationMatrix) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl From<&Quaternion> for RotationMatrix {
    /// Converts a unit `Quaternion` to the equivalent rotation matrix.
    ///
    /// # Arguments
    ///
    /// * `q` - The quaternion to be converted.
    ///
    /// # Returns
    ///
    /// The corresponding `RotationMatrix`.
    fn from(q: &Quaternion) -> Self {
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);

        Self(Matrix3::new(
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y - w * z),
            2.0 * (x * z + w * y),
            2.0 * (x * y + w * z),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z - w * x),
            2.0 * (x * z - w * y),
            2.0 * (y * z + w * x),
            1.0 - 2.0 * (x * x + y * y),
        ))
    }
}

impl From<&EulerAngles> for RotationMatrix {
    fn from(euler_angles: &EulerAngles) -> Self {
        Self::from(&Quaternion::from(euler_angles))
    }
}
