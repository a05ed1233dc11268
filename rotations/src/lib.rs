pub mod euler_angles;
pub mod quaternion;
pub mod rotation_matrix;

use euler_angles::EulerAngles;
use nalgebra::Vector3;
use quaternion::{Quaternion, QuaternionErrors};
use rotation_matrix::{RotationMatrix, RotationMatrixErrors};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod prelude {
    pub use crate::euler_angles::*;
    pub use crate::quaternion::*;
    pub use crate::rotation_matrix::*;
    pub use crate::{Rotation, RotationErrors, RotationTrait};
}

/// Trait defining rotation and transformation operations.
pub trait RotationTrait {
    /// Rotates a vector by the rotation.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be rotated.
    ///
    /// # Returns
    ///
    /// The rotated vector.
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64>;

    /// Transforms a vector by the inverse of the rotation.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be transformed.
    ///
    /// # Returns
    ///
    /// The transformed vector.
    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64>;

    fn inv(&self) -> Self;

    fn identity() -> Self;
}

/// Errors from converting between rotation representations.
#[derive(Debug, Clone, Error, Copy, PartialEq)]
pub enum RotationErrors {
    #[error("{0}")]
    Quaternion(#[from] QuaternionErrors),
    #[error("{0}")]
    RotationMatrix(#[from] RotationMatrixErrors),
}

/// Enum representing different types of rotations.
///
/// Serves as the declarative input form: configuration may specify an
/// orientation in whichever representation is convenient, and consumers
/// convert through [`Rotation::to_quaternion`], which validates the input.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Rotation {
    EulerAngles(EulerAngles),
    Quaternion(Quaternion),
    RotationMatrix(RotationMatrix),
}

impl Default for Rotation {
    /// Provides the default value for a rotation, which is an identity
    /// quaternion.
    fn default() -> Self {
        Rotation::Quaternion(Quaternion::IDENTITY)
    }
}

impl Rotation {
    pub const IDENTITY: Self = Rotation::Quaternion(Quaternion::IDENTITY);

    /// Converts to a validated unit quaternion.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok` containing the unit `Quaternion`, or an `Err`
    /// of `RotationErrors` if the stored representation is degenerate (zero
    /// quaternion, non-orthonormal matrix).
    pub fn to_quaternion(&self) -> Result<Quaternion, RotationErrors> {
        match self {
            Rotation::Quaternion(q) => Ok(q.normalize()?),
            Rotation::EulerAngles(euler) => Ok(Quaternion::from(euler)),
            Rotation::RotationMatrix(m) => {
                m.validate()?;
                Ok(Quaternion::from(m))
            }
        }
    }
}

impl From<&Quaternion> for Rotation {
    fn from(quaternion: &Quaternion) -> Self {
        Rotation::Quaternion(*quaternion)
    }
}

impl From<&RotationMatrix> for Rotation {
    fn from(rotation_matrix: &RotationMatrix) -> Self {
        Rotation::RotationMatrix(*rotation_matrix)
    }
}

impl From<&EulerAngles> for Rotation {
    fn from(euler: &EulerAngles) -> Self {
        Rotation::EulerAngles(*euler)
    }
}

impl RotationTrait for Rotation {
    /// Rotates a vector using the stored representation.
    ///
    /// Assumes a well-formed rotation; inputs of unknown provenance should be
    /// validated through [`Rotation::to_quaternion`] first.
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        match self {
            Rotation::EulerAngles(rotation) => rotation.rotate(v),
            Rotation::RotationMatrix(rotation) => rotation.rotate(v),
            Rotation::Quaternion(rotation) => rotation.rotate(v),
        }
    }

    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64> {
        match self {
            Rotation::EulerAngles(rotation) => rotation.transform(v),
            Rotation::RotationMatrix(rotation) => rotation.transform(v),
            Rotation::Quaternion(rotation) => rotation.transform(v),
        }
    }

    fn inv(&self) -> Self {
        match self {
            Rotation::EulerAngles(rotation) => Rotation::EulerAngles(rotation.inv()),
            Rotation::RotationMatrix(rotation) => Rotation::RotationMatrix(rotation.inv()),
            Rotation::Quaternion(rotation) => Rotation::Quaternion(rotation.inv()),
        }
    }

    fn identity() -> Self {
        Rotation::Quaternion(Quaternion::identity())
    }
}
