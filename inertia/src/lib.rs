pub mod settings;
pub mod tensor;

pub use settings::{InertiaSettings, MassDistribution, PointMass};
pub use tensor::InertiaTensor;

use rotations::RotationErrors;
use thiserror::Error;

/// Errors raised while validating a mass distribution.
///
/// Every variant carries the offending value so a rejected configuration can
/// be reported without re-deriving it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InertiaErrors {
    #[error("mass must be positive and finite, got {0}")]
    MassNotPositive(f64),
    #[error("principal moment about {axis} must be positive and finite, got {value}")]
    MomentNotPositive { axis: &'static str, value: f64 },
    #[error(
        "principal moments ({0}, {1}, {2}) are not realizable: each moment must not exceed the sum of the other two"
    )]
    MomentsNotRealizable(f64, f64, f64),
    #[error("inertia matrix is not symmetric, off-diagonal mismatch {0}")]
    MatrixNotSymmetric(f64),
    #[error("inertia matrix element ({row},{col}) is not finite")]
    MatrixNotFinite { row: usize, col: usize },
    #[error("point mass {index} must be positive and finite, got {mass}")]
    PointMassNotPositive { index: usize, mass: f64 },
    #[error("point masses sum to {sum} but the declared mass is {declared}")]
    PointMassSumMismatch { declared: f64, sum: f64 },
    #[error("mass distribution contains no point masses")]
    NoPointMasses,
    #[error("center of mass component {axis} is not finite")]
    CenterOfMassNotFinite { axis: &'static str },
    #[error("{name} must be positive and finite, got {value}")]
    DimensionNotPositive { name: &'static str, value: f64 },
    #[error("{0}")]
    Rotation(#[from] RotationErrors),
}
