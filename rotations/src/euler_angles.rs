use super::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Wraps an angle in radians into `[-pi, pi)`.
pub fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Smallest signed difference `to - from` between two angles in radians.
///
/// The result is in `[-pi, pi)`, so differencing a signal that wraps across
/// the `+-pi` seam stays continuous. Always use this instead of raw
/// subtraction when finite-differencing angles.
///
/// # Arguments
///
/// * `from` - The earlier angle in radians.
/// * `to` - The later angle in radians.
///
/// # Returns
///
/// The smallest signed angle moving `from` onto `to`.
pub fn delta_angle(from: f64, to: f64) -> f64 {
    wrap_angle(to - from)
}

/// Euler angles in radians for the intrinsic Z-Y-X (yaw, pitch, roll)
/// sequence.
///
/// `roll` is about the body x axis, `pitch` about y, `yaw` about z. The
/// equivalent rotation is `Rz(yaw) * Ry(pitch) * Rx(roll)`. Near
/// `pitch = +-pi/2` the decomposition is not unique.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl EulerAngles {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Returns the angles as `[roll, pitch, yaw]` for per-axis iteration.
    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.roll, self.pitch, self.yaw)
    }
}

impl From<&Quaternion> for EulerAngles {
    /// Extracts intrinsic Z-Y-X angles from a unit quaternion.
    ///
    /// The asin argument is clamped so fp drift past unit magnitude cannot
    /// produce NaN at pitch extremes.
    fn from(q: &Quaternion) -> Self {
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);

        let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
        let pitch = (2.0 * (w * y - x * z)).clamp(-1.0, 1.0).asin();
        let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));

        EulerAngles { roll, pitch, yaw }
    }
}

impl From<&RotationMatrix> for EulerAngles {
    fn from(rotation_matrix: &RotationMatrix) -> Self {
        let m = rotation_matrix.matrix();

        let roll = m[(2, 1)].atan2(m[(2, 2)]);
        let pitch = (-m[(2, 0)]).clamp(-1.0, 1.0).asin();
        let yaw = m[(1, 0)].atan2(m[(0, 0)]);

        EulerAngles { roll, pitch, yaw }
    }
}

impl RotationTrait for EulerAngles {
    /// Rotates a vector by converting to a quaternion first.
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        Quaternion::from(self).rotate(v)
    }

    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64> {
        Quaternion::from(self).transform(v)
    }

    fn inv(&self) -> Self {
        EulerAngles::from(&Quaternion::from(self).inv())
    }

    fn identity() -> Self {
        EulerAngles::default()
    }
}
