pub mod sim_body;

pub use sim_body::SimBody;

use inertia::InertiaTensor;
use nalgebra::Vector3;
use rotations::quaternion::Quaternion;

/// Boundary to a host rigid-body implementation.
///
/// The measurement side of the workspace talks to physics exclusively through
/// this trait, so the same harness drives the bundled [`SimBody`] or an
/// adapter wrapping an external engine.
///
/// Conventions: `orientation` is the world-from-body unit quaternion, and
/// `angular_velocity` is expressed in the **world** frame, matching the host
/// engine this boundary was modeled on. Implementations report angular state
/// as of the most recent completed step; forces accumulate until the next
/// step.
pub trait RigidBodyAdapter {
    /// Whether the body exists and is ready to be queried and mutated.
    ///
    /// Callers must treat `false` as a recoverable condition and retry later
    /// rather than fail the process.
    fn is_ready(&self) -> bool;

    /// Angular velocity in the world frame, rad/s.
    fn angular_velocity(&self) -> Vector3<f64>;

    /// World-from-body orientation.
    fn orientation(&self) -> Quaternion;

    /// Center of mass in world coordinates.
    fn world_center_of_mass(&self) -> Vector3<f64>;

    /// Sets the body-frame center of mass.
    fn set_center_of_mass(&mut self, local: &Vector3<f64>);

    /// Installs mass, center of mass, and the inertia tensor.
    ///
    /// The tensor arrives in principal form; implementations convert to
    /// whatever representation their host integrator expects (diagonal plus
    /// rotation, or the full matrix via [`InertiaTensor::matrix`]).
    fn set_inertia(&mut self, tensor: &InertiaTensor);

    /// Accumulates a world-frame force applied at a world-frame point for the
    /// next step.
    fn apply_force_at_point(&mut self, force: &Vector3<f64>, world_point: &Vector3<f64>);

    /// Maps a body-frame point to world coordinates using the current pose.
    fn local_to_world(&self, local: &Vector3<f64>) -> Vector3<f64>;
}
