use crate::RigidBodyAdapter;
use inertia::InertiaTensor;
use nalgebra::Vector3;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};

/// A minimal fixed-step rigid body implementing [`RigidBodyAdapter`].
///
/// Semi-implicit Euler: velocities integrate from the accumulated force and
/// torque, then the pose integrates from the new velocities. Angular dynamics
/// use Euler's equations in the principal frame, so gyroscopic coupling is
/// present for asymmetric tensors. Accumulators clear at the end of each
/// step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimBody {
    position: Vector3<f64>,
    orientation: Quaternion,
    linear_velocity: Vector3<f64>,
    angular_velocity: Vector3<f64>,
    mass: f64,
    center_of_mass: Vector3<f64>,
    principal_moments: Vector3<f64>,
    principal_orientation: Quaternion,
    force: Vector3<f64>,
    torque: Vector3<f64>,
}

impl Default for SimBody {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBody {
    /// A body at the world origin with unit mass and unit moments. Real mass
    /// properties arrive through [`RigidBodyAdapter::set_inertia`].
    pub fn new() -> Self {
        let placeholder = InertiaTensor::default();
        Self {
            position: Vector3::zeros(),
            orientation: Quaternion::IDENTITY,
            linear_velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            mass: placeholder.mass(),
            center_of_mass: placeholder.center_of_mass(),
            principal_moments: placeholder.principal_moments(),
            principal_orientation: placeholder.orientation(),
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
        }
    }

    pub fn with_position(mut self, position: Vector3<f64>) -> Self {
        self.position = position;
        self
    }

    pub fn with_orientation(mut self, orientation: Quaternion) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vector3<f64>) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_linear_velocity(mut self, linear_velocity: Vector3<f64>) -> Self {
        self.linear_velocity = linear_velocity;
        self
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn linear_velocity(&self) -> Vector3<f64> {
        self.linear_velocity
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn center_of_mass_local(&self) -> Vector3<f64> {
        self.center_of_mass
    }

    pub fn principal_moments(&self) -> Vector3<f64> {
        self.principal_moments
    }

    pub fn principal_orientation(&self) -> Quaternion {
        self.principal_orientation
    }

    /// Force accumulated for the next step, world frame.
    pub fn pending_force(&self) -> Vector3<f64> {
        self.force
    }

    /// Torque about the center of mass accumulated for the next step, world
    /// frame.
    pub fn pending_torque(&self) -> Vector3<f64> {
        self.torque
    }

    /// Overwrites the world-frame angular velocity. Test and scenario setup
    /// hook; the integrator itself owns this state during stepping.
    pub fn set_angular_velocity(&mut self, angular_velocity: Vector3<f64>) {
        self.angular_velocity = angular_velocity;
    }

    /// Advances the body by one fixed step.
    pub fn step(&mut self, dt: f64) {
        // linear: velocity from accumulated force, then position
        let linear_acceleration = self.force / self.mass;
        self.linear_velocity += linear_acceleration * dt;
        self.position += self.linear_velocity * dt;

        // angular: Euler's equations in the principal frame,
        // w_dot = I^-1 (tau - w x I w)
        let w_body = self.orientation.transform(&self.angular_velocity);
        let w_principal = self.principal_orientation.transform(&w_body);
        let torque_body = self.orientation.transform(&self.torque);
        let torque_principal = self.principal_orientation.transform(&torque_body);

        let momentum = self.principal_moments.component_mul(&w_principal);
        let w_dot = (torque_principal - w_principal.cross(&momentum))
            .component_div(&self.principal_moments);
        let w_principal = w_principal + w_dot * dt;

        let w_body = self.principal_orientation.rotate(&w_principal);
        self.angular_velocity = self.orientation.rotate(&w_body);

        // attitude from the new world-frame rate
        let delta = Quaternion::from_scaled_axis(&(self.angular_velocity * dt));
        self.orientation = (delta * self.orientation).renormalize();

        self.force = Vector3::zeros();
        self.torque = Vector3::zeros();
    }
}

impl RigidBodyAdapter for SimBody {
    fn is_ready(&self) -> bool {
        true
    }

    fn angular_velocity(&self) -> Vector3<f64> {
        self.angular_velocity
    }

    fn orientation(&self) -> Quaternion {
        self.orientation
    }

    fn world_center_of_mass(&self) -> Vector3<f64> {
        self.position + self.orientation.rotate(&self.center_of_mass)
    }

    fn set_center_of_mass(&mut self, local: &Vector3<f64>) {
        self.center_of_mass = *local;
    }

    fn set_inertia(&mut self, tensor: &InertiaTensor) {
        self.mass = tensor.mass();
        self.center_of_mass = tensor.center_of_mass();
        self.principal_moments = tensor.principal_moments();
        self.principal_orientation = tensor.orientation();
    }

    fn apply_force_at_point(&mut self, force: &Vector3<f64>, world_point: &Vector3<f64>) {
        self.force += force;
        let arm = world_point - self.world_center_of_mass();
        self.torque += arm.cross(force);
    }

    fn local_to_world(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.position + self.orientation.rotate(local)
    }
}
