use crate::RigErrors;
use inertia::{InertiaSettings, InertiaTensor};
use nalgebra::Vector3;
use rigid_body::RigidBodyAdapter;

/// Installs a validated inertia model onto a rigid body adapter and keeps a
/// world-frame center of mass marker in sync with the body pose.
#[derive(Debug, Clone)]
pub struct InertiaApplier {
    tensor: InertiaTensor,
    world_center_of_mass: Vector3<f64>,
}

impl InertiaApplier {
    pub fn new(tensor: InertiaTensor) -> Self {
        let world_center_of_mass = tensor.center_of_mass();
        Self {
            tensor,
            world_center_of_mass,
        }
    }

    /// Builds the tensor from a mass distribution, rejecting distributions
    /// that do not produce a positive definite inertia.
    pub fn from_settings(settings: &InertiaSettings) -> Result<Self, RigErrors> {
        Ok(Self::new(InertiaTensor::from_settings(settings)?))
    }

    pub fn tensor(&self) -> &InertiaTensor {
        &self.tensor
    }

    /// World-frame center of mass as of the last apply or resynchronize.
    pub fn world_center_of_mass(&self) -> Vector3<f64> {
        self.world_center_of_mass
    }

    /// Writes the center of mass and the full tensor onto the body.
    ///
    /// Applying the same model twice leaves the body unchanged.
    pub fn apply<B: RigidBodyAdapter>(&mut self, body: &mut B) -> Result<(), RigErrors> {
        if !body.is_ready() {
            return Err(RigErrors::AdapterUnavailable);
        }
        body.set_center_of_mass(&self.tensor.center_of_mass());
        body.set_inertia(&self.tensor);
        self.world_center_of_mass = body.world_center_of_mass();
        Ok(())
    }

    /// Refreshes the world center of mass marker from the body pose without
    /// writing anything back.
    pub fn resynchronize<B: RigidBodyAdapter>(&mut self, body: &B) {
        if body.is_ready() {
            self.world_center_of_mass = body.world_center_of_mass();
        }
    }

    /// Design-time path: positions the center of mass only, leaving the
    /// body's tensor and velocities untouched.
    pub fn apply_design_time<B: RigidBodyAdapter>(&mut self, body: &mut B) -> Result<(), RigErrors> {
        if !body.is_ready() {
            return Err(RigErrors::AdapterUnavailable);
        }
        body.set_center_of_mass(&self.tensor.center_of_mass());
        self.world_center_of_mass = body.world_center_of_mass();
        Ok(())
    }
}
