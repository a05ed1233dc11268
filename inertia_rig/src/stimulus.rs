use crate::RigErrors;
use nalgebra::Vector3;
use rigid_body::RigidBodyAdapter;
use serde::{Deserialize, Serialize};

/// Where a stimulus force is applied on the body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ApplicationPoint {
    /// Body-frame point, carried through the body pose every frame.
    LocalPoint(Vector3<f64>),
    /// World-frame offset from the current world center of mass.
    ComOffset(Vector3<f64>),
}

/// A world-frame force applied over a half-open time window
/// `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stimulus {
    pub force: Vector3<f64>,
    pub point: ApplicationPoint,
    pub start: f64,
    pub duration: f64,
}

impl Stimulus {
    pub fn new(
        force: Vector3<f64>,
        point: ApplicationPoint,
        start: f64,
        duration: f64,
    ) -> Result<Self, RigErrors> {
        let stimulus = Self {
            force,
            point,
            start,
            duration,
        };
        stimulus.validate()?;
        Ok(stimulus)
    }

    /// Deserialized values bypass [`Stimulus::new`], so configuration
    /// loaders call this directly.
    pub fn validate(&self) -> Result<(), RigErrors> {
        if !(self.start.is_finite() && self.duration.is_finite())
            || self.start < 0.0
            || self.duration < 0.0
        {
            return Err(RigErrors::InvalidStimulusWindow {
                start: self.start,
                duration: self.duration,
            });
        }
        if !(self.force[0].is_finite() && self.force[1].is_finite() && self.force[2].is_finite()) {
            return Err(RigErrors::StimulusForceNotFinite);
        }
        Ok(())
    }

    /// True while `time` lies in `[start, start + duration)`.
    pub fn active(&self, time: f64) -> bool {
        time >= self.start && time < self.end()
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Time past which nothing more is logged. Twice the lead-in plus the
    /// stimulus duration gives the response as long to develop as the
    /// stimulus took to arrive.
    pub fn log_horizon(&self) -> f64 {
        2.0 * self.start + self.duration
    }

    /// Resolves the application point to world coordinates for the body's
    /// current pose.
    pub fn world_point<B: RigidBodyAdapter>(&self, body: &B) -> Vector3<f64> {
        match self.point {
            ApplicationPoint::LocalPoint(local) => body.local_to_world(&local),
            ApplicationPoint::ComOffset(offset) => body.world_center_of_mass() + offset,
        }
    }
}
