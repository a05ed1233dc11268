use crate::applier::InertiaApplier;
use crate::clock::validate_timestep;
use crate::harness::MeasurementHarness;
use crate::stimulus::Stimulus;
use crate::RigErrors;
use inertia::{InertiaSettings, InertiaTensor};
use ron::{
    from_str,
    ser::{to_string_pretty, PrettyConfig},
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_fixed_timestep() -> f64 {
    0.005
}

fn default_time_scale() -> f64 {
    1.0
}

/// Declarative description of a complete measurement run.
///
/// Loaded from RON and validated eagerly, so a bad mass distribution or
/// timestep fails at load time rather than mid-run. `time_scale` is advisory
/// for interactive drivers that map simulation time onto wall time and does
/// not change the physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    pub inertia: InertiaSettings,
    pub stimulus: Stimulus,
    #[serde(default = "default_fixed_timestep")]
    pub fixed_timestep: f64,
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    #[serde(default)]
    pub track_euler: bool,
}

impl RigConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, RigErrors> {
        let config: Self = from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RigErrors> {
        Self::from_ron_str(&fs::read_to_string(path)?)
    }

    pub fn to_ron_string(&self) -> Result<String, RigErrors> {
        Ok(to_string_pretty(self, PrettyConfig::new())?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RigErrors> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Checks every field, including that the mass distribution actually
    /// produces a positive definite tensor.
    pub fn validate(&self) -> Result<(), RigErrors> {
        validate_timestep(self.fixed_timestep)?;
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(RigErrors::TimeScaleNotPositive(self.time_scale));
        }
        self.stimulus.validate()?;
        InertiaTensor::from_settings(&self.inertia)?;
        Ok(())
    }

    pub fn applier(&self) -> Result<InertiaApplier, RigErrors> {
        InertiaApplier::from_settings(&self.inertia)
    }

    pub fn harness(&self) -> Result<MeasurementHarness, RigErrors> {
        MeasurementHarness::new(self.stimulus, self.fixed_timestep, self.track_euler)
    }
}
