use crate::RigErrors;
use serde::{Deserialize, Serialize};

/// Smallest fixed timestep the clock can represent without aliasing,
/// matching the 3 decimal places kept by [`SimClock::advance`].
pub const MIN_TIMESTEP: f64 = 1e-3;

/// Rounds `value` to `decimals` decimal places.
pub fn round_decimals(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

pub(crate) fn validate_timestep(timestep: f64) -> Result<(), RigErrors> {
    if !timestep.is_finite() || timestep <= 0.0 {
        return Err(RigErrors::TimestepNotPositive(timestep));
    }
    if timestep < MIN_TIMESTEP {
        return Err(RigErrors::TimestepBelowClockResolution(timestep));
    }
    Ok(())
}

/// Fixed-increment simulation clock.
///
/// Time is re-rounded to 3 decimal places after every increment so that
/// frame counts map to exact millisecond-resolution timestamps instead of
/// accumulating floating point drift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    time: f64,
    frame: u64,
    timestep: f64,
}

impl SimClock {
    pub const TIME_DECIMALS: u32 = 3;

    pub fn new(timestep: f64) -> Result<Self, RigErrors> {
        validate_timestep(timestep)?;
        Ok(Self {
            time: 0.0,
            frame: 0,
            timestep,
        })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Advances one frame and re-rounds the accumulated time.
    pub fn advance(&mut self) {
        self.time = round_decimals(self.time + self.timestep, Self::TIME_DECIMALS);
        self.frame += 1;
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
        self.frame = 0;
    }
}
