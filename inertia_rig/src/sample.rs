use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Upper bound on eagerly reserved sample slots. Longer runs grow on demand.
const MAX_PREALLOC_FRAMES: usize = 1 << 16;

/// One frame of measured response.
///
/// `euler_velocity` and `euler_acceleration` are present only when the
/// harness was configured to track Euler rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSample {
    pub frame: u64,
    pub time: f64,
    pub angular_velocity: Vector3<f64>,
    pub angular_acceleration: Vector3<f64>,
    pub euler_velocity: Option<Vector3<f64>>,
    pub euler_acceleration: Option<Vector3<f64>>,
}

/// Append-only record of samples taken before the log horizon.
#[derive(Debug, Clone, Default)]
pub struct SampleLog {
    samples: Vec<MeasurementSample>,
    horizon: f64,
}

impl SampleLog {
    /// Preallocates for the number of frames expected before `horizon`,
    /// capped so a distant horizon starts with a bounded buffer and grows
    /// on demand.
    pub fn new(horizon: f64, timestep: f64) -> Self {
        let capacity = if horizon > 0.0 && timestep > 0.0 {
            // float casts saturate, so an over-range frame count lands on the cap
            ((horizon / timestep).ceil() as usize).min(MAX_PREALLOC_FRAMES)
        } else {
            0
        };
        Self {
            samples: Vec::with_capacity(capacity),
            horizon,
        }
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// True if a sample at `time` would still be kept.
    pub fn accepts(&self, time: f64) -> bool {
        time < self.horizon
    }

    /// Records the sample if it lies before the horizon. Returns whether it
    /// was kept.
    pub fn record(&mut self, sample: &MeasurementSample) -> bool {
        if self.accepts(sample.time) {
            self.samples.push(sample.clone());
            true
        } else {
            false
        }
    }

    pub fn samples(&self) -> &[MeasurementSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn snapshot(&self) -> Vec<MeasurementSample> {
        self.samples.clone()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
