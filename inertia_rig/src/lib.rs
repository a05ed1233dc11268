pub mod applier;
pub mod clock;
pub mod config;
pub mod harness;
pub mod report;
pub mod sample;
pub mod stimulus;

use inertia::InertiaErrors;
use thiserror::Error;

pub use applier::InertiaApplier;
pub use clock::SimClock;
pub use config::RigConfig;
pub use harness::{MeasurementHarness, Phase};
pub use report::{format_vector, results_table, telemetry_block, CsvReportWriter};
pub use sample::{MeasurementSample, SampleLog};
pub use stimulus::{ApplicationPoint, Stimulus};

pub mod prelude {
    pub use crate::applier::InertiaApplier;
    pub use crate::clock::SimClock;
    pub use crate::config::RigConfig;
    pub use crate::harness::{MeasurementHarness, Phase};
    pub use crate::report::{format_vector, results_table, telemetry_block, CsvReportWriter};
    pub use crate::sample::{MeasurementSample, SampleLog};
    pub use crate::stimulus::{ApplicationPoint, Stimulus};
    pub use crate::RigErrors;
}

#[derive(Debug, Error)]
pub enum RigErrors {
    #[error("{0}")]
    InvalidMassDistribution(#[from] InertiaErrors),
    #[error("angular velocity became non-finite {value:?} at simulation time {time}")]
    UnstableSimulation { value: [f64; 3], time: f64 },
    #[error("rigid body adapter is not ready")]
    AdapterUnavailable,
    #[error("harness is idle, arm it before stepping")]
    NotArmed,
    #[error("fixed timestep must be positive and finite, got {0}")]
    TimestepNotPositive(f64),
    #[error("fixed timestep {0} is below the 1 ms clock resolution")]
    TimestepBelowClockResolution(f64),
    #[error("time scale must be positive and finite, got {0}")]
    TimeScaleNotPositive(f64),
    #[error("stimulus window must have finite start >= 0 and duration >= 0, got start {start} duration {duration}")]
    InvalidStimulusWindow { start: f64, duration: f64 },
    #[error("stimulus force is not finite")]
    StimulusForceNotFinite,
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    RonParse(#[from] ron::error::SpannedError),
    #[error("{0}")]
    RonWrite(#[from] ron::Error),
}
