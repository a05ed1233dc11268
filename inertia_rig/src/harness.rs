use crate::clock::SimClock;
use crate::sample::{MeasurementSample, SampleLog};
use crate::stimulus::Stimulus;
use crate::RigErrors;
use nalgebra::Vector3;
use rigid_body::RigidBodyAdapter;
use rotations::euler_angles::{delta_angle, EulerAngles};

/// Lifecycle of a measurement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not armed, stepping is an error.
    Idle,
    /// Armed and waiting for the stimulus window to open.
    Armed,
    /// Inside the stimulus window, force applied every frame.
    Stimulating,
    /// Window closed, watching the free response.
    Settling,
    /// Log horizon passed. Live samples continue, nothing more is logged.
    Done,
}

#[derive(Debug, Clone, Copy)]
struct Fault {
    value: [f64; 3],
    time: f64,
}

impl Fault {
    fn to_error(self) -> RigErrors {
        RigErrors::UnstableSimulation {
            value: self.value,
            time: self.time,
        }
    }
}

/// Fixed-timestep measurement loop around a rigid body adapter.
///
/// Each step applies the stimulus when its window is open, samples the
/// body's angular velocity, finite-differences it against the previous
/// frame for acceleration, and logs the sample until the log horizon.
/// The caller owns the body and advances its physics between steps, so
/// a sampled velocity never includes the force applied that same frame.
#[derive(Debug, Clone)]
pub struct MeasurementHarness {
    stimulus: Stimulus,
    clock: SimClock,
    track_euler: bool,
    phase: Phase,
    last_angular_velocity: Vector3<f64>,
    last_euler_angles: Vector3<f64>,
    last_euler_velocity: Vector3<f64>,
    log: SampleLog,
    latest: Option<MeasurementSample>,
    fault: Option<Fault>,
}

impl MeasurementHarness {
    pub fn new(stimulus: Stimulus, fixed_timestep: f64, track_euler: bool) -> Result<Self, RigErrors> {
        stimulus.validate()?;
        let clock = SimClock::new(fixed_timestep)?;
        let log = SampleLog::new(stimulus.log_horizon(), fixed_timestep);
        Ok(Self {
            stimulus,
            clock,
            track_euler,
            phase: Phase::Idle,
            last_angular_velocity: Vector3::zeros(),
            last_euler_angles: Vector3::zeros(),
            last_euler_velocity: Vector3::zeros(),
            log,
            latest: None,
            fault: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    pub fn timestep(&self) -> f64 {
        self.clock.timestep()
    }

    pub fn stimulus(&self) -> &Stimulus {
        &self.stimulus
    }

    pub fn log(&self) -> &SampleLog {
        &self.log
    }

    pub fn latest_sample(&self) -> Option<&MeasurementSample> {
        self.latest.as_ref()
    }

    /// Captures finite-difference baselines from the body's current state
    /// and enters [`Phase::Armed`].
    ///
    /// Fails without touching harness state if the adapter is not ready.
    pub fn arm<B: RigidBodyAdapter>(&mut self, body: &B) -> Result<(), RigErrors> {
        if !body.is_ready() {
            return Err(RigErrors::AdapterUnavailable);
        }
        self.reset();
        self.last_angular_velocity = body.angular_velocity();
        self.last_euler_angles = EulerAngles::from(&body.orientation()).to_vector();
        self.last_euler_velocity = Vector3::zeros();
        self.phase = Phase::Armed;
        Ok(())
    }

    /// Returns to [`Phase::Idle`], clearing the clock, the log, the latest
    /// sample, and any latched fault.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.clock.reset();
        self.log.clear();
        self.latest = None;
        self.fault = None;
        self.last_angular_velocity = Vector3::zeros();
        self.last_euler_angles = Vector3::zeros();
        self.last_euler_velocity = Vector3::zeros();
    }

    /// Runs one measurement frame and returns the sample taken.
    ///
    /// A non-finite angular velocity latches [`RigErrors::UnstableSimulation`];
    /// every later step returns the same error without applying stimulus or
    /// advancing time, and the log keeps everything recorded before the fault.
    pub fn step<B: RigidBodyAdapter>(
        &mut self,
        body: &mut B,
    ) -> Result<&MeasurementSample, RigErrors> {
        if self.phase == Phase::Idle {
            return Err(RigErrors::NotArmed);
        }
        if let Some(fault) = self.fault {
            return Err(fault.to_error());
        }

        let time = self.clock.time();
        let timestep = self.clock.timestep();

        if self.stimulus.active(time) {
            self.phase = Phase::Stimulating;
            let point = self.stimulus.world_point(body);
            body.apply_force_at_point(&self.stimulus.force, &point);
        } else if time >= self.stimulus.end()
            && matches!(self.phase, Phase::Armed | Phase::Stimulating)
        {
            self.phase = Phase::Settling;
        }

        let angular_velocity = body.angular_velocity();
        if !(angular_velocity[0].is_finite()
            && angular_velocity[1].is_finite()
            && angular_velocity[2].is_finite())
        {
            let fault = Fault {
                value: [
                    angular_velocity[0],
                    angular_velocity[1],
                    angular_velocity[2],
                ],
                time,
            };
            self.fault = Some(fault);
            return Err(fault.to_error());
        }

        let angular_acceleration = (angular_velocity - self.last_angular_velocity) / timestep;
        self.last_angular_velocity = angular_velocity;

        let (euler_velocity, euler_acceleration) = if self.track_euler {
            let euler = EulerAngles::from(&body.orientation()).to_vector();
            let rates = Vector3::new(
                delta_angle(self.last_euler_angles[0], euler[0]),
                delta_angle(self.last_euler_angles[1], euler[1]),
                delta_angle(self.last_euler_angles[2], euler[2]),
            ) / timestep;
            let accel = (rates - self.last_euler_velocity) / timestep;
            self.last_euler_angles = euler;
            self.last_euler_velocity = rates;
            (Some(rates), Some(accel))
        } else {
            (None, None)
        };

        let sample = MeasurementSample {
            frame: self.clock.frame(),
            time,
            angular_velocity,
            angular_acceleration,
            euler_velocity,
            euler_acceleration,
        };
        self.log.record(&sample);
        if time >= self.log.horizon() {
            self.phase = Phase::Done;
        }
        self.clock.advance();
        Ok(self.latest.insert(sample))
    }
}
