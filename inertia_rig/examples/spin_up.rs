use inertia::InertiaSettings;
use inertia_rig::prelude::*;
use nalgebra::Vector3;
use rigid_body::SimBody;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let config = RigConfig {
        inertia: InertiaSettings::solid_cuboid(12.0, Vector3::new(1.0, 2.0, 3.0))?,
        stimulus: Stimulus::new(
            Vector3::new(0.0, 0.0, 1.0),
            ApplicationPoint::LocalPoint(Vector3::new(1.0, 0.0, 0.0)),
            1.0,
            1.0,
        )?,
        fixed_timestep: 0.005,
        time_scale: 4.0,
        track_euler: true,
    };
    config.validate()?;

    let mut applier = config.applier()?;
    let mut harness = config.harness()?;
    let mut body = SimBody::new();
    applier.apply(&mut body)?;
    harness.arm(&body)?;

    // run physics at the fixed timestep, display at 50 Hz of wall time,
    // with time_scale compressing simulated seconds into wall seconds
    let display_rate = 50.0;
    let steps_per_tick =
        ((config.time_scale / (display_rate * config.fixed_timestep)).round() as usize).max(1);

    while !harness.is_done() {
        for _ in 0..steps_per_tick {
            if harness.is_done() {
                break;
            }
            harness.step(&mut body)?;
            body.step(config.fixed_timestep);
        }
        applier.resynchronize(&body);
        if let Some(sample) = harness.latest_sample() {
            println!("{}", telemetry_block(sample));
        }
    }

    println!("{}", results_table(harness.log()));

    let mut csv = CsvReportWriter::create("inertia_report.csv", config.track_euler)?;
    csv.write_log(harness.log())?;
    csv.flush()?;
    println!("wrote {} samples to inertia_report.csv", harness.log().len());

    Ok(())
}
