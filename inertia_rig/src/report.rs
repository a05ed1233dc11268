use crate::sample::{MeasurementSample, SampleLog};
use crate::RigErrors;
use nalgebra::Vector3;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Formats a vector as three right-aligned columns, `decimals + 3` wide.
///
/// Decimals are clamped to `0..=5`.
pub fn format_vector(v: &Vector3<f64>, decimals: usize) -> String {
    let decimals = decimals.min(5);
    let width = decimals + 3;
    format!(
        "{:>width$.decimals$} {:>width$.decimals$} {:>width$.decimals$}",
        v[0],
        v[1],
        v[2],
        width = width,
        decimals = decimals
    )
}

/// Renders one sample as the live telemetry block.
///
/// Euler lines appear only when the sample carries Euler rates.
pub fn telemetry_block(sample: &MeasurementSample) -> String {
    let mut text = format!(
        "Frame / Time:         #{:<3} {:.3}\n\nAngular Velocity:     {}\nAngular Acceleration: {}\n",
        sample.frame,
        sample.time,
        format_vector(&sample.angular_velocity, 5),
        format_vector(&sample.angular_acceleration, 5),
    );
    if let (Some(velocity), Some(acceleration)) =
        (sample.euler_velocity, sample.euler_acceleration)
    {
        text.push_str(&format!(
            "\nEuler Velocity:       {}\nEuler Acceleration:   {}\n",
            format_vector(&velocity, 5),
            format_vector(&acceleration, 5),
        ));
    }
    text
}

/// Renders the logged angular accelerations as a fixed-width table, one
/// line per frame.
pub fn results_table(log: &SampleLog) -> String {
    let mut out = String::new();
    for sample in log.samples() {
        out.push_str(&format!(
            "#{:<3} {:>5.3} {:>10.6} {:>10.6} {:>10.6}\n",
            sample.frame,
            sample.time,
            sample.angular_acceleration[0],
            sample.angular_acceleration[1],
            sample.angular_acceleration[2],
        ));
    }
    out
}

/// Streams measurement samples to a CSV file.
pub struct CsvReportWriter {
    writer: csv::Writer<BufWriter<File>>,
    include_euler: bool,
}

impl CsvReportWriter {
    /// Creates the file and writes the header row.
    pub fn create<P: AsRef<Path>>(path: P, include_euler: bool) -> Result<Self, RigErrors> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        let mut header = vec!["frame", "time", "wx", "wy", "wz", "ax", "ay", "az"];
        if include_euler {
            header.extend(["ewx", "ewy", "ewz", "eax", "eay", "eaz"]);
        }
        writer.write_record(&header)?;
        Ok(Self {
            writer,
            include_euler,
        })
    }

    /// Appends one sample. Euler columns are left empty for samples that
    /// do not carry Euler rates.
    pub fn write_sample(&mut self, sample: &MeasurementSample) -> Result<(), RigErrors> {
        let mut record = vec![
            sample.frame.to_string(),
            sample.time.to_string(),
            sample.angular_velocity[0].to_string(),
            sample.angular_velocity[1].to_string(),
            sample.angular_velocity[2].to_string(),
            sample.angular_acceleration[0].to_string(),
            sample.angular_acceleration[1].to_string(),
            sample.angular_acceleration[2].to_string(),
        ];
        if self.include_euler {
            match (sample.euler_velocity, sample.euler_acceleration) {
                (Some(velocity), Some(acceleration)) => {
                    for i in 0..3 {
                        record.push(velocity[i].to_string());
                    }
                    for i in 0..3 {
                        record.push(acceleration[i].to_string());
                    }
                }
                _ => record.extend(std::iter::repeat(String::new()).take(6)),
            }
        }
        self.writer.write_record(&record)?;
        Ok(())
    }

    /// Appends every sample in the log.
    pub fn write_log(&mut self, log: &SampleLog) -> Result<(), RigErrors> {
        for sample in log.samples() {
            self.write_sample(sample)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), RigErrors> {
        self.writer.flush()?;
        Ok(())
    }
}
