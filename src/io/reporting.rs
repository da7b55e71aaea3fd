// src/io/reporting.rs

use crate::error::Result;
use crate::model::patient::Patient;
use crate::model::queues::QueueLengthSeries;
use crate::simulation::config::SimulationConfig;
use crate::simulation::statistics::{HourlyBucket, SummaryStatistics};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// What a finished run hands to presentation code.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport<'a> {
    pub seed: u64,
    pub config: &'a SimulationConfig,
    pub summary: &'a SummaryStatistics,
}

/// Writes any serialisable rows to a CSV file with a header line.
fn write_csv<T: Serialize>(file_path: &Path, rows: impl IntoIterator<Item = T>) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(file_path)?;
    let mut written = 0;
    for row in rows {
        wtr.serialize(row)?;
        written += 1;
    }
    wtr.flush()?;
    info!(rows = written, path = %file_path.display(), "exported csv");
    Ok(written)
}

/// One row per served patient, in service order.
pub fn write_patients_csv(file_path: impl AsRef<Path>, patients: &[Patient]) -> Result<usize> {
    write_csv(file_path.as_ref(), patients)
}

/// The queue-length step function, one row per event.
pub fn write_queue_series_csv(
    file_path: impl AsRef<Path>,
    series: &QueueLengthSeries,
) -> Result<usize> {
    write_csv(file_path.as_ref(), series.samples())
}

/// Hourly arrivals and mean waits. Hours without arrivals leave the wait empty.
pub fn write_hourly_csv(file_path: impl AsRef<Path>, hourly: &[HourlyBucket]) -> Result<usize> {
    write_csv(file_path.as_ref(), hourly)
}

/// Seed, config and summary as pretty JSON.
pub fn write_summary_json(file_path: impl AsRef<Path>, report: &SimulationReport<'_>) -> Result<()> {
    let path = file_path.as_ref();
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, report)?;
    info!(path = %path.display(), "exported summary json");
    Ok(())
}

/// Human-readable summary for the terminal.
pub fn render_text_report(report: &SimulationReport<'_>) -> String {
    report.to_string()
}

impl fmt::Display for SimulationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;

        writeln!(f, "=== Hospital Queue Simulation ===")?;
        writeln!(
            f,
            "Seed: {}  Horizon: {} h  Service mean: {:.2} min",
            self.seed,
            self.config.horizon_hours,
            self.config.service.mean()
        )?;
        writeln!(f)?;
        writeln!(f, "Total patients:        {}", s.total_patients)?;
        writeln!(f, "Average wait (min):    {:.2}", s.average_wait)?;
        writeln!(f, "Max wait (min):        {:.2}", s.max_wait)?;
        writeln!(f, "Average service (min): {:.2}", s.average_service_time)?;
        writeln!(f, "Average queue length:  {:.2}", s.average_queue_length)?;
        match s.max_queue_length {
            Some(max) => writeln!(f, "Max queue length:      {max}")?,
            None => writeln!(f, "Max queue length:      no data")?,
        }
        writeln!(f, "Server utilization:    {:.3}", s.server_utilization)?;
        if s.arrivals_after_horizon > 0 {
            writeln!(f, "Arrived after horizon: {}", s.arrivals_after_horizon)?;
        }

        if !s.hourly.is_empty() {
            writeln!(f)?;
            writeln!(f, "{:>4} {:>8} {:>12}", "hour", "arrivals", "avg wait")?;
            for bucket in &s.hourly {
                writeln!(
                    f,
                    "{:>4} {:>8} {:>12.2}",
                    bucket.hour, bucket.arrivals, bucket.average_wait
                )?;
            }
        }

        let widest = s.wait_histogram.counts.iter().copied().max().unwrap_or(0);
        if widest > 0 {
            writeln!(f)?;
            writeln!(f, "Waiting time distribution (min):")?;
            for (lower, upper, count) in s.wait_histogram.bins() {
                let bar = "#".repeat((count * 40).div_ceil(widest));
                writeln!(f, "{lower:>7.1} - {upper:>7.1} | {count:>5} {bar}")?;
            }
        }

        if s.is_empty() {
            writeln!(f)?;
            writeln!(f, "No patients arrived during the horizon.")?;
        }
        Ok(())
    }
}
