// src/simulation/statistics.rs

use crate::model::patient::Patient;
use crate::model::queues::QueueLengthSeries;
use crate::simulation::config::MINUTES_PER_HOUR;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Bins in the waiting-time histogram unless asked otherwise.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// A reduced statistic that may have nothing to reduce.
///
/// Serialises as a number or `null`, prints as `no data`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metric {
    Value(f64),
    NoData,
}

impl Metric {
    fn mean(sum: f64, count: usize) -> Self {
        if count == 0 {
            Self::NoData
        } else {
            Self::Value(sum / count as f64)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::NoData => None,
        }
    }

    pub fn is_no_data(self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl From<Option<f64>> for Metric {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::NoData, Self::Value)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => fmt::Display::fmt(v, f),
            // pad() would let a precision truncate the label
            Self::NoData => match f.width() {
                Some(width) => write!(f, "{:>width$}", "no data"),
                None => f.write_str("no data"),
            },
        }
    }
}

/// Arrivals and mean wait for one hour of the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyBucket {
    pub hour: u32,
    pub arrivals: usize,
    pub average_wait: Metric,
}

/// Counts of waiting times in equal-width bins from zero to the longest wait.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaitHistogram {
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl WaitHistogram {
    fn build(waits: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        if waits.is_empty() {
            return Self {
                bin_width: 0.0,
                counts: Vec::new(),
            };
        }
        let longest = waits.iter().copied().fold(0.0_f64, f64::max);
        let bin_width = longest / bins as f64;
        let mut counts = vec![0; bins];
        for &wait in waits {
            let idx = if bin_width > 0.0 {
                ((wait / bin_width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[idx] += 1;
        }
        Self { bin_width, counts }
    }

    /// `(lower, upper, count)` for every bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.counts.iter().enumerate().map(move |(i, &count)| {
            let lower = i as f64 * self.bin_width;
            (lower, lower + self.bin_width, count)
        })
    }
}

/// Everything a report may show about a run. Reporting code reads this and
/// nothing deeper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub total_patients: usize,
    pub average_wait: Metric,
    pub max_wait: Metric,
    pub average_service_time: Metric,
    pub average_queue_length: Metric,
    pub max_queue_length: Option<usize>,
    pub server_utilization: Metric,
    /// Exactly one bucket per horizon hour.
    pub hourly: Vec<HourlyBucket>,
    /// Patients whose arrival falls at or after the end of the horizon.
    pub arrivals_after_horizon: usize,
    pub wait_histogram: WaitHistogram,
}

impl SummaryStatistics {
    /// True when no patient arrived during the run.
    pub fn is_empty(&self) -> bool {
        self.total_patients == 0
    }
}

/// Pure reduction of a finished run into [`SummaryStatistics`].
#[derive(Debug, Clone)]
pub struct StatisticsAggregator {
    horizon_hours: u32,
    histogram_bins: usize,
}

impl StatisticsAggregator {
    pub fn new(horizon_hours: u32) -> Self {
        Self {
            horizon_hours,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }

    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins.max(1);
        self
    }

    fn horizon_minutes(&self) -> f64 {
        f64::from(self.horizon_hours) * MINUTES_PER_HOUR
    }

    pub fn aggregate(&self, patients: &[Patient], queue: &QueueLengthSeries) -> SummaryStatistics {
        let total_patients = patients.len();
        let waits: Vec<f64> = patients.iter().map(|p| p.wait_time).collect();

        let average_wait = Metric::mean(waits.iter().sum(), total_patients);
        let max_wait = Metric::from(waits.iter().copied().reduce(f64::max));
        let average_service_time = Metric::mean(
            patients.iter().map(|p| p.service_duration).sum(),
            total_patients,
        );

        let horizon = self.horizon_minutes();
        let average_queue_length = Metric::from(queue.time_weighted_average(horizon));
        let max_queue_length = queue.max_length().filter(|_| horizon > 0.0 || total_patients > 0);
        let server_utilization = self.utilization(patients);
        let (hourly, arrivals_after_horizon) = self.hourly_breakdown(patients);

        let summary = SummaryStatistics {
            total_patients,
            average_wait,
            max_wait,
            average_service_time,
            average_queue_length,
            max_queue_length,
            server_utilization,
            hourly,
            arrivals_after_horizon,
            wait_histogram: WaitHistogram::build(&waits, self.histogram_bins),
        };

        if summary.is_empty() {
            warn!(horizon_hours = self.horizon_hours, "no patients arrived; statistics have no data");
        } else {
            debug!(
                total_patients,
                average_wait = %summary.average_wait,
                average_queue_length = %summary.average_queue_length,
                "statistics aggregated"
            );
        }
        summary
    }

    /// Share of the horizon the server spent with a patient.
    fn utilization(&self, patients: &[Patient]) -> Metric {
        let horizon = self.horizon_minutes();
        if horizon <= 0.0 {
            return Metric::NoData;
        }
        let busy: f64 = patients
            .iter()
            .map(|p| (p.departure_time.min(horizon) - p.service_start.max(0.0)).max(0.0))
            .sum();
        Metric::Value(busy / horizon)
    }

    /// One bucket per horizon hour, and the number of patients who arrived
    /// after the last one.
    fn hourly_breakdown(&self, patients: &[Patient]) -> (Vec<HourlyBucket>, usize) {
        let buckets = self.horizon_hours as usize;
        let mut counts = vec![0_usize; buckets];
        let mut wait_sums = vec![0.0_f64; buckets];
        let mut after_horizon = 0;
        for patient in patients {
            match patient.arrival_hour().filter(|&h| h < self.horizon_hours) {
                Some(hour) => {
                    counts[hour as usize] += 1;
                    wait_sums[hour as usize] += patient.wait_time;
                }
                None => after_horizon += 1,
            }
        }
        if after_horizon > 0 {
            warn!(after_horizon, "arrivals past the horizon left out of the hourly series");
        }

        let hourly = (0..self.horizon_hours)
            .zip(counts.into_iter().zip(wait_sums))
            .map(|(hour, (arrivals, wait_sum))| HourlyBucket {
                hour,
                arrivals,
                average_wait: Metric::mean(wait_sum, arrivals),
            })
            .collect();
        (hourly, after_horizon)
    }
}
