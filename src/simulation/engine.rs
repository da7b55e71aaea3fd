// src/simulation/engine.rs

use crate::error::{Result, SimulationError};
use crate::model::patient::{Arrival, Patient};
use crate::model::queues::{QueueLengthSeries, QueueState};
use crate::simulation::config::SimulationConfig;
use crate::simulation::generator::ArrivalProcess;
use crate::simulation::statistics::{StatisticsAggregator, SummaryStatistics};
use serde::Serialize;
use tracing::{info, trace};

/// Output of one pass through the queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRun {
    /// Patients in the order they were called, which is arrival order.
    pub patients: Vec<Patient>,
    pub queue_length: QueueLengthSeries,
    pub horizon_minutes: f64,
}

/// Single-server FIFO queue driven by a pre-drawn arrival list.
#[derive(Debug, Clone)]
pub struct QueueSimulator {
    horizon_minutes: f64,
}

impl QueueSimulator {
    pub fn new(horizon_minutes: f64) -> Self {
        Self { horizon_minutes }
    }

    /// Runs every arrival through the queue and serves the line dry.
    ///
    /// Arrivals must come in non-decreasing time order. If one does not, the
    /// run fails with [`SimulationError::InvalidEventOrder`] and nothing it
    /// produced so far is returned.
    #[tracing::instrument(skip(self, arrivals), fields(horizon = self.horizon_minutes))]
    pub fn simulate<I>(&self, arrivals: I) -> Result<SimulationRun>
    where
        I: IntoIterator<Item = Arrival>,
    {
        let mut state = QueueState::default();
        let mut patients = Vec::new();
        let mut series = QueueLengthSeries::starting_empty();
        let mut previous = 0.0_f64;

        for (index, arrival) in arrivals.into_iter().enumerate() {
            let at = arrival.arrival_time;
            if !(at.is_finite() && at >= previous) {
                return Err(SimulationError::InvalidEventOrder {
                    index,
                    previous,
                    found: at,
                });
            }
            if !(arrival.service_duration.is_finite() && arrival.service_duration >= 0.0) {
                return Err(SimulationError::InvalidServiceDuration {
                    index,
                    duration: arrival.service_duration,
                });
            }
            previous = at;

            // Departures at the same instant go first.
            Self::drain_departures(&mut state, &mut patients, &mut series, Some(at));

            if let Some(patient) = state.admit(arrival) {
                trace!(id = patient.id, at, "served on arrival");
                patients.push(patient);
            }
            series.record(at, state.in_system());
            trace!(id = arrival.id, at, in_system = state.in_system(), "arrival");
        }

        Self::drain_departures(&mut state, &mut patients, &mut series, None);

        info!(
            patients = patients.len(),
            max_queue = series.max_length().unwrap_or(0),
            "queue simulation finished"
        );
        Ok(SimulationRun {
            patients,
            queue_length: series,
            horizon_minutes: self.horizon_minutes,
        })
    }

    /// Completes every service that ends at or before `until` (all of them
    /// when `until` is `None`), calling waiting patients as the server frees.
    fn drain_departures(
        state: &mut QueueState,
        patients: &mut Vec<Patient>,
        series: &mut QueueLengthSeries,
        until: Option<f64>,
    ) {
        while let Some(free_at) = state.busy_until() {
            if until.is_some_and(|t| free_at > t) {
                break;
            }
            if let Some(next) = state.complete_service() {
                trace!(id = next.id, at = next.service_start, wait = next.wait_time, "called");
                patients.push(next);
            }
            series.record(state.clock(), state.in_system());
        }
    }
}

/// A finished end-to-end run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub seed: u64,
    pub run: SimulationRun,
    pub summary: SummaryStatistics,
}

/// End-to-end run: generate arrivals, queue them, reduce the results.
#[derive(Debug, Clone)]
pub struct HospitalSimulation {
    process: ArrivalProcess,
    aggregator: StatisticsAggregator,
}

impl HospitalSimulation {
    /// Fails with [`SimulationError::InvalidConfiguration`] before anything runs.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let aggregator = StatisticsAggregator::new(config.horizon_hours);
        let process = ArrivalProcess::new(config)?;
        Ok(Self {
            process,
            aggregator,
        })
    }

    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.aggregator = self.aggregator.with_histogram_bins(bins);
        self
    }

    pub fn seed(&self) -> u64 {
        self.process.seed()
    }

    pub fn config(&self) -> &SimulationConfig {
        self.process.config()
    }

    /// Runs from scratch. Every call replays the same seed.
    #[tracing::instrument(skip(self), fields(seed = self.process.seed()))]
    pub fn run(&self) -> Result<SimulationOutcome> {
        info!("running hospital queue simulation");
        let simulator = QueueSimulator::new(self.process.config().horizon_minutes());
        let run = simulator.simulate(self.process.arrivals())?;
        let summary = self.aggregator.aggregate(&run.patients, &run.queue_length);
        info!(
            total_patients = summary.total_patients,
            average_wait = %summary.average_wait,
            "simulation complete"
        );
        Ok(SimulationOutcome {
            seed: self.process.seed(),
            run,
            summary,
        })
    }
}
