//! Single-queue hospital service simulation.
//!
//! Patients arrive by a Poisson process whose rate changes hour by hour, wait
//! in one FIFO line and are seen by one server. A run yields per-patient
//! records, an event-sampled queue-length series and summary statistics.

pub mod error;
pub mod io;
pub mod model;
pub mod service;
pub mod simulation;

pub use error::{Result, SimulationError};
pub use model::patient::{Arrival, Patient};
pub use simulation::config::{ServiceTimeDistribution, SimulationConfig};
pub use simulation::engine::{HospitalSimulation, QueueSimulator, SimulationOutcome, SimulationRun};
pub use simulation::generator::{ArrivalProcess, Arrivals};
pub use simulation::statistics::{HourlyBucket, Metric, StatisticsAggregator, SummaryStatistics};

#[cfg(test)]
mod test;
