// src/error.rs

use thiserror::Error;

/// Everything that can stop a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An arrival was fed to the simulator earlier than the one before it.
    #[error("arrival #{index} at t={found} comes before the previous arrival at t={previous}")]
    InvalidEventOrder {
        index: usize,
        previous: f64,
        found: f64,
    },

    #[error("arrival #{index} has an invalid service duration {duration}")]
    InvalidServiceDuration { index: usize, duration: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
