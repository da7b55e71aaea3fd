// src/simulation/config.rs

use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minutes in one simulated hour. The clock runs in minutes.
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Hours in the daily rate profile. Longer horizons repeat it.
pub const HOURS_PER_DAY: u32 = 24;

/// How long a patient occupies the server, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceTimeDistribution {
    /// Exponentially distributed durations with the given mean.
    Exponential { mean: f64 },
    /// Whole-minute durations drawn from a Poisson law with the given mean.
    Poisson { mean: f64 },
    /// Every patient takes exactly `duration` minutes.
    Fixed { duration: f64 },
}

impl ServiceTimeDistribution {
    /// Exponential service for a server that handles `per_hour` patients an hour.
    pub fn from_service_rate(per_hour: f64) -> Result<Self> {
        if !(per_hour.is_finite() && per_hour > 0.0) {
            return Err(SimulationError::InvalidConfiguration(format!(
                "service rate must be positive, got {per_hour}"
            )));
        }
        Ok(Self::Exponential {
            mean: MINUTES_PER_HOUR / per_hour,
        })
    }

    /// Expected service duration in minutes.
    pub fn mean(&self) -> f64 {
        match *self {
            Self::Exponential { mean } | Self::Poisson { mean } => mean,
            Self::Fixed { duration } => duration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let (name, value) = match *self {
            Self::Exponential { mean } => ("exponential service mean", mean),
            Self::Poisson { mean } => ("poisson service mean", mean),
            Self::Fixed { duration } => ("fixed service duration", duration),
        };
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(SimulationError::InvalidConfiguration(format!(
                "{name} must be positive, got {value}"
            )))
        }
    }
}

impl Default for ServiceTimeDistribution {
    fn default() -> Self {
        // 4 patients an hour
        Self::Exponential { mean: 15.0 }
    }
}

/// Inputs to one simulated run. Validated eagerly and never mutated after a
/// run has started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Hour of day (0..24) to mean arrivals per hour. Missing hours get no arrivals.
    pub hourly_rates: BTreeMap<u32, f64>,
    pub service: ServiceTimeDistribution,
    pub horizon_hours: u32,
    /// Fixed seed for reproducible runs. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn new(
        hourly_rates: BTreeMap<u32, f64>,
        service: ServiceTimeDistribution,
        horizon_hours: u32,
    ) -> Result<Self> {
        let config = Self {
            hourly_rates,
            service,
            horizon_hours,
            seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects non-positive rates or means and rate keys outside the day.
    pub fn validate(&self) -> Result<()> {
        for (&hour, &rate) in &self.hourly_rates {
            if hour >= HOURS_PER_DAY {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "hourly rate table has hour {hour}, expected 0..{HOURS_PER_DAY}"
                )));
            }
            if !(rate.is_finite() && rate > 0.0) {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "arrival rate for hour {hour} must be positive, got {rate}"
                )));
            }
        }
        self.service.validate()
    }

    /// Arrivals per hour during horizon hour `hour`; zero when unconfigured.
    pub fn rate_for_hour(&self, hour: u32) -> f64 {
        self.hourly_rates
            .get(&(hour % HOURS_PER_DAY))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn horizon_minutes(&self) -> f64 {
        f64::from(self.horizon_hours) * MINUTES_PER_HOUR
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        // Quiet nights, a morning peak and a smaller evening bump.
        let profile = [
            1.0, 1.0, 0.5, 0.5, 0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 5.0, 4.0, //
            3.5, 3.5, 3.0, 3.0, 3.5, 4.0, 4.5, 4.0, 3.0, 2.0, 1.5, 1.0,
        ];
        let hourly_rates = (0..HOURS_PER_DAY).zip(profile).collect();
        Self {
            hourly_rates,
            service: ServiceTimeDistribution::default(),
            horizon_hours: HOURS_PER_DAY,
            seed: None,
        }
    }
}
