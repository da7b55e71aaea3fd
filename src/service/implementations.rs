// src/service/implementations.rs

use crate::error::{Result, SimulationError};
use crate::service::traits::ServiceTimeSampler;
use crate::simulation::config::ServiceTimeDistribution;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Exp, Poisson};

// =========================================================================
// 1. Exponential Service
// =========================================================================

/// Memoryless service times: most visits are short, a few run long.
#[derive(Debug, Clone)]
pub struct ExponentialService {
    mean: f64,
    dist: Exp<f64>,
}

impl ExponentialService {
    pub fn new(mean: f64) -> Result<Self> {
        let dist = Exp::new(1.0 / mean).map_err(|e| {
            SimulationError::InvalidConfiguration(format!("exponential service mean {mean}: {e}"))
        })?;
        Ok(Self { mean, dist })
    }
}

impl ServiceTimeSampler for ExponentialService {
    fn sample_minutes(&self, rng: &mut StdRng) -> f64 {
        self.dist.sample(rng)
    }

    fn mean_minutes(&self) -> f64 {
        self.mean
    }
}

// =========================================================================
// 2. Poisson Service
// =========================================================================

/// Whole-minute service times drawn from a Poisson law. A draw of zero is a
/// patient who is seen and sent away immediately.
#[derive(Debug, Clone)]
pub struct PoissonService {
    mean: f64,
    dist: Poisson<f64>,
}

impl PoissonService {
    pub fn new(mean: f64) -> Result<Self> {
        let dist = Poisson::new(mean).map_err(|e| {
            SimulationError::InvalidConfiguration(format!("poisson service mean {mean}: {e}"))
        })?;
        Ok(Self { mean, dist })
    }
}

impl ServiceTimeSampler for PoissonService {
    fn sample_minutes(&self, rng: &mut StdRng) -> f64 {
        self.dist.sample(rng)
    }

    fn mean_minutes(&self) -> f64 {
        self.mean
    }
}

// =========================================================================
// 3. Fixed Service
// =========================================================================

/// Every patient takes the same time. Handy for hand-checkable runs.
#[derive(Debug, Clone)]
pub struct FixedService {
    duration: f64,
}

impl FixedService {
    pub fn new(duration: f64) -> Self {
        Self { duration }
    }
}

impl ServiceTimeSampler for FixedService {
    fn sample_minutes(&self, _rng: &mut StdRng) -> f64 {
        self.duration
    }

    fn mean_minutes(&self) -> f64 {
        self.duration
    }
}

impl ServiceTimeDistribution {
    /// Validates the parameters and builds the matching sampler.
    pub fn sampler(&self) -> Result<Box<dyn ServiceTimeSampler>> {
        self.validate()?;
        Ok(match *self {
            Self::Exponential { mean } => Box::new(ExponentialService::new(mean)?),
            Self::Poisson { mean } => Box::new(PoissonService::new(mean)?),
            Self::Fixed { duration } => Box::new(FixedService::new(duration)),
        })
    }
}
