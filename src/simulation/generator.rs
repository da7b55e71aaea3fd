// src/simulation/generator.rs

use crate::error::{Result, SimulationError};
use crate::model::patient::Arrival;
use crate::service::traits::ServiceTimeSampler;
use crate::simulation::config::{SimulationConfig, HOURS_PER_DAY, MINUTES_PER_HOUR};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Mixed into the seed for the service-duration stream so arrival gaps and
/// service draws never share random numbers.
const SERVICE_STREAM: u64 = 0x5EED_5E41_1CE0_0001;

/// Inter-arrival gap law for an hour with `rate` arrivals per hour. `None`
/// only for a zero rate; any rate `Exp` refuses is a configuration error.
pub(crate) fn gap_distribution(hour: u32, rate: f64) -> Result<Option<Exp<f64>>> {
    if rate == 0.0 {
        return Ok(None);
    }
    Exp::new(rate / MINUTES_PER_HOUR).map(Some).map_err(|e| {
        SimulationError::InvalidConfiguration(format!("arrival rate {rate} for hour {hour}: {e}"))
    })
}

/// Turns a config into arrival sequences.
///
/// Each call to [`ArrivalProcess::arrivals`] starts over from the same seed,
/// so the same process always yields the same patients.
#[derive(Debug, Clone)]
pub struct ArrivalProcess {
    config: SimulationConfig,
    seed: u64,
    service: Arc<dyn ServiceTimeSampler>,
    /// Gap law per hour of day.
    gaps: Arc<[Option<Exp<f64>>]>,
}

impl ArrivalProcess {
    /// Validates `config` and fixes the seed. A config without a seed gets one
    /// from the OS; read it back with [`ArrivalProcess::seed`] to replay the run.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let service: Arc<dyn ServiceTimeSampler> = Arc::from(config.service.sampler()?);
        let gaps = (0..HOURS_PER_DAY)
            .map(|hour| gap_distribution(hour, config.rate_for_hour(hour)))
            .collect::<Result<Vec<_>>>()?;
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        info!(
            seed,
            horizon_hours = config.horizon_hours,
            service_mean = service.mean_minutes(),
            "arrival process ready"
        );
        Ok(Self {
            config,
            seed,
            service,
            gaps: gaps.into(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// A fresh, lazy sequence of arrivals in time order.
    pub fn arrivals(&self) -> Arrivals {
        let mut arrivals = Arrivals {
            horizon_hours: self.config.horizon_hours,
            gaps: Arc::clone(&self.gaps),
            service: Arc::clone(&self.service),
            arrival_rng: StdRng::seed_from_u64(self.seed),
            service_rng: StdRng::seed_from_u64(self.seed ^ SERVICE_STREAM),
            hour: 0,
            clock: 0.0,
            gap: None,
            next_id: 0,
        };
        arrivals.enter_hour(0);
        arrivals
    }
}

/// Lazy arrival stream covering the horizon. Dropping it early is always safe.
///
/// Within hour `h` gaps are exponential with the hour's rate. A gap that runs
/// past the end of the hour is thrown away and sampling restarts at the next
/// hour's start, which is exact for a memoryless process.
#[derive(Debug)]
pub struct Arrivals {
    horizon_hours: u32,
    gaps: Arc<[Option<Exp<f64>>]>,
    service: Arc<dyn ServiceTimeSampler>,
    arrival_rng: StdRng,
    service_rng: StdRng,
    hour: u32,
    clock: f64,
    gap: Option<Exp<f64>>,
    next_id: u64,
}

impl Arrivals {
    /// Moves to the start of the next hour and loads its gap distribution.
    fn enter_hour(&mut self, hour: u32) {
        self.hour = hour;
        self.clock = f64::from(hour) * MINUTES_PER_HOUR;
        self.gap = self.gaps[(hour % HOURS_PER_DAY) as usize];
        debug!(hour, has_arrivals = self.gap.is_some(), "entering hour bucket");
    }
}

impl Iterator for Arrivals {
    type Item = Arrival;

    fn next(&mut self) -> Option<Arrival> {
        while self.hour < self.horizon_hours {
            let bucket_end = f64::from(self.hour + 1) * MINUTES_PER_HOUR;
            if let Some(gap) = self.gap {
                let candidate = self.clock + gap.sample(&mut self.arrival_rng);
                if candidate < bucket_end {
                    self.clock = candidate;
                    let duration = self.service.sample_minutes(&mut self.service_rng);
                    let arrival = Arrival::new(self.next_id, candidate, duration);
                    self.next_id += 1;
                    trace!(id = arrival.id, at = candidate, duration, "arrival");
                    return Some(arrival);
                }
            }
            self.enter_hour(self.hour + 1);
        }
        None
    }
}
