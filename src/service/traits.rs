// src/service/traits.rs

use rand::rngs::StdRng;
use std::fmt::Debug;

/// Draws how long one patient occupies the server.
///
/// The RNG is owned by the caller so that one seed drives the whole run and
/// two samplers fed the same stream produce the same durations.
pub trait ServiceTimeSampler: Debug + Send + Sync {
    /// Returns a service duration in minutes. Never negative.
    fn sample_minutes(&self, rng: &mut StdRng) -> f64;

    /// Expected duration in minutes.
    fn mean_minutes(&self) -> f64;
}
