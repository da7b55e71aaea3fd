mod generator;
mod statistics;

use crate::model::patient::Arrival;

/// Arrivals from `(arrival_time, service_duration)` pairs, ids in list order.
pub(crate) fn arrivals(list: &[(f64, f64)]) -> Vec<Arrival> {
    list.iter()
        .enumerate()
        .map(|(i, &(at, duration))| Arrival::new(i as u64, at, duration))
        .collect()
}

pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
