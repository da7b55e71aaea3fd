use crate::model::patient::Arrival;
use crate::simulation::config::{ServiceTimeDistribution, SimulationConfig};
use crate::error::SimulationError;
use crate::simulation::generator::{gap_distribution, ArrivalProcess};

fn process(rates: &[(u32, f64)], service: ServiceTimeDistribution, hours: u32, seed: u64) -> ArrivalProcess {
    let config = SimulationConfig::new(rates.iter().copied().collect(), service, hours)
        .expect("valid config")
        .with_seed(seed);
    ArrivalProcess::new(config).expect("process")
}

#[test]
fn same_seed_gives_identical_sequences() {
    let service = ServiceTimeDistribution::Exponential { mean: 10.0 };
    let a = process(&[(0, 2.0), (1, 5.0)], service, 2, 42);
    let b = process(&[(0, 2.0), (1, 5.0)], service, 2, 42);

    let first: Vec<Arrival> = a.arrivals().collect();
    let again: Vec<Arrival> = a.arrivals().collect();
    let other: Vec<Arrival> = b.arrivals().collect();
    assert_eq!(first, again, "factory must restart from the seed");
    assert_eq!(first, other, "same seed and config must agree");
}

#[test]
fn arrivals_are_sorted_inside_the_horizon_with_sequential_ids() {
    let p = process(&[(0, 30.0), (1, 45.0), (2, 10.0)], ServiceTimeDistribution::default(), 3, 9);
    let arrivals: Vec<Arrival> = p.arrivals().collect();
    assert!(!arrivals.is_empty());
    for (i, arrival) in arrivals.iter().enumerate() {
        assert_eq!(arrival.id, i as u64);
        assert!(arrival.arrival_time >= 0.0 && arrival.arrival_time < 180.0);
        assert!(arrival.service_duration >= 0.0);
    }
    assert!(arrivals.windows(2).all(|w| w[0].arrival_time <= w[1].arrival_time));
}

#[test]
fn unconfigured_hours_get_no_arrivals() {
    let p = process(&[(1, 60.0)], ServiceTimeDistribution::default(), 3, 5);
    let arrivals: Vec<Arrival> = p.arrivals().collect();
    assert!(!arrivals.is_empty());
    assert!(arrivals
        .iter()
        .all(|a| a.arrival_time >= 60.0 && a.arrival_time < 120.0));
}

#[test]
fn zero_horizon_yields_nothing() {
    let p = process(&[(0, 100.0)], ServiceTimeDistribution::default(), 0, 1);
    assert_eq!(p.arrivals().count(), 0);
}

#[test]
fn rate_profile_repeats_after_a_day() {
    let p = process(&[(0, 60.0)], ServiceTimeDistribution::default(), 25, 3);
    let arrivals: Vec<Arrival> = p.arrivals().collect();
    assert!(arrivals.iter().any(|a| a.arrival_time < 60.0));
    assert!(arrivals.iter().any(|a| a.arrival_time >= 24.0 * 60.0));
    assert!(arrivals
        .iter()
        .all(|a| a.arrival_time < 60.0 || a.arrival_time >= 24.0 * 60.0));
}

#[test]
fn arrival_count_tracks_the_configured_rate() {
    let hours = 10;
    let table: Vec<(u32, f64)> = (0..hours).map(|h| (h, 600.0)).collect();
    let p = process(&table, ServiceTimeDistribution::default(), hours, 123);
    let count = p.arrivals().count() as f64;
    let expected = 600.0 * f64::from(hours);
    assert!(
        (count - expected).abs() < expected * 0.05,
        "got {count} arrivals, expected about {expected}"
    );
}

#[test]
fn service_distribution_does_not_move_arrival_times() {
    let table = [(0, 20.0), (1, 20.0)];
    let exp = process(&table, ServiceTimeDistribution::Exponential { mean: 10.0 }, 2, 77);
    let fixed = process(&table, ServiceTimeDistribution::Fixed { duration: 4.0 }, 2, 77);

    let times = |p: &ArrivalProcess| p.arrivals().map(|a| a.arrival_time).collect::<Vec<_>>();
    assert_eq!(times(&exp), times(&fixed));
    assert!(fixed.arrivals().all(|a| a.service_duration == 4.0));
}

#[test]
fn poisson_service_draws_whole_minutes() {
    let p = process(&[(0, 60.0)], ServiceTimeDistribution::Poisson { mean: 15.0 }, 1, 11);
    let durations: Vec<f64> = p.arrivals().map(|a| a.service_duration).collect();
    assert!(!durations.is_empty());
    assert!(durations.iter().all(|d| d.fract() == 0.0 && *d >= 0.0));
}

#[test]
fn truncating_a_sequence_leaves_the_process_untouched() {
    let p = process(&[(0, 30.0)], ServiceTimeDistribution::default(), 1, 8);
    let head: Vec<Arrival> = p.arrivals().take(3).collect();
    let full: Vec<Arrival> = p.arrivals().collect();
    assert_eq!(head.as_slice(), &full[..head.len()]);
}

#[test]
fn missing_seed_is_resolved_once_and_replayable() {
    let config = SimulationConfig::new(
        [(0, 10.0)].into_iter().collect(),
        ServiceTimeDistribution::default(),
        1,
    )
    .expect("config");
    let p = ArrivalProcess::new(config.clone()).expect("process");
    let replay = ArrivalProcess::new(config.with_seed(p.seed())).expect("replay");
    assert_eq!(p.arrivals().collect::<Vec<_>>(), replay.arrivals().collect::<Vec<_>>());
}

#[test]
fn gap_distribution_rejects_rates_it_cannot_sample() {
    assert!(gap_distribution(3, 0.0).expect("zero rate").is_none());
    assert!(gap_distribution(3, 6.0).expect("positive rate").is_some());
    for bad in [-1.0, f64::NAN] {
        match gap_distribution(3, bad) {
            Err(SimulationError::InvalidConfiguration(msg)) => assert!(msg.contains("hour 3")),
            other => panic!("expected InvalidConfiguration for {bad}, got {other:?}"),
        }
    }
}

#[test]
fn bad_rate_never_becomes_a_silent_empty_hour() {
    let config = SimulationConfig {
        hourly_rates: [(0, 4.0), (1, f64::NAN)].into_iter().collect(),
        horizon_hours: 2,
        seed: Some(1),
        ..SimulationConfig::default()
    };
    assert!(matches!(
        ArrivalProcess::new(config),
        Err(SimulationError::InvalidConfiguration(_))
    ));
}
