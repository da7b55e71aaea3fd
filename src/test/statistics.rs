use super::{arrivals, assert_close};
use crate::model::queues::QueueLengthSeries;
use crate::simulation::engine::QueueSimulator;
use crate::simulation::statistics::{Metric, StatisticsAggregator};

#[test]
fn hand_checked_summary() {
    let run = QueueSimulator::new(60.0)
        .simulate(arrivals(&[(0.0, 10.0), (5.0, 10.0), (30.0, 5.0)]))
        .expect("ordered input");
    let s = StatisticsAggregator::new(1).aggregate(&run.patients, &run.queue_length);

    assert_eq!(s.total_patients, 3);
    assert_close(s.average_wait.value().expect("wait"), 5.0 / 3.0);
    assert_eq!(s.max_wait, Metric::Value(5.0));
    assert_close(s.average_service_time.value().expect("service"), 25.0 / 3.0);
    assert_close(s.average_queue_length.value().expect("queue"), 0.5);
    assert_eq!(s.max_queue_length, Some(2));
    assert_close(s.server_utilization.value().expect("util"), 25.0 / 60.0);

    assert_eq!(s.hourly.len(), 1);
    assert_eq!(s.hourly[0].hour, 0);
    assert_eq!(s.hourly[0].arrivals, 3);
    assert_close(s.hourly[0].average_wait.value().expect("hourly"), 5.0 / 3.0);
}

#[test]
fn boundary_arrival_belongs_to_the_hour_it_opens() {
    let run = QueueSimulator::new(120.0)
        .simulate(arrivals(&[(59.5, 1.0), (60.0, 1.0), (61.0, 1.0)]))
        .expect("ordered input");
    let s = StatisticsAggregator::new(2).aggregate(&run.patients, &run.queue_length);
    assert_eq!(s.hourly[0].arrivals, 1);
    assert_eq!(s.hourly[1].arrivals, 2);
}

#[test]
fn quiet_hours_have_no_wait_data() {
    let run = QueueSimulator::new(180.0)
        .simulate(arrivals(&[(10.0, 1.0), (130.0, 1.0)]))
        .expect("ordered input");
    let s = StatisticsAggregator::new(3).aggregate(&run.patients, &run.queue_length);
    let counts: Vec<usize> = s.hourly.iter().map(|b| b.arrivals).collect();
    assert_eq!(counts, vec![1, 0, 1]);
    assert_eq!(s.hourly[1].average_wait, Metric::NoData);
    assert_eq!(s.hourly[0].average_wait, Metric::Value(0.0));
}

#[test]
fn zero_horizon_is_all_no_data() {
    let s = StatisticsAggregator::new(0).aggregate(&[], &QueueLengthSeries::starting_empty());
    assert!(s.is_empty());
    assert_eq!(s.total_patients, 0);
    for metric in [
        s.average_wait,
        s.max_wait,
        s.average_service_time,
        s.average_queue_length,
        s.server_utilization,
    ] {
        assert!(metric.is_no_data());
    }
    assert_eq!(s.max_queue_length, None);
    assert!(s.hourly.is_empty());
    assert!(s.wait_histogram.counts.is_empty());
}

#[test]
fn quiet_horizon_has_zero_queue_but_no_waits() {
    let s = StatisticsAggregator::new(2).aggregate(&[], &QueueLengthSeries::starting_empty());
    assert!(s.is_empty());
    assert_eq!(s.average_wait, Metric::NoData);
    assert_eq!(s.average_queue_length, Metric::Value(0.0));
    assert_eq!(s.max_queue_length, Some(0));
    assert_eq!(s.server_utilization, Metric::Value(0.0));
    assert_eq!(s.hourly.len(), 2);
}

#[test]
fn aggregation_is_repeatable() {
    let run = QueueSimulator::new(60.0)
        .simulate(arrivals(&[(1.0, 7.0), (2.0, 3.0), (4.0, 9.0), (40.0, 2.0)]))
        .expect("ordered input");
    let agg = StatisticsAggregator::new(1);
    assert_eq!(
        agg.aggregate(&run.patients, &run.queue_length),
        agg.aggregate(&run.patients, &run.queue_length)
    );
}

#[test]
fn wait_histogram_spans_zero_to_longest_wait() {
    // the first patient is seen at once; the ten behind each wait 99 minutes
    let mut list = vec![(0.0, 100.0)];
    list.extend((1..=10).map(|i| (f64::from(i), 1.0)));
    let run = QueueSimulator::new(120.0).simulate(arrivals(&list)).expect("ordered input");
    let s = StatisticsAggregator::new(2)
        .with_histogram_bins(5)
        .aggregate(&run.patients, &run.queue_length);

    let h = &s.wait_histogram;
    assert_eq!(h.counts.len(), 5);
    assert_eq!(h.counts, vec![1, 0, 0, 0, 10]);
    let longest = s.max_wait.value().expect("waits");
    assert_close(h.bin_width * 5.0, longest);
    let (_, upper, _) = h.bins().last().expect("bins");
    assert_close(upper, longest);
}

#[test]
fn metric_display_and_json() {
    assert_eq!(format!("{:.2}", Metric::Value(1.234)), "1.23");
    assert_eq!(format!("{:.2}", Metric::NoData), "no data");
    assert_eq!(format!("{:>9.2}", Metric::NoData), "  no data");
    assert_eq!(serde_json::to_string(&Metric::NoData).expect("json"), "null");
    assert_eq!(serde_json::to_string(&Metric::Value(2.5)).expect("json"), "2.5");
    assert_eq!(Metric::from(None), Metric::NoData);
}

#[test]
fn arrivals_far_past_the_horizon_stay_out_of_the_hourly_series() {
    let run = QueueSimulator::new(60.0)
        .simulate(arrivals(&[(1.0, 1.0), (6.0e9, 1.0), (3.0e11, 1.0)]))
        .expect("ordered input");
    let s = StatisticsAggregator::new(1).aggregate(&run.patients, &run.queue_length);

    assert_eq!(s.total_patients, 3);
    assert_eq!(s.hourly.len(), 1);
    assert_eq!(s.hourly[0].arrivals, 1);
    assert_eq!(s.arrivals_after_horizon, 2);
}

#[test]
fn arrival_at_the_horizon_end_is_counted_as_late() {
    let run = QueueSimulator::new(120.0)
        .simulate(arrivals(&[(30.0, 1.0), (120.0, 1.0)]))
        .expect("ordered input");
    let s = StatisticsAggregator::new(2).aggregate(&run.patients, &run.queue_length);
    let counts: Vec<usize> = s.hourly.iter().map(|b| b.arrivals).collect();
    assert_eq!(counts, vec![1, 0]);
    assert_eq!(s.arrivals_after_horizon, 1);
}
