// src/model/queues.rs

use crate::model::patient::{Arrival, Patient};
use serde::Serialize;
use std::collections::VecDeque;

/// Number of patients in the system (waiting or being served) from `time`
/// until the next sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueueLengthSample {
    pub time: f64,
    pub length: usize,
}

/// Step function of queue length, sampled at every arrival and departure.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueueLengthSeries {
    samples: Vec<QueueLengthSample>,
}

impl QueueLengthSeries {
    /// A series that starts empty at t=0.
    pub fn starting_empty() -> Self {
        Self {
            samples: vec![QueueLengthSample {
                time: 0.0,
                length: 0,
            }],
        }
    }

    /// Builds a series from samples already in time order.
    pub fn from_samples(samples: Vec<QueueLengthSample>) -> Self {
        Self { samples }
    }

    pub fn record(&mut self, time: f64, length: usize) {
        self.samples.push(QueueLengthSample { time, length });
    }

    pub fn samples(&self) -> &[QueueLengthSample] {
        &self.samples
    }

    /// Length in force at `time`: the last sample at or before it.
    pub fn length_at(&self, time: f64) -> usize {
        let idx = self.samples.partition_point(|s| s.time <= time);
        if idx == 0 {
            0
        } else {
            self.samples[idx - 1].length
        }
    }

    pub fn max_length(&self) -> Option<usize> {
        self.samples.iter().map(|s| s.length).max()
    }

    /// Average length over `[0, window_end]`, each value weighted by how long
    /// it held. `None` for an empty window.
    pub fn time_weighted_average(&self, window_end: f64) -> Option<f64> {
        if window_end.is_nan() || window_end <= 0.0 {
            return None;
        }
        let mut area = 0.0;
        for (i, sample) in self.samples.iter().enumerate() {
            let start = sample.time.max(0.0);
            if start >= window_end {
                break;
            }
            let end = self
                .samples
                .get(i + 1)
                .map_or(window_end, |next| next.time.min(window_end));
            if end > start {
                area += sample.length as f64 * (end - start);
            }
        }
        Some(area / window_end)
    }
}

/// Live state of the single-server FIFO line.
#[derive(Debug, Default)]
pub struct QueueState {
    waiting: VecDeque<Arrival>,
    in_service: Option<Patient>,
    clock: f64,
}

impl QueueState {
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn is_busy(&self) -> bool {
        self.in_service.is_some()
    }

    /// Time the current patient leaves, if the server is busy.
    pub fn busy_until(&self) -> Option<f64> {
        self.in_service.map(|p| p.departure_time)
    }

    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }

    /// Patients waiting plus the one being served.
    pub fn in_system(&self) -> usize {
        self.waiting.len() + usize::from(self.is_busy())
    }

    /// Ends the current service at its departure time and calls the next
    /// waiting patient, who is returned. No-op on an idle server.
    pub fn complete_service(&mut self) -> Option<Patient> {
        let finished = self.in_service.take()?;
        self.clock = finished.departure_time;
        let next = self.waiting.pop_front()?;
        let patient = Patient::serve(next, self.clock);
        self.in_service = Some(patient);
        Some(patient)
    }

    /// Puts a new arrival in line. Returns the patient record if they went
    /// straight to an idle server.
    pub fn admit(&mut self, arrival: Arrival) -> Option<Patient> {
        self.clock = arrival.arrival_time;
        if self.in_service.is_none() && self.waiting.is_empty() {
            let patient = Patient::serve(arrival, self.clock);
            self.in_service = Some(patient);
            Some(patient)
        } else {
            self.waiting.push_back(arrival);
            None
        }
    }
}
