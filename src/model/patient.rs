// src/model/patient.rs

use crate::simulation::config::MINUTES_PER_HOUR;
use serde::{Deserialize, Serialize};

/// A generated arrival: when the patient shows up and how long they will
/// need at the server once called. Times are minutes from the start of hour 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrival {
    pub id: u64,
    pub arrival_time: f64,
    pub service_duration: f64,
}

impl Arrival {
    pub fn new(id: u64, arrival_time: f64, service_duration: f64) -> Self {
        Self {
            id,
            arrival_time,
            service_duration,
        }
    }
}

/// A fully served patient. Built once, when the patient is called to the
/// server, and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: u64,
    pub arrival_time: f64,
    pub service_start: f64,
    pub service_duration: f64,
    pub departure_time: f64,
    pub wait_time: f64,
}

impl Patient {
    /// Calls `arrival` to the server at `service_start`.
    pub(crate) fn serve(arrival: Arrival, service_start: f64) -> Self {
        Self {
            id: arrival.id,
            arrival_time: arrival.arrival_time,
            service_start,
            service_duration: arrival.service_duration,
            departure_time: service_start + arrival.service_duration,
            wait_time: service_start - arrival.arrival_time,
        }
    }

    /// Zero-based hour bucket the arrival falls into. An arrival exactly on
    /// an hour boundary belongs to the hour it opens. `None` when the hour is
    /// negative or too large to index.
    pub fn arrival_hour(&self) -> Option<u32> {
        let hour = (self.arrival_time / MINUTES_PER_HOUR).floor();
        if hour >= 0.0 && hour <= f64::from(u32::MAX) {
            Some(hour as u32)
        } else {
            None
        }
    }
}
