use jiff::{SignedDuration, Timestamp};
use serde::Serialize;

use crate::problem::amount::Amount;

/// State derived from the chain topology, never authoritative input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShadowState {
    pub arrival_time: Option<Timestamp>,
    pub departure_time: Option<Timestamp>,
    pub waiting_duration: SignedDuration,
    pub distance_from_predecessor_km: f64,
    pub travel_minutes_from_predecessor: i64,
    pub accumulated: Amount,
}

impl ShadowState {
    pub fn distance_from_predecessor_meters(&self) -> i64 {
        (self.distance_from_predecessor_km * 1000.0).round() as i64
    }
}
