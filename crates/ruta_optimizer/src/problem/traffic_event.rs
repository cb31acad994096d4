use jiff::Timestamp;
use serde::Serialize;

use super::{error::ProblemError, location::Location, time_window::TimeWindow};

/// Exogenous slowdown around a location, e.g. an accident or road works.
#[derive(Serialize, Debug, Clone)]
pub struct TrafficEvent {
    external_id: String,
    location: Location,
    radius_km: f64,
    delay_multiplier: f64,
    active: TimeWindow,
}

impl TrafficEvent {
    pub fn new(
        external_id: String,
        location: Location,
        radius_km: f64,
        delay_multiplier: f64,
        active: TimeWindow,
    ) -> Result<Self, ProblemError> {
        if !(delay_multiplier.is_finite() && delay_multiplier >= 1.0) {
            return Err(ProblemError::InvalidDelayMultiplier(delay_multiplier));
        }

        if !location.is_valid() || !(radius_km >= 0.0) {
            return Err(ProblemError::InvalidCoordinates(external_id));
        }

        Ok(TrafficEvent {
            external_id,
            location,
            radius_km,
            delay_multiplier,
            active,
        })
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn delay_multiplier(&self) -> f64 {
        self.delay_multiplier
    }

    pub fn is_active_at(&self, at: Timestamp) -> bool {
        self.active.contains(at)
    }

    pub fn affects(&self, location: &Location) -> bool {
        self.location.haversine_distance_km(location) <= self.radius_km
    }
}
