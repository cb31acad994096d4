use jiff::Timestamp;
use serde::Serialize;

use crate::define_index_newtype;

use super::{amount::Amount, error::ProblemError, location::Location, time_window::TimeWindow};

define_index_newtype!(VehicleIdx, Vehicle);

pub const DEFAULT_SPEED_KMH: f64 = 40.0;
pub const DEFAULT_COST_PER_KM: f64 = 1.5;

#[derive(Serialize, Debug, Clone)]
pub struct Vehicle {
    external_id: String,
    capacity: Amount,
    speed_kmh: f64,
    cost_per_km: f64,
    depot: Location,
    shift: TimeWindow,
    zone: Option<String>,
}

impl Vehicle {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn capacity(&self) -> &Amount {
        &self.capacity
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    pub fn cost_per_km(&self) -> f64 {
        self.cost_per_km
    }

    pub fn depot(&self) -> &Location {
        &self.depot
    }

    pub fn shift(&self) -> &TimeWindow {
        &self.shift
    }

    pub fn shift_start(&self) -> Option<Timestamp> {
        self.shift.start()
    }

    pub fn shift_end(&self) -> Option<Timestamp> {
        self.shift.end()
    }

    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// Time the vehicle leaves the depot for a solve starting at `solve_start`.
    pub fn departure_from_depot(&self, solve_start: Timestamp) -> Timestamp {
        match self.shift.start() {
            Some(shift_start) if shift_start > solve_start => shift_start,
            _ => solve_start,
        }
    }
}

#[derive(Default)]
pub struct VehicleBuilder {
    external_id: Option<String>,
    capacity: Option<Amount>,
    speed_kmh: Option<f64>,
    cost_per_km: Option<f64>,
    depot: Option<Location>,
    shift: Option<TimeWindow>,
    zone: Option<String>,
}

impl VehicleBuilder {
    pub fn set_vehicle_id(&mut self, external_id: String) -> &mut VehicleBuilder {
        self.external_id = Some(external_id);
        self
    }

    pub fn set_capacity(&mut self, capacity: Amount) -> &mut VehicleBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_speed_kmh(&mut self, speed_kmh: f64) -> &mut VehicleBuilder {
        self.speed_kmh = Some(speed_kmh);
        self
    }

    pub fn set_cost_per_km(&mut self, cost_per_km: f64) -> &mut VehicleBuilder {
        self.cost_per_km = Some(cost_per_km);
        self
    }

    pub fn set_depot(&mut self, depot: Location) -> &mut VehicleBuilder {
        self.depot = Some(depot);
        self
    }

    pub fn set_shift(&mut self, shift: TimeWindow) -> &mut VehicleBuilder {
        self.shift = Some(shift);
        self
    }

    pub fn set_zone(&mut self, zone: String) -> &mut VehicleBuilder {
        self.zone = Some(zone);
        self
    }

    pub fn build(self) -> Result<Vehicle, ProblemError> {
        let external_id = self.external_id.ok_or(ProblemError::MissingField {
            entity: "vehicle",
            field: "id",
        })?;
        let depot = self.depot.ok_or(ProblemError::MissingField {
            entity: "vehicle",
            field: "depot",
        })?;
        let speed_kmh = self.speed_kmh.unwrap_or(DEFAULT_SPEED_KMH);
        let cost_per_km = self.cost_per_km.unwrap_or(DEFAULT_COST_PER_KM);
        let capacity = self.capacity.unwrap_or_default();
        let shift = self.shift.unwrap_or_default();

        if !(speed_kmh.is_finite() && speed_kmh > 0.0) {
            return Err(ProblemError::InvalidSpeed(external_id));
        }

        if !capacity.is_non_negative() || cost_per_km < 0.0 {
            return Err(ProblemError::InvalidCapacity(external_id));
        }

        if !shift.is_well_formed() {
            return Err(ProblemError::InvalidShift(external_id));
        }

        if !depot.is_valid() {
            return Err(ProblemError::InvalidCoordinates(external_id));
        }

        Ok(Vehicle {
            external_id,
            capacity,
            speed_kmh,
            cost_per_km,
            depot,
            shift,
            zone: self.zone,
        })
    }
}
