use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{
    problem::{
        amount::Amount,
        error::ProblemError,
        location::Location,
        time_window::TimeWindow,
        traffic_event::TrafficEvent,
        vehicle::{Vehicle, VehicleBuilder},
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
        visit::{Visit, VisitBuilder},
    },
    solver::solver_params::{DEFAULT_OPTIMIZATION_SECONDS, SolverParams},
};

/// `[lon, lat]` pair.
pub type JsonCoordinates = [f64; 2];

fn location(coordinates: &JsonCoordinates, zone: Option<&String>) -> Location {
    let location = Location::from_lat_lon(coordinates[1], coordinates[0]);
    match zone {
        Some(zone) => location.with_zone(zone.clone()),
        None => location,
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
#[serde(deny_unknown_fields, rename = "RoutePlanRequest")]
pub struct JsonRoutePlanRequest {
    /// Plan id, generated when absent.
    pub id: Option<String>,
    /// Earliest time any vehicle may leave its depot. Defaults to now.
    pub planning_start: Option<Timestamp>,
    /// Visits whose time window misses this range are left out.
    pub date_range: Option<JsonDateRange>,
    pub vehicles: Vec<JsonVehicle>,
    pub visits: Vec<JsonVisit>,
    /// Wall-clock budget, 5 to 300 seconds.
    pub max_optimization_time_seconds: Option<i64>,
    /// Keeps vehicles with a zone inside it, as a hard rule.
    pub zone_affinity: Option<bool>,
    #[serde(default)]
    pub traffic_events: Vec<JsonTrafficEvent>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy)]
#[serde(deny_unknown_fields, rename = "DateRange")]
pub struct JsonDateRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
#[serde(deny_unknown_fields, rename = "Vehicle")]
pub struct JsonVehicle {
    pub id: String,
    pub capacity: Option<Amount>,
    pub speed_kmh: Option<f64>,
    pub cost_per_km: Option<f64>,
    pub depot: JsonCoordinates,
    pub shift: Option<TimeWindow>,
    pub zone: Option<String>,
}

impl JsonVehicle {
    fn build(&self) -> Result<Vehicle, ProblemError> {
        let mut builder = VehicleBuilder::default();

        builder
            .set_vehicle_id(self.id.clone())
            .set_depot(location(&self.depot, None));

        if let Some(capacity) = self.capacity {
            builder.set_capacity(capacity);
        }

        if let Some(speed_kmh) = self.speed_kmh {
            builder.set_speed_kmh(speed_kmh);
        }

        if let Some(cost_per_km) = self.cost_per_km {
            builder.set_cost_per_km(cost_per_km);
        }

        if let Some(shift) = self.shift {
            builder.set_shift(shift);
        }

        if let Some(zone) = &self.zone {
            builder.set_zone(zone.clone());
        }

        builder.build()
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
#[serde(deny_unknown_fields, rename = "Visit")]
pub struct JsonVisit {
    pub id: String,
    pub order_id: Option<String>,
    pub customer_id: Option<String>,
    pub coordinates: JsonCoordinates,
    pub demand: Option<Amount>,
    pub priority: Option<u32>,
    pub service_minutes: Option<i64>,
    pub time_window: Option<TimeWindow>,
    pub customer_time_window: Option<TimeWindow>,
    pub zone: Option<String>,
}

impl JsonVisit {
    fn build(&self) -> Result<Visit, ProblemError> {
        let mut builder = VisitBuilder::default();

        builder
            .set_external_id(self.id.clone())
            .set_location(location(&self.coordinates, self.zone.as_ref()));

        if let Some(order_id) = &self.order_id {
            builder.set_order_id(order_id.clone());
        }

        if let Some(customer_id) = &self.customer_id {
            builder.set_customer_id(customer_id.clone());
        }

        if let Some(demand) = self.demand {
            builder.set_demand(demand);
        }

        if let Some(priority) = self.priority {
            builder.set_priority(priority);
        }

        if let Some(service_minutes) = self.service_minutes {
            builder.set_service_minutes(service_minutes);
        }

        if let Some(time_window) = self.time_window {
            builder.set_time_window(time_window);
        }

        if let Some(time_window) = self.customer_time_window {
            builder.set_customer_time_window(time_window);
        }

        builder.build()
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "TrafficEvent")]
pub struct JsonTrafficEvent {
    pub id: String,
    pub coordinates: JsonCoordinates,
    pub radius_km: f64,
    pub delay_multiplier: f64,
    pub start: Timestamp,
    /// Open-ended when absent.
    pub end: Option<Timestamp>,
}

impl JsonTrafficEvent {
    pub fn build(&self) -> Result<TrafficEvent, ProblemError> {
        TrafficEvent::new(
            self.id.clone(),
            location(&self.coordinates, None),
            self.radius_km,
            self.delay_multiplier,
            TimeWindow::new(Some(self.start), self.end),
        )
    }
}

/// Events reported after a plan was optimized.
#[derive(Serialize, Deserialize, JsonSchema, Debug)]
#[serde(deny_unknown_fields, rename = "TrafficEvents")]
pub struct JsonTrafficEvents {
    /// Moment the events are evaluated at. Defaults to now.
    pub at: Option<Timestamp>,
    pub events: Vec<JsonTrafficEvent>,
}

pub fn build_traffic_events(events: &[JsonTrafficEvent]) -> Result<Vec<TrafficEvent>, ProblemError> {
    events.iter().map(JsonTrafficEvent::build).collect()
}

impl JsonRoutePlanRequest {
    #[instrument(skip_all, level = "debug")]
    pub fn build_problem(&self) -> Result<VehicleRoutingProblem, anyhow::Error> {
        let date_range = match self.date_range {
            Some(range) if range.start >= range.end => {
                return Err(ProblemError::MalformedDateRange.into());
            }
            Some(range) => Some(TimeWindow::new(Some(range.start), Some(range.end))),
            None => None,
        };

        let vehicles = self
            .vehicles
            .iter()
            .map(JsonVehicle::build)
            .collect::<Result<Vec<_>, _>>()?;

        let mut visits = self
            .visits
            .iter()
            .map(JsonVisit::build)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(range) = date_range {
            let total = visits.len();
            visits.retain(|visit| {
                let in_range = visit.time_window().overlaps(&range);
                if !in_range {
                    warn!(
                        visit_id = visit.external_id(),
                        "Visit window outside the planning range, skipping"
                    );
                }
                in_range
            });

            if visits.is_empty() && total > 0 {
                return Err(ProblemError::NoVisits.into());
            }
        }

        let mut builder = VehicleRoutingProblemBuilder::default();

        if let Some(id) = &self.id {
            builder.set_id(id.clone());
        }

        if let Some(planning_start) = self.planning_start {
            builder.set_solve_start(planning_start);
        }

        builder.set_vehicles(vehicles).set_visits(visits);

        Ok(builder.build()?)
    }

    pub fn solver_params(&self) -> Result<SolverParams, ProblemError> {
        let mut params = SolverParams::from_optimization_seconds(
            self.max_optimization_time_seconds
                .unwrap_or(DEFAULT_OPTIMIZATION_SECONDS),
        )?;
        params.zone_affinity = self.zone_affinity.unwrap_or(false);

        Ok(params)
    }

    pub fn traffic_events(&self) -> Result<Vec<TrafficEvent>, ProblemError> {
        build_traffic_events(&self.traffic_events)
    }
}
