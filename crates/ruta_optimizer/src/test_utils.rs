use std::sync::Arc;

use jiff::Timestamp;

use crate::{
    problem::{
        amount::Amount,
        location::Location,
        time_window::TimeWindow,
        vehicle::{Vehicle, VehicleBuilder, VehicleIdx},
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
        visit::{Visit, VisitBuilder, VisitIdx},
    },
    solver::solution::working_solution::WorkingSolution,
};

pub const SOLVE_START: &str = "2025-06-10T08:00:00Z";

pub fn solve_start() -> Timestamp {
    SOLVE_START.parse().unwrap()
}

fn day_shift() -> TimeWindow {
    TimeWindow::from_iso(Some("2025-06-10T08:00:00Z"), Some("2025-06-10T18:00:00Z")).unwrap()
}

fn vehicle_builder(id: &str) -> VehicleBuilder {
    let mut builder = VehicleBuilder::default();
    builder
        .set_vehicle_id(id.to_owned())
        .set_depot(Location::from_lat_lon(0.0, 0.0))
        .set_capacity(Amount::quantity(100.0))
        .set_speed_kmh(40.0)
        .set_shift(day_shift());
    builder
}

/// Depot at (0, 0), 100 units of quantity, 40 km/h, shift 08:00 to 18:00.
pub fn vehicle(id: &str) -> Vehicle {
    vehicle_builder(id).build().unwrap()
}

pub fn vehicle_with_capacity(id: &str, capacity: Amount) -> Vehicle {
    let mut builder = vehicle_builder(id);
    builder.set_capacity(capacity);
    builder.build().unwrap()
}

pub fn vehicle_with_speed(id: &str, speed_kmh: f64) -> Vehicle {
    let mut builder = vehicle_builder(id);
    builder.set_speed_kmh(speed_kmh);
    builder.build().unwrap()
}

pub fn vehicle_with_shift(id: &str, shift: TimeWindow) -> Vehicle {
    let mut builder = vehicle_builder(id);
    builder.set_shift(shift);
    builder.build().unwrap()
}

pub fn vehicle_in_zone(id: &str, zone: &str) -> Vehicle {
    let mut builder = vehicle_builder(id);
    builder.set_zone(zone.to_owned());
    builder.build().unwrap()
}

pub struct TestVisit {
    id: Option<String>,
    lat: f64,
    lon: f64,
    zone: Option<String>,
    demand: Amount,
    priority: u32,
    service_minutes: i64,
    window: TimeWindow,
}

impl TestVisit {
    /// Visit without demand, service time or window.
    pub fn at(lat: f64, lon: f64) -> Self {
        TestVisit {
            id: None,
            lat,
            lon,
            zone: None,
            demand: Amount::ZERO,
            priority: 1,
            service_minutes: 0,
            window: TimeWindow::default(),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    pub fn demand(mut self, quantity: f64) -> Self {
        self.demand = Amount::quantity(quantity);
        self
    }

    pub fn amount(mut self, demand: Amount) -> Self {
        self.demand = demand;
        self
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn service(mut self, minutes: i64) -> Self {
        self.service_minutes = minutes;
        self
    }

    pub fn zone(mut self, zone: &str) -> Self {
        self.zone = Some(zone.to_owned());
        self
    }

    pub fn window(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.window = TimeWindow::from_iso(start, end).unwrap();
        self
    }

    fn build_with_default_id(self, default_id: String) -> Visit {
        let mut location = Location::from_lat_lon(self.lat, self.lon);
        if let Some(zone) = self.zone {
            location = location.with_zone(zone);
        }

        let mut builder = VisitBuilder::default();
        builder
            .set_external_id(self.id.unwrap_or(default_id))
            .set_location(location)
            .set_demand(self.demand)
            .set_priority(self.priority)
            .set_service_minutes(self.service_minutes)
            .set_time_window(self.window);
        builder.build().unwrap()
    }

    pub fn build(self) -> Visit {
        self.build_with_default_id(String::from("visit"))
    }
}

pub fn create_named_test_problem(
    id: &str,
    solve_start: Timestamp,
    vehicles: Vec<Vehicle>,
    visits: Vec<TestVisit>,
) -> VehicleRoutingProblem {
    let mut builder = VehicleRoutingProblemBuilder::default();
    builder
        .set_id(id.to_owned())
        .set_solve_start(solve_start)
        .set_vehicles(vehicles)
        .set_visits(
            visits
                .into_iter()
                .enumerate()
                .map(|(index, visit)| visit.build_with_default_id(format!("visit-{index}")))
                .collect(),
        );
    builder.build().unwrap()
}

pub fn create_test_problem_starting_at(
    solve_start: Timestamp,
    vehicles: Vec<Vehicle>,
    visits: Vec<TestVisit>,
) -> VehicleRoutingProblem {
    create_named_test_problem("test-plan", solve_start, vehicles, visits)
}

pub fn create_test_problem(vehicles: Vec<Vehicle>, visits: Vec<TestVisit>) -> VehicleRoutingProblem {
    create_test_problem_starting_at(solve_start(), vehicles, visits)
}

/// Settled solution with the given visit indices per vehicle, in order.
pub fn create_test_solution(
    problem: VehicleRoutingProblem,
    routes: &[&[usize]],
) -> WorkingSolution {
    let routes = routes
        .iter()
        .enumerate()
        .map(|(vehicle_index, visits)| {
            (
                VehicleIdx::new(vehicle_index),
                visits.iter().copied().map(VisitIdx::new).collect(),
            )
        })
        .collect::<Vec<_>>();

    WorkingSolution::from_routes(Arc::new(problem), &routes).unwrap()
}

pub fn route_of(solution: &WorkingSolution, vehicle_index: usize) -> Vec<usize> {
    solution
        .chain(VehicleIdx::new(vehicle_index))
        .map(|visit_id| visit_id.get())
        .collect()
}
