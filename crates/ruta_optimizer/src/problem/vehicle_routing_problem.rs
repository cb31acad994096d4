use fxhash::{FxHashMap, FxHashSet};
use jiff::Timestamp;

use super::{
    error::ProblemError,
    location::Location,
    travel::{MAX_PLANNING_MINUTES, clamp_minutes, distance_km, travel_time_minutes},
    vehicle::{Vehicle, VehicleIdx},
    visit::{Visit, VisitIdx},
};

/// Distance and travel time of a single hop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Leg {
    pub distance_km: f64,
    pub minutes: i64,
}

/// Facts of one solve. Immutable once built; traffic is applied by deriving a new problem.
#[derive(Debug, Clone)]
pub struct VehicleRoutingProblem {
    id: String,
    solve_start: Timestamp,
    vehicles: Vec<Vehicle>,
    visits: Vec<Visit>,
    traffic_multipliers: Vec<f64>,
    vehicle_ids: FxHashMap<String, VehicleIdx>,
    visit_ids: FxHashMap<String, VisitIdx>,
}

impl VehicleRoutingProblem {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn solve_start(&self) -> Timestamp {
        self.solve_start
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        &self.vehicles[vehicle_id]
    }

    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn visit(&self, visit_id: VisitIdx) -> &Visit {
        &self.visits[visit_id]
    }

    pub fn vehicle_idx(&self, external_id: &str) -> Option<VehicleIdx> {
        self.vehicle_ids.get(external_id).copied()
    }

    pub fn visit_idx(&self, external_id: &str) -> Option<VisitIdx> {
        self.visit_ids.get(external_id).copied()
    }

    pub fn traffic_multiplier(&self, visit_id: VisitIdx) -> f64 {
        self.traffic_multipliers[visit_id.get()]
    }

    pub fn has_traffic(&self) -> bool {
        self.traffic_multipliers.iter().any(|&m| m > 1.0)
    }

    /// Rejects problems with nothing to plan or nobody to plan it.
    pub fn ensure_solvable(&self) -> Result<(), ProblemError> {
        if self.vehicles.is_empty() {
            return Err(ProblemError::NoVehicles);
        }

        if self.visits.is_empty() {
            return Err(ProblemError::NoVisits);
        }

        Ok(())
    }

    /// Same facts with the given per-visit delay multipliers.
    pub fn with_traffic_multipliers(
        &self,
        multipliers: Vec<f64>,
    ) -> Result<VehicleRoutingProblem, ProblemError> {
        if let Some(&invalid) = multipliers
            .iter()
            .find(|&&m| !(m.is_finite() && m >= 1.0))
        {
            return Err(ProblemError::InvalidDelayMultiplier(invalid));
        }

        if multipliers.len() != self.visits.len() {
            return Err(ProblemError::MissingField {
                entity: "problem",
                field: "traffic_multipliers",
            });
        }

        let mut problem = self.clone();
        problem.traffic_multipliers = multipliers;
        Ok(problem)
    }

    /// Location the vehicle comes from when reaching a visit after `predecessor`.
    pub fn previous_location(
        &self,
        vehicle_id: VehicleIdx,
        predecessor: Option<VisitIdx>,
    ) -> &Location {
        match predecessor {
            Some(predecessor) => self.visit(predecessor).location(),
            None => self.vehicle(vehicle_id).depot(),
        }
    }

    pub fn leg_to_visit(
        &self,
        vehicle_id: VehicleIdx,
        predecessor: Option<VisitIdx>,
        visit_id: VisitIdx,
    ) -> Leg {
        let from = self.previous_location(vehicle_id, predecessor);
        let distance_km = distance_km(from, self.visit(visit_id).location());

        Leg {
            distance_km,
            minutes: travel_time_minutes(
                distance_km,
                self.vehicle(vehicle_id).speed_kmh(),
                self.traffic_multiplier(visit_id),
            ),
        }
    }

    pub fn leg_to_depot(&self, vehicle_id: VehicleIdx, from: VisitIdx) -> Leg {
        let vehicle = self.vehicle(vehicle_id);
        let distance_km = distance_km(self.visit(from).location(), vehicle.depot());

        Leg {
            distance_km,
            minutes: travel_time_minutes(distance_km, vehicle.speed_kmh(), 1.0),
        }
    }

    /// Service minutes inflated by the visit's delay multiplier, rounded up.
    pub fn effective_service_minutes(&self, visit_id: VisitIdx) -> i64 {
        let service_minutes = self.visit(visit_id).service_minutes();
        let multiplier = self.traffic_multiplier(visit_id);

        if multiplier > 1.0 {
            clamp_minutes(service_minutes as f64 * multiplier)
        } else {
            service_minutes.min(MAX_PLANNING_MINUTES)
        }
    }
}

#[derive(Default)]
pub struct VehicleRoutingProblemBuilder {
    id: Option<String>,
    solve_start: Option<Timestamp>,
    vehicles: Vec<Vehicle>,
    visits: Vec<Visit>,
}

impl VehicleRoutingProblemBuilder {
    pub fn set_id(&mut self, id: String) -> &mut VehicleRoutingProblemBuilder {
        self.id = Some(id);
        self
    }

    pub fn set_solve_start(&mut self, solve_start: Timestamp) -> &mut VehicleRoutingProblemBuilder {
        self.solve_start = Some(solve_start);
        self
    }

    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut VehicleRoutingProblemBuilder {
        self.vehicles = vehicles;
        self
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> &mut VehicleRoutingProblemBuilder {
        self.vehicles.push(vehicle);
        self
    }

    pub fn set_visits(&mut self, visits: Vec<Visit>) -> &mut VehicleRoutingProblemBuilder {
        self.visits = visits;
        self
    }

    pub fn add_visit(&mut self, visit: Visit) -> &mut VehicleRoutingProblemBuilder {
        self.visits.push(visit);
        self
    }

    pub fn build(self) -> Result<VehicleRoutingProblem, ProblemError> {
        let mut seen = FxHashSet::default();
        for id in self
            .vehicles
            .iter()
            .map(Vehicle::external_id)
            .chain(self.visits.iter().map(Visit::external_id))
        {
            if !seen.insert(id) {
                return Err(ProblemError::DuplicateId(id.to_owned()));
            }
        }

        let vehicle_ids = self
            .vehicles
            .iter()
            .enumerate()
            .map(|(index, vehicle)| (vehicle.external_id().to_owned(), VehicleIdx::new(index)))
            .collect();
        let visit_ids = self
            .visits
            .iter()
            .enumerate()
            .map(|(index, visit)| (visit.external_id().to_owned(), VisitIdx::new(index)))
            .collect();

        Ok(VehicleRoutingProblem {
            id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            solve_start: self.solve_start.unwrap_or_else(Timestamp::now),
            traffic_multipliers: vec![1.0; self.visits.len()],
            vehicles: self.vehicles,
            visits: self.visits,
            vehicle_ids,
            visit_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, TestVisit};

    #[test]
    fn test_ensure_solvable() {
        let problem = test_utils::create_test_problem(vec![], vec![TestVisit::at(0.0, 0.01)]);
        assert_eq!(problem.ensure_solvable(), Err(ProblemError::NoVehicles));

        let problem = test_utils::create_test_problem(vec![test_utils::vehicle("v1")], vec![]);
        assert_eq!(problem.ensure_solvable(), Err(ProblemError::NoVisits));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .add_vehicle(test_utils::vehicle("same"))
            .add_visit(TestVisit::at(0.0, 0.01).id("same").build());

        assert_eq!(
            builder.build().unwrap_err(),
            ProblemError::DuplicateId(String::from("same"))
        );
    }

    #[test]
    fn test_leg_from_depot() {
        let problem = test_utils::create_test_problem(
            vec![test_utils::vehicle("v1")],
            vec![TestVisit::at(0.0, 0.01)],
        );

        let leg = problem.leg_to_visit(VehicleIdx::new(0), None, VisitIdx::new(0));
        assert!((leg.distance_km - 1.112).abs() < 1e-3);
        assert_eq!(leg.minutes, 2);
    }

    #[test]
    fn test_traffic_multiplier_inflates_leg_and_service() {
        let problem = test_utils::create_test_problem(
            vec![test_utils::vehicle("v1")],
            vec![TestVisit::at(0.0, 0.01)],
        )
        .with_traffic_multipliers(vec![2.0])
        .unwrap();

        let leg = problem.leg_to_visit(VehicleIdx::new(0), None, VisitIdx::new(0));
        // 1.112 km at 40 km/h is 1.67 min, doubled 3.34 -> 4
        assert_eq!(leg.minutes, 4);
        assert_eq!(problem.effective_service_minutes(VisitIdx::new(0)), 20);
        assert!(problem.has_traffic());
    }

    #[test]
    fn test_rejects_speedup_multiplier() {
        let problem = test_utils::create_test_problem(
            vec![test_utils::vehicle("v1")],
            vec![TestVisit::at(0.0, 0.01)],
        );

        assert_eq!(
            problem.with_traffic_multipliers(vec![0.9]).unwrap_err(),
            ProblemError::InvalidDelayMultiplier(0.9)
        );
    }

    #[test]
    fn test_lookup_by_external_id() {
        let problem = test_utils::create_test_problem(
            vec![test_utils::vehicle("v1"), test_utils::vehicle("v2")],
            vec![TestVisit::at(0.0, 0.01).id("a")],
        );

        assert_eq!(problem.vehicle_idx("v2"), Some(VehicleIdx::new(1)));
        assert_eq!(problem.visit_idx("a"), Some(VisitIdx::new(0)));
        assert_eq!(problem.visit_idx("missing"), None);
    }
}
