use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    problem::{vehicle::VehicleIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::solution::working_solution::{LinkJournal, WorkingSolution},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("no vehicles available")]
    NoVehicles,
}

/// Deals the visits to the vehicles in input order, visit `i` going to vehicle `i mod k`.
///
/// Every visit ends up assigned, feasibility is left to the local search.
#[instrument(skip_all, level = "debug")]
pub fn construct_solution(
    problem: Arc<VehicleRoutingProblem>,
) -> Result<WorkingSolution, ConstructionError> {
    let vehicle_count = problem.vehicles().len();
    if vehicle_count == 0 {
        return Err(ConstructionError::NoVehicles);
    }

    let mut solution = WorkingSolution::new(problem);
    let mut journal = LinkJournal::default();

    for visit_id in solution.visit_ids() {
        let vehicle_id = VehicleIdx::new(visit_id.get() % vehicle_count);
        let tail = solution.tail(vehicle_id);
        solution.attach(visit_id, vehicle_id, tail, &mut journal);
    }

    solution.propagate_all();

    debug!(
        visits = solution.visit_ids().count(),
        vehicles = solution.used_vehicles_count(),
        "Constructed initial solution"
    );

    Ok(solution)
}
