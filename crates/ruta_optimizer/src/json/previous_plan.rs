use std::sync::Arc;

use tracing::instrument;

use crate::{
    problem::{error::ProblemError, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        accepted_solution::AcceptedSolution, constraints::constraint_set::ConstraintSet,
        route_plan::RoutePlan, solution::working_solution::WorkingSolution,
    },
};

/// Rebuilds the solution a plan was rendered from, rescoring it against `problem`.
///
/// Stop order is taken from the routes as listed. Visits of `problem` that no route
/// mentions are left unassigned.
#[instrument(skip_all, level = "debug", fields(plan_id = %plan.id))]
pub fn restore_solution(
    problem: Arc<VehicleRoutingProblem>,
    plan: &RoutePlan,
    zone_affinity: bool,
) -> Result<AcceptedSolution, anyhow::Error> {
    let routes = plan
        .routes
        .iter()
        .map(|route| {
            let vehicle_id = problem
                .vehicle_idx(&route.vehicle_id)
                .ok_or_else(|| ProblemError::UnknownId(route.vehicle_id.clone()))?;
            let visits = route
                .stops
                .iter()
                .map(|stop| {
                    problem
                        .visit_idx(&stop.visit_id)
                        .ok_or_else(|| ProblemError::UnknownId(stop.visit_id.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok((vehicle_id, visits))
        })
        .collect::<Result<Vec<_>, ProblemError>>()?;

    let solution = WorkingSolution::from_routes(problem, &routes)?;
    let (score, score_analysis) =
        ConstraintSet::with_zone_affinity(zone_affinity).compute_score(&solution);

    Ok(AcceptedSolution {
        solution,
        score,
        score_analysis,
    })
}
