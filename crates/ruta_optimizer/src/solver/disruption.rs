use std::sync::Arc;

use jiff::Timestamp;
use thiserror::Error;
use tracing::{info, instrument};

use crate::problem::{
    error::ProblemError, traffic_event::TrafficEvent,
    vehicle_routing_problem::VehicleRoutingProblem,
};

use super::{
    accepted_solution::AcceptedSolution,
    search::Search,
    solution::working_solution::{ChainError, WorkingSolution},
    solver_params::SolverParams,
};

#[derive(Debug, Error)]
pub enum DisruptionError {
    #[error(transparent)]
    Problem(#[from] ProblemError),

    #[error("previous plan is not a valid assignment: {0}")]
    Chain(#[from] ChainError),
}

#[derive(Debug, Clone)]
pub enum ReoptimizationOutcome {
    /// No visit is affected, the input solution is returned as is.
    Unchanged(AcceptedSolution),
    Reoptimized(AcceptedSolution),
}

impl ReoptimizationOutcome {
    pub fn solution(&self) -> &AcceptedSolution {
        match self {
            ReoptimizationOutcome::Unchanged(solution)
            | ReoptimizationOutcome::Reoptimized(solution) => solution,
        }
    }

    pub fn into_solution(self) -> AcceptedSolution {
        match self {
            ReoptimizationOutcome::Unchanged(solution)
            | ReoptimizationOutcome::Reoptimized(solution) => solution,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, ReoptimizationOutcome::Unchanged(_))
    }
}

/// Delay multiplier per visit: the product of every event active at `at` whose radius covers
/// the visit, capped at `f64::MAX`.
pub fn traffic_multipliers(
    problem: &VehicleRoutingProblem,
    events: &[TrafficEvent],
    at: Timestamp,
) -> Vec<f64> {
    let active = events
        .iter()
        .filter(|event| event.is_active_at(at))
        .collect::<Vec<_>>();

    problem
        .visits()
        .iter()
        .map(|visit| {
            active
                .iter()
                .filter(|event| event.affects(visit.location()))
                .map(|event| event.delay_multiplier())
                .product::<f64>()
                .min(f64::MAX)
        })
        .collect()
}

/// Re-plans `solution` under the traffic events active at `at`, starting from its current
/// assignment.
#[instrument(skip_all, level = "debug")]
pub fn reoptimize(
    solution: &AcceptedSolution,
    events: &[TrafficEvent],
    at: Timestamp,
    params: SolverParams,
) -> Result<ReoptimizationOutcome, DisruptionError> {
    let problem = solution.solution.problem();
    let multipliers = traffic_multipliers(problem, events, at);

    let affected = multipliers.iter().filter(|&&m| m > 1.0).count();
    if affected == 0 {
        info!("No visit affected by traffic events, keeping current plan");
        return Ok(ReoptimizationOutcome::Unchanged(solution.clone()));
    }

    info!(affected, "Re-optimizing plan {}", problem.id());

    let disrupted = Arc::new(problem.with_traffic_multipliers(multipliers)?);
    let seeded = WorkingSolution::from_routes(Arc::clone(&disrupted), &solution.solution.routes())?;

    let search = Search::new(params, disrupted);
    Ok(ReoptimizationOutcome::Reoptimized(search.run_from(seeded)))
}
