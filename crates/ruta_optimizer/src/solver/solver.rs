use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use jiff::Timestamp;
use parking_lot::RwLock;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::problem::{
    error::ProblemError, traffic_event::TrafficEvent,
    vehicle_routing_problem::VehicleRoutingProblem,
};

use super::{
    accepted_solution::AcceptedSolution,
    construction::construct_solution::ConstructionError,
    disruption::{DisruptionError, ReoptimizationOutcome, reoptimize},
    search::{Search, SearchPhase},
    solver_params::SolverParams,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Created,
    Optimizing,
    Optimized,
    Failed,
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Problem(#[from] ProblemError),

    #[error("plan {plan_id} is {actual:?}, expected {expected:?}")]
    InvalidState {
        plan_id: String,
        actual: PlanStatus,
        expected: PlanStatus,
    },

    #[error("construction failed: {0}")]
    Construction(#[from] ConstructionError),

    #[error("re-optimization failed: {0}")]
    Disruption(#[from] DisruptionError),

    #[error("search for plan {0} did not complete")]
    Aborted(String),

    #[error("plan {0} not found")]
    NotFound(String),
}

/// One plan and its lifecycle: `Created -> Optimizing -> Optimized | Failed`.
pub struct Solver {
    search: Search,
    params: SolverParams,
    status: RwLock<PlanStatus>,
    solution: RwLock<Option<AcceptedSolution>>,
    created_at: Timestamp,
}

impl Solver {
    /// Rejects unsolvable problems before the plan exists.
    pub fn new(problem: VehicleRoutingProblem, params: SolverParams) -> Result<Self, ProblemError> {
        problem.ensure_solvable()?;

        Ok(Solver {
            search: Search::new(params.clone(), Arc::new(problem)),
            params,
            status: RwLock::new(PlanStatus::Created),
            solution: RwLock::new(None),
            created_at: Timestamp::now(),
        })
    }

    /// A plan that was optimized earlier, ready to be re-optimized.
    pub fn from_solution(solution: AcceptedSolution, params: SolverParams) -> Self {
        Solver {
            search: Search::new(params.clone(), Arc::clone(solution.solution.problem())),
            params,
            status: RwLock::new(PlanStatus::Optimized),
            solution: RwLock::new(Some(solution)),
            created_at: Timestamp::now(),
        }
    }

    pub fn on_best_solution<F>(&mut self, callback: F)
    where
        F: FnMut(&AcceptedSolution) + Send + 'static,
    {
        self.search.on_best_solution(callback);
    }

    pub fn plan_id(&self) -> &str {
        self.search.problem().id()
    }

    pub fn problem(&self) -> &Arc<VehicleRoutingProblem> {
        self.search.problem()
    }

    pub fn solve(&self) -> Result<AcceptedSolution, SolveError> {
        self.run_optimizing(
            PlanStatus::Created,
            || Ok(self.search.run()?),
            |solution| solution,
        )
    }

    /// Re-plans an optimized plan under traffic events active at `at`.
    ///
    /// The plan is `Optimizing` while this runs, so concurrent calls are rejected.
    pub fn reoptimize(
        &self,
        events: &[TrafficEvent],
        at: Timestamp,
        params: Option<SolverParams>,
    ) -> Result<ReoptimizationOutcome, SolveError> {
        let params = params.unwrap_or_else(|| self.params.clone());

        self.run_optimizing(
            PlanStatus::Optimized,
            || {
                let Some(current) = self.solution.read().clone() else {
                    return Err(SolveError::Aborted(self.plan_id().to_owned()));
                };
                Ok(reoptimize(&current, events, at, params)?)
            },
            ReoptimizationOutcome::solution,
        )
    }

    /// Runs `work` with the plan `Optimizing`. The plan ends `Optimized` with
    /// the produced solution, or `Failed` when `work` errors or panics.
    fn run_optimizing<T>(
        &self,
        from: PlanStatus,
        work: impl FnOnce() -> Result<T, SolveError>,
        solution_of: impl Fn(&T) -> &AcceptedSolution,
    ) -> Result<T, SolveError> {
        self.transition(from, PlanStatus::Optimizing)?;
        info!(plan_id = self.plan_id(), "Optimizing plan");

        match panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(Ok(result)) => {
                let solution = solution_of(&result).clone();
                info!(
                    plan_id = self.plan_id(),
                    "Plan optimized with score {}", solution.score
                );
                *self.solution.write() = Some(solution);
                *self.status.write() = PlanStatus::Optimized;
                Ok(result)
            }
            Ok(Err(err)) => {
                error!(plan_id = self.plan_id(), %err, "Optimization failed");
                self.mark_failed();
                Err(err)
            }
            Err(_) => {
                error!(plan_id = self.plan_id(), "Optimization panicked");
                self.mark_failed();
                Err(SolveError::Aborted(self.plan_id().to_owned()))
            }
        }
    }

    pub fn stop(&self) {
        self.search.stop();
    }

    pub fn status(&self) -> PlanStatus {
        *self.status.read()
    }

    pub fn phase(&self) -> SearchPhase {
        self.search.phase()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// The final solution once optimized, otherwise the best one found so far.
    pub fn current_best_solution(&self) -> Option<AcceptedSolution> {
        match self.status() {
            PlanStatus::Failed => None,
            PlanStatus::Optimized => self.solution.read().clone(),
            PlanStatus::Created | PlanStatus::Optimizing => self
                .search
                .best_solution()
                .or_else(|| self.solution.read().clone()),
        }
    }

    pub(crate) fn mark_failed(&self) {
        *self.status.write() = PlanStatus::Failed;
        *self.solution.write() = None;
    }

    fn transition(&self, from: PlanStatus, to: PlanStatus) -> Result<(), SolveError> {
        let mut status = self.status.write();
        if *status != from {
            return Err(SolveError::InvalidState {
                plan_id: self.plan_id().to_owned(),
                actual: *status,
                expected: from,
            });
        }

        *status = to;
        Ok(())
    }
}
