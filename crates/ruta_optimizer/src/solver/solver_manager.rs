use std::{collections::HashMap, sync::Arc};

use jiff::Timestamp;
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
};
use tracing::{error, warn};

use crate::problem::{traffic_event::TrafficEvent, vehicle_routing_problem::VehicleRoutingProblem};

use super::{
    accepted_solution::AcceptedSolution,
    disruption::ReoptimizationOutcome,
    solver::{PlanStatus, SolveError, Solver},
    solver_params::SolverParams,
};

type SolveHandle = JoinHandle<Result<AcceptedSolution, SolveError>>;

struct ManagedSolver {
    solver: Arc<Solver>,
    handle: Mutex<Option<SolveHandle>>,
}

/// Independent solves keyed by plan id, each running on the blocking pool.
#[derive(Default)]
pub struct SolverManager {
    solvers: RwLock<HashMap<String, Arc<ManagedSolver>>>,
}

impl SolverManager {
    /// Starts optimizing `problem` in the background and returns its plan id.
    pub async fn submit(
        &self,
        problem: VehicleRoutingProblem,
        params: SolverParams,
    ) -> Result<String, SolveError> {
        self.submit_solver(Solver::new(problem, params)?).await
    }

    /// Starts a prepared solver, e.g. one with a best solution listener attached.
    pub async fn submit_solver(&self, solver: Solver) -> Result<String, SolveError> {
        let solver = Arc::new(solver);
        let plan_id = solver.plan_id().to_owned();

        let mut solvers = self.solvers.write().await;
        if let Some(existing) = solvers.get(&plan_id) {
            return Err(SolveError::InvalidState {
                plan_id,
                actual: existing.solver.status(),
                expected: PlanStatus::Created,
            });
        }

        let handle = tokio::task::spawn_blocking({
            let solver = Arc::clone(&solver);
            move || solver.solve()
        });

        solvers.insert(
            plan_id.clone(),
            Arc::new(ManagedSolver {
                solver,
                handle: Mutex::new(Some(handle)),
            }),
        );

        Ok(plan_id)
    }

    pub async fn status(&self, plan_id: &str) -> Option<PlanStatus> {
        self.get(plan_id)
            .await
            .map(|managed| managed.solver.status())
    }

    /// Best solution so far, final once the plan is optimized.
    pub async fn result(&self, plan_id: &str) -> Option<AcceptedSolution> {
        self.get(plan_id)
            .await
            .and_then(|managed| managed.solver.current_best_solution())
    }

    /// Waits for the solve of `plan_id` to finish.
    pub async fn wait(&self, plan_id: &str) -> Result<AcceptedSolution, SolveError> {
        let managed = self
            .get(plan_id)
            .await
            .ok_or_else(|| SolveError::NotFound(plan_id.to_owned()))?;

        let handle = managed.handle.lock().await.take();
        match handle {
            Some(handle) => match handle.await {
                Ok(result) => result,
                Err(join_error) => {
                    error!(plan_id, %join_error, "Search task did not complete");
                    managed.solver.mark_failed();
                    Err(SolveError::Aborted(plan_id.to_owned()))
                }
            },
            None => match managed.solver.status() {
                PlanStatus::Optimized => managed
                    .solver
                    .current_best_solution()
                    .ok_or_else(|| SolveError::Aborted(plan_id.to_owned())),
                status => Err(SolveError::InvalidState {
                    plan_id: plan_id.to_owned(),
                    actual: status,
                    expected: PlanStatus::Optimized,
                }),
            },
        }
    }

    /// Asks the search of `plan_id` to stop; its best solution becomes the result.
    pub async fn stop(&self, plan_id: &str) -> bool {
        match self.get(plan_id).await {
            Some(managed) => {
                managed.solver.stop();
                true
            }
            None => {
                warn!(plan_id, "Cannot stop unknown plan");
                false
            }
        }
    }

    /// Re-plans an optimized plan under `events`, blocking work runs off the async runtime.
    pub async fn reoptimize(
        &self,
        plan_id: &str,
        events: Vec<TrafficEvent>,
        at: Timestamp,
    ) -> Result<ReoptimizationOutcome, SolveError> {
        let managed = self
            .get(plan_id)
            .await
            .ok_or_else(|| SolveError::NotFound(plan_id.to_owned()))?;

        let solver = Arc::clone(&managed.solver);
        match tokio::task::spawn_blocking(move || solver.reoptimize(&events, at, None)).await {
            Ok(result) => result,
            Err(join_error) => {
                error!(plan_id, %join_error, "Re-optimization task did not complete");
                managed.solver.mark_failed();
                Err(SolveError::Aborted(plan_id.to_owned()))
            }
        }
    }

    /// Stops `plan_id` and forgets it. Returns its last status.
    pub async fn remove(&self, plan_id: &str) -> Option<PlanStatus> {
        let managed = self.solvers.write().await.remove(plan_id)?;
        managed.solver.stop();
        Some(managed.solver.status())
    }

    async fn get(&self, plan_id: &str) -> Option<Arc<ManagedSolver>> {
        self.solvers.read().await.get(plan_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        solver::solver_params::Termination,
        test_utils::{self, TestVisit},
    };

    use super::*;

    fn problem(id: &str) -> VehicleRoutingProblem {
        test_utils::create_named_test_problem(
            id,
            test_utils::solve_start(),
            vec![test_utils::vehicle("v1"), test_utils::vehicle("v2")],
            vec![
                TestVisit::at(0.0, 0.02),
                TestVisit::at(0.0, 0.01),
                TestVisit::at(0.01, 0.0),
            ],
        )
    }

    fn params() -> SolverParams {
        SolverParams::default().with_termination(Termination::Iterations(1_000))
    }

    #[tokio::test]
    async fn test_submit_and_wait() {
        let manager = SolverManager::default();
        let plan_id = manager.submit(problem("plan-a"), params()).await.unwrap();
        assert_eq!(plan_id, "plan-a");

        let solution = manager.wait(&plan_id).await.unwrap();

        assert_eq!(manager.status(&plan_id).await, Some(PlanStatus::Optimized));
        assert_eq!(
            manager.result(&plan_id).await.map(|best| best.score),
            Some(solution.score)
        );

        // A second wait returns the stored result.
        assert_eq!(manager.wait(&plan_id).await.unwrap().score, solution.score);
    }

    #[tokio::test]
    async fn test_independent_plans() {
        let manager = SolverManager::default();
        manager.submit(problem("plan-a"), params()).await.unwrap();
        manager.submit(problem("plan-b"), params()).await.unwrap();

        let a = manager.wait("plan-a").await.unwrap();
        let b = manager.wait("plan-b").await.unwrap();

        assert_eq!(a.score, b.score);
        assert!(a.solution.is_identical(&b.solution));
    }

    #[tokio::test]
    async fn test_duplicate_plan_id_is_rejected() {
        let manager = SolverManager::default();
        manager.submit(problem("plan-a"), params()).await.unwrap();

        assert!(matches!(
            manager.submit(problem("plan-a"), params()).await,
            Err(SolveError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_plan() {
        let manager = SolverManager::default();

        assert_eq!(manager.status("missing").await, None);
        assert!(!manager.stop("missing").await);
        assert!(matches!(
            manager.wait("missing").await,
            Err(SolveError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stopped_plan_still_has_a_result() {
        let manager = SolverManager::default();
        let params = SolverParams::default();
        let plan_id = manager.submit(problem("plan-a"), params).await.unwrap();

        manager.stop(&plan_id).await;
        let solution = manager.wait(&plan_id).await.unwrap();

        assert_eq!(solution.solution.unassigned_count(), 0);
    }

    #[tokio::test]
    async fn test_reoptimize_without_events_keeps_plan() {
        let manager = SolverManager::default();
        let plan_id = manager.submit(problem("plan-a"), params()).await.unwrap();
        manager.wait(&plan_id).await.unwrap();

        let outcome = manager
            .reoptimize(&plan_id, vec![], test_utils::solve_start())
            .await
            .unwrap();

        assert!(outcome.is_unchanged());
    }

    #[tokio::test]
    async fn test_panicking_solve_reaches_failed() {
        let manager = SolverManager::default();
        let mut solver = Solver::new(problem("plan-a"), params()).unwrap();
        solver.on_best_solution(|_| panic!("listener went away"));
        let plan_id = manager.submit_solver(solver).await.unwrap();

        // No one waits on the plan, the status still settles.
        while manager.status(&plan_id).await == Some(PlanStatus::Optimizing)
            || manager.status(&plan_id).await == Some(PlanStatus::Created)
        {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        assert_eq!(manager.status(&plan_id).await, Some(PlanStatus::Failed));
        assert!(manager.result(&plan_id).await.is_none());
        assert!(matches!(
            manager.wait(&plan_id).await,
            Err(SolveError::Aborted(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_forgets_plan() {
        let manager = SolverManager::default();
        let plan_id = manager.submit(problem("plan-a"), params()).await.unwrap();
        manager.wait(&plan_id).await.unwrap();

        assert_eq!(manager.remove(&plan_id).await, Some(PlanStatus::Optimized));
        assert_eq!(manager.status(&plan_id).await, None);
        assert_eq!(manager.remove(&plan_id).await, None);

        // The id can be submitted again once removed.
        manager.submit(problem("plan-a"), params()).await.unwrap();
        assert!(manager.wait(&plan_id).await.is_ok());
    }
}
