use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use jiff::Timestamp;
use parking_lot::{Mutex, RwLock};
use rand::{SeedableRng, rngs::SmallRng};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    acceptor::{
        accept_solution::{AcceptSolution, AcceptSolutionContext},
        greedy_solution_acceptor::GreedySolutionAcceptor,
        simulated_annealing_acceptor::SimulatedAnnealingAcceptor,
        solution_acceptor::SolutionAcceptor,
    },
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    timer_debug,
};

use super::{
    accepted_solution::AcceptedSolution,
    constraints::constraint_set::ConstraintSet,
    construction::construct_solution::{ConstructionError, construct_solution},
    ls::move_selector::{MoveSelector, RandomSelector, SweepSelector},
    score::Score,
    solution::working_solution::WorkingSolution,
    solver_params::{AcceptorStrategy, MoveSelection, SolverParams, Termination},
};

type BestSolutionHandler = Mutex<Box<dyn FnMut(&AcceptedSolution) + Send + 'static>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SearchPhase {
    #[default]
    Idle,
    Constructing,
    Searching,
    Terminated,
}

struct SearchState {
    start: Timestamp,
    iteration: usize,
    iterations_without_improvement: usize,
    best_score: Score,
}

/// Construction followed by a single-threaded local search over one working solution.
pub struct Search {
    problem: Arc<VehicleRoutingProblem>,
    constraints: ConstraintSet,
    params: SolverParams,
    phase: RwLock<SearchPhase>,
    best_solution: RwLock<Option<AcceptedSolution>>,
    on_best_solution_handler: Option<BestSolutionHandler>,
    is_stopped: AtomicBool,
}

impl Search {
    pub fn new(params: SolverParams, problem: Arc<VehicleRoutingProblem>) -> Self {
        Search {
            problem,
            constraints: ConstraintSet::with_zone_affinity(params.zone_affinity),
            params,
            phase: RwLock::new(SearchPhase::Idle),
            best_solution: RwLock::new(None),
            on_best_solution_handler: None,
            is_stopped: AtomicBool::new(false),
        }
    }

    pub fn problem(&self) -> &Arc<VehicleRoutingProblem> {
        &self.problem
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn on_best_solution(&mut self, handler: impl FnMut(&AcceptedSolution) + Send + 'static) {
        self.on_best_solution_handler = Some(Mutex::new(Box::new(handler)));
    }

    pub fn phase(&self) -> SearchPhase {
        *self.phase.read()
    }

    pub fn best_solution(&self) -> Option<AcceptedSolution> {
        self.best_solution.read().clone()
    }

    /// Asks a running search to stop before its next move evaluation.
    pub fn stop(&self) {
        self.is_stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.is_stopped.load(Ordering::Relaxed)
    }

    pub fn run(&self) -> Result<AcceptedSolution, ConstructionError> {
        *self.phase.write() = SearchPhase::Constructing;

        let initial_solution = match timer_debug!(
            "Construction",
            construct_solution(Arc::clone(&self.problem))
        ) {
            Ok(solution) => solution,
            Err(error) => {
                *self.phase.write() = SearchPhase::Terminated;
                return Err(error);
            }
        };

        Ok(self.run_from(initial_solution))
    }

    /// Improves `solution` until a termination condition is met.
    #[instrument(skip_all, level = "debug")]
    pub fn run_from(&self, solution: WorkingSolution) -> AcceptedSolution {
        *self.phase.write() = SearchPhase::Searching;

        let mut rng = SmallRng::seed_from_u64(self.params.seed);
        let acceptor = self.create_acceptor();
        let mut selector = self.create_selector();

        let mut current = solution;
        let (mut current_score, score_analysis) = self.constraints.compute_score(&current);
        self.update_best_solution(AcceptedSolution {
            solution: current.clone(),
            score: current_score,
            score_analysis,
        });

        let mut state = SearchState {
            start: Timestamp::now(),
            iteration: 0,
            iterations_without_improvement: 0,
            best_score: current_score,
        };

        while !self.should_terminate(&state) {
            let Some(candidate) = selector.next_move(&current) else {
                debug!(iteration = state.iteration, "No improving move left");
                break;
            };

            let journal = candidate.apply(&mut current);
            let (score, score_analysis) = self.constraints.compute_score(&current);
            state.iteration += 1;

            let accepted = acceptor.accept(
                &current_score,
                &score,
                AcceptSolutionContext {
                    iteration: state.iteration,
                    rng: &mut rng,
                },
            );

            if !accepted {
                current.rollback(journal);
                state.iterations_without_improvement += 1;
                continue;
            }

            current_score = score;

            if score < state.best_score {
                debug!(
                    iteration = state.iteration,
                    operator = candidate.operator_name(),
                    "New best score {}",
                    score
                );
                state.best_score = score;
                state.iterations_without_improvement = 0;
                selector.on_improvement();

                self.update_best_solution(AcceptedSolution {
                    solution: current.clone(),
                    score,
                    score_analysis,
                });
            } else {
                state.iterations_without_improvement += 1;
            }
        }

        *self.phase.write() = SearchPhase::Terminated;

        info!(
            iterations = state.iteration,
            elapsed = ?Timestamp::now().duration_since(state.start),
            "Search finished with score {}",
            state.best_score
        );

        match self.best_solution() {
            Some(best) => best,
            None => AcceptedSolution {
                score: current_score,
                score_analysis: self.constraints.compute_score(&current).1,
                solution: current,
            },
        }
    }

    fn update_best_solution(&self, solution: AcceptedSolution) {
        if let Some(handler) = &self.on_best_solution_handler {
            (handler.lock())(&solution);
        }

        *self.best_solution.write() = Some(solution);
    }

    fn create_acceptor(&self) -> SolutionAcceptor {
        match self.params.acceptor {
            AcceptorStrategy::Greedy => SolutionAcceptor::Greedy(GreedySolutionAcceptor),
            AcceptorStrategy::SimulatedAnnealing {
                initial_temperature,
                cooling_rate,
            } => SolutionAcceptor::SimulatedAnnealing(SimulatedAnnealingAcceptor::new(
                initial_temperature,
                cooling_rate,
            )),
        }
    }

    fn create_selector(&self) -> MoveSelector {
        match self.params.move_selection {
            MoveSelection::Sweep => MoveSelector::Sweep(SweepSelector::default()),
            MoveSelection::Random { seed } => MoveSelector::Random(RandomSelector::new(seed)),
        }
    }

    fn check_termination(&self, state: &SearchState, termination: &Termination) -> bool {
        match *termination {
            Termination::Duration(max_duration) => {
                Timestamp::now().duration_since(state.start) >= max_duration
            }
            Termination::Iterations(max_iterations) => state.iteration >= max_iterations,
            Termination::IterationsWithoutImprovement(max_iterations) => {
                state.iterations_without_improvement >= max_iterations
            }
            Termination::Score(target) => state.best_score <= target,
        }
    }

    fn should_terminate(&self, state: &SearchState) -> bool {
        if self.is_stopped() {
            debug!(iteration = state.iteration, "Search stopped");
            return true;
        }

        self.params.terminations.iter().any(|termination| {
            let reached = self.check_termination(state, termination);
            if reached {
                debug!(
                    "Termination condition met: {:?} at iteration {}",
                    termination, state.iteration
                );
            }
            reached
        })
    }
}
