use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    problem::{vehicle::VehicleIdx, visit::VisitIdx},
    solver::solution::working_solution::WorkingSolution,
};

use super::{r#move::LocalSearchMove, reassign::ReassignOperator, relink::RelinkOperator};

const MAX_RANDOM_ATTEMPTS: usize = 128;

/// Candidate moves of one visit, indexed by target.
///
/// Targets `0..k` reassign to vehicle `t`, target `k` relinks as head and targets `k + 1..`
/// relink after visit `t - k - 1`.
fn candidate(solution: &WorkingSolution, visit: VisitIdx, target: usize) -> LocalSearchMove {
    let vehicles = solution.problem().vehicles().len();

    if target < vehicles {
        LocalSearchMove::Reassign(ReassignOperator::new(visit, VehicleIdx::new(target)))
    } else if target == vehicles {
        LocalSearchMove::Relink(RelinkOperator::new(visit, None))
    } else {
        LocalSearchMove::Relink(RelinkOperator::new(
            visit,
            Some(VisitIdx::new(target - vehicles - 1)),
        ))
    }
}

fn target_count(solution: &WorkingSolution) -> usize {
    solution.problem().vehicles().len() + 1 + solution.problem().visits().len()
}

/// Walks every candidate in order: visits by index, then targets by index.
///
/// Exhausted once a whole pass over the visits went by without improving the best score.
#[derive(Debug, Default)]
pub struct SweepSelector {
    visit: usize,
    target: usize,
    visits_without_improvement: usize,
}

impl SweepSelector {
    pub fn next_move(&mut self, solution: &WorkingSolution) -> Option<LocalSearchMove> {
        let visits = solution.problem().visits().len();
        let targets = target_count(solution);

        while self.visits_without_improvement < visits {
            while self.target < targets {
                let candidate = candidate(solution, VisitIdx::new(self.visit), self.target);
                self.target += 1;

                if candidate.is_valid(solution) {
                    return Some(candidate);
                }
            }

            self.target = 0;
            self.visit = (self.visit + 1) % visits;
            self.visits_without_improvement += 1;
        }

        None
    }

    pub fn on_improvement(&mut self) {
        self.visits_without_improvement = 0;
    }
}

/// Samples candidates uniformly with a seeded generator.
#[derive(Debug)]
pub struct RandomSelector {
    rng: SmallRng,
}

impl RandomSelector {
    pub fn new(seed: u64) -> Self {
        RandomSelector {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn next_move(&mut self, solution: &WorkingSolution) -> Option<LocalSearchMove> {
        let visits = solution.problem().visits().len();
        if visits == 0 {
            return None;
        }

        let targets = target_count(solution);
        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let visit = VisitIdx::new(self.rng.random_range(0..visits));
            let candidate = candidate(solution, visit, self.rng.random_range(0..targets));

            if candidate.is_valid(solution) {
                return Some(candidate);
            }
        }

        None
    }
}

#[derive(Debug)]
pub enum MoveSelector {
    Sweep(SweepSelector),
    Random(RandomSelector),
}

impl MoveSelector {
    pub fn next_move(&mut self, solution: &WorkingSolution) -> Option<LocalSearchMove> {
        match self {
            MoveSelector::Sweep(selector) => selector.next_move(solution),
            MoveSelector::Random(selector) => selector.next_move(solution),
        }
    }

    pub fn on_improvement(&mut self) {
        if let MoveSelector::Sweep(selector) = self {
            selector.on_improvement();
        }
    }
}
