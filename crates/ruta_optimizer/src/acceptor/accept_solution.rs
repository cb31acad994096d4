use rand::rngs::SmallRng;

use crate::solver::score::Score;

pub struct AcceptSolutionContext<'a> {
    pub iteration: usize,
    pub rng: &'a mut SmallRng,
}

/// Decides whether the search moves to a candidate scored `score` from one scored `current`.
pub trait AcceptSolution {
    fn accept(&self, current: &Score, score: &Score, context: AcceptSolutionContext) -> bool;
}
