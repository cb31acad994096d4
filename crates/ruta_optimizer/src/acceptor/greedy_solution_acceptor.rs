use crate::solver::score::Score;

use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

/// Accepts candidates that are not worse, so plateaus can be crossed.
#[derive(Debug, Default)]
pub struct GreedySolutionAcceptor;

impl AcceptSolution for GreedySolutionAcceptor {
    fn accept(&self, current: &Score, score: &Score, _context: AcceptSolutionContext) -> bool {
        score <= current
    }
}
