use crate::solver::score::Score;

use super::{
    accept_solution::{AcceptSolution, AcceptSolutionContext},
    greedy_solution_acceptor::GreedySolutionAcceptor,
    simulated_annealing_acceptor::SimulatedAnnealingAcceptor,
};

#[derive(Debug)]
pub enum SolutionAcceptor {
    Greedy(GreedySolutionAcceptor),
    SimulatedAnnealing(SimulatedAnnealingAcceptor),
}

impl AcceptSolution for SolutionAcceptor {
    fn accept(&self, current: &Score, score: &Score, context: AcceptSolutionContext) -> bool {
        match self {
            SolutionAcceptor::Greedy(acceptor) => acceptor.accept(current, score, context),
            SolutionAcceptor::SimulatedAnnealing(acceptor) => {
                acceptor.accept(current, score, context)
            }
        }
    }
}
