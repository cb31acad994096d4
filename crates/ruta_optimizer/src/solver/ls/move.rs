use crate::solver::solution::working_solution::{LinkJournal, WorkingSolution};

use super::{reassign::ReassignOperator, relink::RelinkOperator};

pub trait LocalSearchOperator {
    fn is_valid(&self, solution: &WorkingSolution) -> bool;

    /// Applies the move and settles the derived state. The journal undoes it.
    fn apply(&self, solution: &mut WorkingSolution) -> LinkJournal;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalSearchMove {
    /// Moves a visit to the end of another vehicle's chain.
    Reassign(ReassignOperator),
    /// Moves a visit within its own chain.
    Relink(RelinkOperator),
}

impl LocalSearchMove {
    pub fn operator_name(&self) -> &'static str {
        match self {
            LocalSearchMove::Reassign(_) => "Reassign",
            LocalSearchMove::Relink(_) => "Relink",
        }
    }

    pub fn is_valid(&self, solution: &WorkingSolution) -> bool {
        match self {
            LocalSearchMove::Reassign(op) => op.is_valid(solution),
            LocalSearchMove::Relink(op) => op.is_valid(solution),
        }
    }

    pub fn apply(&self, solution: &mut WorkingSolution) -> LinkJournal {
        match self {
            LocalSearchMove::Reassign(op) => op.apply(solution),
            LocalSearchMove::Relink(op) => op.apply(solution),
        }
    }
}
