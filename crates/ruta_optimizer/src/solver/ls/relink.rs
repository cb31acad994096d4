use crate::{
    problem::visit::VisitIdx,
    solver::{
        ls::r#move::LocalSearchOperator,
        solution::{
            propagator,
            working_solution::{LinkJournal, WorkingSolution},
        },
    },
};

/// **Relink**
///
/// Moves `visit` right after `new_predecessor` in the same chain, or first when
/// `new_predecessor` is `None`.
///
/// ```text
/// BEFORE:
///    V1: depot -> (A) -> [visit] -> (B) -> (C)
///
/// AFTER (new_predecessor = B):
///    V1: depot -> (A) -> (B) -> [visit] -> (C)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelinkOperator {
    pub visit: VisitIdx,
    pub new_predecessor: Option<VisitIdx>,
}

impl RelinkOperator {
    pub fn new(visit: VisitIdx, new_predecessor: Option<VisitIdx>) -> Self {
        RelinkOperator {
            visit,
            new_predecessor,
        }
    }
}

impl LocalSearchOperator for RelinkOperator {
    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        let Some(vehicle_id) = solution.vehicle_of(self.visit) else {
            return false;
        };

        if solution.predecessor_of(self.visit) == self.new_predecessor {
            return false;
        }

        match self.new_predecessor {
            Some(predecessor) => {
                predecessor != self.visit && solution.vehicle_of(predecessor) == Some(vehicle_id)
            }
            None => true,
        }
    }

    fn apply(&self, solution: &mut WorkingSolution) -> LinkJournal {
        let mut journal = LinkJournal::default();
        let Some(vehicle_id) = solution.vehicle_of(self.visit) else {
            return journal;
        };

        let successor = solution.detach(self.visit, &mut journal);
        solution.attach(self.visit, vehicle_id, self.new_predecessor, &mut journal);

        if let Some(successor) = successor {
            propagator::recompute(solution, successor);
        }
        propagator::recompute(solution, self.visit);

        journal
    }
}
