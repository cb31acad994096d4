use crate::{
    problem::{vehicle::VehicleIdx, visit::VisitIdx},
    solver::{
        ls::r#move::LocalSearchOperator,
        solution::{
            propagator,
            working_solution::{LinkJournal, WorkingSolution},
        },
    },
};

/// **Reassign**
///
/// Moves `visit` from its chain to the end of the chain of `vehicle`.
///
/// ```text
/// BEFORE:
///    V1: depot -> (A) -> [visit] -> (B)
///    V2: depot -> (X) -> (Y)
///
/// AFTER:
///    V1: depot -> (A) -> (B)
///    V2: depot -> (X) -> (Y) -> [visit]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignOperator {
    pub visit: VisitIdx,
    pub vehicle: VehicleIdx,
}

impl ReassignOperator {
    pub fn new(visit: VisitIdx, vehicle: VehicleIdx) -> Self {
        ReassignOperator { visit, vehicle }
    }
}

impl LocalSearchOperator for ReassignOperator {
    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        solution.vehicle_of(self.visit) != Some(self.vehicle)
    }

    fn apply(&self, solution: &mut WorkingSolution) -> LinkJournal {
        let mut journal = LinkJournal::default();

        let tail = solution.tail(self.vehicle);
        let successor = solution.detach(self.visit, &mut journal);
        solution.attach(self.visit, self.vehicle, tail, &mut journal);

        if let Some(successor) = successor {
            propagator::recompute(solution, successor);
        }
        propagator::recompute(solution, self.visit);

        journal
    }
}
