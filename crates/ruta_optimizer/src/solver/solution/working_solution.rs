use std::sync::Arc;

use thiserror::Error;

use crate::problem::{
    vehicle::VehicleIdx,
    vehicle_routing_problem::VehicleRoutingProblem,
    visit::VisitIdx,
};

use super::{propagator, shadow::ShadowState};

/// Planning variables of a visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanningLink {
    pub vehicle: Option<VehicleIdx>,
    pub predecessor: Option<VisitIdx>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("visit {0} is part of a cycle")]
    Cycle(VisitIdx),

    #[error("visit {0} is the predecessor of more than one visit")]
    Merge(VisitIdx),

    #[error("vehicle {0} has more than one first visit")]
    MultipleHeads(VehicleIdx),

    #[error("visit {0} follows a visit of another vehicle")]
    VehicleMismatch(VisitIdx),

    #[error("visit {0} is unassigned but has a predecessor")]
    DanglingPredecessor(VisitIdx),

    #[error("visit {0} appears in more than one route")]
    DuplicateVisit(VisitIdx),
}

/// Previous links of the visits touched by a move, enough to restore the topology.
#[derive(Debug, Default)]
pub struct LinkJournal {
    entries: Vec<(VisitIdx, PlanningLink)>,
}

impl LinkJournal {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn touched_visits(&self) -> impl Iterator<Item = VisitIdx> + '_ {
        self.entries.iter().map(|(visit_id, _)| *visit_id)
    }
}

/// The assignment: planning links per visit plus their derived state.
///
/// `successors` and `heads` are a reverse index of the predecessor links, rebuilt after every
/// topology change and never edited directly.
#[derive(Clone, Debug)]
pub struct WorkingSolution {
    problem: Arc<VehicleRoutingProblem>,
    links: Vec<PlanningLink>,
    shadows: Vec<ShadowState>,
    successors: Vec<Option<VisitIdx>>,
    heads: Vec<Option<VisitIdx>>,
}

impl WorkingSolution {
    pub fn new(problem: Arc<VehicleRoutingProblem>) -> Self {
        let visits = problem.visits().len();
        let vehicles = problem.vehicles().len();

        WorkingSolution {
            problem,
            links: vec![PlanningLink::default(); visits],
            shadows: vec![ShadowState::default(); visits],
            successors: vec![None; visits],
            heads: vec![None; vehicles],
        }
    }

    /// Builds a settled solution from ordered visits per vehicle.
    pub fn from_routes(
        problem: Arc<VehicleRoutingProblem>,
        routes: &[(VehicleIdx, Vec<VisitIdx>)],
    ) -> Result<Self, ChainError> {
        let mut solution = WorkingSolution::new(problem);
        let mut seen = vec![false; solution.links.len()];

        for (vehicle_id, visits) in routes {
            let mut predecessor = None;
            for &visit_id in visits {
                if std::mem::replace(&mut seen[visit_id.get()], true) {
                    return Err(ChainError::DuplicateVisit(visit_id));
                }

                solution.links[visit_id.get()] = PlanningLink {
                    vehicle: Some(*vehicle_id),
                    predecessor,
                };
                predecessor = Some(visit_id);
            }
        }

        solution.rebuild_index();
        solution.validate()?;
        solution.propagate_all();

        Ok(solution)
    }

    pub fn problem(&self) -> &Arc<VehicleRoutingProblem> {
        &self.problem
    }

    pub fn link(&self, visit_id: VisitIdx) -> PlanningLink {
        self.links[visit_id.get()]
    }

    pub fn vehicle_of(&self, visit_id: VisitIdx) -> Option<VehicleIdx> {
        self.links[visit_id.get()].vehicle
    }

    pub fn predecessor_of(&self, visit_id: VisitIdx) -> Option<VisitIdx> {
        self.links[visit_id.get()].predecessor
    }

    pub fn successor_of(&self, visit_id: VisitIdx) -> Option<VisitIdx> {
        self.successors[visit_id.get()]
    }

    pub fn head(&self, vehicle_id: VehicleIdx) -> Option<VisitIdx> {
        self.heads[vehicle_id.get()]
    }

    pub fn shadow(&self, visit_id: VisitIdx) -> &ShadowState {
        &self.shadows[visit_id.get()]
    }

    pub(crate) fn set_shadow(&mut self, visit_id: VisitIdx, shadow: ShadowState) {
        self.shadows[visit_id.get()] = shadow;
    }

    pub fn is_assigned(&self, visit_id: VisitIdx) -> bool {
        self.links[visit_id.get()].vehicle.is_some()
    }

    pub fn visit_ids(&self) -> impl DoubleEndedIterator<Item = VisitIdx> + Clone + use<> {
        VisitIdx::all(self.links.len())
    }

    pub fn vehicle_ids(&self) -> impl DoubleEndedIterator<Item = VehicleIdx> + Clone + use<> {
        VehicleIdx::all(self.heads.len())
    }

    pub fn unassigned_visits(&self) -> impl Iterator<Item = VisitIdx> + '_ {
        self.visit_ids()
            .filter(|&visit_id| !self.is_assigned(visit_id))
    }

    pub fn unassigned_count(&self) -> usize {
        self.links.iter().filter(|link| link.vehicle.is_none()).count()
    }

    /// Visits of `vehicle_id` in driving order.
    pub fn chain(&self, vehicle_id: VehicleIdx) -> ChainIter<'_> {
        ChainIter {
            solution: self,
            next: self.head(vehicle_id),
            remaining: self.links.len(),
        }
    }

    pub fn tail(&self, vehicle_id: VehicleIdx) -> Option<VisitIdx> {
        self.chain(vehicle_id).last()
    }

    pub fn routes(&self) -> Vec<(VehicleIdx, Vec<VisitIdx>)> {
        self.vehicle_ids()
            .map(|vehicle_id| (vehicle_id, self.chain(vehicle_id).collect()))
            .collect()
    }

    pub fn used_vehicles_count(&self) -> usize {
        self.heads.iter().filter(|head| head.is_some()).count()
    }

    /// Same vehicle and predecessor for every visit.
    pub fn is_identical(&self, other: &WorkingSolution) -> bool {
        self.links == other.links
    }

    /// Same topology and same derived state.
    pub fn is_equivalent(&self, other: &WorkingSolution) -> bool {
        self.links == other.links && self.shadows == other.shadows
    }

    fn set_link(&mut self, visit_id: VisitIdx, link: PlanningLink, journal: &mut LinkJournal) {
        let previous = std::mem::replace(&mut self.links[visit_id.get()], link);
        if previous != link {
            journal.entries.push((visit_id, previous));
        }
    }

    fn rebuild_index(&mut self) {
        self.successors.fill(None);
        self.heads.fill(None);

        for (index, link) in self.links.iter().enumerate() {
            let Some(vehicle_id) = link.vehicle else {
                continue;
            };

            match link.predecessor {
                Some(predecessor) => self.successors[predecessor.get()] = Some(VisitIdx::new(index)),
                None => self.heads[vehicle_id.get()] = Some(VisitIdx::new(index)),
            }
        }
    }

    /// Removes `visit_id` from its chain, its successor now follows its predecessor.
    /// Returns the visit whose derived state must be recomputed.
    pub(crate) fn detach(
        &mut self,
        visit_id: VisitIdx,
        journal: &mut LinkJournal,
    ) -> Option<VisitIdx> {
        let link = self.link(visit_id);
        let successor = self.successor_of(visit_id);

        if let Some(successor) = successor {
            self.set_link(
                successor,
                PlanningLink {
                    vehicle: link.vehicle,
                    predecessor: link.predecessor,
                },
                journal,
            );
        }

        self.set_link(visit_id, PlanningLink::default(), journal);
        self.rebuild_index();

        successor
    }

    /// Inserts an unassigned `visit_id` in the chain of `vehicle_id`, right after `after`, or
    /// first when `after` is `None`.
    pub(crate) fn attach(
        &mut self,
        visit_id: VisitIdx,
        vehicle_id: VehicleIdx,
        after: Option<VisitIdx>,
        journal: &mut LinkJournal,
    ) {
        debug_assert!(!self.is_assigned(visit_id));

        let successor = match after {
            Some(after) => self.successor_of(after),
            None => self.head(vehicle_id),
        };

        self.set_link(
            visit_id,
            PlanningLink {
                vehicle: Some(vehicle_id),
                predecessor: after,
            },
            journal,
        );

        if let Some(successor) = successor {
            self.set_link(
                successor,
                PlanningLink {
                    vehicle: Some(vehicle_id),
                    predecessor: Some(visit_id),
                },
                journal,
            );
        }

        self.rebuild_index();
    }

    /// Unassigns `visit_id` and settles the derived state of its former chain.
    pub fn unassign(&mut self, visit_id: VisitIdx) -> LinkJournal {
        let mut journal = LinkJournal::default();
        let successor = self.detach(visit_id, &mut journal);

        propagator::recompute(self, visit_id);
        if let Some(successor) = successor {
            propagator::recompute(self, successor);
        }

        journal
    }

    /// Restores the links recorded in `journal` and settles the derived state.
    pub fn rollback(&mut self, journal: LinkJournal) {
        for (visit_id, link) in journal.entries.iter().rev() {
            self.links[visit_id.get()] = *link;
        }

        self.rebuild_index();

        for (visit_id, _) in &journal.entries {
            propagator::recompute(self, *visit_id);
        }
    }

    /// Recomputes the derived state of every visit.
    pub fn propagate_all(&mut self) {
        for vehicle_id in self.vehicle_ids() {
            if let Some(head) = self.head(vehicle_id) {
                propagator::recompute(self, head);
            }
        }

        for visit_id in self.visit_ids() {
            if !self.is_assigned(visit_id) {
                propagator::recompute(self, visit_id);
            }
        }
    }

    /// Checks that every chain is a simple path owned by a single vehicle.
    pub fn validate(&self) -> Result<(), ChainError> {
        let mut children = vec![0usize; self.links.len()];
        let mut heads = vec![0usize; self.heads.len()];

        for visit_id in self.visit_ids() {
            let link = self.link(visit_id);
            match (link.vehicle, link.predecessor) {
                (None, Some(_)) => return Err(ChainError::DanglingPredecessor(visit_id)),
                (None, None) => {}
                (Some(vehicle_id), None) => {
                    heads[vehicle_id.get()] += 1;
                    if heads[vehicle_id.get()] > 1 {
                        return Err(ChainError::MultipleHeads(vehicle_id));
                    }
                }
                (Some(vehicle_id), Some(predecessor)) => {
                    if self.vehicle_of(predecessor) != Some(vehicle_id) {
                        return Err(ChainError::VehicleMismatch(visit_id));
                    }

                    children[predecessor.get()] += 1;
                    if children[predecessor.get()] > 1 {
                        return Err(ChainError::Merge(predecessor));
                    }
                }
            }
        }

        for visit_id in self.visit_ids() {
            let mut current = self.predecessor_of(visit_id);
            let mut steps = 0;
            while let Some(predecessor) = current {
                steps += 1;
                if steps > self.links.len() {
                    return Err(ChainError::Cycle(visit_id));
                }
                current = self.predecessor_of(predecessor);
            }
        }

        Ok(())
    }
}

pub struct ChainIter<'a> {
    solution: &'a WorkingSolution,
    next: Option<VisitIdx>,
    remaining: usize,
}

impl Iterator for ChainIter<'_> {
    type Item = VisitIdx;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let current = self.next?;
        self.remaining -= 1;
        self.next = self.solution.successor_of(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, TestVisit};

    fn line_problem(visits: usize) -> Arc<VehicleRoutingProblem> {
        Arc::new(test_utils::create_test_problem(
            vec![test_utils::vehicle("v1"), test_utils::vehicle("v2")],
            (0..visits)
                .map(|i| TestVisit::at(0.0, 0.01 * (i + 1) as f64))
                .collect(),
        ))
    }

    fn ids(values: &[usize]) -> Vec<VisitIdx> {
        values.iter().copied().map(VisitIdx::new).collect()
    }

    #[test]
    fn test_from_routes() {
        let solution = WorkingSolution::from_routes(
            line_problem(4),
            &[
                (VehicleIdx::new(0), ids(&[2, 0])),
                (VehicleIdx::new(1), ids(&[1])),
            ],
        )
        .unwrap();

        assert_eq!(solution.chain(VehicleIdx::new(0)).collect::<Vec<_>>(), ids(&[2, 0]));
        assert_eq!(solution.head(VehicleIdx::new(1)), Some(VisitIdx::new(1)));
        assert_eq!(solution.successor_of(VisitIdx::new(2)), Some(VisitIdx::new(0)));
        assert_eq!(solution.unassigned_visits().collect::<Vec<_>>(), ids(&[3]));
        assert_eq!(solution.used_vehicles_count(), 2);
    }

    #[test]
    fn test_from_routes_rejects_duplicates() {
        let result = WorkingSolution::from_routes(
            line_problem(2),
            &[
                (VehicleIdx::new(0), ids(&[0, 1])),
                (VehicleIdx::new(1), ids(&[1])),
            ],
        );

        assert_eq!(result.err(), Some(ChainError::DuplicateVisit(VisitIdx::new(1))));
    }

    #[test]
    fn test_detach_splices_successor() {
        let mut solution = WorkingSolution::from_routes(
            line_problem(3),
            &[(VehicleIdx::new(0), ids(&[0, 1, 2]))],
        )
        .unwrap();

        let mut journal = LinkJournal::default();
        let successor = solution.detach(VisitIdx::new(1), &mut journal);

        assert_eq!(successor, Some(VisitIdx::new(2)));
        assert_eq!(solution.chain(VehicleIdx::new(0)).collect::<Vec<_>>(), ids(&[0, 2]));
        assert!(!solution.is_assigned(VisitIdx::new(1)));
        assert!(solution.validate().is_ok());
    }

    #[test]
    fn test_attach_in_the_middle() {
        let mut solution = WorkingSolution::from_routes(
            line_problem(3),
            &[(VehicleIdx::new(0), ids(&[0, 2]))],
        )
        .unwrap();

        let mut journal = LinkJournal::default();
        solution.attach(VisitIdx::new(1), VehicleIdx::new(0), Some(VisitIdx::new(0)), &mut journal);

        assert_eq!(solution.chain(VehicleIdx::new(0)).collect::<Vec<_>>(), ids(&[0, 1, 2]));
        assert!(solution.validate().is_ok());
    }

    #[test]
    fn test_attach_as_head() {
        let mut solution = WorkingSolution::from_routes(
            line_problem(2),
            &[(VehicleIdx::new(0), ids(&[0]))],
        )
        .unwrap();

        let mut journal = LinkJournal::default();
        solution.attach(VisitIdx::new(1), VehicleIdx::new(0), None, &mut journal);

        assert_eq!(solution.chain(VehicleIdx::new(0)).collect::<Vec<_>>(), ids(&[1, 0]));
    }

    #[test]
    fn test_rollback_restores_links_and_shadows() {
        let mut solution = WorkingSolution::from_routes(
            line_problem(3),
            &[(VehicleIdx::new(0), ids(&[0, 1, 2]))],
        )
        .unwrap();
        let original = solution.clone();

        let journal = solution.unassign(VisitIdx::new(0));
        assert!(!solution.is_identical(&original));

        solution.rollback(journal);
        assert!(solution.is_equivalent(&original));
    }

    #[test]
    fn test_validate_detects_cycle_and_merge() {
        let mut solution = WorkingSolution::new(line_problem(3));
        solution.links[0] = PlanningLink {
            vehicle: Some(VehicleIdx::new(0)),
            predecessor: Some(VisitIdx::new(1)),
        };
        solution.links[1] = PlanningLink {
            vehicle: Some(VehicleIdx::new(0)),
            predecessor: Some(VisitIdx::new(0)),
        };
        solution.rebuild_index();
        assert!(matches!(solution.validate(), Err(ChainError::Cycle(_))));

        let mut solution = WorkingSolution::new(line_problem(3));
        solution.links[0] = PlanningLink {
            vehicle: Some(VehicleIdx::new(0)),
            predecessor: None,
        };
        for index in [1, 2] {
            solution.links[index] = PlanningLink {
                vehicle: Some(VehicleIdx::new(0)),
                predecessor: Some(VisitIdx::new(0)),
            };
        }
        solution.rebuild_index();
        assert_eq!(solution.validate(), Err(ChainError::Merge(VisitIdx::new(0))));
    }

    #[test]
    fn test_validate_detects_vehicle_mismatch() {
        let mut solution = WorkingSolution::new(line_problem(2));
        solution.links[0] = PlanningLink {
            vehicle: Some(VehicleIdx::new(0)),
            predecessor: None,
        };
        solution.links[1] = PlanningLink {
            vehicle: Some(VehicleIdx::new(1)),
            predecessor: Some(VisitIdx::new(0)),
        };
        solution.rebuild_index();

        assert_eq!(
            solution.validate(),
            Err(ChainError::VehicleMismatch(VisitIdx::new(1)))
        );
    }
}
