use crate::{
    problem::{
        vehicle::{Vehicle, VehicleIdx},
        vehicle_routing_problem::VehicleRoutingProblem,
        visit::{Visit, VisitIdx},
    },
    solver::{
        score::Score,
        score_level::ScoreLevel,
        solution::{shadow::ShadowState, working_solution::WorkingSolution},
    },
};

use super::{
    capacity_constraint::CapacityConstraint,
    priority_constraint::PriorityConstraint,
    shift_constraint::ShiftConstraint,
    time_window_constraint::{TimeWindowEndConstraint, TimeWindowStartConstraint},
    transport_distance_constraint::TransportDistanceConstraint,
    travel_time_constraint::TravelTimeConstraint,
    zone_affinity_constraint::ZoneAffinityConstraint,
};

/// An assigned visit together with its vehicle and derived state.
pub struct VisitContext<'a> {
    pub problem: &'a VehicleRoutingProblem,
    pub visit_id: VisitIdx,
    pub visit: &'a Visit,
    pub vehicle_id: VehicleIdx,
    pub vehicle: &'a Vehicle,
    pub shadow: &'a ShadowState,
    pub is_first: bool,
}

impl<'a> VisitContext<'a> {
    /// `None` for unassigned visits.
    pub fn new(solution: &'a WorkingSolution, visit_id: VisitIdx) -> Option<Self> {
        let vehicle_id = solution.vehicle_of(visit_id)?;
        let problem = solution.problem().as_ref();

        Some(VisitContext {
            problem,
            visit_id,
            visit: problem.visit(visit_id),
            vehicle_id,
            vehicle: problem.vehicle(vehicle_id),
            shadow: solution.shadow(visit_id),
            is_first: solution.predecessor_of(visit_id).is_none(),
        })
    }
}

/// Constraint evaluated on every assigned visit.
pub trait VisitConstraint {
    fn score_level(&self) -> ScoreLevel;
    fn compute_score(&self, context: &VisitContext) -> Score;
}

#[derive(Clone, Debug)]
pub enum VisitConstraintType {
    Capacity(CapacityConstraint),
    TimeWindowStart(TimeWindowStartConstraint),
    TimeWindowEnd(TimeWindowEndConstraint),
    Shift(ShiftConstraint),
    ZoneAffinity(ZoneAffinityConstraint),
    TransportDistance(TransportDistanceConstraint),
    TravelTime(TravelTimeConstraint),
    Priority(PriorityConstraint),
}

impl VisitConstraintType {
    pub fn constraint_name(&self) -> &'static str {
        match self {
            Self::Capacity(constraint) => constraint.constraint_name(),
            Self::TimeWindowStart(_) => "time_window_start",
            Self::TimeWindowEnd(_) => "time_window_end",
            Self::Shift(_) => "shift_end",
            Self::ZoneAffinity(_) => "zone_affinity",
            Self::TransportDistance(_) => "transport_distance",
            Self::TravelTime(_) => "travel_time",
            Self::Priority(_) => "priority",
        }
    }
}

impl VisitConstraint for VisitConstraintType {
    fn score_level(&self) -> ScoreLevel {
        match self {
            Self::Capacity(constraint) => constraint.score_level(),
            Self::TimeWindowStart(constraint) => constraint.score_level(),
            Self::TimeWindowEnd(constraint) => constraint.score_level(),
            Self::Shift(constraint) => constraint.score_level(),
            Self::ZoneAffinity(constraint) => constraint.score_level(),
            Self::TransportDistance(constraint) => constraint.score_level(),
            Self::TravelTime(constraint) => constraint.score_level(),
            Self::Priority(constraint) => constraint.score_level(),
        }
    }

    fn compute_score(&self, context: &VisitContext) -> Score {
        match self {
            Self::Capacity(constraint) => constraint.compute_score(context),
            Self::TimeWindowStart(constraint) => constraint.compute_score(context),
            Self::TimeWindowEnd(constraint) => constraint.compute_score(context),
            Self::Shift(constraint) => constraint.compute_score(context),
            Self::ZoneAffinity(constraint) => constraint.compute_score(context),
            Self::TransportDistance(constraint) => constraint.compute_score(context),
            Self::TravelTime(constraint) => constraint.compute_score(context),
            Self::Priority(constraint) => constraint.compute_score(context),
        }
    }
}
