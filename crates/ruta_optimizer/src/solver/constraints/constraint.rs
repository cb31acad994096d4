use crate::solver::{
    score::Score, score_level::ScoreLevel, solution::working_solution::WorkingSolution,
};

use super::{
    capacity_constraint::{CapacityConstraint, CapacityDimension},
    global_constraint::{GlobalConstraint, GlobalConstraintType},
    priority_constraint::PriorityConstraint,
    shift_constraint::ShiftConstraint,
    time_window_constraint::{TimeWindowEndConstraint, TimeWindowStartConstraint},
    transport_distance_constraint::TransportDistanceConstraint,
    travel_time_constraint::TravelTimeConstraint,
    unassigned_visit_constraint::UnassignedVisitConstraint,
    vehicle_usage_constraint::VehicleUsageConstraint,
    visit_constraint::{VisitConstraint, VisitConstraintType, VisitContext},
    zone_affinity_constraint::ZoneAffinityConstraint,
};

#[derive(Clone, Debug)]
pub enum Constraint {
    Global(GlobalConstraintType),
    Visit(VisitConstraintType),
}

impl Constraint {
    pub fn score_level(&self) -> ScoreLevel {
        match self {
            Constraint::Global(constraint) => constraint.score_level(),
            Constraint::Visit(constraint) => constraint.score_level(),
        }
    }

    /// Evaluates the constraint over a settled solution.
    pub fn compute_score(&self, solution: &WorkingSolution) -> Score {
        match self {
            Constraint::Global(constraint) => constraint.compute_score(solution),
            Constraint::Visit(constraint) => solution
                .vehicle_ids()
                .flat_map(|vehicle_id| solution.chain(vehicle_id))
                .filter_map(|visit_id| VisitContext::new(solution, visit_id))
                .fold(Score::zero(), |acc, context| {
                    acc + constraint.compute_score(&context)
                }),
        }
    }

    pub fn constraint_name(&self) -> &'static str {
        match self {
            Constraint::Global(c) => c.constraint_name(),
            Constraint::Visit(c) => c.constraint_name(),
        }
    }
}

/// Hard feasibility rules and soft costs of the delivery problem.
///
/// Zone affinity is an optional hard policy and stays off unless requested.
pub fn default_constraints(zone_affinity: bool) -> Vec<Constraint> {
    let mut constraints = vec![
        Constraint::Global(GlobalConstraintType::UnassignedVisit(
            UnassignedVisitConstraint,
        )),
        Constraint::Visit(VisitConstraintType::Capacity(CapacityConstraint::new(
            CapacityDimension::Quantity,
        ))),
        Constraint::Visit(VisitConstraintType::Capacity(CapacityConstraint::new(
            CapacityDimension::Volume,
        ))),
        Constraint::Visit(VisitConstraintType::Capacity(CapacityConstraint::new(
            CapacityDimension::Weight,
        ))),
        Constraint::Visit(VisitConstraintType::TimeWindowStart(
            TimeWindowStartConstraint,
        )),
        Constraint::Visit(VisitConstraintType::TimeWindowEnd(TimeWindowEndConstraint)),
        Constraint::Visit(VisitConstraintType::Shift(ShiftConstraint)),
        Constraint::Visit(VisitConstraintType::TransportDistance(
            TransportDistanceConstraint,
        )),
        Constraint::Visit(VisitConstraintType::TravelTime(TravelTimeConstraint)),
        Constraint::Global(GlobalConstraintType::VehicleUsage(VehicleUsageConstraint)),
        Constraint::Visit(VisitConstraintType::Priority(PriorityConstraint)),
    ];

    if zone_affinity {
        constraints.push(Constraint::Visit(VisitConstraintType::ZoneAffinity(
            ZoneAffinityConstraint,
        )));
    }

    constraints
}
