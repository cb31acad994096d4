use crate::solver::{
    score::Score, score_level::ScoreLevel, solution::working_solution::WorkingSolution,
};

use super::{
    unassigned_visit_constraint::UnassignedVisitConstraint,
    vehicle_usage_constraint::VehicleUsageConstraint,
};

/// Constraint evaluated once over the whole solution.
pub trait GlobalConstraint {
    fn score_level(&self) -> ScoreLevel;
    fn compute_score(&self, solution: &WorkingSolution) -> Score;
}

#[derive(Clone, Debug)]
pub enum GlobalConstraintType {
    UnassignedVisit(UnassignedVisitConstraint),
    VehicleUsage(VehicleUsageConstraint),
}

impl GlobalConstraintType {
    pub fn constraint_name(&self) -> &'static str {
        match self {
            Self::UnassignedVisit(_) => "unassigned_visit",
            Self::VehicleUsage(_) => "vehicle_usage",
        }
    }
}

impl GlobalConstraint for GlobalConstraintType {
    fn score_level(&self) -> ScoreLevel {
        match self {
            Self::UnassignedVisit(constraint) => constraint.score_level(),
            Self::VehicleUsage(constraint) => constraint.score_level(),
        }
    }

    fn compute_score(&self, solution: &WorkingSolution) -> Score {
        match self {
            Self::UnassignedVisit(constraint) => constraint.compute_score(solution),
            Self::VehicleUsage(constraint) => constraint.compute_score(solution),
        }
    }
}
