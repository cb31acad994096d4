use crate::solver::{
    score::Score, score_level::ScoreLevel, solution::working_solution::WorkingSolution,
};

use super::global_constraint::GlobalConstraint;

pub const VEHICLE_USAGE_PENALTY: i64 = 1000;

/// Charges every vehicle that leaves its depot.
#[derive(Clone, Debug)]
pub struct VehicleUsageConstraint;

impl VehicleUsageConstraint {
    const SCORE_LEVEL: ScoreLevel = ScoreLevel::Soft;
}

impl GlobalConstraint for VehicleUsageConstraint {
    fn score_level(&self) -> ScoreLevel {
        Self::SCORE_LEVEL
    }

    fn compute_score(&self, solution: &WorkingSolution) -> Score {
        Score::of(
            self.score_level(),
            solution.used_vehicles_count() as i64 * VEHICLE_USAGE_PENALTY,
        )
    }
}
