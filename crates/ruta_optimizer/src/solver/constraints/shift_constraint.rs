use crate::{
    solver::{score::Score, score_level::ScoreLevel},
    utils::time::ceil_minutes,
};

use super::visit_constraint::{VisitConstraint, VisitContext};

/// Penalizes service that runs past the end of the vehicle shift.
#[derive(Clone, Debug)]
pub struct ShiftConstraint;

impl ShiftConstraint {
    const SCORE_LEVEL: ScoreLevel = ScoreLevel::Hard;
}

impl VisitConstraint for ShiftConstraint {
    fn score_level(&self) -> ScoreLevel {
        Self::SCORE_LEVEL
    }

    fn compute_score(&self, context: &VisitContext) -> Score {
        let (Some(departure), Some(shift_end)) = (
            context.shadow.departure_time,
            context.vehicle.shift_end(),
        ) else {
            return Score::zero();
        };

        Score::of(
            self.score_level(),
            ceil_minutes(departure.duration_since(shift_end)),
        )
    }
}
