use crate::solver::{score::Score, score_level::ScoreLevel};

use super::visit_constraint::{VisitConstraint, VisitContext};

#[derive(Clone, Debug)]
pub struct TravelTimeConstraint;

impl TravelTimeConstraint {
    const SCORE_LEVEL: ScoreLevel = ScoreLevel::Soft;
}

impl VisitConstraint for TravelTimeConstraint {
    fn score_level(&self) -> ScoreLevel {
        Self::SCORE_LEVEL
    }

    fn compute_score(&self, context: &VisitContext) -> Score {
        Score::of(
            self.score_level(),
            context.shadow.travel_minutes_from_predecessor,
        )
    }
}
