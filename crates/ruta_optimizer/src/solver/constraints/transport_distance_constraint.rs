use crate::solver::{score::Score, score_level::ScoreLevel};

use super::visit_constraint::{VisitConstraint, VisitContext};

/// Meters driven to reach each visit.
#[derive(Clone, Debug)]
pub struct TransportDistanceConstraint;

impl TransportDistanceConstraint {
    const SCORE_LEVEL: ScoreLevel = ScoreLevel::Soft;
}

impl VisitConstraint for TransportDistanceConstraint {
    fn score_level(&self) -> ScoreLevel {
        Self::SCORE_LEVEL
    }

    fn compute_score(&self, context: &VisitContext) -> Score {
        Score::of(
            self.score_level(),
            context.shadow.distance_from_predecessor_meters(),
        )
    }
}
