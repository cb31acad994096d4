use crate::solver::{score::Score, score_level::ScoreLevel};

use super::visit_constraint::{VisitConstraint, VisitContext};

pub const PRIORITY_REWARD: i64 = 100;

/// Rewards serving visits above the base priority.
#[derive(Clone, Debug)]
pub struct PriorityConstraint;

impl PriorityConstraint {
    const SCORE_LEVEL: ScoreLevel = ScoreLevel::Soft;
}

impl VisitConstraint for PriorityConstraint {
    fn score_level(&self) -> ScoreLevel {
        Self::SCORE_LEVEL
    }

    fn compute_score(&self, context: &VisitContext) -> Score {
        let priority = context.visit.priority();
        if priority > 1 {
            Score::of(self.score_level(), -PRIORITY_REWARD * i64::from(priority))
        } else {
            Score::zero()
        }
    }
}
