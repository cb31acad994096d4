use crate::solver::{score::Score, score_level::ScoreLevel};

use super::visit_constraint::{VisitConstraint, VisitContext};

/// Minutes a vehicle shows up before the visit window opens.
#[derive(Clone, Debug)]
pub struct TimeWindowStartConstraint;

impl TimeWindowStartConstraint {
    const SCORE_LEVEL: ScoreLevel = ScoreLevel::Hard;
}

impl VisitConstraint for TimeWindowStartConstraint {
    fn score_level(&self) -> ScoreLevel {
        Self::SCORE_LEVEL
    }

    fn compute_score(&self, context: &VisitContext) -> Score {
        let Some(arrival) = context.shadow.arrival_time else {
            return Score::zero();
        };

        Score::of(
            self.score_level(),
            context.visit.time_window().early_minutes(arrival),
        )
    }
}

/// Minutes a vehicle shows up after the visit window closed.
#[derive(Clone, Debug)]
pub struct TimeWindowEndConstraint;

impl TimeWindowEndConstraint {
    const SCORE_LEVEL: ScoreLevel = ScoreLevel::Hard;
}

impl VisitConstraint for TimeWindowEndConstraint {
    fn score_level(&self) -> ScoreLevel {
        Self::SCORE_LEVEL
    }

    fn compute_score(&self, context: &VisitContext) -> Score {
        let Some(arrival) = context.shadow.arrival_time else {
            return Score::zero();
        };

        Score::of(
            self.score_level(),
            context.visit.time_window().late_minutes(arrival),
        )
    }
}
