use crate::solver::{score::Score, score_level::ScoreLevel};

use super::visit_constraint::{VisitConstraint, VisitContext};

/// Keeps vehicles bound to a zone away from visits in other zones.
///
/// Visits without a zone and vehicles without affinity never conflict.
#[derive(Clone, Debug)]
pub struct ZoneAffinityConstraint;

impl ZoneAffinityConstraint {
    const SCORE_LEVEL: ScoreLevel = ScoreLevel::Hard;
}

impl VisitConstraint for ZoneAffinityConstraint {
    fn score_level(&self) -> ScoreLevel {
        Self::SCORE_LEVEL
    }

    fn compute_score(&self, context: &VisitContext) -> Score {
        match (context.vehicle.zone(), context.visit.location().zone()) {
            (Some(vehicle_zone), Some(visit_zone)) if vehicle_zone != visit_zone => {
                Score::of(self.score_level(), 1)
            }
            _ => Score::zero(),
        }
    }
}
