use crate::{
    problem::amount::Amount,
    solver::{score::Score, score_level::ScoreLevel},
};

use super::visit_constraint::{VisitConstraint, VisitContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapacityDimension {
    Quantity,
    Volume,
    Weight,
}

impl CapacityDimension {
    fn of(self, amount: &Amount) -> f64 {
        match self {
            CapacityDimension::Quantity => amount.quantity,
            CapacityDimension::Volume => amount.volume,
            CapacityDimension::Weight => amount.weight,
        }
    }
}

/// Penalizes the load carried after a visit beyond the vehicle capacity, per dimension.
#[derive(Clone, Debug)]
pub struct CapacityConstraint {
    dimension: CapacityDimension,
}

impl CapacityConstraint {
    const SCORE_LEVEL: ScoreLevel = ScoreLevel::Hard;

    pub fn new(dimension: CapacityDimension) -> Self {
        CapacityConstraint { dimension }
    }

    pub fn constraint_name(&self) -> &'static str {
        match self.dimension {
            CapacityDimension::Quantity => "capacity_quantity",
            CapacityDimension::Volume => "capacity_volume",
            CapacityDimension::Weight => "capacity_weight",
        }
    }
}

impl VisitConstraint for CapacityConstraint {
    fn score_level(&self) -> ScoreLevel {
        Self::SCORE_LEVEL
    }

    fn compute_score(&self, context: &VisitContext) -> Score {
        let excess = context
            .shadow
            .accumulated
            .excess_over(context.vehicle.capacity());
        let excess = self.dimension.of(&excess);

        if excess > 0.0 {
            Score::of(self.score_level(), excess.ceil() as i64)
        } else {
            Score::zero()
        }
    }
}
