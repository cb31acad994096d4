use crate::solver::{
    score::Score, score_level::ScoreLevel, solution::working_solution::WorkingSolution,
};

use super::global_constraint::GlobalConstraint;

pub const UNASSIGNED_VISIT_PENALTY: i64 = 1_000_000;

#[derive(Clone, Debug)]
pub struct UnassignedVisitConstraint;

impl UnassignedVisitConstraint {
    const SCORE_LEVEL: ScoreLevel = ScoreLevel::Hard;
}

impl GlobalConstraint for UnassignedVisitConstraint {
    fn score_level(&self) -> ScoreLevel {
        Self::SCORE_LEVEL
    }

    fn compute_score(&self, solution: &WorkingSolution) -> Score {
        Score::of(
            self.score_level(),
            solution.unassigned_count() as i64 * UNASSIGNED_VISIT_PENALTY,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        solver::solution::working_solution::WorkingSolution,
        test_utils::{self, TestVisit},
    };

    use super::*;

    #[test]
    fn test_penalizes_every_unassigned_visit() {
        let problem = test_utils::create_test_problem(
            vec![test_utils::vehicle("v1")],
            vec![
                TestVisit::at(0.0, 0.01),
                TestVisit::at(0.0, 0.02),
                TestVisit::at(0.0, 0.03),
            ],
        );

        let solution = WorkingSolution::new(Arc::new(problem));
        assert_eq!(
            UnassignedVisitConstraint.compute_score(&solution),
            Score::hard(3 * UNASSIGNED_VISIT_PENALTY)
        );
    }

    #[test]
    fn test_complete_assignment_is_free() {
        let problem = test_utils::create_test_problem(
            vec![test_utils::vehicle("v1")],
            vec![TestVisit::at(0.0, 0.01)],
        );
        let solution = test_utils::create_test_solution(problem, &[&[0]]);

        assert_eq!(
            UnassignedVisitConstraint.compute_score(&solution),
            Score::zero()
        );
    }
}
