use crate::solver::{
    score::{Score, ScoreAnalysis},
    solution::working_solution::WorkingSolution,
};

use super::constraint::{Constraint, default_constraints};

/// The constraints scoring one solve.
#[derive(Clone, Debug)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        ConstraintSet::new(default_constraints(false))
    }
}

impl ConstraintSet {
    pub fn new(constraints: Vec<Constraint>) -> Self {
        ConstraintSet { constraints }
    }

    pub fn with_zone_affinity(zone_affinity: bool) -> Self {
        ConstraintSet::new(default_constraints(zone_affinity))
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Scores a settled solution. Pure: the same solution always yields the same score.
    pub fn compute_score(&self, solution: &WorkingSolution) -> (Score, ScoreAnalysis) {
        let mut analysis = ScoreAnalysis::default();

        for constraint in &self.constraints {
            let score = constraint.compute_score(solution);
            *analysis
                .scores
                .entry(constraint.constraint_name())
                .or_default() += score;
        }

        (analysis.total_score(), analysis)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::amount::Amount,
        solver::{
            constraints::{
                unassigned_visit_constraint::UNASSIGNED_VISIT_PENALTY,
                vehicle_usage_constraint::VEHICLE_USAGE_PENALTY,
            },
            solution::working_solution::WorkingSolution,
        },
        test_utils::{self, TestVisit},
    };

    use super::*;

    #[test]
    fn test_soft_score_sums_distance_time_and_usage() {
        // Three stops going east from the depot, roughly 1.1 km apart.
        let problem = test_utils::create_test_problem(
            vec![test_utils::vehicle("v1")],
            vec![
                TestVisit::at(0.0, 0.01),
                TestVisit::at(0.0, 0.02),
                TestVisit::at(0.0, 0.03),
            ],
        );
        let solution = test_utils::create_test_solution(problem, &[&[0, 1, 2]]);

        let (score, analysis) = ConstraintSet::default().compute_score(&solution);

        assert_eq!(score.hard_score, 0);
        assert_eq!(analysis.score_of("transport_distance"), Score::soft(3336));
        assert_eq!(analysis.score_of("travel_time"), Score::soft(6));
        assert_eq!(
            analysis.score_of("vehicle_usage"),
            Score::soft(VEHICLE_USAGE_PENALTY)
        );
        assert_eq!(score, analysis.total_score());
    }

    #[test]
    fn test_capacity_overload_scenario() {
        let problem = test_utils::create_test_problem(
            vec![test_utils::vehicle_with_capacity("v1", Amount::quantity(5.0))],
            vec![
                TestVisit::at(0.0, 0.01).demand(10.0),
                TestVisit::at(0.0, 0.02).demand(10.0),
            ],
        );
        let solution = test_utils::create_test_solution(problem, &[&[0, 1]]);

        let (score, analysis) = ConstraintSet::default().compute_score(&solution);

        assert_eq!(score.hard_score, 20);
        assert_eq!(analysis.score_of("capacity_quantity"), Score::hard(20));
    }

    #[test]
    fn test_unassigned_visits_dominate() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![test_utils::vehicle("v1")],
            vec![TestVisit::at(0.0, 0.01), TestVisit::at(0.0, 0.02)],
        ));
        let empty = WorkingSolution::new(Arc::clone(&problem));
        let (score, _) = ConstraintSet::default().compute_score(&empty);

        assert_eq!(score, Score::hard(2 * UNASSIGNED_VISIT_PENALTY));
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let problem = test_utils::create_test_problem(
            vec![test_utils::vehicle("v1"), test_utils::vehicle("v2")],
            vec![
                TestVisit::at(0.01, 0.0).priority(2),
                TestVisit::at(0.0, 0.02).service(15),
                TestVisit::at(0.03, 0.01),
            ],
        );
        let solution = test_utils::create_test_solution(problem, &[&[0, 2], &[1]]);
        let constraints = ConstraintSet::with_zone_affinity(true);

        assert_eq!(
            constraints.compute_score(&solution),
            constraints.compute_score(&solution)
        );
    }
}
