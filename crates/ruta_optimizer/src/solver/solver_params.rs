use std::ops::RangeInclusive;

use jiff::SignedDuration;

use crate::problem::error::ProblemError;

use super::score::Score;

pub const OPTIMIZATION_SECONDS_RANGE: RangeInclusive<i64> = 5..=300;
pub const DEFAULT_OPTIMIZATION_SECONDS: i64 = 20;

#[derive(Clone, Debug)]
pub struct SolverParams {
    pub terminations: Vec<Termination>,
    pub acceptor: AcceptorStrategy,
    pub move_selection: MoveSelection,
    pub zone_affinity: bool,
    /// Seeds the acceptor's generator; the random selector carries its own seed.
    pub seed: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Termination {
    Duration(SignedDuration),
    Iterations(usize),
    IterationsWithoutImprovement(usize),
    /// Stop once the best score is at least as good as the target.
    Score(Score),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum AcceptorStrategy {
    #[default]
    Greedy,
    SimulatedAnnealing {
        initial_temperature: f64,
        cooling_rate: f64,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MoveSelection {
    #[default]
    Sweep,
    Random {
        seed: u64,
    },
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            terminations: vec![Termination::Duration(SignedDuration::from_secs(
                DEFAULT_OPTIMIZATION_SECONDS,
            ))],
            acceptor: AcceptorStrategy::default(),
            move_selection: MoveSelection::default(),
            zone_affinity: false,
            seed: 0,
        }
    }
}

impl SolverParams {
    /// Default parameters bounded by a wall-clock budget in seconds, which must be within
    /// `OPTIMIZATION_SECONDS_RANGE`.
    pub fn from_optimization_seconds(seconds: i64) -> Result<Self, ProblemError> {
        if !OPTIMIZATION_SECONDS_RANGE.contains(&seconds) {
            return Err(ProblemError::InvalidOptimizationTime {
                min: *OPTIMIZATION_SECONDS_RANGE.start(),
                max: *OPTIMIZATION_SECONDS_RANGE.end(),
                actual: seconds,
            });
        }

        Ok(SolverParams {
            terminations: vec![Termination::Duration(SignedDuration::from_secs(seconds))],
            ..SolverParams::default()
        })
    }

    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.terminations.push(termination);
        self
    }

    /// The wall-clock budget, when one is set.
    pub fn max_duration(&self) -> Option<SignedDuration> {
        self.terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::Duration(duration) => Some(*duration),
                _ => None,
            })
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        let params = SolverParams::default();
        assert_eq!(params.max_duration(), Some(SignedDuration::from_secs(20)));
        assert_eq!(params.acceptor, AcceptorStrategy::Greedy);
        assert_eq!(params.move_selection, MoveSelection::Sweep);
    }

    #[test]
    fn test_optimization_seconds_bounds() {
        assert!(SolverParams::from_optimization_seconds(5).is_ok());
        assert!(SolverParams::from_optimization_seconds(300).is_ok());
        assert_eq!(
            SolverParams::from_optimization_seconds(4).err(),
            Some(ProblemError::InvalidOptimizationTime {
                min: 5,
                max: 300,
                actual: 4
            })
        );
        assert!(SolverParams::from_optimization_seconds(301).is_err());
    }

    #[test]
    fn test_shortest_duration_wins() {
        let params = SolverParams::default()
            .with_termination(Termination::Duration(SignedDuration::from_secs(3)));
        assert_eq!(params.max_duration(), Some(SignedDuration::from_secs(3)));
    }
}
