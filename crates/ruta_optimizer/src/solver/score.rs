use std::{
    cmp::Ordering,
    fmt::Display,
    iter,
    ops::{Add, AddAssign, Sub},
};

use fxhash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::score_level::ScoreLevel;

/// Hard and soft penalties, lower is better. Any hard difference dominates the soft level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub struct Score {
    pub hard_score: i64,
    pub soft_score: i64,
}

impl Score {
    pub const MAX: Score = Score {
        hard_score: i64::MAX,
        soft_score: i64::MAX,
    };

    pub const ZERO: Score = Score {
        hard_score: 0,
        soft_score: 0,
    };

    pub fn new(hard_score: i64, soft_score: i64) -> Self {
        Score {
            hard_score,
            soft_score,
        }
    }

    pub fn of(level: ScoreLevel, score: i64) -> Self {
        match level {
            ScoreLevel::Hard => Score::hard(score),
            ScoreLevel::Soft => Score::soft(score),
        }
    }

    pub fn hard(hard_score: i64) -> Self {
        Score {
            hard_score,
            soft_score: 0,
        }
    }

    pub fn soft(soft_score: i64) -> Self {
        Score {
            hard_score: 0,
            soft_score,
        }
    }

    pub fn zero() -> Self {
        Score::ZERO
    }

    pub fn is_feasible(&self) -> bool {
        self.hard_score == 0
    }

    pub fn is_infeasible(&self) -> bool {
        self.hard_score > 0
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hard_score
            .cmp(&other.hard_score)
            .then_with(|| self.soft_score.cmp(&other.soft_score))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Penalties are shown as negative values, `-2hard/-1534soft`.
impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}hard/{}soft",
            self.hard_score.saturating_neg(),
            self.soft_score.saturating_neg()
        )
    }
}

impl iter::Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, score| acc + score)
    }
}

impl Add<Score> for Score {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Score {
            hard_score: self.hard_score.saturating_add(other.hard_score),
            soft_score: self.soft_score.saturating_add(other.soft_score),
        }
    }
}

impl AddAssign<Score> for Score {
    fn add_assign(&mut self, other: Score) {
        *self = *self + other;
    }
}

impl Sub<Score> for Score {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Score {
            hard_score: self.hard_score.saturating_sub(other.hard_score),
            soft_score: self.soft_score.saturating_sub(other.soft_score),
        }
    }
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, JsonSchema)]
pub struct ScoreAnalysis {
    pub scores: FxHashMap<&'static str, Score>,
}

impl ScoreAnalysis {
    pub fn total_score(&self) -> Score {
        self.scores.values().copied().sum()
    }

    pub fn score_of(&self, constraint_name: &str) -> Score {
        self.scores
            .get(constraint_name)
            .copied()
            .unwrap_or_default()
    }
}
