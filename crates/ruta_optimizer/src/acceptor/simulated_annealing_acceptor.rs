use rand::Rng;

use crate::solver::score::Score;

use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

/// Accepts a worse soft score with probability `exp(-delta / T)`, where the temperature `T`
/// decays geometrically with the iteration count. A worse hard score is never accepted.
#[derive(Debug)]
pub struct SimulatedAnnealingAcceptor {
    initial_temperature: f64,
    cooling_rate: f64,
}

impl SimulatedAnnealingAcceptor {
    pub fn new(initial_temperature: f64, cooling_rate: f64) -> Self {
        SimulatedAnnealingAcceptor {
            initial_temperature,
            cooling_rate,
        }
    }

    fn temperature(&self, iteration: usize) -> f64 {
        let iteration = i32::try_from(iteration).unwrap_or(i32::MAX);
        self.initial_temperature * self.cooling_rate.powi(iteration)
    }
}

impl AcceptSolution for SimulatedAnnealingAcceptor {
    fn accept(&self, current: &Score, score: &Score, context: AcceptSolutionContext) -> bool {
        if score <= current {
            return true;
        }

        if score.hard_score > current.hard_score {
            return false;
        }

        let temperature = self.temperature(context.iteration);
        if !temperature.is_normal() || temperature < 0.0 {
            return false;
        }

        let delta = (score.soft_score - current.soft_score) as f64;
        let probability = (-delta / temperature).exp();

        context.rng.random::<f64>() < probability
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;

    fn accept(acceptor: &SimulatedAnnealingAcceptor, iteration: usize, score: Score) -> bool {
        let mut rng = SmallRng::seed_from_u64(7);
        acceptor.accept(
            &Score::new(1, 100),
            &score,
            AcceptSolutionContext {
                iteration,
                rng: &mut rng,
            },
        )
    }

    #[test]
    fn test_never_accepts_worse_hard_score() {
        let acceptor = SimulatedAnnealingAcceptor::new(1e12, 1.0);
        assert!(!accept(&acceptor, 0, Score::new(2, 0)));
    }

    #[test]
    fn test_hot_start_accepts_small_soft_regressions() {
        let acceptor = SimulatedAnnealingAcceptor::new(1e12, 0.99);
        assert!(accept(&acceptor, 0, Score::new(1, 101)));
    }

    #[test]
    fn test_cold_search_rejects_soft_regressions() {
        let acceptor = SimulatedAnnealingAcceptor::new(1.0, 0.5);
        assert!(!accept(&acceptor, 10_000, Score::new(1, 101)));
        assert!(accept(&acceptor, 10_000, Score::new(1, 100)));
    }
}
