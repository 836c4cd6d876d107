use tracing::{debug, trace};

use crate::error::Result;
use crate::policy::Policy;
use crate::sampling::argmax;
use crate::state::{PolicyState, cold_start_arm};

/// Upper Confidence Bound (UCB1) policy
///
/// Pulls every arm once, then picks the arm maximizing
/// `mean + sqrt(2 ln t / n)` where `t` counts calls to `select_arm` and `n` is
/// the arm's pull count. Fully deterministic: ties go to the lowest index.
#[derive(Clone, Debug)]
pub struct Ucb1 {
    state: PolicyState,
    /// Number of `select_arm` calls, cold start included
    total_steps: u64,
}

impl Ucb1 {
    /// Creates a new UCB1 policy over `k` arms
    pub fn new(k: usize) -> Result<Self> {
        let state = PolicyState::new(k, 0.0)?;
        debug!(k, "created UCB1 policy");
        Ok(Self {
            state,
            total_steps: 0,
        })
    }

    /// Gets the number of selections made so far
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Current UCB1 score of every arm
    ///
    /// Unpulled arms score `+inf`.
    pub fn scores(&self) -> Vec<f64> {
        let ln_t = (self.total_steps.max(1) as f64).ln();
        self.state
            .counts()
            .iter()
            .zip(self.state.values())
            .map(|(&pulls, &mean)| {
                if pulls == 0 {
                    f64::INFINITY
                } else {
                    mean + (2.0 * ln_t / pulls as f64).sqrt()
                }
            })
            .collect()
    }
}

impl Policy for Ucb1 {
    fn select_arm(&mut self, _rng: &mut dyn rand::RngCore) -> usize {
        self.total_steps += 1;

        if let Some(arm) = cold_start_arm(self.state.counts()) {
            trace!(arm, step = self.total_steps, "UCB1 cold start");
            return arm;
        }

        argmax(&self.scores())
    }

    fn update(&mut self, arm: usize, reward: f64) -> Result<()> {
        self.state.record_mean(arm, reward)
    }

    fn reset(&mut self) {
        self.state.reset();
        self.total_steps = 0;
        debug!(k = self.state.k(), "reset UCB1 policy");
    }

    fn state(&self) -> &PolicyState {
        &self.state
    }

    fn label(&self) -> String {
        "UCB1".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;

    #[test]
    fn test_ucb1_explores_unpulled_arms_first() {
        let mut policy = Ucb1::new(4).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        for expected in 0..4 {
            let arm = policy.select_arm(&mut rng);
            assert_eq!(arm, expected);
            policy.update(arm, 0.0).unwrap();
        }
        assert_eq!(policy.total_steps(), 4);
    }

    #[test]
    fn test_ucb1_scores_after_cold_start() {
        let mut policy = Ucb1::new(3).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        for reward in [1.0, 0.0, 0.0] {
            let arm = policy.select_arm(&mut rng);
            policy.update(arm, reward).unwrap();
        }

        assert_eq!(policy.select_arm(&mut rng), 0);
        let scores = policy.scores();
        let bonus = (2.0 * 4f64.ln()).sqrt();
        assert_abs_diff_eq!(scores[0], 1.0 + bonus, epsilon = 1e-12);
        assert_abs_diff_eq!(scores[1], bonus, epsilon = 1e-12);
        assert_abs_diff_eq!(scores[2], bonus, epsilon = 1e-12);
    }

    #[test]
    fn test_ucb1_deterministic_selection() {
        let mut a = Ucb1::new(3).unwrap();
        crate::policy::fit(&mut a, &[0, 1, 2, 0, 1, 2], &[0.1, 0.5, 0.9, 0.2, 0.6, 0.8]).unwrap();
        let mut b = a.clone();

        let mut rng1 = rand::rngs::StdRng::seed_from_u64(1);
        let mut rng2 = rand::rngs::StdRng::seed_from_u64(999);

        // UCB1 is deterministic - should select same arm regardless of RNG
        for _ in 0..10 {
            assert_eq!(a.select_arm(&mut rng1), b.select_arm(&mut rng2));
        }
    }

    #[test]
    fn test_ucb1_reset() {
        let mut policy = Ucb1::new(3).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..5 {
            let arm = policy.select_arm(&mut rng);
            policy.update(arm, 0.5).unwrap();
        }

        policy.reset();
        assert_eq!(policy.total_steps(), 0);
        assert_eq!(policy.counts(), &[0, 0, 0]);
        assert_eq!(policy.values(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_ucb1_rejects_zero_arms() {
        assert!(Ucb1::new(0).is_err());
    }
}
