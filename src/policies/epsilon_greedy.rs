use rand::Rng;
use tracing::debug;

use crate::error::{BanditError, Result};
use crate::policy::Policy;
use crate::sampling::argmax;
use crate::state::PolicyState;

/// Epsilon-greedy policy - explores with probability epsilon, exploits otherwise
#[derive(Clone, Debug)]
pub struct EpsilonGreedy {
    epsilon: f64,
    state: PolicyState,
    probabilities: Vec<f64>,
}

impl EpsilonGreedy {
    /// Creates a new EpsilonGreedy policy over `k` arms with the given epsilon
    pub fn new(k: usize, epsilon: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(BanditError::invalid(format!(
                "epsilon must be between 0 and 1, got {epsilon}"
            )));
        }
        let state = PolicyState::new(k, 0.0)?;
        debug!(k, epsilon, "created EpsilonGreedy policy");
        let mut policy = Self {
            epsilon,
            state,
            probabilities: Vec::with_capacity(k),
        };
        policy.refresh_probabilities();
        Ok(policy)
    }

    /// Gets the epsilon value
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Probability of each arm being selected next
    ///
    /// The greedy arm gets `1 - epsilon + epsilon / k`, every other arm
    /// `epsilon / k`.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    fn refresh_probabilities(&mut self) {
        let k = self.state.k();
        self.probabilities.clear();
        self.probabilities.resize(k, self.epsilon / k as f64);
        self.probabilities[argmax(self.state.values())] += 1.0 - self.epsilon;
    }
}

impl Policy for EpsilonGreedy {
    fn select_arm(&mut self, rng: &mut dyn rand::RngCore) -> usize {
        // Explore with probability epsilon
        let r: f64 = rng.random_range(0.0..1.0);
        if r < self.epsilon {
            rng.random_range(0..self.state.k())
        } else {
            argmax(self.state.values())
        }
    }

    fn update(&mut self, arm: usize, reward: f64) -> Result<()> {
        self.state.record_mean(arm, reward)?;
        self.refresh_probabilities();
        Ok(())
    }

    fn reset(&mut self) {
        self.state.reset();
        self.refresh_probabilities();
        debug!(k = self.state.k(), epsilon = self.epsilon, "reset EpsilonGreedy policy");
    }

    fn state(&self) -> &PolicyState {
        &self.state
    }

    fn label(&self) -> String {
        format!("EpsilonGreedy (epsilon={})", self.epsilon)
    }
}
