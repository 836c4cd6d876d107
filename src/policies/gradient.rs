use tracing::debug;

use crate::error::{BanditError, Result};
use crate::policy::Policy;
use crate::sampling::{sample_categorical, softmax};
use crate::state::PolicyState;

/// Gradient bandit over learned arm preferences
///
/// The state's values are preferences `H`, not reward estimates. Arms are
/// drawn from `softmax(H)`, and every update moves `H` along the gradient of
/// expected reward using the running average reward as baseline:
///
/// ```text
/// H[chosen] += alpha * (r - r_bar) * (1 - p[chosen])
/// H[other]  -= alpha * (r - r_bar) * p[other]
/// ```
#[derive(Clone, Debug)]
pub struct GradientPreference {
    alpha: f64,
    initial_preference: f64,
    state: PolicyState,
    /// Always `softmax(H)` for the current preferences
    probabilities: Vec<f64>,
    average_reward: f64,
    total_steps: u64,
}

impl GradientPreference {
    /// Creates a new gradient policy over `k` arms
    ///
    /// # Arguments
    /// * `k` - Number of arms
    /// * `alpha` - Step size, must be positive
    /// * `initial_preference` - Starting preference of every arm
    pub fn new(k: usize, alpha: f64, initial_preference: f64) -> Result<Self> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(BanditError::invalid(format!(
                "alpha must be positive, got {alpha}"
            )));
        }
        let state = PolicyState::new(k, initial_preference)?;
        debug!(k, alpha, initial_preference, "created GradientPreference policy");
        Ok(Self {
            alpha,
            initial_preference,
            probabilities: vec![1.0 / k as f64; k],
            state,
            average_reward: 0.0,
            total_steps: 0,
        })
    }

    /// Creates a gradient policy whose preferences start at zero
    pub fn with_alpha(k: usize, alpha: f64) -> Result<Self> {
        Self::new(k, alpha, 0.0)
    }

    /// Gets the step size
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Gets the starting preference
    pub fn initial_preference(&self) -> f64 {
        self.initial_preference
    }

    /// Current preferences `H`
    pub fn preferences(&self) -> &[f64] {
        self.state.values()
    }

    /// Current selection probability of every arm
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Running average of every reward seen
    pub fn average_reward(&self) -> f64 {
        self.average_reward
    }

    /// Number of updates since construction or the last reset
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}

impl Policy for GradientPreference {
    fn select_arm(&mut self, rng: &mut dyn rand::RngCore) -> usize {
        sample_categorical(&self.probabilities, rng)
    }

    fn update(&mut self, arm: usize, reward: f64) -> Result<()> {
        self.state.record_pull(arm)?;

        self.total_steps += 1;
        self.average_reward += (reward - self.average_reward) / self.total_steps as f64;
        let error = reward - self.average_reward;

        let step = self.alpha * error;
        for (a, (h, &p)) in self
            .state
            .values_mut()
            .iter_mut()
            .zip(&self.probabilities)
            .enumerate()
        {
            if a == arm {
                *h += step * (1.0 - p);
            } else {
                *h -= step * p;
            }
        }

        self.probabilities = softmax(self.state.values(), 1.0);
        Ok(())
    }

    fn reset(&mut self) {
        self.state.reset();
        let k = self.state.k();
        self.probabilities = vec![1.0 / k as f64; k];
        self.average_reward = 0.0;
        self.total_steps = 0;
        debug!(k, alpha = self.alpha, "reset GradientPreference policy");
    }

    fn state(&self) -> &PolicyState {
        &self.state
    }

    fn label(&self) -> String {
        format!(
            "GradientPreference (alpha={}, initial_preference={})",
            self.alpha, self.initial_preference
        )
    }
}
