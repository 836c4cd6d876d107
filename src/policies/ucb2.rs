use std::f64::consts::E;

use tracing::{debug, trace};

use crate::error::{BanditError, Result};
use crate::policy::Policy;
use crate::sampling::argmax;
use crate::state::{PolicyState, cold_start_arm};

/// UCB2 policy with epoch-based repeated pulls
///
/// After the cold start each arm `a` carries an epoch `r_a`. A scored
/// selection picks the arm maximizing
///
/// ```text
/// mean[a] + sqrt((1 + alpha) * ln(e * t / tau(r_a)) / (2 * tau(r_a)))
/// ```
///
/// with `tau(r) = ceil((1 + alpha)^r)`, advances that arm's epoch, and locks it
/// in for `tau(r_a) - 1` further selections that skip scoring entirely.
#[derive(Clone, Debug)]
pub struct Ucb2 {
    alpha: f64,
    state: PolicyState,
    epochs: Vec<u32>,
    /// Number of `select_arm` calls, cold start included
    total_steps: u64,
    remaining_repeats: u64,
    locked_arm: Option<usize>,
}

impl Ucb2 {
    /// Creates a new UCB2 policy over `k` arms
    ///
    /// # Arguments
    /// * `k` - Number of arms
    /// * `alpha` - Epoch growth rate, must be positive. Small values give short
    ///   epochs and behave close to UCB1.
    pub fn new(k: usize, alpha: f64) -> Result<Self> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(BanditError::invalid(format!(
                "alpha must be positive, got {alpha}"
            )));
        }
        let state = PolicyState::new(k, 0.0)?;
        debug!(k, alpha, "created UCB2 policy");
        Ok(Self {
            alpha,
            state,
            epochs: vec![0; k],
            total_steps: 0,
            remaining_repeats: 0,
            locked_arm: None,
        })
    }

    /// Gets the epoch growth rate
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current epoch of every arm
    pub fn epochs(&self) -> &[u32] {
        &self.epochs
    }

    /// Arm currently being replayed, if any
    pub fn locked_arm(&self) -> Option<usize> {
        self.locked_arm
    }

    /// Forced selections left before the next scored selection
    pub fn remaining_repeats(&self) -> u64 {
        self.remaining_repeats
    }

    /// Gets the number of selections made so far
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Length of epoch `r`: `ceil((1 + alpha)^r)`
    pub fn tau(&self, epoch: u32) -> u64 {
        // Saturates at u64::MAX once the power overflows.
        (1.0 + self.alpha).powf(f64::from(epoch)).ceil() as u64
    }

    /// Current UCB2 score of every arm
    pub fn scores(&self) -> Vec<f64> {
        let t = self.total_steps.max(1) as f64;
        self.state
            .values()
            .iter()
            .zip(&self.epochs)
            .map(|(&mean, &epoch)| {
                let tau = self.tau(epoch) as f64;
                let bonus = ((1.0 + self.alpha) * (E * t / tau).ln() / (2.0 * tau)).sqrt();
                mean + bonus
            })
            .collect()
    }
}

impl Policy for Ucb2 {
    fn select_arm(&mut self, _rng: &mut dyn rand::RngCore) -> usize {
        self.total_steps += 1;

        if let Some(arm) = cold_start_arm(self.state.counts()) {
            trace!(arm, step = self.total_steps, "UCB2 cold start");
            return arm;
        }

        if let Some(arm) = self.locked_arm.filter(|_| self.remaining_repeats > 0) {
            self.remaining_repeats -= 1;
            trace!(arm, remaining = self.remaining_repeats, "UCB2 repeat");
            return arm;
        }

        let arm = argmax(&self.scores());
        self.epochs[arm] += 1;
        self.locked_arm = Some(arm);
        self.remaining_repeats = self.tau(self.epochs[arm]).saturating_sub(1);
        trace!(
            arm,
            epoch = self.epochs[arm],
            repeats = self.remaining_repeats,
            "UCB2 locked arm"
        );
        arm
    }

    fn update(&mut self, arm: usize, reward: f64) -> Result<()> {
        self.state.record_mean(arm, reward)
    }

    fn reset(&mut self) {
        self.state.reset();
        self.epochs.fill(0);
        self.total_steps = 0;
        self.remaining_repeats = 0;
        self.locked_arm = None;
        debug!(k = self.state.k(), alpha = self.alpha, "reset UCB2 policy");
    }

    fn state(&self) -> &PolicyState {
        &self.state
    }

    fn label(&self) -> String {
        format!("UCB2 (alpha={})", self.alpha)
    }
}
