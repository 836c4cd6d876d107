//! Policy trait definition for k-armed bandit algorithms

use std::fmt;

use crate::error::{BanditError, Result};
use crate::state::PolicyState;

/// Common interface of every selection policy.
///
/// A policy picks an arm index in `[0, k)`, observes the reward that arm
/// produced, and revises its statistics. Arms are plain indices; the reward
/// sources behind them live outside the policy.
///
/// The trait takes `dyn rand::RngCore` instead of a generic parameter so it
/// stays object-safe and policies can be held as `Box<dyn Policy>`.
pub trait Policy: fmt::Debug + Send + Sync {
    /// Choose the next arm to pull
    ///
    /// Deterministic policies ignore `rng`. Some policies keep bookkeeping that
    /// advances at selection time (step counters, UCB2 epochs), which is why
    /// this takes `&mut self`; the pull counts only change in [`update`].
    ///
    /// [`update`]: Policy::update
    fn select_arm(&mut self, rng: &mut dyn rand::RngCore) -> usize;

    /// Record the reward observed after pulling `arm`
    ///
    /// Fails with [`BanditError::ArmOutOfRange`] when `arm >= k`, in which case
    /// nothing is modified.
    fn update(&mut self, arm: usize, reward: f64) -> Result<()>;

    /// Restore the state right after construction, keeping hyperparameters
    fn reset(&mut self);

    /// Read-only view of counts and values
    fn state(&self) -> &PolicyState;

    /// Human readable name including hyperparameters
    fn label(&self) -> String;

    /// Number of arms
    fn k(&self) -> usize {
        self.state().k()
    }

    /// Pull counts per arm
    fn counts(&self) -> &[u64] {
        self.state().counts()
    }

    /// Value estimates (or preferences) per arm
    fn values(&self) -> &[f64] {
        self.state().values()
    }
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn select_arm(&mut self, rng: &mut dyn rand::RngCore) -> usize {
        (**self).select_arm(rng)
    }

    fn update(&mut self, arm: usize, reward: f64) -> Result<()> {
        (**self).update(arm, reward)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn state(&self) -> &PolicyState {
        (**self).state()
    }

    fn label(&self) -> String {
        (**self).label()
    }
}

/// Fit a policy on historical data (batch update)
///
/// Every decision is validated before the first update, so a failing batch
/// leaves the policy untouched.
pub fn fit<P: Policy + ?Sized>(policy: &mut P, decisions: &[usize], rewards: &[f64]) -> Result<()> {
    if decisions.len() != rewards.len() {
        return Err(BanditError::DimensionMismatch {
            message: format!(
                "Mismatched dimensions: decisions={}, rewards={}",
                decisions.len(),
                rewards.len()
            ),
        });
    }

    for &decision in decisions {
        policy.state().check_arm(decision)?;
    }

    for (&decision, &reward) in decisions.iter().zip(rewards) {
        policy.update(decision, reward)?;
    }
    Ok(())
}
