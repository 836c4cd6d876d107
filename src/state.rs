//! Per-arm statistics shared by every selection policy.

use crate::error::{BanditError, Result};

/// Pull counts and value estimates for `k` arms.
///
/// Every policy owns exactly one `PolicyState`. What `values` means depends on
/// the policy: a running mean reward for the count-based policies, a softmax
/// preference for [`GradientPreference`](crate::policies::GradientPreference).
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyState {
    counts: Vec<u64>,
    values: Vec<f64>,
    initial_value: f64,
}

impl PolicyState {
    /// Creates state for `k` arms with every value set to `initial_value`.
    pub fn new(k: usize, initial_value: f64) -> Result<Self> {
        if k == 0 {
            return Err(BanditError::invalid("number of arms k must be positive"));
        }
        if !initial_value.is_finite() {
            return Err(BanditError::invalid(format!(
                "initial value must be finite, got {initial_value}"
            )));
        }
        Ok(Self {
            counts: vec![0; k],
            values: vec![initial_value; k],
            initial_value,
        })
    }

    /// Number of arms.
    pub fn k(&self) -> usize {
        self.counts.len()
    }

    /// Times each arm has been updated.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Current value estimate (or preference) of each arm.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Total number of updates across all arms.
    pub fn total_pulls(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Fails with [`BanditError::ArmOutOfRange`] unless `arm < k`.
    pub fn check_arm(&self, arm: usize) -> Result<()> {
        if arm < self.k() {
            Ok(())
        } else {
            Err(BanditError::ArmOutOfRange { arm, k: self.k() })
        }
    }

    /// Counts one pull of `arm` and folds `reward` into its running mean.
    pub(crate) fn record_mean(&mut self, arm: usize, reward: f64) -> Result<()> {
        self.check_arm(arm)?;
        self.counts[arm] += 1;
        let n = self.counts[arm] as f64;
        self.values[arm] += (reward - self.values[arm]) / n;
        Ok(())
    }

    /// Counts one pull of `arm` without touching its value.
    pub(crate) fn record_pull(&mut self, arm: usize) -> Result<()> {
        self.check_arm(arm)?;
        self.counts[arm] += 1;
        Ok(())
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Restores the post-construction state.
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.values.fill(self.initial_value);
    }
}

/// The arm to force while some arm has never been pulled.
///
/// Returns the lowest-index arm with the minimum count, or `None` once every
/// arm has at least one pull.
pub fn cold_start_arm(counts: &[u64]) -> Option<usize> {
    if !counts.contains(&0) {
        return None;
    }
    counts
        .iter()
        .enumerate()
        .min_by_key(|&(_, count)| *count)
        .map(|(arm, _)| arm)
}
