use tracing::debug;

use crate::error::{BanditError, Result};
use crate::policy::Policy;
use crate::sampling::{sample_categorical, softmax};
use crate::state::PolicyState;

/// Softmax (Boltzmann) exploration over mean reward estimates
///
/// Arm `a` is drawn with probability proportional to `exp(mean[a] / tau)`.
/// Low temperatures approach greedy selection, high temperatures approach
/// uniform random selection.
#[derive(Clone, Debug)]
pub struct Softmax {
    tau: f64,
    state: PolicyState,
    /// Always `softmax(mean / tau)` for the current estimates
    probabilities: Vec<f64>,
}

impl Softmax {
    /// Creates a new Softmax policy over `k` arms with temperature `tau`
    pub fn new(k: usize, tau: f64) -> Result<Self> {
        if !(tau.is_finite() && tau > 0.0) {
            return Err(BanditError::invalid(format!(
                "tau must be positive, got {tau}"
            )));
        }
        let state = PolicyState::new(k, 0.0)?;
        debug!(k, tau, "created Softmax policy");
        Ok(Self {
            tau,
            state,
            probabilities: vec![1.0 / k as f64; k],
        })
    }

    /// Gets the temperature
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Current selection probability of every arm
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }
}

impl Policy for Softmax {
    fn select_arm(&mut self, rng: &mut dyn rand::RngCore) -> usize {
        sample_categorical(&self.probabilities, rng)
    }

    fn update(&mut self, arm: usize, reward: f64) -> Result<()> {
        self.state.record_mean(arm, reward)?;
        self.probabilities = softmax(self.state.values(), self.tau);
        Ok(())
    }

    fn reset(&mut self) {
        self.state.reset();
        let k = self.state.k();
        self.probabilities = vec![1.0 / k as f64; k];
        debug!(k, tau = self.tau, "reset Softmax policy");
    }

    fn state(&self) -> &PolicyState {
        &self.state
    }

    fn label(&self) -> String {
        format!("Softmax (tau={})", self.tau)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;

    #[test]
    fn test_softmax_rejects_bad_tau() {
        assert!(matches!(
            Softmax::new(3, 0.0),
            Err(BanditError::InvalidParameter { .. })
        ));
        assert!(Softmax::new(3, -1.0).is_err());
        assert!(Softmax::new(3, f64::INFINITY).is_err());
    }

    #[test]
    fn test_softmax_starts_uniform() {
        let policy = Softmax::new(4, 0.5).unwrap();
        for &p in policy.probabilities() {
            assert_abs_diff_eq!(p, 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_softmax_probabilities_follow_means() {
        let mut policy = Softmax::new(2, 0.5).unwrap();
        policy.update(0, 1.0).unwrap();
        policy.update(1, 0.0).unwrap();

        let p = policy.probabilities();
        let expected = 2f64.exp() / (2f64.exp() + 1.0);
        assert_abs_diff_eq!(p[0], expected, epsilon = 1e-12);
        assert_abs_diff_eq!(p[0] + p[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_softmax_tiny_temperature_keeps_every_arm_reachable() {
        let mut policy = Softmax::new(2, 0.001).unwrap();
        policy.update(0, 1.0).unwrap();
        policy.update(1, 0.0).unwrap();

        let p = policy.probabilities();
        assert!(p.iter().all(|&x| x > 0.0 && x <= 1.0), "{p:?}");
        assert_abs_diff_eq!(p[0] + p[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_softmax_update_out_of_range_keeps_probabilities() {
        let mut policy = Softmax::new(2, 0.5).unwrap();
        policy.update(0, 1.0).unwrap();
        let before = policy.probabilities().to_vec();
        assert!(policy.update(2, 1.0).is_err());
        assert_eq!(policy.probabilities(), before.as_slice());
    }

    #[test]
    fn test_softmax_low_temperature_exploits() {
        let mut policy = Softmax::new(3, 0.01).unwrap();
        crate::policy::fit(&mut policy, &[0, 1, 2], &[0.2, 0.9, 0.4]).unwrap();

        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(policy.select_arm(&mut rng), 1);
        }
    }

    #[test]
    fn test_softmax_incremental_mean() {
        let mut policy = Softmax::new(2, 1.0).unwrap();
        for reward in [3.0, 1.0, 2.0, 6.0] {
            policy.update(1, reward).unwrap();
        }
        assert_eq!(policy.counts(), &[0, 4]);
        assert_abs_diff_eq!(policy.values()[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_softmax_reset() {
        let mut policy = Softmax::new(2, 0.2).unwrap();
        policy.update(0, 1.0).unwrap();
        policy.reset();
        assert_eq!(policy.counts(), &[0, 0]);
        assert_eq!(policy.values(), &[0.0, 0.0]);
        assert_eq!(policy.probabilities(), &[0.5, 0.5]);
        assert_eq!(policy.tau(), 0.2);
        assert_eq!(policy.label(), "Softmax (tau=0.2)");
    }
}
