//! Declarative policy configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policies::{EpsilonGreedy, GradientPreference, Policy, Softmax, Ucb1, Ucb2};

/// A policy and its hyperparameters, independent of the number of arms.
///
/// Deserializes from an internally tagged representation, so experiment setups
/// can be written as data:
///
/// ```
/// use banditry::PolicyConfig;
///
/// let config: PolicyConfig = serde_json::from_str(r#"{"policy": "ucb2", "alpha": 0.5}"#).unwrap();
/// let policy = config.build(4).unwrap();
/// assert_eq!(policy.label(), "UCB2 (alpha=0.5)");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PolicyConfig {
    EpsilonGreedy {
        epsilon: f64,
    },
    Softmax {
        tau: f64,
    },
    Ucb1,
    Ucb2 {
        alpha: f64,
    },
    GradientPreference {
        alpha: f64,
        #[serde(default)]
        initial_preference: f64,
    },
}

impl PolicyConfig {
    /// Builds a fresh policy over `k` arms, validating every parameter.
    pub fn build(&self, k: usize) -> Result<Box<dyn Policy>> {
        let policy: Box<dyn Policy> = match *self {
            PolicyConfig::EpsilonGreedy { epsilon } => Box::new(EpsilonGreedy::new(k, epsilon)?),
            PolicyConfig::Softmax { tau } => Box::new(Softmax::new(k, tau)?),
            PolicyConfig::Ucb1 => Box::new(Ucb1::new(k)?),
            PolicyConfig::Ucb2 { alpha } => Box::new(Ucb2::new(k, alpha)?),
            PolicyConfig::GradientPreference {
                alpha,
                initial_preference,
            } => Box::new(GradientPreference::new(k, alpha, initial_preference)?),
        };
        Ok(policy)
    }
}
