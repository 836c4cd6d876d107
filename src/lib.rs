//! Banditry: selection policies for the stochastic k-armed bandit problem.
//!
//! Each policy chooses an arm index from its accumulated statistics, observes
//! the reward, and revises those statistics. Five policies are provided:
//! epsilon-greedy, softmax, UCB1, UCB2 and the gradient (preference) bandit.
//! An [`Experiment`] driver compares them over simulated Bernoulli or
//! Binomial arms and reports average reward, optimal-arm rate and regret.
//!
//! Randomness is always injected as `&mut dyn rand::RngCore`, so seeding a
//! generator makes every run reproducible.
//!
//! # Quick Start
//!
//! ```
//! use banditry::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut policy = Ucb1::new(3).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! // Every arm is tried once before scoring kicks in
//! for reward in [1.0, 0.0, 0.0] {
//!     let arm = policy.select_arm(&mut rng);
//!     policy.update(arm, reward).unwrap();
//! }
//! assert_eq!(policy.select_arm(&mut rng), 0);
//! ```
//!
//! Comparing policies:
//!
//! ```
//! use banditry::prelude::*;
//!
//! let mut experiment = Experiment::builder()
//!     .arm(BernoulliArm::new(0.2).unwrap())
//!     .arm(BernoulliArm::new(0.7).unwrap())
//!     .policy_config(PolicyConfig::Ucb2 { alpha: 0.5 })
//!     .policy_config(PolicyConfig::Softmax { tau: 0.1 })
//!     .steps(100)
//!     .runs(10)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let report = experiment.run_seeded().unwrap();
//! assert_eq!(report.optimal_arm, 1);
//! assert_eq!(report.policies[0].average_rewards.len(), 100);
//! ```

pub mod arm;
mod config;
mod error;
pub mod experiment;
pub mod policies;
mod policy;
mod sampling;
pub mod state;

// Re-export main types
pub use config::PolicyConfig;
pub use error::{BanditError, Result};
pub use experiment::{Experiment, ExperimentBuilder, ExperimentReport, PolicyReport};
pub use policy::{Policy, fit};
pub use state::PolicyState;

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use banditry::prelude::*;
/// ```
pub mod prelude {
    pub use crate::arm::{ArmConfig, BernoulliArm, BinomialArm, RewardSource};
    pub use crate::policies::{
        EpsilonGreedy, GradientPreference, Policy, Softmax, Ucb1, Ucb2,
    };
    pub use crate::{BanditError, Experiment, PolicyConfig, PolicyState, Result, fit};
}
