//! Reward sources behind the arms of a bandit.
//!
//! Policies never see these types: they only receive the scalar reward an arm
//! produced. The expected value is used offline, by the experiment driver, to
//! find the optimal arm and measure regret.

use std::collections::HashSet;
use std::fmt;

use ordered_float::OrderedFloat;
use rand::Rng;
use rand::distr::{Bernoulli, Distribution};
use rand_distr::Binomial;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BanditError, Result};

/// Something that can be pulled for a stochastic reward.
pub trait RewardSource: fmt::Debug + fmt::Display + Send + Sync {
    /// Draw one reward.
    fn pull(&self, rng: &mut dyn rand::RngCore) -> f64;

    /// True mean reward of this source.
    fn expected_value(&self) -> f64;
}

/// Arm paying 1 with probability `p` and 0 otherwise.
///
/// # Examples
///
/// ```
/// use banditry::arm::{BernoulliArm, RewardSource};
///
/// let arm = BernoulliArm::new(0.25).unwrap();
/// assert_eq!(arm.expected_value(), 0.25);
/// assert_eq!(arm.to_string(), "BernoulliArm(p=0.25)");
/// ```
#[derive(Clone, Debug)]
pub struct BernoulliArm {
    p: f64,
    dist: Bernoulli,
}

impl BernoulliArm {
    /// Creates an arm with success probability `p` in `[0, 1]`.
    pub fn new(p: f64) -> Result<Self> {
        let dist = Bernoulli::new(p).map_err(|_| {
            BanditError::invalid(format!("probability p must be in [0, 1], got {p}"))
        })?;
        debug!(p, "created Bernoulli arm");
        Ok(Self { p, dist })
    }

    /// Success probability.
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Generates `k` arms with distinct success probabilities.
    ///
    /// Probabilities are drawn uniformly from `[0.1, 0.9)` and rounded to two
    /// decimals, so every value lies in `0.10..=0.90`. This avoids
    /// near-certain outcomes.
    pub fn generate(k: usize, rng: &mut dyn rand::RngCore) -> Result<Vec<Self>> {
        distinct_probabilities(k, rng)?
            .into_iter()
            .map(Self::new)
            .collect()
    }
}

impl RewardSource for BernoulliArm {
    fn pull(&self, rng: &mut dyn rand::RngCore) -> f64 {
        if self.dist.sample(rng) { 1.0 } else { 0.0 }
    }

    fn expected_value(&self) -> f64 {
        self.p
    }
}

impl fmt::Display for BernoulliArm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BernoulliArm(p={})", self.p)
    }
}

/// Arm paying the number of successes in `n` trials of probability `p`.
#[derive(Clone, Debug)]
pub struct BinomialArm {
    n: u64,
    p: f64,
    dist: Binomial,
}

impl BinomialArm {
    /// Creates an arm with `n > 0` trials of success probability `p` in `[0, 1]`.
    pub fn new(n: u64, p: f64) -> Result<Self> {
        if n == 0 {
            return Err(BanditError::invalid("number of trials n must be positive"));
        }
        let dist = Binomial::new(n, p).map_err(|_| {
            BanditError::invalid(format!("probability p must be in [0, 1], got {p}"))
        })?;
        debug!(n, p, "created Binomial arm");
        Ok(Self { n, p, dist })
    }

    /// Number of trials per pull.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Success probability of each trial.
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Generates `k` arms of `n` trials with distinct success probabilities.
    pub fn generate(k: usize, n: u64, rng: &mut dyn rand::RngCore) -> Result<Vec<Self>> {
        distinct_probabilities(k, rng)?
            .into_iter()
            .map(|p| Self::new(n, p))
            .collect()
    }
}

impl RewardSource for BinomialArm {
    fn pull(&self, rng: &mut dyn rand::RngCore) -> f64 {
        self.dist.sample(rng) as f64
    }

    fn expected_value(&self) -> f64 {
        self.n as f64 * self.p
    }
}

impl fmt::Display for BinomialArm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinomialArm(n={}, p={})", self.n, self.p)
    }
}

/// Serializable description of a reward source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArmConfig {
    Bernoulli { p: f64 },
    Binomial { n: u64, p: f64 },
}

impl ArmConfig {
    /// Validates the parameters and builds the arm.
    pub fn build(&self) -> Result<Box<dyn RewardSource>> {
        let arm: Box<dyn RewardSource> = match *self {
            ArmConfig::Bernoulli { p } => Box::new(BernoulliArm::new(p)?),
            ArmConfig::Binomial { n, p } => Box::new(BinomialArm::new(n, p)?),
        };
        Ok(arm)
    }
}

/// Largest `k` for which distinct two-decimal probabilities can be drawn:
/// one arm for each of 0.10, 0.11, ..., 0.90.
pub const MAX_GENERATED_ARMS: usize = 81;

fn distinct_probabilities(k: usize, rng: &mut dyn rand::RngCore) -> Result<Vec<f64>> {
    if k == 0 {
        return Err(BanditError::invalid("number of arms k must be positive"));
    }
    if k > MAX_GENERATED_ARMS {
        return Err(BanditError::invalid(format!(
            "cannot generate more than {MAX_GENERATED_ARMS} distinct arms, got {k}"
        )));
    }

    let mut seen = HashSet::with_capacity(k);
    let mut probabilities = Vec::with_capacity(k);
    while probabilities.len() < k {
        let p = (rng.random_range(0.1..0.9) * 100.0_f64).round() / 100.0;
        if seen.insert(OrderedFloat(p)) {
            probabilities.push(p);
        }
    }
    debug!(k, ?probabilities, "generated arm probabilities");
    Ok(probabilities)
}

/// Index of the arm with the largest expected value, ties broken by lowest index.
///
/// Returns `None` for an empty slice.
pub fn optimal_arm<S: AsRef<dyn RewardSource>>(arms: &[S]) -> Option<usize> {
    arms.iter()
        .map(|arm| OrderedFloat(arm.as_ref().expected_value()))
        .enumerate()
        .rev()
        .max_by_key(|&(_, value)| value)
        .map(|(index, _)| index)
}
