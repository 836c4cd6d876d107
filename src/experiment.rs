//! Monte Carlo comparison of policies over a fixed set of arms.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::arm::{RewardSource, optimal_arm};
use crate::config::PolicyConfig;
use crate::error::{BanditError, Result};
use crate::policies::Policy;

/// Runs several policies side by side against the same arms
///
/// Each run resets every policy, then plays `steps` rounds. In every round each
/// policy selects an arm, the arm is pulled, and the policy is updated with the
/// reward. Policies never share state; they only share the arms and the random
/// source.
#[derive(Debug)]
pub struct Experiment {
    arms: Vec<Box<dyn RewardSource>>,
    policies: Vec<Box<dyn Policy>>,
    steps: usize,
    runs: usize,
    seed: Option<u64>,
    optimal_arm: usize,
}

/// Per-step and per-arm averages for one policy
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolicyReport {
    /// Policy label, e.g. `UCB2 (alpha=0.5)`
    pub label: String,
    /// Mean reward at each step, over runs
    pub average_rewards: Vec<f64>,
    /// Fraction of runs that picked the optimal arm at each step
    pub optimal_selections: Vec<f64>,
    /// Expected regret accumulated up to each step, averaged over runs
    pub cumulative_regret: Vec<f64>,
    /// Mean number of pulls of each arm per run
    pub arm_counts: Vec<f64>,
    /// Mean observed reward of each arm, 0 for arms never pulled
    pub arm_average_rewards: Vec<f64>,
}

impl PolicyReport {
    /// Mean reward per step over the whole horizon
    pub fn mean_reward(&self) -> f64 {
        if self.average_rewards.is_empty() {
            0.0
        } else {
            self.average_rewards.iter().sum::<f64>() / self.average_rewards.len() as f64
        }
    }

    /// Expected regret after the last step
    pub fn total_regret(&self) -> f64 {
        self.cumulative_regret.last().copied().unwrap_or(0.0)
    }
}

/// Outcome of [`Experiment::run`]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub steps: usize,
    pub runs: usize,
    pub optimal_arm: usize,
    pub policies: Vec<PolicyReport>,
}

#[derive(Clone, Debug)]
struct Accumulator {
    reward_sums: Vec<f64>,
    optimal_hits: Vec<u64>,
    regret_sums: Vec<f64>,
    arm_pulls: Vec<u64>,
    arm_reward_sums: Vec<f64>,
}

impl Accumulator {
    fn new(steps: usize, k: usize) -> Self {
        Self {
            reward_sums: vec![0.0; steps],
            optimal_hits: vec![0; steps],
            regret_sums: vec![0.0; steps],
            arm_pulls: vec![0; k],
            arm_reward_sums: vec![0.0; k],
        }
    }

    fn finish(self, label: String, runs: usize) -> PolicyReport {
        let runs = runs as f64;
        let cumulative_regret = self
            .regret_sums
            .iter()
            .scan(0.0, |total, regret| {
                *total += regret / runs;
                Some(*total)
            })
            .collect();
        let arm_average_rewards = self
            .arm_reward_sums
            .iter()
            .zip(&self.arm_pulls)
            .map(|(&sum, &pulls)| if pulls == 0 { 0.0 } else { sum / pulls as f64 })
            .collect();

        PolicyReport {
            label,
            average_rewards: self.reward_sums.iter().map(|r| r / runs).collect(),
            optimal_selections: self.optimal_hits.iter().map(|&h| h as f64 / runs).collect(),
            cumulative_regret,
            arm_counts: self.arm_pulls.iter().map(|&n| n as f64 / runs).collect(),
            arm_average_rewards,
        }
    }
}

impl Experiment {
    /// Create a new builder for constructing an experiment
    pub fn builder() -> ExperimentBuilder {
        ExperimentBuilder::default()
    }

    /// Gets the arms
    pub fn arms(&self) -> &[Box<dyn RewardSource>] {
        &self.arms
    }

    /// Gets the policies being compared
    pub fn policies(&self) -> &[Box<dyn Policy>] {
        &self.policies
    }

    /// Index of the arm with the highest expected value
    pub fn optimal_arm(&self) -> usize {
        self.optimal_arm
    }

    /// Steps per run
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of independent runs
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Run with a generator seeded from the configured seed
    ///
    /// Without a configured seed the generator is seeded from the OS.
    pub fn run_seeded(&mut self) -> Result<ExperimentReport> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.run(&mut rng)
    }

    /// Run every policy for `runs` independent runs of `steps` steps
    pub fn run(&mut self, rng: &mut dyn rand::RngCore) -> Result<ExperimentReport> {
        let k = self.arms.len();
        let best_value = self.arms[self.optimal_arm].expected_value();
        let expected: Vec<f64> = self.arms.iter().map(|a| a.expected_value()).collect();
        let mut stats = vec![Accumulator::new(self.steps, k); self.policies.len()];

        info!(
            arms = k,
            policies = self.policies.len(),
            steps = self.steps,
            runs = self.runs,
            optimal_arm = self.optimal_arm,
            "starting experiment"
        );

        for run in 0..self.runs {
            for policy in &mut self.policies {
                policy.reset();
            }

            for step in 0..self.steps {
                for (policy, acc) in self.policies.iter_mut().zip(&mut stats) {
                    let arm = policy.select_arm(rng);
                    let reward = self
                        .arms
                        .get(arm)
                        .ok_or(BanditError::ArmOutOfRange { arm, k })?
                        .pull(rng);
                    policy.update(arm, reward)?;

                    acc.reward_sums[step] += reward;
                    acc.regret_sums[step] += best_value - expected[arm];
                    if arm == self.optimal_arm {
                        acc.optimal_hits[step] += 1;
                    }
                    acc.arm_pulls[arm] += 1;
                    acc.arm_reward_sums[arm] += reward;
                }
            }

            debug!(run, "finished run");
        }

        let policies: Vec<PolicyReport> = self
            .policies
            .iter()
            .zip(stats)
            .map(|(policy, acc)| acc.finish(policy.label(), self.runs))
            .collect();

        for report in &policies {
            info!(
                policy = %report.label,
                mean_reward = report.mean_reward(),
                total_regret = report.total_regret(),
                "policy finished"
            );
        }

        Ok(ExperimentReport {
            steps: self.steps,
            runs: self.runs,
            optimal_arm: self.optimal_arm,
            policies,
        })
    }
}

/// Builder for creating experiments with a fluent API
#[derive(Default)]
pub struct ExperimentBuilder {
    arms: Option<Vec<Box<dyn RewardSource>>>,
    policies: Vec<Box<dyn Policy>>,
    configs: Vec<PolicyConfig>,
    steps: Option<usize>,
    runs: Option<usize>,
    seed: Option<u64>,
}

impl ExperimentBuilder {
    /// Set the arms for the experiment
    pub fn arms<I>(mut self, arms: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn RewardSource>>,
    {
        self.arms = Some(arms.into_iter().collect());
        self
    }

    /// Add one arm
    pub fn arm<S: RewardSource + 'static>(mut self, arm: S) -> Self {
        self.arms.get_or_insert_with(Vec::new).push(Box::new(arm));
        self
    }

    /// Add an already constructed policy
    pub fn policy<P: Policy + 'static>(mut self, policy: P) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    /// Add a policy described by configuration, built once the arm count is known
    pub fn policy_config(mut self, config: PolicyConfig) -> Self {
        self.configs.push(config);
        self
    }

    /// Number of steps in each run
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Number of independent runs, defaults to 1
    pub fn runs(mut self, runs: usize) -> Self {
        self.runs = Some(runs);
        self
    }

    /// Seed used by [`Experiment::run_seeded`]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the experiment
    pub fn build(self) -> Result<Experiment> {
        let arms = self.arms.ok_or(BanditError::BuilderError {
            message: "Arms not specified".into(),
        })?;
        let optimal_arm = optimal_arm(&arms).ok_or(BanditError::NoArmsAvailable)?;
        let k = arms.len();

        let steps = self.steps.ok_or(BanditError::BuilderError {
            message: "Steps not specified".into(),
        })?;
        if steps == 0 {
            return Err(BanditError::invalid("steps must be positive"));
        }
        let runs = self.runs.unwrap_or(1);
        if runs == 0 {
            return Err(BanditError::invalid("runs must be positive"));
        }

        let mut policies = self.policies;
        for config in &self.configs {
            policies.push(config.build(k)?);
        }
        if policies.is_empty() {
            return Err(BanditError::BuilderError {
                message: "Policy not specified".into(),
            });
        }
        if let Some(policy) = policies.iter().find(|p| p.k() != k) {
            return Err(BanditError::DimensionMismatch {
                message: format!(
                    "policy {} expects {} arms, experiment has {k}",
                    policy.label(),
                    policy.k()
                ),
            });
        }

        Ok(Experiment {
            arms,
            policies,
            steps,
            runs,
            seed: self.seed,
            optimal_arm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm::BernoulliArm;
    use crate::policies::{EpsilonGreedy, Ucb1};
    use approx::assert_abs_diff_eq;

    fn bernoulli(ps: &[f64]) -> Vec<Box<dyn RewardSource>> {
        ps.iter()
            .map(|&p| Box::new(BernoulliArm::new(p).unwrap()) as Box<dyn RewardSource>)
            .collect()
    }

    #[test]
    fn test_builder_requires_arms_steps_and_policies() {
        let missing_arms = Experiment::builder().steps(10).policy(Ucb1::new(2).unwrap()).build();
        assert!(matches!(missing_arms, Err(BanditError::BuilderError { .. })));

        let empty_arms = Experiment::builder()
            .arms(Vec::new())
            .steps(10)
            .policy(Ucb1::new(2).unwrap())
            .build();
        assert!(matches!(empty_arms, Err(BanditError::NoArmsAvailable)));

        let missing_steps = Experiment::builder()
            .arms(bernoulli(&[0.1, 0.2]))
            .policy(Ucb1::new(2).unwrap())
            .build();
        assert!(matches!(missing_steps, Err(BanditError::BuilderError { .. })));

        let no_policy = Experiment::builder().arms(bernoulli(&[0.1, 0.2])).steps(5).build();
        assert!(matches!(no_policy, Err(BanditError::BuilderError { .. })));

        let zero_steps = Experiment::builder()
            .arms(bernoulli(&[0.1, 0.2]))
            .policy(Ucb1::new(2).unwrap())
            .steps(0)
            .build();
        assert!(matches!(zero_steps, Err(BanditError::InvalidParameter { .. })));

        let zero_runs = Experiment::builder()
            .arms(bernoulli(&[0.1, 0.2]))
            .policy(Ucb1::new(2).unwrap())
            .steps(3)
            .runs(0)
            .build();
        assert!(matches!(zero_runs, Err(BanditError::InvalidParameter { .. })));
    }

    #[test]
    fn test_builder_rejects_mismatched_policy() {
        let result = Experiment::builder()
            .arms(bernoulli(&[0.1, 0.2, 0.3]))
            .policy(Ucb1::new(2).unwrap())
            .steps(5)
            .build();
        assert!(matches!(result, Err(BanditError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_report_shapes() {
        let mut experiment = Experiment::builder()
            .arms(bernoulli(&[0.2, 0.8, 0.5]))
            .policy(Ucb1::new(3).unwrap())
            .policy_config(PolicyConfig::Softmax { tau: 0.1 })
            .steps(50)
            .runs(4)
            .seed(42)
            .build()
            .unwrap();
        assert_eq!(experiment.optimal_arm(), 1);

        let report = experiment.run_seeded().unwrap();
        assert_eq!(report.policies.len(), 2);
        assert_eq!(report.optimal_arm, 1);
        for policy in &report.policies {
            assert_eq!(policy.average_rewards.len(), 50);
            assert_eq!(policy.optimal_selections.len(), 50);
            assert_eq!(policy.cumulative_regret.len(), 50);
            assert_abs_diff_eq!(policy.arm_counts.iter().sum::<f64>(), 50.0, epsilon = 1e-9);
            assert!(policy.optimal_selections.iter().all(|f| (0.0..=1.0).contains(f)));
            assert!(policy.cumulative_regret.windows(2).all(|w| w[1] >= w[0]));
        }
        assert_eq!(report.policies[1].label, "Softmax (tau=0.1)");
    }

    #[test]
    fn test_greedy_on_single_best_arm_has_no_regret() {
        // Deterministic arms: the pure greedy policy locks onto arm 0 immediately.
        let mut experiment = Experiment::builder()
            .arms(bernoulli(&[1.0, 0.0]))
            .policy(EpsilonGreedy::new(2, 0.0).unwrap())
            .steps(20)
            .runs(3)
            .seed(1)
            .build()
            .unwrap();

        let report = experiment.run_seeded().unwrap();
        let policy = &report.policies[0];
        assert_eq!(policy.total_regret(), 0.0);
        assert_eq!(policy.mean_reward(), 1.0);
        assert_eq!(policy.arm_counts, vec![20.0, 0.0]);
        assert_eq!(policy.arm_average_rewards, vec![1.0, 0.0]);
        assert!(policy.optimal_selections.iter().all(|&f| f == 1.0));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let build = || {
            Experiment::builder()
                .arms(bernoulli(&[0.3, 0.6]))
                .policy_config(PolicyConfig::GradientPreference {
                    alpha: 0.1,
                    initial_preference: 0.0,
                })
                .steps(30)
                .runs(2)
                .seed(7)
                .build()
                .unwrap()
        };
        let a = build().run_seeded().unwrap();
        let b = build().run_seeded().unwrap();
        assert_eq!(a, b);
    }
}
