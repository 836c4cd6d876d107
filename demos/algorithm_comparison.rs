//! Compare every policy on the same randomly generated Bernoulli arms.
//!
//! Run with `RUST_LOG=banditry=info` to see the experiment progress.

use banditry::prelude::*;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Banditry: k-Armed Bandit Policy Comparison\n");
    println!("{}", "=".repeat(60));

    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let arms = BernoulliArm::generate(10, &mut rng).unwrap();

    println!("Arms:");
    for (i, arm) in arms.iter().enumerate() {
        println!("  {i}: {arm}");
    }

    let mut builder = Experiment::builder().steps(1000).runs(200).seed(42);
    for arm in arms {
        builder = builder.arm(arm);
    }
    let mut experiment = builder
        .policy_config(PolicyConfig::EpsilonGreedy { epsilon: 0.1 })
        .policy_config(PolicyConfig::Softmax { tau: 0.1 })
        .policy_config(PolicyConfig::Ucb1)
        .policy_config(PolicyConfig::Ucb2 { alpha: 0.5 })
        .policy_config(PolicyConfig::GradientPreference {
            alpha: 0.1,
            initial_preference: 0.0,
        })
        .build()
        .unwrap();

    println!("\nOptimal arm: {}\n", experiment.optimal_arm());
    println!("{}", "=".repeat(60));

    let report = experiment.run_seeded().unwrap();

    println!(
        "{:<55} {:>8} {:>9} {:>8}",
        "Policy", "Reward", "Optimal%", "Regret"
    );
    for policy in &report.policies {
        let final_optimal = policy.optimal_selections.last().copied().unwrap_or(0.0);
        println!(
            "{:<55} {:>8.3} {:>8.1}% {:>8.1}",
            policy.label,
            policy.mean_reward(),
            final_optimal * 100.0,
            policy.total_regret()
        );
    }

    println!("\nPulls per arm (mean over runs):");
    for policy in &report.policies {
        let counts: Vec<String> = policy.arm_counts.iter().map(|c| format!("{c:.0}")).collect();
        println!("  {}: [{}]", policy.label, counts.join(", "));
    }
}
