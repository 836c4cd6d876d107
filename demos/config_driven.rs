//! Build an experiment from a JSON description.

use banditry::prelude::*;
use serde::Deserialize;

#[derive(Deserialize)]
struct Setup {
    steps: usize,
    runs: usize,
    seed: u64,
    arms: Vec<ArmConfig>,
    policies: Vec<PolicyConfig>,
}

const SETUP: &str = r#"{
    "steps": 500,
    "runs": 100,
    "seed": 3,
    "arms": [
        {"kind": "bernoulli", "p": 0.35},
        {"kind": "bernoulli", "p": 0.55},
        {"kind": "bernoulli", "p": 0.6}
    ],
    "policies": [
        {"policy": "ucb1"},
        {"policy": "ucb2", "alpha": 0.3},
        {"policy": "softmax", "tau": 0.05},
        {"policy": "gradient_preference", "alpha": 0.2, "initial_preference": 0.0}
    ]
}"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let setup: Setup = serde_json::from_str(SETUP).expect("setup is valid JSON");

    let mut builder = Experiment::builder()
        .steps(setup.steps)
        .runs(setup.runs)
        .seed(setup.seed)
        .arms(
            setup
                .arms
                .iter()
                .map(ArmConfig::build)
                .collect::<Result<Vec<_>>>()?,
        );
    for config in setup.policies {
        builder = builder.policy_config(config);
    }

    let report = builder.build()?.run_seeded()?;
    println!("{}", serde_json::to_string_pretty(&report).expect("report serializes"));
    Ok(())
}
