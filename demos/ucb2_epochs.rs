//! Watch UCB2 lock onto arms for whole epochs.

use banditry::prelude::*;
use rand::SeedableRng;

fn main() {
    let arms = [
        BinomialArm::new(10, 0.3).unwrap(),
        BinomialArm::new(10, 0.5).unwrap(),
        BinomialArm::new(10, 0.45).unwrap(),
    ];
    let mut policy = Ucb2::new(arms.len(), 0.5).unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);

    println!("UCB2 (alpha=0.5) over {} Binomial arms\n", arms.len());
    println!("{:>5} {:>4} {:>7} {:>8}  epochs", "step", "arm", "reward", "repeats");

    for step in 1..=60 {
        let arm = policy.select_arm(&mut rng);
        // Arm means are scaled to [0, 1] so the confidence bonus stays comparable
        let reward = arms[arm].pull(&mut rng) / 10.0;
        policy.update(arm, reward).unwrap();

        println!(
            "{:>5} {:>4} {:>7.2} {:>8}  {:?}",
            step,
            arm,
            reward,
            policy.remaining_repeats(),
            policy.epochs()
        );
    }

    println!("\nFinal counts: {:?}", policy.counts());
    println!("Final means:  {:?}", policy.values());
}
