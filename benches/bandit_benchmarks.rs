use banditry::prelude::*;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use std::hint::black_box;

fn trained(config: &PolicyConfig, k: usize) -> Box<dyn Policy> {
    let mut policy = config.build(k).unwrap();
    let decisions: Vec<usize> = (0..1000).map(|i| i % k).collect();
    let rewards: Vec<f64> = (0..1000).map(|i| (i % 7) as f64 / 7.0).collect();
    fit(&mut policy, &decisions, &rewards).unwrap();
    policy
}

fn configs() -> [(&'static str, PolicyConfig); 5] {
    [
        ("epsilon_greedy", PolicyConfig::EpsilonGreedy { epsilon: 0.1 }),
        ("softmax", PolicyConfig::Softmax { tau: 0.2 }),
        ("ucb1", PolicyConfig::Ucb1),
        ("ucb2", PolicyConfig::Ucb2 { alpha: 0.5 }),
        (
            "gradient",
            PolicyConfig::GradientPreference {
                alpha: 0.1,
                initial_preference: 0.0,
            },
        ),
    ]
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_arm");

    for n_arms in [10, 100, 1000].iter() {
        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, n_arms), n_arms, |b, &n| {
                let mut policy = trained(&config, n);
                let mut rng = rand::rngs::StdRng::seed_from_u64(42);

                b.iter(|| black_box(policy.select_arm(&mut rng)));
            });
        }
    }

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for n_arms in [10, 100, 1000].iter() {
        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, n_arms), n_arms, |b, &n| {
                let mut policy = trained(&config, n);
                let mut arm = 0;

                b.iter(|| {
                    arm = (arm + 1) % n;
                    black_box(policy.update(arm, 0.5).unwrap())
                });
            });
        }
    }

    group.finish();
}

fn bench_experiment(c: &mut Criterion) {
    c.bench_function("experiment_10_arms_1000_steps", |b| {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let arms = BernoulliArm::generate(10, &mut rng).unwrap();

        b.iter_batched(
            || {
                let mut builder = Experiment::builder().steps(1000).runs(1).seed(1);
                for arm in arms.clone() {
                    builder = builder.arm(arm);
                }
                for (_, config) in configs() {
                    builder = builder.policy_config(config);
                }
                builder.build().unwrap()
            },
            |mut experiment| black_box(experiment.run_seeded().unwrap()),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_select, bench_update, bench_experiment);
criterion_main!(benches);
