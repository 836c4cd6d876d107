//! Numeric helpers shared by the policies: argmax, softmax and categorical draws.

use rand::Rng;

/// Index of the largest score, ties broken by lowest index.
///
/// NaN scores never win.
pub(crate) fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (arm, &score) in scores.iter().enumerate() {
        if score > best_score {
            best = arm;
            best_score = score;
        }
    }
    best
}

/// Softmax of `values / temperature`, shifted by the maximum before
/// exponentiating so large values cannot overflow.
///
/// Weights are floored at `f64::MIN_POSITIVE`, so every arm keeps a strictly
/// positive probability even when its weight underflows.
pub(crate) fn softmax(values: &[f64], temperature: f64) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut weights: Vec<f64> = values
        .iter()
        .map(|v| ((v - max) / temperature).exp().max(f64::MIN_POSITIVE))
        .collect();
    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    weights
}

/// Draws an index from a normalized probability vector by inverting its CDF
/// with a single uniform sample.
pub(crate) fn sample_categorical(probabilities: &[f64], rng: &mut dyn rand::RngCore) -> usize {
    let u: f64 = rng.random();
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (arm, &p) in probabilities.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_positive = arm;
        if u < cumulative {
            return arm;
        }
    }
    // Rounding can leave the cumulative sum a hair below 1.
    last_positive
}
