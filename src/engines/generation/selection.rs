use crate::error::{PivotgenError, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Turn raw fitness into a selection distribution.
///
/// A negative minimum shifts every value up by twice its magnitude, then the
/// values are divided by their sum. When nothing positive remains (all zero,
/// or non-finite input) the distribution falls back to uniform.
pub fn fitness_to_probabilities(fitness: &[f64]) -> Vec<f64> {
    if fitness.is_empty() {
        return Vec::new();
    }

    let uniform = vec![1.0 / fitness.len() as f64; fitness.len()];
    if fitness.iter().any(|f| !f.is_finite()) {
        return uniform;
    }

    let min = fitness.iter().copied().fold(f64::INFINITY, f64::min);
    let shift = if min < 0.0 { 2.0 * min.abs() } else { 0.0 };
    let shifted: Vec<f64> = fitness.iter().map(|f| f + shift).collect();

    let total: f64 = shifted.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        log::debug!("Degenerate fitness distribution {:?}, sampling uniformly", fitness);
        return uniform;
    }

    shifted.iter().map(|f| f / total).collect()
}

/// Draw two distinct indices without replacement, weighted by `probabilities`.
///
/// The second draw renormalizes over the remaining indices; if none of them
/// carries weight it is uniform over the remaining indices.
pub fn sample_parent_pair<R: Rng>(probabilities: &[f64], rng: &mut R) -> Result<(usize, usize)> {
    let n = probabilities.len();
    if n < 2 {
        return Err(PivotgenError::Generation(format!(
            "Need at least two individuals to pick distinct parents, got {}",
            n
        )));
    }

    let first = weighted_pick(probabilities, rng).unwrap_or_else(|| rng.gen_range(0..n));

    let mut remaining = probabilities.to_vec();
    remaining[first] = 0.0;
    let second = weighted_pick(&remaining, rng).unwrap_or_else(|| {
        let pick = rng.gen_range(0..n - 1);
        if pick >= first {
            pick + 1
        } else {
            pick
        }
    });

    Ok((first, second))
}

fn weighted_pick<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    WeightedIndex::new(weights).ok().map(|dist| dist.sample(rng))
}
