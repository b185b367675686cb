use crate::config::ClusteringConfig;
use crate::error::{PivotgenError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Seeded 1-D k-means over a price history.
///
/// The input is sorted before clustering, so the same multiset of prices
/// always yields the same centers regardless of arrival order. Centers are
/// returned in ascending order; band `i` always belongs to the `i`-th
/// smallest center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotModel {
    pub seed: u64,
    pub max_iterations: usize,
    pub n_init: usize,
    pub tolerance: f64,
}

impl Default for PivotModel {
    fn default() -> Self {
        ClusteringConfig::default().into()
    }
}

impl From<ClusteringConfig> for PivotModel {
    fn from(config: ClusteringConfig) -> Self {
        Self {
            seed: config.seed,
            max_iterations: config.max_iterations,
            n_init: config.n_init,
            tolerance: config.tolerance,
        }
    }
}

/// Pivot centers with their breakout bands, always recomputed together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotSet {
    pub centers: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
}

impl PivotSet {
    pub fn from_centers(centers: Vec<f64>, diff: f64) -> Self {
        let highs = centers.iter().map(|p| p * (1.0 + diff)).collect();
        let lows = centers.iter().map(|p| p * (1.0 - diff)).collect();
        Self { centers, highs, lows }
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

impl PivotModel {
    /// Fit `k` centers and derive bands `diff` away from each.
    pub fn fit_bands(&self, prices: &[f64], k: usize, diff: f64) -> Result<PivotSet> {
        Ok(PivotSet::from_centers(self.fit(prices, k)?, diff))
    }

    pub fn fit(&self, prices: &[f64], k: usize) -> Result<Vec<f64>> {
        if k == 0 {
            return Err(PivotgenError::Validation(
                "Pivot count must be at least 1".to_string(),
            ));
        }

        let mut values: Vec<f64> = prices.iter().copied().filter(|p| p.is_finite()).collect();
        values.sort_by(|a, b| a.total_cmp(b));

        let mut distinct = values.clone();
        distinct.dedup();
        if distinct.len() < k {
            return Err(PivotgenError::InsufficientData {
                required: k,
                available: distinct.len(),
            });
        }
        if distinct.len() == k {
            return Ok(distinct);
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        let tolerance = self.tolerance * variance;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<(Vec<f64>, f64)> = None;

        for _ in 0..self.n_init.max(1) {
            let seeds = seed_centers(&values, k, &mut rng);
            let (centers, inertia) = self.lloyd(&values, seeds, tolerance);
            let improved = best
                .as_ref()
                .map_or(true, |(_, best_inertia)| inertia < *best_inertia);
            if improved {
                best = Some((centers, inertia));
            }
        }

        let (mut centers, inertia) = best.unwrap_or_default();
        centers.sort_by(|a, b| a.total_cmp(b));
        log::trace!("k-means fit k={} n={} inertia={:.6}", k, values.len(), inertia);
        Ok(centers)
    }

    fn lloyd(&self, values: &[f64], mut centers: Vec<f64>, tolerance: f64) -> (Vec<f64>, f64) {
        let k = centers.len();
        let mut labels = vec![0usize; values.len()];

        for _ in 0..self.max_iterations.max(1) {
            assign(values, &centers, &mut labels);

            let mut sums = vec![0.0; k];
            let mut counts = vec![0usize; k];
            for (value, &label) in values.iter().zip(&labels) {
                sums[label] += value;
                counts[label] += 1;
            }

            let mut updated: Vec<f64> = (0..k)
                .map(|c| if counts[c] > 0 { sums[c] / counts[c] as f64 } else { centers[c] })
                .collect();

            // Empty clusters take the point farthest from its own center
            for c in (0..k).filter(|&c| counts[c] == 0) {
                if let Some(i) = farthest_point(values, &labels, &updated) {
                    updated[c] = values[i];
                }
            }
            updated.sort_by(|a, b| a.total_cmp(b));

            let shift: f64 = centers
                .iter()
                .zip(&updated)
                .map(|(old, new)| (old - new).powi(2))
                .sum();
            centers = updated;
            if shift <= tolerance {
                break;
            }
        }

        assign(values, &centers, &mut labels);
        let inertia = values
            .iter()
            .zip(&labels)
            .map(|(v, &l)| (v - centers[l]).powi(2))
            .sum();
        (centers, inertia)
    }
}

/// k-means++ seeding
fn seed_centers<R: Rng>(values: &[f64], k: usize, rng: &mut R) -> Vec<f64> {
    let mut centers = Vec::with_capacity(k);
    centers.push(values[rng.gen_range(0..values.len())]);

    while centers.len() < k {
        let weights: Vec<f64> = values
            .iter()
            .map(|v| nearest(&centers, *v).1)
            .collect();
        let total: f64 = weights.iter().sum();

        let pick = if total > 0.0 {
            let mut spin = rng.gen::<f64>() * total;
            let mut chosen = values.len() - 1;
            for (i, w) in weights.iter().enumerate() {
                spin -= w;
                if spin <= 0.0 && *w > 0.0 {
                    chosen = i;
                    break;
                }
            }
            values[chosen]
        } else {
            // Every value is already a center
            match values.iter().find(|v| !centers.contains(*v)) {
                Some(v) => *v,
                None => break,
            }
        };
        centers.push(pick);
    }

    centers.sort_by(|a, b| a.total_cmp(b));
    centers
}

fn assign(values: &[f64], centers: &[f64], labels: &mut [usize]) {
    for (value, label) in values.iter().zip(labels.iter_mut()) {
        *label = nearest(centers, *value).0;
    }
}

/// Index of and squared distance to the closest center
fn nearest(centers: &[f64], value: f64) -> (usize, f64) {
    centers
        .iter()
        .enumerate()
        .map(|(i, c)| (i, (value - c).powi(2)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

fn farthest_point(values: &[f64], labels: &[usize], centers: &[f64]) -> Option<usize> {
    values
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(i, (v, &l))| (i, (v - centers[l]).abs()))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
