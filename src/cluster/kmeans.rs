// Seeded k-means (Lloyd iteration) with random restarts.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::player::{StatVector, CATEGORY_COUNT};

/// A fitted clustering of the standardized player matrix.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Cluster label per input row, in 1..=k. Same order as the input.
    pub labels: Vec<usize>,
    /// Centroid per cluster, in standardized-stat space. `centroids[i]`
    /// belongs to label `i + 1`.
    pub centroids: Vec<StatVector>,
    /// Total within-cluster sum of squared distances to centroid.
    pub inertia: f64,
    /// Whether the best restart reached assignment stability before the
    /// iteration cap.
    pub converged: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum KMeansError {
    #[error("cluster count must be at least 1, got {k}")]
    ZeroClusters { k: usize },

    #[error("cluster count {k} exceeds row count {rows}")]
    TooFewRows { k: usize, rows: usize },
}

/// Squared Euclidean distance between two stat vectors.
pub fn distance_sq(a: &StatVector, b: &StatVector) -> f64 {
    let mut sum = 0.0;
    for c in 0..CATEGORY_COUNT {
        let d = a[c] - b[c];
        sum += d * d;
    }
    sum
}

/// Partition `data` into `k` clusters.
///
/// Runs `restarts` independent Lloyd fits, each from randomly chosen initial
/// centroids, and keeps the fit with the lowest inertia. Each restart derives
/// its rng from `seed`, so the same (seed, data, k) always reproduces the
/// same labeling.
pub fn kmeans(
    data: &[StatVector],
    k: usize,
    restarts: usize,
    max_iterations: usize,
    seed: u64,
) -> Result<KMeansFit, KMeansError> {
    if k == 0 {
        return Err(KMeansError::ZeroClusters { k });
    }
    if data.len() < k {
        return Err(KMeansError::TooFewRows { k, rows: data.len() });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut best = lloyd_once(data, k, max_iterations, &mut rng);
    for restart in 1..restarts.max(1) as u64 {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(restart));
        let fit = lloyd_once(data, k, max_iterations, &mut rng);
        if fit.inertia < best.inertia {
            best = fit;
        }
    }

    Ok(best)
}

/// One Lloyd fit from random initial centroids.
fn lloyd_once(
    data: &[StatVector],
    k: usize,
    max_iterations: usize,
    rng: &mut StdRng,
) -> KMeansFit {
    // Initial centroids: k distinct random rows.
    let mut centroids: Vec<StatVector> =
        data.choose_multiple(rng, k).copied().collect();

    let mut labels = vec![0usize; data.len()];
    let mut converged = false;

    for _ in 0..max_iterations.max(1) {
        // Assignment step: nearest centroid by Euclidean distance.
        let mut changed = false;
        for (i, row) in data.iter().enumerate() {
            let nearest = nearest_centroid(row, &centroids);
            if labels[i] != nearest {
                labels[i] = nearest;
                changed = true;
            }
        }

        // Update step: centroid = mean of assigned rows. Empty clusters are
        // reseeded from a random row so every cluster survives the fit.
        let mut sums = vec![[0.0; CATEGORY_COUNT]; k];
        let mut counts = vec![0usize; k];
        for (i, row) in data.iter().enumerate() {
            let c = labels[i];
            counts[c] += 1;
            for col in 0..CATEGORY_COUNT {
                sums[c][col] += row[col];
            }
        }
        let mut reseeded = false;
        for c in 0..k {
            if counts[c] == 0 {
                centroids[c] = data[rng.gen_range(0..data.len())];
                reseeded = true;
            } else {
                for col in 0..CATEGORY_COUNT {
                    centroids[c][col] = sums[c][col] / counts[c] as f64;
                }
            }
        }

        if !changed && !reseeded {
            converged = true;
            break;
        }
    }

    let inertia = data
        .iter()
        .zip(&labels)
        .map(|(row, &c)| distance_sq(row, &centroids[c]))
        .sum();

    KMeansFit {
        labels: labels.into_iter().map(|c| c + 1).collect(),
        centroids,
        inertia,
        converged,
    }
}

fn nearest_centroid(row: &StatVector, centroids: &[StatVector]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = distance_sq(row, centroid);
        if d < best_dist {
            best = c;
            best_dist = d;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
