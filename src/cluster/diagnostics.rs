// Cluster-count diagnostics: elbow inertia, silhouette width, gap statistic.
//
// Advisory only. The sweep reports one row per candidate k; the operator
// reads the table and pins k in analysis.toml.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::cluster::kmeans::{distance_sq, kmeans, KMeansError, KMeansFit};
use crate::player::{StatVector, CATEGORY_COUNT};

/// Diagnostic scores for one candidate cluster count.
#[derive(Debug, Clone, Serialize)]
pub struct KDiagnostics {
    pub k: usize,
    /// Total within-cluster sum of squared distances (elbow signal).
    pub inertia: f64,
    /// Mean silhouette width across all points.
    pub mean_silhouette: f64,
    /// Gap statistic vs uniform reference data.
    pub gap: f64,
}

/// Evaluate every candidate k in `2..=k_max` against the standardized data.
///
/// All stochastic components (centroid placement, reference resampling) are
/// derived from `seed`, so repeated sweeps over the same data produce
/// identical diagnostics.
pub fn selection_diagnostics(
    data: &[StatVector],
    k_max: usize,
    restarts: usize,
    max_iterations: usize,
    bootstrap: usize,
    seed: u64,
) -> Result<Vec<KDiagnostics>, KMeansError> {
    let mut out = Vec::new();
    for k in 2..=k_max {
        let fit = kmeans(data, k, restarts, max_iterations, seed)?;
        let mean_silhouette = mean_silhouette(data, &fit);
        let gap = gap_statistic(
            data,
            k,
            max_iterations,
            bootstrap,
            seed.wrapping_add((k as u64) << 32),
            fit.inertia,
        )?;
        out.push(KDiagnostics {
            k,
            inertia: fit.inertia,
            mean_silhouette,
            gap,
        });
    }
    Ok(out)
}

/// Mean silhouette width over all points.
///
/// For each point: a = mean distance to its own cluster's other members,
/// b = smallest mean distance to any other cluster, s = (b - a) / max(a, b).
/// Singleton-cluster points score 0.
pub fn mean_silhouette(data: &[StatVector], fit: &KMeansFit) -> f64 {
    let k = fit.centroids.len();
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (i, &label) in fit.labels.iter().enumerate() {
        members[label - 1].push(i);
    }

    let n = data.len();
    if n == 0 {
        return 0.0;
    }

    let mut total = 0.0;
    for (i, row) in data.iter().enumerate() {
        let own = fit.labels[i] - 1;
        if members[own].len() <= 1 {
            continue; // s = 0 for singletons
        }

        let a = mean_distance(row, &members[own], data, Some(i));
        let mut b = f64::INFINITY;
        for (c, cluster) in members.iter().enumerate() {
            if c == own || cluster.is_empty() {
                continue;
            }
            let d = mean_distance(row, cluster, data, None);
            if d < b {
                b = d;
            }
        }

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }
    total / n as f64
}

fn mean_distance(
    row: &StatVector,
    cluster: &[usize],
    data: &[StatVector],
    exclude: Option<usize>,
) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &j in cluster {
        if Some(j) == exclude {
            continue;
        }
        sum += distance_sq(row, &data[j]).sqrt();
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Gap statistic: mean log within-cluster dispersion of uniform reference
/// datasets minus the observed log dispersion.
///
/// References are drawn uniformly inside the per-column bounding box of the
/// data and clustered with a single restart each to keep the default 500
/// draws tractable.
fn gap_statistic(
    data: &[StatVector],
    k: usize,
    max_iterations: usize,
    bootstrap: usize,
    seed: u64,
    observed_inertia: f64,
) -> Result<f64, KMeansError> {
    if bootstrap == 0 {
        return Ok(0.0);
    }

    let mut lo = [f64::INFINITY; CATEGORY_COUNT];
    let mut hi = [f64::NEG_INFINITY; CATEGORY_COUNT];
    for row in data {
        for c in 0..CATEGORY_COUNT {
            lo[c] = lo[c].min(row[c]);
            hi[c] = hi[c].max(row[c]);
        }
    }

    let mut log_ref_sum = 0.0;
    for b in 0..bootstrap {
        let draw_seed = seed.wrapping_add(b as u64);
        let mut rng = StdRng::seed_from_u64(draw_seed);
        let reference: Vec<StatVector> = (0..data.len())
            .map(|_| {
                let mut row = [0.0; CATEGORY_COUNT];
                for c in 0..CATEGORY_COUNT {
                    row[c] = if hi[c] > lo[c] {
                        rng.gen_range(lo[c]..hi[c])
                    } else {
                        lo[c]
                    };
                }
                row
            })
            .collect();
        let fit = kmeans(&reference, k, 1, max_iterations, draw_seed)?;
        log_ref_sum += fit.inertia.max(f64::MIN_POSITIVE).ln();
    }

    let mean_log_ref = log_ref_sum / bootstrap as f64;
    Ok(mean_log_ref - observed_inertia.max(f64::MIN_POSITIVE).ln())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
