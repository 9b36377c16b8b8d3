// Per-column z-score standardization of the clustering input matrix.

use crate::player::{Category, StatVector, CATEGORY_COUNT};

/// Threshold below which a column's standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// The standardized clustering matrix plus the per-column transform
/// parameters needed to invert it.
#[derive(Debug, Clone)]
pub struct Standardized {
    /// One row per player, same order as the input.
    pub rows: Vec<StatVector>,
    /// Per-column sample mean of the raw input.
    pub means: StatVector,
    /// Per-column sample standard deviation (n-1 denominator) of the raw input.
    pub stdevs: StatVector,
}

#[derive(Debug, thiserror::Error)]
pub enum StandardizeError {
    #[error("standardization requires at least 2 rows, got {rows}")]
    InsufficientData { rows: usize },

    #[error("column {category} has zero variance; drop it or fix the input")]
    DegenerateColumn { category: Category },
}

impl Standardized {
    /// Map a standardized row back to raw category space.
    pub fn invert_row(&self, row: &StatVector) -> StatVector {
        let mut raw = [0.0; CATEGORY_COUNT];
        for c in 0..CATEGORY_COUNT {
            raw[c] = row[c] * self.stdevs[c] + self.means[c];
        }
        raw
    }
}

/// Center and scale each column to sample mean 0 and sample standard
/// deviation 1, independently per column over all rows.
///
/// The sample (n-1) deviation is used so the output columns measure exactly
/// stdev 1 under the same convention. Pure transform: the input is not
/// modified.
pub fn standardize(rows: &[StatVector]) -> Result<Standardized, StandardizeError> {
    let n = rows.len();
    if n < 2 {
        return Err(StandardizeError::InsufficientData { rows: n });
    }

    let mut means = [0.0; CATEGORY_COUNT];
    let mut stdevs = [0.0; CATEGORY_COUNT];

    for c in 0..CATEGORY_COUNT {
        let mean = rows.iter().map(|r| r[c]).sum::<f64>() / n as f64;
        let variance =
            rows.iter().map(|r| (r[c] - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
        let stdev = variance.sqrt();
        if stdev < STDEV_EPSILON {
            return Err(StandardizeError::DegenerateColumn {
                category: Category::ALL[c],
            });
        }
        means[c] = mean;
        stdevs[c] = stdev;
    }

    let standardized_rows = rows
        .iter()
        .map(|r| {
            let mut z = [0.0; CATEGORY_COUNT];
            for c in 0..CATEGORY_COUNT {
                z[c] = (r[c] - means[c]) / stdevs[c];
            }
            z
        })
        .collect();

    Ok(Standardized {
        rows: standardized_rows,
        means,
        stdevs,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
