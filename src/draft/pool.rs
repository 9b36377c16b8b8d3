// Draft pool construction: cluster labels joined onto player records, and
// the post-hoc tier naming the drafting script consumes.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::cluster::kmeans::KMeansFit;
use crate::player::{Category, PlayerRecord, StatVector};

// ---------------------------------------------------------------------------
// Cluster assignment
// ---------------------------------------------------------------------------

/// The clustering output keyed by explicit player identity.
///
/// Built once from a fit and the player list it was fitted on; read-only
/// afterward. All downstream joins go through the name key, never through
/// row order.
#[derive(Debug, Clone)]
pub struct ClusterAssignment {
    /// Player name -> cluster label (1..=k).
    pub labels: HashMap<String, usize>,
    /// Centroids in standardized-stat space; `centroids[i]` is label `i + 1`.
    pub centroids: Vec<StatVector>,
}

impl ClusterAssignment {
    /// Pair a fit with the records it was computed from. This is the single
    /// place where row order is trusted: `fit.labels[i]` belongs to
    /// `players[i]`.
    pub fn from_fit(players: &[PlayerRecord], fit: &KMeansFit) -> Self {
        let labels = players
            .iter()
            .zip(&fit.labels)
            .map(|(p, &label)| (p.name.clone(), label))
            .collect();
        ClusterAssignment {
            labels,
            centroids: fit.centroids.clone(),
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.centroids.len()
    }
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// The three named tiers the drafting script draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    Top,
    SmallBall,
    BigMan,
}

impl Tier {
    pub fn display_str(&self) -> &'static str {
        match self {
            Tier::Top => "top",
            Tier::SmallBall => "small-ball",
            Tier::BigMan => "big-man",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Mapping from cluster labels to named tiers. Requires exactly three
/// clusters: with any other k the drafting script is undefined.
#[derive(Debug, Clone, Copy)]
pub struct TierMap {
    pub top: usize,
    pub small_ball: usize,
    pub big_man: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("clustered player '{name}' has no matching record (or vice versa)")]
    UnmatchedPlayer { name: String },

    #[error("drafting requires exactly 3 tiers, got {k} clusters")]
    UnsupportedTierCount { k: usize },

    #[error("tier labels must be distinct values in 1..={k}: top={top}, small_ball={small_ball}, big_man={big_man}")]
    InvalidTierLabels {
        top: usize,
        small_ball: usize,
        big_man: usize,
        k: usize,
    },
}

impl TierMap {
    /// Operator-specified mapping, validated against the cluster count.
    pub fn from_labels(
        top: usize,
        small_ball: usize,
        big_man: usize,
        k: usize,
    ) -> Result<Self, PoolError> {
        if k != 3 {
            return Err(PoolError::UnsupportedTierCount { k });
        }
        let labels = [top, small_ball, big_man];
        let in_range = labels.iter().all(|&l| (1..=k).contains(&l));
        let distinct: HashSet<usize> = labels.iter().copied().collect();
        if !in_range || distinct.len() != 3 {
            return Err(PoolError::InvalidTierLabels {
                top,
                small_ball,
                big_man,
                k,
            });
        }
        Ok(TierMap {
            top,
            small_ball,
            big_man,
        })
    }

    /// Infer the tier naming from centroid profiles, automating the
    /// operator's inspection:
    ///
    /// - top = highest mean z across the 8 higher-is-better categories;
    /// - of the remaining two, small-ball = larger guard profile
    ///   (AST + STL + 3P) - (REB + BLK); big-man = the other.
    ///
    /// Every centroid profile is logged so the inference can be reviewed
    /// (and overridden in analysis.toml if wrong).
    pub fn infer(centroids: &[StatVector]) -> Result<Self, PoolError> {
        if centroids.len() != 3 {
            return Err(PoolError::UnsupportedTierCount {
                k: centroids.len(),
            });
        }

        for (i, c) in centroids.iter().enumerate() {
            info!(
                "cluster {} centroid: {}",
                i + 1,
                Category::ALL
                    .iter()
                    .map(|cat| format!("{}={:+.2}", cat, c[cat.index()]))
                    .collect::<Vec<_>>()
                    .join(" ")
            );
        }

        let top_idx = argmax(centroids, production_score);
        let rest: Vec<usize> = (0..3).filter(|&i| i != top_idx).collect();
        let (small_idx, big_idx) =
            if guard_profile(&centroids[rest[0]]) >= guard_profile(&centroids[rest[1]]) {
                (rest[0], rest[1])
            } else {
                (rest[1], rest[0])
            };

        let map = TierMap {
            top: top_idx + 1,
            small_ball: small_idx + 1,
            big_man: big_idx + 1,
        };
        info!(
            "inferred tiers: top=cluster {}, small-ball=cluster {}, big-man=cluster {}",
            map.top, map.small_ball, map.big_man
        );
        Ok(map)
    }

    /// The tier a cluster label maps to, if any.
    pub fn tier_of(&self, label: usize) -> Option<Tier> {
        if label == self.top {
            Some(Tier::Top)
        } else if label == self.small_ball {
            Some(Tier::SmallBall)
        } else if label == self.big_man {
            Some(Tier::BigMan)
        } else {
            None
        }
    }
}

/// Mean standardized value across the higher-is-better categories.
fn production_score(c: &StatVector) -> f64 {
    let cats: Vec<f64> = Category::ALL
        .iter()
        .filter(|cat| !cat.lower_is_better())
        .map(|cat| c[cat.index()])
        .collect();
    cats.iter().sum::<f64>() / cats.len() as f64
}

/// Guard-profile score: high assists/steals/threes, low rebounds/blocks.
fn guard_profile(c: &StatVector) -> f64 {
    c[Category::Assists.index()] + c[Category::Steals.index()]
        + c[Category::ThreePointers.index()]
        - c[Category::Rebounds.index()]
        - c[Category::Blocks.index()]
}

fn argmax(centroids: &[StatVector], score: impl Fn(&StatVector) -> f64) -> usize {
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let s = score(c);
        if s > best_score {
            best = i;
            best_score = s;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Draft pool
// ---------------------------------------------------------------------------

/// One player in the unified pool: record, cluster label, named tier.
#[derive(Debug, Clone)]
pub struct PoolPlayer {
    pub record: PlayerRecord,
    pub label: usize,
    pub tier: Tier,
}

/// The unified player roster the simulation queries. Read-only once built.
#[derive(Debug, Clone)]
pub struct DraftPool {
    players: Vec<PoolPlayer>,
}

impl DraftPool {
    /// Join player records with their cluster labels on player name.
    ///
    /// A record without a label, or a label without a record, is a
    /// data-integrity failure: upstream dedup guarantees the two sides
    /// describe the same population.
    pub fn build(
        records: Vec<PlayerRecord>,
        assignment: &ClusterAssignment,
        tiers: &TierMap,
    ) -> Result<Self, PoolError> {
        let record_names: HashSet<&str> =
            records.iter().map(|r| r.name.as_str()).collect();
        for name in assignment.labels.keys() {
            if !record_names.contains(name.as_str()) {
                return Err(PoolError::UnmatchedPlayer { name: name.clone() });
            }
        }

        let mut players = Vec::with_capacity(records.len());
        for record in records {
            let label = *assignment.labels.get(&record.name).ok_or_else(|| {
                PoolError::UnmatchedPlayer {
                    name: record.name.clone(),
                }
            })?;
            let tier = tiers.tier_of(label).ok_or(PoolError::InvalidTierLabels {
                top: tiers.top,
                small_ball: tiers.small_ball,
                big_man: tiers.big_man,
                k: assignment.cluster_count(),
            })?;
            players.push(PoolPlayer {
                record,
                label,
                tier,
            });
        }

        Ok(DraftPool { players })
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn player(&self, idx: usize) -> &PoolPlayer {
        &self.players[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PoolPlayer> {
        self.players.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
