// Configuration loading and parsing (config/analysis.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

/// Top-level assembled configuration. Every knob the pipeline consumes is an
/// explicit field here; nothing reads hidden globals.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Optional operator override for the cluster -> tier naming. When
    /// absent the pipeline infers the mapping from centroid profiles.
    #[serde(default)]
    pub tiers: Option<TiersConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Season-totals CSV (Basketball-Reference export shape).
    pub players_csv: PathBuf,
    /// Directory for output artifacts (diagnostics, labeled players,
    /// simulation result).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Players below this minutes total are dropped before clustering.
    #[serde(default = "default_min_minutes")]
    pub min_minutes: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClusteringConfig {
    /// Cluster count for the final fit. The drafting script requires 3.
    #[serde(default = "default_k")]
    pub k: usize,
    /// Upper end of the diagnostics sweep (candidates 2..=k_max).
    #[serde(default = "default_k_max")]
    pub k_max: usize,
    /// Random restarts for the final fit; best inertia wins.
    #[serde(default = "default_restarts")]
    pub restarts: usize,
    /// Lloyd iteration cap per restart.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Reference datasets per candidate k for the gap statistic.
    #[serde(default = "default_gap_bootstrap")]
    pub gap_bootstrap: usize,
    /// Seed for all clustering randomness (restarts, gap resampling).
    #[serde(default = "default_cluster_seed")]
    pub seed: u64,
    /// Whether to run the cluster-count diagnostics sweep.
    #[serde(default = "default_true")]
    pub run_diagnostics: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Number of independent draft-and-matchup trials.
    #[serde(default = "default_trials")]
    pub trials: u64,
    /// Seed for simulation randomness, independent of the clustering seed.
    #[serde(default = "default_sim_seed")]
    pub seed: u64,
}

/// Explicit cluster-label -> tier mapping (labels in 1..=k).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TiersConfig {
    pub top: usize,
    pub small_ball: usize,
    pub big_man: usize,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}
fn default_min_minutes() -> u32 {
    500
}
fn default_k() -> usize {
    3
}
fn default_k_max() -> usize {
    8
}
fn default_restarts() -> usize {
    20
}
fn default_max_iterations() -> usize {
    100
}
fn default_gap_bootstrap() -> usize {
    500
}
fn default_cluster_seed() -> u64 {
    2024
}
fn default_true() -> bool {
    true
}
fn default_trials() -> u64 {
    10_000
}
fn default_sim_seed() -> u64 {
    1337
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        ClusteringConfig {
            k: default_k(),
            k_max: default_k_max(),
            restarts: default_restarts(),
            max_iterations: default_max_iterations(),
            gap_bootstrap: default_gap_bootstrap(),
            seed: default_cluster_seed(),
            run_diagnostics: default_true(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            trials: default_trials(),
            seed: default_sim_seed(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

/// Load and validate the analysis config from a TOML file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.clustering;
        if c.k < 2 {
            return Err(validation("clustering.k", "must be at least 2"));
        }
        if c.k_max < c.k {
            return Err(validation(
                "clustering.k_max",
                "must be at least clustering.k",
            ));
        }
        if c.restarts == 0 {
            return Err(validation("clustering.restarts", "must be at least 1"));
        }
        if c.max_iterations == 0 {
            return Err(validation(
                "clustering.max_iterations",
                "must be at least 1",
            ));
        }
        if let Some(t) = &self.tiers {
            for (field, value) in [
                ("tiers.top", t.top),
                ("tiers.small_ball", t.small_ball),
                ("tiers.big_man", t.big_man),
            ] {
                if !(1..=c.k).contains(&value) {
                    return Err(validation(field, "must be a cluster label in 1..=k"));
                }
            }
        }
        Ok(())
    }
}

fn validation(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
