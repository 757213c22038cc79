use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BIASLENS_DIR_NAME: &str = ".biaslens";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_MIN_ITERATIONS: u32 = 10;
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;
pub const DEFAULT_TREND_HISTORY_DAYS: u32 = 30;
pub const DEFAULT_DRIFT_WINDOW_DAYS: u32 = 7;
pub const DEFAULT_DRIFT_THRESHOLD_PERCENT: f64 = 10.0;
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BiaslensConfig {
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub trend: TrendConfig,
    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

/// Bounds for the per-evaluation trial count. Enforced by the evaluation
/// runner, not by the detector itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_min_iterations")]
    pub min_iterations: u32,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_iterations: default_min_iterations(),
            max_iterations: default_max_iterations(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Days of synthetic history to generate, ending yesterday.
    #[serde(default = "default_trend_history_days")]
    pub history_days: u32,
    /// Size of each of the two trailing windows the drift check compares.
    #[serde(default = "default_drift_window_days")]
    pub drift_window_days: u32,
    /// Absolute percent change between window means that flags drift
    /// (strictly greater-than).
    #[serde(default = "default_drift_threshold_percent")]
    pub drift_threshold_percent: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            history_days: default_trend_history_days(),
            drift_window_days: default_drift_window_days(),
            drift_threshold_percent: default_drift_threshold_percent(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Cap on the priority-ranked recommendation list.
    #[serde(default = "default_max_recommendations")]
    pub max_results: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_recommendations(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub fn biaslens_dir(workspace_root: impl AsRef<Path>) -> PathBuf {
    workspace_root.as_ref().join(BIASLENS_DIR_NAME)
}

pub fn config_path(workspace_root: impl AsRef<Path>) -> PathBuf {
    biaslens_dir(workspace_root).join(CONFIG_FILE_NAME)
}

pub fn load_workspace_config(
    workspace_root: impl AsRef<Path>,
) -> Result<BiaslensConfig, ConfigError> {
    let path = config_path(workspace_root);
    if !path.exists() {
        return Ok(BiaslensConfig::default());
    }

    let raw = fs::read_to_string(path)?;
    let parsed: BiaslensConfig = toml::from_str(&raw)?;
    Ok(parsed)
}

pub fn ensure_workspace_config(
    workspace_root: impl AsRef<Path>,
) -> Result<BiaslensConfig, ConfigError> {
    let workspace_root = workspace_root.as_ref();
    fs::create_dir_all(biaslens_dir(workspace_root))?;

    let path = config_path(workspace_root);
    if path.exists() {
        return load_workspace_config(workspace_root);
    }

    let config = BiaslensConfig::default();
    let content = toml::to_string_pretty(&config)?;
    fs::write(path, content)?;

    Ok(config)
}

fn default_min_iterations() -> u32 {
    DEFAULT_MIN_ITERATIONS
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

fn default_trend_history_days() -> u32 {
    DEFAULT_TREND_HISTORY_DAYS
}

fn default_drift_window_days() -> u32 {
    DEFAULT_DRIFT_WINDOW_DAYS
}

fn default_drift_threshold_percent() -> f64 {
    DEFAULT_DRIFT_THRESHOLD_PERCENT
}

fn default_max_recommendations() -> usize {
    DEFAULT_MAX_RECOMMENDATIONS
}
