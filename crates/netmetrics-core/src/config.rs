use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ErrorCode;

/// Environment variable overriding [`ProgressConfig::checkpoint_interval`].
pub const CHECKPOINT_INTERVAL_ENV: &str = "NETMETRICS_CHECKPOINT_INTERVAL";

/// Everything a metrics run can be tuned with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub metrics: MetricFlags,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub eigenvector: EigenvectorConfig,
    #[serde(default)]
    pub pagerank: PageRankConfig,
    #[serde(default)]
    pub clusters: ClusterConfig,
}

/// "Should I calculate metric X" switches, one per metric family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct MetricFlags {
    #[serde(default = "default_true")]
    pub degree: bool,
    #[serde(default = "default_true")]
    pub in_degree: bool,
    #[serde(default = "default_true")]
    pub out_degree: bool,
    #[serde(default = "default_true")]
    pub betweenness: bool,
    #[serde(default = "default_true")]
    pub closeness: bool,
    #[serde(default = "default_true")]
    pub eigenvector: bool,
    #[serde(default = "default_true")]
    pub pagerank: bool,
    #[serde(default = "default_true")]
    pub clustering_coefficient: bool,
    #[serde(default = "default_true")]
    pub reciprocated_vertex_pair_ratio: bool,
    #[serde(default = "default_true")]
    pub overall: bool,
    #[serde(default = "default_true")]
    pub connected_components: bool,
    #[serde(default = "default_true")]
    pub clusters: bool,
    #[serde(default = "default_true")]
    pub group_metrics: bool,
}

impl MetricFlags {
    /// Every metric enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            degree: true,
            in_degree: true,
            out_degree: true,
            betweenness: true,
            closeness: true,
            eigenvector: true,
            pagerank: true,
            clustering_coefficient: true,
            reciprocated_vertex_pair_ratio: true,
            overall: true,
            connected_components: true,
            clusters: true,
            group_metrics: true,
        }
    }

    /// Every metric disabled.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            degree: false,
            in_degree: false,
            out_degree: false,
            betweenness: false,
            closeness: false,
            eigenvector: false,
            pagerank: false,
            clustering_coefficient: false,
            reciprocated_vertex_pair_ratio: false,
            overall: false,
            connected_components: false,
            clusters: false,
            group_metrics: false,
        }
    }

    /// Whether any degree flavour is wanted.
    #[must_use]
    pub const fn any_degree(&self) -> bool {
        self.degree || self.in_degree || self.out_degree
    }
}

impl Default for MetricFlags {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Items processed between cancellation/progress checkpoints.
    #[serde(default = "default_checkpoint_interval")]
    pub checkpoint_interval: usize,
}

impl ProgressConfig {
    /// The interval actually used; zero is treated as one.
    #[must_use]
    pub fn effective_interval(&self) -> usize {
        self.checkpoint_interval.max(1)
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: default_checkpoint_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenvectorConfig {
    #[serde(default = "default_eigenvector_max_iter")]
    pub max_iter: usize,
    /// Stop when the L2 distance between successive normalized vectors
    /// drops below this value.
    #[serde(default = "default_eigenvector_tolerance")]
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iter: default_eigenvector_max_iter(),
            tolerance: default_eigenvector_tolerance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankConfig {
    /// Probability of following a link instead of teleporting.
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Stop when the L1 norm of the rank delta drops below this value.
    #[serde(default = "default_pagerank_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_pagerank_max_iter")]
    pub max_iter: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            tolerance: default_pagerank_tolerance(),
            max_iter: default_pagerank_max_iter(),
        }
    }
}

/// Community detection algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterAlgorithm {
    /// Greedy modularity agglomeration (Clauset, Newman & Moore 2004).
    #[default]
    ClausetNewmanMoore,
    /// CNM weighted by the consolidation ratio (Wakita & Tsurumi 2007).
    WakitaTsurumi,
    /// Divisive edge-betweenness splitting (Girvan & Newman 2002).
    GirvanNewman,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    #[serde(default)]
    pub algorithm: ClusterAlgorithm,
}

/// Load a [`MetricsConfig`] from a TOML file.
///
/// A missing file yields the defaults. Environment overrides are applied
/// afterwards.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<MetricsConfig> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str::<MetricsConfig>(&content).with_context(|| {
            format!(
                "{}: failed to parse {}",
                ErrorCode::ConfigParseError,
                path.display()
            )
        })?
    } else {
        debug!(path = %path.display(), "no metrics config, using defaults");
        MetricsConfig::default()
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok());
    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides(config: &mut MetricsConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(raw) = lookup(CHECKPOINT_INTERVAL_ENV) {
        if let Ok(interval) = raw.trim().parse::<usize>() {
            config.progress.checkpoint_interval = interval;
        } else {
            warn!(value = %raw, "ignoring invalid {CHECKPOINT_INTERVAL_ENV}");
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_checkpoint_interval() -> usize {
    100
}

const fn default_eigenvector_max_iter() -> usize {
    1000
}

const fn default_eigenvector_tolerance() -> f64 {
    1e-9
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_pagerank_tolerance() -> f64 {
    1e-6
}

const fn default_pagerank_max_iter() -> usize {
    100
}
