//! Error types for the hardena CLI.
//!
//! Each layer owns a small `thiserror` enum; [`HardenaError`] aggregates them
//! at the command boundary.

use crate::policy::types::ScanResult;
use thiserror::Error;

/// Errors raised while talking to the Kubernetes API.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Failed to create Kubernetes client: {0}")]
    ClientCreation(#[from] kube::Error),

    #[error("Failed to infer Kubernetes config: {0}")]
    ConfigError(#[from] kube::config::InferConfigError),

    #[error("Failed to read kubeconfig: {0}")]
    KubeconfigError(#[from] kube::config::KubeconfigError),

    #[error("API request failed: {0}")]
    ApiError(String),
}

/// A single scanner could not produce its findings.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Cluster access failed: {0}")]
    Cluster(#[from] ClusterError),
}

/// Conditions that end an engine run early.
#[derive(Debug, Error)]
pub enum RunError {
    /// The run was cancelled; `partial` holds everything collected so far.
    #[error("Scan cancelled after collecting {} issue(s)", .partial.stats.total_issues)]
    Cancelled { partial: Box<ScanResult> },
}

impl RunError {
    /// Take the partial result out of a cancelled run.
    pub fn into_partial(self) -> ScanResult {
        match self {
            Self::Cancelled { partial } => *partial,
        }
    }
}

/// Errors from formatting, parsing or persisting reports.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to encode JSON report: {0}")]
    Json(#[source] serde_json::Error),

    #[error("Failed to encode YAML report: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render HTML report: {0}")]
    Template(#[from] tera::Error),

    #[error("Failed to parse scan results: {0}")]
    Parse(#[source] serde_json::Error),

    /// The document parsed but its counters disagree with its issues.
    #[error("Inconsistent scan results: {0}")]
    Inconsistent(String),

    #[error("Failed to read scan results from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParsingFailed { path: String, message: String },
}

/// Top-level error returned by command handlers.
#[derive(Debug, Error)]
pub enum HardenaError {
    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for hardena operations.
pub type Result<T> = std::result::Result<T, HardenaError>;
