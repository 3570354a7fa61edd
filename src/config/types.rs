use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub output: OutputConfig,
}

/// Scan configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Namespace to audit (empty = all namespaces)
    pub namespace: String,
    /// Kubeconfig context (None = current context)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Abort the scan after this many seconds (0 = no timeout)
    pub timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format name
    pub format: String,
    /// Directory for generated reports
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            directory: "./reports".to_string(),
        }
    }
}
