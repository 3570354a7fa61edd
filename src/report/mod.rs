//! Report pipeline: formatters and the report sink.
//!
//! Supports multiple output formats: JSON, YAML, HTML and a one-line text
//! summary. JSON is also the interchange format read back by `report`,
//! so [`load_result`] must accept anything [`JsonFormatter`] writes.

pub mod html;
pub mod json;
pub mod sink;
pub mod text;
pub mod yaml;

pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use sink::save;
pub use text::TextFormatter;
pub use yaml::YamlFormatter;

use crate::error::ReportError;
use crate::logging::ScanLog;
use crate::policy::types::ScanResult;
use std::fmt;
use std::path::{Path, PathBuf};

/// Renders a scan result into bytes.
pub trait Formatter: Send + Sync {
    /// Pure and deterministic for a given result.
    fn format(&self, result: &ScanResult) -> Result<Vec<u8>, ReportError>;
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Indented JSON (default and fallback)
    #[default]
    Json,
    /// YAML with the same fields
    Yaml,
    /// Self-contained HTML document
    Html,
    /// One-line summary
    Text,
}

impl ReportFormat {
    /// Parse from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" => Some(Self::Yaml),
            "html" => Some(Self::Html),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Resolve a user-supplied name, falling back to JSON with a warning.
    pub fn resolve(name: &str, log: &dyn ScanLog) -> Self {
        match Self::parse(name) {
            Some(format) => format,
            None => {
                log.warn(&format!(
                    "Invalid output format '{}', defaulting to JSON",
                    name
                ));
                Self::Json
            }
        }
    }

    /// Canonical name, also used as the report file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Html => "html",
            Self::Text => "text",
        }
    }

    /// The formatter for this format.
    pub fn formatter(&self) -> Box<dyn Formatter> {
        match self {
            Self::Json => Box::new(JsonFormatter),
            Self::Yaml => Box::new(YamlFormatter),
            Self::Html => Box::new(HtmlFormatter),
            Self::Text => Box::new(TextFormatter),
        }
    }

    /// `<dir>/<stem>.<format>`
    pub fn output_path(&self, dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("{}.{}", stem, self.as_str()))
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolve a formatter by name; unknown names yield JSON plus a warning.
pub fn resolve_formatter(name: &str, log: &dyn ScanLog) -> Box<dyn Formatter> {
    ReportFormat::resolve(name, log).formatter()
}

/// Parse a JSON result document.
///
/// Every field is required, and the counters must agree with the issue
/// list; anything else is rejected rather than rendered.
pub fn load_result(data: &[u8]) -> Result<ScanResult, ReportError> {
    let result: ScanResult = serde_json::from_slice(data).map_err(ReportError::Parse)?;
    result
        .check_consistency()
        .map_err(ReportError::Inconsistent)?;
    Ok(result)
}

/// Read and parse a JSON result document from disk.
pub fn read_result(path: &Path) -> Result<ScanResult, ReportError> {
    let data = std::fs::read(path).map_err(|source| ReportError::Read {
        path: path.display().to_string(),
        source,
    })?;
    load_result(&data)
}
