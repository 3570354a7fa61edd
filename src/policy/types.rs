//! Core types for the policy engine.
//!
//! - `Severity` - Finding urgency levels
//! - `Issue` - A single security finding
//! - `Stats` - Aggregates over a scan
//! - `ScanResult` - The issues and stats of one engine run
//!
//! `ScanResult` is also the on-disk interchange document between `scan`
//! and `report`, so its serde shape is part of the public contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Severity levels for findings.
///
/// Variants are declared in display order, most urgent first. The derived
/// `Ord` only exists so that severity maps iterate in that fixed order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Must be fixed before anything else (e.g. privileged containers)
    Critical,
    /// Significant exposure
    High,
    /// Hardening gap
    Medium,
    /// Minor gap
    Low,
    /// Informational
    Info,
}

impl Severity {
    /// Every severity in display order.
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    /// Get the string representation used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A security finding tied to one resource and one rule.
///
/// The same rule may fire once per offending container, so duplicate ids
/// inside a result are expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Rule identifier (e.g. "HK-001").
    pub id: String,
    pub title: String,
    /// Resource-specific explanation.
    pub description: String,
    pub severity: Severity,
    /// Name of the offending object.
    pub resource: String,
    pub namespace: String,
    /// Actionable fix text.
    pub remediation: String,
    /// Grouping label (e.g. "Pod Security").
    pub category: String,
}

impl Issue {
    /// Get a full identifier for the resource (namespace/name).
    pub fn resource_identifier(&self) -> String {
        if self.namespace.is_empty() {
            self.resource.clone()
        } else {
            format!("{}/{}", self.namespace, self.resource)
        }
    }
}

/// Summary statistics of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_issues: usize,
    pub severity_count: BTreeMap<Severity, usize>,
    pub resources_scanned: usize,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            total_issues: 0,
            severity_count: Severity::ALL.iter().map(|s| (*s, 0)).collect(),
            resources_scanned: 0,
        }
    }
}

impl Stats {
    /// Occurrences of a severity (zero when absent from the map).
    pub fn count(&self, severity: Severity) -> usize {
        self.severity_count.get(&severity).copied().unwrap_or(0)
    }
}

/// The outcome of one engine run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub issues: Vec<Issue>,
    pub stats: Stats,
}

impl ScanResult {
    /// Create an empty result with every severity counter present.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an issue and update the counters.
    pub fn record(&mut self, issue: Issue) {
        self.stats.total_issues += 1;
        *self.stats.severity_count.entry(issue.severity).or_insert(0) += 1;
        self.issues.push(issue);
    }

    /// Whether no issues were found.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Check that the counters agree with the issue list.
    pub fn is_consistent(&self) -> bool {
        self.check_consistency().is_ok()
    }

    /// Like [`is_consistent`](Self::is_consistent), but names the first
    /// counter that disagrees.
    ///
    /// Every severity must be present in `severity_count`, each count must
    /// match the issues of that severity, and `total_issues` must equal
    /// the number of issues.
    pub fn check_consistency(&self) -> Result<(), String> {
        if self.stats.total_issues != self.issues.len() {
            return Err(format!(
                "total_issues is {} but {} issue(s) are listed",
                self.stats.total_issues,
                self.issues.len()
            ));
        }

        for severity in Severity::ALL {
            let Some(&counted) = self.stats.severity_count.get(&severity) else {
                return Err(format!("severity_count has no {} entry", severity));
            };
            let listed = self
                .issues
                .iter()
                .filter(|i| i.severity == severity)
                .count();
            if counted != listed {
                return Err(format!(
                    "severity_count.{} is {} but {} issue(s) have that severity",
                    severity, counted, listed
                ));
            }
        }
        Ok(())
    }
}
