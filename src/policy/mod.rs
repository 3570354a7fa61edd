//! # Policy Engine
//!
//! Audits live cluster resources against the compiled-in security rules.
//!
//! - [`cluster`]: read-only accessor over the Kubernetes API
//! - [`scanner`]: the `Scanner` capability, run context and registry
//! - [`pod`]: pod security rules (HK-001..HK-003)
//! - [`engine`]: runs scanners and aggregates their findings
//!
//! # Example
//!
//! ```rust,ignore
//! use hardena::logging::LogForwarder;
//! use hardena::policy::{Engine, KubeCluster, ScanContext};
//! use std::sync::Arc;
//!
//! let cluster = Arc::new(KubeCluster::new().await?);
//! let engine = Engine::builtin(cluster);
//! let result = engine.run(&ScanContext::background(), "", &LogForwarder).await?;
//! println!("{} issues found", result.stats.total_issues);
//! ```

pub mod cluster;
pub mod engine;
pub mod pod;
pub mod scanner;
pub mod types;

pub use cluster::{ClusterAccessor, ContainerSecurityView, KubeCluster, PodSecurityView};
pub use engine::Engine;
pub use pod::{ContainerRule, PodScanner};
pub use scanner::{CancelHandle, ScanContext, ScanOutput, Scanner, ScannerRegistry};
pub use types::{Issue, ScanResult, Severity, Stats};
