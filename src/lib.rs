//! # HardenaK8s
//!
//! A Rust-based command-line application that audits the workloads of a
//! live Kubernetes cluster against a fixed set of security rules and renders
//! the findings as text, JSON, YAML or HTML.
//!
//! ## Features
//!
//! - **Policy Engine**: Runs every registered scanner, isolates scanner failures
//! - **Pod Security Rules**: Privileged containers, writable root filesystems, root users
//! - **Multiple Formats**: Deterministic JSON, YAML, HTML and text reports
//! - **Re-entrant Reports**: Saved JSON results can be re-rendered later
//!
//! ## Example
//!
//! ```rust,no_run
//! use hardena::logging::MemoryLog;
//! use hardena::policy::{Engine, KubeCluster, ScanContext};
//! use hardena::report::ReportFormat;
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let cluster = Arc::new(KubeCluster::new().await?);
//! let log = MemoryLog::new();
//! let result = Engine::builtin(cluster)
//!     .run(&ScanContext::background(), "default", &log)
//!     .await?;
//! let html = ReportFormat::Html.formatter().format(&result)?;
//! println!("{} bytes", html.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod policy;
pub mod report;
pub mod ui;

// Re-export commonly used types and functions
pub use error::{HardenaError, Result};
pub use policy::{Engine, Issue, ScanContext, ScanResult, Scanner, ScannerRegistry, Severity};
pub use report::{Formatter, ReportFormat};

use cli::{Cli, Commands};
use std::path::PathBuf;
use std::time::Duration;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Merge flags with the config file and dispatch to the command handler.
pub async fn run_command(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;
    let format = cli.output.unwrap_or(config.output.format);

    match cli.command {
        Commands::Scan {
            namespace,
            all_namespaces,
            context,
            timeout,
            output_dir,
        } => {
            let namespace = if all_namespaces {
                String::new()
            } else {
                namespace.unwrap_or(config.scan.namespace)
            };
            let timeout_secs = timeout.unwrap_or(config.scan.timeout_secs);

            let options = handlers::ScanOptions {
                namespace,
                context: context.or(config.scan.context),
                timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
                format,
                output_dir,
            };
            handlers::handle_scan(options).await
        }
        Commands::Report { input, output_dir } => {
            let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(config.output.directory));
            handlers::handle_report(&input, &output_dir, &format).map(|_| ())
        }
        Commands::Fix { input, dry_run } => handlers::handle_fix(&input, dry_run),
    }
}
