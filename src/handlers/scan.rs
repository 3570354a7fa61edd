//! Handler for the `scan` command.
//!
//! Connects to the cluster, runs the policy engine and either prints the
//! findings to the terminal (`text`) or saves a `scan-results.<format>`
//! file. Ctrl+C or `--timeout` cancels the run; the partial result is
//! still emitted before the command fails.

use crate::error::{Result, RunError};
use crate::logging::{LogForwarder, ScanLog};
use crate::policy::types::{ScanResult, Severity};
use crate::policy::{CancelHandle, Engine, KubeCluster, ScanContext};
use crate::report::{ReportFormat, save};
use crate::ui;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Configuration for the scan command
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Target namespace (empty = all namespaces)
    pub namespace: String,
    /// Kubeconfig context (None = current)
    pub context: Option<String>,
    /// Cancel the run after this long
    pub timeout: Option<Duration>,
    /// Output format name as given by the user
    pub format: String,
    /// Directory for the results file
    pub output_dir: PathBuf,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            context: None,
            timeout: None,
            format: "text".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Handle the `scan` command.
pub async fn handle_scan(options: ScanOptions) -> Result<()> {
    // Install rustls crypto provider (required for TLS connections to K8s API)
    let _ = rustls::crypto::ring::default_provider().install_default();

    let log = LogForwarder;
    let format = ReportFormat::resolve(&options.format, &log);

    // The timeout and Ctrl+C cover connecting as well as auditing
    let (ctx, cancel) = ScanContext::with_cancel();
    let ctx = match options.timeout {
        Some(timeout) => ctx.with_timeout(timeout),
        None => ctx,
    };
    let interrupt = spawn_interrupt_listener(cancel.clone());

    let outcome = scan_cluster(&ctx, &options, &log).await;
    // Nothing left to cancel; from here on Ctrl+C exits the process
    cancel.cancel();

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            interrupt.abort();
            return Err(e);
        }
    };

    let (result, was_cancelled) = match outcome {
        Ok(result) => (result, false),
        Err(e) => {
            println!("{}", ui::warning(&format!("{}; showing partial results.", e)));
            (e.into_partial(), true)
        }
    };

    let emitted = emit(&result, format, &options, &log);
    interrupt.abort();
    emitted?;

    if was_cancelled {
        return Err(RunError::Cancelled {
            partial: Box::new(result),
        }
        .into());
    }
    Ok(())
}

/// Connect and run the engine under `ctx`.
///
/// The outer error ends the command with nothing emitted: a connection
/// failure, or cancellation before the cluster answered. The inner result
/// is the engine run, whose partial result is still worth emitting.
async fn scan_cluster(
    ctx: &ScanContext,
    options: &ScanOptions,
    log: &dyn ScanLog,
) -> Result<std::result::Result<ScanResult, RunError>> {
    println!("{}", ui::header("Starting Security Scan..."));

    let cluster = match ctx.run_until_cancelled(connect(options)).await {
        Some(connected) => connected?,
        None => {
            return Err(RunError::Cancelled {
                partial: Box::default(),
            }
            .into());
        }
    };

    let scope = if options.namespace.is_empty() {
        "all namespaces".to_string()
    } else {
        format!("namespace '{}'", options.namespace)
    };
    println!("{}", ui::info(&format!("Auditing resources in {}...", scope)));

    let engine = Engine::builtin(Arc::new(cluster));
    Ok(engine.run(ctx, &options.namespace, log).await)
}

async fn connect(options: &ScanOptions) -> Result<KubeCluster> {
    let cluster = KubeCluster::connect(options.context.as_deref()).await?;
    println!("{}", ui::info("Checking cluster connectivity..."));
    let version = cluster.check_connectivity().await?;
    println!("{}", ui::success(&format!("Connected to cluster ({}).", version)));
    Ok(cluster)
}

/// The first Ctrl+C cancels the scan. Once the handle is cancelled (by
/// that interrupt or because the run is over) the next one exits with the
/// conventional status 130.
fn spawn_interrupt_listener(cancel: CancelHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if interrupt_should_exit(&cancel) {
                eprintln!("{}", ui::error("Interrupted."));
                process::exit(130);
            }
        }
    })
}

/// Cancel on the first interrupt; `true` once there is nothing left to cancel.
fn interrupt_should_exit(cancel: &CancelHandle) -> bool {
    if cancel.is_cancelled() {
        return true;
    }
    cancel.cancel();
    false
}

fn emit(
    result: &ScanResult,
    format: ReportFormat,
    options: &ScanOptions,
    log: &dyn ScanLog,
) -> Result<()> {
    if format == ReportFormat::Text {
        print!("{}", render_findings(result));
        return Ok(());
    }

    let data = format.formatter().format(result)?;
    let path = format.output_path(&options.output_dir, "scan-results");
    save(&data, &path)?;
    log.info(&format!("Wrote {} bytes to {}", data.len(), path.display()));
    println!(
        "{}",
        ui::success(&format!("Report saved to {}", path.display()))
    );
    Ok(())
}

/// Terminal listing of the findings followed by statistics.
pub fn render_findings(result: &ScanResult) -> String {
    let mut out = String::new();

    if result.is_empty() {
        let _ = writeln!(
            out,
            "\n{}",
            ui::success("No security issues found! Your cluster is hardened.")
        );
        return out;
    }

    let _ = writeln!(out, "\n{}\n", ui::header("Security Findings Summary"));
    for issue in &result.issues {
        let _ = writeln!(
            out,
            "[{}] {}",
            ui::severity(issue.severity),
            ui::header(&issue.title)
        );
        let _ = writeln!(out, "   Resource: {}", issue.resource_identifier());
        let _ = writeln!(out, "   Details:  {}", issue.description);
        let _ = writeln!(out, "   Fix:      {}\n", issue.remediation);
    }

    let _ = writeln!(out, "{}", ui::header("Scan Statistics"));
    let _ = writeln!(out, "{:<16} {}", "Total Issues:", result.stats.total_issues);
    for severity in Severity::ALL {
        let label = format!("{}:", severity);
        let _ = writeln!(out, "{:<16} {}", label, result.stats.count(severity));
    }
    let _ = writeln!(
        out,
        "{:<16} {}",
        "Resources:",
        result.stats.resources_scanned
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::types::tests::issue;

    #[test]
    fn test_first_interrupt_cancels_second_exits() {
        let (ctx, cancel) = ScanContext::with_cancel();
        assert!(!interrupt_should_exit(&cancel));
        assert!(ctx.is_cancelled());
        assert!(interrupt_should_exit(&cancel));
    }

    #[test]
    fn test_interrupt_after_run_exits() {
        let (_ctx, cancel) = ScanContext::with_cancel();
        let listener = cancel.clone();
        // handle_scan cancels once the engine has returned
        cancel.cancel();
        assert!(interrupt_should_exit(&listener));
    }

    #[test]
    fn test_render_empty() {
        colored::control::set_override(false);
        let out = render_findings(&ScanResult::new());
        assert!(out.contains("No security issues found! Your cluster is hardened."));
        assert!(!out.contains("Scan Statistics"));
    }

    #[test]
    fn test_render_findings_lists_issues_and_stats() {
        colored::control::set_override(false);
        let mut result = ScanResult::new();
        result.record(issue("HK-001", Severity::Critical));
        result.stats.resources_scanned = 4;
        let out = render_findings(&result);

        assert!(out.contains("[CRITICAL] Title HK-001"));
        assert!(out.contains("   Resource: default/web"));
        assert!(out.contains("   Fix:      fix it"));
        assert!(out.contains("Total Issues:    1"));
        assert!(out.contains("CRITICAL:        1"));
        assert!(out.contains("INFO:            0"));
        assert!(out.contains("Resources:       4"));

        let critical = out.find("CRITICAL:").unwrap();
        let info = out.find("INFO:").unwrap();
        assert!(critical < info);
    }
}
