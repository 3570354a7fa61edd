//! Policy engine.
//!
//! Runs the registered scanners against one namespace scope and folds their
//! findings into a [`ScanResult`]. A failing scanner is reported through the
//! [`ScanLog`] and skipped; it never aborts the run or drops issues that were
//! already collected. Only cancellation ends a run early.

use crate::error::{RunError, ScanError};
use crate::logging::ScanLog;
use crate::policy::cluster::ClusterAccessor;
use crate::policy::scanner::{ScanContext, ScanOutput, Scanner, ScannerRegistry};
use crate::policy::types::ScanResult;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;

/// Coordinates the scanning process.
pub struct Engine {
    cluster: Arc<dyn ClusterAccessor>,
    scanners: Vec<Box<dyn Scanner>>,
}

impl Engine {
    /// Engine with an explicit, ordered scanner sequence.
    pub fn new(cluster: Arc<dyn ClusterAccessor>, scanners: Vec<Box<dyn Scanner>>) -> Self {
        Self { cluster, scanners }
    }

    /// Engine with every scanner of the registry, in registration order.
    pub fn from_registry(cluster: Arc<dyn ClusterAccessor>, registry: &ScannerRegistry) -> Self {
        Self::new(cluster, registry.instantiate())
    }

    /// Engine with the compiled-in scanners.
    pub fn builtin(cluster: Arc<dyn ClusterAccessor>) -> Self {
        Self::from_registry(cluster, &ScannerRegistry::builtin())
    }

    /// Kinds of the wired scanners in execution order.
    pub fn scanner_kinds(&self) -> Vec<&str> {
        self.scanners.iter().map(|s| s.kind()).collect()
    }

    /// Run every scanner sequentially.
    ///
    /// `namespace` empty means all namespaces. On cancellation the issues
    /// collected so far are returned inside [`RunError::Cancelled`].
    pub async fn run(
        &self,
        ctx: &ScanContext,
        namespace: &str,
        log: &dyn ScanLog,
    ) -> Result<ScanResult, RunError> {
        let mut result = ScanResult::new();
        let cluster = self.cluster.as_ref();

        for scanner in &self.scanners {
            if ctx.is_cancelled() {
                return Err(cancelled(result, log));
            }

            log.info(&format!("Running {} scanner", scanner.kind()));
            let outcome = ctx
                .run_until_cancelled(scanner.scan(ctx, namespace, cluster))
                .await;

            match outcome {
                Some(outcome) => absorb(&mut result, scanner.as_ref(), outcome, log),
                None => return Err(cancelled(result, log)),
            }
        }

        log.info(&format!(
            "Scan completed: {} issue(s) across {} resource(s)",
            result.stats.total_issues, result.stats.resources_scanned
        ));
        Ok(result)
    }

    /// Run every scanner concurrently.
    ///
    /// Each scanner's output is held separately and aggregated once, in
    /// registration order, after all scanners finish or the context is
    /// cancelled. The result equals the one `run` would produce.
    pub async fn run_concurrent(
        &self,
        ctx: &ScanContext,
        namespace: &str,
        log: &dyn ScanLog,
    ) -> Result<ScanResult, RunError> {
        let cluster = self.cluster.as_ref();
        let mut slots: Vec<Option<Result<ScanOutput, ScanError>>> =
            (0..self.scanners.len()).map(|_| None).collect();
        let mut was_cancelled = ctx.is_cancelled();

        if !was_cancelled {
            let mut pending: FuturesUnordered<_> = self
                .scanners
                .iter()
                .enumerate()
                .map(|(idx, scanner)| async move {
                    (idx, scanner.scan(ctx, namespace, cluster).await)
                })
                .collect();

            loop {
                tokio::select! {
                    biased;

                    _ = ctx.cancelled() => {
                        was_cancelled = true;
                        break;
                    }
                    next = pending.next() => match next {
                        Some((idx, outcome)) => slots[idx] = Some(outcome),
                        None => break,
                    },
                }
            }
        }

        // Single-threaded fan-in
        let mut result = ScanResult::new();
        for (scanner, slot) in self.scanners.iter().zip(slots) {
            if let Some(outcome) = slot {
                absorb(&mut result, scanner.as_ref(), outcome, log);
            }
        }

        if was_cancelled {
            return Err(cancelled(result, log));
        }
        log.info(&format!(
            "Scan completed: {} issue(s) across {} resource(s)",
            result.stats.total_issues, result.stats.resources_scanned
        ));
        Ok(result)
    }
}

fn absorb(
    result: &mut ScanResult,
    scanner: &dyn Scanner,
    outcome: Result<ScanOutput, ScanError>,
    log: &dyn ScanLog,
) {
    match outcome {
        Ok(output) => {
            result.stats.resources_scanned += output.resources_scanned;
            for issue in output.issues {
                result.record(issue);
            }
        }
        Err(e) => log.scanner_failed(scanner.kind(), &e),
    }
}

fn cancelled(partial: ScanResult, log: &dyn ScanLog) -> RunError {
    log.warn(&format!(
        "Scan cancelled; returning {} issue(s) collected so far",
        partial.stats.total_issues
    ));
    RunError::Cancelled {
        partial: Box::new(partial),
    }
}
