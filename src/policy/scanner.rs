//! Scanner capability, run context and the scanner registry.

use crate::error::ScanError;
use crate::policy::cluster::ClusterAccessor;
use crate::policy::pod::PodScanner;
use crate::policy::types::Issue;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Cancellation and deadline shared by every scanner call of one run.
#[derive(Debug, Clone, Default)]
pub struct ScanContext {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels the [`ScanContext`] it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether `cancel` has been called on this handle or a clone of it.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl ScanContext {
    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context plus the handle that cancels it.
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancel: Some(rx),
            deadline: None,
        };
        (ctx, CancelHandle { tx: Arc::new(tx) })
    }

    /// Cancel automatically once `timeout` has elapsed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Whether the run should stop now.
    pub fn is_cancelled(&self) -> bool {
        let signalled = self.cancel.as_ref().is_some_and(|rx| *rx.borrow());
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        signalled || expired
    }

    /// Resolves once the context is cancelled; pends forever otherwise.
    pub async fn cancelled(&self) {
        let signal = async {
            match self.cancel.clone() {
                Some(mut rx) => loop {
                    if *rx.borrow_and_update() {
                        return;
                    }
                    if rx.changed().await.is_err() {
                        // Handle dropped without cancelling
                        std::future::pending::<()>().await;
                    }
                },
                None => std::future::pending::<()>().await,
            }
        };

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = signal => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => signal.await,
        }
    }

    /// Drive `fut` unless the context is cancelled first.
    ///
    /// Returns `None` when cancellation wins; `fut` is dropped unfinished.
    pub async fn run_until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;

            _ = self.cancelled() => None,
            output = fut => Some(output),
        }
    }
}

/// What one scanner found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    pub issues: Vec<Issue>,
    /// Number of resources examined (best effort).
    pub resources_scanned: usize,
}

/// A rule-evaluation unit for one resource kind.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Identifier of the resource kind this scanner covers (e.g. "pod").
    fn kind(&self) -> &str;

    /// Audit the resources in `namespace` (empty = all namespaces).
    ///
    /// A failing accessor call returns an error and no partial issues.
    async fn scan(
        &self,
        ctx: &ScanContext,
        namespace: &str,
        cluster: &dyn ClusterAccessor,
    ) -> Result<ScanOutput, ScanError>;
}

/// Builds a scanner instance.
pub type ScannerConstructor = Box<dyn Fn() -> Box<dyn Scanner> + Send + Sync>;

/// Ordered mapping from scanner kind to constructor.
///
/// Registration order is execution order.
#[derive(Default)]
pub struct ScannerRegistry {
    entries: Vec<(String, ScannerConstructor)>,
}

impl ScannerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled-in scanners.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("pod", || Box::new(PodScanner::new()));
        registry
    }

    /// Register a constructor. Re-registering a kind replaces it in place.
    pub fn register<F>(&mut self, kind: impl Into<String>, ctor: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Scanner> + Send + Sync + 'static,
    {
        let kind = kind.into();
        let ctor: ScannerConstructor = Box::new(ctor);
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = ctor,
            None => self.entries.push((kind, ctor)),
        }
        self
    }

    /// Registered kinds in order.
    pub fn kinds(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Instantiate every registered scanner in order.
    pub fn instantiate(&self) -> Vec<Box<dyn Scanner>> {
        self.entries.iter().map(|(_, ctor)| ctor()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::cluster::PodSecurityView;
    use crate::error::ClusterError;

    struct Named(&'static str);

    #[async_trait]
    impl Scanner for Named {
        fn kind(&self) -> &str {
            self.0
        }

        async fn scan(
            &self,
            _ctx: &ScanContext,
            _namespace: &str,
            _cluster: &dyn ClusterAccessor,
        ) -> Result<ScanOutput, ScanError> {
            Ok(ScanOutput::default())
        }
    }

    struct NoCluster;

    #[async_trait]
    impl ClusterAccessor for NoCluster {
        async fn list_pods(&self, _ns: &str) -> Result<Vec<PodSecurityView>, ClusterError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_builtin_registry() {
        let registry = ScannerRegistry::builtin();
        assert_eq!(registry.kinds(), vec!["pod"]);
        let scanners = registry.instantiate();
        assert_eq!(scanners.len(), 1);
        assert_eq!(scanners[0].kind(), "pod");
    }

    #[test]
    fn test_register_appends_and_replaces_in_place() {
        let mut registry = ScannerRegistry::builtin();
        registry
            .register("deployment", || Box::new(Named("deployment")))
            .register("service", || Box::new(Named("service")));
        registry.register("pod", || Box::new(Named("pod-v2")));

        assert_eq!(registry.kinds(), vec!["pod", "deployment", "service"]);
        let scanners = registry.instantiate();
        assert_eq!(scanners[0].kind(), "pod-v2");
        assert_eq!(scanners[2].kind(), "service");
    }

    #[tokio::test]
    async fn test_registered_scanner_runs() {
        let mut registry = ScannerRegistry::new();
        registry.register("noop", || Box::new(Named("noop")));
        let scanner = &registry.instantiate()[0];
        let out = scanner
            .scan(&ScanContext::background(), "", &NoCluster)
            .await
            .unwrap();
        assert!(out.issues.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_handle_cancels_context() {
        let (ctx, handle) = ScanContext::with_cancel();
        assert!(!ctx.is_cancelled());
        handle.cancel();
        assert!(ctx.is_cancelled());
        // Resolves immediately once cancelled
        ctx.cancelled().await;
    }

    #[tokio::test]
    async fn test_timeout_cancels_context() {
        let ctx = ScanContext::background().with_timeout(Duration::from_millis(10));
        ctx.cancelled().await;
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_background_is_never_cancelled() {
        assert!(!ScanContext::background().is_cancelled());
    }

    #[tokio::test]
    async fn test_run_until_cancelled_stops_a_stalled_future() {
        let ctx = ScanContext::background().with_timeout(Duration::from_millis(10));
        let out = ctx
            .run_until_cancelled(std::future::pending::<u32>())
            .await;
        assert_eq!(out, None);
    }

    #[tokio::test]
    async fn test_run_until_cancelled_passes_output_through() {
        let ctx = ScanContext::background().with_timeout(Duration::from_secs(60));
        assert_eq!(ctx.run_until_cancelled(async { 7 }).await, Some(7));

        let (ctx, handle) = ScanContext::with_cancel();
        handle.cancel();
        assert_eq!(ctx.run_until_cancelled(async { 7 }).await, None);
    }

    #[test]
    fn test_cloned_handles_share_state() {
        let (ctx, handle) = ScanContext::with_cancel();
        let listener = handle.clone();
        assert!(!listener.is_cancelled());

        handle.cancel();
        assert!(listener.is_cancelled());
        assert!(ctx.is_cancelled());
    }
}
