//! Pod security scanner.
//!
//! Each rule is independent, evaluated per container, and emits at most one
//! issue per (rule, container) pair:
//!
//! | Id     | Severity | Fires when                                          |
//! |--------|----------|-----------------------------------------------------|
//! | HK-001 | CRITICAL | `privileged` is explicitly `true`                   |
//! | HK-002 | MEDIUM   | `readOnlyRootFilesystem` is not explicitly `true`   |
//! | HK-003 | HIGH     | effective `runAsNonRoot` is not `true`              |

use crate::error::ScanError;
use crate::policy::cluster::{ClusterAccessor, ContainerSecurityView, PodSecurityView};
use crate::policy::scanner::{ScanContext, ScanOutput, Scanner};
use crate::policy::types::{Issue, Severity};
use async_trait::async_trait;

/// Category label shared by all pod rules.
pub const POD_SECURITY: &str = "Pod Security";

/// A check applied to every container of every pod.
pub trait ContainerRule: Send + Sync {
    /// Rule identifier (e.g. "HK-001").
    fn id(&self) -> &'static str;

    /// Return an issue if the container violates the rule.
    fn evaluate(
        &self,
        pod: &PodSecurityView,
        container: &ContainerSecurityView,
    ) -> Option<Issue>;
}

fn pod_issue(
    id: &str,
    title: &str,
    severity: Severity,
    pod: &PodSecurityView,
    description: String,
    remediation: &str,
) -> Issue {
    Issue {
        id: id.to_string(),
        title: title.to_string(),
        description,
        severity,
        resource: pod.name.clone(),
        namespace: pod.namespace.clone(),
        remediation: remediation.to_string(),
        category: POD_SECURITY.to_string(),
    }
}

/// HK-001: container runs in privileged mode.
pub struct PrivilegedContainerRule;

impl ContainerRule for PrivilegedContainerRule {
    fn id(&self) -> &'static str {
        "HK-001"
    }

    fn evaluate(
        &self,
        pod: &PodSecurityView,
        container: &ContainerSecurityView,
    ) -> Option<Issue> {
        // Unset means non-privileged
        if container.privileged != Some(true) {
            return None;
        }
        Some(pod_issue(
            self.id(),
            "Privileged Container Detected",
            Severity::Critical,
            pod,
            format!(
                "Pod {} in namespace {} has a privileged container: {}",
                pod.name, pod.namespace, container.name
            ),
            "Remove 'privileged: true' from securityContext.",
        ))
    }
}

/// HK-002: root filesystem is writable.
pub struct WritableRootFilesystemRule;

impl ContainerRule for WritableRootFilesystemRule {
    fn id(&self) -> &'static str {
        "HK-002"
    }

    fn evaluate(
        &self,
        pod: &PodSecurityView,
        container: &ContainerSecurityView,
    ) -> Option<Issue> {
        // Only exists on the container securityContext; unset means writable
        if container.read_only_root_filesystem == Some(true) {
            return None;
        }
        Some(pod_issue(
            self.id(),
            "Writable Root Filesystem",
            Severity::Medium,
            pod,
            format!(
                "Pod {} in namespace {} has a container with a writable root filesystem: {}",
                pod.name, pod.namespace, container.name
            ),
            "Set 'readOnlyRootFilesystem: true' in securityContext.",
        ))
    }
}

/// HK-003: container may run as root.
pub struct RunAsRootRule;

impl ContainerRule for RunAsRootRule {
    fn id(&self) -> &'static str {
        "HK-003"
    }

    fn evaluate(
        &self,
        pod: &PodSecurityView,
        container: &ContainerSecurityView,
    ) -> Option<Issue> {
        // Container-level overrides pod-level
        let effective = container.run_as_non_root.or(pod.run_as_non_root);
        if effective == Some(true) {
            return None;
        }
        Some(pod_issue(
            self.id(),
            "Run As Root Allowed",
            Severity::High,
            pod,
            format!(
                "Pod {} in namespace {} does not enforce 'runAsNonRoot': {}",
                pod.name, pod.namespace, container.name
            ),
            "Set 'runAsNonRoot: true' in securityContext.",
        ))
    }
}

/// Audits pod and container security contexts.
pub struct PodScanner {
    rules: Vec<Box<dyn ContainerRule>>,
}

impl Default for PodScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl PodScanner {
    /// Scanner with the built-in rules in evaluation order.
    pub fn new() -> Self {
        Self::with_rules(vec![
            Box::new(PrivilegedContainerRule),
            Box::new(WritableRootFilesystemRule),
            Box::new(RunAsRootRule),
        ])
    }

    /// Scanner with a custom rule set.
    pub fn with_rules(rules: Vec<Box<dyn ContainerRule>>) -> Self {
        Self { rules }
    }

    /// Rule ids in evaluation order.
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Evaluate every rule against every container of the given pods.
    pub fn evaluate(&self, pods: &[PodSecurityView]) -> Vec<Issue> {
        let mut issues = Vec::new();
        for pod in pods {
            for container in &pod.containers {
                issues.extend(self.rules.iter().filter_map(|r| r.evaluate(pod, container)));
            }
        }
        issues
    }
}

#[async_trait]
impl Scanner for PodScanner {
    fn kind(&self) -> &str {
        "pod"
    }

    async fn scan(
        &self,
        _ctx: &ScanContext,
        namespace: &str,
        cluster: &dyn ClusterAccessor,
    ) -> Result<ScanOutput, ScanError> {
        let pods = cluster.list_pods(namespace).await?;
        Ok(ScanOutput {
            issues: self.evaluate(&pods),
            resources_scanned: pods.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;

    fn container(
        privileged: Option<bool>,
        read_only: Option<bool>,
        non_root: Option<bool>,
    ) -> ContainerSecurityView {
        ContainerSecurityView {
            name: "app".to_string(),
            privileged,
            read_only_root_filesystem: read_only,
            run_as_non_root: non_root,
        }
    }

    fn pod(pod_non_root: Option<bool>, containers: Vec<ContainerSecurityView>) -> PodSecurityView {
        PodSecurityView {
            name: "web".to_string(),
            namespace: "shop".to_string(),
            run_as_non_root: pod_non_root,
            containers,
        }
    }

    fn ids(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_privileged_container_fires_once() {
        let p = pod(None, vec![container(Some(true), Some(true), Some(true))]);
        let issues = PodScanner::new().evaluate(&[p]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "HK-001");
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].resource, "web");
        assert_eq!(issues[0].namespace, "shop");
        assert_eq!(issues[0].category, POD_SECURITY);
    }

    #[test]
    fn test_privileged_false_or_unset_is_ok() {
        let scanner = PodScanner::new();
        for flag in [None, Some(false)] {
            let p = pod(None, vec![container(flag, Some(true), Some(true))]);
            assert!(scanner.evaluate(&[p]).is_empty());
        }
    }

    #[test]
    fn test_bare_container_fails_closed() {
        let p = pod(None, vec![container(None, None, None)]);
        let issues = PodScanner::new().evaluate(&[p]);
        assert_eq!(ids(&issues), vec!["HK-002", "HK-003"]);
        assert_eq!(issues[1].severity, Severity::High);
        assert_eq!(issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_read_only_root_fs_suppresses_hk002() {
        let p = pod(None, vec![container(None, Some(true), None)]);
        let issues = PodScanner::new().evaluate(&[p]);
        assert!(!ids(&issues).contains(&"HK-002"));
    }

    #[test]
    fn test_read_only_false_fires() {
        let p = pod(Some(true), vec![container(None, Some(false), None)]);
        assert_eq!(ids(&PodScanner::new().evaluate(&[p])), vec!["HK-002"]);
    }

    #[test]
    fn test_pod_level_run_as_non_root_is_inherited() {
        let p = pod(Some(true), vec![container(None, Some(true), None)]);
        assert!(PodScanner::new().evaluate(&[p]).is_empty());
    }

    #[test]
    fn test_container_level_overrides_pod_level() {
        let p = pod(Some(true), vec![container(None, Some(true), Some(false))]);
        assert_eq!(ids(&PodScanner::new().evaluate(&[p])), vec!["HK-003"]);

        let p = pod(Some(false), vec![container(None, Some(true), Some(true))]);
        assert!(PodScanner::new().evaluate(&[p]).is_empty());
    }

    #[test]
    fn test_rules_fire_per_container() {
        let mut second = container(Some(true), None, None);
        second.name = "sidecar".to_string();
        let p = pod(None, vec![container(Some(true), None, None), second]);
        let issues = PodScanner::new().evaluate(&[p]);

        assert_eq!(
            ids(&issues),
            vec!["HK-001", "HK-002", "HK-003", "HK-001", "HK-002", "HK-003"]
        );
        assert!(issues[3].description.contains("sidecar"));
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(PodScanner::new().rule_ids(), vec!["HK-001", "HK-002", "HK-003"]);
    }

    struct FixedCluster(Result<Vec<PodSecurityView>, String>);

    #[async_trait]
    impl ClusterAccessor for FixedCluster {
        async fn list_pods(&self, _ns: &str) -> Result<Vec<PodSecurityView>, ClusterError> {
            self.0.clone().map_err(ClusterError::ApiError)
        }
    }

    #[tokio::test]
    async fn test_scan_counts_pods() {
        let cluster = FixedCluster(Ok(vec![
            pod(None, vec![container(None, Some(true), Some(true))]),
            pod(None, vec![container(Some(true), Some(true), Some(true))]),
        ]));
        let out = PodScanner::new()
            .scan(&ScanContext::background(), "", &cluster)
            .await
            .unwrap();
        assert_eq!(out.resources_scanned, 2);
        assert_eq!(ids(&out.issues), vec!["HK-001"]);
    }

    #[tokio::test]
    async fn test_scan_propagates_list_failure() {
        let cluster = FixedCluster(Err("connection refused".to_string()));
        let err = PodScanner::new()
            .scan(&ScanContext::background(), "shop", &cluster)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
