//! Read-only cluster access for scanners.
//!
//! Scanners never see a raw `kube::Client`; they go through the
//! [`ClusterAccessor`] trait, which returns just the security-relevant view
//! of each resource. [`KubeCluster`] is the live implementation.
//!
//! # Prerequisites
//!
//! - Valid kubeconfig (uses default context or specified context)
//! - RBAC permissions to list pods
//!
//! # Example
//!
//! ```rust,ignore
//! use hardena::policy::cluster::{ClusterAccessor, KubeCluster};
//!
//! let cluster = KubeCluster::new().await?;
//! for pod in cluster.list_pods("default").await? {
//!     println!("{}/{}: {} containers", pod.namespace, pod.name, pod.containers.len());
//! }
//! ```

use crate::error::ClusterError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Container, Pod};
use kube::{
    Client, Config,
    api::{Api, ListParams},
};

/// Security settings of a single container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainerSecurityView {
    /// Container name
    pub name: String,
    /// `securityContext.privileged`
    pub privileged: Option<bool>,
    /// `securityContext.readOnlyRootFilesystem`
    pub read_only_root_filesystem: Option<bool>,
    /// `securityContext.runAsNonRoot`
    pub run_as_non_root: Option<bool>,
}

/// Security settings of a pod and its containers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PodSecurityView {
    /// Pod name
    pub name: String,
    /// Namespace
    pub namespace: String,
    /// Pod-level `securityContext.runAsNonRoot`
    pub run_as_non_root: Option<bool>,
    /// Regular containers (init containers are not audited)
    pub containers: Vec<ContainerSecurityView>,
}

/// Read-only view of the cluster used by scanners.
///
/// An empty `namespace` means all namespaces.
#[async_trait]
pub trait ClusterAccessor: Send + Sync {
    /// List pods in the namespace scope.
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSecurityView>, ClusterError>;
}

/// Kubernetes API backed accessor.
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    /// Create a client using the default kubeconfig.
    pub async fn new() -> Result<Self, ClusterError> {
        let config = Config::infer().await?;
        let client = Client::try_from(config)?;
        Ok(Self { client })
    }

    /// Create a client with a specific kubeconfig context.
    pub async fn with_context(context: &str) -> Result<Self, ClusterError> {
        let kubeconfig = kube::config::Kubeconfig::read()?;
        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &kube::config::KubeConfigOptions {
                context: Some(context.to_string()),
                ..Default::default()
            },
        )
        .await?;
        let client = Client::try_from(config)?;
        Ok(Self { client })
    }

    /// Connect with the named context, or the current one when `None`.
    pub async fn connect(context: Option<&str>) -> Result<Self, ClusterError> {
        match context {
            Some(ctx) if !ctx.is_empty() => Self::with_context(ctx).await,
            _ => Self::new().await,
        }
    }

    /// Ask the API server for its version; returns the git version string.
    pub async fn check_connectivity(&self) -> Result<String, ClusterError> {
        let info = self
            .client
            .apiserver_version()
            .await
            .map_err(|e| ClusterError::ApiError(format!("Cluster unreachable: {}", e)))?;
        Ok(info.git_version)
    }
}

#[async_trait]
impl ClusterAccessor for KubeCluster {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSecurityView>, ClusterError> {
        let pods: Api<Pod> = if namespace.is_empty() {
            Api::all(self.client.clone())
        } else {
            Api::namespaced(self.client.clone(), namespace)
        };

        let pod_list = pods
            .list(&ListParams::default())
            .await
            .map_err(|e| ClusterError::ApiError(format!("Failed to list pods: {}", e)))?;

        Ok(pod_list.items.into_iter().filter_map(pod_to_view).collect())
    }
}

/// Reduce a pod to its security view. Pods without a spec are skipped.
pub fn pod_to_view(pod: Pod) -> Option<PodSecurityView> {
    let metadata = pod.metadata;
    let spec = pod.spec?;

    Some(PodSecurityView {
        name: metadata.name.unwrap_or_default(),
        namespace: metadata.namespace.unwrap_or_else(|| "default".to_string()),
        run_as_non_root: spec
            .security_context
            .as_ref()
            .and_then(|sc| sc.run_as_non_root),
        containers: spec.containers.iter().map(container_to_view).collect(),
    })
}

fn container_to_view(container: &Container) -> ContainerSecurityView {
    let sc = container.security_context.as_ref();
    ContainerSecurityView {
        name: container.name.clone(),
        privileged: sc.and_then(|sc| sc.privileged),
        read_only_root_filesystem: sc.and_then(|sc| sc.read_only_root_filesystem),
        run_as_non_root: sc.and_then(|sc| sc.run_as_non_root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pod(value: serde_json::Value) -> Pod {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_pod_to_view_reads_security_contexts() {
        let p = pod(json!({
            "metadata": { "name": "web", "namespace": "shop" },
            "spec": {
                "securityContext": { "runAsNonRoot": true },
                "containers": [
                    {
                        "name": "app",
                        "securityContext": {
                            "privileged": true,
                            "readOnlyRootFilesystem": false
                        }
                    },
                    { "name": "sidecar" }
                ],
                "initContainers": [
                    { "name": "init", "securityContext": { "privileged": true } }
                ]
            }
        }));

        let view = pod_to_view(p).unwrap();
        assert_eq!(view.name, "web");
        assert_eq!(view.namespace, "shop");
        assert_eq!(view.run_as_non_root, Some(true));
        assert_eq!(view.containers.len(), 2);
        assert_eq!(view.containers[0].privileged, Some(true));
        assert_eq!(view.containers[0].read_only_root_filesystem, Some(false));
        assert_eq!(view.containers[0].run_as_non_root, None);
        assert_eq!(
            view.containers[1],
            ContainerSecurityView {
                name: "sidecar".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_pod_without_spec_is_skipped() {
        let p = pod(json!({ "metadata": { "name": "ghost" } }));
        assert!(pod_to_view(p).is_none());
    }

    #[test]
    fn test_missing_namespace_defaults() {
        let p = pod(json!({
            "metadata": { "name": "web" },
            "spec": { "containers": [{ "name": "app" }] }
        }));
        assert_eq!(pod_to_view(p).unwrap().namespace, "default");
    }
}
