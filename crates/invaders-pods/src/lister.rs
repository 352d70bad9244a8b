//! Source of real pods.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::ListerResult;

/// Cluster-facing lookups used when sourcing a round.
///
/// Implementations should only report pods that are running and not being
/// deleted.
#[async_trait]
pub trait PodLister: Send + Sync {
    /// Whether `namespace` exists.
    async fn namespace_exists(&self, namespace: &str) -> ListerResult<bool>;

    /// Names of running pods in `namespace`.
    async fn list_running_pods(&self, namespace: &str) -> ListerResult<Vec<String>>;
}

/// Lister over a fixed `namespace -> pod names` inventory.
#[derive(Debug, Clone, Default)]
pub struct StaticPodLister {
    inventory: BTreeMap<String, Vec<String>>,
}

impl StaticPodLister {
    pub fn new(inventory: BTreeMap<String, Vec<String>>) -> Self {
        Self { inventory }
    }

    pub fn with_namespace<I, S>(mut self, namespace: &str, pods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inventory
            .insert(namespace.to_string(), pods.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl PodLister for StaticPodLister {
    async fn namespace_exists(&self, namespace: &str) -> ListerResult<bool> {
        Ok(self.inventory.contains_key(namespace))
    }

    async fn list_running_pods(&self, namespace: &str) -> ListerResult<Vec<String>> {
        Ok(self.inventory.get(namespace).cloned().unwrap_or_default())
    }
}
