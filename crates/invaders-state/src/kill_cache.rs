//! Dedup set of pods the player has already killed.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::debug;

use crate::types::Pod;

/// Tracks killed pods by `(namespace, name)`.
///
/// Entries are never evicted; the set lives as long as the process.
#[derive(Debug, Default)]
pub struct KillCache {
    pods: Mutex<HashSet<(String, String)>>,
}

impl KillCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pod as killed.
    ///
    /// Returns `true` only for the first add of a pod; later adds are no-ops.
    pub fn add(&self, pod: &Pod) -> bool {
        let inserted = self.lock().insert(pod.key());
        if inserted {
            debug!(namespace = %pod.namespace, name = %pod.name, "pod recorded as killed");
        }
        inserted
    }

    pub fn is_killed(&self, pod: &Pod) -> bool {
        self.lock().contains(&pod.key())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned set is still a valid set; inserts are single operations.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<(String, String)>> {
        self.pods.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
