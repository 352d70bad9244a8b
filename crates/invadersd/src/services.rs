//! Component assembly.
//!
//! Every long-lived component is built exactly once here and handed to the
//! commands by reference. Nothing is global.

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};

use invaders_core::InvadersConfig;
use invaders_health::MonitorManager;
use invaders_pods::{PodLister, StaticPodLister, fake_pods, source_pods};
use invaders_state::{HighscoreLedger, KillCache, Pod, open_ledger};

pub struct Services {
    pub config: InvadersConfig,
    pub monitors: MonitorManager,
    pub kills: KillCache,
    pub ledger: Arc<dyn HighscoreLedger>,
    pub lister: Arc<dyn PodLister>,
}

impl Services {
    pub fn from_config(config: InvadersConfig) -> anyhow::Result<Self> {
        let monitors =
            MonitorManager::from_settings(&config.monitor).context("build monitor manager")?;
        let ledger = open_ledger(&config.ledger).context("open highscore ledger")?;
        let lister: Arc<dyn PodLister> = Arc::new(StaticPodLister::new(config.inventory.clone()));

        if config.game.enable_kube {
            info!(namespaces = ?config.game.namespaces, "sourcing real pods from inventory");
        } else {
            info!("pod sourcing disabled, running in standalone mode");
        }

        Ok(Self {
            config,
            monitors,
            kills: KillCache::new(),
            ledger,
            lister,
        })
    }

    /// Pods for the next round. `requested` is capped at `max_pod_count`.
    pub async fn next_round(&self, requested: usize) -> Vec<Pod> {
        let count = self.config.game.clamp_count(requested);
        if !self.config.game.enable_kube {
            return fake_pods(count);
        }
        source_pods(count, &self.config.game.namespaces, self.lister.as_ref()).await
    }

    /// Record a kill. Returns `false` if the pod was already killed.
    pub fn record_kill(&self, pod: &Pod) -> bool {
        let first = self.kills.add(pod);
        if !first {
            debug!(namespace = %pod.namespace, name = %pod.name, "pod already killed, skipping");
        }
        first
    }

    pub fn shutdown(&self) {
        self.monitors.stop_all();
    }
}

/// Accept only absolute `http`/`https` URLs with a host.
pub fn validate_monitor_url(raw: &str) -> anyhow::Result<()> {
    let parsed = url::Url::parse(raw).with_context(|| format!("invalid monitor URL {raw}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("invalid monitor URL {raw}: scheme must be http or https");
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        anyhow::bail!("invalid monitor URL {raw}: missing host");
    }
    Ok(())
}
