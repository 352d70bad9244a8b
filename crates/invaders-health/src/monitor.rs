//! URL monitor manager, one cancellable probe task per monitored URL.
//!
//! The manager owns a registry holding both the cancellation handle and the
//! status snapshot of every monitor. The two maps live behind one mutex so
//! a monitor and its status are inserted and removed together; the lock is
//! never held across an `.await`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use invaders_core::MonitorSettings;

use crate::checker::HttpProber;
use crate::error::{MonitorError, MonitorResult};

/// Process-unique monitor identifier (UUID v4, hyphenated).
pub type MonitorId = String;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Last observed reachability of a monitored URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorState {
    /// No probe has completed yet.
    Unknown,
    Up,
    Down,
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorState::Unknown => f.write_str("unknown"),
            MonitorState::Up => f.write_str("up"),
            MonitorState::Down => f.write_str("down"),
        }
    }
}

/// Read-only snapshot of a monitor, handed out by [`MonitorManager::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorStatus {
    pub url: String,
    pub status: MonitorState,
    pub id: MonitorId,
}

struct MonitorTask {
    url: String,
    cancel: CancellationToken,
}

#[derive(Default)]
struct Registry {
    tasks: HashMap<MonitorId, MonitorTask>,
    statuses: HashMap<MonitorId, MonitorStatus>,
}

type SharedRegistry = Arc<Mutex<Registry>>;

fn lock(registry: &SharedRegistry) -> MutexGuard<'_, Registry> {
    registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Manages URL monitors and their status snapshots.
///
/// Construct once at startup and share by reference or `Arc`. Dropping the
/// manager cancels every monitor it still owns.
pub struct MonitorManager {
    registry: SharedRegistry,
    prober: HttpProber,
    interval: Duration,
}

impl MonitorManager {
    /// Create a manager probing every 5 seconds.
    pub fn new(prober: HttpProber) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            prober,
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Build a manager from the `[monitor]` config section.
    pub fn from_settings(settings: &MonitorSettings) -> MonitorResult<Self> {
        let prober = HttpProber::new(settings.timeout())?;
        Ok(Self::new(prober).with_interval(settings.interval()))
    }

    /// Override the probe interval. A zero interval keeps the 5 second default.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        if interval.is_zero() {
            warn!(fallback = ?DEFAULT_INTERVAL, "zero probe interval, using default");
            self.interval = DEFAULT_INTERVAL;
        } else {
            self.interval = interval;
        }
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start monitoring `url` and return the new monitor's ID.
    ///
    /// Returns immediately; the first probe runs in the background and the
    /// status reads `unknown` until it completes. URL validation is the
    /// caller's job.
    pub fn start(&self, url: &str) -> MonitorResult<MonitorId> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| MonitorError::NoRuntime)?;

        let id = Uuid::new_v4().to_string();
        let cancel = CancellationToken::new();

        {
            let mut registry = lock(&self.registry);
            registry.tasks.insert(
                id.clone(),
                MonitorTask {
                    url: url.to_string(),
                    cancel: cancel.clone(),
                },
            );
            registry.statuses.insert(
                id.clone(),
                MonitorStatus {
                    url: url.to_string(),
                    status: MonitorState::Unknown,
                    id: id.clone(),
                },
            );
        }

        runtime.spawn(run_probe_loop(
            id.clone(),
            url.to_string(),
            self.prober.clone(),
            self.registry.clone(),
            cancel,
            self.interval,
        ));

        info!(%id, %url, "monitor started");
        Ok(id)
    }

    /// Stop a monitor and forget its status.
    ///
    /// Cancellation is cooperative: the task notices at its next wake-up,
    /// and this call does not wait for it.
    pub fn stop(&self, id: &str) -> MonitorResult<()> {
        let task = {
            let mut registry = lock(&self.registry);
            let task = registry
                .tasks
                .remove(id)
                .ok_or_else(|| MonitorError::NotFound(id.to_string()))?;
            task.cancel.cancel();
            registry.statuses.remove(id);
            task
        };
        info!(%id, url = %task.url, "monitor stopped");
        Ok(())
    }

    /// Copy of the current status of a monitor.
    pub fn status(&self, id: &str) -> MonitorResult<MonitorStatus> {
        lock(&self.registry)
            .statuses
            .get(id)
            .cloned()
            .ok_or_else(|| MonitorError::NotFound(id.to_string()))
    }

    /// Stop every monitor (for graceful shutdown).
    pub fn stop_all(&self) {
        let stopped = {
            let mut registry = lock(&self.registry);
            registry.statuses.clear();
            let tasks: Vec<_> = registry.tasks.drain().collect();
            for (_, task) in &tasks {
                task.cancel.cancel();
            }
            tasks.len()
        };
        info!(stopped, "all monitors stopped");
    }

    /// IDs of all registered monitors.
    pub fn active_monitors(&self) -> Vec<MonitorId> {
        lock(&self.registry).tasks.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.registry).tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for MonitorManager {
    fn drop(&mut self) {
        for task in lock(&self.registry).tasks.values() {
            task.cancel.cancel();
        }
    }
}

/// Probe loop for a single monitor: probe at once, then on every tick until cancelled.
async fn run_probe_loop(
    id: MonitorId,
    url: String,
    prober: HttpProber,
    registry: SharedRegistry,
    cancel: CancellationToken,
    interval: Duration,
) {
    debug!(%id, %url, "probe loop starting");

    let state = prober.probe(&url).await;
    if !cancel.is_cancelled() {
        record(&registry, &id, state);
    }

    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let state = prober.probe(&url).await;
                if cancel.is_cancelled() {
                    break;
                }
                record(&registry, &id, state);
            }
        }
    }

    debug!(%id, %url, "probe loop exited");
}

/// Write a probe result into the monitor's own status entry.
///
/// Returns `false` without writing when the entry is gone, so a probe that
/// finishes after `stop` can never bring a monitor back.
fn record(registry: &SharedRegistry, id: &str, state: MonitorState) -> bool {
    let mut registry = lock(registry);
    let Some(status) = registry.statuses.get_mut(id) else {
        return false;
    };
    let previous = std::mem::replace(&mut status.status, state);
    if previous != state {
        info!(%id, url = %status.url, from = %previous, to = %state, "monitor status changed");
    }
    true
}
