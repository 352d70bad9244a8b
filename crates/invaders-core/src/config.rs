//! invaders.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvadersConfig {
    pub game: GameSettings,
    pub ledger: LedgerSettings,
    pub monitor: MonitorSettings,
    /// Static `namespace -> pod names` inventory for clusterless deployments.
    pub inventory: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Source real pods from the cluster. When false every round is synthetic.
    pub enable_kube: bool,
    pub namespaces: Vec<String>,
    pub max_pod_count: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            enable_kube: true,
            namespaces: vec!["default".to_string()],
            max_pod_count: 100,
        }
    }
}

impl GameSettings {
    /// Cap a requested round size at `max_pod_count`.
    pub fn clamp_count(&self, requested: usize) -> usize {
        requested.min(self.max_pod_count)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackendKind {
    #[default]
    Memory,
    Redb,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    pub backend: LedgerBackendKind,
    /// Database file, required for the redb backend.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Probe interval (e.g., "5s").
    pub interval: String,
    /// Timeout per probe (e.g., "5s").
    pub timeout: String,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval: "5s".to_string(),
            timeout: "5s".to_string(),
        }
    }
}

impl MonitorSettings {
    pub fn interval(&self) -> Duration {
        parse_or_default("monitor.interval", &self.interval, DEFAULT_PROBE_INTERVAL)
    }

    pub fn timeout(&self) -> Duration {
        parse_or_default("monitor.timeout", &self.timeout, DEFAULT_PROBE_TIMEOUT)
    }
}

impl InvadersConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: InvadersConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.ledger.backend == LedgerBackendKind::Redb && self.ledger.path.is_none() {
            anyhow::bail!("ledger.path is required when ledger.backend = \"redb\"");
        }
        Ok(())
    }
}

fn parse_or_default(field: &str, raw: &str, fallback: Duration) -> Duration {
    match parse_duration(raw) {
        Some(d) if !d.is_zero() => d,
        _ => {
            warn!(field, value = raw, ?fallback, "invalid duration, using default");
            fallback
        }
    }
}

/// Parse a duration string like "5s", "500ms", "1m".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_stock_server() {
        let config = InvadersConfig::default();
        assert!(config.game.enable_kube);
        assert_eq!(config.game.namespaces, vec!["default".to_string()]);
        assert_eq!(config.game.max_pod_count, 100);
        assert_eq!(config.ledger.backend, LedgerBackendKind::Memory);
        assert_eq!(config.monitor.interval(), Duration::from_secs(5));
        assert_eq!(config.monitor.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn parse_partial_file() {
        let toml_str = r#"
[game]
enable_kube = false
namespaces = ["team-a", "team-b"]

[ledger]
backend = "redb"
path = "/var/lib/invaders/ledger.redb"

[inventory]
team-a = ["api-0", "api-1"]
"#;
        let config: InvadersConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.game.enable_kube);
        assert_eq!(config.game.namespaces.len(), 2);
        assert_eq!(config.game.max_pod_count, 100);
        assert_eq!(config.ledger.backend, LedgerBackendKind::Redb);
        assert_eq!(config.inventory["team-a"], vec!["api-0", "api-1"]);
        assert_eq!(config.monitor.interval, "5s");
    }

    #[test]
    fn from_file_rejects_redb_without_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ledger]\nbackend = \"redb\"").unwrap();

        let err = InvadersConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("ledger.path"));
    }

    #[test]
    fn from_file_round_trips_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let rendered = InvadersConfig::default().to_toml_string().unwrap();
        file.write_all(rendered.as_bytes()).unwrap();

        let config = InvadersConfig::from_file(file.path()).unwrap();
        assert_eq!(config.game.max_pod_count, 100);
    }

    #[test]
    fn clamp_count_caps_at_max() {
        let game = GameSettings::default();
        assert_eq!(game.clamp_count(10), 10);
        assert_eq!(game.clamp_count(250), 100);
    }

    #[test]
    fn invalid_monitor_durations_fall_back() {
        let settings = MonitorSettings {
            interval: "soon".to_string(),
            timeout: "0s".to_string(),
        };
        assert_eq!(settings.interval(), Duration::from_secs(5));
        assert_eq!(settings.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration("10"), Some(Duration::from_secs(10)));
        assert_eq!(parse_duration("later"), None);
    }

    #[test]
    fn parse_duration_rejects_overflowing_minutes() {
        assert_eq!(parse_duration("307445734561825861m"), None);

        let settings = MonitorSettings {
            interval: "307445734561825861m".to_string(),
            timeout: "5s".to_string(),
        };
        assert_eq!(settings.interval(), Duration::from_secs(5));
    }
}
