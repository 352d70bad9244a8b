pub mod config;

pub use config::{
    GameSettings, InvadersConfig, LedgerBackendKind, LedgerSettings, MonitorSettings,
    parse_duration,
};
