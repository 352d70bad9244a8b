//! invaders-health — synthetic uptime checks for Pod Invaders.
//!
//! Runs one background task per monitored URL. Each task probes its target
//! immediately, then once per interval, and records the outcome in a status
//! map that readers see only through copies.
//!
//! # Architecture
//!
//! ```text
//! MonitorManager
//!   ├── Registry (one mutex)
//!   │   ├── tasks:    id → CancellationToken
//!   │   └── statuses: id → MonitorStatus
//!   └── Per-monitor background task
//!       ├── HttpProber::probe() → MonitorState
//!       └── write own status entry (no-op once removed)
//! ```
//!
//! # Classification
//!
//! Any HTTP response below 500 counts as `up`: the check is for
//! reachability, not correctness. Timeouts, connection failures and 5xx
//! responses count as `down`. Certificates are not verified so that
//! self-signed endpoints can be monitored.

pub mod checker;
pub mod error;
pub mod monitor;

pub use checker::{HttpProber, classify};
pub use error::{MonitorError, MonitorResult};
pub use monitor::{MonitorId, MonitorManager, MonitorState, MonitorStatus};
