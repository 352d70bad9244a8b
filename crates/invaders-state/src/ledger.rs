//! Highscore ledger: append-only score records behind a swappable backend.
//!
//! Callers hold an `Arc<dyn HighscoreLedger>` and never learn which backend
//! sits behind it. Neither operation surfaces storage errors: writes log and
//! drop, reads degrade to whatever could be decoded.

use std::path::Path;
use std::sync::{Arc, Mutex};

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::{debug, error, info, warn};

use invaders_core::{LedgerBackendKind, LedgerSettings};

use crate::error::{StateError, StateResult};
use crate::tables::{HIGHSCORE_PREFIX, LEDGER};
use crate::types::Highscore;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Storage contract for highscores.
pub trait HighscoreLedger: Send + Sync {
    /// Store a record. Failures are logged, never returned.
    fn add(&self, highscore: Highscore);

    /// All stored records, in backend order.
    fn get(&self) -> Vec<Highscore>;

    /// Backend name used in logs.
    fn backend(&self) -> &'static str;
}

/// Open the ledger backend selected by configuration.
pub fn open_ledger(settings: &LedgerSettings) -> StateResult<Arc<dyn HighscoreLedger>> {
    let ledger: Arc<dyn HighscoreLedger> = match settings.backend {
        LedgerBackendKind::Memory => Arc::new(InMemoryLedger::new()),
        LedgerBackendKind::Redb => {
            let path = settings.path.as_deref().ok_or_else(|| {
                StateError::Config("redb backend requires a ledger path".to_string())
            })?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(map_err!(Open))?;
            }
            Arc::new(RedbLedger::open(path)?)
        }
    };
    info!(backend = ledger.backend(), "highscore ledger ready");
    Ok(ledger)
}

// ── In-memory ──────────────────────────────────────────────────────

/// Ledger held in process memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    highscores: Mutex<Vec<Highscore>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Highscore>> {
        self.highscores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HighscoreLedger for InMemoryLedger {
    fn add(&self, highscore: Highscore) {
        debug!(name = %highscore.name, score = highscore.score, "highscore added");
        self.lock().push(highscore);
    }

    fn get(&self) -> Vec<Highscore> {
        self.lock().clone()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

// ── redb ───────────────────────────────────────────────────────────

/// Persistent ledger backed by redb.
///
/// Records survive restarts. Two games with the same start time and score
/// share a key, so the later write replaces the earlier one.
#[derive(Clone)]
pub struct RedbLedger {
    db: Arc<Database>,
}

impl RedbLedger {
    /// Open (or create) a ledger database at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let ledger = Self { db: Arc::new(db) };
        ledger.ensure_tables()?;
        debug!(?path, "ledger database opened");
        Ok(ledger)
    }

    /// Create an ephemeral in-memory database (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let ledger = Self { db: Arc::new(db) };
        ledger.ensure_tables()?;
        Ok(ledger)
    }

    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(LEDGER).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    fn put(&self, key: &str, value: &[u8]) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(LEDGER).map_err(map_err!(Table))?;
            table.insert(key, value).map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    fn insert(&self, highscore: &Highscore) -> StateResult<()> {
        let value = serde_json::to_vec(highscore).map_err(map_err!(Serialize))?;
        self.put(&highscore.ledger_key(), &value)
    }

    /// Scan the highscore prefix. Undecodable entries are skipped.
    fn scan(&self) -> StateResult<Vec<Highscore>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(LEDGER).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.range(HIGHSCORE_PREFIX..).map_err(map_err!(Read))? {
            let (key, value) = match entry {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "failed to read ledger entry, skipping");
                    continue;
                }
            };
            let key = key.value();
            if !key.starts_with(HIGHSCORE_PREFIX) {
                break;
            }
            match serde_json::from_slice::<Highscore>(value.value()) {
                Ok(hs) => results.push(hs),
                Err(e) => warn!(%key, error = %e, "malformed highscore record, skipping"),
            }
        }
        Ok(results)
    }
}

impl HighscoreLedger for RedbLedger {
    fn add(&self, highscore: Highscore) {
        match self.insert(&highscore) {
            Ok(()) => debug!(
                key = %highscore.ledger_key(),
                name = %highscore.name,
                "highscore persisted"
            ),
            Err(e) => error!(
                key = %highscore.ledger_key(),
                error = %e,
                "failed to persist highscore"
            ),
        }
    }

    fn get(&self) -> Vec<Highscore> {
        self.scan().unwrap_or_else(|e| {
            error!(error = %e, "failed to read highscores");
            Vec::new()
        })
    }

    fn backend(&self) -> &'static str {
        "redb"
    }
}
