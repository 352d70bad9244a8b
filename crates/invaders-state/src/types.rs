//! Domain types shared by the game backend.
//!
//! The JSON field names are the wire and on-disk format: ledger files
//! written by earlier servers must keep deserializing.

use serde::{Deserialize, Serialize};

use crate::tables::HIGHSCORE_PREFIX;

// ── Pod ────────────────────────────────────────────────────────────

/// A pod shown to the player, either sourced from the cluster or synthetic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_real_pod: bool,
}

impl Pod {
    pub fn real(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            is_real_pod: true,
        }
    }

    pub fn fake(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            is_real_pod: false,
        }
    }

    /// Identity used for kill dedup: `(namespace, name)`.
    pub fn key(&self) -> (String, String) {
        (self.namespace.clone(), self.name.clone())
    }
}

/// Namespaces the next rounds should draw pods from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Namespaces {
    pub namespaces: Vec<String>,
}

// ── Highscore ──────────────────────────────────────────────────────

/// A finished game. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Highscore {
    /// Unix timestamp (seconds) when the game started.
    pub game_started: i64,
    /// Game duration in milliseconds.
    pub time_taken: i64,
    pub levels_finished: i64,
    pub score: i64,
    pub name: String,
}

impl Highscore {
    /// Persistent ledger key: `highscore_{gameStarted}_{score}`.
    pub fn ledger_key(&self) -> String {
        format!("{HIGHSCORE_PREFIX}{}_{}", self.game_started, self.score)
    }
}
