//! invaders-state — game records for Pod Invaders.
//!
//! Holds the kill dedup cache and the highscore ledger. The ledger is a
//! capability trait with two backends chosen once at construction time:
//! an in-memory list and a persistent store backed by
//! [redb](https://docs.rs/redb).
//!
//! # Architecture
//!
//! Persisted highscores are JSON-serialized into redb's `&[u8]` value
//! column under keys of the form `highscore_<gameStarted>_<score>`.
//! Reads are a prefix scan over that reserved `highscore_` range.

pub mod error;
pub mod kill_cache;
pub mod ledger;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use kill_cache::KillCache;
pub use ledger::{HighscoreLedger, InMemoryLedger, RedbLedger, open_ledger};
pub use types::*;
