//! redb table definitions for the highscore ledger.

use redb::TableDefinition;

/// Ledger entries keyed by `highscore_{gameStarted}_{score}`.
///
/// The table is a flat keyspace; highscores own the [`HIGHSCORE_PREFIX`] range.
pub const LEDGER: TableDefinition<&str, &[u8]> = TableDefinition::new("ledger");

/// Reserved key prefix for highscore records.
pub const HIGHSCORE_PREFIX: &str = "highscore_";
