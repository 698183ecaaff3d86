use std::path::Path;

use fxbt_core::io::{SinkError as CoreSinkError, TradeSink};
use fxbt_core::positions::{Outcome, RunStatistics, TradeRecord};
use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::SinkError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS trades (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol_id INTEGER NOT NULL,
    direction INTEGER NOT NULL,
    entry_timestamp REAL NOT NULL,
    entry_price REAL NOT NULL,
    exit_timestamp REAL NOT NULL,
    exit_price REAL NOT NULL,
    outcome TEXT NOT NULL,
    pnl_pips REAL NOT NULL,
    holding_seconds REAL NOT NULL,
    reason TEXT NOT NULL
)"#;

const SUMMARY_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS run_summary (
    symbol_id INTEGER PRIMARY KEY,
    total_closed INTEGER NOT NULL,
    total_wins INTEGER NOT NULL,
    total_losses INTEGER NOT NULL,
    win_rate REAL NOT NULL,
    profit_factor REAL NOT NULL,
    expectancy_pips REAL NOT NULL,
    total_pnl_pips REAL NOT NULL
)"#;

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Tp => "TP",
        Outcome::Sl => "SL",
        Outcome::Timeout => "TIMEOUT",
        Outcome::ExitPredicate => "EXIT_PREDICATE",
        Outcome::Reversal => "REVERSAL",
        Outcome::EndOfFeed => "END_OF_FEED",
    }
}

/// Persists closed trades to a SQLite table, one row per trade, in
/// chronological exit order (the order the pipeline emits them in).
pub struct SqliteTradeSink {
    conn: Connection,
}

impl SqliteTradeSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let conn = Connection::open(path)?;
        conn.execute(SCHEMA, [])?;
        conn.execute(SUMMARY_SCHEMA, [])?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, SinkError> {
        let conn = Connection::open_in_memory()?;
        conn.execute(SCHEMA, [])?;
        conn.execute(SUMMARY_SCHEMA, [])?;
        Ok(Self { conn })
    }

    pub fn count(&self) -> Result<i64, SinkError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM trades", [], |row| row.get(0))?;
        Ok(n)
    }

    /// Writes one symbol's end-of-run aggregate stats, replacing any prior
    /// row for that symbol.
    pub fn write_summary(&mut self, symbol_id: u32, stats: &RunStatistics) -> Result<(), SinkError> {
        debug!(symbol_id, "writing run summary");
        self.conn.execute(
            "INSERT OR REPLACE INTO run_summary (symbol_id, total_closed, total_wins, \
             total_losses, win_rate, profit_factor, expectancy_pips, total_pnl_pips) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                symbol_id,
                stats.total_closed,
                stats.total_wins,
                stats.total_losses,
                stats.win_rate(),
                stats.profit_factor(),
                stats.expectancy_pips(),
                stats.total_pnl_pips,
            ],
        )?;
        Ok(())
    }
}

impl TradeSink for SqliteTradeSink {
    fn emit(&mut self, trade: &TradeRecord) -> Result<(), CoreSinkError> {
        debug!(symbol_id = trade.symbol_id, outcome = ?trade.outcome, "emitting trade");
        self.conn
            .execute(
                "INSERT INTO trades (symbol_id, direction, entry_timestamp, entry_price, \
                 exit_timestamp, exit_price, outcome, pnl_pips, holding_seconds, reason) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    trade.symbol_id,
                    trade.direction,
                    trade.entry_timestamp,
                    trade.entry_price,
                    trade.exit_timestamp,
                    trade.exit_price,
                    outcome_label(trade.outcome),
                    trade.pnl_pips,
                    trade.holding_seconds,
                    trade.reason,
                ],
            )
            .map_err(|e| CoreSinkError::Io(e.to_string()))?;
        Ok(())
    }
}
