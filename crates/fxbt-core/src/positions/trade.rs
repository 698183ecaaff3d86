use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The terminal label attached to a closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Tp,
    Sl,
    Timeout,
    ExitPredicate,
    Reversal,
    EndOfFeed,
}

/// A fully closed trade, emitted in chronological exit order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol_id: u32,
    pub direction: i8,
    pub entry_timestamp: f64,
    pub entry_price: f64,
    pub exit_timestamp: f64,
    pub exit_price: f64,
    pub outcome: Outcome,
    pub pnl_pips: f64,
    pub holding_seconds: f64,
    pub reason: String,
    pub entry_metadata: HashMap<String, f64>,
}

impl TradeRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol_id: u32,
        direction: i8,
        entry_timestamp: f64,
        entry_price: f64,
        exit_timestamp: f64,
        exit_price: f64,
        outcome: Outcome,
        pip_size: f64,
        reason: impl Into<String>,
        entry_metadata: HashMap<String, f64>,
    ) -> Self {
        let pnl_pips = (exit_price - entry_price) * direction as f64 / pip_size;
        let holding_seconds = exit_timestamp - entry_timestamp;
        Self {
            symbol_id,
            direction,
            entry_timestamp,
            entry_price,
            exit_timestamp,
            exit_price,
            outcome,
            pnl_pips,
            holding_seconds,
            reason: reason.into(),
            entry_metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pnl_positive_for_winning_long() {
        let t = TradeRecord::new(
            1, 1, 0.0, 1.1000, 10.0, 1.1010, Outcome::Tp, 0.0001, "test", HashMap::new(),
        );
        assert!((t.pnl_pips - 10.0).abs() < 1e-9);
    }

    #[test]
    fn pnl_positive_for_winning_short() {
        let t = TradeRecord::new(
            1, -1, 0.0, 1.1000, 10.0, 1.0990, Outcome::Tp, 0.0001, "test", HashMap::new(),
        );
        assert!((t.pnl_pips - 10.0).abs() < 1e-9);
    }

    #[test]
    fn invariant_entry_before_exit() {
        let t = TradeRecord::new(
            1, 1, 5.0, 1.1, 10.0, 1.2, Outcome::Timeout, 0.0001, "test", HashMap::new(),
        );
        assert!(t.entry_timestamp <= t.exit_timestamp);
    }

    #[test]
    fn holding_seconds_is_exit_minus_entry() {
        let t = TradeRecord::new(
            1, 1, 5.0, 1.1, 12.5, 1.2, Outcome::Timeout, 0.0001, "test", HashMap::new(),
        );
        assert!((t.holding_seconds - 7.5).abs() < 1e-9);
    }
}
