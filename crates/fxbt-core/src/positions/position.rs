use std::collections::HashMap;

use crate::positions::trade::Outcome;
use crate::tick::Tick;

/// The open-position state machine: FLAT (direction 0), LONG (+1), or
/// SHORT (-1). Exit checks run in a fixed order — TP, SL, timeout, exit
/// predicates — matching the pipeline's per-tick evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub direction: i8,
    pub entry_timestamp: f64,
    pub entry_price: f64,
    pub tp_price: f64,
    pub sl_price: f64,
    pub timeout_seconds: f64,
    pub reason: String,
    pub entry_metadata: HashMap<String, f64>,
}

impl Position {
    pub fn flat() -> Self {
        Self {
            direction: 0,
            entry_timestamp: f64::NAN,
            entry_price: f64::NAN,
            tp_price: f64::NAN,
            sl_price: f64::NAN,
            timeout_seconds: f64::NAN,
            reason: String::new(),
            entry_metadata: HashMap::new(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.direction == 0
    }

    #[allow(clippy::too_many_arguments)]
    pub fn open(
        direction: i8,
        entry_timestamp: f64,
        entry_price: f64,
        tp_price: f64,
        sl_price: f64,
        timeout_seconds: f64,
        reason: impl Into<String>,
        entry_metadata: HashMap<String, f64>,
    ) -> Self {
        debug_assert!(direction == 1 || direction == -1);
        Self {
            direction,
            entry_timestamp,
            entry_price,
            tp_price,
            sl_price,
            timeout_seconds,
            reason: reason.into(),
            entry_metadata,
        }
    }

    fn exit_price(&self, tick: &Tick) -> f64 {
        if self.direction == 1 {
            tick.bid
        } else {
            tick.ask
        }
    }

    /// Checks TP, then SL, then timeout, then (if the caller reports the
    /// exit predicates all true) a predicate exit. NaN thresholds never
    /// compare true, so an engine-unset TP/SL is simply never hit here.
    pub fn check_exit(&self, tick: &Tick, exit_predicates_true: bool) -> Option<(Outcome, f64)> {
        if self.is_flat() {
            return None;
        }
        let hit_tp = if self.direction == 1 {
            tick.bid >= self.tp_price
        } else {
            tick.ask <= self.tp_price
        };
        if hit_tp {
            return Some((Outcome::Tp, self.exit_price(tick)));
        }
        let hit_sl = if self.direction == 1 {
            tick.bid <= self.sl_price
        } else {
            tick.ask >= self.sl_price
        };
        if hit_sl {
            return Some((Outcome::Sl, self.exit_price(tick)));
        }
        if tick.timestamp - self.entry_timestamp >= self.timeout_seconds {
            return Some((Outcome::Timeout, self.exit_price(tick)));
        }
        if exit_predicates_true {
            return Some((Outcome::ExitPredicate, self.exit_price(tick)));
        }
        None
    }

    pub fn force_close(&self, tick: &Tick) -> Option<(Outcome, f64)> {
        if self.is_flat() {
            return None;
        }
        Some((Outcome::EndOfFeed, self.exit_price(tick)))
    }
}
