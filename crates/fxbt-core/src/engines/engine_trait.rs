use std::collections::HashMap;

use crate::indicators::SnapshotValue;
use crate::tick::Tick;

/// A requested position open: direction plus optional engine-supplied
/// TP/SL, a human-readable reason, and whatever snapshot context the
/// engine wants attached to the resulting trade record. `f64::NAN` on
/// either price means "let the pipeline recompute it from pip distances
/// off the entry price." `trade_timeout_seconds` overrides the pipeline's
/// own default timeout for this position only; `None` keeps the default.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySignal {
    pub direction: i8,
    pub tp_price: f64,
    pub sl_price: f64,
    pub reason: String,
    pub entry_metadata: HashMap<String, f64>,
    pub trade_timeout_seconds: Option<f64>,
}

impl EntrySignal {
    pub fn new(direction: i8, tp_price: f64, sl_price: f64, reason: impl Into<String>) -> Self {
        Self {
            direction,
            tp_price,
            sl_price,
            reason: reason.into(),
            entry_metadata: HashMap::new(),
            trade_timeout_seconds: None,
        }
    }

    pub fn with_metadata(mut self, entry_metadata: HashMap<String, f64>) -> Self {
        self.entry_metadata = entry_metadata;
        self
    }

    pub fn with_trade_timeout_seconds(mut self, trade_timeout_seconds: f64) -> Self {
        self.trade_timeout_seconds = Some(trade_timeout_seconds);
        self
    }
}

/// A pluggable component that, given the current snapshot and tick, may
/// request a position open. Consulted only while the pipeline is flat and
/// the entry predicates have already passed.
pub trait EntryEngine: Send {
    fn evaluate(
        &mut self,
        tick: &Tick,
        snapshot: &HashMap<String, SnapshotValue>,
    ) -> Option<EntrySignal>;
}
