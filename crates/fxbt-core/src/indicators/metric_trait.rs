use std::collections::HashMap;

use crate::error::ConfigError;
use crate::tick::Tick;

/// A value exposed in a metric's snapshot: either numeric or the
/// categorical `session_label`.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotValue {
    Number(f64),
    Label(&'static str),
}

impl SnapshotValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SnapshotValue::Number(n) => Some(*n),
            SnapshotValue::Label(_) => None,
        }
    }
}

/// Selects which side of the quote a metric computes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Bid,
    Ask,
    Mid,
}

impl PriceField {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "bid" => Ok(PriceField::Bid),
            "ask" => Ok(PriceField::Ask),
            "mid" => Ok(PriceField::Mid),
            other => Err(ConfigError::UnknownPriceField(other.to_string())),
        }
    }

    pub fn of(&self, tick: &Tick) -> f64 {
        match self {
            PriceField::Bid => tick.bid,
            PriceField::Ask => tick.ask,
            PriceField::Mid => tick.mid,
        }
    }
}

/// A named online estimator: consumes ticks, exposes a flat field map.
///
/// Every metric owns a stable `name` that the metrics manager uses to
/// prefix each field it exposes (`"{name}.{field}"`). Implementations are
/// mutated only by the single-threaded tick loop that owns them — no
/// `Sync` bound is required, since two threads never touch the same
/// metric concurrently. `Send` is required so a whole symbol pipeline,
/// metrics included, can be handed to a worker thread by the outer
/// multi-symbol coordinator (spec §5 parallelizes per-symbol, never
/// per-indicator within a symbol).
pub trait Metric: Send {
    fn name(&self) -> &str;

    fn update(&mut self, tick: &Tick);

    /// Writes this metric's fields into `out`, keyed as
    /// `"{name}.{field}"`. Implementations should reuse the same field
    /// names on every call so the manager's key set stays stable.
    fn snapshot(&self, out: &mut HashMap<String, SnapshotValue>);
}

pub fn qualify(name: &str, field: &str) -> String {
    let mut s = String::with_capacity(name.len() + field.len() + 1);
    s.push_str(name);
    s.push('.');
    s.push_str(field);
    s
}
