use std::collections::HashMap;

use crate::engines::engine_trait::{EntryEngine, EntrySignal};
use crate::error::ConfigError;
use crate::indicators::SnapshotValue;
use crate::tick::Tick;

/// Reads a [`crate::indicators::ThresholdReversion`] metric's own snapshot
/// fields and turns a nonzero `direction` into an entry request. Holds no
/// state of its own — the underlying metric already tracks the reference
/// price and its own flatten/reopen transitions.
pub struct ReversionEngine {
    metric_name: String,
}

impl ReversionEngine {
    pub fn new(metric_name: impl Into<String>) -> Result<Self, ConfigError> {
        let metric_name = metric_name.into();
        if metric_name.is_empty() {
            return Err(ConfigError::MissingParameter("metric_name"));
        }
        Ok(Self { metric_name })
    }

    fn key(&self, field: &str) -> String {
        format!("{}.{}", self.metric_name, field)
    }
}

impl EntryEngine for ReversionEngine {
    fn evaluate(
        &mut self,
        _tick: &Tick,
        snapshot: &HashMap<String, SnapshotValue>,
    ) -> Option<EntrySignal> {
        let direction = snapshot
            .get(&self.key("direction"))
            .and_then(SnapshotValue::as_f64)
            .unwrap_or(0.0) as i8;
        if direction == 0 {
            return None;
        }
        let tp_price = snapshot
            .get(&self.key("tp_price"))
            .and_then(SnapshotValue::as_f64)
            .unwrap_or(f64::NAN);
        let sl_price = snapshot
            .get(&self.key("sl_price"))
            .and_then(SnapshotValue::as_f64)
            .unwrap_or(f64::NAN);
        let reason = format!("threshold_reversion:{}", self.metric_name);
        let mut metadata = HashMap::new();
        metadata.insert("direction".to_string(), direction as f64);
        Some(EntrySignal::new(direction, tp_price, sl_price, reason).with_metadata(metadata))
    }
}
