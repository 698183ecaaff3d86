use std::collections::HashMap;

use crate::engines::engine_trait::{EntryEngine, EntrySignal};
use crate::error::ConfigError;
use crate::indicators::SnapshotValue;
use crate::tick::Tick;

/// Fires on a sign change of `fast - slow` between two snapshot keys.
/// The first finite observation only seeds state; a TP/SL pip distance of
/// `0` means "unset" and is reported back to the pipeline as `NaN` so it
/// falls back to its own pip-distance recomputation.
pub struct CrossoverEngine {
    fast_key: String,
    slow_key: String,
    long_on_cross: bool,
    short_on_cross: bool,
    tp_pips: f64,
    sl_pips: f64,
    pip_size: f64,
    trade_timeout_seconds: Option<f64>,
    prev_diff: Option<f64>,
}

impl CrossoverEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fast_key: impl Into<String>,
        slow_key: impl Into<String>,
        long_on_cross: bool,
        short_on_cross: bool,
        tp_pips: f64,
        sl_pips: f64,
        pip_size: f64,
        trade_timeout_seconds: Option<f64>,
    ) -> Result<Self, ConfigError> {
        if pip_size <= 0.0 {
            return Err(ConfigError::NotPositive {
                param: "pip_size",
                value: pip_size,
            });
        }
        if let Some(t) = trade_timeout_seconds {
            if t <= 0.0 {
                return Err(ConfigError::NotPositive {
                    param: "trade_timeout_seconds",
                    value: t,
                });
            }
        }
        Ok(Self {
            fast_key: fast_key.into(),
            slow_key: slow_key.into(),
            long_on_cross,
            short_on_cross,
            tp_pips,
            sl_pips,
            pip_size,
            trade_timeout_seconds,
            prev_diff: None,
        })
    }
}

impl EntryEngine for CrossoverEngine {
    fn evaluate(
        &mut self,
        tick: &Tick,
        snapshot: &HashMap<String, SnapshotValue>,
    ) -> Option<EntrySignal> {
        let fast = snapshot.get(&self.fast_key).and_then(SnapshotValue::as_f64);
        let slow = snapshot.get(&self.slow_key).and_then(SnapshotValue::as_f64);
        let (fast, slow) = match (fast, slow) {
            (Some(f), Some(s)) if f.is_finite() && s.is_finite() => (f, s),
            _ => return None,
        };
        let diff = fast - slow;

        let prev = match self.prev_diff {
            None => {
                self.prev_diff = Some(diff);
                return None;
            }
            Some(p) => p,
        };
        self.prev_diff = Some(diff);

        let signal = if prev < 0.0 && diff >= 0.0 && self.long_on_cross {
            Some(1)
        } else if prev > 0.0 && diff <= 0.0 && self.short_on_cross {
            Some(-1)
        } else {
            None
        };

        signal.map(|direction| {
            // entry price is the same ask/bid convention the pipeline uses
            // to open the position, so the absolute tp/sl prices line up.
            let entry_price = if direction == 1 { tick.ask } else { tick.bid };
            let tp_price = if self.tp_pips > 0.0 {
                entry_price + direction as f64 * self.tp_pips * self.pip_size
            } else {
                f64::NAN
            };
            let sl_price = if self.sl_pips > 0.0 {
                entry_price - direction as f64 * self.sl_pips * self.pip_size
            } else {
                f64::NAN
            };
            let reason = format!("crossover:{}x{}", self.fast_key, self.slow_key);
            let mut metadata = HashMap::new();
            metadata.insert("fast".to_string(), fast);
            metadata.insert("slow".to_string(), slow);
            metadata.insert("diff".to_string(), diff);
            let signal = EntrySignal::new(direction, tp_price, sl_price, reason).with_metadata(metadata);
            match self.trade_timeout_seconds {
                Some(t) => signal.with_trade_timeout_seconds(t),
                None => signal,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(fast: f64, slow: f64) -> HashMap<String, SnapshotValue> {
        let mut m = HashMap::new();
        m.insert("fewma.ewma".to_string(), SnapshotValue::Number(fast));
        m.insert("sewma.ewma".to_string(), SnapshotValue::Number(slow));
        m
    }

    // S5 — Crossover engine (spec §8).
    #[test]
    fn sign_change_from_negative_to_positive_fires_long_once() {
        let mut e = CrossoverEngine::new(
            "fewma.ewma",
            "sewma.ewma",
            true,
            false,
            10.0,
            10.0,
            0.0001,
            None,
        )
        .unwrap();
        let tick = Tick::new(0, 0.0, 1.0, 1.0);

        assert!(e.evaluate(&tick, &snap(1.0, 1.1)).is_none()); // seeds, diff=-0.1
        assert!(e.evaluate(&tick, &snap(1.0, 1.05)).is_none()); // diff=-0.05, still negative
        let signal = e.evaluate(&tick, &snap(1.0, 0.9)); // diff=+0.1, crosses
        assert_eq!(signal.unwrap().direction, 1);
        assert!(e.evaluate(&tick, &snap(1.0, 0.8)).is_none()); // diff=+0.2, no further cross
    }

    #[test]
    fn short_on_cross_disabled_suppresses_signal() {
        let mut e = CrossoverEngine::new(
            "fewma.ewma",
            "sewma.ewma",
            false,
            false,
            0.0,
            0.0,
            0.0001,
            None,
        )
        .unwrap();
        let tick = Tick::new(0, 0.0, 1.0, 1.0);
        e.evaluate(&tick, &snap(1.1, 1.0));
        let signal = e.evaluate(&tick, &snap(0.9, 1.0));
        assert!(signal.is_none());
    }

    #[test]
    fn trade_timeout_seconds_overrides_pipeline_default_when_set() {
        let mut e = CrossoverEngine::new(
            "fewma.ewma",
            "sewma.ewma",
            true,
            false,
            10.0,
            10.0,
            0.0001,
            Some(120.0),
        )
        .unwrap();
        let tick = Tick::new(0, 0.0, 1.0, 1.0);
        e.evaluate(&tick, &snap(1.0, 1.1));
        let signal = e.evaluate(&tick, &snap(1.0, 0.9)).unwrap();
        assert_eq!(signal.trade_timeout_seconds, Some(120.0));
    }

    #[test]
    fn rejects_non_positive_trade_timeout_seconds() {
        assert!(CrossoverEngine::new(
            "fewma.ewma",
            "sewma.ewma",
            true,
            false,
            10.0,
            10.0,
            0.0001,
            Some(0.0),
        )
        .is_err());
    }
}
