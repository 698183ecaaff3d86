use std::collections::HashMap;

use crate::error::ConfigError;
use crate::indicators::metric_trait::{qualify, Metric, SnapshotValue};
use crate::primitives::TimeWeightedWindow;
use crate::tick::Tick;

/// Drift of `mid` relative to its rolling mean, normalized by the lookback.
pub struct DriftSign {
    name: String,
    lookback: f64,
    window: TimeWeightedWindow,
    last_t: Option<f64>,
    drift: f64,
    sign: i8,
}

impl DriftSign {
    pub fn new(name: impl Into<String>, lookback_seconds: f64) -> Result<Self, ConfigError> {
        if lookback_seconds <= 0.0 {
            return Err(ConfigError::NotPositive {
                param: "lookback_seconds",
                value: lookback_seconds,
            });
        }
        Ok(Self {
            name: name.into(),
            lookback: lookback_seconds,
            window: TimeWeightedWindow::new(lookback_seconds),
            last_t: None,
            drift: f64::NAN,
            sign: 0,
        })
    }
}

impl Metric for DriftSign {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, tick: &Tick) {
        let dt = self.last_t.map(|p| tick.timestamp - p).unwrap_or(0.0);
        self.last_t = Some(tick.timestamp);
        self.window.update(tick.timestamp, dt, tick.mid);

        let (mean, _) = self.window.stats();
        if mean.is_nan() {
            self.drift = f64::NAN;
            self.sign = 0;
            return;
        }
        self.drift = (tick.mid - mean) / self.lookback;
        self.sign = if self.drift > 0.0 {
            1
        } else if self.drift < 0.0 {
            -1
        } else {
            0
        };
    }

    fn snapshot(&self, out: &mut HashMap<String, SnapshotValue>) {
        out.insert(qualify(&self.name, "drift"), SnapshotValue::Number(self.drift));
        out.insert(
            qualify(&self.name, "drift_sign"),
            SnapshotValue::Number(self.sign as f64),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_mean_yields_nan_drift_and_zero_sign() {
        let mut d = DriftSign::new("d", 60.0).unwrap();
        d.update(&Tick::new(0, 0.0, 1.0, 1.0));
        let mut out = HashMap::new();
        d.snapshot(&mut out);
        assert!(out.get("d.drift").unwrap().as_f64().unwrap().is_nan());
        assert_eq!(out.get("d.drift_sign").unwrap().as_f64().unwrap(), 0.0);
    }

    #[test]
    fn positive_drift_after_price_rises_above_mean() {
        let mut d = DriftSign::new("d", 60.0).unwrap();
        let mut t = 0.0;
        for _ in 0..30 {
            d.update(&Tick::new(0, t, 1.0, 1.0));
            t += 1.0;
        }
        for _ in 0..5 {
            d.update(&Tick::new(0, t, 1.01, 1.01));
            t += 1.0;
        }
        let mut out = HashMap::new();
        d.snapshot(&mut out);
        assert_eq!(out.get("d.drift_sign").unwrap().as_f64().unwrap(), 1.0);
    }
}
