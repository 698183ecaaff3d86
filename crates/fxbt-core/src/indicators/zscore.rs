use std::collections::HashMap;

use crate::error::ConfigError;
use crate::indicators::metric_trait::{qualify, Metric, SnapshotValue};
use crate::primitives::TimeWeightedWindow;
use crate::tick::Tick;

/// Residual and z-score of `mid` against a time-weighted rolling mean/std.
pub struct ZScore {
    name: String,
    window: TimeWeightedWindow,
    last_t: Option<f64>,
    residual: f64,
    z: f64,
}

impl ZScore {
    pub fn new(name: impl Into<String>, lookback_seconds: f64) -> Result<Self, ConfigError> {
        if lookback_seconds <= 0.0 {
            return Err(ConfigError::NotPositive {
                param: "lookback_seconds",
                value: lookback_seconds,
            });
        }
        Ok(Self {
            name: name.into(),
            window: TimeWeightedWindow::new(lookback_seconds),
            last_t: None,
            residual: f64::NAN,
            z: f64::NAN,
        })
    }
}

impl Metric for ZScore {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, tick: &Tick) {
        let dt = self.last_t.map(|p| tick.timestamp - p).unwrap_or(0.0);
        self.last_t = Some(tick.timestamp);
        self.window.update(tick.timestamp, dt, tick.mid);

        // Before the window has accumulated any weighted samples, treat the
        // residual/z-score as the flat-line default (0) rather than NaN:
        // there is no deviation to report yet, and a NaN z-score would make
        // every predicate reading it vacuously false during warmup even
        // after the very first tick.
        let (mean, std) = self.window.stats();
        if mean.is_nan() {
            self.residual = 0.0;
            self.z = 0.0;
            return;
        }
        self.residual = tick.mid - mean;
        self.z = if std <= 1e-12 { 0.0 } else { self.residual / std };
    }

    fn snapshot(&self, out: &mut HashMap<String, SnapshotValue>) {
        out.insert(qualify(&self.name, "z_score"), SnapshotValue::Number(self.z));
        out.insert(
            qualify(&self.name, "rolling_residual"),
            SnapshotValue::Number(self.residual),
        );
    }
}
