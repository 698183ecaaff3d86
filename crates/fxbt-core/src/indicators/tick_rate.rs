use std::collections::{HashMap, VecDeque};

use crate::error::ConfigError;
use crate::indicators::metric_trait::{qualify, Metric, SnapshotValue};
use crate::tick::Tick;

/// Count and rate of ticks arriving within a trailing window.
pub struct TickRate {
    name: String,
    window_seconds: f64,
    timestamps: VecDeque<f64>,
}

impl TickRate {
    pub fn new(name: impl Into<String>, window_seconds: f64) -> Result<Self, ConfigError> {
        if window_seconds <= 0.0 {
            return Err(ConfigError::NotPositive {
                param: "window_seconds",
                value: window_seconds,
            });
        }
        Ok(Self {
            name: name.into(),
            window_seconds,
            timestamps: VecDeque::new(),
        })
    }

    fn tick_count(&self) -> usize {
        self.timestamps.len()
    }

    fn tick_rate_per_sec(&self) -> f64 {
        self.tick_count() as f64 / self.window_seconds
    }
}

impl Metric for TickRate {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, tick: &Tick) {
        self.timestamps.push_back(tick.timestamp);
        let cutoff = tick.timestamp - self.window_seconds;
        while matches!(self.timestamps.front(), Some(&t) if t <= cutoff) {
            self.timestamps.pop_front();
        }
    }

    fn snapshot(&self, out: &mut HashMap<String, SnapshotValue>) {
        out.insert(
            qualify(&self.name, "tick_count"),
            SnapshotValue::Number(self.tick_count() as f64),
        );
        out.insert(
            qualify(&self.name, "tick_rate_per_sec"),
            SnapshotValue::Number(self.tick_rate_per_sec()),
        );
        out.insert(
            qualify(&self.name, "tick_rate_per_min"),
            SnapshotValue::Number(self.tick_rate_per_sec() * 60.0),
        );
    }
}
