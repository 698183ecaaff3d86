use std::collections::{HashMap, VecDeque};

use crate::error::ConfigError;
use crate::indicators::metric_trait::{qualify, Metric, SnapshotValue};
use crate::tick::Tick;

/// Bid/ask spread in price terms and pips, with a rolling percentile rank.
pub struct Spread {
    name: String,
    pip_size: f64,
    window_seconds: f64,
    history: VecDeque<(f64, f64)>, // (timestamp, spread_pips)
    spread: f64,
    spread_pips: f64,
    percentile: f64,
}

impl Spread {
    pub fn new(
        name: impl Into<String>,
        pip_size: f64,
        window_seconds: f64,
    ) -> Result<Self, ConfigError> {
        if pip_size <= 0.0 {
            return Err(ConfigError::NotPositive {
                param: "pip_size",
                value: pip_size,
            });
        }
        if window_seconds <= 0.0 {
            return Err(ConfigError::NotPositive {
                param: "window_seconds",
                value: window_seconds,
            });
        }
        Ok(Self {
            name: name.into(),
            pip_size,
            window_seconds,
            history: VecDeque::new(),
            spread: 0.0,
            spread_pips: 0.0,
            percentile: f64::NAN,
        })
    }
}

impl Metric for Spread {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, tick: &Tick) {
        self.spread = (tick.ask - tick.bid).max(0.0);
        self.spread_pips = self.spread / self.pip_size;

        self.history.push_back((tick.timestamp, self.spread_pips));
        let cutoff = tick.timestamp - self.window_seconds;
        while matches!(self.history.front(), Some(&(t, _)) if t < cutoff) {
            self.history.pop_front();
        }

        let n = self.history.len();
        let le_current = self
            .history
            .iter()
            .filter(|&&(_, s)| s <= self.spread_pips)
            .count();
        self.percentile = if n == 0 {
            f64::NAN
        } else {
            le_current as f64 / n as f64
        };
    }

    fn snapshot(&self, out: &mut HashMap<String, SnapshotValue>) {
        out.insert(qualify(&self.name, "spread"), SnapshotValue::Number(self.spread));
        out.insert(
            qualify(&self.name, "spread_pips"),
            SnapshotValue::Number(self.spread_pips),
        );
        out.insert(
            qualify(&self.name, "spread_percentile"),
            SnapshotValue::Number(self.percentile),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_never_negative() {
        let mut s = Spread::new("s", 0.0001, 60.0).unwrap();
        s.update(&Tick::new(0, 0.0, 1.1002, 1.1000));
        let mut out = HashMap::new();
        s.snapshot(&mut out);
        assert_eq!(out.get("s.spread").unwrap().as_f64().unwrap(), 0.0);
    }

    #[test]
    fn percentile_is_one_for_widest_spread_seen() {
        let mut s = Spread::new("s", 0.0001, 60.0).unwrap();
        s.update(&Tick::new(0, 0.0, 1.1000, 1.1001));
        s.update(&Tick::new(0, 1.0, 1.1000, 1.1002));
        s.update(&Tick::new(0, 2.0, 1.1000, 1.1003));
        let mut out = HashMap::new();
        s.snapshot(&mut out);
        assert_eq!(out.get("s.spread_percentile").unwrap().as_f64().unwrap(), 1.0);
    }
}
