use std::collections::HashMap;

use crate::error::ConfigError;
use crate::indicators::metric_trait::{qualify, Metric, SnapshotValue};
use crate::primitives::{Ewma, TimeWeightedHistogram};
use crate::tick::Tick;

/// Realized log-return volatility: a power-2 EWMA of log returns, plus its
/// percentile rank against a rolling histogram of its own recent values.
pub struct EwmaVol {
    name: String,
    ewma: Ewma,
    histogram: TimeWeightedHistogram,
    prev_mid: Option<f64>,
    prev_t: Option<f64>,
    vol_ewma: f64,
    vol_percentile: f64,
}

impl EwmaVol {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        tau: f64,
        percentile_horizon_seconds: f64,
        bins: usize,
        base_vol: f64,
        stddev_cap: f64,
    ) -> Result<Self, ConfigError> {
        if tau <= 0.0 {
            return Err(ConfigError::NotPositive { param: "tau", value: tau });
        }
        if percentile_horizon_seconds <= 0.0 {
            return Err(ConfigError::NotPositive {
                param: "percentile_horizon_seconds",
                value: percentile_horizon_seconds,
            });
        }
        if bins < 2 {
            return Err(ConfigError::TooFewBins(bins));
        }
        if base_vol <= 0.0 {
            return Err(ConfigError::NotPositive { param: "base_vol", value: base_vol });
        }
        if stddev_cap <= 0.0 {
            return Err(ConfigError::NotPositive {
                param: "stddev_cap",
                value: stddev_cap,
            });
        }
        let hi = (stddev_cap * base_vol).powi(2);
        let edges: Vec<f64> = (0..=bins).map(|i| hi * i as f64 / bins as f64).collect();
        Ok(Self {
            name: name.into(),
            ewma: Ewma::new(tau, 2),
            histogram: TimeWeightedHistogram::new(edges, percentile_horizon_seconds),
            prev_mid: None,
            prev_t: None,
            vol_ewma: 0.0,
            vol_percentile: f64::NAN,
        })
    }
}

impl Metric for EwmaVol {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, tick: &Tick) {
        let t = tick.timestamp;
        let r = match self.prev_mid {
            Some(prev) if prev > 0.0 && tick.mid > 0.0 => (tick.mid / prev).ln(),
            _ => 0.0,
        };

        if self.prev_t.is_none() {
            // First tick only seeds prev_mid/prev_t; no histogram event yet.
            self.prev_mid = Some(tick.mid);
            self.prev_t = Some(t);
            return;
        }

        self.vol_ewma = self.ewma.update(t, r);
        let prev_t = self.prev_t.unwrap();
        self.histogram.add(prev_t, t, self.vol_ewma);
        self.histogram.trim(t);
        self.vol_percentile = self.histogram.percentile_rank(self.vol_ewma);

        self.prev_mid = Some(tick.mid);
        self.prev_t = Some(t);
    }

    fn snapshot(&self, out: &mut HashMap<String, SnapshotValue>) {
        out.insert(
            qualify(&self.name, "vol_ewma"),
            SnapshotValue::Number(self.vol_ewma),
        );
        out.insert(
            qualify(&self.name, "vol_percentile"),
            SnapshotValue::Number(self.vol_percentile),
        );
    }
}
