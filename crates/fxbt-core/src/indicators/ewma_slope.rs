use std::collections::{HashMap, VecDeque};

use crate::error::ConfigError;
use crate::indicators::metric_trait::{qualify, Metric, PriceField, SnapshotValue};
use crate::primitives::Ewma;
use crate::tick::Tick;

/// An EWMA plus its slope over a trailing window of its own history.
pub struct EwmaSlope {
    name: String,
    price_field: PriceField,
    window_seconds: f64,
    ewma: Ewma,
    seeded: bool,
    history: VecDeque<(f64, f64)>, // (timestamp, ewma value)
    slope: f64,
}

impl EwmaSlope {
    pub fn new(
        name: impl Into<String>,
        tau: f64,
        window_seconds: f64,
        initial_value: Option<f64>,
        price_field: PriceField,
    ) -> Result<Self, ConfigError> {
        if tau <= 0.0 {
            return Err(ConfigError::NotPositive { param: "tau", value: tau });
        }
        if window_seconds <= 0.0 {
            return Err(ConfigError::NotPositive {
                param: "window_seconds",
                value: window_seconds,
            });
        }
        Ok(Self {
            name: name.into(),
            price_field,
            window_seconds,
            ewma: match initial_value {
                Some(v) => Ewma::with_initial(tau, 1, v),
                None => Ewma::new(tau, 1),
            },
            seeded: initial_value.is_some(),
            history: VecDeque::new(),
            slope: f64::NAN,
        })
    }
}

impl Metric for EwmaSlope {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, tick: &Tick) {
        let price = self.price_field.of(tick);
        if !self.seeded {
            self.ewma.seed(price);
            self.seeded = true;
        }
        let y = self.ewma.update(tick.timestamp, price);

        self.history.push_back((tick.timestamp, y));
        let cutoff = tick.timestamp - self.window_seconds;
        // always keep at least one entry so the latest value survives
        while self.history.len() > 1 && self.history.front().unwrap().0 < cutoff {
            self.history.pop_front();
        }

        self.slope = if self.history.len() >= 2 {
            let (t_old, y_old) = *self.history.front().unwrap();
            let (t_new, y_new) = *self.history.back().unwrap();
            let dt = t_new - t_old;
            if dt > 0.0 {
                (y_new - y_old) / dt
            } else {
                f64::NAN
            }
        } else {
            f64::NAN
        };
    }

    fn snapshot(&self, out: &mut HashMap<String, SnapshotValue>) {
        out.insert(
            qualify(&self.name, "ewma"),
            SnapshotValue::Number(self.ewma.current()),
        );
        out.insert(qualify(&self.name, "slope"), SnapshotValue::Number(self.slope));
    }
}
