use std::collections::HashMap;

use crate::error::ConfigError;
use crate::indicators::metric_trait::{qualify, Metric, PriceField, SnapshotValue};
use crate::primitives::Ewma;
use crate::tick::Tick;

/// A single continuous-time EWMA over a chosen price field.
pub struct EwmaMetric {
    name: String,
    price_field: PriceField,
    ewma: Ewma,
    seeded: bool,
}

impl EwmaMetric {
    pub fn new(
        name: impl Into<String>,
        tau: f64,
        initial_value: Option<f64>,
        price_field: PriceField,
    ) -> Result<Self, ConfigError> {
        if tau <= 0.0 {
            return Err(ConfigError::NotPositive { param: "tau", value: tau });
        }
        Ok(Self {
            name: name.into(),
            price_field,
            ewma: match initial_value {
                Some(v) => Ewma::with_initial(tau, 1, v),
                None => Ewma::new(tau, 1),
            },
            seeded: initial_value.is_some(),
        })
    }
}

impl Metric for EwmaMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, tick: &Tick) {
        let price = self.price_field.of(tick);
        if !self.seeded {
            // First tick seeds y to the price unless an initial_value was given.
            self.ewma.seed(price);
            self.seeded = true;
        }
        self.ewma.update(tick.timestamp, price);
    }

    fn snapshot(&self, out: &mut HashMap<String, SnapshotValue>) {
        out.insert(
            qualify(&self.name, "ewma"),
            SnapshotValue::Number(self.ewma.current()),
        );
    }
}
