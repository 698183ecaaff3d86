use std::collections::HashMap;

use crate::indicators::{Metric, SnapshotValue};
use crate::tick::Tick;

/// Owns the metric collection for one symbol and builds its flat snapshot.
///
/// Metrics are updated in declaration order (spec §5's fixed per-tick
/// ordering), then each writes its fields into the same snapshot map. The
/// map's key set is stable once a metric is added — entries are refreshed
/// in place rather than the map being rebuilt from scratch every tick.
pub struct MetricsManager {
    metrics: Vec<Box<dyn Metric>>,
    snapshot: HashMap<String, SnapshotValue>,
}

impl MetricsManager {
    pub fn new(metrics: Vec<Box<dyn Metric>>) -> Self {
        Self {
            metrics,
            snapshot: HashMap::new(),
        }
    }

    pub fn update_all(&mut self, tick: &Tick) {
        for metric in self.metrics.iter_mut() {
            metric.update(tick);
        }
        for metric in self.metrics.iter() {
            metric.snapshot(&mut self.snapshot);
        }
    }

    pub fn snapshot(&self) -> &HashMap<String, SnapshotValue> {
        &self.snapshot
    }
}
