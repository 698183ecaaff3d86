use std::collections::HashMap;

use crate::engines::engine_trait::{EntryEngine, EntrySignal};
use crate::indicators::SnapshotValue;
use crate::tick::Tick;

/// Never requests an entry. Useful for warmup-only dry runs or configs
/// that want metrics and predicates evaluated without any live trading.
#[derive(Debug, Default)]
pub struct StubEngine;

impl EntryEngine for StubEngine {
    fn evaluate(
        &mut self,
        _tick: &Tick,
        _snapshot: &HashMap<String, SnapshotValue>,
    ) -> Option<EntrySignal> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_signals() {
        let mut e = StubEngine;
        let tick = Tick::new(0, 0.0, 1.0, 1.0);
        assert!(e.evaluate(&tick, &HashMap::new()).is_none());
    }
}
