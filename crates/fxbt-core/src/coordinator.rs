use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{CoreError, CoreResult};
use crate::io::TickProducer;
use crate::pipeline::SymbolPipeline;
use crate::positions::TradeRecord;

/// The outcome of running one symbol's pipeline to feed exhaustion (or
/// until it raised an `InvariantViolation`).
pub struct SymbolRun {
    pub symbol_id: u32,
    pub trades: Vec<TradeRecord>,
    pub error: Option<CoreError>,
}

/// Drains a producer into a pipeline until exhaustion, force-closing any
/// open position at the end. Strictly sequential — this is the only loop
/// shape a single symbol ever runs.
pub fn run_symbol(
    pipeline: &mut SymbolPipeline,
    producer: &mut dyn TickProducer,
) -> CoreResult<()> {
    loop {
        match producer.next_tick() {
            Ok(Some(tick)) => pipeline.on_tick(&tick)?,
            Ok(None) => {
                pipeline.on_feed_exhausted()?;
                return Ok(());
            }
            Err(e) => {
                return Err(CoreError::InvariantViolation(format!(
                    "producer error: {e}"
                )))
            }
        }
    }
}

/// Runs every symbol's pipeline to completion, one rayon task per symbol.
/// Symbols never share mutable state (spec §5), so there is no
/// synchronization beyond collecting results — a failing symbol's
/// `InvariantViolation` is isolated in its own [`SymbolRun`] and never
/// aborts the others. A panicking pipeline is caught the same way: it
/// becomes that symbol's error instead of taking down the whole batch.
pub fn run_all(
    jobs: Vec<(u32, SymbolPipeline, Box<dyn TickProducer + Send>)>,
) -> Vec<SymbolRun> {
    jobs.into_par_iter()
        .map(|(symbol_id, mut pipeline, mut producer)| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                run_symbol(&mut pipeline, producer.as_mut())
            }))
            .unwrap_or_else(|payload| Err(CoreError::InvariantViolation(format!(
                "panicked: {}",
                panic_message(&payload)
            ))));
            match &result {
                Ok(()) => info!(symbol_id, trades = pipeline.trades().len(), "run finished"),
                Err(e) => warn!(symbol_id, %e, "run aborted"),
            }
            SymbolRun {
                symbol_id,
                trades: pipeline.trades().to_vec(),
                error: result.err(),
            }
        })
        .collect()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
