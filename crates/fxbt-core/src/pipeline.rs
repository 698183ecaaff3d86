use tracing::{debug, info};

use crate::engines::{EntryEngine, EntrySignal};
use crate::error::{CoreError, CoreResult};
use crate::manager::MetricsManager;
use crate::positions::{Outcome, Position, TradeRecord};
use crate::predicates::PredicateList;
use crate::tick::Tick;

/// Fallback TP/SL pip distances used when an engine leaves its signal's
/// price unset (`NaN`) — recomputed off the entry price per spec §4.9.
#[derive(Debug, Clone, Copy)]
pub struct DefaultExitDistances {
    pub tp_pips: f64,
    pub sl_pips: f64,
}

impl DefaultExitDistances {
    pub fn none() -> Self {
        Self {
            tp_pips: 0.0,
            sl_pips: 0.0,
        }
    }
}

/// One symbol's independent, strictly sequential tick loop: metrics update,
/// then exit evaluation, then entry evaluation, matching spec §5's fixed
/// per-tick ordering. Owns all its state; never shares it with another
/// symbol's pipeline.
pub struct SymbolPipeline {
    symbol_id: u32,
    pip_size: f64,
    warmup_seconds: f64,
    timeout_seconds: f64,
    default_exits: DefaultExitDistances,
    run_start: Option<f64>,
    manager: MetricsManager,
    entry_predicates: PredicateList,
    exit_predicates: PredicateList,
    engine: Box<dyn EntryEngine>,
    position: Position,
    last_tick: Option<Tick>,
    trades: Vec<TradeRecord>,
}

impl SymbolPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol_id: u32,
        pip_size: f64,
        warmup_seconds: f64,
        timeout_seconds: f64,
        default_exits: DefaultExitDistances,
        manager: MetricsManager,
        entry_predicates: PredicateList,
        exit_predicates: PredicateList,
        engine: Box<dyn EntryEngine>,
    ) -> Self {
        Self {
            symbol_id,
            pip_size,
            warmup_seconds,
            timeout_seconds,
            default_exits,
            run_start: None,
            manager,
            entry_predicates,
            exit_predicates,
            engine,
            position: Position::flat(),
            last_tick: None,
            trades: Vec::new(),
        }
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn anomaly_count(&self) -> u64 {
        // non-finite/out-of-order ticks are rejected by the validating
        // producer upstream (spec §7); the core has nothing to count here
        // beyond what it already refuses via `on_tick`'s ordering check.
        0
    }

    /// Feeds one tick through the full per-tick pipeline.
    pub fn on_tick(&mut self, tick: &Tick) -> CoreResult<()> {
        if let Some(last) = self.last_tick {
            if tick.timestamp < last.timestamp {
                return Err(CoreError::InvariantViolation(format!(
                    "non-monotone timestamp: {} after {}",
                    tick.timestamp, last.timestamp
                )));
            }
        }
        let run_start = *self.run_start.get_or_insert_with(|| {
            info!(symbol_id = self.symbol_id, start = tick.timestamp, "run started");
            tick.timestamp
        });

        self.manager.update_all(tick);
        self.last_tick = Some(*tick);

        if tick.timestamp - run_start < self.warmup_seconds {
            return Ok(());
        }

        if !self.position.is_flat() {
            let exit_predicates_true = self.exit_predicates.evaluate(self.manager.snapshot());
            if let Some((outcome, exit_price)) =
                self.position.check_exit(tick, exit_predicates_true)
            {
                self.emit_trade(outcome, exit_price, tick.timestamp)?;
            }
        }

        if self.position.is_flat() && self.entry_predicates.evaluate(self.manager.snapshot()) {
            if let Some(signal) = self.engine.evaluate(tick, self.manager.snapshot()) {
                self.open_position(signal, tick)?;
            }
        }

        Ok(())
    }

    /// Forces a close of any open position at the last known tick. Call
    /// once after the producer reports feed exhaustion.
    pub fn on_feed_exhausted(&mut self) -> CoreResult<()> {
        let Some(last) = self.last_tick else {
            return Ok(());
        };
        if let Some((outcome, exit_price)) = self.position.force_close(&last) {
            self.emit_trade(outcome, exit_price, last.timestamp)?;
        }
        Ok(())
    }

    fn open_position(&mut self, signal: EntrySignal, tick: &Tick) -> CoreResult<()> {
        if !self.position.is_flat() {
            return Err(CoreError::InvariantViolation(
                "engine requested open while a position is already open".to_string(),
            ));
        }
        let direction = signal.direction;
        let entry_price = if direction == 1 { tick.ask } else { tick.bid };

        let tp_price = if signal.tp_price.is_finite() {
            signal.tp_price
        } else if self.default_exits.tp_pips > 0.0 {
            entry_price + direction as f64 * self.default_exits.tp_pips * self.pip_size
        } else {
            f64::NAN
        };
        let sl_price = if signal.sl_price.is_finite() {
            signal.sl_price
        } else if self.default_exits.sl_pips > 0.0 {
            entry_price - direction as f64 * self.default_exits.sl_pips * self.pip_size
        } else {
            f64::NAN
        };

        let timeout_seconds = signal.trade_timeout_seconds.unwrap_or(self.timeout_seconds);

        self.position = Position::open(
            direction,
            tick.timestamp,
            entry_price,
            tp_price,
            sl_price,
            timeout_seconds,
            signal.reason,
            signal.entry_metadata,
        );
        debug!(
            symbol_id = self.symbol_id,
            direction, entry_price, tp_price, sl_price, "position opened"
        );
        Ok(())
    }

    fn emit_trade(&mut self, outcome: Outcome, exit_price: f64, exit_timestamp: f64) -> CoreResult<()> {
        if self.position.is_flat() {
            return Err(CoreError::InvariantViolation(
                "attempted to emit a trade without a matching open position".to_string(),
            ));
        }
        let trade = TradeRecord::new(
            self.symbol_id,
            self.position.direction,
            self.position.entry_timestamp,
            self.position.entry_price,
            exit_timestamp,
            exit_price,
            outcome,
            self.pip_size,
            self.position.reason.clone(),
            self.position.entry_metadata.clone(),
        );
        debug!(
            symbol_id = self.symbol_id,
            outcome = ?trade.outcome,
            pnl_pips = trade.pnl_pips,
            "position closed"
        );
        self.trades.push(trade);
        self.position = Position::flat();
        Ok(())
    }
}
