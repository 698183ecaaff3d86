use thiserror::Error;

use crate::positions::TradeRecord;
use crate::tick::Tick;

/// Raised by a [`TickProducer`] when it cannot continue supplying ticks.
#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("tick source exhausted unexpectedly: {0}")]
    UnexpectedEnd(String),
    #[error("tick source io error: {0}")]
    Io(String),
    #[error("malformed tick: {0}")]
    Malformed(String),
}

/// Raised by a [`TradeSink`] when it cannot accept a trade record.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("trade sink io error: {0}")]
    Io(String),
}

/// Supplies ticks to a symbol pipeline, one at a time, in monotone
/// timestamp order. `Ok(None)` signals feed exhaustion.
pub trait TickProducer {
    fn next_tick(&mut self) -> Result<Option<Tick>, ProducerError>;
}

/// Accepts closed trade records in chronological exit order. Must accept
/// every record synchronously — no buffering contract beyond the sink's
/// own implementation.
pub trait TradeSink {
    fn emit(&mut self, trade: &TradeRecord) -> Result<(), SinkError>;
}
