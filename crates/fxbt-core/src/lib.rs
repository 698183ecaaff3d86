//! Deterministic, tick-level FX backtesting core.
//!
//! Each symbol owns an independent [`pipeline::SymbolPipeline`] driven
//! strictly sequentially by a [`io::TickProducer`]; the [`coordinator`]
//! module is the only place multiple symbols run concurrently.

pub mod coordinator;
pub mod engines;
pub mod error;
pub mod indicators;
pub mod io;
pub mod manager;
pub mod pipeline;
pub mod positions;
pub mod predicates;
pub mod primitives;
pub mod registry;
pub mod tick;

pub use error::{CoreError, CoreResult};
pub use tick::Tick;
