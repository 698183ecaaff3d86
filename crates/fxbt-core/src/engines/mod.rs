//! Pluggable entry engines: consulted only while a symbol pipeline is flat
//! and its entry predicates have already passed.

mod crossover;
pub mod engine_trait;
mod reversion;
mod stub;

pub use crossover::CrossoverEngine;
pub use engine_trait::{EntryEngine, EntrySignal};
pub use reversion::ReversionEngine;
pub use stub::StubEngine;
