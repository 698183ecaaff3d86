pub mod config;
pub mod csv_producer;
pub mod error;
pub mod sqlite_sink;

pub use config::{RunConfig, SymbolConfig};
pub use csv_producer::CsvTickProducer;
pub use error::{ConfigLoadError, ImportError, SinkError};
pub use sqlite_sink::SqliteTradeSink;
