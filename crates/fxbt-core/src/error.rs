use thiserror::Error;

/// Fatal errors raised while constructing the per-tick pipeline from config.
///
/// Configuration errors are surfaced before any tick is processed; the
/// pipeline never partially constructs itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{param} must be positive, got {value}")]
    NotPositive { param: &'static str, value: f64 },

    #[error("unknown price field: {0}")]
    UnknownPriceField(String),

    #[error("histogram needs at least 2 bins, got {0}")]
    TooFewBins(usize),

    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Fatal, per-symbol errors raised while running the tick loop.
///
/// An `InvariantViolation` aborts only the symbol whose pipeline raised it;
/// the coordinator isolates the failure from other symbols.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
