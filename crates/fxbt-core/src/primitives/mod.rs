//! Reusable incremental estimators shared by the indicator metrics.
//!
//! Every primitive here is append-only, amortized O(1) per operation, and
//! silently skips non-finite input rather than propagating an error — the
//! validating producer upstream is assumed to have already filtered bad
//! ticks (see `error::CoreError` and spec §7's `DataAnomaly` handling).

mod ewma;
mod histogram;
mod monotonic_queue;
mod rolling_window;

pub use ewma::Ewma;
pub use histogram::TimeWeightedHistogram;
pub use monotonic_queue::{Extremum, MonotonicQueue};
pub use rolling_window::TimeWeightedWindow;
