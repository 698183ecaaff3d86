//! Indicator metrics: online estimators implementing [`Metric`], each
//! feeding its fields into the per-tick snapshot under its own name prefix.

mod drift_sign;
mod ewma_metric;
mod ewma_slope;
mod ewma_vol;
pub mod metric_trait;
mod session;
mod spread;
mod threshold_reversion;
mod tick_rate;
mod zscore;

pub use drift_sign::DriftSign;
pub use ewma_metric::EwmaMetric;
pub use ewma_slope::EwmaSlope;
pub use ewma_vol::EwmaVol;
pub use metric_trait::{qualify, Metric, PriceField, SnapshotValue};
pub use session::Session;
pub use spread::Spread;
pub use threshold_reversion::ThresholdReversion;
pub use tick_rate::TickRate;
pub use zscore::ZScore;
