//! String-keyed constructor registries: one for metrics, one for entry
//! engines. The config layer parses YAML into these param structs and
//! hands them to the registry — the core never parses config itself.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engines::{CrossoverEngine, EntryEngine, ReversionEngine, StubEngine};
use crate::error::ConfigError;
use crate::indicators::{
    DriftSign, EwmaMetric, EwmaSlope, EwmaVol, Metric, PriceField, Session, Spread,
    ThresholdReversion, TickRate, ZScore,
};

/// A metric's validated construction parameters, tagged by its type string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetricParams {
    Ewma {
        name: String,
        tau: f64,
        initial_value: Option<f64>,
        price_field: String,
    },
    EwmaSlope {
        name: String,
        tau: f64,
        window_seconds: f64,
        initial_value: Option<f64>,
        price_field: String,
    },
    EwmaVol {
        name: String,
        tau: f64,
        percentile_horizon_seconds: f64,
        bins: usize,
        base_vol: f64,
        stddev_cap: f64,
    },
    ZScore {
        name: String,
        lookback_seconds: f64,
    },
    DriftSign {
        name: String,
        lookback_seconds: f64,
    },
    Session {
        name: String,
    },
    Spread {
        name: String,
        pip_size: f64,
        window_seconds: f64,
    },
    TickRate {
        name: String,
        window_seconds: f64,
    },
    ThresholdReversion {
        name: String,
        pip_size: f64,
        threshold_pips: f64,
        tp_pips: f64,
        sl_pips: f64,
        min_recency_seconds: f64,
        lookback_seconds: f64,
    },
}

/// Builds the boxed [`Metric`] named by a [`MetricParams`] variant. Unknown
/// type tags can't reach this function — `serde`'s `tag` already rejects
/// them during config parsing — but each variant still validates its own
/// numeric parameters and can fail with a [`ConfigError`].
pub fn build_metric(params: &MetricParams) -> Result<Box<dyn Metric>, ConfigError> {
    debug!(?params, "building metric");
    Ok(match params {
        MetricParams::Ewma {
            name,
            tau,
            initial_value,
            price_field,
        } => Box::new(EwmaMetric::new(
            name.clone(),
            *tau,
            *initial_value,
            PriceField::parse(price_field)?,
        )?),
        MetricParams::EwmaSlope {
            name,
            tau,
            window_seconds,
            initial_value,
            price_field,
        } => Box::new(EwmaSlope::new(
            name.clone(),
            *tau,
            *window_seconds,
            *initial_value,
            PriceField::parse(price_field)?,
        )?),
        MetricParams::EwmaVol {
            name,
            tau,
            percentile_horizon_seconds,
            bins,
            base_vol,
            stddev_cap,
        } => Box::new(EwmaVol::new(
            name.clone(),
            *tau,
            *percentile_horizon_seconds,
            *bins,
            *base_vol,
            *stddev_cap,
        )?),
        MetricParams::ZScore { name, lookback_seconds } => {
            Box::new(ZScore::new(name.clone(), *lookback_seconds)?)
        }
        MetricParams::DriftSign { name, lookback_seconds } => {
            Box::new(DriftSign::new(name.clone(), *lookback_seconds)?)
        }
        MetricParams::Session { name } => Box::new(Session::new(name.clone())),
        MetricParams::Spread {
            name,
            pip_size,
            window_seconds,
        } => Box::new(Spread::new(name.clone(), *pip_size, *window_seconds)?),
        MetricParams::TickRate { name, window_seconds } => {
            Box::new(TickRate::new(name.clone(), *window_seconds)?)
        }
        MetricParams::ThresholdReversion {
            name,
            pip_size,
            threshold_pips,
            tp_pips,
            sl_pips,
            min_recency_seconds,
            lookback_seconds,
        } => Box::new(ThresholdReversion::new(
            name.clone(),
            *pip_size,
            *threshold_pips,
            *tp_pips,
            *sl_pips,
            *min_recency_seconds,
            *lookback_seconds,
        )?),
    })
}

/// An entry engine's validated construction parameters, tagged by its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineParams {
    Reversion {
        metric_name: String,
    },
    Crossover {
        fast_key: String,
        slow_key: String,
        long_on_cross: bool,
        short_on_cross: bool,
        tp_pips: f64,
        sl_pips: f64,
        pip_size: f64,
        #[serde(default)]
        trade_timeout_seconds: Option<f64>,
    },
    Stub,
}

pub fn build_engine(params: &EngineParams) -> Result<Box<dyn EntryEngine>, ConfigError> {
    debug!(?params, "building engine");
    Ok(match params {
        EngineParams::Reversion { metric_name } => {
            Box::new(ReversionEngine::new(metric_name.clone())?)
        }
        EngineParams::Crossover {
            fast_key,
            slow_key,
            long_on_cross,
            short_on_cross,
            tp_pips,
            sl_pips,
            pip_size,
            trade_timeout_seconds,
        } => Box::new(CrossoverEngine::new(
            fast_key.clone(),
            slow_key.clone(),
            *long_on_cross,
            *short_on_cross,
            *tp_pips,
            *sl_pips,
            *pip_size,
            *trade_timeout_seconds,
        )?),
        EngineParams::Stub => Box::new(StubEngine),
    })
}
