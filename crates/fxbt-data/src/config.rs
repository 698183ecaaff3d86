use std::fs;
use std::path::Path;

use fxbt_core::indicators::Metric;
use fxbt_core::manager::MetricsManager;
use fxbt_core::pipeline::{DefaultExitDistances, SymbolPipeline};
use fxbt_core::predicates::{Predicate, PredicateList};
use fxbt_core::registry::{build_engine, build_metric, EngineParams, MetricParams};
use serde::Deserialize;

use crate::error::ConfigLoadError;

/// One symbol's full run configuration: the same YAML shape the teacher's
/// config layer would hand to a registry, but driving `fxbt_core`'s
/// `MetricParams`/`EngineParams` instead.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolConfig {
    pub name: String,
    pub pip_size: f64,
    #[serde(default)]
    pub warmup_seconds: f64,
    #[serde(default)]
    pub timeout_seconds: f64,
    #[serde(default)]
    pub default_tp_pips: f64,
    #[serde(default)]
    pub default_sl_pips: f64,
    pub metrics: Vec<MetricParams>,
    pub engine: EngineParams,
    #[serde(default)]
    pub entry_predicates: Vec<Predicate>,
    #[serde(default)]
    pub exit_predicates: Vec<Predicate>,
}

/// A full run: a list of per-symbol configs, indexed by position to assign
/// `symbol_id`s (position 0 is `symbol_id` 0, and so on).
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub symbols: Vec<SymbolConfig>,
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let text = fs::read_to_string(path)?;
        let config: RunConfig = serde_yaml::from_str(&text)?;
        Ok(config)
    }

    pub fn symbol_id_for(&self, name: &str) -> Option<u32> {
        self.symbols
            .iter()
            .position(|s| s.name == name)
            .map(|i| i as u32)
    }

    pub fn symbol_name(&self, symbol_id: u32) -> Option<&str> {
        self.symbols
            .get(symbol_id as usize)
            .map(|s| s.name.as_str())
    }

    /// Builds the `symbol_id`'th symbol's pipeline, validating every metric
    /// and the engine through the registry's constructors.
    pub fn build_pipeline(&self, symbol_id: u32) -> Result<SymbolPipeline, ConfigLoadError> {
        let cfg = self.symbols.get(symbol_id as usize).ok_or_else(|| {
            ConfigLoadError::UnknownSymbol(format!("no symbol config at index {symbol_id}"))
        })?;

        let metrics: Vec<Box<dyn Metric>> = cfg
            .metrics
            .iter()
            .map(build_metric)
            .collect::<Result<_, _>>()?;
        let engine = build_engine(&cfg.engine)?;

        let default_exits = DefaultExitDistances {
            tp_pips: cfg.default_tp_pips,
            sl_pips: cfg.default_sl_pips,
        };

        Ok(SymbolPipeline::new(
            symbol_id,
            cfg.pip_size,
            cfg.warmup_seconds,
            cfg.timeout_seconds,
            default_exits,
            MetricsManager::new(metrics),
            PredicateList::new(cfg.entry_predicates.clone()),
            PredicateList::new(cfg.exit_predicates.clone()),
            engine,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = r#"
symbols:
  - name: EURUSD
    pip_size: 0.0001
    warmup_seconds: 0
    timeout_seconds: 600
    engine:
      type: stub
    metrics:
      - type: ewma
        name: fast
        tau: 10.0
        price_field: mid
      - type: threshold_reversion
        name: reversion
        pip_size: 0.0001
        threshold_pips: 10.0
        tp_pips: 6.0
        sl_pips: 6.0
        min_recency_seconds: 0
        lookback_seconds: 60
"#;

    #[test]
    fn loads_and_builds_a_pipeline() {
        let config: RunConfig = serde_yaml::from_str(MINIMAL_YAML).unwrap();
        assert_eq!(config.symbol_id_for("EURUSD"), Some(0));
        let pipeline = config.build_pipeline(0).unwrap();
        assert!(pipeline.trades().is_empty());
    }

    #[test]
    fn unknown_symbol_id_is_an_error() {
        let config: RunConfig = serde_yaml::from_str(MINIMAL_YAML).unwrap();
        assert!(config.build_pipeline(7).is_err());
    }

    #[test]
    fn invalid_metric_params_surface_as_config_load_error() {
        let yaml = r#"
symbols:
  - name: EURUSD
    pip_size: 0.0001
    engine:
      type: stub
    metrics:
      - type: ewma
        name: fast
        tau: -1.0
        price_field: mid
"#;
        let config: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            config.build_pipeline(0),
            Err(ConfigLoadError::Core(_))
        ));
    }
}
