use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use common::{Error, Result};

use crate::config::{StrategyConfig, StrategyFileConfig};
use crate::reversal::MajorityReversal;
use crate::Strategy;

/// Ordered set of strategy instances.
///
/// Registration order is significant: selection ties resolve to the
/// strategy registered first.
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl Default for StrategyRegistry {
    /// Reversal-3 followed by Reversal-5.
    fn default() -> Self {
        Self::from_strategies(vec![
            Arc::new(MajorityReversal::three()) as Arc<dyn Strategy>,
            Arc::new(MajorityReversal::five()),
        ])
    }
}

impl StrategyRegistry {
    pub fn from_strategies(strategies: Vec<Arc<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Build the registry from config, failing on unknown strategy types.
    pub fn from_config(file_cfg: &StrategyFileConfig) -> Result<Self> {
        let mut strategies: Vec<Arc<dyn Strategy>> = Vec::with_capacity(file_cfg.strategies.len());

        for cfg in &file_cfg.strategies {
            let strategy = build_strategy(cfg)?;
            info!(name = %strategy.name(), kind = %cfg.strategy_type, "Registered strategy");
            strategies.push(strategy);
        }

        if strategies.is_empty() {
            return Err(Error::NoStrategies);
        }
        Ok(Self { strategies })
    }

    pub fn register(&mut self, strategy: Arc<dyn Strategy>) {
        info!(name = %strategy.name(), "Registered strategy");
        self.strategies.push(strategy);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Strategy>> {
        self.strategies.iter()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Strategy>> {
        self.strategies.iter().find(|s| s.name() == name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

// ─── Strategy builders ────────────────────────────────────────────────────────

fn build_strategy(cfg: &StrategyConfig) -> Result<Arc<dyn Strategy>> {
    match cfg.strategy_type.as_str() {
        "reversal" => {
            let lookback = param_usize(&cfg.params, "lookback", 3)?;
            if lookback == 0 {
                return Err(Error::Config(format!(
                    "strategy '{}': lookback must be >= 1",
                    cfg.name
                )));
            }
            Ok(Arc::new(MajorityReversal::new(cfg.name.clone(), lookback)))
        }
        other => Err(Error::UnknownStrategy(other.to_string())),
    }
}

fn param_usize(params: &HashMap<String, toml::Value>, key: &str, default: usize) -> Result<usize> {
    match params.get(key) {
        None => Ok(default),
        Some(v) => v
            .as_integer()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| Error::Config(format!("param '{key}' must be a non-negative integer"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> StrategyFileConfig {
        StrategyFileConfig::parse(toml).unwrap()
    }

    #[test]
    fn default_registry_is_reversal_three_then_five() {
        let registry = StrategyRegistry::default();
        assert_eq!(registry.names(), vec!["Reversal-3", "Reversal-5"]);
    }

    #[test]
    fn builds_reversal_from_config_in_file_order() {
        let registry = StrategyRegistry::from_config(&parse(
            r#"
            [[strategy]]
            type = "reversal"
            name = "Slow"
            params = { lookback = 7 }

            [[strategy]]
            type = "reversal"
            name = "Default"
            "#,
        ))
        .unwrap();
        assert_eq!(registry.names(), vec!["Slow", "Default"]);
        assert!(registry.get("Slow").is_some());
        assert!(registry.get("Missing").is_none());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = StrategyRegistry::from_config(&parse(
            r#"
            [[strategy]]
            type = "macd"
            name = "x"
            "#,
        ))
        .err()
        .unwrap();
        assert!(matches!(err, Error::UnknownStrategy(t) if t == "macd"));
    }

    #[test]
    fn zero_or_negative_lookback_is_rejected() {
        for lookback in ["0", "-2", "\"five\""] {
            let toml = format!(
                "[[strategy]]\ntype = \"reversal\"\nname = \"bad\"\nparams = {{ lookback = {lookback} }}\n"
            );
            let err = StrategyRegistry::from_config(&parse(&toml)).err().unwrap();
            assert!(matches!(err, Error::Config(_)), "lookback {lookback}");
        }
    }

    #[test]
    fn empty_config_has_no_strategies() {
        let cfg = StrategyFileConfig { strategies: Vec::new() };
        assert!(matches!(
            StrategyRegistry::from_config(&cfg).err().unwrap(),
            Error::NoStrategies
        ));
    }

    #[test]
    fn shipped_config_matches_default_registry() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/strategies.toml");
        let registry = StrategyRegistry::from_config(&StrategyFileConfig::load(path).unwrap()).unwrap();
        assert_eq!(registry.names(), StrategyRegistry::default().names());
    }

    #[test]
    fn register_appends() {
        let mut registry = StrategyRegistry::default();
        registry.register(Arc::new(MajorityReversal::new("Reversal-7", 7)));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names()[2], "Reversal-7");
    }
}
