use std::path::PathBuf;
use std::str::FromStr;

use crate::{Error, Result};

/// Settings for catalog building and strategy selection, loaded from
/// environment variables at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Assets to evaluate, upper-cased (e.g. "EURUSD").
    pub assets: Vec<String>,
    pub timeframe_seconds: u32,
    /// Number of historical candles fetched per asset for backtesting.
    pub backtest_candles: usize,
    /// Minimum confluence score for a signal to count as a taken trade.
    pub confluence_threshold: u32,
    /// A candidate only replaces the current pairing at or above this accuracy.
    pub min_accuracy_to_select: f64,
    /// Directory holding `<ASSET>_<timeframe>.json` candle files.
    pub history_dir: PathBuf,
    /// Optional TOML file describing the strategy set.
    pub strategy_config_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            assets: vec!["EURUSD".to_string()],
            timeframe_seconds: 60,
            backtest_candles: 1500,
            confluence_threshold: 60,
            min_accuracy_to_select: 0.9,
            history_dir: PathBuf::from("data/history"),
            strategy_config_path: None,
        }
    }
}

impl Settings {
    /// Load from the process environment. Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let assets = match lookup("ASSETS") {
            Some(raw) => {
                let assets: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                if assets.is_empty() {
                    return Err(Error::Config("ASSETS must name at least one asset".into()));
                }
                assets
            }
            None => defaults.assets,
        };

        let timeframe_seconds = parse_or(&lookup, "TIMEFRAME_SECONDS", defaults.timeframe_seconds)?;
        if timeframe_seconds == 0 {
            return Err(Error::Config("TIMEFRAME_SECONDS must be positive".into()));
        }

        let min_accuracy_to_select =
            parse_or(&lookup, "MIN_ACCURACY_TO_SELECT", defaults.min_accuracy_to_select)?;
        if !(0.0..=1.0).contains(&min_accuracy_to_select) {
            return Err(Error::Config(format!(
                "MIN_ACCURACY_TO_SELECT must be within [0, 1], got {min_accuracy_to_select}"
            )));
        }

        Ok(Settings {
            assets,
            timeframe_seconds,
            backtest_candles: parse_or(&lookup, "BACKTEST_CANDLES", defaults.backtest_candles)?,
            confluence_threshold: parse_or(
                &lookup,
                "CONFLUENCE_THRESHOLD",
                defaults.confluence_threshold,
            )?,
            min_accuracy_to_select,
            history_dir: lookup("HISTORY_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_dir),
            strategy_config_path: lookup("STRATEGY_CONFIG_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            Error::Config(format!("{key} has an invalid value: '{}'", raw.trim()))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn assets_are_trimmed_and_uppercased() {
        let settings = Settings::from_lookup(lookup(&[("ASSETS", " eurusd, gbpjpy ,,")])).unwrap();
        assert_eq!(settings.assets, vec!["EURUSD", "GBPJPY"]);
    }

    #[test]
    fn numeric_overrides_are_parsed() {
        let settings = Settings::from_lookup(lookup(&[
            ("TIMEFRAME_SECONDS", "300"),
            ("BACKTEST_CANDLES", "500"),
            ("CONFLUENCE_THRESHOLD", "45"),
            ("MIN_ACCURACY_TO_SELECT", "0.75"),
            ("STRATEGY_CONFIG_PATH", "config/strategies.toml"),
        ]))
        .unwrap();
        assert_eq!(settings.timeframe_seconds, 300);
        assert_eq!(settings.backtest_candles, 500);
        assert_eq!(settings.confluence_threshold, 45);
        assert_eq!(settings.min_accuracy_to_select, 0.75);
        assert_eq!(
            settings.strategy_config_path,
            Some(PathBuf::from("config/strategies.toml"))
        );
    }

    #[test]
    fn invalid_number_is_config_error() {
        let err = Settings::from_lookup(lookup(&[("CONFLUENCE_THRESHOLD", "high")])).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("CONFLUENCE_THRESHOLD")));
    }

    #[test]
    fn zero_timeframe_is_rejected() {
        assert!(Settings::from_lookup(lookup(&[("TIMEFRAME_SECONDS", "0")])).is_err());
    }

    #[test]
    fn out_of_range_accuracy_is_rejected() {
        assert!(Settings::from_lookup(lookup(&[("MIN_ACCURACY_TO_SELECT", "1.5")])).is_err());
    }

    #[test]
    fn blank_asset_list_is_rejected() {
        assert!(Settings::from_lookup(lookup(&[("ASSETS", " , ")])).is_err());
    }
}
