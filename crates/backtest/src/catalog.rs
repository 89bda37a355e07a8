use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use common::{BacktestMetrics, CandleSource, Result};
use strategy::Strategy;

use crate::Backtester;

/// Backtest results for every strategy across a set of assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub timeframe_seconds: u32,
    /// One entry per asset with history, in the order assets were requested.
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub asset: String,
    /// One result per registered strategy, in registration order.
    pub results: Vec<BacktestMetrics>,
}

impl Catalog {
    pub fn get(&self, asset: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.asset == asset)
    }

    /// Most accurate (asset, strategy) result; ties keep the first seen.
    pub fn best(&self) -> Option<&BacktestMetrics> {
        self.entries
            .iter()
            .flat_map(|e| e.results.iter())
            .fold(None, |best: Option<&BacktestMetrics>, m| match best {
                Some(b) if m.accuracy <= b.accuracy => Some(b),
                _ => Some(m),
            })
    }
}

/// A chosen (asset, strategy) pairing with the metrics that justified it.
#[derive(Clone)]
pub struct Selection {
    pub asset: String,
    pub strategy: Arc<dyn Strategy>,
    pub metrics: BacktestMetrics,
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("asset", &self.asset)
            .field("strategy", &self.strategy.name())
            .field("metrics", &self.metrics)
            .finish()
    }
}

/// Highest-accuracy selection; on ties the earliest candidate wins.
pub fn select_best(candidates: impl IntoIterator<Item = Selection>) -> Option<Selection> {
    let mut best: Option<Selection> = None;
    for candidate in candidates {
        let better = best
            .as_ref()
            .map_or(true, |b| candidate.metrics.accuracy > b.metrics.accuracy);
        if better {
            best = Some(candidate);
        }
    }
    best
}

/// Whether `candidate` should replace the pairing currently traded.
///
/// The candidate must reach `min_accuracy` and, if something is already
/// selected, be strictly more accurate than it.
pub fn should_switch(
    current: Option<&BacktestMetrics>,
    candidate: &BacktestMetrics,
    min_accuracy: f64,
) -> bool {
    candidate.accuracy >= min_accuracy
        && current.map_or(true, |c| candidate.accuracy > c.accuracy)
}

/// Backtest every strategy on each asset's history.
///
/// Assets without candles are skipped. Results are labeled with their asset
/// and timeframe.
pub async fn build_catalog(
    assets: &[String],
    timeframe_seconds: u32,
    count: usize,
    source: &dyn CandleSource,
    backtester: &Backtester,
) -> Result<Catalog> {
    let mut catalog = Catalog {
        timeframe_seconds,
        entries: Vec::with_capacity(assets.len()),
    };

    for asset in assets {
        let candles = source.get_candles(asset, timeframe_seconds, count, None).await?;
        if candles.is_empty() {
            warn!(asset = %asset, "No candle history, skipping asset");
            continue;
        }

        let results = backtester
            .backtest_on_candles(&candles)?
            .into_iter()
            .map(|m| m.labeled(asset.as_str(), timeframe_seconds))
            .collect();
        info!(asset = %asset, candles = candles.len(), "Asset cataloged");
        catalog.entries.push(CatalogEntry {
            asset: asset.clone(),
            results,
        });
    }

    Ok(catalog)
}

/// Pick the best strategy per asset, then the best pairing overall.
///
/// Returns `None` when no asset has candle history.
pub async fn rebalance(
    assets: &[String],
    timeframe_seconds: u32,
    count: usize,
    source: &dyn CandleSource,
    backtester: &Backtester,
) -> Result<Option<Selection>> {
    let mut picks = Vec::with_capacity(assets.len());
    for asset in assets {
        let candles = source.get_candles(asset, timeframe_seconds, count, None).await?;
        if candles.is_empty() {
            warn!(asset = %asset, "No candle history, skipping asset");
            continue;
        }
        let (strategy, metrics) = backtester.pick_best(asset, timeframe_seconds, &candles)?;
        picks.push(Selection {
            asset: asset.clone(),
            strategy,
            metrics,
        });
    }

    let selection = select_best(picks);
    match &selection {
        Some(s) => info!(
            asset = %s.asset,
            strategy = %s.strategy.name(),
            accuracy_pct = s.metrics.accuracy_pct(),
            taken_trades = s.metrics.taken_trades,
            "Strategy selected"
        ),
        None => warn!("No asset produced a selection"),
    }
    Ok(selection)
}
