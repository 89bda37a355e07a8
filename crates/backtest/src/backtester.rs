use std::sync::Arc;

use tracing::{debug, info};

use common::{validate_candles, BacktestMetrics, Candle, Error, Result};
use strategy::{Confluence, ConfluenceEngine, Strategy, StrategyRegistry};

/// Runs every registered strategy over a candle history under one
/// confluence gate.
#[derive(Clone)]
pub struct Backtester {
    registry: StrategyRegistry,
    confluence: Arc<dyn Confluence>,
    confluence_threshold: u32,
}

impl Backtester {
    pub fn new(
        registry: StrategyRegistry,
        confluence: impl Confluence + 'static,
        confluence_threshold: u32,
    ) -> Self {
        Self {
            registry,
            confluence: Arc::new(confluence),
            confluence_threshold,
        }
    }

    /// Default strategy set gated by the default [`ConfluenceEngine`].
    pub fn with_threshold(confluence_threshold: u32) -> Self {
        Self::new(
            StrategyRegistry::default(),
            ConfluenceEngine::default(),
            confluence_threshold,
        )
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn confluence_threshold(&self) -> u32 {
        self.confluence_threshold
    }

    /// Metrics for every registered strategy, in registration order.
    ///
    /// The metrics are unlabeled (`asset` empty, `timeframe_seconds` 0).
    pub fn backtest_on_candles(&self, candles: &[Candle]) -> Result<Vec<BacktestMetrics>> {
        self.check(candles)?;
        Ok(self
            .registry
            .iter()
            .map(|strategy| self.run(strategy.as_ref(), candles))
            .collect())
    }

    /// The most accurate strategy for `asset` over `candles`.
    ///
    /// Ties go to the strategy registered first. The returned metrics carry
    /// `asset` and `timeframe_seconds` labels.
    pub fn pick_best(
        &self,
        asset: &str,
        timeframe_seconds: u32,
        candles: &[Candle],
    ) -> Result<(Arc<dyn Strategy>, BacktestMetrics)> {
        self.check(candles)?;

        let mut best: Option<(Arc<dyn Strategy>, BacktestMetrics)> = None;
        for strategy in self.registry.iter() {
            let metrics = self
                .run(strategy.as_ref(), candles)
                .labeled(asset, timeframe_seconds);
            let better = best
                .as_ref()
                .map_or(true, |(_, current)| metrics.accuracy > current.accuracy);
            if better {
                best = Some((Arc::clone(strategy), metrics));
            }
        }

        let (strategy, metrics) = best.ok_or(Error::NoStrategies)?;
        info!(
            asset = %asset,
            strategy = %strategy.name(),
            accuracy_pct = metrics.accuracy_pct(),
            taken_trades = metrics.taken_trades,
            "Best strategy picked"
        );
        Ok((strategy, metrics))
    }

    fn check(&self, candles: &[Candle]) -> Result<()> {
        if self.registry.is_empty() {
            return Err(Error::NoStrategies);
        }
        validate_candles(candles)
    }

    fn run(&self, strategy: &dyn Strategy, candles: &[Candle]) -> BacktestMetrics {
        let metrics = strategy.backtest(candles, self.confluence.as_ref(), self.confluence_threshold);
        debug!(
            strategy = %metrics.strategy_name,
            candles = candles.len(),
            signals = metrics.total_signals,
            taken = metrics.taken_trades,
            wins = metrics.wins,
            losses = metrics.losses,
            equals = metrics.equals,
            "Backtest finished"
        );
        metrics
    }
}
