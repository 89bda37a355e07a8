use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use backtest::{build_catalog, rebalance, should_switch, Backtester, HistoryDir};
use common::Settings;
use strategy::{ConfluenceEngine, StrategyFileConfig, StrategyRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Settings::from_env().context("invalid settings")?;
    info!(
        assets = ?cfg.assets,
        timeframe_seconds = cfg.timeframe_seconds,
        candles = cfg.backtest_candles,
        threshold = cfg.confluence_threshold,
        "Catalog starting"
    );

    // ── Strategy registry ─────────────────────────────────────────────────────
    let registry = match &cfg.strategy_config_path {
        Some(path) => {
            let file = StrategyFileConfig::load(path)
                .with_context(|| format!("loading strategies from {}", path.display()))?;
            StrategyRegistry::from_config(&file)?
        }
        None => StrategyRegistry::default(),
    };
    info!(strategies = ?registry.names(), "Strategy registry ready");

    let backtester = Backtester::new(registry, ConfluenceEngine::default(), cfg.confluence_threshold);
    let history = HistoryDir::new(cfg.history_dir.clone());

    // ── Catalog ───────────────────────────────────────────────────────────────
    let catalog = build_catalog(
        &cfg.assets,
        cfg.timeframe_seconds,
        cfg.backtest_candles,
        &history,
        &backtester,
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&catalog)?);

    // ── Selection ─────────────────────────────────────────────────────────────
    let selection = rebalance(
        &cfg.assets,
        cfg.timeframe_seconds,
        cfg.backtest_candles,
        &history,
        &backtester,
    )
    .await?;

    match selection {
        Some(s) if should_switch(None, &s.metrics, cfg.min_accuracy_to_select) => info!(
            asset = %s.asset,
            strategy = %s.strategy.name(),
            accuracy_pct = s.metrics.accuracy_pct(),
            "Selection meets minimum accuracy"
        ),
        Some(s) => warn!(
            asset = %s.asset,
            strategy = %s.strategy.name(),
            accuracy_pct = s.metrics.accuracy_pct(),
            min_accuracy = cfg.min_accuracy_to_select,
            "Best pairing is below minimum accuracy"
        ),
        None => warn!(history_dir = %history.dir().display(), "No candle history for any asset"),
    }

    Ok(())
}
