use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{Candle, Result};

/// Abstraction over the market-data provider.
///
/// `HistoryDir` in `crates/backtest` implements this over candle files on
/// disk; a broker client would implement it over the network. The engine
/// itself never calls this; only the catalog/rebalance helpers await it.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Return up to `count` candles for `asset`, sorted ascending by
    /// `open_time`, ending at `end_time` (or the latest available).
    async fn get_candles(
        &self,
        asset: &str,
        timeframe_seconds: u32,
        count: usize,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<Vec<Candle>>;
}
