pub mod config;
pub mod confluence;
pub mod indicators;
pub mod registry;
pub mod reversal;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{StrategyConfig, StrategyFileConfig};
pub use confluence::{Confluence, ConfluenceBreakdown, ConfluenceConfig, ConfluenceEngine};
pub use registry::StrategyRegistry;
pub use reversal::MajorityReversal;

pub use common::Signal;

use common::{BacktestMetrics, Candle, TradeOutcome};

/// Bars skipped at the start of a backtest so indicators can warm up.
pub const WARMUP_BARS: usize = 20;

/// All strategy implementations must satisfy this trait.
///
/// Implementations are stateless: a signal is a pure function of the window.
pub trait Strategy: Send + Sync {
    /// Human-readable name of this strategy instance.
    fn name(&self) -> &str;

    /// Decide on the bar after the last candle of `candles` (oldest first).
    fn generate_signal(&self, candles: &[Candle]) -> Signal;

    /// Replay the strategy over `candles`, one bar at a time.
    ///
    /// For every bar `i` from [`WARMUP_BARS`] to `len - 2`, the window
    /// `candles[..=i]` is offered to [`Strategy::generate_signal`]. Signals
    /// scoring below `threshold` on `confluence` are counted but not traded.
    /// Taken trades settle on the direction of `candles[i + 1]`.
    fn backtest(
        &self,
        candles: &[Candle],
        confluence: &dyn Confluence,
        threshold: u32,
    ) -> BacktestMetrics {
        let mut total_signals = 0;
        let (mut wins, mut losses, mut equals) = (0, 0, 0);

        for i in WARMUP_BARS..candles.len().saturating_sub(1) {
            let window = &candles[..=i];
            let Some(action) = self.generate_signal(window).action else {
                continue;
            };
            total_signals += 1;

            if u32::from(confluence.score(window, action)) < threshold {
                continue;
            }

            match TradeOutcome::settle(action, &candles[i + 1]) {
                TradeOutcome::Win => wins += 1,
                TradeOutcome::Loss => losses += 1,
                TradeOutcome::Equal => equals += 1,
            }
        }

        BacktestMetrics::from_counts(self.name(), total_signals, wins, losses, equals)
    }
}
