use serde::{Deserialize, Serialize};

use common::{Action, Candle, CandleColor};

use crate::indicators::{bollinger, ema, rsi};

/// Gate deciding how strongly the market agrees with a proposed trade.
///
/// The backtest loop takes this as a parameter so alternate gating logic can
/// be substituted. Any `Fn(&[Candle], Action) -> u8` closure is a `Confluence`.
pub trait Confluence: Send + Sync {
    /// Score in `[0, 100]` for taking `action` after the last candle of `candles`.
    fn score(&self, candles: &[Candle], action: Action) -> u8;
}

impl<F> Confluence for F
where
    F: Fn(&[Candle], Action) -> u8 + Send + Sync,
{
    fn score(&self, candles: &[Candle], action: Action) -> u8 {
        self(candles, action)
    }
}

/// Indicator periods and thresholds used by [`ConfluenceEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfluenceConfig {
    pub ema_period: usize,
    pub rsi_period: usize,
    pub bb_period: usize,
    pub bb_std: f64,
    /// A call scores the RSI term at or below this level.
    pub rsi_oversold: f64,
    /// A put scores the RSI term at or above this level.
    pub rsi_overbought: f64,
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            ema_period: 20,
            rsi_period: 14,
            bb_period: 20,
            bb_std: 2.0,
            rsi_oversold: 35.0,
            rsi_overbought: 65.0,
        }
    }
}

/// Points awarded by each confluence term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfluenceBreakdown {
    pub trend: u8,
    pub position: u8,
    pub rsi: u8,
    pub bollinger: u8,
    pub momentum: u8,
}

impl ConfluenceBreakdown {
    pub const TREND_POINTS: u8 = 20;
    pub const POSITION_POINTS: u8 = 10;
    pub const RSI_POINTS: u8 = 25;
    pub const BOLLINGER_POINTS: u8 = 20;
    pub const MOMENTUM_POINTS: u8 = 5;

    /// Sum of all terms, clamped to `[0, 100]`.
    pub fn total(&self) -> u8 {
        let sum = u32::from(self.trend)
            + u32::from(self.position)
            + u32::from(self.rsi)
            + u32::from(self.bollinger)
            + u32::from(self.momentum);
        sum.min(100) as u8
    }
}

/// Multi-indicator alignment score for a proposed binary-option direction.
///
/// Each term checks one classic trend or exhaustion heuristic at the last
/// bar. Indicators still inside their warm-up contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct ConfluenceEngine {
    config: ConfluenceConfig,
}

impl ConfluenceEngine {
    pub fn new(config: ConfluenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConfluenceConfig {
        &self.config
    }

    /// Per-term points for taking `action` after the last candle.
    pub fn breakdown(&self, candles: &[Candle], action: Action) -> ConfluenceBreakdown {
        let mut parts = ConfluenceBreakdown::default();
        if candles.len() < 2 {
            return parts;
        }

        let cfg = &self.config;
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let idx = closes.len() - 1;
        let close = closes[idx];

        let ema_series = ema(&closes, cfg.ema_period);
        let rsi_series = rsi(&closes, cfg.rsi_period);
        let bands = bollinger(&closes, cfg.bb_period, cfg.bb_std);

        // Trend: EMA slope over the last two bars
        if candles.len() >= 3 {
            if let (Some(prev), Some(last)) = (ema_series[idx - 1], ema_series[idx]) {
                let slope = last - prev;
                let aligned = match action {
                    Action::Call => slope > 0.0,
                    Action::Put => slope < 0.0,
                };
                if aligned {
                    parts.trend = ConfluenceBreakdown::TREND_POINTS;
                }
            }
        }

        // Price position relative to EMA
        if let Some(last) = ema_series[idx] {
            let aligned = match action {
                Action::Call => close > last,
                Action::Put => close < last,
            };
            if aligned {
                parts.position = ConfluenceBreakdown::POSITION_POINTS;
            }
        }

        // RSI extreme
        if let Some(value) = rsi_series[idx] {
            let aligned = match action {
                Action::Call => value <= cfg.rsi_oversold,
                Action::Put => value >= cfg.rsi_overbought,
            };
            if aligned {
                parts.rsi = ConfluenceBreakdown::RSI_POINTS;
            }
        }

        // Bollinger extreme
        if let Some(band) = bands[idx] {
            let aligned = match action {
                Action::Call => close <= band.lower,
                Action::Put => close >= band.upper,
            };
            if aligned {
                parts.bollinger = ConfluenceBreakdown::BOLLINGER_POINTS;
            }
        }

        // Prior candle exhaustion
        let prev_color = candles[idx - 1].color();
        let exhausted = match action {
            Action::Call => prev_color == CandleColor::Red,
            Action::Put => prev_color == CandleColor::Green,
        };
        if exhausted {
            parts.momentum = ConfluenceBreakdown::MOMENTUM_POINTS;
        }

        parts
    }

    /// Alignment score in `[0, 100]`; 0 with fewer than two candles.
    pub fn score(&self, candles: &[Candle], action: Action) -> u8 {
        self.breakdown(candles, action).total()
    }
}

impl Confluence for ConfluenceEngine {
    fn score(&self, candles: &[Candle], action: Action) -> u8 {
        ConfluenceEngine::score(self, candles, action)
    }
}
