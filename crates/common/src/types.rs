use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLC price bar for a fixed time interval.
///
/// Only `open` and `close` drive the engine; `high`, `low` and `volume` are
/// carried through from the data source. History files written by the broker
/// use `from`, `max` and `min`, which are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    #[serde(default, alias = "max")]
    pub high: f64,
    #[serde(default, alias = "min")]
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(alias = "from", with = "chrono::serde::ts_seconds")]
    pub open_time: DateTime<Utc>,
}

impl Candle {
    pub fn color(&self) -> CandleColor {
        CandleColor::of(self.open, self.close)
    }

    /// Rejects candles whose open/close cannot be compared.
    pub fn validate(&self, index: usize) -> crate::Result<()> {
        if !self.open.is_finite() || !self.close.is_finite() {
            return Err(crate::Error::MalformedCandle {
                index,
                reason: format!("non-finite open/close ({}, {})", self.open, self.close),
            });
        }
        Ok(())
    }
}

/// Check every candle of a sequence, reporting the first malformed one.
pub fn validate_candles(candles: &[Candle]) -> crate::Result<()> {
    candles
        .iter()
        .enumerate()
        .try_for_each(|(i, c)| c.validate(i))
}

/// Body direction of a candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleColor {
    Green,
    Red,
    Doji,
}

impl CandleColor {
    pub fn of(open: f64, close: f64) -> Self {
        if close > open {
            CandleColor::Green
        } else if close < open {
            CandleColor::Red
        } else {
            CandleColor::Doji
        }
    }
}

impl std::fmt::Display for CandleColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandleColor::Green => write!(f, "green"),
            CandleColor::Red => write!(f, "red"),
            CandleColor::Doji => write!(f, "doji"),
        }
    }
}

/// Direction of a binary-option trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Buy a call: profit if the next candle closes above its open.
    Call,
    /// Sell a put: profit if the next candle closes below its open.
    Put,
}

impl Action {
    /// The candle color that confirms this direction.
    pub fn winning_color(self) -> CandleColor {
        match self {
            Action::Call => CandleColor::Green,
            Action::Put => CandleColor::Red,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Call => write!(f, "call"),
            Action::Put => write!(f, "put"),
        }
    }
}

/// Decision emitted by a strategy for one candle window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// `None` when the strategy abstains.
    pub action: Option<Action>,
    /// Short diagnostic tag, e.g. `tie_majority`.
    pub reason: String,
}

impl Signal {
    pub fn call(reason: impl Into<String>) -> Self {
        Self { action: Some(Action::Call), reason: reason.into() }
    }

    pub fn put(reason: impl Into<String>) -> Self {
        Self { action: Some(Action::Put), reason: reason.into() }
    }

    pub fn abstain(reason: impl Into<String>) -> Self {
        Self { action: None, reason: reason.into() }
    }

    pub fn is_abstain(&self) -> bool {
        self.action.is_none()
    }
}

/// Settlement of a single binary-option trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeOutcome {
    Win,
    Loss,
    Equal,
}

impl TradeOutcome {
    /// Settle `action` against the candle that follows the signal.
    pub fn settle(action: Action, next: &Candle) -> Self {
        match next.color() {
            CandleColor::Doji => TradeOutcome::Equal,
            color if color == action.winning_color() => TradeOutcome::Win,
            _ => TradeOutcome::Loss,
        }
    }
}

impl std::fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeOutcome::Win => write!(f, "win"),
            TradeOutcome::Loss => write!(f, "loss"),
            TradeOutcome::Equal => write!(f, "equal"),
        }
    }
}

/// Aggregate result of replaying one strategy over one candle history.
///
/// Invariant: `total_signals >= taken_trades == wins + losses + equals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub asset: String,
    pub timeframe_seconds: u32,
    pub strategy_name: String,
    pub total_signals: usize,
    pub taken_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub equals: usize,
    /// `wins / taken_trades`, or 0 when no trade was taken.
    pub accuracy: f64,
}

impl BacktestMetrics {
    /// Build unlabeled metrics from raw counts, deriving `accuracy`.
    pub fn from_counts(
        strategy_name: impl Into<String>,
        total_signals: usize,
        wins: usize,
        losses: usize,
        equals: usize,
    ) -> Self {
        let taken_trades = wins + losses + equals;
        let accuracy = if taken_trades > 0 {
            wins as f64 / taken_trades as f64
        } else {
            0.0
        };
        Self {
            asset: String::new(),
            timeframe_seconds: 0,
            strategy_name: strategy_name.into(),
            total_signals,
            taken_trades,
            wins,
            losses,
            equals,
            accuracy,
        }
    }

    /// Attach the asset/timeframe the metrics were computed for.
    pub fn labeled(mut self, asset: impl Into<String>, timeframe_seconds: u32) -> Self {
        self.asset = asset.into();
        self.timeframe_seconds = timeframe_seconds;
        self
    }

    /// Accuracy as a percentage rounded to two decimals, for logs and reports.
    pub fn accuracy_pct(&self) -> f64 {
        (self.accuracy * 10_000.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candle(open: f64, close: f64) -> Candle {
        Candle {
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: 0.0,
            open_time: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn color_classifies_body() {
        assert_eq!(CandleColor::of(1.0, 1.1), CandleColor::Green);
        assert_eq!(CandleColor::of(1.1, 1.0), CandleColor::Red);
        assert_eq!(CandleColor::of(1.0, 1.0), CandleColor::Doji);
    }

    #[test]
    fn settle_uses_next_candle_direction() {
        assert_eq!(TradeOutcome::settle(Action::Call, &candle(1.0, 2.0)), TradeOutcome::Win);
        assert_eq!(TradeOutcome::settle(Action::Call, &candle(2.0, 1.0)), TradeOutcome::Loss);
        assert_eq!(TradeOutcome::settle(Action::Put, &candle(2.0, 1.0)), TradeOutcome::Win);
        assert_eq!(TradeOutcome::settle(Action::Put, &candle(1.0, 2.0)), TradeOutcome::Loss);
        assert_eq!(TradeOutcome::settle(Action::Put, &candle(1.0, 1.0)), TradeOutcome::Equal);
    }

    #[test]
    fn metrics_accuracy_is_zero_without_trades() {
        let m = BacktestMetrics::from_counts("x", 7, 0, 0, 0);
        assert_eq!(m.taken_trades, 0);
        assert_eq!(m.accuracy, 0.0);
    }

    #[test]
    fn metrics_accuracy_counts_equals_as_taken() {
        let m = BacktestMetrics::from_counts("x", 10, 3, 1, 1);
        assert_eq!(m.taken_trades, 5);
        assert!((m.accuracy - 0.6).abs() < 1e-12);
        assert_eq!(m.accuracy_pct(), 60.0);
    }

    #[test]
    fn labeled_only_touches_labels() {
        let m = BacktestMetrics::from_counts("Reversal-3", 4, 2, 2, 0);
        let labeled = m.clone().labeled("EURUSD", 60);
        assert_eq!(labeled.asset, "EURUSD");
        assert_eq!(labeled.timeframe_seconds, 60);
        assert_eq!(labeled.wins, m.wins);
        assert_eq!(labeled.accuracy, m.accuracy);
    }

    #[test]
    fn candle_accepts_broker_field_names() {
        let json = r#"{"id": 9, "from": 1700000000, "to": 1700000060,
                       "open": 1.1, "close": 1.2, "min": 1.05, "max": 1.25, "volume": 12}"#;
        let c: Candle = serde_json::from_str(json).unwrap();
        assert_eq!(c.high, 1.25);
        assert_eq!(c.low, 1.05);
        assert_eq!(c.open_time.timestamp(), 1_700_000_000);
        assert_eq!(c.color(), CandleColor::Green);
    }

    #[test]
    fn candle_missing_close_is_rejected() {
        let json = r#"{"from": 1700000000, "open": 1.1}"#;
        assert!(serde_json::from_str::<Candle>(json).is_err());
    }

    #[test]
    fn validate_reports_first_bad_index() {
        let candles = vec![candle(1.0, 1.1), candle(f64::NAN, 1.0), candle(1.0, f64::INFINITY)];
        match validate_candles(&candles) {
            Err(crate::Error::MalformedCandle { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected MalformedCandle, got {other:?}"),
        }
    }
}
