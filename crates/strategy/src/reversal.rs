use common::{Candle, CandleColor, Signal};

use crate::indicators::majority_color;
use crate::Strategy;

/// Majority-color reversal: bets that the next candle goes against the
/// majority of the last `lookback` candles.
///
/// A green majority emits a put, a red majority a call. Ties and windows
/// shorter than `lookback` abstain.
#[derive(Debug, Clone)]
pub struct MajorityReversal {
    name: String,
    lookback: usize,
    /// Reason tag prefix, e.g. `reversal3`.
    tag: String,
}

impl MajorityReversal {
    pub fn new(name: impl Into<String>, lookback: usize) -> Self {
        assert!(lookback >= 1, "reversal lookback must be >= 1");
        Self {
            name: name.into(),
            lookback,
            tag: format!("reversal{lookback}"),
        }
    }

    /// Reversal over the trailing 3 candles.
    pub fn three() -> Self {
        Self::new("Reversal-3", 3)
    }

    /// Reversal over the trailing 5 candles.
    pub fn five() -> Self {
        Self::new("Reversal-5", 5)
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }
}

impl Strategy for MajorityReversal {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signal(&self, candles: &[Candle]) -> Signal {
        if candles.len() < self.lookback {
            return Signal::abstain("not_enough_candles");
        }
        match majority_color(candles, self.lookback) {
            Some(CandleColor::Green) => Signal::put(format!("{}_opposite_majority_green", self.tag)),
            Some(CandleColor::Red) => Signal::call(format!("{}_opposite_majority_red", self.tag)),
            Some(CandleColor::Doji) | None => Signal::abstain("tie_majority"),
        }
    }
}
