use common::{Candle, CandleColor};

/// Classify a candle body by open vs close.
pub fn candle_color(open: f64, close: f64) -> CandleColor {
    CandleColor::of(open, close)
}

/// Majority color among the trailing `lookback` candles.
///
/// Dojis count for neither side. Returns `None` on a tie (including when
/// the window holds no green or red candle at all).
pub fn majority_color(candles: &[Candle], lookback: usize) -> Option<CandleColor> {
    let start = candles.len().saturating_sub(lookback);
    let (greens, reds) = candles[start..]
        .iter()
        .fold((0usize, 0usize), |(g, r), c| match c.color() {
            CandleColor::Green => (g + 1, r),
            CandleColor::Red => (g, r + 1),
            CandleColor::Doji => (g, r),
        });

    match greens.cmp(&reds) {
        std::cmp::Ordering::Greater => Some(CandleColor::Green),
        std::cmp::Ordering::Less => Some(CandleColor::Red),
        std::cmp::Ordering::Equal => None,
    }
}
