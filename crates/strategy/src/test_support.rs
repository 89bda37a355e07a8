use chrono::{Duration, TimeZone, Utc};

use common::Candle;

/// One-minute candles built from `(open, close)` pairs.
pub fn candles_from(bodies: &[(f64, f64)]) -> Vec<Candle> {
    let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    bodies
        .iter()
        .enumerate()
        .map(|(i, &(open, close))| Candle {
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: 1.0,
            open_time: start + Duration::minutes(i as i64),
        })
        .collect()
}

/// Candles from closes alone: open = previous close (or close for the first bar).
pub fn closes_to_candles(closes: &[f64]) -> Vec<Candle> {
    let bodies: Vec<(f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            (open, close)
        })
        .collect();
    candles_from(&bodies)
}

/// `n` candles alternating green (even index) and red (odd index).
pub fn alternating(n: usize) -> Vec<Candle> {
    let bodies: Vec<(f64, f64)> = (0..n)
        .map(|i| if i % 2 == 0 { (1.0, 1.1) } else { (1.1, 1.0) })
        .collect();
    candles_from(&bodies)
}
