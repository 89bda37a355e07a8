/// RSI (Relative Strength Index) series.
///
/// Uses Wilder's smoothed moving average (same as TradingView / standard RSI).
/// The seed averages are the plain means of the first `period` changes and
/// land at index `period`; every later bar smooths with weight
/// `(period - 1) / period`. Indices below `period` are `None`, and the whole
/// series is `None` when there are `period` values or fewer.
///
/// A window with no losses reads exactly 100.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let gain = |c: f64| if c > 0.0 { c } else { 0.0 };
    let loss = |c: f64| if c < 0.0 { -c } else { 0.0 };
    let p = period as f64;

    // First average gain/loss over the initial `period` changes
    let initial = &changes[..period];
    let mut avg_gain = initial.iter().map(|&c| gain(c)).sum::<f64>() / p;
    let mut avg_loss = initial.iter().map(|&c| loss(c)).sum::<f64>() / p;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    // Wilder smoothing over remaining changes; change i-1 ends at bar i
    for i in (period + 1)..closes.len() {
        let change = changes[i - 1];
        avg_gain = (avg_gain * (p - 1.0) + gain(change)) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss(change)) / p;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}
