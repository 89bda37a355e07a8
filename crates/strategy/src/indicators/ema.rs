/// Exponential Moving Average series over `values` (oldest first).
///
/// Seeded with the simple mean of the first `period` values at index
/// `period - 1`, then `price * k + prev * (1 - k)` with `k = 2 / (period + 1)`.
/// Slots before the seed are `None`; the whole series is `None` when there
/// are fewer than `period` values.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema_val = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(ema_val);

    for (i, &price) in values.iter().enumerate().skip(period) {
        ema_val = price * k + ema_val * (1.0 - k);
        out[i] = Some(ema_val);
    }
    out
}
