/// Bollinger Bands at one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBand {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Bollinger Bands series: trailing `period` mean ± `std_dev` population
/// standard deviations.
///
/// Index `i` is `None` until the window is full (`i < period - 1`).
pub fn bollinger(values: &[f64], period: usize, std_dev: f64) -> Vec<Option<BollingerBand>> {
    let n = values.len();
    let mut out = vec![None; n];
    if period == 0 || n < period {
        return out;
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        // Population stddev
        let variance = window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
        let std = variance.sqrt();
        out[i] = Some(BollingerBand {
            middle: mean,
            upper: mean + std_dev * std,
            lower: mean - std_dev * std,
        });
    }
    out
}
