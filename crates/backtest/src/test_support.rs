use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use common::{Candle, CandleSource, Error, Result};
use strategy::{Signal, Strategy};

pub const GREEN: (f64, f64) = (1.0, 1.1);
pub const RED: (f64, f64) = (1.1, 1.0);

pub fn start_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

/// One-minute candles built from `(open, close)` pairs.
pub fn candles_from(bodies: &[(f64, f64)]) -> Vec<Candle> {
    bodies
        .iter()
        .enumerate()
        .map(|(i, &(open, close))| Candle {
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: 1.0,
            open_time: start_time() + Duration::minutes(i as i64),
        })
        .collect()
}

pub fn alternating(n: usize) -> Vec<Candle> {
    let bodies: Vec<(f64, f64)> = (0..n).map(|i| if i % 2 == 0 { GREEN } else { RED }).collect();
    candles_from(&bodies)
}

/// Sine-shaped price path with occasional flat bars.
pub fn wavy(n: usize) -> Vec<Candle> {
    let closes: Vec<f64> = (0..n)
        .map(|i| 1.0 + 0.05 * (i as f64 / 4.0).sin() + if i % 7 == 0 { 0.0 } else { 0.001 * (i % 3) as f64 })
        .collect();
    let bodies: Vec<(f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| (if i == 0 { c } else { closes[i - 1] }, c))
        .collect();
    candles_from(&bodies)
}

pub fn dyn_arc<S: Strategy + 'static>(strategy: S) -> Arc<dyn Strategy> {
    Arc::new(strategy)
}

pub struct AlwaysCall(pub &'static str);

impl Strategy for AlwaysCall {
    fn name(&self) -> &str {
        self.0
    }

    fn generate_signal(&self, _candles: &[Candle]) -> Signal {
        Signal::call("always_call")
    }
}

pub struct AlwaysPut(pub &'static str);

impl Strategy for AlwaysPut {
    fn name(&self) -> &str {
        self.0
    }

    fn generate_signal(&self, _candles: &[Candle]) -> Signal {
        Signal::put("always_put")
    }
}

/// In-memory candle source keyed by asset.
#[derive(Default)]
pub struct MemorySource {
    pub candles: HashMap<String, Vec<Candle>>,
    pub failing: Option<String>,
}

impl MemorySource {
    pub fn with(mut self, asset: &str, candles: Vec<Candle>) -> Self {
        self.candles.insert(asset.to_string(), candles);
        self
    }

    pub fn failing_on(mut self, asset: &str) -> Self {
        self.failing = Some(asset.to_string());
        self
    }
}

#[async_trait]
impl CandleSource for MemorySource {
    async fn get_candles(
        &self,
        asset: &str,
        _timeframe_seconds: u32,
        count: usize,
        _end_time: Option<DateTime<Utc>>,
    ) -> Result<Vec<Candle>> {
        if self.failing.as_deref() == Some(asset) {
            return Err(Error::DataSource(format!("{asset} unavailable")));
        }
        let all = self.candles.get(asset).cloned().unwrap_or_default();
        let start = all.len().saturating_sub(count);
        Ok(all[start..].to_vec())
    }
}
