use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use common::{Candle, CandleSource, Result};

/// Candle history stored as JSON arrays, one file per asset and timeframe:
/// `<dir>/<ASSET>_<timeframe_seconds>.json`.
#[derive(Debug, Clone)]
pub struct HistoryDir {
    dir: PathBuf,
}

impl HistoryDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, asset: &str, timeframe_seconds: u32) -> PathBuf {
        self.dir.join(format!("{asset}_{timeframe_seconds}.json"))
    }

    /// Write `candles` as the history for `asset`, creating the directory if needed.
    pub async fn save(&self, asset: &str, timeframe_seconds: u32, candles: &[Candle]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(asset, timeframe_seconds);
        let body = serde_json::to_vec_pretty(candles)?;
        tokio::fs::write(&path, body).await?;
        debug!(path = %path.display(), candles = candles.len(), "History saved");
        Ok(())
    }
}

#[async_trait]
impl CandleSource for HistoryDir {
    async fn get_candles(
        &self,
        asset: &str,
        timeframe_seconds: u32,
        count: usize,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<Vec<Candle>> {
        let path = self.path_for(asset, timeframe_seconds);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "History file not found");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut candles: Vec<Candle> = serde_json::from_slice(&raw)?;
        // stable sort keeps the first of duplicate timestamps in front
        candles.sort_by_key(|c| c.open_time);
        candles.dedup_by_key(|c| c.open_time);
        if let Some(end) = end_time {
            candles.retain(|c| c.open_time <= end);
        }
        let start = candles.len().saturating_sub(count);
        candles.drain(..start);

        debug!(asset = %asset, timeframe_seconds, candles = candles.len(), "History loaded");
        Ok(candles)
    }
}
