use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed candle at index {index}: {reason}")]
    MalformedCandle { index: usize, reason: String },

    #[error("Unknown strategy type '{0}'")]
    UnknownStrategy(String),

    #[error("No strategies registered")]
    NoStrategies,

    #[error("Candle source error: {0}")]
    DataSource(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
