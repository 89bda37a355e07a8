pub mod config;
pub mod error;
pub mod market;
pub mod types;

pub use config::Settings;
pub use error::{Error, Result};
pub use market::CandleSource;
pub use types::*;
