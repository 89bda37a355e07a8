//! Pure indicator functions over close-price series.
//!
//! Every series has one slot per input value; slots inside an indicator's
//! warm-up are `None` rather than a numeric placeholder.

pub mod bollinger;
pub mod candles;
pub mod ema;
pub mod rsi;

pub use bollinger::{bollinger, BollingerBand};
pub use candles::{candle_color, majority_color};
pub use ema::ema;
pub use rsi::rsi;
