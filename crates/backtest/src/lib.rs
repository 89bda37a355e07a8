//! Historical replay of the strategy set and per-asset strategy selection.

pub mod backtester;
pub mod catalog;
pub mod history;

#[cfg(test)]
pub(crate) mod test_support;

pub use backtester::Backtester;
pub use catalog::{build_catalog, rebalance, select_best, should_switch, Catalog, CatalogEntry, Selection};
pub use history::HistoryDir;
