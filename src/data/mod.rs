pub mod cache;
pub mod connectors;
pub mod timeframe;

pub use cache::KlineCache;
pub use connectors::{BinanceConnector, CsvConnector, InMemorySource, PriceSource};
pub use timeframe::Timeframe;
