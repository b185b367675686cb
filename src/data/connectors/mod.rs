mod binance;
mod csv;
mod memory;
mod source;

pub use binance::BinanceConnector;
pub use csv::CsvConnector;
pub use memory::InMemorySource;
pub use source::PriceSource;
