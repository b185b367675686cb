use crate::data::Timeframe;
use crate::error::Result;

/// Anything that can produce an ordered series of close prices
pub trait PriceSource: Send + Sync {
    /// Most recent `count` closes, oldest first
    fn fetch_closes(&self, symbol: &str, timeframe: Timeframe, count: usize) -> Result<Vec<f64>>;

    fn name(&self) -> &'static str;
}

impl<T: PriceSource + ?Sized> PriceSource for std::sync::Arc<T> {
    fn fetch_closes(&self, symbol: &str, timeframe: Timeframe, count: usize) -> Result<Vec<f64>> {
        (**self).fetch_closes(symbol, timeframe, count)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
