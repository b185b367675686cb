use super::source::PriceSource;
use crate::data::Timeframe;
use crate::error::{PivotgenError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed close series held in memory, for offline runs and tests
#[derive(Default)]
pub struct InMemorySource {
    series: HashMap<(String, Timeframe), Vec<f64>>,
    fetches: AtomicUsize,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: &str, timeframe: Timeframe, closes: Vec<f64>) -> Self {
        self.series.insert((symbol.to_string(), timeframe), closes);
        self
    }

    /// Same series under every timeframe
    pub fn with_all_timeframes(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        for timeframe in Timeframe::all() {
            self.series
                .insert((symbol.to_string(), timeframe), closes.clone());
        }
        self
    }

    /// Number of `fetch_closes` calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl PriceSource for InMemorySource {
    fn fetch_closes(&self, symbol: &str, timeframe: Timeframe, count: usize) -> Result<Vec<f64>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let closes = self
            .series
            .get(&(symbol.to_string(), timeframe))
            .ok_or_else(|| {
                PivotgenError::DataLoading(format!("No series for {}@{}", symbol, timeframe))
            })?;
        let start = closes.len().saturating_sub(count);
        Ok(closes[start..].to_vec())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
