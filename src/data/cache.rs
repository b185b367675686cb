use super::connectors::PriceSource;
use super::timeframe::Timeframe;
use crate::error::{PivotgenError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub count: usize,
}

/// Close-price cache in front of a `PriceSource`.
///
/// Built once per run and shared by every backtest. Each
/// (symbol, timeframe, count) key is fetched at most once; the lock is held
/// across the fetch so concurrent evaluators never fetch the same key twice.
pub struct KlineCache {
    source: Box<dyn PriceSource>,
    data: Mutex<HashMap<CacheKey, Arc<Vec<f64>>>>,
}

impl KlineCache {
    pub fn new(source: Box<dyn PriceSource>) -> Self {
        Self {
            source,
            data: Mutex::new(HashMap::new()),
        }
    }

    pub fn load_closes(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<Arc<Vec<f64>>> {
        let key = CacheKey {
            symbol: symbol.to_string(),
            timeframe,
            count,
        };

        let mut data = self
            .data
            .lock()
            .map_err(|_| PivotgenError::DataLoading("Kline cache lock poisoned".to_string()))?;

        if let Some(closes) = data.get(&key) {
            return Ok(Arc::clone(closes));
        }

        log::debug!(
            "Fetching {} {}@{} closes from {}",
            count,
            symbol,
            timeframe,
            self.source.name()
        );
        let closes = Arc::new(self.source.fetch_closes(symbol, timeframe, count)?);
        data.insert(key, Arc::clone(&closes));
        Ok(closes)
    }

    pub fn len(&self) -> usize {
        self.data.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut data) = self.data.lock() {
            data.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemorySource;

    #[test]
    fn test_each_key_fetched_once() {
        let source =
            Arc::new(InMemorySource::new().with_all_timeframes("dotusdt", vec![1.0, 2.0, 3.0]));
        let cache = KlineCache::new(Box::new(Arc::clone(&source)));

        let first = cache.load_closes("dotusdt", Timeframe::OneMinute, 2).unwrap();
        let second = cache.load_closes("dotusdt", Timeframe::OneMinute, 2).unwrap();
        assert_eq!(*first, vec![2.0, 3.0]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetch_count(), 1);

        cache.load_closes("dotusdt", Timeframe::OneHour, 2).unwrap();
        assert_eq!(source.fetch_count(), 2);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failed_fetch_is_not_cached() {
        let cache = KlineCache::new(Box::new(InMemorySource::new()));
        assert!(cache.load_closes("dotusdt", Timeframe::OneMinute, 2).is_err());
        assert!(cache.is_empty());
    }
}
