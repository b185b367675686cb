use super::source::PriceSource;
use crate::data::Timeframe;
use crate::error::{PivotgenError, Result};
use polars::prelude::*;
use std::path::{Path, PathBuf};

const CLOSE_ALIASES: [&str; 4] = ["close", "Close", "CLOSE", "c"];

/// Reads `{directory}/{SYMBOL}_{timeframe}.csv` exports
pub struct CsvConnector {
    directory: PathBuf,
}

impl CsvConnector {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn path_for(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.directory
            .join(format!("{}_{}.csv", symbol.to_uppercase(), timeframe.as_str()))
    }

    /// Load the close column of a CSV file
    pub fn load_closes<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| PivotgenError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        let name = CLOSE_ALIASES
            .iter()
            .find(|alias| df.column(alias).is_ok())
            .ok_or_else(|| {
                PivotgenError::DataLoading(format!(
                    "Missing close column in {} (tried aliases: {:?})",
                    path.as_ref().display(),
                    CLOSE_ALIASES
                ))
            })?;

        let close = df.column(name)?.cast(&DataType::Float64)?;
        let values: Option<Vec<f64>> = close.f64()?.into_iter().collect();

        values.ok_or_else(|| {
            PivotgenError::DataLoading(format!(
                "Null close values in {}",
                path.as_ref().display()
            ))
        })
    }
}

impl PriceSource for CsvConnector {
    fn fetch_closes(&self, symbol: &str, timeframe: Timeframe, count: usize) -> Result<Vec<f64>> {
        let mut closes = Self::load_closes(self.path_for(symbol, timeframe))?;
        if closes.len() < count {
            log::warn!(
                "{} {} has {} closes, fewer than the {} requested",
                symbol,
                timeframe,
                closes.len(),
                count
            );
        }
        let start = closes.len().saturating_sub(count);
        Ok(closes.split_off(start))
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
