use super::source::PriceSource;
use crate::data::Timeframe;
use crate::error::{PivotgenError, Result};
use serde_json::Value;
use std::time::Duration;

/// Kline REST endpoint returns at most this many bars per request
pub const MAX_KLINES: usize = 1000;

/// Close index within a kline row
const CLOSE_FIELD: usize = 4;

pub struct BinanceConnector {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl BinanceConnector {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn klines_url(&self) -> String {
        format!("{}/api/v3/klines", self.base_url)
    }
}

impl PriceSource for BinanceConnector {
    fn fetch_closes(&self, symbol: &str, timeframe: Timeframe, count: usize) -> Result<Vec<f64>> {
        if count > MAX_KLINES {
            log::warn!("Requested {} klines, the endpoint caps at {}", count, MAX_KLINES);
        }

        let rows: Vec<Vec<Value>> = self
            .client
            .get(self.klines_url())
            .query(&[
                ("symbol", symbol.to_uppercase()),
                ("interval", timeframe.as_str().to_string()),
                ("limit", count.to_string()),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        parse_klines(&rows)
    }

    fn name(&self) -> &'static str {
        "binance"
    }
}

/// Extract closes from kline rows. Prices arrive as decimal strings.
pub(crate) fn parse_klines(rows: &[Vec<Value>]) -> Result<Vec<f64>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let field = row.get(CLOSE_FIELD).ok_or_else(|| {
                PivotgenError::DataLoading(format!("Kline {} has no close field", i))
            })?;
            let close = match field {
                Value::String(s) => s.parse::<f64>().ok(),
                Value::Number(n) => n.as_f64(),
                _ => None,
            };
            close.ok_or_else(|| {
                PivotgenError::DataLoading(format!("Kline {} close is not numeric: {}", i, field))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_klines_reads_close_strings() {
        let rows: Vec<Vec<Value>> = serde_json::from_value(json!([
            [1, "6.10", "6.20", "6.00", "6.15", "100", 2, "0", 10, "0", "0", "0"],
            [3, "6.15", "6.30", "6.10", "6.25", "100", 4, "0", 10, "0", "0", "0"]
        ]))
        .unwrap();

        assert_eq!(parse_klines(&rows).unwrap(), vec![6.15, 6.25]);
    }

    #[test]
    fn test_parse_klines_rejects_short_rows() {
        let rows = vec![vec![json!(1), json!("6.10")]];
        assert!(parse_klines(&rows).is_err());
    }
}
