use crate::engines::agent::PivotAgent;
use crate::error::Result;
use crate::types::PositionRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Everything needed to draw an agent's run: the close series, pivot levels
/// with their bands, where the backtest starts and the trades it made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub prices: Vec<f64>,
    pub pivots: Vec<f64>,
    pub pivot_highs: Vec<f64>,
    pub pivot_lows: Vec<f64>,
    pub margin: usize,
    pub position_history: Vec<PositionRecord>,
}

impl ChartData {
    pub fn from_agent(agent: &PivotAgent) -> Self {
        let pivots = agent.pivots();
        Self {
            prices: agent.prices().to_vec(),
            pivots: pivots.centers.clone(),
            pivot_highs: pivots.highs.clone(),
            pivot_lows: pivots.lows.clone(),
            margin: agent.margin(),
            position_history: agent.position_history().to_vec(),
        }
    }

    /// (index, price) of every entry
    pub fn buys(&self) -> Vec<(usize, f64)> {
        self.position_history
            .iter()
            .filter_map(|record| match record {
                PositionRecord::Buy { price, index } => Some((*index, *price)),
                _ => None,
            })
            .collect()
    }

    /// (index, price) of every exit
    pub fn sells(&self) -> Vec<(usize, f64)> {
        self.position_history
            .iter()
            .filter_map(|record| match record {
                PositionRecord::Sell { price, index } => Some((*index, *price)),
                _ => None,
            })
            .collect()
    }
}

/// Renders chart records. Output is a side effect only.
pub trait ChartSink {
    fn render(&self, chart: &ChartData) -> Result<()>;
}

/// Writes the chart record as pretty JSON for an external plotter
pub struct JsonChartSink {
    path: PathBuf,
}

impl JsonChartSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartSink for JsonChartSink {
    fn render(&self, chart: &ChartData) -> Result<()> {
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(writer, chart)?;
        log::info!("Chart written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traded_agent() -> PivotAgent {
        let mut agent = PivotAgent::new(1, 0.01, 1000);
        agent.feed(&[10.0, 10.0, 10.0]).unwrap();
        for price in [10.05, 10.2, 9.0] {
            agent.observe(price).unwrap();
        }
        agent
    }

    #[test]
    fn test_chart_from_agent() {
        let chart = ChartData::from_agent(&traded_agent());
        assert_eq!(chart.prices.len(), 6);
        assert_eq!(chart.margin, 3);
        assert_eq!(chart.pivots, vec![10.0]);
        assert_eq!(chart.buys().len(), 1);
        assert_eq!(chart.sells().len(), 1);
        assert_eq!(chart.buys()[0].0, 4);
    }

    #[test]
    fn test_json_sink_writes_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonChartSink::new(dir.path().join("chart.json"));
        sink.render(&ChartData::from_agent(&traded_agent())).unwrap();

        let text = std::fs::read_to_string(sink.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["margin"], 3);
        assert!(value["pivotHighs"].is_array());
        assert_eq!(value["positionHistory"][0]["type"], "BUY");
    }
}
