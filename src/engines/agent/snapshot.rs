use super::pivots::PivotModel;
use crate::error::{PivotgenError, Result};
use crate::types::{Event, Position, PositionRecord};
use serde::{Deserialize, Serialize};

/// Complete mutable state of a `PivotAgent`.
///
/// Restoring from a snapshot resumes `observe` exactly where the captured
/// agent left off, including the pending refit counter and the stop level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSnapshot {
    pub pivots_n: usize,
    pub pivot_diff: f64,
    pub batch_size: usize,
    pub batch_counter: usize,
    pub model: PivotModel,
    pub prices: Vec<f64>,
    pub events: Vec<Event>,
    pub position: Option<Position>,
    pub position_history: Vec<PositionRecord>,
    pub stop_loss: f64,
    pub last_price: f64,
    pub logs: Vec<String>,
    pub margin: usize,
    pub pivots: Vec<f64>,
    pub pivot_highs: Vec<f64>,
    pub pivot_lows: Vec<f64>,
}

impl AgentSnapshot {
    pub fn validate(&self) -> Result<()> {
        if self.pivots.len() != self.pivot_highs.len() || self.pivots.len() != self.pivot_lows.len() {
            return Err(PivotgenError::Validation(format!(
                "Pivot bands out of step: {} pivots, {} highs, {} lows",
                self.pivots.len(),
                self.pivot_highs.len(),
                self.pivot_lows.len()
            )));
        }
        if self.margin > self.prices.len() {
            return Err(PivotgenError::Validation(format!(
                "Margin {} beyond price series of length {}",
                self.margin,
                self.prices.len()
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
