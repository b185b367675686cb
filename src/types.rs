use serde::{Deserialize, Serialize};

/// Direction of a pivot crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Up,
    Down,
}

/// A recorded crossing of a pivot level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub pivot: f64,
    pub kind: EventKind,
}

/// Open long position. Entry price is the broken band, not the observed price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "BUY")]
pub struct Position {
    pub price: f64,
    pub index: usize,
}

/// Decision emitted by `PivotAgent::observe`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Action {
    Buy { price: f64, index: usize },
    Sell { price: f64, index: usize },
}

impl Action {
    pub fn price(&self) -> f64 {
        match self {
            Action::Buy { price, .. } | Action::Sell { price, .. } => *price,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Action::Buy { index, .. } | Action::Sell { index, .. } => *index,
        }
    }
}

/// Audit trail entry. A `Report` always directly follows the `Sell` it summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum PositionRecord {
    Buy { price: f64, index: usize },
    Sell { price: f64, index: usize },
    Report { profit: f64 },
}

impl From<Position> for PositionRecord {
    fn from(position: Position) -> Self {
        PositionRecord::Buy {
            price: position.price,
            index: position.index,
        }
    }
}

/// Backtest summary over all closed round trips
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitReport {
    pub profit: f64,
    pub success_count: usize,
    pub failure_count: usize,
}

impl ProfitReport {
    pub fn trades(&self) -> usize {
        self.success_count + self.failure_count
    }
}
