use super::pivots::{PivotModel, PivotSet};
use super::snapshot::AgentSnapshot;
use crate::engines::metrics::ProfitabilityMetrics;
use crate::error::Result;
use crate::viz::ChartData;
use crate::types::{Action, Event, EventKind, Position, PositionRecord, ProfitReport};

/// Streaming pivot-breakout trader.
///
/// Holds a growing price series and a clustering of it into pivot levels.
/// Each `observe` call runs four fixed stages against the previous price:
///
/// 1. record directional pivot crossings, one per pivot, deduplicated by kind
/// 2. upper band breakouts open a position (returning early) or ratchet the stop
/// 3. lower band crossings pull the stop to halfway between entry and pivot
/// 4. a fall through the stop closes the position and records its return
///
/// Refitting the pivots is the expensive part. It happens once every
/// `batch_size` observations over the full history, so a larger batch trades
/// pivot freshness for speed.
#[derive(Debug, Clone)]
pub struct PivotAgent {
    pivots_n: usize,
    pivot_diff: f64,
    batch_size: usize,
    batch_counter: usize,
    model: PivotModel,
    prices: Vec<f64>,
    pivots: PivotSet,
    events: Vec<Event>,
    position: Option<Position>,
    position_history: Vec<PositionRecord>,
    stop_loss: f64,
    last_price: f64,
    logs: Vec<String>,
    margin: usize,
}

impl Default for PivotAgent {
    fn default() -> Self {
        Self::new(3, 0.005, 1)
    }
}

impl PivotAgent {
    pub fn new(pivots: usize, pivot_diff: f64, batch_size: usize) -> Self {
        Self {
            pivots_n: pivots,
            pivot_diff,
            batch_size: batch_size.max(1),
            batch_counter: 0,
            model: PivotModel::default(),
            prices: Vec::new(),
            pivots: PivotSet::default(),
            events: Vec::new(),
            position: None,
            position_history: Vec::new(),
            stop_loss: 0.0,
            last_price: 0.0,
            logs: Vec::new(),
            margin: 0,
        }
    }

    pub fn with_model(mut self, model: PivotModel) -> Self {
        self.model = model;
        self
    }

    /// Bulk-load history, mark the train/test margin and fit the pivots.
    pub fn feed(&mut self, data: &[f64]) -> Result<()> {
        self.prices.extend_from_slice(data);
        self.margin = self.prices.len();
        self.refit()
    }

    pub fn observe(&mut self, price: f64) -> Result<Option<Action>> {
        self.prices.push(price);
        self.last_price = price;

        self.batch_counter += 1;
        if self.batch_counter >= self.batch_size {
            self.refit()?;
            self.batch_counter = 0;
        }

        let Some(prev) = self.previous_price() else {
            return Ok(None);
        };

        self.detect_events(price, prev);

        if let Some(action) = self.check_breakouts(price, prev) {
            return Ok(Some(action));
        }

        self.adjust_stop_on_retracement(price, prev);

        Ok(self.check_stop_loss(price, prev))
    }

    pub fn report(&self) -> ProfitReport {
        ProfitabilityMetrics::calculate(&self.position_history)
    }

    fn refit(&mut self) -> Result<()> {
        self.pivots = self
            .model
            .fit_bands(&self.prices, self.pivots_n, self.pivot_diff)?;
        log::trace!("refit {} pivots over {} prices", self.pivots.len(), self.prices.len());
        Ok(())
    }

    fn previous_price(&self) -> Option<f64> {
        let n = self.prices.len();
        (n >= 2).then(|| self.prices[n - 2])
    }

    fn last_event_kind(&self, pivot: f64) -> Option<EventKind> {
        self.events
            .iter()
            .rev()
            .find(|e| e.pivot == pivot)
            .map(|e| e.kind)
    }

    fn detect_events(&mut self, price: f64, prev: f64) {
        for i in 0..self.pivots.len() {
            let pivot = self.pivots.centers[i];
            let kind = if price > pivot && pivot > prev {
                EventKind::Up
            } else if price < pivot && pivot < prev {
                EventKind::Down
            } else {
                continue;
            };

            if self.last_event_kind(pivot) != Some(kind) {
                self.events.push(Event { pivot, kind });
                let direction = match kind {
                    EventKind::Up => "up",
                    EventKind::Down => "down",
                };
                self.trace(format!("saw {:.6} while going {}", pivot, direction));
            }
        }
    }

    fn check_breakouts(&mut self, price: f64, prev: f64) -> Option<Action> {
        let index = self.prices.len() - 1;

        for i in 0..self.pivots.len() {
            let high = self.pivots.highs[i];
            if !(price > high && high > prev) {
                continue;
            }

            self.stop_loss = self.pivots.lows[i];
            if self.position.is_none() {
                self.position = Some(Position { price: high, index });
                self.trace(format!("opening position | breaking up {:.6}", high));
                return Some(Action::Buy { price: high, index });
            }
            self.trace(format!("already in position | breaking up {:.6}", high));
        }

        None
    }

    fn adjust_stop_on_retracement(&mut self, price: f64, prev: f64) {
        let Some(position) = self.position else {
            return;
        };

        for i in 0..self.pivots.len() {
            let low = self.pivots.lows[i];
            if price > low && low > prev {
                let pivot = self.pivots.centers[i];
                self.stop_loss = position.price + (pivot - position.price) * 0.5;
            }
        }
    }

    fn check_stop_loss(&mut self, price: f64, prev: f64) -> Option<Action> {
        let stop = self.stop_loss;
        if !(price < stop && stop < prev) {
            return None;
        }

        let Some(position) = self.position.take() else {
            self.trace(format!("breaking down {:.6}", stop));
            return None;
        };

        let index = self.prices.len() - 1;
        self.position_history.push(position.into());
        self.position_history.push(PositionRecord::Sell { price: stop, index });
        self.position_history.push(PositionRecord::Report {
            profit: (stop - position.price) / position.price,
        });
        self.trace(format!("selling position | breaking down {:.6}", stop));

        Some(Action::Sell { price: stop, index })
    }

    fn trace(&mut self, message: String) {
        log::trace!("{}", message);
        self.logs.push(message);
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            pivots_n: self.pivots_n,
            pivot_diff: self.pivot_diff,
            batch_size: self.batch_size,
            batch_counter: self.batch_counter,
            model: self.model.clone(),
            prices: self.prices.clone(),
            events: self.events.clone(),
            position: self.position,
            position_history: self.position_history.clone(),
            stop_loss: self.stop_loss,
            last_price: self.last_price,
            logs: self.logs.clone(),
            margin: self.margin,
            pivots: self.pivots.centers.clone(),
            pivot_highs: self.pivots.highs.clone(),
            pivot_lows: self.pivots.lows.clone(),
        }
    }

    pub fn restore(snapshot: AgentSnapshot) -> Result<Self> {
        snapshot.validate()?;
        Ok(Self {
            pivots_n: snapshot.pivots_n,
            pivot_diff: snapshot.pivot_diff,
            batch_size: snapshot.batch_size.max(1),
            batch_counter: snapshot.batch_counter,
            model: snapshot.model,
            prices: snapshot.prices,
            pivots: PivotSet {
                centers: snapshot.pivots,
                highs: snapshot.pivot_highs,
                lows: snapshot.pivot_lows,
            },
            events: snapshot.events,
            position: snapshot.position,
            position_history: snapshot.position_history,
            stop_loss: snapshot.stop_loss,
            last_price: snapshot.last_price,
            logs: snapshot.logs,
            margin: snapshot.margin,
        })
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn pivots(&self) -> &PivotSet {
        &self.pivots
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn position_history(&self) -> &[PositionRecord] {
        &self.position_history
    }

    pub fn stop_loss(&self) -> f64 {
        self.stop_loss
    }

    pub fn last_price(&self) -> f64 {
        self.last_price
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn margin(&self) -> usize {
        self.margin
    }

    pub fn pivot_diff(&self) -> f64 {
        self.pivot_diff
    }

    pub fn chart_data(&self) -> ChartData {
        ChartData::from_agent(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_at_ten() -> PivotAgent {
        let mut agent = PivotAgent::new(1, 0.01, 1000);
        agent.feed(&[10.0, 10.0, 10.0]).unwrap();
        agent
    }

    #[test]
    fn test_no_previous_price_means_no_action() {
        let mut agent = PivotAgent::new(1, 0.01, 1000);
        assert_eq!(agent.observe(10.0).unwrap(), None);
    }

    #[test]
    fn test_breakout_with_open_position_ratchets_stop() {
        let mut agent = PivotAgent::new(2, 0.01, 1000);
        agent.feed(&[10.0, 10.0, 20.0, 20.0]).unwrap();

        assert_eq!(agent.observe(10.0).unwrap(), None);
        let buy = agent.observe(10.5).unwrap();
        assert!(matches!(buy, Some(Action::Buy { index: 5, .. })));
        assert!((agent.stop_loss() - 9.9).abs() < 1e-9);

        // Both the upper band and the lower band of the 20.0 pivot are crossed:
        // the ratchet to 19.8 is immediately replaced by the retracement midpoint
        assert_eq!(agent.observe(20.0).unwrap(), None);
        let entry = agent.position().unwrap().price;
        assert!((agent.stop_loss() - (entry + (20.0 - entry) * 0.5)).abs() < 1e-9);

        // Only the upper band is crossed now
        assert_eq!(agent.observe(20.5).unwrap(), None);
        assert!((agent.stop_loss() - 19.8).abs() < 1e-9);
        assert!(agent.position().is_some());
    }

    #[test]
    fn test_retracement_moves_stop_to_midpoint() {
        let mut agent = agent_at_ten();
        agent.observe(10.0).unwrap();
        assert!(matches!(agent.observe(10.2).unwrap(), Some(Action::Buy { .. })));

        agent.stop_loss = 9.0;
        assert_eq!(agent.observe(9.85).unwrap(), None);
        assert_eq!(agent.observe(9.95).unwrap(), None);

        let entry = agent.position().unwrap().price;
        let expected = entry + (10.0 - entry) * 0.5;
        assert!((agent.stop_loss() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_stop_breach_without_position_only_traces() {
        let mut agent = agent_at_ten();
        agent.stop_loss = 9.5;
        agent.observe(10.0).unwrap();
        assert_eq!(agent.observe(9.0).unwrap(), None);
        assert!(agent.position_history().is_empty());
        assert!(agent.logs().iter().any(|l| l.starts_with("breaking down")));
    }

    #[test]
    fn test_batch_counter_refits_on_boundary() {
        let mut agent = PivotAgent::new(1, 0.01, 2);
        agent.feed(&[10.0, 10.0]).unwrap();

        agent.observe(12.0).unwrap();
        assert_eq!(agent.pivots().centers, vec![10.0]);

        agent.observe(12.0).unwrap();
        assert!((agent.pivots().centers[0] - 11.0).abs() < 1e-9);
        assert_eq!(agent.batch_counter, 0);
    }
}
