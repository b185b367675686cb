// src/engines/metrics/profitability.rs
use crate::types::{PositionRecord, ProfitReport};
use std::collections::HashMap;

pub struct ProfitabilityMetrics;

impl ProfitabilityMetrics {
    /// Compound every round-trip return and split them by sign.
    /// A return of exactly zero counts as a failure.
    pub fn calculate(history: &[PositionRecord]) -> ProfitReport {
        let mut overall = 1.0;
        let mut success_count = 0;
        let mut failure_count = 0;

        for profit in Self::round_trip_returns(history) {
            overall *= 1.0 + profit;
            if profit > 0.0 {
                success_count += 1;
            } else {
                failure_count += 1;
            }
        }

        ProfitReport {
            profit: overall - 1.0,
            success_count,
            failure_count,
        }
    }

    /// Descriptive statistics over the same returns, keyed by metric name
    pub fn details(history: &[PositionRecord]) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();
        let returns: Vec<f64> = Self::round_trip_returns(history).collect();

        if returns.is_empty() {
            return metrics;
        }

        let report = Self::calculate(history);
        metrics.insert("return_pct".to_string(), report.profit * 100.0);
        metrics.insert("num_trades".to_string(), returns.len() as f64);

        let wins: Vec<f64> = returns.iter().copied().filter(|r| *r > 0.0).collect();
        let losses: Vec<f64> = returns.iter().copied().filter(|r| *r <= 0.0).collect();

        // Win rate
        let win_rate = (wins.len() as f64 / returns.len() as f64) * 100.0;
        metrics.insert("win_rate".to_string(), win_rate);

        if !wins.is_empty() {
            let avg_win = wins.iter().sum::<f64>() / wins.len() as f64;
            metrics.insert("avg_win".to_string(), avg_win);
        }

        if !losses.is_empty() {
            let avg_loss = losses.iter().map(|r| r.abs()).sum::<f64>() / losses.len() as f64;
            metrics.insert("avg_loss".to_string(), avg_loss);
        }

        // Profit factor
        let gross_profit: f64 = wins.iter().sum();
        let gross_loss: f64 = losses.iter().map(|r| r.abs()).sum();
        if gross_loss > 0.0 {
            metrics.insert("profit_factor".to_string(), gross_profit / gross_loss);
        }

        metrics
    }

    fn round_trip_returns(history: &[PositionRecord]) -> impl Iterator<Item = f64> + '_ {
        history.iter().filter_map(|record| match record {
            PositionRecord::Report { profit } => Some(*profit),
            _ => None,
        })
    }
}
