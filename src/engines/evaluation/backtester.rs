use crate::{
    config::EvolutionConfig,
    data::{KlineCache, Timeframe},
    engines::agent::{PivotAgent, PivotModel},
    engines::evaluation::SimpleSplitter,
    engines::generation::{Gene, GeneCodec, GeneConfig},
    error::{PivotgenError, Result},
    types::ProfitReport,
};
use std::sync::Arc;

/// Fitness assigned when a backtest cannot run: a total loss
pub const FAILED_FITNESS: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub fitness: f64,
    pub report: Option<ProfitReport>,
}

impl Evaluation {
    pub fn failed() -> Self {
        Self {
            fitness: FAILED_FITNESS,
            report: None,
        }
    }
}

/// Replays held-out closes through the agent a gene describes
pub struct Backtester {
    cache: Arc<KlineCache>,
    symbol: String,
    sample_count: usize,
    splitter: SimpleSplitter,
    timeframes: Vec<Timeframe>,
    minor_step: f64,
    model: PivotModel,
}

impl Backtester {
    pub fn new(cache: Arc<KlineCache>, config: &EvolutionConfig, model: PivotModel) -> Self {
        Self {
            cache,
            symbol: config.symbol.clone(),
            sample_count: config.sample_count,
            splitter: SimpleSplitter::new(config.train_split),
            timeframes: config.timeframes.clone(),
            minor_step: config.minor_step,
            model,
        }
    }

    /// Agent parameters from raw numerals: one more pivot and one more batch
    /// step than encoded, band width `diffMinor * minor_step`
    pub fn build_agent(&self, config: &GeneConfig) -> PivotAgent {
        let diff = config.diff_minor as f64 * self.minor_step;
        PivotAgent::new(config.pivots as usize + 1, diff, config.batch as usize + 1)
            .with_model(self.model.clone())
    }

    pub fn timeframe_for(&self, config: &GeneConfig) -> Result<Timeframe> {
        self.timeframes
            .get(config.time_frame as usize)
            .copied()
            .ok_or_else(|| {
                PivotgenError::Configuration(format!(
                    "No timeframe configured for numeral {}",
                    config.time_frame
                ))
            })
    }

    /// Feed the training prefix, then stream the rest through `observe`.
    /// Returns the agent so its state can be inspected or charted.
    pub fn run(&self, gene: &Gene) -> Result<PivotAgent> {
        let config = GeneCodec::decode(gene);
        let timeframe = self.timeframe_for(&config)?;
        let closes = self
            .cache
            .load_closes(&self.symbol, timeframe, self.sample_count)?;
        let split = self.splitter.split(&closes)?;

        let mut agent = self.build_agent(&config);
        agent.feed(split.train)?;
        for &price in split.test {
            agent.observe(price)?;
        }

        Ok(agent)
    }

    /// Backtest a gene, mapping any failure to `FAILED_FITNESS`
    pub fn evaluate(&self, gene: &Gene) -> Evaluation {
        match self.run(gene) {
            Ok(agent) => {
                let report = agent.report();
                if report.profit.is_finite() {
                    Evaluation {
                        fitness: report.profit,
                        report: Some(report),
                    }
                } else {
                    log::warn!("Gene {} produced non-finite profit {}", gene, report.profit);
                    Evaluation::failed()
                }
            }
            Err(e) => {
                log::warn!("Backtest of gene {} failed: {}", gene, e);
                Evaluation::failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemorySource;

    fn backtester(closes: Vec<f64>) -> Backtester {
        let source = InMemorySource::new().with_all_timeframes("dotusdt", closes);
        let cache = Arc::new(KlineCache::new(Box::new(source)));
        let config = EvolutionConfig {
            sample_count: 10,
            train_split: 0.5,
            ..EvolutionConfig::default()
        };
        Backtester::new(cache, &config, PivotModel::default())
    }

    #[test]
    fn test_build_agent_offsets_numerals() {
        let bt = backtester(vec![1.0; 10]);
        let config = GeneConfig { pivots: 2, time_frame: 0, diff_major: 9, diff_minor: 4, batch: 0 };
        let agent = bt.build_agent(&config);
        assert!((agent.pivot_diff() - 4.0 / 257.0).abs() < 1e-15);
    }

    #[test]
    fn test_insufficient_data_becomes_failed_fitness() {
        // 16 pivots cannot be fitted on 5 identical training closes
        let bt = backtester(vec![5.0; 10]);
        let gene: Gene = "RRSSSSSSSSSS".parse().unwrap();

        assert!(matches!(bt.run(&gene), Err(PivotgenError::InsufficientData { .. })));
        assert_eq!(bt.evaluate(&gene), Evaluation::failed());
    }

    #[test]
    fn test_flat_market_has_zero_profit() {
        let bt = backtester(vec![5.0; 10]);
        let gene: Gene = "SSSSSSSSSSSS".parse().unwrap();
        let evaluation = bt.evaluate(&gene);
        assert_eq!(evaluation.fitness, 0.0);
        assert_eq!(evaluation.report.unwrap().trades(), 0);
    }
}
