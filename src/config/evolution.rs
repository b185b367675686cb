use super::traits::ConfigSection;
use crate::data::Timeframe;
use crate::engines::generation::Gene;
use crate::error::PivotgenError;
use serde::{Deserialize, Serialize};

/// Evolution run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub symbol: String,
    pub sample_count: usize,
    /// Fraction of the fetched closes fed to the agent before the backtest
    pub train_split: f64,
    /// Indexed by the gene's `timeFrame` numeral
    pub timeframes: Vec<Timeframe>,
    /// Pivot band width per `diffMinor` unit
    pub minor_step: f64,
    pub seed_genes: Vec<String>,
    /// 0 means one individual per seed gene
    pub population_size: usize,
    pub target_generations: usize,
    pub mutation_rate: f64,
    pub max_duplicate_retries: usize,
    pub hall_of_fame_size: usize,
    pub parallel: bool,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            symbol: "dotusdt".to_string(),
            sample_count: 1000,
            train_split: 0.2,
            timeframes: Timeframe::all().to_vec(),
            minor_step: 1.0 / 257.0,
            seed_genes: vec![
                "SRSSSSSSTSRR".to_string(), // pivots 3, 1m, diffMinor 1, batch 15
                "TTTSSSSTTSST".to_string(), // pivots 5, 15m, diffMinor 5, batch 1
            ],
            population_size: 0,
            target_generations: 2,
            mutation_rate: 0.075,
            max_duplicate_retries: 100,
            hall_of_fame_size: 10,
            parallel: true,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    pub fn effective_population_size(&self) -> usize {
        if self.population_size == 0 {
            self.seed_genes.len()
        } else {
            self.population_size
        }
    }

    pub fn parsed_seed_genes(&self) -> Result<Vec<Gene>, PivotgenError> {
        self.seed_genes.iter().map(|g| g.parse()).collect()
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), PivotgenError> {
        if self.symbol.trim().is_empty() {
            return Err(PivotgenError::Configuration(
                "Symbol must not be empty".to_string()
            ));
        }
        if self.sample_count < 2 {
            return Err(PivotgenError::Configuration(
                "Sample count must be at least 2".to_string()
            ));
        }
        if self.train_split <= 0.0 || self.train_split >= 1.0 {
            return Err(PivotgenError::Configuration(
                "Train/test split must be between 0 and 1".to_string()
            ));
        }
        if self.timeframes.len() != 4 {
            return Err(PivotgenError::Configuration(format!(
                "Exactly 4 timeframes are needed (one per timeFrame numeral), got {}",
                self.timeframes.len()
            )));
        }
        if !(self.minor_step > 0.0) {
            return Err(PivotgenError::Configuration(
                "Minor step must be positive".to_string()
            ));
        }
        if self.mutation_rate < 0.0 || self.mutation_rate > 1.0 {
            return Err(PivotgenError::Configuration(
                "Mutation rate must be between 0 and 1".to_string()
            ));
        }
        if self.target_generations < 1 {
            return Err(PivotgenError::Configuration(
                "Target generation count must be at least 1".to_string()
            ));
        }
        if self.effective_population_size() < 2 {
            return Err(PivotgenError::Configuration(
                "Population size must be at least 2".to_string()
            ));
        }
        self.parsed_seed_genes()?;
        Ok(())
    }
}
