use super::traits::ConfigSection;
use crate::error::PivotgenError;
use serde::{Deserialize, Serialize};

/// k-means parameters for pivot fitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub seed: u64,
    pub max_iterations: usize,
    pub n_init: usize,
    /// Relative to the price variance
    pub tolerance: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_iterations: 300,
            n_init: 10,
            tolerance: 1e-4,
        }
    }
}

impl ConfigSection for ClusteringConfig {
    fn section_name() -> &'static str {
        "clustering"
    }

    fn validate(&self) -> Result<(), PivotgenError> {
        if self.max_iterations == 0 || self.n_init == 0 {
            return Err(PivotgenError::Configuration(
                "Clustering needs at least one iteration and one initialisation".to_string()
            ));
        }
        if self.tolerance < 0.0 {
            return Err(PivotgenError::Configuration(
                "Clustering tolerance must not be negative".to_string()
            ));
        }
        Ok(())
    }
}
