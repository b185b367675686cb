use super::traits::ConfigSection;
use crate::error::PivotgenError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DataSource {
    Binance { base_url: String },
    Csv { directory: PathBuf },
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Binance {
                base_url: "https://api.binance.com".to_string(),
            },
        }
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), PivotgenError> {
        match &self.source {
            DataSource::Binance { base_url } if base_url.trim().is_empty() => Err(
                PivotgenError::Configuration("Binance base URL must not be empty".to_string()),
            ),
            DataSource::Csv { directory } if directory.as_os_str().is_empty() => Err(
                PivotgenError::Configuration("CSV directory must not be empty".to_string()),
            ),
            _ => Ok(()),
        }
    }
}
