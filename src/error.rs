use thiserror::Error;

#[derive(Error, Debug)]
pub enum PivotgenError {
    #[error("Invalid gene: {0}")]
    InvalidGene(String),

    #[error("Invalid gene config: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: need {required} distinct prices, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PivotgenError>;
