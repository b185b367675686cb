pub mod profitability;

pub use profitability::ProfitabilityMetrics;
