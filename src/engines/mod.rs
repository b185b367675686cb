pub mod agent;
pub mod evaluation;
pub mod generation;
pub mod metrics;
