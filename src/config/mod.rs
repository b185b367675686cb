pub mod traits;
pub mod evolution;
pub mod clustering;
pub mod data;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::EvolutionConfig;
pub use clustering::ClusteringConfig;
pub use data::{DataConfig, DataSource};
pub use traits::ConfigSection;
