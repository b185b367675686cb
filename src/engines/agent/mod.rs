pub mod pivots;
pub mod snapshot;
pub mod state_machine;

pub use pivots::{PivotModel, PivotSet};
pub use snapshot::AgentSnapshot;
pub use state_machine::PivotAgent;
