pub mod backtester;
pub mod splitter;

pub use backtester::{Backtester, Evaluation, FAILED_FITNESS};
pub use splitter::{DataSplit, SimpleSplitter};
