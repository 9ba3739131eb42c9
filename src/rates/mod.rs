//! Base rates and forward rate scenarios

mod scenario;
mod table;
pub mod loader;

pub use scenario::{default_scenarios, effective_apy, RateScenario};
pub use table::{RateTable, RateTableEntry};
