//! Yearly projection: planner, state machine, and output records

mod engine;
mod planner;
mod records;
mod state;

pub use engine::{ProjectionConfig, ProjectionEngine};
pub use planner::plan_years;
pub use records::{ProjectionResult, ProjectionSummary, Warning, YearRecord};
pub use state::SimulationState;
