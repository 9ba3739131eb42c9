//! Ladder System - deterministic projection engine for CD/HYSA deposit ladders
//!
//! This library provides:
//! - Year-by-year projection of fixed-term deposit ladders plus a liquid account
//! - Reinvestment elections (hold cash, move to liquid, roll into a new deposit)
//! - Forward rate scenarios with linear phase-in and a floor
//! - Flat taxation on interest and withdrawal/shortfall resolution
//! - Multi-scenario batch evaluation

pub mod error;
pub mod portfolio;
pub mod projection;
pub mod rates;
pub mod scenario;

// Re-export commonly used types
pub use error::ProjectionError;
pub use portfolio::{Deposit, ProjectionInput, ReinvestOption, Withdrawal, MONEY_TOLERANCE};
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, Warning, YearRecord};
pub use rates::{effective_apy, RateScenario, RateTable, RateTableEntry};
pub use scenario::ScenarioRunner;
