//! Simulation state threaded from one year to the next

use crate::portfolio::{Deposit, InitialTranches};

/// Portfolio state at a year boundary
///
/// Everything the per-year transition needs from previous years lives here;
/// a year record is a pure function of this state plus the year number.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Cash balance carried into the year
    pub cash_balance: f64,

    /// Liquid-account balance; `None` when no liquid allocation was made,
    /// in which case move-to-liquid elections fall back to cash
    pub liquid_balance: Option<f64>,

    /// Deposits that have not yet matured
    pub active_deposits: Vec<Deposit>,

    /// Unresolved shortfall carried from the prior year
    pub carried_shortfall: f64,

    /// Sequence for naming reinvested deposits; caller-seeded so repeated
    /// runs with identical inputs are byte-identical
    pub next_reinvest_seq: u32,
}

impl SimulationState {
    /// Initialize state from the validated tranches
    pub fn from_tranches(tranches: &InitialTranches, reinvest_seq_start: u32) -> Self {
        Self {
            cash_balance: 0.0,
            liquid_balance: tranches.liquid_balance,
            active_deposits: tranches.deposits.clone(),
            carried_shortfall: 0.0,
            next_reinvest_seq: reinvest_seq_start,
        }
    }

    /// Total principal of still-active deposits
    pub fn ongoing_principal(&self) -> f64 {
        self.active_deposits.iter().map(|d| d.principal).sum()
    }

    /// Consume and return the next reinvestment sequence value
    pub fn take_reinvest_seq(&mut self) -> u32 {
        let seq = self.next_reinvest_seq;
        self.next_reinvest_seq += 1;
        seq
    }
}
