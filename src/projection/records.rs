//! Projection output structures

use serde::{Deserialize, Serialize};

/// A recoverable diagnostic collected during a run
///
/// Warnings never abort a projection; they are returned with the result so a
/// caller can surface them however it likes. `context` names the input row or
/// deposit the condition applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub context: String,
    pub message: String,
}

impl Warning {
    pub fn new(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// One simulated calendar year, immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// Calendar year
    pub year: i32,

    /// Total maturity value of deposits maturing this year
    pub maturing_value: f64,

    /// Portion of maturing value redirected into reinvestment
    /// (liquid inflow + new deposits)
    pub reinvested_value: f64,

    /// Locked-in interest realized by this year's maturities
    pub interest_from_maturities: f64,

    /// Interest earned by the liquid account this year
    pub liquid_interest: f64,

    /// Total interest for the year
    pub total_interest: f64,

    /// Taxes due on this year's interest
    pub taxes_due: f64,

    /// Cash available at the start-of-year cash event
    pub cash_available: f64,

    /// Total withdrawals dated in this year
    pub withdrawals_total: f64,

    /// Amount drawn from the liquid account to cover shortfall
    pub liquid_drawn_for_shortfall: f64,

    /// End-of-year cash balance (never negative)
    pub end_of_year_cash: f64,

    /// Principal of deposits still active at year end
    pub ongoing_principal: f64,

    /// End-of-year liquid-account balance
    pub end_of_year_liquid: f64,

    /// Ongoing principal + liquid balance + cash
    pub total_portfolio_value: f64,

    /// Whether this year ended with unresolved shortfall
    pub shortfall: bool,

    /// Unresolved shortfall remaining at year end
    pub shortfall_amount: f64,
}

impl YearRecord {
    /// Create a year record with zeroed amounts
    pub fn new(year: i32) -> Self {
        Self {
            year,
            maturing_value: 0.0,
            reinvested_value: 0.0,
            interest_from_maturities: 0.0,
            liquid_interest: 0.0,
            total_interest: 0.0,
            taxes_due: 0.0,
            cash_available: 0.0,
            withdrawals_total: 0.0,
            liquid_drawn_for_shortfall: 0.0,
            end_of_year_cash: 0.0,
            ongoing_principal: 0.0,
            end_of_year_liquid: 0.0,
            total_portfolio_value: 0.0,
            shortfall: false,
            shortfall_amount: 0.0,
        }
    }
}

/// Complete result of one projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Scenario id this run was evaluated under; `None` is baseline
    pub scenario_id: Option<String>,

    /// One record per simulated calendar year, chronological
    pub years: Vec<YearRecord>,

    /// Recoverable diagnostics collected during the run
    pub warnings: Vec<Warning>,

    /// Sum of all initial deposit principal (fixed + liquid); the final
    /// portfolio value when zero years were simulated
    pub initial_principal: f64,
}

impl ProjectionResult {
    pub fn new(scenario_id: Option<String>, initial_principal: f64) -> Self {
        Self {
            scenario_id,
            years: Vec::new(),
            warnings: Vec::new(),
            initial_principal,
        }
    }

    /// Add a year record
    pub fn add_year(&mut self, record: YearRecord) {
        self.years.push(record);
    }

    /// True if any simulated year ended with unresolved shortfall
    pub fn any_shortfall(&self) -> bool {
        self.years.iter().any(|r| r.shortfall)
    }

    /// Aggregate cumulative totals across all year records
    pub fn summary(&self) -> ProjectionSummary {
        let total_interest: f64 = self.years.iter().map(|r| r.total_interest).sum();
        let total_taxes: f64 = self.years.iter().map(|r| r.taxes_due).sum();
        let final_portfolio_value = self
            .years
            .last()
            .map(|r| r.total_portfolio_value)
            .unwrap_or(self.initial_principal);

        ProjectionSummary {
            years_simulated: self.years.len() as u32,
            total_interest,
            total_taxes,
            after_tax_interest: total_interest - total_taxes,
            final_portfolio_value,
            any_shortfall: self.any_shortfall(),
        }
    }
}

/// Cumulative totals for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years_simulated: u32,
    pub total_interest: f64,
    pub total_taxes: f64,
    pub after_tax_interest: f64,
    pub final_portfolio_value: f64,
    pub any_shortfall: bool,
}
