//! Core yearly simulation engine
//!
//! Folds the portfolio state over the planned year range. Each year resolves
//! maturities, reinvestment elections, scenario-adjusted rates, taxes, and
//! shortfall coverage, then emits one immutable [`YearRecord`].

use super::planner::plan_years;
use super::records::{ProjectionResult, Warning, YearRecord};
use super::state::SimulationState;
use crate::error::ProjectionError;
use crate::portfolio::{
    build_deposits, parse_withdrawals, Deposit, ProjectionInput, ReinvestOption, Withdrawal,
    MONEY_TOLERANCE,
};
use crate::rates::{effective_apy, RateScenario, RateTable};
use chrono::{Datelike, NaiveDate};

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Rate scenario to evaluate under; `None` is the baseline
    pub scenario: Option<RateScenario>,

    /// First sequence value used to name reinvested deposits
    ///
    /// Caller-supplied so that repeated runs with identical inputs produce
    /// identical deposit ids (no process-global counter).
    pub reinvest_seq_start: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            scenario: None,
            reinvest_seq_start: 1,
        }
    }
}

/// Per-run context shared by every year transition
struct YearContext<'a> {
    rates: &'a RateTable,
    scenario: Option<&'a RateScenario>,
    withdrawals: &'a [Withdrawal],
    liquid_term: Option<&'a str>,
    start_date: NaiveDate,
    start_year: i32,
    max_year: i32,
    tax_rate_pct: f64,
}

/// Main projection engine
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Run a full projection for one input
    ///
    /// Fatal validation or data problems return `Err` with no partial
    /// result; recoverable conditions are collected as warnings on the
    /// returned result.
    pub fn project(&self, input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
        let start_date = input.validate()?;
        let mut warnings = Vec::new();

        let withdrawals = parse_withdrawals(&input.withdrawals, &mut warnings);
        for withdrawal in &withdrawals {
            if withdrawal.date.year() < start_date.year() {
                warnings.push(Warning::new(
                    &withdrawal.id,
                    format!("dated {} before portfolio start; never applied", withdrawal.date),
                ));
            }
        }
        let tranches = build_deposits(
            &input.allocations,
            &input.rates,
            start_date,
            input.total_amount,
            &mut warnings,
        )?;

        let years = plan_years(start_date, &tranches, &withdrawals);
        let scenario_id = self.config.scenario.as_ref().map(|s| s.id.clone());
        let mut result = ProjectionResult::new(scenario_id, tranches.total_principal());
        result.warnings = warnings;

        let ctx = YearContext {
            rates: &input.rates,
            scenario: self.config.scenario.as_ref(),
            withdrawals: &withdrawals,
            liquid_term: tranches.liquid_term.as_deref(),
            start_date,
            start_year: *years.start(),
            max_year: *years.end(),
            tax_rate_pct: input.tax_rate_pct,
        };

        let mut state = SimulationState::from_tranches(&tranches, self.config.reinvest_seq_start);
        for year in years {
            let record = self.simulate_year(&ctx, &mut state, year, &mut result.warnings);
            result.add_year(record);
        }

        Ok(result)
    }

    /// Advance the portfolio by one calendar year
    fn simulate_year(
        &self,
        ctx: &YearContext,
        state: &mut SimulationState,
        year: i32,
        warnings: &mut Vec<Warning>,
    ) -> YearRecord {
        let mut record = YearRecord::new(year);

        // Prior-year shortfall comes off the top before anything else
        let starting_cash = state.cash_balance - state.carried_shortfall;
        let shortfall_pending = state.carried_shortfall > MONEY_TOLERANCE;

        // `<=` rather than `==`: a reinvested deposit can be created with a
        // maturity in its own creation year (short term, early maturity); it
        // joins the active set after this year's partition and must still
        // resolve on the next iteration
        let (maturing, remaining): (Vec<Deposit>, Vec<Deposit>) = state
            .active_deposits
            .drain(..)
            .partition(|d| d.maturity_date.year() <= year);
        state.active_deposits = remaining;

        let mut cash_from_maturities = 0.0;
        let mut pending_liquid_inflow = 0.0;
        let mut new_deposits: Vec<Deposit> = Vec::new();

        for deposit in maturing {
            record.interest_from_maturities += deposit.interest_at_maturity;
            record.maturing_value += deposit.value_at_maturity;

            if shortfall_pending {
                // Shortfall coverage preempts the deposit's own election
                warnings.push(Warning::new(
                    &deposit.id,
                    "maturity held as cash to cover carried shortfall",
                ));
                cash_from_maturities += deposit.value_at_maturity;
                continue;
            }

            match deposit.reinvest {
                ReinvestOption::HoldCash => {
                    cash_from_maturities += deposit.value_at_maturity;
                }
                ReinvestOption::MoveToLiquid => {
                    if state.liquid_balance.is_some() {
                        pending_liquid_inflow += deposit.value_at_maturity;
                    } else {
                        warnings.push(Warning::new(
                            &deposit.id,
                            "no liquid account defined; holding proceeds as cash",
                        ));
                        cash_from_maturities += deposit.value_at_maturity;
                    }
                }
                ReinvestOption::NewDeposit => {
                    match self.reinvest_deposit(ctx, state, year, &deposit, warnings) {
                        Some(new_deposit) => new_deposits.push(new_deposit),
                        None => cash_from_maturities += deposit.value_at_maturity,
                    }
                }
            }
        }

        // Liquid interest accrues on the start-of-year balance only; this
        // year's inflow lands afterwards and earns nothing until next year
        if let Some(balance) = state.liquid_balance {
            if balance > 0.0 {
                if let Some(term) = ctx.liquid_term {
                    if let Some(apy) =
                        effective_apy(term, year, ctx.scenario, ctx.rates, ctx.start_year)
                    {
                        let factor = if year == ctx.start_year {
                            (13 - ctx.start_date.month() as i32) as f64 / 12.0
                        } else {
                            1.0
                        };
                        record.liquid_interest = balance * apy / 100.0 * factor;
                    }
                }
            }
        }

        if pending_liquid_inflow > 0.0 {
            if let Some(balance) = state.liquid_balance.as_mut() {
                *balance += pending_liquid_inflow;
            }
        }

        record.total_interest = record.interest_from_maturities + record.liquid_interest;
        record.taxes_due = record.total_interest * ctx.tax_rate_pct / 100.0;
        record.withdrawals_total = ctx
            .withdrawals
            .iter()
            .filter(|w| w.date.year() == year)
            .map(|w| w.amount)
            .sum();

        record.cash_available = starting_cash + cash_from_maturities + record.liquid_interest;
        let mut net_flow = record.cash_available - record.withdrawals_total - record.taxes_due;

        let mut remaining_shortfall = 0.0;
        if net_flow < 0.0 {
            let mut shortfall = -net_flow;
            if let Some(balance) = state.liquid_balance.as_mut() {
                let draw = shortfall.min(*balance).max(0.0);
                *balance -= draw;
                net_flow += draw;
                shortfall -= draw;
                record.liquid_drawn_for_shortfall = draw;
            }
            if shortfall > MONEY_TOLERANCE {
                remaining_shortfall = shortfall;
                record.shortfall = true;
                record.shortfall_amount = shortfall;
            }
        }

        // Cash never goes negative; unresolved deficit carries as shortfall
        record.end_of_year_cash = net_flow.max(0.0);

        record.reinvested_value =
            pending_liquid_inflow + new_deposits.iter().map(|d| d.principal).sum::<f64>();
        state.active_deposits.extend(new_deposits);

        record.ongoing_principal = state.ongoing_principal();
        record.end_of_year_liquid = state.liquid_balance.unwrap_or(0.0);
        record.total_portfolio_value =
            record.ongoing_principal + record.end_of_year_liquid + record.end_of_year_cash;

        state.cash_balance = record.end_of_year_cash;
        state.carried_shortfall = remaining_shortfall;

        record
    }

    /// Open a new deposit from a maturity's proceeds, at the scenario rate
    ///
    /// Returns `None` when the reinvestment term is unusable; the caller
    /// falls back to holding the proceeds as cash.
    fn reinvest_deposit(
        &self,
        ctx: &YearContext,
        state: &mut SimulationState,
        year: i32,
        deposit: &Deposit,
        warnings: &mut Vec<Warning>,
    ) -> Option<Deposit> {
        let term = &deposit.reinvest_term;
        let months = ctx
            .rates
            .get(term)
            .and_then(|e| e.duration_months)
            .filter(|m| *m > 0);
        let apy = effective_apy(term, year, ctx.scenario, ctx.rates, ctx.start_year);

        let (months, apy) = match (months, apy) {
            (Some(months), Some(apy)) => (months, apy),
            _ => {
                let msg = format!("reinvestment term '{}' is not usable; holding proceeds as cash", term);
                log::warn!("{}: {}", deposit.id, msg);
                warnings.push(Warning::new(&deposit.id, msg));
                return None;
            }
        };

        let seq = state.take_reinvest_seq();
        let id = format!("{}-r{}", deposit.id, seq);

        // Elections never chain: a reinvested deposit holds cash at its own
        // maturity regardless of what its source elected
        let new_deposit = Deposit::new_fixed(
            id,
            deposit.value_at_maturity,
            term.clone(),
            apy,
            months,
            deposit.maturity_date,
            ReinvestOption::HoldCash,
            term.clone(),
        );

        match new_deposit {
            Some(new_deposit) => {
                if new_deposit.maturity_date.year() > ctx.max_year {
                    warnings.push(Warning::new(
                        &new_deposit.id,
                        format!(
                            "matures {} after projection horizon {}",
                            new_deposit.maturity_date, ctx.max_year
                        ),
                    ));
                }
                Some(new_deposit)
            }
            None => {
                warnings.push(Warning::new(
                    &deposit.id,
                    "reinvestment maturity date out of range; holding proceeds as cash",
                ));
                None
            }
        }
    }
}
