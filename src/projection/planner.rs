//! Year-range planner
//!
//! The simulated span is fixed up front from the initial deposits and the
//! withdrawal schedule. Deposits created later by reinvestment may mature
//! past this range; the engine warns about those instead of extending it.

use crate::portfolio::{InitialTranches, Withdrawal};
use chrono::{Datelike, NaiveDate};
use std::ops::RangeInclusive;

/// Years of visibility kept past the last initial maturity
const LOOKAHEAD_YEARS: i32 = 5;

/// Inclusive range of calendar years the simulation must cover
pub fn plan_years(
    start_date: NaiveDate,
    tranches: &InitialTranches,
    withdrawals: &[Withdrawal],
) -> RangeInclusive<i32> {
    let start_year = start_date.year();

    let latest_event_year = tranches
        .deposits
        .iter()
        .map(|d| d.maturity_date.year())
        .chain(withdrawals.iter().map(|w| w.date.year()))
        .max()
        .unwrap_or(start_year);

    let longest_months = tranches
        .deposits
        .iter()
        .map(|d| d.duration_months)
        .max()
        .unwrap_or(0);
    let horizon_year = start_year + ((longest_months + 11) / 12) as i32 + LOOKAHEAD_YEARS;

    start_year..=latest_event_year.max(horizon_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{build_deposits, AllocationRow, ReinvestOption};
    use crate::rates::RateTable;

    fn tranches(rows: &[AllocationRow], start: NaiveDate) -> InitialTranches {
        let mut warnings = Vec::new();
        let total: f64 = rows.iter().map(|r| r.amount).sum();
        build_deposits(rows, &RateTable::default_retail(), start, total, &mut warnings).unwrap()
    }

    fn allocation(id: &str, amount: f64, term: &str) -> AllocationRow {
        AllocationRow {
            id: id.to_string(),
            amount,
            term: term.to_string(),
            reinvest: Some(ReinvestOption::HoldCash),
            reinvest_term: None,
        }
    }

    #[test]
    fn test_horizon_covers_longest_term_plus_lookahead() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let tranches = tranches(
            &[allocation("a1", 10_000.0, "cd_36m"), allocation("a2", 5_000.0, "hysa")],
            start,
        );
        let range = plan_years(start, &tranches, &[]);
        assert_eq!(*range.start(), 2025);
        // 36 months => 3 years, + 5 lookahead
        assert_eq!(*range.end(), 2033);
    }

    #[test]
    fn test_late_withdrawal_extends_range() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let tranches = tranches(&[allocation("a1", 10_000.0, "cd_12m")], start);
        let withdrawals = vec![Withdrawal {
            id: "w1".to_string(),
            date: NaiveDate::from_ymd_opt(2040, 1, 1).unwrap(),
            amount: 500.0,
        }];
        let range = plan_years(start, &tranches, &withdrawals);
        assert_eq!(*range.end(), 2040);
    }

    #[test]
    fn test_liquid_only_portfolio_gets_lookahead() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let tranches = tranches(&[allocation("a1", 10_000.0, "hysa")], start);
        let range = plan_years(start, &tranches, &[]);
        assert_eq!(range, 2025..=2030);
    }

    #[test]
    fn test_partial_year_duration_rounds_up() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let tranches = tranches(&[allocation("a1", 10_000.0, "cd_6m")], start);
        let range = plan_years(start, &tranches, &[]);
        // 6 months rounds up to 1 year, + 5 lookahead
        assert_eq!(*range.end(), 2031);
    }
}
