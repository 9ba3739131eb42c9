//! Portfolio input structures and the tranche initializer

use crate::error::ProjectionError;
use crate::projection::Warning;
use crate::rates::RateTable;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Tolerance for monetary comparisons, in currency units
pub const MONEY_TOLERANCE: f64 = 0.01;

/// Reinvestment term used when an allocation row leaves it unspecified
pub const DEFAULT_REINVEST_MONTHS: u32 = 12;

/// What happens to a fixed-term deposit's proceeds at maturity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReinvestOption {
    /// Keep the proceeds as cash
    #[default]
    HoldCash,
    /// Move the proceeds into the liquid account
    MoveToLiquid,
    /// Open a new fixed-term deposit with the proceeds
    NewDeposit,
}

/// A raw allocation row as entered by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRow {
    pub id: String,
    pub amount: f64,
    pub term: String,
    #[serde(default)]
    pub reinvest: Option<ReinvestOption>,
    #[serde(default)]
    pub reinvest_term: Option<String>,
}

/// A raw withdrawal row; the date stays a string until validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRow {
    pub id: String,
    #[serde(default)]
    pub date: String,
    pub amount: f64,
}

/// A validated planned withdrawal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: String,
    pub date: NaiveDate,
    pub amount: f64,
}

/// A tracked fixed-term deposit (tranche)
///
/// Liquid-account allocations are never kept as deposits; they fold into a
/// single running balance owned by the simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: String,
    pub principal: f64,
    pub term: String,
    pub duration_months: u32,
    pub maturity_date: NaiveDate,
    pub interest_at_maturity: f64,
    pub value_at_maturity: f64,
    pub reinvest: ReinvestOption,
    pub reinvest_term: String,
}

impl Deposit {
    /// Build a fixed-term deposit starting at `start_date`
    ///
    /// Returns `None` if the maturity date falls outside the supported
    /// calendar range. The yield is locked in at `apy` for the whole term.
    pub fn new_fixed(
        id: impl Into<String>,
        principal: f64,
        term: impl Into<String>,
        apy: f64,
        duration_months: u32,
        start_date: NaiveDate,
        reinvest: ReinvestOption,
        reinvest_term: impl Into<String>,
    ) -> Option<Self> {
        let maturity_date = start_date.checked_add_months(Months::new(duration_months))?;
        let value_at_maturity =
            principal * (1.0 + apy / 100.0).powf(duration_months as f64 / 12.0);
        Some(Self {
            id: id.into(),
            principal,
            term: term.into(),
            duration_months,
            maturity_date,
            interest_at_maturity: value_at_maturity - principal,
            value_at_maturity,
            reinvest,
            reinvest_term: reinvest_term.into(),
        })
    }
}

/// Full input contract for one projection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Portfolio start date, ISO `YYYY-MM-DD`
    pub start_date: String,

    /// Declared total investable amount
    pub total_amount: f64,

    /// Flat tax rate on gross interest, in percent
    pub tax_rate_pct: f64,

    pub allocations: Vec<AllocationRow>,

    #[serde(default)]
    pub withdrawals: Vec<WithdrawalRow>,

    pub rates: RateTable,

    /// Selected scenario id; absent means baseline
    #[serde(default)]
    pub scenario_id: Option<String>,
}

impl ProjectionInput {
    /// Validate scalar inputs and parse the start date
    ///
    /// Fatal problems only; recoverable ones surface later as warnings.
    pub fn validate(&self) -> Result<NaiveDate, ProjectionError> {
        let start_date: NaiveDate = self.start_date.trim().parse().map_err(|_| {
            ProjectionError::validation(format!("unparseable start date '{}'", self.start_date))
        })?;

        if !self.total_amount.is_finite() || self.total_amount <= 0.0 {
            return Err(ProjectionError::validation(format!(
                "total amount must be positive, got {}",
                self.total_amount
            )));
        }
        if !self.tax_rate_pct.is_finite() || !(0.0..=100.0).contains(&self.tax_rate_pct) {
            return Err(ProjectionError::validation(format!(
                "tax rate must be within 0-100%, got {}",
                self.tax_rate_pct
            )));
        }
        if self.allocations.is_empty() {
            return Err(ProjectionError::validation("no allocation rows provided"));
        }
        if self.rates.is_empty() {
            return Err(ProjectionError::validation("rate table is empty"));
        }

        Ok(start_date)
    }
}

/// Parse withdrawal rows, skipping rows with missing or unparseable dates
pub fn parse_withdrawals(
    rows: &[WithdrawalRow],
    warnings: &mut Vec<Warning>,
) -> Vec<Withdrawal> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        match row.date.trim().parse::<NaiveDate>() {
            Ok(date) => out.push(Withdrawal {
                id: row.id.clone(),
                date,
                amount: row.amount,
            }),
            Err(_) => {
                warnings.push(Warning::new(
                    &row.id,
                    format!("withdrawal skipped: unparseable date '{}'", row.date),
                ));
            }
        }
    }
    out
}

/// Result of turning raw allocation rows into tracked state
#[derive(Debug, Clone)]
pub struct InitialTranches {
    /// Fixed-term deposits, in input order
    pub deposits: Vec<Deposit>,

    /// Starting liquid balance; `None` when no liquid allocation exists
    pub liquid_balance: Option<f64>,

    /// Term id the liquid balance accrues at (first liquid row's term)
    pub liquid_term: Option<String>,
}

impl InitialTranches {
    /// Sum of all allocated principal, fixed and liquid
    pub fn total_principal(&self) -> f64 {
        self.deposits.iter().map(|d| d.principal).sum::<f64>()
            + self.liquid_balance.unwrap_or(0.0)
    }
}

/// Tranche initializer: validate allocation rows and compute locked-in values
///
/// Locked-in yields always use the base rate table; scenario adjustments
/// apply only to future reinvestment and ongoing liquid interest. A term
/// missing from the table, or a fixed term without a positive duration, is
/// fatal. An allocation total that disagrees with the declared total is a
/// warning only; the engine always computes against the per-row sum.
pub fn build_deposits(
    allocations: &[AllocationRow],
    rates: &RateTable,
    start_date: NaiveDate,
    declared_total: f64,
    warnings: &mut Vec<Warning>,
) -> Result<InitialTranches, ProjectionError> {
    let mut deposits = Vec::new();
    let mut liquid_balance: Option<f64> = None;
    let mut liquid_term: Option<String> = None;

    let default_reinvest_term = term_with_duration(rates, DEFAULT_REINVEST_MONTHS);

    for row in allocations {
        if !row.amount.is_finite() || row.amount < 0.0 {
            return Err(ProjectionError::validation(format!(
                "allocation '{}' has invalid amount {}",
                row.id, row.amount
            )));
        }

        let entry = rates.get(&row.term).ok_or_else(|| {
            ProjectionError::data(format!(
                "allocation '{}' references unknown term '{}'",
                row.id, row.term
            ))
        })?;

        match entry.duration_months {
            None => {
                *liquid_balance.get_or_insert(0.0) += row.amount;
                if liquid_term.is_none() {
                    liquid_term = Some(row.term.clone());
                }
            }
            Some(0) => {
                return Err(ProjectionError::data(format!(
                    "term '{}' has non-positive duration",
                    row.term
                )));
            }
            Some(months) => {
                let reinvest = row.reinvest.unwrap_or_default();
                let reinvest_term = row
                    .reinvest_term
                    .clone()
                    .or_else(|| default_reinvest_term.map(str::to_string))
                    .unwrap_or_else(|| row.term.clone());

                let deposit = Deposit::new_fixed(
                    row.id.clone(),
                    row.amount,
                    row.term.clone(),
                    entry.apy,
                    months,
                    start_date,
                    reinvest,
                    reinvest_term,
                )
                .ok_or_else(|| {
                    ProjectionError::data(format!(
                        "allocation '{}': maturity date out of range",
                        row.id
                    ))
                })?;
                deposits.push(deposit);
            }
        }
    }

    let tranches = InitialTranches {
        deposits,
        liquid_balance,
        liquid_term,
    };

    let allocated = tranches.total_principal();
    if (allocated - declared_total).abs() > MONEY_TOLERANCE {
        let msg = format!(
            "allocated {:.2} does not match declared total {:.2}",
            allocated, declared_total
        );
        log::warn!("{}", msg);
        warnings.push(Warning::new("allocations", msg));
    }

    Ok(tranches)
}

/// Smallest term id quoted at exactly `months`; deterministic across runs
pub fn term_with_duration(rates: &RateTable, months: u32) -> Option<&str> {
    rates
        .terms()
        .filter(|t| rates.get(t).and_then(|e| e.duration_months) == Some(months))
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn rows() -> Vec<AllocationRow> {
        vec![
            AllocationRow {
                id: "a1".to_string(),
                amount: 50_000.0,
                term: "cd_12m".to_string(),
                reinvest: Some(ReinvestOption::NewDeposit),
                reinvest_term: Some("cd_24m".to_string()),
            },
            AllocationRow {
                id: "a2".to_string(),
                amount: 20_000.0,
                term: "hysa".to_string(),
                reinvest: None,
                reinvest_term: None,
            },
        ]
    }

    #[test]
    fn test_initializer_splits_fixed_and_liquid() {
        let mut warnings = Vec::new();
        let tranches =
            build_deposits(&rows(), &RateTable::default_retail(), start(), 70_000.0, &mut warnings)
                .unwrap();

        assert_eq!(tranches.deposits.len(), 1);
        assert_eq!(tranches.liquid_balance, Some(20_000.0));
        assert!(warnings.is_empty());

        let d = &tranches.deposits[0];
        assert_eq!(d.maturity_date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        // 50_000 * 1.045
        assert_relative_eq!(d.value_at_maturity, 52_250.0, epsilon = 1e-9);
        assert_relative_eq!(d.interest_at_maturity, 2_250.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_term_is_fatal() {
        let mut rows = rows();
        rows[0].term = "cd_13m".to_string();
        let mut warnings = Vec::new();
        let err =
            build_deposits(&rows, &RateTable::default_retail(), start(), 70_000.0, &mut warnings)
                .unwrap_err();
        assert!(matches!(err, ProjectionError::Data(_)));
    }

    #[test]
    fn test_total_mismatch_is_warning_only() {
        let mut warnings = Vec::new();
        let tranches =
            build_deposits(&rows(), &RateTable::default_retail(), start(), 90_000.0, &mut warnings)
                .unwrap();
        assert_eq!(warnings.len(), 1);
        assert_relative_eq!(tranches.total_principal(), 70_000.0);
    }

    #[test]
    fn test_reinvest_defaults() {
        let mut rows = rows();
        rows[0].reinvest = None;
        rows[0].reinvest_term = None;
        let mut warnings = Vec::new();
        let tranches =
            build_deposits(&rows, &RateTable::default_retail(), start(), 70_000.0, &mut warnings)
                .unwrap();
        let d = &tranches.deposits[0];
        assert_eq!(d.reinvest, ReinvestOption::HoldCash);
        assert_eq!(d.reinvest_term, "cd_12m"); // the 12-month term in the table
    }

    #[test]
    fn test_fractional_year_compounding() {
        let mut warnings = Vec::new();
        let rows = vec![AllocationRow {
            id: "a1".to_string(),
            amount: 10_000.0,
            term: "cd_6m".to_string(),
            reinvest: None,
            reinvest_term: None,
        }];
        let tranches =
            build_deposits(&rows, &RateTable::default_retail(), start(), 10_000.0, &mut warnings)
                .unwrap();
        let d = &tranches.deposits[0];
        // 10_000 * 1.046^(0.5)
        assert_relative_eq!(d.value_at_maturity, 10_000.0 * 1.046f64.powf(0.5), epsilon = 1e-9);
        assert_eq!(d.maturity_date, NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
    }

    #[test]
    fn test_withdrawal_parsing_skips_bad_dates() {
        let mut warnings = Vec::new();
        let rows = vec![
            WithdrawalRow {
                id: "w1".to_string(),
                date: "2026-06-01".to_string(),
                amount: 1_000.0,
            },
            WithdrawalRow {
                id: "w2".to_string(),
                date: "junk".to_string(),
                amount: 2_000.0,
            },
        ];
        let parsed = parse_withdrawals(&rows, &mut warnings);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].date, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].context, "w2");
    }

    #[test]
    fn test_validate_rejects_bad_scalars() {
        let input = ProjectionInput {
            start_date: "not-a-date".to_string(),
            total_amount: 70_000.0,
            tax_rate_pct: 25.0,
            allocations: rows(),
            withdrawals: Vec::new(),
            rates: RateTable::default_retail(),
            scenario_id: None,
        };
        assert!(matches!(input.validate(), Err(ProjectionError::Validation(_))));

        let input = ProjectionInput {
            start_date: "2025-01-15".to_string(),
            total_amount: 0.0,
            ..input
        };
        assert!(matches!(input.validate(), Err(ProjectionError::Validation(_))));

        let input = ProjectionInput {
            total_amount: 70_000.0,
            tax_rate_pct: 120.0,
            ..input
        };
        assert!(matches!(input.validate(), Err(ProjectionError::Validation(_))));
    }
}
