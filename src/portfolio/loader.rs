//! Load allocation and withdrawal rows from CSV files

use super::data::{AllocationRow, ReinvestOption, WithdrawalRow};
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row matching the allocations file columns
#[derive(Debug, serde::Deserialize)]
struct AllocationCsvRow {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Term")]
    term: String,
    #[serde(rename = "Reinvest", default)]
    reinvest: String,
    #[serde(rename = "ReinvestTerm", default)]
    reinvest_term: String,
}

impl AllocationCsvRow {
    fn to_allocation(self) -> Result<AllocationRow, Box<dyn Error>> {
        let reinvest = match self.reinvest.trim() {
            "" => None,
            "hold_cash" => Some(ReinvestOption::HoldCash),
            "move_to_liquid" => Some(ReinvestOption::MoveToLiquid),
            "new_deposit" => Some(ReinvestOption::NewDeposit),
            other => return Err(format!("Unknown Reinvest option: {}", other).into()),
        };

        let reinvest_term = match self.reinvest_term.trim() {
            "" => None,
            term => Some(term.to_string()),
        };

        Ok(AllocationRow {
            id: self.id,
            amount: self.amount,
            term: self.term,
            reinvest,
            reinvest_term,
        })
    }
}

/// Raw CSV row matching the withdrawals file columns
#[derive(Debug, serde::Deserialize)]
struct WithdrawalCsvRow {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Date", default)]
    date: String,
    #[serde(rename = "Amount")]
    amount: f64,
}

/// Load allocation rows from a CSV file
pub fn load_allocations(path: &Path) -> Result<Vec<AllocationRow>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let raw: AllocationCsvRow = result?;
        rows.push(raw.to_allocation()?);
    }
    Ok(rows)
}

/// Load withdrawal rows from a CSV file
///
/// Dates stay unparsed here; validation decides whether a row is usable.
pub fn load_withdrawals(path: &Path) -> Result<Vec<WithdrawalRow>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let raw: WithdrawalCsvRow = result?;
        rows.push(WithdrawalRow {
            id: raw.id,
            date: raw.date,
            amount: raw.amount,
        });
    }
    Ok(rows)
}
