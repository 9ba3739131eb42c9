//! CSV-based rate data loader
//!
//! Loads the base rate table and scenario definitions from CSV files.

use super::scenario::RateScenario;
use super::table::{RateTable, RateTableEntry};
use std::collections::HashMap;
use std::error::Error;
use std::fs::File;
use std::path::Path;

/// Default path to rate data directory
pub const DEFAULT_RATES_PATH: &str = "data/rates";

/// Load the base rate table from `rates.csv`
///
/// Columns: `Term,APY,DurationMonths` — an empty duration marks the
/// liquid-account term.
pub fn load_rate_table(path: &Path) -> Result<RateTable, Box<dyn Error>> {
    let file = File::open(path.join("rates.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut table = RateTable::new();

    for result in reader.records() {
        let record = result?;
        let term = record[0].trim().to_string();
        let apy: f64 = record[1].trim().parse()?;
        let duration = record[2].trim();

        let entry = if duration.is_empty() {
            RateTableEntry::liquid(apy)
        } else {
            RateTableEntry::fixed(apy, duration.parse()?)
        };
        table.insert(term, entry);
    }

    Ok(table)
}

/// Load scenario definitions from `scenarios.csv`
///
/// Columns: `ScenarioId,StartEffectYear,FullEffectYear,FloorApy,Term,Adjustment`.
/// One row per (scenario, term) adjustment; the term `*` sets the scenario's
/// default adjustment. Year and floor columns must agree across a scenario's
/// rows; the first row wins.
pub fn load_scenarios(path: &Path) -> Result<Vec<RateScenario>, Box<dyn Error>> {
    let file = File::open(path.join("scenarios.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut order: Vec<String> = Vec::new();
    let mut scenarios: HashMap<String, RateScenario> = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let id = record[0].trim().to_string();
        let start_effect_year: i32 = record[1].trim().parse()?;
        let full_effect_year: i32 = record[2].trim().parse()?;
        let floor_apy: f64 = record[3].trim().parse()?;
        let term = record[4].trim().to_string();
        let adjustment: f64 = record[5].trim().parse()?;

        let scenario = scenarios.entry(id.clone()).or_insert_with(|| {
            order.push(id.clone());
            RateScenario {
                id,
                start_effect_year,
                full_effect_year,
                floor_apy,
                adjustments: HashMap::new(),
                default_adjustment: 0.0,
            }
        });

        if term == "*" {
            scenario.default_adjustment = adjustment;
        } else {
            scenario.adjustments.insert(term, adjustment);
        }
    }

    Ok(order
        .into_iter()
        .map(|id| scenarios.remove(&id).unwrap())
        .collect())
}
