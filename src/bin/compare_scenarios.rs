//! Compare the baseline against every configured rate scenario
//!
//! Runs one projection per scenario in parallel and prints a comparison
//! table. Supports JSON output via --json for API integration.
//! Accepts config via environment variables:
//!   START_DATE, TOTAL_AMOUNT, TAX_RATE_PCT

use ladder_system::portfolio::{AllocationRow, WithdrawalRow};
use ladder_system::projection::ProjectionSummary;
use ladder_system::{ProjectionInput, RateTable, ReinvestOption, ScenarioRunner};
use serde::Serialize;
use std::env;
use std::time::Instant;

#[derive(Serialize)]
struct ComparisonRow {
    scenario: String,
    summary: ProjectionSummary,
    warning_count: usize,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn sample_input() -> ProjectionInput {
    ProjectionInput {
        start_date: env::var("START_DATE").unwrap_or_else(|_| "2025-07-01".to_string()),
        total_amount: env_or("TOTAL_AMOUNT", 200_000.0),
        tax_rate_pct: env_or("TAX_RATE_PCT", 25.0),
        allocations: vec![
            AllocationRow {
                id: "cd-1".to_string(),
                amount: 60_000.0,
                term: "cd_12m".to_string(),
                reinvest: Some(ReinvestOption::NewDeposit),
                reinvest_term: Some("cd_12m".to_string()),
            },
            AllocationRow {
                id: "cd-2".to_string(),
                amount: 50_000.0,
                term: "cd_24m".to_string(),
                reinvest: Some(ReinvestOption::NewDeposit),
                reinvest_term: Some("cd_24m".to_string()),
            },
            AllocationRow {
                id: "cd-3".to_string(),
                amount: 50_000.0,
                term: "cd_36m".to_string(),
                reinvest: Some(ReinvestOption::MoveToLiquid),
                reinvest_term: None,
            },
            AllocationRow {
                id: "hysa-1".to_string(),
                amount: 40_000.0,
                term: "hysa".to_string(),
                reinvest: None,
                reinvest_term: None,
            },
        ],
        withdrawals: vec![WithdrawalRow {
            id: "w-1".to_string(),
            date: "2027-06-01".to_string(),
            amount: 25_000.0,
        }],
        rates: RateTable::default_retail(),
        scenario_id: None,
    }
}

fn main() {
    env_logger::init();
    let json_output = env::args().any(|a| a == "--json");

    let input = sample_input();
    let runner = ScenarioRunner::new();

    let start = Instant::now();
    let results = match runner.run_all(&input) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("Projection failed: {}", err);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    let rows: Vec<ComparisonRow> = results
        .iter()
        .map(|r| ComparisonRow {
            scenario: r.scenario_id.clone().unwrap_or_else(|| "baseline".to_string()),
            summary: r.summary(),
            warning_count: r.warnings.len(),
        })
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&rows).expect("serialize comparison"));
        return;
    }

    println!("Scenario Comparison ({} scenarios in {:?})", rows.len(), elapsed);
    println!(
        "{:<18} {:>6} {:>14} {:>12} {:>14} {:>16} {:>10} {:>9}",
        "Scenario", "Years", "Interest", "Taxes", "After-Tax", "Final Value", "Shortfall", "Warnings"
    );
    println!("{}", "-".repeat(106));
    for row in &rows {
        println!(
            "{:<18} {:>6} {:>14.2} {:>12.2} {:>14.2} {:>16.2} {:>10} {:>9}",
            row.scenario,
            row.summary.years_simulated,
            row.summary.total_interest,
            row.summary.total_taxes,
            row.summary.after_tax_interest,
            row.summary.final_portfolio_value,
            if row.summary.any_shortfall { "YES" } else { "no" },
            row.warning_count,
        );
    }

    let baseline = &rows[0].summary;
    println!("\nDeltas vs baseline:");
    for row in rows.iter().skip(1) {
        println!(
            "  {:<18} interest {:>+12.2}  final value {:>+14.2}",
            row.scenario,
            row.summary.total_interest - baseline.total_interest,
            row.summary.final_portfolio_value - baseline.final_portfolio_value,
        );
    }
}
