//! Ladder System CLI
//!
//! Runs a sample deposit-ladder projection and prints the year-by-year table

use ladder_system::portfolio::{AllocationRow, WithdrawalRow};
use ladder_system::{ProjectionInput, RateTable, ReinvestOption, ScenarioRunner};
use std::fs::File;
use std::io::Write;

fn main() {
    env_logger::init();

    println!("Ladder System v0.1.0");
    println!("====================\n");

    // Sample ladder: three CDs staggered over 1-3 years plus an HYSA buffer
    let input = ProjectionInput {
        start_date: "2025-07-01".to_string(),
        total_amount: 200_000.0,
        tax_rate_pct: 26.375, // flat rate incl. surcharge
        allocations: vec![
            AllocationRow {
                id: "cd-1".to_string(),
                amount: 60_000.0,
                term: "cd_12m".to_string(),
                reinvest: Some(ReinvestOption::NewDeposit),
                reinvest_term: Some("cd_24m".to_string()),
            },
            AllocationRow {
                id: "cd-2".to_string(),
                amount: 50_000.0,
                term: "cd_24m".to_string(),
                reinvest: Some(ReinvestOption::MoveToLiquid),
                reinvest_term: None,
            },
            AllocationRow {
                id: "cd-3".to_string(),
                amount: 50_000.0,
                term: "cd_36m".to_string(),
                reinvest: Some(ReinvestOption::HoldCash),
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
        withdrawals: vec![
            WithdrawalRow {
                id: "w-1".to_string(),
                date: "2026-09-01".to_string(),
                amount: 15_000.0,
            },
            WithdrawalRow {
                id: "w-2".to_string(),
                date: "2028-03-01".to_string(),
                amount: 30_000.0,
            },
        ],
        rates: RateTable::default_retail(),
        scenario_id: Some("gradual_decline".to_string()),
    };

    println!("Portfolio: {} allocations, {} withdrawals", input.allocations.len(), input.withdrawals.len());
    println!("  Start: {}", input.start_date);
    println!("  Total: ${:.2}", input.total_amount);
    println!("  Tax rate: {:.3}%", input.tax_rate_pct);
    println!("  Scenario: {}", input.scenario_id.as_deref().unwrap_or("baseline"));
    println!();

    let runner = ScenarioRunner::new();
    let result = match runner.run(&input) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Projection failed: {}", err);
            std::process::exit(1);
        }
    };

    for warning in &result.warnings {
        println!("WARNING [{}]: {}", warning.context, warning.message);
    }
    if !result.warnings.is_empty() {
        println!();
    }

    // Print year table
    println!("Projection Results ({} years):", result.years.len());
    println!(
        "{:>5} {:>12} {:>12} {:>10} {:>10} {:>10} {:>12} {:>10} {:>12} {:>12} {:>14} {:>6}",
        "Year", "Maturing", "Reinvested", "Interest", "Taxes", "Withdrawn",
        "EOY Cash", "Liquid", "Ongoing", "Total", "Shortfall", "Flag"
    );
    println!("{}", "-".repeat(146));
    for row in &result.years {
        println!(
            "{:>5} {:>12.2} {:>12.2} {:>10.2} {:>10.2} {:>10.2} {:>12.2} {:>10.2} {:>12.2} {:>12.2} {:>14.2} {:>6}",
            row.year,
            row.maturing_value,
            row.reinvested_value,
            row.total_interest,
            row.taxes_due,
            row.withdrawals_total,
            row.end_of_year_cash,
            row.end_of_year_liquid,
            row.ongoing_principal,
            row.total_portfolio_value,
            row.shortfall_amount,
            if row.shortfall { "YES" } else { "" },
        );
    }

    // Write full results to CSV
    let csv_path = "ladder_projection_output.csv";
    let mut file = File::create(csv_path).expect("Unable to create CSV file");
    writeln!(file, "Year,MaturingValue,ReinvestedValue,InterestFromMaturities,LiquidInterest,TotalInterest,TaxesDue,CashAvailable,Withdrawals,LiquidDrawn,EOYCash,OngoingPrincipal,EOYLiquid,TotalValue,Shortfall,ShortfallAmount").unwrap();
    for row in &result.years {
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{},{:.2}",
            row.year,
            row.maturing_value,
            row.reinvested_value,
            row.interest_from_maturities,
            row.liquid_interest,
            row.total_interest,
            row.taxes_due,
            row.cash_available,
            row.withdrawals_total,
            row.liquid_drawn_for_shortfall,
            row.end_of_year_cash,
            row.ongoing_principal,
            row.end_of_year_liquid,
            row.total_portfolio_value,
            row.shortfall,
            row.shortfall_amount,
        )
        .unwrap();
    }
    println!("\nFull results written to: {}", csv_path);

    // Print summary
    let summary = result.summary();
    println!("\nSummary:");
    println!("  Years Simulated: {}", summary.years_simulated);
    println!("  Total Interest: ${:.2}", summary.total_interest);
    println!("  Total Taxes: ${:.2}", summary.total_taxes);
    println!("  After-Tax Interest: ${:.2}", summary.after_tax_interest);
    println!("  Final Portfolio Value: ${:.2}", summary.final_portfolio_value);
    println!("  Shortfall: {}", if summary.any_shortfall { "YES" } else { "no" });
}
