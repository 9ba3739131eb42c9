//! Scenario runner for batch projections
//!
//! Holds the configured scenario set once, resolves scenario ids, and runs
//! one projection per scenario. Scenario runs are independent and read-only
//! over the same input, so the batch path evaluates them in parallel; within
//! a single run the year transitions stay strictly sequential.

use crate::error::ProjectionError;
use crate::portfolio::ProjectionInput;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, Warning};
use crate::rates::{default_scenarios, RateScenario};
use rayon::prelude::*;
use std::error::Error;
use std::path::Path;

/// Scenario id that always resolves to the baseline (no adjustment)
pub const BASELINE_SCENARIO_ID: &str = "baseline";

/// Pre-loaded scenario runner
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    scenarios: Vec<RateScenario>,
}

impl ScenarioRunner {
    /// Runner with the default scenario set
    pub fn new() -> Self {
        Self {
            scenarios: default_scenarios(),
        }
    }

    /// Runner with a specific scenario set
    pub fn with_scenarios(scenarios: Vec<RateScenario>) -> Self {
        Self { scenarios }
    }

    /// Runner with scenarios loaded from a CSV rate-data directory
    pub fn from_csv_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            scenarios: crate::rates::loader::load_scenarios(path)?,
        })
    }

    pub fn scenarios(&self) -> &[RateScenario] {
        &self.scenarios
    }

    /// Resolve a scenario id against the configured set
    ///
    /// Absent and `baseline` ids resolve to the baseline silently; an
    /// unknown id resolves to the baseline with a warning.
    fn resolve(&self, id: Option<&str>) -> (Option<RateScenario>, Option<Warning>) {
        match id {
            None => (None, None),
            Some(BASELINE_SCENARIO_ID) => (None, None),
            Some(id) => match self.scenarios.iter().find(|s| s.id == id) {
                Some(scenario) => (Some(scenario.clone()), None),
                None => {
                    let msg = format!("unknown scenario '{}'; using baseline rates", id);
                    log::warn!("{}", msg);
                    (None, Some(Warning::new("scenario", msg)))
                }
            },
        }
    }

    /// Run one projection under the input's selected scenario
    pub fn run(&self, input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
        let (scenario, warning) = self.resolve(input.scenario_id.as_deref());
        let engine = ProjectionEngine::new(ProjectionConfig {
            scenario,
            ..Default::default()
        });
        let mut result = engine.project(input)?;
        if let Some(warning) = warning {
            result.warnings.insert(0, warning);
        }
        Ok(result)
    }

    /// Run the baseline plus every configured scenario against one input
    ///
    /// Results come back in set order, baseline first.
    pub fn run_all(&self, input: &ProjectionInput) -> Result<Vec<ProjectionResult>, ProjectionError> {
        let configs: Vec<ProjectionConfig> = std::iter::once(None)
            .chain(self.scenarios.iter().cloned().map(Some))
            .map(|scenario| ProjectionConfig {
                scenario,
                ..Default::default()
            })
            .collect();

        configs
            .into_par_iter()
            .map(|config| ProjectionEngine::new(config).project(input))
            .collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{AllocationRow, ReinvestOption};
    use crate::rates::RateTable;

    fn test_input() -> ProjectionInput {
        ProjectionInput {
            start_date: "2025-01-01".to_string(),
            total_amount: 60_000.0,
            tax_rate_pct: 20.0,
            allocations: vec![
                AllocationRow {
                    id: "a1".to_string(),
                    amount: 40_000.0,
                    term: "cd_24m".to_string(),
                    reinvest: Some(ReinvestOption::NewDeposit),
                    reinvest_term: Some("cd_12m".to_string()),
                },
                AllocationRow {
                    id: "a2".to_string(),
                    amount: 20_000.0,
                    term: "hysa".to_string(),
                    reinvest: None,
                    reinvest_term: None,
                },
            ],
            withdrawals: Vec::new(),
            rates: RateTable::default_retail(),
            scenario_id: None,
        }
    }

    #[test]
    fn test_run_all_orders_baseline_first() {
        let runner = ScenarioRunner::new();
        let results = runner.run_all(&test_input()).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].scenario_id, None);
        assert_eq!(results[1].scenario_id.as_deref(), Some("gradual_decline"));
        assert_eq!(results[2].scenario_id.as_deref(), Some("steep_decline"));

        // Falling-rate scenarios can only lose interest vs baseline
        let base = results[0].summary();
        for result in &results[1..] {
            assert!(result.summary().total_interest < base.total_interest);
        }
    }

    #[test]
    fn test_unknown_scenario_id_warns_and_uses_baseline() {
        let runner = ScenarioRunner::new();
        let mut input = test_input();
        input.scenario_id = Some("rates_to_the_moon".to_string());
        let result = runner.run(&input).unwrap();
        assert!(result.warnings.iter().any(|w| w.context == "scenario"));

        input.scenario_id = None;
        let baseline = runner.run(&input).unwrap();
        assert_eq!(result.years, baseline.years);
    }

    #[test]
    fn test_explicit_baseline_id_is_silent() {
        let runner = ScenarioRunner::new();
        let mut input = test_input();
        input.scenario_id = Some(BASELINE_SCENARIO_ID.to_string());
        let result = runner.run(&input).unwrap();
        assert!(result.warnings.is_empty());
    }
}
