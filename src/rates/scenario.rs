//! Forward rate scenarios and the effective-APY resolver
//!
//! A scenario is a declarative rule for how future yields drift away from
//! today's base rates: a per-term adjustment phased in linearly between a
//! start-effect year and a full-effect year, clamped to a floor. The baseline
//! scenario is the absence of a scenario: base rates pass through untouched.

use super::table::RateTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A forward interest-rate scenario
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateScenario {
    /// Scenario identifier
    pub id: String,

    /// Projection year (1-indexed) in which the adjustment starts phasing in
    pub start_effect_year: i32,

    /// Projection year (1-indexed) from which the adjustment applies in full
    pub full_effect_year: i32,

    /// Minimum APY this scenario can produce, in percent
    pub floor_apy: f64,

    /// Per-term APY deltas, in percent
    pub adjustments: HashMap<String, f64>,

    /// Delta applied to any term without an explicit entry, in percent
    pub default_adjustment: f64,
}

impl RateScenario {
    /// Adjustment for a term: explicit entry, else the declared default
    pub fn adjustment_for(&self, term: &str) -> f64 {
        self.adjustments
            .get(term)
            .copied()
            .unwrap_or(self.default_adjustment)
    }

    /// Gradual rate decline: rates drift down 1.5% over projection years 2-6
    pub fn gradual_decline() -> Self {
        let mut adjustments = HashMap::new();
        adjustments.insert("hysa".to_string(), -2.0);
        Self {
            id: "gradual_decline".to_string(),
            start_effect_year: 2,
            full_effect_year: 6,
            floor_apy: 0.5,
            adjustments,
            default_adjustment: -1.5,
        }
    }

    /// Steep rate decline: rates drop 3% within the first three years
    pub fn steep_decline() -> Self {
        let mut adjustments = HashMap::new();
        adjustments.insert("hysa".to_string(), -3.5);
        Self {
            id: "steep_decline".to_string(),
            start_effect_year: 1,
            full_effect_year: 3,
            floor_apy: 0.25,
            adjustments,
            default_adjustment: -3.0,
        }
    }
}

/// Default scenario set used by the demo binaries
pub fn default_scenarios() -> Vec<RateScenario> {
    vec![RateScenario::gradual_decline(), RateScenario::steep_decline()]
}

/// Effective APY for a term in a given calendar year
///
/// `None` scenario is the baseline: the base APY is returned exactly, with no
/// floor clamp. Under a scenario the adjustment phases in linearly between
/// the start-effect and full-effect years; every scenario branch clamps to
/// the scenario floor. Returns `None` if the term is not in the rate table.
pub fn effective_apy(
    term: &str,
    year: i32,
    scenario: Option<&RateScenario>,
    rates: &RateTable,
    start_year: i32,
) -> Option<f64> {
    let base = rates.base_apy(term)?;

    let Some(scenario) = scenario else {
        return Some(base);
    };

    let target = base + scenario.adjustment_for(term);
    let years_elapsed = year - start_year;
    let start_elapsed = scenario.start_effect_year - 1;
    let full_elapsed = scenario.full_effect_year - 1;
    let span = full_elapsed - start_elapsed;

    let apy = if years_elapsed >= full_elapsed {
        target
    } else if years_elapsed >= start_elapsed && span > 0 {
        let progress = (years_elapsed - start_elapsed + 1) as f64 / (span + 1) as f64;
        base + (target - base) * progress
    } else {
        // Pre-effect period (also covers span <= 0 before the full-effect year)
        base
    };

    Some(apy.max(scenario.floor_apy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> RateTable {
        RateTable::default_retail()
    }

    #[test]
    fn test_baseline_passes_base_apy_through() {
        let rates = table();
        for term in ["hysa", "cd_6m", "cd_12m", "cd_24m", "cd_36m", "cd_60m"] {
            for year in 2025..2045 {
                let apy = effective_apy(term, year, None, &rates, 2025).unwrap();
                assert_eq!(apy, rates.base_apy(term).unwrap());
            }
        }
    }

    #[test]
    fn test_unknown_term_is_none() {
        assert_eq!(effective_apy("cd_120m", 2025, None, &table(), 2025), None);
    }

    #[test]
    fn test_full_effect_reaches_target() {
        let rates = table();
        let scenario = RateScenario::gradual_decline();
        // cd_12m base 4.5, default adjustment -1.5 => target 3.0 from year 6 on
        let apy = effective_apy("cd_12m", 2030, Some(&scenario), &rates, 2025).unwrap();
        assert_relative_eq!(apy, 3.0);
        let later = effective_apy("cd_12m", 2040, Some(&scenario), &rates, 2025).unwrap();
        assert_relative_eq!(later, 3.0);
    }

    #[test]
    fn test_interpolation_is_monotonic_for_falling_rates() {
        let rates = table();
        let scenario = RateScenario::gradual_decline();
        let apys: Vec<f64> = (2025..2035)
            .map(|y| effective_apy("cd_12m", y, Some(&scenario), &rates, 2025).unwrap())
            .collect();
        for pair in apys.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12, "rates must not rise: {:?}", apys);
        }
        // Constant once fully adjusted
        let full_idx = (scenario.full_effect_year - 1) as usize;
        for w in apys[full_idx..].windows(2) {
            assert_eq!(w[0], w[1]);
        }
    }

    #[test]
    fn test_interpolation_midpoint() {
        let rates = table();
        // start year 2, full year 4: elapsed 1..=2 interpolates over span 2
        let scenario = RateScenario {
            id: "test".to_string(),
            start_effect_year: 2,
            full_effect_year: 4,
            floor_apy: 0.0,
            adjustments: HashMap::new(),
            default_adjustment: -3.0,
        };
        // cd_12m base 4.5, target 1.5; elapsed=1 => progress 1/3 => 3.5
        let apy = effective_apy("cd_12m", 2026, Some(&scenario), &rates, 2025).unwrap();
        assert_relative_eq!(apy, 3.5, epsilon = 1e-12);
        // elapsed=2 => progress 2/3 => 2.5
        let apy = effective_apy("cd_12m", 2027, Some(&scenario), &rates, 2025).unwrap();
        assert_relative_eq!(apy, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_floor_is_never_breached() {
        let rates = table();
        let scenario = RateScenario {
            id: "crash".to_string(),
            start_effect_year: 1,
            full_effect_year: 2,
            floor_apy: 1.0,
            adjustments: HashMap::new(),
            default_adjustment: -10.0,
        };
        for term in ["hysa", "cd_6m", "cd_12m", "cd_24m", "cd_36m", "cd_60m"] {
            for year in 2025..2040 {
                let apy = effective_apy(term, year, Some(&scenario), &rates, 2025).unwrap();
                assert!(apy >= 1.0, "{} in {} returned {}", term, year, apy);
            }
        }
    }

    #[test]
    fn test_explicit_term_adjustment_beats_default() {
        let rates = table();
        let scenario = RateScenario::steep_decline();
        // hysa has an explicit -3.5; base 3.8 => target 0.3, floored at 0.25
        let apy = effective_apy("hysa", 2030, Some(&scenario), &rates, 2025).unwrap();
        assert_relative_eq!(apy, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_pre_effect_years_return_base() {
        let rates = table();
        let scenario = RateScenario::gradual_decline(); // starts in projection year 2
        let apy = effective_apy("cd_24m", 2025, Some(&scenario), &rates, 2025).unwrap();
        assert_eq!(apy, 4.2);
    }

    #[test]
    fn test_degenerate_span_acts_as_step() {
        let rates = table();
        let scenario = RateScenario {
            id: "step".to_string(),
            start_effect_year: 3,
            full_effect_year: 3,
            floor_apy: 0.0,
            adjustments: HashMap::new(),
            default_adjustment: -1.0,
        };
        // Before the full-effect year: unadjusted base
        let before = effective_apy("cd_12m", 2026, Some(&scenario), &rates, 2025).unwrap();
        assert_eq!(before, 4.5);
        // At the full-effect year: full target, no interpolation
        let at = effective_apy("cd_12m", 2027, Some(&scenario), &rates, 2025).unwrap();
        assert_relative_eq!(at, 3.5);
    }
}
