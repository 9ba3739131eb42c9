//! Base rate table keyed by term identifier

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single quoted rate for one term
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTableEntry {
    /// Annual percentage yield, in percent (4.5 means 4.5%)
    pub apy: f64,

    /// Term length in months; `None` marks the liquid-account term
    pub duration_months: Option<u32>,
}

impl RateTableEntry {
    /// Entry for a fixed-term deposit
    pub fn fixed(apy: f64, duration_months: u32) -> Self {
        Self {
            apy,
            duration_months: Some(duration_months),
        }
    }

    /// Entry for the liquid (variable-rate) account
    pub fn liquid(apy: f64) -> Self {
        Self {
            apy,
            duration_months: None,
        }
    }

    pub fn is_liquid(&self) -> bool {
        self.duration_months.is_none()
    }
}

/// Base rate table: term identifier → quoted rate
///
/// Exactly the entries with no duration are liquid-account terms. Scenario
/// adjustments never live here; the table always holds today's base rates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTable {
    entries: HashMap<String, RateTableEntry>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, term: impl Into<String>, entry: RateTableEntry) {
        self.entries.insert(term.into(), entry);
    }

    pub fn get(&self, term: &str) -> Option<&RateTableEntry> {
        self.entries.get(term)
    }

    /// Base APY for a term, if quoted
    pub fn base_apy(&self, term: &str) -> Option<f64> {
        self.entries.get(term).map(|e| e.apy)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The liquid term in the table, if any; smallest id wins so repeated
    /// runs resolve the same term
    pub fn liquid_term(&self) -> Option<&str> {
        self.entries
            .iter()
            .filter(|(_, e)| e.is_liquid())
            .map(|(k, _)| k.as_str())
            .min()
    }

    /// Rate table with typical retail terms, used by the demo binaries and tests
    pub fn default_retail() -> Self {
        let mut table = Self::new();
        table.insert("hysa", RateTableEntry::liquid(3.8));
        table.insert("cd_6m", RateTableEntry::fixed(4.6, 6));
        table.insert("cd_12m", RateTableEntry::fixed(4.5, 12));
        table.insert("cd_24m", RateTableEntry::fixed(4.2, 24));
        table.insert("cd_36m", RateTableEntry::fixed(4.0, 36));
        table.insert("cd_60m", RateTableEntry::fixed(3.9, 60));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liquid_entry_has_no_duration() {
        let entry = RateTableEntry::liquid(3.8);
        assert!(entry.is_liquid());
        assert_eq!(entry.duration_months, None);

        let fixed = RateTableEntry::fixed(4.5, 12);
        assert!(!fixed.is_liquid());
    }

    #[test]
    fn test_default_retail_lookup() {
        let table = RateTable::default_retail();
        assert_eq!(table.base_apy("cd_12m"), Some(4.5));
        assert_eq!(table.base_apy("unknown"), None);
        assert_eq!(table.liquid_term(), Some("hysa"));
    }
}
