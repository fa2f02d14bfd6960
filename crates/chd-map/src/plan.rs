//! Mapping plan files.
//!
//! A plan is the TOML counterpart of the interactive mapping session:
//! selected sheet, first data row, field-to-column assignments, special
//! overrides and the validation toggles compiled into the transform.
//!
//! ```toml
//! sheet = "Sklepy"
//! start_row = 2
//!
//! [columns]
//! NAZWA = 1
//! KOD = 2
//!
//! [special]
//! id_kls_generated = true
//!
//! [validation]
//! worksheet_name = false
//! headers = true
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::special::SpecialState;
use crate::state::MappingState;

/// Which runtime guards the generated transform should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationToggles {
    /// Reject the message when the expected worksheet is absent.
    pub worksheet_name: bool,
    /// Reject the message when the header row differs from the
    /// configured layout.
    pub headers: bool,
}

impl Default for ValidationToggles {
    fn default() -> Self {
        Self {
            worksheet_name: false,
            headers: true,
        }
    }
}

/// The persisted mapping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingPlan {
    /// Worksheet to read; defaults to the first sheet of the workbook.
    pub sheet: Option<String>,
    /// 1-based index of the first data row.
    #[serde(default = "default_start_row")]
    pub start_row: u32,
    #[serde(default)]
    pub columns: BTreeMap<String, u32>,
    #[serde(default)]
    pub special: SpecialState,
    #[serde(default)]
    pub validation: ValidationToggles,
}

fn default_start_row() -> u32 {
    2
}

impl MappingPlan {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read mapping plan {}", path.display()))?;
        let plan: MappingPlan = toml::from_str(&text)
            .with_context(|| format!("parse mapping plan {}", path.display()))?;
        Ok(plan)
    }

    /// Build the mapping state, dropping assignments for fields the
    /// catalog does not know. Duplicate columns are kept as-is.
    pub fn to_state(&self) -> MappingState {
        let mut state = MappingState::new(self.special.clone());
        for (field, column) in MappingState::prune_unknown(&self.columns) {
            state.insert_unchecked(&field, column);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_defaults() {
        let plan: MappingPlan = toml::from_str("[columns]\nNAZWA = 1\n").unwrap();
        assert_eq!(plan.start_row, 2);
        assert!(plan.validation.headers);
        assert!(!plan.validation.worksheet_name);
        assert_eq!(plan.special.region_default, "-");
        assert_eq!(plan.special.id_kraj_default, "PL");
        assert_eq!(plan.to_state().column_for("NAZWA"), Some(1));
    }

    #[test]
    fn unknown_plan_fields_are_dropped() {
        let plan: MappingPlan =
            toml::from_str("[columns]\nNAZWA = 1\nSTARE_POLE = 9\n").unwrap();
        let state = plan.to_state();
        assert_eq!(state.column_for("NAZWA"), Some(1));
        assert_eq!(state.column_for("STARE_POLE"), None);
    }

    #[test]
    fn special_overrides_round_trip() {
        let text = "\
[special]
id_kls_generated = true
nip_default = \"1234567890\"
";
        let plan: MappingPlan = toml::from_str(text).unwrap();
        assert!(plan.special.id_kls_generated);
        assert_eq!(plan.special.nip_default, "1234567890");
        // Untouched defaults survive partial tables.
        assert_eq!(plan.special.region_default, "-");
    }
}
