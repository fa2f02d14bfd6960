//! Per-field override state for the special catalog fields.

use serde::{Deserialize, Serialize};

/// Auxiliary state for the special fields: the externally-generated
/// flag for ID_KLS and the three independent default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialState {
    /// ID_KLS values are assigned by the downstream system; the field
    /// is skipped in output and its mapping is irrelevant.
    pub id_kls_generated: bool,
    pub region_default: String,
    pub id_kraj_default: String,
    pub nip_default: String,
}

impl Default for SpecialState {
    fn default() -> Self {
        Self {
            id_kls_generated: false,
            region_default: "-".to_string(),
            id_kraj_default: "PL".to_string(),
            nip_default: String::new(),
        }
    }
}

impl SpecialState {
    /// The configured default for a default-bearing field.
    pub fn default_for(&self, field: &str) -> Option<&str> {
        match field {
            "REGION" => Some(&self.region_default),
            "ID_KRAJ" => Some(&self.id_kraj_default),
            "NIP" => Some(&self.nip_default),
            _ => None,
        }
    }

    /// True when the field is flagged as generated by the downstream
    /// system and must be left out of the transform.
    pub fn is_generated(&self, field: &str) -> bool {
        field == "ID_KLS" && self.id_kls_generated
    }

    /// True when a non-empty default satisfies the field without a
    /// column mapping.
    pub fn has_usable_default(&self, field: &str) -> bool {
        self.default_for(field).is_some_and(|value| !value.is_empty())
    }
}
