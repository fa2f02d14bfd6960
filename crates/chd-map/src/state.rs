//! Mapping state for the interactive mapping workflow.

use std::collections::BTreeMap;

use chd_model::{FIELD_CATALOG, FieldDefinition, find_field};
use tracing::warn;

use crate::error::MappingError;
use crate::special::SpecialState;

/// Current field-to-column assignments plus special-field overrides.
///
/// Columns are 1-based source indexes. A column follows the last field
/// it was assigned to; assignments loaded in bulk from a plan may
/// still carry duplicates, which are reported but never rejected.
#[derive(Debug, Clone, Default)]
pub struct MappingState {
    columns: BTreeMap<String, u32>,
    pub special: SpecialState,
}

impl MappingState {
    pub fn new(special: SpecialState) -> Self {
        Self {
            columns: BTreeMap::new(),
            special,
        }
    }

    /// Assign a column to a field, or clear the field with `None`.
    ///
    /// The column is released from any other field holding it, so an
    /// interactive reassignment moves the column rather than silently
    /// duplicating it.
    pub fn assign(&mut self, field: &str, column: Option<u32>) -> Result<(), MappingError> {
        if find_field(field).is_none() {
            return Err(MappingError::UnknownField(field.to_string()));
        }
        match column {
            Some(column) if column > 0 => {
                self.columns.retain(|_, assigned| *assigned != column);
                self.columns.insert(field.to_string(), column);
            }
            _ => {
                self.columns.remove(field);
            }
        }
        Ok(())
    }

    /// Insert an assignment without releasing the column elsewhere.
    /// Used for bulk plan loading, where duplicates are tolerated.
    pub fn insert_unchecked(&mut self, field: &str, column: u32) {
        if column > 0 {
            self.columns.insert(field.to_string(), column);
        }
    }

    /// The 1-based column mapped to a field, if any.
    pub fn column_for(&self, field: &str) -> Option<u32> {
        self.columns.get(field).copied()
    }

    /// Whether a field counts as satisfied under the current state.
    pub fn is_satisfied(&self, field: &FieldDefinition) -> bool {
        if self.special.is_generated(field.name) {
            return true;
        }
        if self.column_for(field.name).is_some() {
            return true;
        }
        field.has_default() && self.special.has_usable_default(field.name)
    }

    /// Catalog-required fields that are not currently satisfied.
    ///
    /// A generated-elsewhere override removes its field from the
    /// required set entirely.
    pub fn missing_required(&self) -> Vec<&'static str> {
        FIELD_CATALOG
            .iter()
            .filter(|field| field.required && !self.special.is_generated(field.name))
            .filter(|field| !self.is_satisfied(field))
            .map(|field| field.name)
            .collect()
    }

    pub fn all_required_satisfied(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Error when any required field lacks a mapping, default or
    /// override; generation must not proceed in that case.
    pub fn ensure_required(&self) -> Result<(), MappingError> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MappingError::RequiredUnsatisfied(
                missing.iter().map(ToString::to_string).collect(),
            ))
        }
    }

    /// Columns assigned to more than one field, with the fields holding
    /// them, in catalog order.
    pub fn duplicate_columns(&self) -> Vec<(u32, Vec<&str>)> {
        let mut by_column: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
        for field in FIELD_CATALOG {
            if let Some(column) = self.column_for(field.name) {
                by_column.entry(column).or_default().push(field.name);
            }
        }
        by_column
            .into_iter()
            .filter(|(_, fields)| fields.len() > 1)
            .collect()
    }

    /// Fields with an assignment, in catalog order.
    pub fn mapped_fields(&self) -> Vec<(&'static FieldDefinition, u32)> {
        FIELD_CATALOG
            .iter()
            .filter_map(|field| self.column_for(field.name).map(|column| (field, column)))
            .collect()
    }

    /// Drop assignments for fields the catalog does not know, warning
    /// about each. Stale plan entries end up here.
    pub fn prune_unknown(columns: &BTreeMap<String, u32>) -> BTreeMap<String, u32> {
        let mut pruned = BTreeMap::new();
        for (field, column) in columns {
            if find_field(field).is_some() {
                pruned.insert(field.clone(), *column);
            } else {
                warn!(field = %field, "ignoring mapping for unknown field");
            }
        }
        pruned
    }
}
