//! Preview of mapped output rows.
//!
//! Runs the field rules directly on the sheet grid, producing the
//! records the generated transform would emit. Rows with an empty
//! first cell are skipped, the same filter the stylesheet's row loop
//! applies.

use chd_ingest::SheetSnapshot;
use chd_map::MappingState;
use chd_model::FIELD_CATALOG;

use crate::rules::apply;

/// One emitted attribute of a previewed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewValue {
    pub field: &'static str,
    pub value: String,
}

/// Fields of one output record, in catalog order.
pub type PreviewRecord = Vec<PreviewValue>;

/// Map up to `limit` data rows through the field rules.
pub fn preview_records(
    snapshot: &SheetSnapshot,
    state: &MappingState,
    limit: usize,
) -> Vec<PreviewRecord> {
    snapshot
        .data_rows()
        .iter()
        .filter(|row| row.first().is_some_and(|cell| !cell.is_empty()))
        .take(limit)
        .map(|row| map_row(row, state))
        .collect()
}

fn map_row(row: &[String], state: &MappingState) -> PreviewRecord {
    FIELD_CATALOG
        .iter()
        .filter_map(|field| {
            let raw = state
                .column_for(field.name)
                .map(|column| cell(row, column));
            apply(field.name, raw, &state.special).map(|value| PreviewValue {
                field: field.name,
                value,
            })
        })
        .collect()
}

/// 1-based column lookup; missing cells read as empty, like the
/// stylesheet's `cell[@id]` selector on short rows.
fn cell(row: &[String], column: u32) -> &str {
    row.get(column as usize - 1).map_or("", String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SheetSnapshot {
        let rows = vec![
            vec!["Nazwa".into(), "Kod".into(), "Ulica".into(), "Telefon".into()],
            vec!["Sklep A".into(), "5000".into(), "".into(), "600100200".into()],
            vec!["".into(), "x".into(), "y".into(), "z".into()],
            vec!["Sklep B".into(), "12-345".into(), "Polna 3".into(), "".into()],
        ];
        SheetSnapshot::new("Sklepy", rows, 2)
    }

    fn state() -> MappingState {
        let mut state = MappingState::default();
        state.assign("NAZWA", Some(1)).unwrap();
        state.assign("KOD", Some(2)).unwrap();
        state.assign("ULICA", Some(3)).unwrap();
        state.assign("TELEFON", Some(4)).unwrap();
        state
    }

    fn value<'a>(record: &'a PreviewRecord, field: &str) -> Option<&'a str> {
        record
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.value.as_str())
    }

    #[test]
    fn rows_with_empty_first_cell_are_skipped() {
        let records = preview_records(&snapshot(), &state(), 10);
        assert_eq!(records.len(), 2);
        assert_eq!(value(&records[0], "NAZWA"), Some("Sklep A"));
        assert_eq!(value(&records[1], "NAZWA"), Some("Sklep B"));
    }

    #[test]
    fn field_rules_shape_previewed_values() {
        let records = preview_records(&snapshot(), &state(), 10);
        assert_eq!(value(&records[0], "KOD"), Some("05000"));
        assert_eq!(value(&records[1], "KOD"), Some("12345"));
        assert_eq!(value(&records[0], "ULICA"), Some("BRAK"));
        assert_eq!(value(&records[1], "ULICA"), Some("Polna 3"));
        // Conditional field omitted when empty.
        assert_eq!(value(&records[0], "TELEFON"), Some("600100200"));
        assert_eq!(value(&records[1], "TELEFON"), None);
        // Unmapped defaults still show up.
        assert_eq!(value(&records[0], "REGION"), Some("-"));
        assert_eq!(value(&records[0], "ID_KRAJ"), Some("PL"));
    }

    #[test]
    fn limit_caps_the_record_count() {
        let records = preview_records(&snapshot(), &state(), 1);
        assert_eq!(records.len(), 1);
    }
}
