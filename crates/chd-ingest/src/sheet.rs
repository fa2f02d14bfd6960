//! Sheet snapshots: the grid of cell values plus the derived header row
//! and data rows for a configured start row.

/// A parsed workbook: ordered sheets with dense 2D string grids.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub file_name: String,
    sheets: Vec<(String, Vec<Vec<String>>)>,
}

impl Workbook {
    pub fn new(file_name: impl Into<String>, sheets: Vec<(String, Vec<Vec<String>>)>) -> Self {
        Self {
            file_name: file_name.into(),
            sheets,
        }
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&[Vec<String>]> {
        self.sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .map(|(_, rows)| rows.as_slice())
    }

    /// First sheet, if any.
    pub fn first_sheet(&self) -> Option<(&str, &[Vec<String>])> {
        self.sheets
            .first()
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }
}

/// One selected sheet with the start-row derived views.
///
/// `start_row` is the 1-based index of the first data row. The header
/// row is the row immediately preceding it; when that is out of range,
/// generic `Kolumna N` labels are synthesized. Headers and data rows
/// are always recomputed together so they can never disagree about the
/// start row.
#[derive(Debug, Clone)]
pub struct SheetSnapshot {
    pub sheet_name: String,
    start_row: u32,
    rows: Vec<Vec<String>>,
    headers: Vec<String>,
    data_start: usize,
}

impl SheetSnapshot {
    pub fn new(sheet_name: impl Into<String>, rows: Vec<Vec<String>>, start_row: u32) -> Self {
        let mut snapshot = Self {
            sheet_name: sheet_name.into(),
            start_row: 0,
            rows,
            headers: Vec::new(),
            data_start: 0,
        };
        snapshot.set_start_row(start_row);
        snapshot
    }

    /// 1-based index of the first data row.
    pub fn start_row(&self) -> u32 {
        self.start_row
    }

    /// Change the start row, recomputing headers and data rows together.
    pub fn set_start_row(&mut self, start_row: u32) {
        let start_row = start_row.max(1);
        self.start_row = start_row;
        self.data_start = (start_row as usize).saturating_sub(1).min(self.rows.len());
        self.headers = self.derive_headers();
    }

    fn derive_headers(&self) -> Vec<String> {
        // Header row sits immediately above the first data row.
        if self.start_row >= 2 {
            let header_idx = self.start_row as usize - 2;
            if let Some(row) = self.rows.get(header_idx) {
                return row.clone();
            }
        }
        let width = self.rows.first().map(Vec::len).unwrap_or(0);
        (1..=width).map(|idx| format!("Kolumna {idx}")).collect()
    }

    /// Labels of the header row.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All rows from the start row onward.
    pub fn data_rows(&self) -> &[Vec<String>] {
        &self.rows[self.data_start..]
    }

    /// The full unfiltered grid.
    pub fn all_rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Vec<String>> {
        vec![
            vec!["Nazwa".into(), "Miasto".into()],
            vec!["Sklep A".into(), "Kraków".into()],
            vec!["Sklep B".into(), "Poznań".into()],
        ]
    }

    #[test]
    fn headers_come_from_row_above_start() {
        let snapshot = SheetSnapshot::new("Arkusz1", grid(), 2);
        assert_eq!(snapshot.headers(), &["Nazwa", "Miasto"]);
        assert_eq!(snapshot.data_rows().len(), 2);
        assert_eq!(snapshot.data_rows()[0][0], "Sklep A");
    }

    #[test]
    fn start_row_one_synthesizes_headers() {
        let snapshot = SheetSnapshot::new("Arkusz1", grid(), 1);
        assert_eq!(snapshot.headers(), &["Kolumna 1", "Kolumna 2"]);
        assert_eq!(snapshot.data_rows().len(), 3);
    }

    #[test]
    fn changing_start_row_recomputes_both_views() {
        let mut snapshot = SheetSnapshot::new("Arkusz1", grid(), 2);
        snapshot.set_start_row(3);
        assert_eq!(snapshot.headers(), &["Sklep A", "Kraków"]);
        assert_eq!(snapshot.data_rows().len(), 1);
        assert_eq!(snapshot.data_rows()[0][0], "Sklep B");
    }

    #[test]
    fn start_row_past_end_yields_no_data() {
        let snapshot = SheetSnapshot::new("Arkusz1", grid(), 9);
        assert!(snapshot.data_rows().is_empty());
    }
}
