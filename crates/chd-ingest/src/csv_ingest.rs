//! CSV ingestion: a CSV file becomes a single-sheet workbook named
//! after the file stem.

use std::fs::File;
use std::path::Path;

use crate::error::Result;
use crate::sheet::Workbook;

pub fn read_csv(path: &Path) -> Result<Workbook> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let sheet_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Arkusz1".to_string());
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Workbook::new(file_name, vec![(sheet_name, rows)]))
}
