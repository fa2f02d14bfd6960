//! Workbook ingestion: XLSX/CSV loading and sheet snapshot derivation.

pub mod csv_ingest;
pub mod error;
pub mod sheet;
pub mod xlsx;

use std::path::Path;

use tracing::debug;

pub use error::{IngestError, Result};
pub use sheet::{SheetSnapshot, Workbook};

/// Read a workbook file, dispatching on the file extension.
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    debug!(path = %path.display(), %extension, "reading workbook");
    match extension.as_str() {
        "xlsx" | "xlsm" => xlsx::read_xlsx(path),
        "csv" => csv_ingest::read_csv(path),
        other => Err(IngestError::UnsupportedFormat(other.to_string())),
    }
}

/// Snapshot one sheet of a workbook at the given start row.
pub fn snapshot_sheet(workbook: &Workbook, sheet: &str, start_row: u32) -> Result<SheetSnapshot> {
    let rows = workbook
        .sheet(sheet)
        .ok_or_else(|| IngestError::SheetNotFound(sheet.to_string()))?;
    Ok(SheetSnapshot::new(sheet, rows.to_vec(), start_row))
}
