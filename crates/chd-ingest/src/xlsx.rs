//! Minimal XLSX reader.
//!
//! Reads workbook structure, shared strings and cell values straight
//! from the zip container. Everything is surfaced as strings; the
//! mapping workflow never needs typed cells, dates or styles.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{IngestError, Result};
use crate::sheet::Workbook;

/// Read an XLSX workbook into sheet grids.
pub fn read_xlsx(path: &Path) -> Result<Workbook> {
    let file = File::open(path)?;
    let mut zip = ZipArchive::new(file)?;

    let rels = read_entry(&mut zip, "xl/_rels/workbook.xml.rels")?
        .ok_or_else(|| IngestError::MissingEntry("xl/_rels/workbook.xml.rels".into()))?;
    let rels = parse_relationships(&rels)?;

    let workbook_xml = read_entry(&mut zip, "xl/workbook.xml")?
        .ok_or_else(|| IngestError::MissingEntry("xl/workbook.xml".into()))?;
    let sheet_entries = parse_workbook(&workbook_xml, &rels)?;

    let shared = match read_entry(&mut zip, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let mut sheets = Vec::with_capacity(sheet_entries.len());
    for (name, entry) in sheet_entries {
        let xml = read_entry(&mut zip, &entry)?
            .ok_or_else(|| IngestError::MissingEntry(entry.clone()))?;
        let grid = parse_sheet(&xml, &shared)?;
        sheets.push((name, grid));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Workbook::new(file_name, sheets))
}

fn read_entry<R: Read + std::io::Seek>(
    zip: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>> {
    match zip.by_name(name) {
        Ok(mut entry) => {
            let mut content = String::new();
            entry.read_to_string(&mut content)?;
            Ok(Some(content))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

fn xml_reader(xml: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let config = reader.config_mut();
    config.check_comments = false;
    config.expand_empty_elements = true;
    config.trim_text(false);
    reader
}

fn attr(event: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    Ok(event
        .try_get_attribute(name)?
        .map(|attribute| attribute.unescape_value())
        .transpose()?
        .map(Cow::into_owned))
}

/// Map relationship ids to normalized zip entry paths.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = xml_reader(xml);
    let mut rels = HashMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(event) if event.local_name().as_ref() == b"Relationship" => {
                let id = attr(&event, "Id")?;
                let target = attr(&event, "Target")?;
                if let Some((id, target)) = id.zip(target) {
                    rels.insert(id, normalize_target(&target));
                }
            }
            Event::Eof => break,
            _ => (),
        }
    }
    Ok(rels)
}

fn normalize_target(target: &str) -> String {
    let trimmed = target.trim_start_matches('/');
    if trimmed.starts_with("xl/") {
        trimmed.to_string()
    } else {
        format!("xl/{trimmed}")
    }
}

/// Worksheet (name, zip path) pairs in workbook order.
fn parse_workbook(xml: &str, rels: &HashMap<String, String>) -> Result<Vec<(String, String)>> {
    let mut reader = xml_reader(xml);
    let mut sheets = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(event) if event.local_name().as_ref() == b"sheet" => {
                let name = attr(&event, "name")?;
                let id = attr(&event, "r:id")?;
                if let Some((name, id)) = name.zip(id) {
                    if let Some(path) = rels.get(&id) {
                        sheets.push((name, path.clone()));
                    }
                }
            }
            Event::Eof => break,
            _ => (),
        }
    }
    Ok(sheets)
}

fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let mut reader = xml_reader(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_item = false;
    let mut in_text = false;
    let mut in_phonetic = false;
    loop {
        match reader.read_event()? {
            Event::Start(event) => match event.local_name().as_ref() {
                b"si" => {
                    in_item = true;
                    current.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_item && !in_phonetic => in_text = true,
                _ => (),
            },
            Event::End(event) => match event.local_name().as_ref() {
                b"si" => {
                    in_item = false;
                    strings.push(std::mem::take(&mut current));
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => (),
            },
            Event::Text(event) if in_text => current.push_str(&event.xml_content()?),
            Event::GeneralRef(event) if in_text => {
                push_general_ref(&mut current, &event.xml_content()?)?;
            }
            Event::Eof => break,
            _ => (),
        }
    }
    Ok(strings)
}

/// Parse one worksheet into a dense, possibly ragged grid.
fn parse_sheet(xml: &str, shared: &[String]) -> Result<Vec<Vec<String>>> {
    let mut reader = xml_reader(xml);
    let mut grid: Vec<Vec<String>> = Vec::new();

    let mut rows_seen = 0usize;
    let mut cols_seen = 0usize;
    let mut cell = (0usize, 0usize);
    let mut cell_type = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut in_inline_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(event) => match event.local_name().as_ref() {
                b"row" => cols_seen = 0,
                b"c" => {
                    cell = attr(&event, "r")?
                        .as_deref()
                        .and_then(reference_to_index)
                        .unwrap_or((rows_seen, cols_seen));
                    cols_seen += 1;
                    cell_type = attr(&event, "t")?.unwrap_or_default();
                    value.clear();
                }
                b"v" => in_value = true,
                b"t" => in_inline_text = true,
                _ => (),
            },
            Event::End(event) => match event.local_name().as_ref() {
                b"row" => rows_seen += 1,
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                b"c" => {
                    let resolved = if cell_type == "s" {
                        value
                            .trim()
                            .parse::<usize>()
                            .ok()
                            .and_then(|idx| shared.get(idx))
                            .cloned()
                            .unwrap_or_default()
                    } else {
                        std::mem::take(&mut value)
                    };
                    if !resolved.is_empty() {
                        set_cell(&mut grid, cell.0, cell.1, resolved);
                    }
                    value.clear();
                }
                _ => (),
            },
            Event::Text(event) if in_value || in_inline_text => {
                value.push_str(&event.xml_content()?);
            }
            Event::GeneralRef(event) if in_value || in_inline_text => {
                push_general_ref(&mut value, &event.xml_content()?)?;
            }
            Event::Eof => break,
            _ => (),
        }
    }
    Ok(grid)
}

fn set_cell(grid: &mut Vec<Vec<String>>, row: usize, col: usize, value: String) {
    if grid.len() <= row {
        grid.resize_with(row + 1, Vec::new);
    }
    let cells = &mut grid[row];
    if cells.len() <= col {
        cells.resize_with(col + 1, String::new);
    }
    cells[col] = value;
}

/// Convert an `A1`-style reference to zero-based (row, col).
fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let mut col = 0usize;
    let mut row = 0usize;
    let mut saw_letter = false;
    let mut saw_digit = false;
    for ch in reference.chars() {
        if ch.is_ascii_alphabetic() && !saw_digit {
            col = col * 26 + (ch.to_ascii_uppercase() as usize - 'A' as usize + 1);
            saw_letter = true;
        } else if ch.is_ascii_digit() {
            row = row * 10 + (ch as usize - '0' as usize);
            saw_digit = true;
        } else {
            return None;
        }
    }
    if saw_letter && saw_digit && row > 0 {
        Some((row - 1, col - 1))
    } else {
        None
    }
}

/// Resolve `&amp;`-style general references and numeric character refs.
fn push_general_ref(target: &mut String, raw: &str) -> Result<()> {
    if let Some(number) = raw.strip_prefix('#') {
        let code = if let Some(hex) = number.strip_prefix('x') {
            u32::from_str_radix(hex, 16)
        } else {
            number.parse::<u32>()
        };
        if let Ok(code) = code {
            if let Some(character) = char::from_u32(code) {
                target.push(character);
                return Ok(());
            }
        }
        return Err(IngestError::BadCharRef(raw.to_string()));
    }
    match resolve_xml_entity(raw) {
        Some(entity) => {
            target.push_str(entity);
            Ok(())
        }
        None => Err(IngestError::BadCharRef(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    #[test]
    fn reference_parsing() {
        assert_eq!(reference_to_index("A1"), Some((0, 0)));
        assert_eq!(reference_to_index("B3"), Some((2, 1)));
        assert_eq!(reference_to_index("AA10"), Some((9, 26)));
        assert_eq!(reference_to_index("10"), None);
    }

    fn build_fixture() -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer
            .start_file("xl/_rels/workbook.xml.rels", options)
            .unwrap();
        writer
            .write_all(
                br#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="t" Target="worksheets/sheet1.xml"/>
</Relationships>"#,
            )
            .unwrap();
        writer.start_file("xl/workbook.xml", options).unwrap();
        writer
            .write_all(
                br#"<?xml version="1.0"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="Sklepy" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
            )
            .unwrap();
        writer.start_file("xl/sharedStrings.xml", options).unwrap();
        writer
            .write_all(
                br#"<?xml version="1.0"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="2" uniqueCount="2">
  <si><t>Nazwa</t></si>
  <si><t>Sklep A</t></si>
</sst>"#,
            )
            .unwrap();
        writer
            .start_file("xl/worksheets/sheet1.xml", options)
            .unwrap();
        writer
            .write_all(
                br#"<?xml version="1.0"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>Miasto</t></is></c></row>
    <row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2"><v>5000</v></c></row>
  </sheetData>
</worksheet>"#,
            )
            .unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn reads_workbook_from_zip_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sklepy.xlsx");
        std::fs::write(&path, build_fixture()).unwrap();

        let workbook = read_xlsx(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Sklepy"]);
        let rows = workbook.sheet("Sklepy").unwrap();
        assert_eq!(rows[0][0], "Nazwa");
        assert_eq!(rows[0][1], "Miasto");
        assert_eq!(rows[1][0], "Sklep A");
        assert_eq!(rows[1][1], "5000");
    }
}
