use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use comfy_table::Table;
use tracing::{info, warn};

use chd_ingest::{Workbook, read_workbook, snapshot_sheet};
use chd_map::MappingPlan;
use chd_model::{FIELD_CATALOG, SpecialBehavior};
use chd_report::{
    ReportMeta, documentation_file_name, render_full_html, render_word_html, render_xlsx,
    sort_descriptors, transform_file_name,
};
use chd_schema::{DocMap, introspect_schema};
use chd_transform::{GeneratorContext, generate_stylesheet, preview_records};

use crate::cli::{DocFormatArg, DocumentArgs, GenerateArgs, PreviewArgs};
use crate::table::{apply_table_style, header_cell};

pub fn run_generate(args: &GenerateArgs) -> Result<PathBuf> {
    let order = args.order.trim();
    if order.is_empty() {
        bail!("order number must not be empty");
    }

    let plan = MappingPlan::load(&args.mapping)?;
    let workbook = read_workbook(&args.workbook)
        .with_context(|| format!("read workbook {}", args.workbook.display()))?;
    let (sheet, snapshot) = load_snapshot(&workbook, &plan)?;
    let state = plan.to_state();

    state.ensure_required()?;
    for (column, fields) in state.duplicate_columns() {
        warn!(column, fields = %fields.join(", "), "column mapped to multiple fields");
    }

    let ctx = GeneratorContext {
        source_file: workbook.file_name.clone(),
        sheet_name: sheet,
        start_row: snapshot.start_row(),
        headers: snapshot.headers().to_vec(),
        generated_at: Utc::now(),
    };
    let stylesheet = generate_stylesheet(&state, plan.validation, &ctx);

    let output_dir = output_dir(args.output_dir.as_deref(), &args.workbook);
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;
    let path = output_dir.join(transform_file_name(order));
    fs::write(&path, stylesheet)
        .with_context(|| format!("write transform {}", path.display()))?;
    info!(path = %path.display(), "transform written");
    Ok(path)
}

pub fn run_preview(args: &PreviewArgs) -> Result<()> {
    let plan = MappingPlan::load(&args.mapping)?;
    let workbook = read_workbook(&args.workbook)
        .with_context(|| format!("read workbook {}", args.workbook.display()))?;
    let (sheet, snapshot) = load_snapshot(&workbook, &plan)?;
    let state = plan.to_state();

    println!("Sheet: {sheet} (data from row {})", snapshot.start_row());
    println!("Headers: {}", snapshot.headers().join(", "));

    let records = preview_records(&snapshot, &state, args.rows);
    if records.is_empty() {
        println!("No data rows to preview.");
        return Ok(());
    }

    // Columns: catalog fields that show up in at least one record.
    let columns: Vec<&str> = FIELD_CATALOG
        .iter()
        .map(|field| field.name)
        .filter(|name| {
            records
                .iter()
                .any(|record| record.iter().any(|entry| entry.field == *name))
        })
        .collect();

    let mut table = Table::new();
    table.set_header(columns.iter().map(|name| header_cell(name)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for record in &records {
        let row: Vec<String> = columns
            .iter()
            .map(|name| {
                record
                    .iter()
                    .find(|entry| entry.field == *name)
                    .map(|entry| entry.value.clone())
                    .unwrap_or_else(|| "-".to_string())
            })
            .collect();
        table.add_row(row);
    }
    println!("{table}");
    Ok(())
}

pub fn run_document(args: &DocumentArgs) -> Result<Vec<PathBuf>> {
    let xsd = fs::read_to_string(&args.schema)
        .with_context(|| format!("read schema {}", args.schema.display()))?;

    let mut supplement = None;
    let doc_map = match &args.doc {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("read documentation {}", path.display()))?;
            supplement = Some(file_name(path));
            let map = DocMap::parse(&content);
            info!(entries = map.len(), "loaded supplementary documentation");
            map
        }
        None => DocMap::default(),
    };

    let mut fields = introspect_schema(&xsd, &doc_map)
        .with_context(|| format!("introspect schema {}", args.schema.display()))?;
    if fields.is_empty() {
        println!(
            "No attribute definitions found in the schema. \
             Check that the file declares attributes."
        );
        return Ok(Vec::new());
    }
    sort_descriptors(&mut fields);

    let meta = ReportMeta {
        source_file: file_name(&args.schema),
        generated_at: Utc::now(),
        supplement,
    };
    let output_dir = output_dir(args.output_dir.as_deref(), &args.schema);
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;

    let mut written = Vec::new();
    if matches!(args.format, DocFormatArg::Xlsx | DocFormatArg::Both) {
        let bytes = render_xlsx(&fields).context("render XLSX documentation")?;
        let path = output_dir.join(documentation_file_name(&meta, "xlsx"));
        fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }
    if matches!(args.format, DocFormatArg::Html | DocFormatArg::Both) {
        let html = render_full_html(&fields, &meta);
        let path = output_dir.join(documentation_file_name(&meta, "html"));
        fs::write(&path, html).with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }
    if matches!(args.format, DocFormatArg::Word) {
        let html = render_word_html(&fields, &meta);
        let path = output_dir.join(documentation_file_name(&meta, "html"));
        fs::write(&path, html).with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for field in &fields {
        table.add_row(vec![
            field.name.clone(),
            or_dash(&field.field_type),
            if field.required { "yes" } else { "no" }.to_string(),
            or_dash(&field.description),
        ]);
    }
    println!("{table}");
    Ok(written)
}

pub fn run_fields() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Description"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Special"),
    ]);
    apply_table_style(&mut table);
    for field in FIELD_CATALOG {
        let special = match field.special {
            SpecialBehavior::None => "-".to_string(),
            SpecialBehavior::GeneratedElsewhere => "may be generated downstream".to_string(),
            SpecialBehavior::HasDefault(default) => format!("default: {default}"),
        };
        table.add_row(vec![
            field.name.to_string(),
            field.description.to_string(),
            field.declared_type.to_string(),
            if field.required { "yes" } else { "no" }.to_string(),
            special,
        ]);
    }
    println!("{table}");
    Ok(())
}

fn load_snapshot(
    workbook: &Workbook,
    plan: &MappingPlan,
) -> Result<(String, chd_ingest::SheetSnapshot)> {
    let sheet = match &plan.sheet {
        Some(name) => name.clone(),
        None => workbook
            .first_sheet()
            .map(|(name, _)| name.to_string())
            .context("workbook has no sheets")?,
    };
    let snapshot = snapshot_sheet(workbook, &sheet, plan.start_row)?;
    Ok((sheet, snapshot))
}

fn output_dir(requested: Option<&Path>, input: &Path) -> PathBuf {
    match requested {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chd_map::MappingState;

    use super::*;

    fn write_plan(dir: &Path) -> PathBuf {
        let path = dir.join("mapping.toml");
        fs::write(
            &path,
            "\
start_row = 2

[columns]
ID_KLS = 1
NAZWA = 2
KOD = 3
MIASTO = 4
ULICA = 5
NIP = 6
DATA_OD = 7
",
        )
        .unwrap();
        path
    }

    fn write_csv(dir: &Path) -> PathBuf {
        let path = dir.join("sklepy.csv");
        fs::write(
            &path,
            "Id,Nazwa,Kod,Miasto,Ulica,Nip,Od\n\
             1,Sklep A,5000,Krakow,Polna 3,123-456-789,2025-01-01\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn generate_writes_the_transform_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = GenerateArgs {
            workbook: write_csv(dir.path()),
            mapping: write_plan(dir.path()),
            order: "77".to_string(),
            output_dir: None,
        };
        let path = run_generate(&args).unwrap();
        assert_eq!(path.file_name().unwrap(), "zlecenie_77.xml");
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("<xsl:stylesheet"));
        assert!(text.contains("Wygenerowano przez: ChainsDirectory PRO V.0.5"));
    }

    #[test]
    fn generate_rejects_an_empty_order() {
        let dir = tempfile::tempdir().unwrap();
        let args = GenerateArgs {
            workbook: write_csv(dir.path()),
            mapping: write_plan(dir.path()),
            order: "  ".to_string(),
            output_dir: None,
        };
        let error = run_generate(&args).unwrap_err();
        assert!(error.to_string().contains("order number"));
    }

    #[test]
    fn generate_refuses_unsatisfied_required_fields() {
        let dir = tempfile::tempdir().unwrap();
        let plan = dir.path().join("incomplete.toml");
        fs::write(&plan, "[columns]\nNAZWA = 1\n").unwrap();
        let args = GenerateArgs {
            workbook: write_csv(dir.path()),
            mapping: plan,
            order: "1".to_string(),
            output_dir: None,
        };
        let error = run_generate(&args).unwrap_err();
        assert!(error.to_string().contains("Required fields not satisfied"));
        // Nothing was written.
        assert!(!dir.path().join("zlecenie_1.xml").exists());
    }

    #[test]
    fn document_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("zamowienie.xsd");
        fs::write(
            &schema,
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:attribute name="NAZWA" type="xs:string" use="required"/>
</xs:schema>"#,
        )
        .unwrap();
        let args = DocumentArgs {
            schema,
            doc: None,
            format: DocFormatArg::Both,
            output_dir: None,
        };
        let written = run_document(&args).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].to_string_lossy().ends_with(".xlsx"));
        assert!(written[1].to_string_lossy().ends_with(".html"));
    }

    #[test]
    fn document_with_no_attributes_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("pusty.xsd");
        fs::write(
            &schema,
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="pusty" type="xs:string"/>
</xs:schema>"#,
        )
        .unwrap();
        let args = DocumentArgs {
            schema,
            doc: None,
            format: DocFormatArg::Both,
            output_dir: None,
        };
        assert!(run_document(&args).unwrap().is_empty());
    }

    #[test]
    fn state_round_trips_through_the_plan() {
        let dir = tempfile::tempdir().unwrap();
        let plan = MappingPlan::load(&write_plan(dir.path())).unwrap();
        let state: MappingState = plan.to_state();
        assert!(state.all_required_satisfied());
    }
}
