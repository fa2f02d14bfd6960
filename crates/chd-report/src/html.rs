//! HTML documentation renderers.
//!
//! Two flavours: the full standalone document with styling, and a bare
//! table variant that pastes cleanly into word processors.

use std::fmt::Write;

use chd_model::FieldDescriptor;

use crate::common::ReportMeta;

const STYLE: &str = r#"      body {
        font-family: Arial, sans-serif;
        line-height: 1.6;
        color: #333;
        max-width: 1200px;
        margin: 0 auto;
        padding: 20px;
      }
      h1, h2, h3 {
        color: #2c3e50;
      }
      .header {
        margin-bottom: 30px;
        border-bottom: 1px solid #eee;
        padding-bottom: 20px;
      }
      table {
        width: 100%;
        border-collapse: collapse;
        margin: 20px 0;
        font-size: 14px;
      }
      th, td {
        border: 1px solid #ddd;
        padding: 12px;
        text-align: left;
      }
      th {
        background-color: #f2f2f2;
        font-weight: bold;
      }
      .required {
        color: #e74c3c;
        font-weight: bold;
      }
      tr:nth-child(even) {
        background-color: #f9f9f9;
      }
      .metadata {
        margin-bottom: 20px;
        background: #f8f9fa;
        padding: 15px;
        border-radius: 5px;
        border: 1px solid #e9ecef;
      }
      .field-name {
        font-weight: bold;
      }"#;

/// The complete, styled documentation page.
pub fn render_full_html(fields: &[FieldDescriptor], meta: &ReportMeta) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"pl\">\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str("  <title>Dokumentacja Schematu XSD</title>\n");
    let _ = writeln!(html, "  <style>\n{STYLE}\n  </style>");
    html.push_str("</head>\n<body>\n");
    html.push_str("  <div class=\"header\">\n    <h1>Dokumentacja Schematu XSD</h1>\n");
    html.push_str("    <div class=\"metadata\">\n");
    let _ = writeln!(
        html,
        "      <p><strong>Plik źródłowy:</strong> {}</p>",
        escape(&meta.source_file)
    );
    let _ = writeln!(
        html,
        "      <p><strong>Data wygenerowania:</strong> {}</p>",
        meta.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(html, "      <p><strong>Liczba pól:</strong> {}</p>", fields.len());
    if let Some(supplement) = &meta.supplement {
        let _ = writeln!(
            html,
            "      <p><strong>Dokumentacja pomocnicza:</strong> {}</p>",
            escape(supplement)
        );
    }
    html.push_str("    </div>\n  </div>\n\n  <h2>Tabela pól</h2>\n");
    html.push_str("  <table>\n    <thead>\n      <tr>\n");
    html.push_str("        <th>Nazwa pola</th>\n        <th>Opis</th>\n");
    html.push_str("        <th>Typ danych</th>\n        <th>Wymagane</th>\n");
    html.push_str("      </tr>\n    </thead>\n    <tbody>\n");
    for field in fields {
        html.push_str("      <tr>\n");
        let _ = writeln!(
            html,
            "        <td class=\"field-name\">{}</td>",
            escape(&field.name)
        );
        let _ = writeln!(html, "        <td>{}</td>", cell(&field.description));
        let _ = writeln!(html, "        <td>{}</td>", cell(&field.field_type));
        let required = if field.required {
            "<span class=\"required\">Tak</span>"
        } else {
            "Nie"
        };
        let _ = writeln!(html, "        <td>{required}</td>");
        html.push_str("      </tr>\n");
    }
    html.push_str("    </tbody>\n  </table>\n</body>\n</html>\n");
    html
}

/// Inline-styled table for pasting into Word.
pub fn render_word_html(fields: &[FieldDescriptor], meta: &ReportMeta) -> String {
    let mut html = String::new();
    html.push_str("<html>\n<body>\n  <h1>Dokumentacja Schematu XSD</h1>\n");
    let _ = writeln!(
        html,
        "  <p><strong>Plik źródłowy:</strong> {}</p>",
        escape(&meta.source_file)
    );
    let _ = writeln!(
        html,
        "  <p><strong>Data wygenerowania:</strong> {}</p>",
        meta.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(html, "  <p><strong>Liczba pól:</strong> {}</p>", fields.len());
    if let Some(supplement) = &meta.supplement {
        let _ = writeln!(
            html,
            "  <p><strong>Dokumentacja pomocnicza:</strong> {}</p>",
            escape(supplement)
        );
    }
    html.push_str("\n  <h2>Tabela pól</h2>\n");
    html.push_str(
        "  <table border=\"1\" style=\"border-collapse: collapse; width: 100%;\">\n",
    );
    html.push_str("    <tr style=\"background-color: #f2f2f2;\">\n");
    for header in ["Nazwa pola", "Opis", "Typ danych", "Wymagane"] {
        let _ = writeln!(
            html,
            "      <th style=\"padding: 8px; text-align: left;\">{header}</th>"
        );
    }
    html.push_str("    </tr>\n");
    for field in fields {
        html.push_str("    <tr>\n");
        let _ = writeln!(
            html,
            "      <td style=\"padding: 8px;\"><strong>{}</strong></td>",
            escape(&field.name)
        );
        let _ = writeln!(
            html,
            "      <td style=\"padding: 8px;\">{}</td>",
            cell(&field.description)
        );
        let _ = writeln!(
            html,
            "      <td style=\"padding: 8px;\">{}</td>",
            cell(&field.field_type)
        );
        let required = if field.required {
            "<span style=\"color: red; font-weight: bold;\">Tak</span>"
        } else {
            "Nie"
        };
        let _ = writeln!(html, "      <td style=\"padding: 8px;\">{required}</td>");
        html.push_str("    </tr>\n");
    }
    html.push_str("  </table>\n</body>\n</html>\n");
    html
}

/// Empty cells render as a dash.
fn cell(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        escape(value)
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
