//! Documentation rendering for introspected schemas: a styled HTML
//! page, a Word-friendly table and an XLSX workbook, plus the shared
//! sort order and output naming.

pub mod common;
pub mod html;
pub mod xlsx;

pub use common::{ReportMeta, documentation_file_name, sort_descriptors, transform_file_name};
pub use html::{render_full_html, render_word_html};
pub use xlsx::render_xlsx;
