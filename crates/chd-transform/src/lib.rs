//! Transform generation: compiles a column mapping into an XSLT 2.0
//! stylesheet and previews the records that stylesheet would emit.

pub mod doc;
pub mod generator;
pub mod preview;
pub mod rules;

pub use generator::{GENERATOR_SIGNATURE, GeneratorContext, generate_stylesheet};
pub use preview::{PreviewRecord, PreviewValue, preview_records};
pub use rules::{CONDITIONAL_FIELDS, FieldRule, apply, rule_for};
