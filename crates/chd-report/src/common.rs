//! Shared report plumbing: sort order, metadata, output file names.

use chd_model::FieldDescriptor;
use chrono::{DateTime, Utc};

/// Header block shown above the field table.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    /// Name of the introspected schema file.
    pub source_file: String,
    pub generated_at: DateTime<Utc>,
    /// Name of the supplementary documentation file, when one was used.
    pub supplement: Option<String>,
}

/// Sort for presentation: required fields first, then case-insensitive
/// by name.
pub fn sort_descriptors(fields: &mut [FieldDescriptor]) {
    fields.sort_by(|a, b| {
        b.required
            .cmp(&a.required)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

/// `dokumentacja_<base>_<ISO date>.<ext>`, base being the source file
/// name without its extension.
pub fn documentation_file_name(meta: &ReportMeta, extension: &str) -> String {
    let base = meta
        .source_file
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(&meta.source_file);
    format!(
        "dokumentacja_{base}_{}.{extension}",
        meta.generated_at.format("%Y-%m-%d")
    )
}

/// `zlecenie_<order>.xml`.
pub fn transform_file_name(order: &str) -> String {
    format!("zlecenie_{order}.xml")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn descriptor(name: &str, required: bool) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            description: String::new(),
            field_type: "CHR".to_string(),
            required,
            restrictions: String::new(),
        }
    }

    #[test]
    fn required_fields_sort_first_then_names() {
        let mut fields = vec![
            descriptor("ulica", false),
            descriptor("NAZWA", true),
            descriptor("Email", false),
            descriptor("KOD", true),
        ];
        sort_descriptors(&mut fields);
        let names: Vec<&str> = fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(names, vec!["KOD", "NAZWA", "Email", "ulica"]);
    }

    #[test]
    fn output_names_follow_the_convention() {
        let meta = ReportMeta {
            source_file: "zamowienie.xsd".to_string(),
            generated_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
            supplement: None,
        };
        assert_eq!(
            documentation_file_name(&meta, "html"),
            "dokumentacja_zamowienie_2025-03-14.html"
        );
        assert_eq!(
            documentation_file_name(&meta, "xlsx"),
            "dokumentacja_zamowienie_2025-03-14.xlsx"
        );
        assert_eq!(transform_file_name("1024"), "zlecenie_1024.xml");
    }
}
