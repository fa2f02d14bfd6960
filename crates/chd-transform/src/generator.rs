//! Stylesheet generation.
//!
//! The generator is a pure function of the field catalog, the mapping
//! state and a [`GeneratorContext`]; the caller supplies the timestamp,
//! so two runs over the same inputs produce identical text.

use chd_map::{MappingState, ValidationToggles};
use chd_model::FIELD_CATALOG;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::doc::{Element, Node, render_document};
use crate::rules::{FieldRule, TEN_ZEROS, rule_for};

pub const GENERATOR_SIGNATURE: &str = "ChainsDirectory PRO V.0.5";

const NS_META: &str = "http://anicasystem.com.pl/XMLSchema/meta";
const NS_HDR: &str = "http://assecobs.com/extensions/header";
const NS_EXPR: &str = "http://assecobs.com/extensions/expression";
const NS_XS: &str = "http://www.w3.org/2001/XMLSchema";

/// Everything the stylesheet needs beyond the mapping itself.
#[derive(Debug, Clone)]
pub struct GeneratorContext {
    /// Source workbook name, echoed into the preamble.
    pub source_file: String,
    /// Worksheet the transform reads from.
    pub sheet_name: String,
    /// 1-based first data row; the header row sits right above it.
    pub start_row: u32,
    /// Header labels for the layout signature.
    pub headers: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl GeneratorContext {
    /// 1-based row the header guard reads and the data loop starts
    /// after. Zero when data begins on the first row, in which case
    /// there is no header row at all.
    fn header_row(&self) -> u32 {
        self.start_row.saturating_sub(1)
    }

    /// A header signature can only be checked when a header row exists
    /// and carries labels.
    fn has_header_row(&self) -> bool {
        self.header_row() >= 1 && !self.headers.is_empty()
    }
}

/// Render the complete transform document.
pub fn generate_stylesheet(
    state: &MappingState,
    toggles: ValidationToggles,
    ctx: &GeneratorContext,
) -> String {
    debug!(
        sheet = %ctx.sheet_name,
        start_row = ctx.start_row,
        worksheet_guard = toggles.worksheet_name,
        header_guard = toggles.headers,
        "generating transform"
    );

    let header_row = ctx.header_row();
    let timestamp = ctx.generated_at.format("%Y-%m-%d %H:%M:%S");

    let mapping = main_mapping(state, ctx, header_row);
    let otherwise_body = if toggles.headers && ctx.has_header_row() {
        header_guard(ctx, mapping)
    } else {
        mapping
    };

    let template = Element::new("xsl:template").attr("match", "/").child(
        Element::new("xsl:choose")
            .child(Node::Comment(" Walidacja nazwy arkusza ".to_string()))
            .child(worksheet_guard(ctx))
            .child(Element::new("xsl:otherwise").children(otherwise_body)),
    );

    let root = Element::new("xsl:stylesheet")
        .attr("version", "2.0")
        .attr("xmlns:xsl", "http://www.w3.org/1999/XSL/Transform")
        .attr("xmlns:meta", NS_META)
        .attr("xmlns:hdr", NS_HDR)
        .attr("xmlns:expr", NS_EXPR)
        .attr("xmlns:xs", NS_XS)
        .child(Node::Comment(format!("Wygenerowano przez: {GENERATOR_SIGNATURE}")))
        .child(Node::Comment(format!("Źródło danych: {}", ctx.source_file)))
        .child(Node::Comment(format!("Data generowania: {timestamp}")))
        .child(Element::new("xsl:param").attr("name", "message"))
        .child(
            Element::new("xsl:variable")
                .attr("name", "worksheetNameCheck")
                .attr("as", "xs:boolean")
                .attr(
                    "select",
                    if toggles.worksheet_name { "true()" } else { "false()" },
                ),
        )
        .child(
            Element::new("xsl:variable").attr("name", "row1").attr(
                "select",
                format!("/document/message/worksheet[1]/row[@id = {header_row}]"),
            ),
        )
        .child(template);

    render_document(&root)
}

/// The branch rejecting messages whose expected worksheet is absent.
/// Always compiled in; the `worksheetNameCheck` variable arms it.
fn worksheet_guard(ctx: &GeneratorContext) -> Element {
    Element::new("xsl:when")
        .attr(
            "test",
            format!(
                "$worksheetNameCheck and not(/document/message/worksheet[@name='{}'])",
                ctx.sheet_name
            ),
        )
        .child(header_set("'int-usun', '1'"))
        .child(header_set(
            "'errorMessage', 'Komunikat nie został zaimportowany z powodu błędnej nazwy arkusza.'",
        ))
        .child(debug_marker("debug_worksheetName_err"))
}

/// Header-layout guard wrapping the main mapping. The expected
/// signature is compiled in; the observed one is concatenated from the
/// header row at runtime.
fn header_guard(ctx: &GeneratorContext, mapping: Vec<Node>) -> Vec<Node> {
    let expected: Vec<String> = ctx
        .headers
        .iter()
        .enumerate()
        .map(|(index, label)| format!("komórka [1:{}] = {label}", index + 1))
        .collect();

    let observed: Vec<String> = (1..=ctx.headers.len())
        .map(|cell| {
            format!("', komórka [1:{cell}] = ',($row1/cell[@id = '{cell}']/text() || '')")
        })
        .collect();

    let error_message = Element::new("xsl:variable")
        .attr("name", "errorMessage")
        .child(literal_value("Układ raportu jest inny niż skonfigurowany."))
        .child(crlf())
        .child(literal_value("jest:"))
        .child(crlf())
        .child(
            Element::new("xsl:value-of").attr("select", "substring-after($wartosci,', ')"),
        )
        .child(crlf())
        .child(literal_value("powinno być:"))
        .child(crlf())
        .child(Element::new("xsl:value-of").attr("select", "$wartosciOK"));

    vec![
        Node::Comment(" Walidacja nagłówków ".to_string()),
        Element::new("xsl:variable")
            .attr("name", "wartosciOK")
            .attr("select", format!("'{}'", expected.join(", ")))
            .into(),
        Element::new("xsl:variable")
            .attr("name", "wartosci")
            .child(
                Element::new("xsl:value-of")
                    .attr("select", format!("concat({})", observed.join(", "))),
            )
            .into(),
        Element::new("xsl:choose")
            .child(
                Element::new("xsl:when")
                    .attr("test", "substring-after($wartosci,', ') != $wartosciOK")
                    .child(error_message)
                    .child(header_set("'int-usun', '1'"))
                    .child(header_set("'errorMessage', string($errorMessage)"))
                    .child(debug_marker("debug_headers_err")),
            )
            .child(Element::new("xsl:otherwise").children(mapping))
            .into(),
    ]
}

/// The per-row mapping loop.
fn main_mapping(state: &MappingState, ctx: &GeneratorContext, header_row: u32) -> Vec<Node> {
    let mut record = Element::new("xsl:element").attr("name", "meta:kls");
    for field in FIELD_CATALOG {
        if let Some(node) = field_node(state, field.name) {
            record = record.child(node);
        }
    }

    let loop_select = format!(
        "document/message/worksheet[@name='{}']/row[@id > {header_row} and string-length(cell[@id = '1']) > 0]",
        ctx.sheet_name
    );

    vec![
        Node::Comment(" Dane - główne mapowanie ".to_string()),
        Element::new("xsl:element")
            .attr("name", "meta:document")
            .child(
                Element::new("xsl:element").attr("name", "meta:message").child(
                    Element::new("xsl:for-each")
                        .attr("select", loop_select)
                        .child(record),
                ),
            )
            .into(),
    ]
}

/// The stylesheet fragment for one field, or `None` when the field is
/// left out (skipped, or unmapped without a usable default).
fn field_node(state: &MappingState, field: &str) -> Option<Node> {
    let rule = rule_for(field, &state.special);
    if rule == FieldRule::Skip {
        return None;
    }
    let column = state.column_for(field);
    if column.is_none() && !state.special.has_usable_default(field) {
        return None;
    }

    let node = match (rule, column) {
        (FieldRule::DefaultOr, Some(column)) => {
            let default = state.special.default_for(field).unwrap_or_default();
            choose_attribute(
                field,
                Element::new("xsl:when")
                    .attr("test", format!("string-length(cell[@id = '{column}']) > 0"))
                    .child(cell_value(column)),
                literal_value(default),
            )
        }
        (FieldRule::DigitNormalize, Some(column)) => digit_attribute(state, column),
        (FieldRule::DigitNormalize, None) | (FieldRule::DefaultOr, None) => {
            let default = state.special.default_for(field).unwrap_or_default();
            Element::new("xsl:attribute")
                .attr("name", field)
                .attr("select", format!("'{default}'"))
        }
        (FieldRule::PostalCode, Some(column)) => choose_attribute(
            field,
            Element::new("xsl:when")
                .attr("test", format!("cell[@id = '{column}'] castable as xs:decimal"))
                .child(
                    Element::new("xsl:value-of").attr(
                        "select",
                        format!("format-number(cell[@id = '{column}'], '00000')"),
                    ),
                ),
            Element::new("xsl:value-of")
                .attr("select", format!("replace(cell[@id = '{column}'], '-', '')")),
        ),
        (FieldRule::StreetSentinel, Some(column)) => choose_attribute(
            field,
            Element::new("xsl:when")
                .attr("test", format!("cell[@id = '{column}'] != ''"))
                .child(cell_value(column)),
            literal_value("BRAK"),
        ),
        (FieldRule::Conditional, Some(column)) => Element::new("xsl:if")
            .attr("test", format!("string-length(cell[@id = '{column}']) != 0"))
            .child(
                Element::new("xsl:attribute")
                    .attr("name", field)
                    .attr("select", format!("cell[@id = '{column}']")),
            ),
        (FieldRule::Verbatim, Some(column)) => Element::new("xsl:attribute")
            .attr("name", field)
            .attr("select", format!("cell[@id = '{column}']")),
        // Skipped and unmapped-without-default cases were filtered above.
        _ => return None,
    };
    Some(node.into())
}

/// Tax-number attribute: empty-cell fallback, then scientific-notation
/// and digit cleanup in XPath.
fn digit_attribute(state: &MappingState, column: u32) -> Element {
    let fallback = if state.special.nip_default.is_empty() {
        TEN_ZEROS
    } else {
        &state.special.nip_default
    };
    Element::new("xsl:attribute").attr("name", "NIP").child(
        Element::new("xsl:choose")
            .child(Node::Comment(" Sprawdza czy pole jest puste ".to_string()))
            .child(
                Element::new("xsl:when")
                    .attr("test", format!("string-length(cell[@id = '{column}']) = 0"))
                    .child(literal_value(fallback)),
            )
            .child(Node::Comment(" Główna logika przetwarzania ".to_string()))
            .child(
                Element::new("xsl:otherwise")
                    .child(
                        Element::new("xsl:variable")
                            .attr("name", "rawNip")
                            .attr("select", format!("cell[@id = '{column}']")),
                    )
                    .child(
                        Element::new("xsl:variable")
                            .attr("name", "cleanNip")
                            .attr("select", "normalize-space(replace($rawNip, '[^0-9]', ''))"),
                    )
                    .child(
                        Element::new("xsl:choose")
                            .child(Node::Comment(
                                " Obsługa wartości z notacją naukową ".to_string(),
                            ))
                            .child(
                                Element::new("xsl:when")
                                    .attr("test", "contains($rawNip, 'E')")
                                    .child(
                                        Element::new("xsl:value-of")
                                            .attr("select", "format-number($rawNip, '0')"),
                                    ),
                            )
                            .child(Node::Comment(
                                " Obsługa wartości numerycznych ".to_string(),
                            ))
                            .child(
                                Element::new("xsl:when")
                                    .attr("test", "$cleanNip castable as xs:decimal")
                                    .child(Element::new("xsl:value-of").attr(
                                        "select",
                                        "format-number(number($cleanNip), '0')",
                                    )),
                            )
                            .child(Node::Comment(
                                " Obsługa wartości nieliczbowych po oczyszczeniu ".to_string(),
                            ))
                            .child(
                                Element::new("xsl:otherwise").child(
                                    Element::new("xsl:value-of").attr("select", "$cleanNip"),
                                ),
                            ),
                    ),
            ),
    )
}

fn choose_attribute(field: &str, when: Element, otherwise_child: Element) -> Element {
    Element::new("xsl:attribute").attr("name", field).child(
        Element::new("xsl:choose")
            .child(when)
            .child(Element::new("xsl:otherwise").child(otherwise_child)),
    )
}

fn cell_value(column: u32) -> Element {
    Element::new("xsl:value-of").attr("select", format!("cell[@id = '{column}']"))
}

fn literal_value(literal: &str) -> Element {
    Element::new("xsl:value-of").attr("select", format!("'{literal}'"))
}

fn crlf() -> Element {
    Element::new("xsl:value-of").attr("select", "'\r\n'")
}

fn header_set(args: &str) -> Element {
    Element::new("xsl:value-of").attr("select", format!("hdr:set($message, {args})"))
}

fn debug_marker(name: &str) -> Element {
    Element::new("xsl:element").attr("name", "document").child(
        Element::new("xsl:element")
            .attr("name", "message")
            .child(Element::new("xsl:attribute").attr("name", name)),
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn context() -> GeneratorContext {
        GeneratorContext {
            source_file: "sklepy.xlsx".to_string(),
            sheet_name: "Sklepy".to_string(),
            start_row: 2,
            headers: vec!["Nazwa".to_string(), "Kod".to_string(), "Miasto".to_string()],
            generated_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
        }
    }

    fn mapped_state() -> MappingState {
        let mut state = MappingState::default();
        for (index, name) in ["ID_KLS", "NAZWA", "KOD", "MIASTO", "ULICA", "NIP", "TELEFON"]
            .iter()
            .enumerate()
        {
            state.assign(name, Some(index as u32 + 1)).unwrap();
        }
        state
    }

    #[test]
    fn generation_is_deterministic() {
        let state = mapped_state();
        let first = generate_stylesheet(&state, ValidationToggles::default(), &context());
        let second = generate_stylesheet(&state, ValidationToggles::default(), &context());
        assert_eq!(first, second);
    }

    #[test]
    fn preamble_carries_signature_source_and_timestamp() {
        let text =
            generate_stylesheet(&mapped_state(), ValidationToggles::default(), &context());
        assert!(text.contains("<!--Wygenerowano przez: ChainsDirectory PRO V.0.5-->"));
        assert!(text.contains("<!--Źródło danych: sklepy.xlsx-->"));
        assert!(text.contains("<!--Data generowania: 2025-03-14 09:30:00-->"));
    }

    #[test]
    fn row_references_use_the_header_row() {
        let text =
            generate_stylesheet(&mapped_state(), ValidationToggles::default(), &context());
        // start_row 2 puts the header at row 1.
        assert!(text.contains("row[@id = 1]"));
        assert!(text.contains("row[@id &gt; 1 and string-length(cell[@id = '1']) &gt; 0]"));
    }

    #[test]
    fn start_row_one_keeps_the_first_data_row_in_the_loop() {
        let mut ctx = context();
        ctx.start_row = 1;
        ctx.headers = vec!["Kolumna 1".to_string(), "Kolumna 2".to_string()];
        let text = generate_stylesheet(&mapped_state(), ValidationToggles::default(), &ctx);
        // No header row above the data, so the loop covers row 1.
        assert!(text.contains("row[@id &gt; 0 and string-length(cell[@id = '1']) &gt; 0]"));
        assert!(!text.contains("row[@id &gt; 1"));
    }

    #[test]
    fn start_row_one_never_arms_the_header_guard() {
        let mut ctx = context();
        ctx.start_row = 1;
        ctx.headers = vec!["Kolumna 1".to_string(), "Kolumna 2".to_string()];
        let text = generate_stylesheet(&mapped_state(), ValidationToggles::default(), &ctx);
        assert!(!text.contains("wartosciOK"));
        assert!(!text.contains("debug_headers_err"));
        assert!(text.contains("meta:kls"));
    }

    #[test]
    fn empty_header_labels_skip_the_header_guard() {
        let mut ctx = context();
        ctx.headers.clear();
        let text = generate_stylesheet(&mapped_state(), ValidationToggles::default(), &ctx);
        // A zero-argument concat() would be invalid XPath.
        assert!(!text.contains("concat()"));
        assert!(!text.contains("wartosciOK"));
        assert!(text.contains("meta:kls"));
    }

    #[test]
    fn worksheet_guard_is_armed_by_the_toggle() {
        let toggles = ValidationToggles {
            worksheet_name: true,
            headers: true,
        };
        let armed = generate_stylesheet(&mapped_state(), toggles, &context());
        assert!(armed.contains("name=\"worksheetNameCheck\" as=\"xs:boolean\" select=\"true()\""));

        let disarmed =
            generate_stylesheet(&mapped_state(), ValidationToggles::default(), &context());
        assert!(
            disarmed.contains("name=\"worksheetNameCheck\" as=\"xs:boolean\" select=\"false()\"")
        );
        // The branch itself is always present.
        assert!(disarmed.contains("debug_worksheetName_err"));
    }

    #[test]
    fn header_guard_compiles_the_expected_signature() {
        let text =
            generate_stylesheet(&mapped_state(), ValidationToggles::default(), &context());
        assert!(text.contains(
            "'komórka [1:1] = Nazwa, komórka [1:2] = Kod, komórka [1:3] = Miasto'"
        ));
        assert!(text.contains("($row1/cell[@id = '2']/text() || '')"));
        assert!(text.contains("Układ raportu jest inny niż skonfigurowany."));
        assert!(text.contains("substring-after($wartosci,', ')"));
    }

    #[test]
    fn header_guard_can_be_disabled() {
        let toggles = ValidationToggles {
            worksheet_name: false,
            headers: false,
        };
        let text = generate_stylesheet(&mapped_state(), toggles, &context());
        assert!(!text.contains("wartosciOK"));
        assert!(!text.contains("debug_headers_err"));
        assert!(text.contains("meta:kls"));
    }

    #[test]
    fn generated_identifier_is_left_out() {
        let mut state = mapped_state();
        state.special.id_kls_generated = true;
        let text = generate_stylesheet(&state, ValidationToggles::default(), &context());
        assert!(!text.contains("name=\"ID_KLS\""));
    }

    #[test]
    fn unmapped_defaults_are_emitted_directly() {
        let text =
            generate_stylesheet(&mapped_state(), ValidationToggles::default(), &context());
        assert!(text.contains("<xsl:attribute name=\"REGION\" select=\"'-'\" />"));
        assert!(text.contains("<xsl:attribute name=\"ID_KRAJ\" select=\"'PL'\" />"));
    }

    #[test]
    fn conditional_field_is_wrapped_in_an_if() {
        let text =
            generate_stylesheet(&mapped_state(), ValidationToggles::default(), &context());
        assert!(text.contains("<xsl:if test=\"string-length(cell[@id = '7']) != 0\">"));
    }

    #[test]
    fn tax_number_branch_covers_scientific_notation() {
        let text =
            generate_stylesheet(&mapped_state(), ValidationToggles::default(), &context());
        assert!(text.contains("contains($rawNip, 'E')"));
        assert!(text.contains("format-number(number($cleanNip), '0')"));
        assert!(text.contains("'0000000000'"));
    }
}
