//! Per-field value rules.
//!
//! The same rules exist twice by design: the generator compiles them
//! into XPath inside the stylesheet, and [`apply`] evaluates them
//! directly on in-memory rows for the preview. Both sides must agree,
//! which is what the tests here pin down.

use chd_map::SpecialState;

/// Fields emitted only when the source cell is non-empty.
pub const CONDITIONAL_FIELDS: &[&str] = &[
    "DATA_OD",
    "DATA_DO",
    "POWIERZCHNIA",
    "LICZBA_KAS",
    "TELEFON",
    "EMAIL",
    "KATEGORIA",
    "TYP_SKLEPU",
    "KLASYFIKACJA",
    "REGAL_CHLODNICZY",
    "LADA_MIESNA",
];

/// How a field's value is produced from its source cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Left out of the output entirely.
    Skip,
    /// Cell value, falling back to the configured default when empty.
    DefaultOr,
    /// Tax-number cleanup: digits only, scientific notation expanded,
    /// ten zeros when nothing usable remains.
    DigitNormalize,
    /// Postal code: zero-padded to five digits when numeric, hyphens
    /// stripped otherwise.
    PostalCode,
    /// Street, with the `BRAK` sentinel for empty cells.
    StreetSentinel,
    /// Emitted only when the cell is non-empty.
    Conditional,
    Verbatim,
}

pub fn rule_for(field: &str, special: &SpecialState) -> FieldRule {
    if special.is_generated(field) {
        return FieldRule::Skip;
    }
    match field {
        "REGION" | "ID_KRAJ" => FieldRule::DefaultOr,
        "NIP" => FieldRule::DigitNormalize,
        "KOD" => FieldRule::PostalCode,
        "ULICA" => FieldRule::StreetSentinel,
        _ if CONDITIONAL_FIELDS.contains(&field) => FieldRule::Conditional,
        _ => FieldRule::Verbatim,
    }
}

/// Evaluate a field rule on a raw cell value. `raw` is `None` when the
/// field has no column mapping; `None` out means the field is omitted
/// from the record.
pub fn apply(field: &str, raw: Option<&str>, special: &SpecialState) -> Option<String> {
    match rule_for(field, special) {
        FieldRule::Skip => None,
        FieldRule::DefaultOr => {
            let default = special.default_for(field).unwrap_or_default();
            match raw {
                Some(value) if !value.is_empty() => Some(value.to_string()),
                Some(_) => Some(default.to_string()),
                None if !default.is_empty() => Some(default.to_string()),
                None => None,
            }
        }
        FieldRule::DigitNormalize => match raw {
            Some(value) => Some(normalize_digits(value, &special.nip_default)),
            None if !special.nip_default.is_empty() => Some(special.nip_default.clone()),
            None => None,
        },
        FieldRule::PostalCode => raw.map(normalize_postal),
        FieldRule::StreetSentinel => raw.map(|value| {
            if value.is_empty() {
                "BRAK".to_string()
            } else {
                value.to_string()
            }
        }),
        FieldRule::Conditional => match raw {
            Some(value) if !value.is_empty() => Some(value.to_string()),
            _ => None,
        },
        FieldRule::Verbatim => raw.map(ToString::to_string),
    }
}

/// The fallback emitted when a tax number is empty and no default is
/// configured.
pub const TEN_ZEROS: &str = "0000000000";

fn normalize_digits(raw: &str, default: &str) -> String {
    if raw.is_empty() {
        return if default.is_empty() {
            TEN_ZEROS.to_string()
        } else {
            default.to_string()
        };
    }
    if raw.contains('E') {
        if let Ok(number) = raw.trim().parse::<f64>() {
            return format!("{number:.0}");
        }
    }
    let clean: String = raw.chars().filter(char::is_ascii_digit).collect();
    if is_decimal(&clean) {
        if let Ok(number) = clean.parse::<f64>() {
            return format!("{number:.0}");
        }
    }
    clean
}

fn normalize_postal(raw: &str) -> String {
    if is_decimal(raw.trim()) {
        if let Ok(number) = raw.trim().parse::<f64>() {
            return format!("{number:05.0}");
        }
    }
    raw.replace('-', "")
}

/// Roughly `castable as xs:decimal`: a plain decimal number with no
/// exponent.
fn is_decimal(value: &str) -> bool {
    !value.is_empty()
        && !value.contains(['e', 'E'])
        && value.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn special() -> SpecialState {
        SpecialState::default()
    }

    #[test]
    fn tax_number_strips_punctuation() {
        assert_eq!(
            apply("NIP", Some("123-456-789"), &special()),
            Some("123456789".to_string())
        );
    }

    #[test]
    fn tax_number_expands_scientific_notation() {
        assert_eq!(
            apply("NIP", Some("1.2E+9"), &special()),
            Some("1200000000".to_string())
        );
    }

    #[test]
    fn empty_tax_number_falls_back_to_ten_zeros() {
        assert_eq!(apply("NIP", Some(""), &special()), Some(TEN_ZEROS.to_string()));
        let mut with_default = special();
        with_default.nip_default = "9999999999".to_string();
        assert_eq!(
            apply("NIP", Some(""), &with_default),
            Some("9999999999".to_string())
        );
    }

    #[test]
    fn unmapped_tax_number_uses_default_or_vanishes() {
        assert_eq!(apply("NIP", None, &special()), None);
        let mut with_default = special();
        with_default.nip_default = "1234567890".to_string();
        assert_eq!(
            apply("NIP", None, &with_default),
            Some("1234567890".to_string())
        );
    }

    #[test]
    fn postal_code_pads_numeric_values() {
        assert_eq!(apply("KOD", Some("5000"), &special()), Some("05000".to_string()));
    }

    #[test]
    fn postal_code_strips_hyphens_from_text() {
        assert_eq!(apply("KOD", Some("12-345"), &special()), Some("12345".to_string()));
    }

    #[test]
    fn empty_street_becomes_sentinel() {
        assert_eq!(apply("ULICA", Some(""), &special()), Some("BRAK".to_string()));
        assert_eq!(
            apply("ULICA", Some("Polna 3"), &special()),
            Some("Polna 3".to_string())
        );
    }

    #[test]
    fn region_and_country_fall_back_to_defaults() {
        assert_eq!(apply("REGION", Some(""), &special()), Some("-".to_string()));
        assert_eq!(apply("ID_KRAJ", Some(""), &special()), Some("PL".to_string()));
        assert_eq!(apply("REGION", None, &special()), Some("-".to_string()));
        assert_eq!(
            apply("REGION", Some("Mazowsze"), &special()),
            Some("Mazowsze".to_string())
        );
    }

    #[test]
    fn conditional_fields_vanish_when_empty() {
        assert_eq!(apply("TELEFON", Some(""), &special()), None);
        assert_eq!(
            apply("TELEFON", Some("600100200"), &special()),
            Some("600100200".to_string())
        );
    }

    #[test]
    fn generated_identifier_is_skipped() {
        let mut state = special();
        state.id_kls_generated = true;
        assert_eq!(apply("ID_KLS", Some("42"), &state), None);
        assert_eq!(
            apply("ID_KLS", Some("42"), &special()),
            Some("42".to_string())
        );
    }
}
