//! The fixed catalog of target fields for the store directory feed.
//!
//! Field order matters: the generated transform emits attributes in
//! catalog order, and the mapping UI walks the catalog top to bottom.

use std::fmt;

/// Per-field override mode that changes whether a mapping is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialBehavior {
    /// Plain field: satisfied only by a column mapping.
    None,
    /// Value is produced by the downstream system; mapping is skipped
    /// entirely while the override is active.
    GeneratedElsewhere,
    /// Field carries a configurable default used when the source cell
    /// is empty or no column is mapped at all.
    HasDefault(&'static str),
}

/// One entry of the static field catalog.
#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub declared_type: &'static str,
    pub required: bool,
    pub special: SpecialBehavior,
}

impl FieldDefinition {
    /// True for fields with a configurable default value.
    pub fn has_default(&self) -> bool {
        matches!(self.special, SpecialBehavior::HasDefault(_))
    }
}

impl fmt::Display for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.declared_type)
    }
}

/// The store directory field catalog, in emission order.
pub const FIELD_CATALOG: &[FieldDefinition] = &[
    FieldDefinition {
        name: "ID_KLS",
        description: "Unikalny identyfikator klienta (punktu sieci) wg notacji obowiązującej w sieci.",
        declared_type: "CHR(50)",
        required: true,
        special: SpecialBehavior::GeneratedElsewhere,
    },
    FieldDefinition {
        name: "REGION",
        description: "Nazwa regionalnej grupy sklepów w ramach sieci.",
        declared_type: "CHR(100)",
        required: true,
        special: SpecialBehavior::HasDefault("-"),
    },
    FieldDefinition {
        name: "NAZWA",
        description: "Nazwa długa sklepu wg sieci",
        declared_type: "CHR(100)",
        required: true,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "SKROT",
        description: "Skrócona/dodatkowa nazwa sklepu",
        declared_type: "CHR(100)",
        required: false,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "ID_KRAJ",
        description: "Dwuliterowy kod państwa alfa-2 zgodny ze standardem ISO-3166-1, np.: PL - Polska, FR - Francja, DE - Niemcy",
        declared_type: "CHR(2)",
        required: true,
        special: SpecialBehavior::HasDefault("PL"),
    },
    FieldDefinition {
        name: "NIP",
        description: "NIP sklepu – dla Polski 10 znaków bez kresek.",
        declared_type: "CHR(30)",
        required: true,
        special: SpecialBehavior::HasDefault(""),
    },
    FieldDefinition {
        name: "KOD",
        description: "Kod pocztowy lokalizacji sklepu. Kod pocztowy w postaci ciągu 5 znaków bez kreski.",
        declared_type: "CHR(10)",
        required: true,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "MIASTO",
        description: "Miasto adresu sklepu.",
        declared_type: "CHR(100)",
        required: true,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "ULICA",
        description: "Ulica adresu sklepu (i opcjonalnie również numer lokalu).",
        declared_type: "CHR(100)",
        required: true,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "NR_LOK",
        description: "Numer lokalu z adresu sklepu.",
        declared_type: "CHR(10)",
        required: false,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "DATA_OD",
        description: "Data przyjęcia sklepu do sieci.",
        declared_type: "DT, RRRR-MM-DD",
        required: true,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "DATA_DO",
        description: "Data wyjścia sklepu z sieci",
        declared_type: "DT, RRRR-MM-DD",
        required: false,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "POWIERZCHNIA",
        description: "Powierzchnia sprzedaży sklepu",
        declared_type: "INT",
        required: false,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "LICZBA_KAS",
        description: "Ilość kas w sklepie",
        declared_type: "INT",
        required: false,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "TELEFON",
        description: "Nr telefonu kontaktowego do sklepu",
        declared_type: "CHR(50)",
        required: false,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "EMAIL",
        description: "Adres email do kontaktu ze sklepem",
        declared_type: "CHR(100)",
        required: false,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "KATEGORIA",
        description: "Nazwa kategorii sklepu wg sieci",
        declared_type: "CHR(200)",
        required: false,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "TYP_SKLEPU",
        description: "Nazwa typu sklepu wg sieci",
        declared_type: "CHR(200)",
        required: false,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "KLASYFIKACJA",
        description: "Klasyfikacja sklepu wg sieci, np. województwo.",
        declared_type: "CHR(200)",
        required: false,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "REGAL_CHLODNICZY",
        description: "Czy występuje regał chłodniczy (TAK/NIE)",
        declared_type: "CHR(10)",
        required: false,
        special: SpecialBehavior::None,
    },
    FieldDefinition {
        name: "LADA_MIESNA",
        description: "Czy występuje lada mięsno-wędliniarska (TAK/NIE)",
        declared_type: "CHR(10)",
        required: false,
        special: SpecialBehavior::None,
    },
];

/// Look up a catalog entry by name.
pub fn find_field(name: &str) -> Option<&'static FieldDefinition> {
    FIELD_CATALOG.iter().find(|field| field.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_unique_names_in_order() {
        let mut seen = std::collections::HashSet::new();
        for field in FIELD_CATALOG {
            assert!(seen.insert(field.name), "duplicate field {}", field.name);
        }
        assert_eq!(FIELD_CATALOG.len(), 21);
        assert_eq!(FIELD_CATALOG[0].name, "ID_KLS");
        assert_eq!(FIELD_CATALOG[20].name, "LADA_MIESNA");
    }

    #[test]
    fn special_fields_match_catalog_contract() {
        assert_eq!(
            find_field("ID_KLS").unwrap().special,
            SpecialBehavior::GeneratedElsewhere
        );
        assert_eq!(
            find_field("REGION").unwrap().special,
            SpecialBehavior::HasDefault("-")
        );
        assert_eq!(
            find_field("ID_KRAJ").unwrap().special,
            SpecialBehavior::HasDefault("PL")
        );
        assert_eq!(
            find_field("NIP").unwrap().special,
            SpecialBehavior::HasDefault("")
        );
        assert!(find_field("NAZWA").unwrap().required);
        assert!(!find_field("SKROT").unwrap().required);
    }
}
