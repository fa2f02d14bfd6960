//! Attribute discovery and type normalization over a parsed schema.

use std::sync::LazyLock;

use chd_model::FieldDescriptor;
use regex::Regex;
use tracing::debug;

use crate::docmap::DocMap;
use crate::error::{Result, SchemaError};
use crate::tree::{NodeId, XmlTree};

static TOTAL_DIGITS_RAW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<xs:totalDigits\s+value=["'](\d+)["']"#).unwrap());
static FRACTION_DIGITS_RAW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<xs:fractionDigits\s+value=["'](\d+)["']"#).unwrap());
static MAX_LENGTH_SUMMARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Max length: (\d+)").unwrap());

/// Extract field descriptors from schema text.
///
/// Finding no attribute declarations is not an error; the caller
/// decides how to present an empty result.
pub fn introspect_schema(xsd: &str, doc_map: &DocMap) -> Result<Vec<FieldDescriptor>> {
    let tree = XmlTree::parse(xsd)?;
    let root = tree
        .root()
        .ok_or_else(|| SchemaError::NotASchema(String::new()))?;
    if tree.node(root).local != "schema" {
        return Err(SchemaError::NotASchema(tree.node(root).qname.clone()));
    }

    let attributes = discover_attributes(&tree);
    debug!(count = attributes.len(), "discovered attribute declarations");

    let mut fields = Vec::with_capacity(attributes.len());
    for id in attributes {
        let node = tree.node(id);
        let Some(name) = node.attr("name") else {
            continue;
        };
        let required = node.attr("use").unwrap_or("optional") == "required";

        let mut type_info = node.attr("type").unwrap_or_default().to_string();
        let restrictions = inline_restrictions(&tree, id, &mut type_info);
        let field_type = normalize_type(&tree, xsd, id, name, &type_info, &restrictions);

        let description = annotation_text(&tree, id)
            .or_else(|| doc_map.get(name).map(ToString::to_string))
            .unwrap_or_default();

        fields.push(FieldDescriptor {
            name: name.to_string(),
            description,
            field_type,
            required,
            restrictions,
        });
    }
    Ok(fields)
}

/// Attribute declarations, located with three strategies in priority
/// order; the first one that finds anything wins.
fn discover_attributes(tree: &XmlTree) -> Vec<NodeId> {
    // Resolved-namespace lookup.
    let found: Vec<NodeId> = tree
        .all_nodes()
        .filter(|&id| {
            let node = tree.node(id);
            node.in_xs_namespace() && node.local == "attribute"
        })
        .collect();
    if !found.is_empty() {
        return found;
    }

    // Qualified tag names, for documents with unbound prefixes.
    let found: Vec<NodeId> = tree
        .all_nodes()
        .filter(|&id| {
            matches!(tree.node(id).qname.as_str(), "xs:attribute" | "xsd:attribute")
        })
        .collect();
    if !found.is_empty() {
        return found;
    }

    // Last resort: search inside complexType subtrees.
    tree.all_nodes()
        .filter(|&id| {
            let node = tree.node(id);
            node.in_xs_namespace() && node.local == "complexType"
        })
        .flat_map(|id| {
            tree.descendants(id)
                .into_iter()
                .filter(|&child| {
                    let node = tree.node(child);
                    node.in_xs_namespace() && node.local == "attribute"
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn is_schema_element(tree: &XmlTree, id: NodeId, local: &str) -> bool {
    let node = tree.node(id);
    node.local == local
        && (node.in_xs_namespace()
            || node.qname == format!("xs:{local}")
            || node.qname == format!("xsd:{local}"))
}

/// Facets of an inline `simpleType/restriction`, summarized in the
/// `Max length: N, Min length: N, Pattern: p` form. A restriction base
/// overrides the declared type.
fn inline_restrictions(tree: &XmlTree, attribute: NodeId, type_info: &mut String) -> String {
    let Some(simple_type) = tree
        .children(attribute)
        .iter()
        .copied()
        .find(|&child| is_schema_element(tree, child, "simpleType"))
    else {
        return String::new();
    };
    let Some(restriction) = tree
        .children(simple_type)
        .iter()
        .copied()
        .find(|&child| is_schema_element(tree, child, "restriction"))
    else {
        return String::new();
    };

    if let Some(base) = tree.node(restriction).attr("base") {
        if !base.is_empty() {
            *type_info = base.to_string();
        }
    }

    let mut max_length = None;
    let mut min_length = None;
    let mut pattern = None;
    for &facet in tree.children(restriction) {
        let value = tree.node(facet).attr("value");
        if is_schema_element(tree, facet, "maxLength") {
            max_length = value;
        } else if is_schema_element(tree, facet, "minLength") {
            min_length = value;
        } else if is_schema_element(tree, facet, "pattern") {
            pattern = value;
        }
    }

    let mut summary = String::new();
    let mut push = |label: &str, value: Option<&str>| {
        if let Some(value) = value {
            if !summary.is_empty() {
                summary.push_str(", ");
            }
            summary.push_str(label);
            summary.push_str(value);
        }
    };
    push("Max length: ", max_length);
    push("Min length: ", min_length);
    push("Pattern: ", pattern);
    summary
}

/// Collapse schema types to the documentation vocabulary: CHR with an
/// optional max length, DEC with digit counts, INT, DATE, anything
/// else verbatim.
fn normalize_type(
    tree: &XmlTree,
    xsd: &str,
    attribute: NodeId,
    name: &str,
    type_info: &str,
    restrictions: &str,
) -> String {
    if type_info.contains("string") {
        let mut formatted = "CHR".to_string();
        if let Some(captures) = MAX_LENGTH_SUMMARY.captures(restrictions) {
            formatted.push('(');
            formatted.push_str(&captures[1]);
            formatted.push(')');
        }
        return formatted;
    }
    if type_info.contains("decimal") {
        let (total, fraction) = decimal_digits(tree, xsd, attribute, name, type_info);
        return match (total, fraction) {
            (Some(total), Some(fraction)) => format!("DEC({total},{fraction})"),
            _ => "DEC".to_string(),
        };
    }
    if type_info.contains("integer") {
        return "INT".to_string();
    }
    if type_info.contains("date") {
        return "DATE".to_string();
    }
    type_info.to_string()
}

/// Digit facets for a decimal attribute, resolved in three stages:
/// a named simple type the declared type refers to, then the
/// restriction inside this attribute's own declaration, then a raw
/// scan of the schema text.
fn decimal_digits(
    tree: &XmlTree,
    xsd: &str,
    attribute: NodeId,
    name: &str,
    type_info: &str,
) -> (Option<String>, Option<String>) {
    let mut total = None;
    let mut fraction = None;

    for id in tree.all_nodes() {
        if !(tree.node(id).in_xs_namespace() && tree.node(id).local == "simpleType") {
            continue;
        }
        let Some(type_name) = tree.node(id).attr("name") else {
            continue;
        };
        if type_name.is_empty() || !type_info.contains(type_name) {
            continue;
        }
        for descendant in tree.descendants(id) {
            let node = tree.node(descendant);
            if node.in_xs_namespace() && node.local == "totalDigits" && total.is_none() {
                total = node.attr("value").map(ToString::to_string);
            }
            if node.in_xs_namespace() && node.local == "fractionDigits" && fraction.is_none() {
                fraction = node.attr("value").map(ToString::to_string);
            }
        }
    }

    if total.is_none() || fraction.is_none() {
        if let Some(restriction) = owned_decimal_restriction(tree, attribute, name) {
            for &facet in tree.children(restriction) {
                let node = tree.node(facet);
                if matches!(node.qname.as_str(), "xs:totalDigits" | "xsd:totalDigits") {
                    total = node.attr("value").map(ToString::to_string);
                } else if matches!(node.qname.as_str(), "xs:fractionDigits" | "xsd:fractionDigits")
                {
                    fraction = node.attr("value").map(ToString::to_string);
                }
            }
        }
    }

    if total.is_none() || fraction.is_none() {
        if let Some(captures) = TOTAL_DIGITS_RAW.captures(xsd) {
            total = Some(captures[1].to_string());
        }
        if let Some(captures) = FRACTION_DIGITS_RAW.captures(xsd) {
            fraction = Some(captures[1].to_string());
        }
    }

    (total, fraction)
}

/// A decimal-based restriction element nested somewhere under the
/// attribute declaration named `name`.
fn owned_decimal_restriction(tree: &XmlTree, attribute: NodeId, name: &str) -> Option<NodeId> {
    tree.all_nodes().find(|&id| {
        let node = tree.node(id);
        let decimal_base = matches!(node.qname.as_str(), "xs:restriction" | "xsd:restriction")
            && node.attr("base").is_some_and(|base| base.contains("decimal"));
        if !decimal_base {
            return false;
        }
        // Walk up to confirm it belongs to our attribute.
        let mut current = tree.parent(id);
        while let Some(ancestor) = current {
            if ancestor == attribute && tree.node(ancestor).attr("name") == Some(name) {
                return true;
            }
            current = tree.parent(ancestor);
        }
        false
    })
}

/// Documentation text attached to the attribute: a direct-child
/// annotation first, its `documentation` subtree text trimmed.
fn annotation_text(tree: &XmlTree, attribute: NodeId) -> Option<String> {
    let annotation = tree
        .all_nodes()
        .find(|&id| {
            let node = tree.node(id);
            node.in_xs_namespace()
                && node.local == "annotation"
                && tree.parent(id) == Some(attribute)
        })
        .or_else(|| {
            tree.children(attribute)
                .iter()
                .copied()
                .find(|&child| is_schema_element(tree, child, "annotation"))
        })?;

    let documentation = tree
        .descendants(annotation)
        .into_iter()
        .find(|&id| {
            let node = tree.node(id);
            node.in_xs_namespace() && node.local == "documentation"
        })
        .or_else(|| {
            tree.children(annotation)
                .iter()
                .copied()
                .find(|&child| is_schema_element(tree, child, "documentation"))
        })?;

    let text = tree.text_content(documentation).trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="kls">
    <xs:complexType>
      <xs:attribute name="NAZWA" use="required">
        <xs:annotation>
          <xs:documentation>Nazwa sklepu</xs:documentation>
        </xs:annotation>
        <xs:simpleType>
          <xs:restriction base="xs:string">
            <xs:maxLength value="50"/>
          </xs:restriction>
        </xs:simpleType>
      </xs:attribute>
      <xs:attribute name="POWIERZCHNIA">
        <xs:simpleType>
          <xs:restriction base="xs:decimal">
            <xs:totalDigits value="10"/>
            <xs:fractionDigits value="2"/>
          </xs:restriction>
        </xs:simpleType>
      </xs:attribute>
      <xs:attribute name="LICZBA_KAS" type="xs:integer"/>
      <xs:attribute name="DATA_OD" type="xs:date" use="required"/>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;

    #[test]
    fn extracts_typed_descriptors() {
        let fields = introspect_schema(SCHEMA, &DocMap::default()).unwrap();
        assert_eq!(fields.len(), 4);

        let nazwa = &fields[0];
        assert_eq!(nazwa.name, "NAZWA");
        assert_eq!(nazwa.field_type, "CHR(50)");
        assert!(nazwa.required);
        assert_eq!(nazwa.description, "Nazwa sklepu");
        assert_eq!(nazwa.restrictions, "Max length: 50");

        let powierzchnia = &fields[1];
        assert_eq!(powierzchnia.field_type, "DEC(10,2)");
        assert!(!powierzchnia.required);

        assert_eq!(fields[2].field_type, "INT");
        assert_eq!(fields[3].field_type, "DATE");
    }

    #[test]
    fn named_simple_type_supplies_decimal_digits() {
        let schema = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:simpleType name="kwota">
    <xs:restriction base="xs:decimal">
      <xs:totalDigits value="19"/>
      <xs:fractionDigits value="4"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:attribute name="CENA" type="kwota_decimal"/>
</xs:schema>"#;
        // "kwota_decimal" mentions both the named type and decimal.
        let fields = introspect_schema(schema, &DocMap::default()).unwrap();
        assert_eq!(fields[0].field_type, "DEC(19,4)");
    }

    #[test]
    fn doc_map_fills_missing_descriptions() {
        let doc_map = DocMap::parse("| **LICZBA_KAS** | Liczba stanowisk kasowych |\n");
        let fields = introspect_schema(SCHEMA, &doc_map).unwrap();
        let kasy = fields.iter().find(|field| field.name == "LICZBA_KAS").unwrap();
        assert_eq!(kasy.description, "Liczba stanowisk kasowych");
        // Schema-supplied descriptions win over the supplement.
        assert_eq!(fields[0].description, "Nazwa sklepu");
    }

    #[test]
    fn schema_without_attributes_yields_empty_list() {
        let schema = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="pusty" type="xs:string"/>
</xs:schema>"#;
        let fields = introspect_schema(schema, &DocMap::default()).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn non_schema_root_is_rejected() {
        let error = introspect_schema("<dokument/>", &DocMap::default()).unwrap_err();
        assert!(matches!(error, SchemaError::NotASchema(name) if name == "dokument"));
    }

    #[test]
    fn qualified_names_work_without_namespace_declarations() {
        // Prefix bound to a non-standard URI; strategy two matches on
        // the written tag names.
        let schema = r#"<xsd:schema xmlns:xsd="urn:custom">
  <xsd:attribute name="KOD" type="xsd:string" use="required"/>
</xsd:schema>"#;
        let fields = introspect_schema(schema, &DocMap::default()).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "KOD");
        assert_eq!(fields[0].field_type, "CHR");
        assert!(fields[0].required);
    }
}
