//! Supplementary field documentation.
//!
//! Interface specifications often travel as text exports of a table
//! where each row opens with the field name in `| **NAME** |` form and
//! the description continues across following table rows. This parser
//! recovers a name → description map from that shape.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static FIELD_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|\s*\*\*([A-Z_]+)\*\*\s*\|").unwrap());
static FIELD_DESC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\s*\*\*[A-Z_]+\*\*\s*\|\s*(.*?)\s*\|").unwrap());

#[derive(Debug, Clone, Default)]
pub struct DocMap {
    entries: HashMap<String, String>,
}

impl DocMap {
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        let mut current: Option<(String, String)> = None;

        for line in content.lines() {
            let line = line.trim();
            if let Some(captures) = FIELD_OPEN.captures(line) {
                if let Some((field, description)) = current.take() {
                    if !description.is_empty() {
                        entries.insert(field, description);
                    }
                }
                let description = FIELD_DESC
                    .captures(line)
                    .and_then(|captures| captures.get(1))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                current = Some((captures[1].to_string(), description));
            } else if let Some((_, description)) = current.as_mut() {
                // Continuation rows of the same table cell.
                if !line.starts_with("+--") && line.contains('|') {
                    if let Some(part) = line.split('|').nth(2) {
                        let part = part.trim();
                        if !part.is_empty() {
                            if !description.is_empty() {
                                description.push(' ');
                            }
                            description.push_str(part);
                        }
                    }
                }
            }
        }
        if let Some((field, description)) = current {
            if !description.is_empty() {
                entries.insert(field, description);
            }
        }
        Self { entries }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
