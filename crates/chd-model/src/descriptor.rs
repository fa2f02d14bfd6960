//! Recovered metadata for one schema attribute.

use serde::{Deserialize, Serialize};

/// One field recovered from an XSD schema, in discovery order.
///
/// `field_type` is the normalized short code (`CHR(50)`, `DEC(10,2)`,
/// `INT`, `DATE`) or the raw type reference when unrecognized.
/// `restrictions` is a free-text facet summary such as
/// `Max length: 50, Pattern: [0-9]+`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub description: String,
    pub field_type: String,
    pub required: bool,
    pub restrictions: String,
}
