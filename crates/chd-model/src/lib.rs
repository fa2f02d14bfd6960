//! ChainsDirectory data model definitions.

pub mod descriptor;
pub mod field;

pub use descriptor::FieldDescriptor;
pub use field::{FIELD_CATALOG, FieldDefinition, SpecialBehavior, find_field};
