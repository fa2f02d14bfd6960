//! XSD schema introspection.
//!
//! Parses a schema document, discovers its attribute declarations and
//! produces [`chd_model::FieldDescriptor`] records ready for the
//! documentation renderer. A free-text supplement can fill in
//! descriptions the schema itself lacks.

pub mod docmap;
pub mod error;
pub mod introspect;
pub mod tree;

pub use docmap::DocMap;
pub use error::SchemaError;
pub use introspect::introspect_schema;
pub use tree::{XS_NAMESPACE, XmlTree};
