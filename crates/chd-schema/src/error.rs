use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed XML: {0}")]
    Parse(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("text decoding failed: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
    #[error("unresolvable character reference: {0}")]
    BadCharRef(String),
    #[error("root element <{0}> is not an XML Schema")]
    NotASchema(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
