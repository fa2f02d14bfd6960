//! Error types for workbook ingestion.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("xml encoding error: {0}")]
    XmlEncoding(#[from] quick_xml::encoding::EncodingError),
    #[error("xml attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing workbook entry: {0}")]
    MissingEntry(String),
    #[error("invalid character reference: {0}")]
    BadCharRef(String),
    #[error("sheet not found: {0}")]
    SheetNotFound(String),
    #[error("unsupported workbook format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
