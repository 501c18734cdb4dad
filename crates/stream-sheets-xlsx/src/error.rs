//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while reading an XLSX package
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Core error (bad address, unknown sheet)
    #[error(transparent)]
    Core(#[from] stream_sheets_core::Error),
}

impl XlsxError {
    /// Whether the error is an unknown sheet name or id
    pub fn is_lookup(&self) -> bool {
        matches!(self, XlsxError::Core(e) if e.is_lookup())
    }

    /// Whether the error is a malformed address or range
    pub fn is_address_syntax(&self) -> bool {
        matches!(self, XlsxError::Core(stream_sheets_core::Error::AddressSyntax(_)))
    }
}
