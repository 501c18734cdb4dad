//! Error types for stream-sheets-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in stream-sheets-core
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// An address or range string does not follow the A1 grammar
    #[error("Wrong address or range \"{0}\"")]
    AddressSyntax(String),

    /// Sheet not found by name
    #[error("Sheet name \"{0}\" not found")]
    SheetNotFound(String),

    /// Sheet not found by its workbook id
    #[error("Sheet ID \"{0}\" not found")]
    SheetIdNotFound(u32),
}

impl Error {
    /// Whether this is one of the sheet lookup failures
    pub fn is_lookup(&self) -> bool {
        matches!(self, Error::SheetNotFound(_) | Error::SheetIdNotFound(_))
    }
}
