//! # stream-sheets-xlsx
//!
//! Streaming XLSX (Office Open XML) reader for stream-sheets.
//!
//! Opening a [`Workbook`] loads its catalog: the sheet list, shared strings
//! and style tables. Worksheet rows are pulled through a [`RowCursor`] one
//! at a time, so memory stays flat regardless of sheet size (except for
//! column-major reads, which pivot the buffered result).

pub mod cascade;
mod catalog;
pub mod cursor;
pub mod drawings;
pub mod error;
mod interpret;
pub mod layout;
mod part;
pub mod sheet;
mod styles;
pub mod workbook;

pub use cascade::{StyleCascade, StyledCell};
pub use catalog::{Relationship, SheetEntry};
pub use cursor::RowCursor;
pub use drawings::SheetImage;
pub use error::{XlsxError, XlsxResult};
pub use layout::SheetLayout;
pub use sheet::{SheetData, SheetReader};
pub use workbook::Workbook;
