//! # stream-sheets
//!
//! A streaming reader for Excel workbooks (xlsx).
//!
//! Worksheets are parsed one row at a time straight out of the zip package,
//! so reading a sheet of a million rows needs about as much memory as
//! reading one of ten. On top of plain row reads it offers:
//!
//! - Read areas (`"B2:D20"`, `"C3"`, `"C:F"`) with optional header rows
//! - Absolute or relative, zero- or one-based row and column keys
//! - Column-major reads
//! - Date detection from number formats, in both date systems
//! - Cascaded cell formatting from `styles.xml`
//! - Pictures anchored to cells, column widths, row heights and merges
//!
//! ## Example
//!
//! ```no_run
//! use stream_sheets::prelude::*;
//!
//! let mut workbook = stream_sheets::open("sales.xlsx")?;
//! let mut sheet = workbook.sheet("Q3")?;
//! sheet.set_read_area("A1:F500", true)?;
//!
//! for row in sheet.rows(ReadOptions::new().mode(ResultMode::zero_based()))? {
//!     let (index, cells) = row?;
//!     if let Some(total) = cells.value("Total") {
//!         println!("{}: {}", index, total);
//!     }
//! }
//! # Ok::<(), XlsxError>(())
//! ```

pub mod prelude;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// Re-export core types
pub use stream_sheets_core::{
    address, col_letter, col_num, date, mode, parse_area, Area, Base, Cell, CellValue, ColumnKey,
    ColumnKeyMap, ColumnLabel, ColumnTable, DateSystem, Error, Orientation, Origin,
    RawStyleTable, ReadOptions, ResolvedStyle, ResultMode, Row, StyleGroup, StyleValue,
    WorkbookSettings, MAX_COLS, MAX_ROWS,
};

// Re-export the xlsx reader
pub use stream_sheets_xlsx::{
    RowCursor, SheetData, SheetEntry, SheetImage, SheetLayout, SheetReader, StyledCell, Workbook,
    XlsxError, XlsxResult,
};

/// Open a workbook file.
///
/// Only Office Open XML spreadsheets (`.xlsx`, `.xlsm`) are read; anything
/// else is rejected before the file is touched.
pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook<BufReader<File>>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") => Workbook::open(path),
        _ => Err(XlsxError::InvalidFormat(format!(
            "Unsupported file format: {}",
            path.display()
        ))),
    }
}
