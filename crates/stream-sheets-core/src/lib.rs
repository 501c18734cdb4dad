//! # stream-sheets-core
//!
//! Core data structures for the stream-sheets streaming spreadsheet reader.
//!
//! This crate provides the format-independent pieces used by the xlsx reader:
//! - [`Area`] and the column letter arithmetic in [`address`]
//! - [`CellValue`], [`Cell`] and [`Row`] - what a read produces
//! - [`ResultMode`] and [`ReadOptions`] - how rows and columns are keyed
//! - [`date`] - Excel serial date conversion
//! - [`style`] - raw style tables and resolved formatting records
//!
//! ## Example
//!
//! ```rust
//! use stream_sheets_core::{col_letter, col_num, Area};
//!
//! assert_eq!(col_num("AA"), 27);
//! assert_eq!(col_letter(27), "AA");
//!
//! let area: Area = "B2:C3".parse().unwrap();
//! assert_eq!(area.row_count(), 2);
//! assert!(area.contains(3, 2));
//! ```

pub mod address;
pub mod cell;
pub mod date;
pub mod error;
pub mod mode;
pub mod row;
pub mod style;
pub mod workbook;

// Re-exports for convenience
pub use address::{col_letter, col_num, parse_area, parse_cell_ref, Area, ColumnCache};
pub use cell::{Cell, CellValue};
pub use date::DateSystem;
pub use error::{Error, Result};
pub use mode::{Base, ColumnLabel, Orientation, Origin, ReadOptions, ResultMode};
pub use row::{ColumnKey, ColumnKeyMap, ColumnTable, Row};
pub use style::{RawStyleTable, ResolvedStyle, StyleGroup, StyleHint, StyleValue, XfEntry};
pub use workbook::WorkbookSettings;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;
