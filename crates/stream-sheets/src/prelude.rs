//! Prelude module - common imports for stream-sheets users
//!
//! ```rust
//! use stream_sheets::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Cell,
    CellValue,
    // Keys and results
    ColumnKey,
    ColumnTable,
    // Read configuration
    ReadOptions,
    ResultMode,
    Row,
    SheetData,
    SheetReader,
    // Main types
    Workbook,
    // Error types
    XlsxError,
    XlsxResult,
};
