//! Cell-related types
//!
//! This module contains:
//! - [`CellValue`] - The typed value decoded from a cell
//! - [`Cell`] - A value plus its optional raw style index

mod value;

pub use value::{Cell, CellValue};
