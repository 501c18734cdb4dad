//! Column widths, row heights and merged ranges of a worksheet

use std::collections::BTreeMap;

use crate::error::XlsxResult;
use crate::part::PartCursor;

/// Sizing information declared by a worksheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetLayout {
    /// `sheetFormatPr/@defaultColWidth`
    pub default_col_width: Option<f64>,
    /// `sheetFormatPr/@defaultRowHeight`
    pub default_row_height: Option<f64>,
    /// Width per 1-based column, expanded from `<col min max>` spans
    pub col_widths: BTreeMap<u32, f64>,
    /// Height per row that declares `ht`
    pub row_heights: BTreeMap<u32, f64>,
    /// Merged ranges as written, e.g. `"A1:C1"`
    pub merged_cells: Vec<String>,
}

impl SheetLayout {
    /// Width of a column, falling back to the sheet default
    pub fn col_width(&self, col: u32) -> Option<f64> {
        self.col_widths.get(&col).copied().or(self.default_col_width)
    }

    /// Height of a row, falling back to the sheet default
    pub fn row_height(&self, row: u32) -> Option<f64> {
        self.row_heights.get(&row).copied().or(self.default_row_height)
    }
}

/// Scan a whole worksheet part for its layout
pub(crate) fn read_layout(part: &mut PartCursor<'_>) -> XlsxResult<SheetLayout> {
    let mut layout = SheetLayout::default();
    let number = |v: Option<&str>| v.and_then(|v| v.parse::<f64>().ok());

    while let Some(node) = part.next_node()? {
        if node.opens("sheetFormatPr") {
            layout.default_col_width = number(node.attr("defaultColWidth"));
            layout.default_row_height = number(node.attr("defaultRowHeight"));
        } else if node.opens("col") {
            let min = node.attr("min").and_then(|v| v.parse::<u32>().ok());
            let max = node.attr("max").and_then(|v| v.parse::<u32>().ok());
            if let (Some(min), Some(max), Some(width)) = (min, max, number(node.attr("width"))) {
                // a trailing span often runs to the last column; cap it
                for col in min..=max.min(stream_sheets_core::MAX_COLS) {
                    layout.col_widths.insert(col, width);
                }
            }
        } else if node.opens("row") {
            let row = node.attr("r").and_then(|v| v.parse::<u32>().ok());
            if let (Some(row), Some(height)) = (row, number(node.attr("ht"))) {
                layout.row_heights.insert(row, height);
            }
        } else if node.opens("mergeCell") {
            if let Some(range) = node.attr("ref") {
                layout.merged_cells.push(range.to_string());
            }
        }
    }

    Ok(layout)
}
