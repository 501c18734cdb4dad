//! Reads against one worksheet

use std::io::{Read, Seek};
use std::ops::ControlFlow;

use stream_sheets_core::address::dimension_span;
use stream_sheets_core::{
    Area, Cell, ColumnKey, ColumnTable, Orientation, ReadOptions, ResultMode, Row,
};

use crate::cascade::StyledCell;
use crate::catalog::SheetEntry;
use crate::cursor::RowCursor;
use crate::drawings::SheetImage;
use crate::error::XlsxResult;
use crate::layout::{read_layout, SheetLayout};
use crate::workbook::Workbook;

/// Result of [`SheetReader::read`], shaped by the mode's orientation
#[derive(Debug, Clone)]
pub enum SheetData<C = Cell> {
    Rows(Vec<(u32, Row<C>)>),
    Columns(ColumnTable<C>),
}

/// Handle on one sheet of an open [`Workbook`].
///
/// The read area set here stays with the sheet for later reads through the
/// workbook.
pub struct SheetReader<'w, R: Read + Seek> {
    wb: &'w mut Workbook<R>,
    index: usize,
}

impl<'w, R: Read + Seek> SheetReader<'w, R> {
    pub(crate) fn new(wb: &'w mut Workbook<R>, index: usize) -> Self {
        Self { wb, index }
    }

    fn entry(&self) -> &SheetEntry {
        &self.wb.catalog.sheets[self.index]
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.entry().name
    }

    /// `sheetId` from the workbook
    pub fn id(&self) -> u32 {
        self.entry().sheet_id
    }

    /// Worksheet part inside the package
    pub fn path(&self) -> &str {
        &self.entry().path
    }

    /// Restrict reads to an address or range (`"C3:AZ28"`, `"C3"`, `"C:AZ"`,
    /// `"C"`). With `first_row_keys` the first row read supplies column keys.
    pub fn set_read_area(&mut self, spec: &str, first_row_keys: bool) -> XlsxResult<&mut Self> {
        let area = Area::parse(spec)?.with_first_row_keys(first_row_keys);
        self.set_area(area);
        Ok(self)
    }

    /// Restrict reads to an already built area
    pub fn set_area(&mut self, area: Area) -> &mut Self {
        self.wb.sheets[self.index].area = area;
        self
    }

    /// Read the whole sheet again
    pub fn reset_area(&mut self) -> &mut Self {
        self.set_area(Area::default())
    }

    /// The current read area
    pub fn area(&self) -> Area {
        self.wb.sheets[self.index].area
    }

    /// The `<dimension ref>` the producer recorded, if any
    pub fn dimension(&mut self) -> XlsxResult<Option<String>> {
        let mut part = self.wb.sheet_part(self.index)?;
        while let Some(node) = part.next_node()? {
            if node.opens("dimension") {
                return Ok(node.attr("ref").map(str::to_string));
            }
            if node.opens("sheetData") {
                break;
            }
        }
        Ok(None)
    }

    /// Rows spanned by the recorded dimension, 0 when there is none
    pub fn count_rows(&mut self) -> XlsxResult<u32> {
        Ok(self.span()?.map_or(0, |(rows, _)| rows))
    }

    /// Columns spanned by the recorded dimension, 0 when there is none
    pub fn count_columns(&mut self) -> XlsxResult<u32> {
        Ok(self.span()?.map_or(0, |(_, cols)| cols))
    }

    fn span(&mut self) -> XlsxResult<Option<(u32, u32)>> {
        Ok(self.dimension()?.as_deref().and_then(dimension_span))
    }

    /// Stream the rows of the read area
    pub fn rows(&mut self, options: ReadOptions) -> XlsxResult<RowCursor<'_>> {
        let area = self.area();
        self.wb.cursor(self.index, area, options)
    }

    /// Read every row of the area
    pub fn read_rows(&mut self, options: ReadOptions) -> XlsxResult<Vec<(u32, Row)>> {
        self.rows(options)?.collect()
    }

    /// Read the area pivoted column-major.
    ///
    /// Every column covers every row key; see [`ColumnTable`]. The whole
    /// area is buffered before pivoting.
    pub fn read_columns(&mut self, options: ReadOptions) -> XlsxResult<ColumnTable> {
        Ok(ColumnTable::pivot(self.read_rows(options)?))
    }

    /// Read the area in the orientation the options ask for
    pub fn read(&mut self, options: ReadOptions) -> XlsxResult<SheetData> {
        match options.mode.orientation {
            Orientation::RowsMajor => Ok(SheetData::Rows(self.read_rows(options)?)),
            Orientation::ColumnsMajor => Ok(SheetData::Columns(self.read_columns(options)?)),
        }
    }

    /// Read the area as `(address, cell)` pairs in document order.
    ///
    /// Addresses are absolute (`"B3"`), so numbering, header and column key
    /// options are ignored.
    pub fn read_cells(&mut self, options: ReadOptions) -> XlsxResult<Vec<(String, Cell)>> {
        let area = self.area().with_first_row_keys(false);
        let mut cells = Vec::new();
        for row in self.wb.cursor(self.index, area, address_keyed(options))? {
            let (row_num, row) = row?;
            for (key, cell) in row {
                cells.push((format!("{}{}", key, row_num), cell));
            }
        }
        Ok(cells)
    }

    /// Visit rows until `visit` breaks. Returns the number of rows visited.
    ///
    /// The worksheet part is released as soon as the visitor stops.
    pub fn for_each_row<F>(&mut self, options: ReadOptions, mut visit: F) -> XlsxResult<usize>
    where
        F: FnMut(u32, &Row) -> ControlFlow<()>,
    {
        let mut visited = 0;
        for row in self.rows(options)? {
            let (row_num, row) = row?;
            visited += 1;
            if visit(row_num, &row).is_break() {
                break;
            }
        }
        Ok(visited)
    }

    /// Visit cells one at a time until `visit` breaks
    pub fn read_callback<F>(&mut self, options: ReadOptions, mut visit: F) -> XlsxResult<()>
    where
        F: FnMut(u32, &ColumnKey, &Cell) -> ControlFlow<()>,
    {
        for row in self.rows(options)? {
            let (row_num, row) = row?;
            for (key, cell) in row.iter() {
                if visit(row_num, key, cell).is_break() {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// [`read_rows`](Self::read_rows) with each cell's resolved formatting
    pub fn read_rows_with_styles(
        &mut self,
        options: ReadOptions,
    ) -> XlsxResult<Vec<(u32, Row<StyledCell>)>> {
        let rows = self.read_rows(options.include_styles(true))?;
        Ok(rows
            .into_iter()
            .map(|(key, row)| (key, row.map(|cell| self.styled(cell))))
            .collect())
    }

    /// [`read_columns`](Self::read_columns) with each cell's resolved formatting
    pub fn read_columns_with_styles(
        &mut self,
        options: ReadOptions,
    ) -> XlsxResult<ColumnTable<StyledCell>> {
        Ok(ColumnTable::pivot(self.read_rows_with_styles(options)?))
    }

    /// [`read_cells`](Self::read_cells) with each cell's resolved formatting
    pub fn read_cells_with_styles(
        &mut self,
        options: ReadOptions,
    ) -> XlsxResult<Vec<(String, StyledCell)>> {
        let cells = self.read_cells(options.include_styles(true))?;
        Ok(cells
            .into_iter()
            .map(|(addr, cell)| (addr, self.styled(cell)))
            .collect())
    }

    fn styled(&self, cell: Cell) -> StyledCell {
        StyledCell {
            style: self.wb.cascade.resolve(cell.style.unwrap_or(0)),
            value: cell.value,
        }
    }

    /// Column widths, row heights and merged ranges
    pub fn layout(&mut self) -> XlsxResult<SheetLayout> {
        let mut part = self.wb.sheet_part(self.index)?;
        read_layout(&mut part)
    }

    /// Whether a drawing part is attached to this sheet
    pub fn has_drawings(&mut self) -> XlsxResult<bool> {
        Ok(self.wb.drawing_part(self.index)?.is_some())
    }

    /// Number of cell-anchored pictures
    pub fn count_images(&mut self) -> XlsxResult<usize> {
        Ok(self.wb.images(self.index)?.len())
    }

    /// Every cell-anchored picture, in drawing order
    pub fn image_list(&mut self) -> XlsxResult<&[SheetImage]> {
        self.wb.images(self.index)
    }

    /// Pictures anchored in one row
    pub fn image_list_by_row(&mut self, row: u32) -> XlsxResult<Vec<SheetImage>> {
        Ok(self
            .wb
            .images(self.index)?
            .iter()
            .filter(|image| image.row == row)
            .cloned()
            .collect())
    }

    /// Whether a picture is anchored at `cell` (case-insensitive)
    pub fn has_image(&mut self, cell: &str) -> XlsxResult<bool> {
        Ok(self.image_at(cell)?.is_some())
    }

    /// Name of the picture anchored at `cell`
    pub fn image_name(&mut self, cell: &str) -> XlsxResult<Option<String>> {
        Ok(self.image_at(cell)?.map(|image| image.name))
    }

    /// Media bytes of the picture anchored at `cell`
    pub fn image_blob(&mut self, cell: &str) -> XlsxResult<Option<Vec<u8>>> {
        match self.image_at(cell)? {
            Some(image) => self.wb.part_bytes(&image.target),
            None => Ok(None),
        }
    }

    fn image_at(&mut self, cell: &str) -> XlsxResult<Option<SheetImage>> {
        let cell = cell.to_ascii_uppercase();
        Ok(self
            .wb
            .images(self.index)?
            .iter()
            .find(|image| image.cell == cell)
            .cloned())
    }
}

impl<R: Read + Seek> std::fmt::Debug for SheetReader<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetReader")
            .field("sheet", self.entry())
            .field("area", &self.area())
            .finish()
    }
}

/// Options that key cells by plain column letter and sheet row
fn address_keyed(options: ReadOptions) -> ReadOptions {
    ReadOptions {
        column_keys: Default::default(),
        header_row: false,
        mode: ResultMode::default(),
        ..options
    }
}
