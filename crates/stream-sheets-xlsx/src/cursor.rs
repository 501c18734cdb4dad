//! Streaming row cursor over one worksheet part

use std::iter::FusedIterator;

use ahash::AHashMap;
use log::trace;
use stream_sheets_core::{
    parse_cell_ref, Area, Cell, CellValue, ColumnCache, ColumnKey, ReadOptions, Row,
};

use crate::catalog::Catalog;
use crate::error::XlsxResult;
use crate::interpret::{decode_cell, style_index};
use crate::part::{NodeKind, PartCursor, XmlElement, XmlNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before `<sheetData>`
    SeekBody,
    /// Inside `<sheetData>`
    InBody,
    Done,
}

/// Row currently being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Current {
    /// Between rows
    None,
    /// Before the area; cells are passed over
    Skipping,
    /// In the area; cells accumulate into the pending row
    Accumulating(u32),
}

/// Lazy sequence of `(row key, row)` pairs read from a worksheet.
///
/// Rows come out in document order, restricted to the read area and keyed
/// per the [`ReadOptions`]. The worksheet part is released once the sequence
/// ends, hits its row limit, fails or is dropped. A failed cursor yields the
/// error once and nothing after it.
pub struct RowCursor<'a> {
    part: PartCursor<'a>,
    catalog: &'a Catalog,
    area: Area,
    options: ReadOptions,
    state: State,
    current: Current,
    pending: Row,
    /// Waiting for the first accumulated row to take column keys from
    header_pending: bool,
    header: AHashMap<String, ColumnKey>,
    row_origin: Option<u32>,
    col_origin: Option<u32>,
    last_row: u32,
    last_col: u32,
    emitted: usize,
    columns: ColumnCache,
}

impl<'a> RowCursor<'a> {
    pub(crate) fn new(
        part: PartCursor<'a>,
        catalog: &'a Catalog,
        area: Area,
        options: ReadOptions,
    ) -> Self {
        let header_pending = options.header_row || area.first_row_keys;
        let state = if options.limit == Some(0) {
            State::Done
        } else {
            State::SeekBody
        };
        let mut cursor = RowCursor {
            part,
            catalog,
            area,
            options,
            state,
            current: Current::None,
            pending: Row::new(),
            header_pending,
            header: AHashMap::new(),
            row_origin: None,
            col_origin: None,
            last_row: 0,
            last_col: 0,
            emitted: 0,
            columns: ColumnCache::new(),
        };
        if cursor.state == State::Done {
            cursor.part.close();
        }
        cursor
    }

    /// The area this cursor reads
    pub fn area(&self) -> &Area {
        &self.area
    }

    /// Column keys taken from the header row, by column letter
    pub fn header(&self) -> &AHashMap<String, ColumnKey> {
        &self.header
    }

    /// Number of data rows yielded so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Stop reading and release the worksheet part
    pub fn close(&mut self) {
        self.state = State::Done;
        if !self.part.is_closed() {
            self.part.close();
        }
    }

    fn advance(&mut self) -> XlsxResult<Option<(u32, Row)>> {
        if self.state == State::SeekBody {
            match self.part.seek_start("sheetData")? {
                Some(node) if node.kind == NodeKind::Start => self.state = State::InBody,
                _ => return Ok(None),
            }
        }

        while let Some(node) = self.part.next_node()? {
            if node.opens("row") {
                // a row left open by the producer ends where the next begins
                let unclosed = self.end_row();
                let inside = self.start_row(&node);
                if !inside {
                    self.part.close();
                }
                if node.kind == NodeKind::Empty {
                    self.current = Current::None;
                }
                if unclosed.is_some() || !inside {
                    return Ok(unclosed);
                }
            } else if node.closes("row") {
                if let Some(row) = self.end_row() {
                    return Ok(Some(row));
                }
            } else if node.opens("c") {
                if let Current::Accumulating(row) = self.current {
                    let cell = self.part.expand(node)?;
                    self.add_cell(row, &cell);
                }
            } else if node.closes("sheetData") {
                return Ok(self.end_row());
            }
        }

        // part ended early; hand out whatever was pending
        Ok(self.end_row())
    }

    /// Enter a row. Returns `false` once the row lies past the area.
    fn start_row(&mut self, node: &XmlNode) -> bool {
        let row = match node.attr("r") {
            None => self.last_row + 1,
            Some(r) => match r.parse::<u32>() {
                Ok(row) if row >= 1 => row,
                _ => {
                    trace!("{}: skipping row with bad reference {:?}", self.part.path(), r);
                    self.current = Current::Skipping;
                    return true;
                }
            },
        };
        self.last_row = row;
        self.last_col = 0;

        if row > self.area.row_max {
            return false;
        }
        self.current = if row < self.area.row_min {
            Current::Skipping
        } else {
            Current::Accumulating(row)
        };
        true
    }

    fn add_cell(&mut self, row: u32, cell: &XmlElement) {
        let (col, cell_row) = match cell.attr("r") {
            None => (self.last_col + 1, row),
            Some(r) => match parse_cell_ref(r) {
                Some((letters, cell_row)) => (self.columns.num(letters), cell_row),
                None => {
                    trace!("{}: skipping cell with bad reference {:?}", self.part.path(), r);
                    return;
                }
            },
        };
        self.last_col = col;

        if !self.area.contains(cell_row, col) {
            return;
        }
        let col_origin = *self.col_origin.get_or_insert(col);
        let letter = self.columns.letter(col).to_string();

        let value = decode_cell(cell, self.catalog);
        let style = self.options.include_styles.then(|| style_index(cell));

        let key = if self.header_pending {
            ColumnKey::Name(letter)
        } else if let Some(key) = self.options.column_keys.get(&letter) {
            key.clone()
        } else if let Some(key) = self.header.get(&letter) {
            key.clone()
        } else {
            self.options.mode.column_key(&letter, col, col_origin)
        };
        self.pending.insert(key, Cell { value, style });
    }

    /// Leave the current row, producing it if it holds data
    fn end_row(&mut self) -> Option<(u32, Row)> {
        let current = std::mem::replace(&mut self.current, Current::None);
        let Current::Accumulating(row) = current else {
            return None;
        };
        if self.pending.is_empty() {
            return None;
        }
        let cells = std::mem::take(&mut self.pending);

        if self.header_pending {
            self.header_pending = false;
            self.row_origin.get_or_insert(row + 1);
            self.capture_header(cells);
            return None;
        }

        let origin = *self.row_origin.get_or_insert(row);
        self.emitted += 1;
        Some((self.options.mode.row_key(row, origin), cells))
    }

    fn capture_header(&mut self, cells: Row) {
        for (key, cell) in cells {
            let ColumnKey::Name(letter) = key else {
                continue;
            };
            if matches!(&cell.value, CellValue::Text(t) if t.is_empty()) {
                continue;
            }
            self.header.insert(letter, ColumnKey::from(&cell.value));
        }
        trace!("header row captured {} column keys", self.header.len());
    }
}

impl Iterator for RowCursor<'_> {
    type Item = XlsxResult<(u32, Row)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == State::Done {
            return None;
        }
        match self.advance() {
            Ok(Some(row)) => {
                if self.options.limit.is_some_and(|limit| self.emitted >= limit) {
                    self.close();
                }
                Some(Ok(row))
            }
            Ok(None) => {
                self.close();
                None
            }
            Err(e) => {
                self.close();
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for RowCursor<'_> {}
