//! Row types produced by the sheet cursor

use std::fmt;

use ahash::AHashMap;

use crate::cell::{Cell, CellValue};

/// Key a cell is emitted under inside a [`Row`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnKey {
    /// Column letter, header text or a caller-chosen name
    Name(String),
    /// Numeric label or a caller-chosen number
    Number(i64),
}

impl ColumnKey {
    /// The key as a name, if it is one
    pub fn as_name(&self) -> Option<&str> {
        match self {
            ColumnKey::Name(s) => Some(s),
            ColumnKey::Number(_) => None,
        }
    }

    /// The key as a number, if it is one
    pub fn as_number(&self) -> Option<i64> {
        match self {
            ColumnKey::Number(n) => Some(*n),
            ColumnKey::Name(_) => None,
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Name(s) => write!(f, "{}", s),
            ColumnKey::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for ColumnKey {
    fn from(s: &str) -> Self {
        ColumnKey::Name(s.to_string())
    }
}

impl From<String> for ColumnKey {
    fn from(s: String) -> Self {
        ColumnKey::Name(s)
    }
}

impl From<i32> for ColumnKey {
    fn from(n: i32) -> Self {
        ColumnKey::Number(n as i64)
    }
}

impl From<i64> for ColumnKey {
    fn from(n: i64) -> Self {
        ColumnKey::Number(n)
    }
}

impl From<u32> for ColumnKey {
    fn from(n: u32) -> Self {
        ColumnKey::Number(n as i64)
    }
}

/// Header cells become keys: numbers (and dates) stay numeric, everything
/// else is keyed by its text.
impl From<&CellValue> for ColumnKey {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Text(s) | CellValue::ErrorCode(s) => ColumnKey::Name(s.clone()),
            CellValue::Integer(n) | CellValue::DateSeconds(n) => ColumnKey::Number(*n),
            CellValue::Boolean(b) => ColumnKey::Number(*b as i64),
            CellValue::Float(n) => ColumnKey::Name(n.to_string()),
        }
    }
}

/// Column letter → emitted key.
///
/// Letters are normalized to uppercase on insert and lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnKeyMap {
    keys: AHashMap<String, ColumnKey>,
}

impl ColumnKeyMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Map the column `letter` to `key`, returning the previous key
    pub fn insert<K: Into<ColumnKey>>(&mut self, letter: &str, key: K) -> Option<ColumnKey> {
        self.keys.insert(letter.to_ascii_uppercase(), key.into())
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with<K: Into<ColumnKey>>(mut self, letter: &str, key: K) -> Self {
        self.insert(letter, key);
        self
    }

    /// Key for a column letter
    pub fn get(&self, letter: &str) -> Option<&ColumnKey> {
        if letter.bytes().any(|b| b.is_ascii_lowercase()) {
            self.keys.get(&letter.to_ascii_uppercase())
        } else {
            self.keys.get(letter)
        }
    }

    /// Number of mapped columns
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no column is mapped
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate over (letter, key) pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnKey)> {
        self.keys.iter().map(|(l, k)| (l.as_str(), k))
    }
}

impl<L: AsRef<str>, K: Into<ColumnKey>> FromIterator<(L, K)> for ColumnKeyMap {
    fn from_iter<I: IntoIterator<Item = (L, K)>>(iter: I) -> Self {
        let mut map = ColumnKeyMap::new();
        for (letter, key) in iter {
            map.insert(letter.as_ref(), key);
        }
        map
    }
}

/// One emitted row: cells keyed by [`ColumnKey`] in encounter order.
///
/// Inserting an existing key replaces its cell in place, keeping the
/// original position.
#[derive(Debug, Clone)]
pub struct Row<C = Cell> {
    entries: Vec<(ColumnKey, C)>,
    index: AHashMap<ColumnKey, usize>,
}

impl<C> Default for Row<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: AHashMap::new(),
        }
    }
}

impl<C> Row<C> {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell, returning the one it replaced
    pub fn insert(&mut self, key: ColumnKey, cell: C) -> Option<C> {
        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, cell));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, cell));
        None
    }

    /// Get the cell stored under `key`
    pub fn get<K: Into<ColumnKey>>(&self, key: K) -> Option<&C> {
        self.get_key(&key.into())
    }

    /// Get the cell stored under an already built key
    pub fn get_key(&self, key: &ColumnKey) -> Option<&C> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Whether a cell is stored under `key`
    pub fn contains_key(&self, key: &ColumnKey) -> bool {
        self.index.contains_key(key)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the row holds no cells
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (key, cell) pairs in encounter order
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnKey, &C)> {
        self.entries.iter().map(|(k, c)| (k, c))
    }

    /// Keys in encounter order
    pub fn keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Cells in encounter order
    pub fn cells(&self) -> impl Iterator<Item = &C> {
        self.entries.iter().map(|(_, c)| c)
    }

    /// Transform every cell, keeping keys and order
    pub fn map<D, F: FnMut(C) -> D>(self, mut f: F) -> Row<D> {
        Row {
            entries: self.entries.into_iter().map(|(k, c)| (k, f(c))).collect(),
            index: self.index,
        }
    }

    /// Remove every cell
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

impl Row<Cell> {
    /// Value of the cell stored under `key`
    pub fn value<K: Into<ColumnKey>>(&self, key: K) -> Option<&CellValue> {
        self.get(key).map(|c| &c.value)
    }
}

impl<C: PartialEq> PartialEq for Row<C> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<C> FromIterator<(ColumnKey, C)> for Row<C> {
    fn from_iter<I: IntoIterator<Item = (ColumnKey, C)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, c) in iter {
            row.insert(k, c);
        }
        row
    }
}

impl<C> IntoIterator for Row<C> {
    type Item = (ColumnKey, C);
    type IntoIter = std::vec::IntoIter<(ColumnKey, C)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Column-major view of a fully drained row sequence.
///
/// Every column covers every row key; a cell missing from a row is `None`.
/// Building one buffers the whole read.
#[derive(Debug, Clone)]
pub struct ColumnTable<C = Cell> {
    row_keys: Vec<u32>,
    columns: Vec<(ColumnKey, Vec<Option<C>>)>,
    index: AHashMap<ColumnKey, usize>,
}

impl<C> ColumnTable<C> {
    /// Pivot rows into columns.
    ///
    /// Column order is the order in which keys are first encountered across
    /// all rows.
    pub fn pivot(rows: Vec<(u32, Row<C>)>) -> Self {
        let height = rows.len();
        let mut table = ColumnTable {
            row_keys: Vec::with_capacity(height),
            columns: Vec::new(),
            index: AHashMap::new(),
        };

        for (pos, (row_key, row)) in rows.into_iter().enumerate() {
            table.row_keys.push(row_key);
            for (key, cell) in row {
                let col = match table.index.get(&key) {
                    Some(&col) => col,
                    None => {
                        let col = table.columns.len();
                        table.index.insert(key.clone(), col);
                        let empty = std::iter::repeat_with(|| None).take(height).collect();
                        table.columns.push((key, empty));
                        col
                    }
                };
                table.columns[col].1[pos] = Some(cell);
            }
        }

        table
    }

    /// Row keys in document order
    pub fn row_keys(&self) -> &[u32] {
        &self.row_keys
    }

    /// Column keys in first-encounter order
    pub fn column_keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.iter().map(|(k, _)| k)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows every column covers
    pub fn height(&self) -> usize {
        self.row_keys.len()
    }

    /// Whether the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty()
    }

    /// One column as (row key, cell) pairs covering every row key
    pub fn column<K: Into<ColumnKey>>(
        &self,
        key: K,
    ) -> Option<impl Iterator<Item = (u32, Option<&C>)>> {
        let col = *self.index.get(&key.into())?;
        let cells = &self.columns[col].1;
        Some(
            self.row_keys
                .iter()
                .zip(cells.iter())
                .map(|(&r, c)| (r, c.as_ref())),
        )
    }

    /// Cell at (column, row key).
    ///
    /// The outer `None` means the column or row key does not exist; the inner
    /// `None` is the absent marker for a cell missing from that row.
    pub fn get<K: Into<ColumnKey>>(&self, key: K, row_key: u32) -> Option<Option<&C>> {
        let col = *self.index.get(&key.into())?;
        let pos = self.row_keys.iter().position(|&r| r == row_key)?;
        Some(self.columns[col].1[pos].as_ref())
    }

    /// Iterate over columns in first-encounter order
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnKey, &[Option<C>])> {
        self.columns.iter().map(|(k, cells)| (k, cells.as_slice()))
    }
}
