//! Column letter arithmetic and read areas
//!
//! Columns are numbered 1-based here (A = 1, XFD = 16384), which is the
//! numbering the worksheet XML uses for `r` attributes.

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// Convert column letters to a 1-based column number.
///
/// Non-alphabetic characters are stripped first, so a whole cell reference
/// such as `"AB12"` yields the number of `AB`. Sequences past `XFD` clamp to
/// [`MAX_COLS`]; a string without letters yields 0.
///
/// ```
/// use stream_sheets_core::col_num;
///
/// assert_eq!(col_num("A"), 1);
/// assert_eq!(col_num("aa"), 27);
/// assert_eq!(col_num("XFD"), 16384);
/// assert_eq!(col_num("ZZZ"), 16384);
/// ```
pub fn col_num(letters: &str) -> u32 {
    let mut col: u32 = 0;
    for c in letters.chars().filter(char::is_ascii_alphabetic) {
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        if col > MAX_COLS {
            return MAX_COLS;
        }
    }
    col
}

/// Convert a 1-based column number to letters; empty outside `1..=16384`.
pub fn col_letter(col: u32) -> String {
    if col == 0 || col > MAX_COLS {
        return String::new();
    }

    let mut result = String::new();
    let mut n = col;
    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }
    result
}

/// Memo for column conversions.
///
/// Each reader owns its own cache, so two workbooks (or two cursors over the
/// same workbook) never share state.
#[derive(Debug, Default)]
pub struct ColumnCache {
    numbers: AHashMap<String, u32>,
    letters: AHashMap<u32, String>,
}

impl ColumnCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized [`col_num`]
    pub fn num(&mut self, letters: &str) -> u32 {
        if let Some(&n) = self.numbers.get(letters) {
            return n;
        }
        let n = col_num(letters);
        self.numbers.insert(letters.to_string(), n);
        n
    }

    /// Memoized [`col_letter`]
    pub fn letter(&mut self, col: u32) -> &str {
        self.letters
            .entry(col)
            .or_insert_with(|| col_letter(col))
            .as_str()
    }

    /// Number of memoized entries in both directions
    pub fn len(&self) -> usize {
        self.numbers.len() + self.letters.len()
    }

    /// Whether nothing has been memoized yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split an A1 cell reference into its column letters and 1-based row.
///
/// Returns `None` for anything that is not `letters` followed by a positive
/// row number, e.g. `"A0"`, `"12"` or `"A1B"`.
pub fn parse_cell_ref(s: &str) -> Option<(&str, u32)> {
    let split = s
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let (letters, digits) = s.split_at(split);
    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<u32>() {
        Ok(row) if row >= 1 => Some((letters, row)),
        _ => None,
    }
}

/// One side of a range: letters with an optional row number.
fn parse_bound(s: &str) -> Option<(u32, Option<u32>)> {
    let split = s
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let (letters, digits) = s.split_at(split);
    if letters.is_empty() {
        return None;
    }
    if digits.is_empty() {
        return Some((col_num(letters), None));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row = digits.parse::<u32>().ok().filter(|&r| r >= 1)?;
    Some((col_num(letters), Some(row.min(MAX_ROWS))))
}

/// Rectangular read window, 1-based and inclusive on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    /// First row
    pub row_min: u32,
    /// Last row
    pub row_max: u32,
    /// First column
    pub col_min: u32,
    /// Last column
    pub col_max: u32,
    /// Whether the first in-range row supplies the column keys
    pub first_row_keys: bool,
}

impl Default for Area {
    fn default() -> Self {
        Self {
            row_min: 1,
            row_max: MAX_ROWS,
            col_min: 1,
            col_max: MAX_COLS,
            first_row_keys: false,
        }
    }
}

impl Area {
    /// Parse an area specification.
    ///
    /// Accepted forms:
    /// - `"C3:AZ28"` - rectangle
    /// - `"C3"` - from C3 to the bottom-right corner of the grid
    /// - `"C:AZ"` - full-height column range
    /// - `"C"` - from column C to the last column, full height
    ///
    /// ```
    /// use stream_sheets_core::Area;
    ///
    /// let area = Area::parse("C3:E5").unwrap();
    /// assert_eq!(area.row_count(), 3);
    /// assert_eq!(area.col_count(), 3);
    /// assert!(Area::parse("C3:E").is_err());
    /// ```
    pub fn parse(spec: &str) -> Result<Self> {
        let err = || Error::AddressSyntax(spec.to_string());

        let (first, second) = match spec.split_once(':') {
            Some((a, b)) => (a, Some(b)),
            None => (spec, None),
        };
        let (col_a, row_a) = parse_bound(first).ok_or_else(err)?;

        let area = match (row_a, second) {
            (Some(row_a), None) => Area {
                row_min: row_a,
                col_min: col_a,
                ..Area::default()
            },
            (None, None) => Area {
                col_min: col_a,
                ..Area::default()
            },
            (Some(row_a), Some(second)) => match parse_bound(second).ok_or_else(err)? {
                (col_b, Some(row_b)) => Area {
                    row_min: row_a.min(row_b),
                    row_max: row_a.max(row_b),
                    col_min: col_a.min(col_b),
                    col_max: col_a.max(col_b),
                    first_row_keys: false,
                },
                (_, None) => return Err(err()),
            },
            (None, Some(second)) => match parse_bound(second).ok_or_else(err)? {
                (col_b, None) => Area {
                    col_min: col_a.min(col_b),
                    col_max: col_a.max(col_b),
                    ..Area::default()
                },
                (_, Some(_)) => return Err(err()),
            },
        };

        Ok(area)
    }

    /// Set whether the first in-range row supplies column keys
    pub fn with_first_row_keys(mut self, first_row_keys: bool) -> Self {
        self.first_row_keys = first_row_keys;
        self
    }

    /// Number of rows spanned
    pub fn row_count(&self) -> u32 {
        self.row_max - self.row_min + 1
    }

    /// Number of columns spanned
    pub fn col_count(&self) -> u32 {
        self.col_max - self.col_min + 1
    }

    /// Whether `row` lies inside the row bounds
    pub fn contains_row(&self, row: u32) -> bool {
        row >= self.row_min && row <= self.row_max
    }

    /// Whether `col` lies inside the column bounds
    pub fn contains_col(&self, col: u32) -> bool {
        col >= self.col_min && col <= self.col_max
    }

    /// Whether the cell at (`row`, `col`) lies inside the area
    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.contains_row(row) && self.contains_col(col)
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            col_letter(self.col_min),
            self.row_min,
            col_letter(self.col_max),
            self.row_max
        )
    }
}

impl FromStr for Area {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse an area specification; see [`Area::parse`]
pub fn parse_area(spec: &str) -> Result<Area> {
    Area::parse(spec)
}

/// Row and column spans of a `<dimension ref>` value such as `"A1:C10"`.
///
/// A single-cell reference spans one row and one column.
pub fn dimension_span(reference: &str) -> Option<(u32, u32)> {
    let (first, second) = match reference.split_once(':') {
        Some((a, b)) => (a, b),
        None => (reference, reference),
    };
    let (l1, r1) = parse_cell_ref(first)?;
    let (l2, r2) = parse_cell_ref(second)?;
    let rows = r2.max(r1) - r2.min(r1) + 1;
    let (c1, c2) = (col_num(l1), col_num(l2));
    let cols = c2.max(c1) - c2.min(c1) + 1;
    Some((rows, cols))
}
