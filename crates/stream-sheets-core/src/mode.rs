//! Output shaping for sheet reads
//!
//! [`ResultMode`] decides how emitted rows and cells are keyed; [`ReadOptions`]
//! bundles it with everything else a single read call takes.

use crate::row::{ColumnKey, ColumnKeyMap};

/// Legacy flag: first in-range row supplies column keys
pub const KEYS_FIRST_ROW: u32 = 1;
/// Legacy flag: rows numbered from 0, counted from the first row read
pub const KEYS_ROW_ZERO_BASED: u32 = 2;
/// Legacy flag: columns numbered from 0, counted from the first column read
pub const KEYS_COL_ZERO_BASED: u32 = 4;
/// Legacy flag: both axes zero-based
pub const KEYS_ZERO_BASED: u32 = KEYS_ROW_ZERO_BASED | KEYS_COL_ZERO_BASED;
/// Legacy flag: rows numbered from 1, counted from the first row read
pub const KEYS_ROW_ONE_BASED: u32 = 8;
/// Legacy flag: columns numbered from 1, counted from the first column read
pub const KEYS_COL_ONE_BASED: u32 = 16;
/// Legacy flag: both axes one-based
pub const KEYS_ONE_BASED: u32 = KEYS_ROW_ONE_BASED | KEYS_COL_ONE_BASED;
/// Legacy flag: numbering relative to the read area
pub const KEYS_RELATIVE: u32 = 32;
/// Legacy flag: pivot the result column-major
pub const KEYS_SWAP: u32 = 64;

/// Where numbering starts counting from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Origin {
    /// Sheet coordinates
    #[default]
    Absolute,
    /// Counted from the first row/column actually read
    Relative,
}

/// First number handed out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Base {
    #[default]
    OneBased,
    ZeroBased,
}

impl Base {
    fn offset(self) -> u32 {
        match self {
            Base::OneBased => 1,
            Base::ZeroBased => 0,
        }
    }
}

/// How columns are labelled when no explicit key applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnLabel {
    /// `"A"`, `"B"`, ...
    #[default]
    Letter,
    /// Numbers, shaped by the column origin and base
    Number,
}

/// Shape of a fully drained read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    RowsMajor,
    ColumnsMajor,
}

/// Row and column numbering for emitted keys.
///
/// The default keys rows by their sheet row number and columns by letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultMode {
    pub row_origin: Origin,
    pub row_base: Base,
    pub column_label: ColumnLabel,
    pub column_origin: Origin,
    pub column_base: Base,
    pub orientation: Orientation,
}

impl ResultMode {
    /// Relative, zero-based numbering on both axes
    pub fn zero_based() -> Self {
        Self {
            row_origin: Origin::Relative,
            row_base: Base::ZeroBased,
            column_label: ColumnLabel::Number,
            column_origin: Origin::Relative,
            column_base: Base::ZeroBased,
            orientation: Orientation::RowsMajor,
        }
    }

    /// Relative, one-based numbering on both axes
    pub fn one_based() -> Self {
        Self {
            row_base: Base::OneBased,
            column_base: Base::OneBased,
            ..Self::zero_based()
        }
    }

    /// Same numbering, pivoted column-major
    pub fn swapped(mut self) -> Self {
        self.orientation = Orientation::ColumnsMajor;
        self
    }

    /// Translate the legacy bitmask into a mode and a header-row flag.
    ///
    /// The numbering flags always count from the first row/column read, so
    /// [`KEYS_RELATIVE`] adds nothing on its own and is accepted as is.
    pub fn from_legacy_flags(flags: u32) -> (Self, bool) {
        let mut mode = ResultMode::default();

        if flags & KEYS_ROW_ZERO_BASED != 0 {
            mode.row_origin = Origin::Relative;
            mode.row_base = Base::ZeroBased;
        } else if flags & KEYS_ROW_ONE_BASED != 0 {
            mode.row_origin = Origin::Relative;
            mode.row_base = Base::OneBased;
        }

        if flags & KEYS_COL_ZERO_BASED != 0 {
            mode.column_label = ColumnLabel::Number;
            mode.column_origin = Origin::Relative;
            mode.column_base = Base::ZeroBased;
        } else if flags & KEYS_COL_ONE_BASED != 0 {
            mode.column_label = ColumnLabel::Number;
            mode.column_origin = Origin::Relative;
            mode.column_base = Base::OneBased;
        }

        if flags & KEYS_SWAP != 0 {
            mode.orientation = Orientation::ColumnsMajor;
        }

        (mode, flags & KEYS_FIRST_ROW != 0)
    }

    /// Key for sheet row `row`.
    ///
    /// `origin` is the first data row of the read; it is only consulted for
    /// a relative row origin.
    pub fn row_key(&self, row: u32, origin: u32) -> u32 {
        match self.row_origin {
            Origin::Absolute => row + self.row_base.offset() - 1,
            Origin::Relative => row.saturating_sub(origin) + self.row_base.offset(),
        }
    }

    /// Numeric label for column `col` when columns are numbered
    pub fn column_number(&self, col: u32, origin: u32) -> u32 {
        match self.column_origin {
            Origin::Absolute => col + self.column_base.offset() - 1,
            Origin::Relative => col.saturating_sub(origin) + self.column_base.offset(),
        }
    }

    /// Key for a column derived from its letter and number
    pub fn column_key(&self, letter: &str, col: u32, origin: u32) -> ColumnKey {
        match self.column_label {
            ColumnLabel::Letter => ColumnKey::Name(letter.to_string()),
            ColumnLabel::Number => ColumnKey::Number(self.column_number(col, origin) as i64),
        }
    }
}

/// Options for one read call.
///
/// ```
/// use stream_sheets_core::{ReadOptions, ResultMode};
///
/// let opts = ReadOptions::new()
///     .header_row(true)
///     .mode(ResultMode::zero_based())
///     .limit(100);
/// assert!(opts.header_row);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadOptions {
    /// Explicit column letter → key map; wins over any derived key
    pub column_keys: ColumnKeyMap,
    /// Take column keys from the first in-range row and drop it from the data
    pub header_row: bool,
    /// Numbering and orientation
    pub mode: ResultMode,
    /// Attach each cell's raw style index
    pub include_styles: bool,
    /// Maximum number of data rows to emit
    pub limit: Option<usize>,
}

impl ReadOptions {
    /// Default options: absolute row numbers, letter column keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Options from a legacy flag combination
    pub fn from_legacy_flags(flags: u32) -> Self {
        let (mode, header_row) = ResultMode::from_legacy_flags(flags);
        Self {
            mode,
            header_row,
            ..Self::default()
        }
    }

    /// Set the explicit column key map
    pub fn column_keys(mut self, keys: ColumnKeyMap) -> Self {
        self.column_keys = keys;
        self
    }

    /// Map a single column letter to a key
    pub fn column_key<K: Into<ColumnKey>>(mut self, letter: &str, key: K) -> Self {
        self.column_keys.insert(letter, key);
        self
    }

    /// Use the first in-range row as header
    pub fn header_row(mut self, header_row: bool) -> Self {
        self.header_row = header_row;
        self
    }

    /// Set the result mode
    pub fn mode(mut self, mode: ResultMode) -> Self {
        self.mode = mode;
        self
    }

    /// Attach raw style indices to cells
    pub fn include_styles(mut self, include_styles: bool) -> Self {
        self.include_styles = include_styles;
        self
    }

    /// Stop after `limit` data rows
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
