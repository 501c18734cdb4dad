//! Cell value types

use std::fmt;

/// Typed value decoded from one worksheet cell
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Number that is exactly an integer
    Integer(i64),

    /// Any other finite number
    Float(f64),

    /// String value
    Text(String),

    /// Error literal as written by the producer (`#DIV/0!`, `#N/A`, ...)
    ErrorCode(String),

    /// Date-time as Unix epoch seconds (UTC)
    DateSeconds(i64),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the cell holds an error literal
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::ErrorCode(_))
    }

    /// Check if the cell was decoded as a date
    pub fn is_date(&self) -> bool {
        matches!(self, CellValue::DateSeconds(_))
    }

    /// Check if the cell is a number of either kind
    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }

    /// Try to get the value as a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(n) => Some(*n as f64),
            CellValue::Float(n) => Some(*n),
            CellValue::Boolean(true) => Some(1.0),
            CellValue::Boolean(false) => Some(0.0),
            _ => None,
        }
    }

    /// Try to get the value as an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(n) => Some(*n),
            CellValue::DateSeconds(n) => Some(*n),
            CellValue::Boolean(b) => Some(*b as i64),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            CellValue::Integer(n) => Some(*n != 0),
            CellValue::Float(n) => Some(*n != 0.0),
            _ => None,
        }
    }

    /// Try to get the value as a string slice (text and error literals)
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) | CellValue::ErrorCode(s) => Some(s),
            _ => None,
        }
    }

    /// Epoch seconds if this is a date
    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            CellValue::DateSeconds(t) => Some(*t),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Boolean(_) => "boolean",
            CellValue::Integer(_) => "integer",
            CellValue::Float(_) => "float",
            CellValue::Text(_) => "text",
            CellValue::ErrorCode(_) => "error",
            CellValue::DateSeconds(_) => "date",
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Float(n) => write!(f, "{}", n),
            CellValue::Text(s) | CellValue::ErrorCode(s) => write!(f, "{}", s),
            CellValue::DateSeconds(t) => write!(f, "{}", t),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Integer(n as i64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// A decoded cell: its value plus, when requested, the raw style index
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Decoded value
    pub value: CellValue,
    /// `s` attribute of the cell (cellXfs index), only filled when asked for
    pub style: Option<u32>,
}

impl Cell {
    /// Cell without style information
    pub fn new<V: Into<CellValue>>(value: V) -> Self {
        Self {
            value: value.into(),
            style: None,
        }
    }

    /// Cell carrying its raw style index
    pub fn with_style<V: Into<CellValue>>(value: V, style: u32) -> Self {
        Self {
            value: value.into(),
            style: Some(style),
        }
    }
}

impl From<CellValue> for Cell {
    fn from(value: CellValue) -> Self {
        Cell { value, style: None }
    }
}
