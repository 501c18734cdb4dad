//! Number format classification

use ahash::AHashMap;

/// Built-in format ids that display dates or times (14-22 and 45-47)
pub fn is_builtin_date_format(id: u32) -> bool {
    matches!(id, 14..=22 | 45..=47)
}

/// Whether a custom format code displays a date or time.
///
/// A month or minute token (`m`/`M`) outside quoted literals, bracketed
/// sections (`[Red]`, `[$-409]`) and backslash escapes marks the code as a
/// date format.
///
/// ```
/// use stream_sheets_core::style::is_date_format_code;
///
/// assert!(is_date_format_code("dd/mm/yyyy"));
/// assert!(is_date_format_code("[h]:mm:ss"));
/// assert!(!is_date_format_code("[Red]0.00"));
/// assert!(!is_date_format_code("0.00\" mm\""));
/// ```
pub fn is_date_format_code(code: &str) -> bool {
    let mut chars = code.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '[' => {
                for q in chars.by_ref() {
                    if q == ']' {
                        break;
                    }
                }
            }
            '\\' => {
                chars.next();
            }
            'm' | 'M' => return true,
            _ => {}
        }
    }
    false
}

/// Lightweight per-xf format information used while decoding values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleHint {
    /// Values under this style are dates
    pub is_date: bool,
    /// Custom format code, when the format is not built in
    pub format_code: Option<String>,
}

impl StyleHint {
    /// Hint for an xf referencing `num_fmt_id`.
    ///
    /// Returns `None` when the id is neither a custom format nor a built-in
    /// date format.
    pub fn from_num_fmt(num_fmt_id: u32, custom: &AHashMap<u32, String>) -> Option<Self> {
        if let Some(code) = custom.get(&num_fmt_id) {
            return Some(StyleHint {
                is_date: is_date_format_code(code),
                format_code: Some(code.clone()),
            });
        }
        if is_builtin_date_format(num_fmt_id) {
            return Some(StyleHint {
                is_date: true,
                format_code: None,
            });
        }
        None
    }
}
