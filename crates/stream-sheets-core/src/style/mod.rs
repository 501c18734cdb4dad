//! Cell formatting records
//!
//! This module contains the tables read from `xl/styles.xml` and the record a
//! style index resolves to:
//! - [`RawStyleTable`] - numFmts, fonts, fills, borders and both xf tables
//! - [`XfEntry`] - one `<xf>` of `cellXfs` or `cellStyleXfs`
//! - [`ResolvedStyle`] - merged `format`/`font`/`fill`/`border` groups
//! - [`StyleHint`] - the date flag consulted while decoding values
//!
//! Formatting properties are kept as named values (`font-size`,
//! `fill-color`, `border-left-style`, `format-pattern`, ...), grouped by the
//! table they come from.

mod number_format;

use std::collections::BTreeMap;
use std::fmt;

use ahash::AHashMap;

pub use number_format::{is_builtin_date_format, is_date_format_code, StyleHint};

/// One formatting property value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StyleValue {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Present but unset, e.g. a border side without a style
    Null,
}

impl StyleValue {
    /// The value as a string slice, if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an integer, if it is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            StyleValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as a boolean, if it is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StyleValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StyleValue::Null)
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Str(s) => write!(f, "{}", s),
            StyleValue::Int(n) => write!(f, "{}", n),
            StyleValue::Bool(b) => write!(f, "{}", b),
            StyleValue::Null => Ok(()),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Str(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Str(s)
    }
}

impl From<i64> for StyleValue {
    fn from(n: i64) -> Self {
        StyleValue::Int(n)
    }
}

impl From<bool> for StyleValue {
    fn from(b: bool) -> Self {
        StyleValue::Bool(b)
    }
}

/// Property name → value, ordered by name
pub type StyleGroup = BTreeMap<String, StyleValue>;

/// Merge `over` into `base`, key by key; `over` wins on collisions
pub fn merge_group(base: &mut StyleGroup, over: &StyleGroup) {
    for (k, v) in over {
        base.insert(k.clone(), v.clone());
    }
}

/// One `<xf>` record of `cellXfs` or `cellStyleXfs`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XfEntry {
    pub num_fmt_id: Option<u32>,
    pub font_id: Option<u32>,
    pub fill_id: Option<u32>,
    pub border_id: Option<u32>,
    /// Parent entry in `cellStyleXfs`
    pub xf_id: Option<u32>,
    /// `format-align-horizontal`, `format-align-vertical`, `format-wrap-text`
    pub alignment: StyleGroup,
}

impl XfEntry {
    /// Overlay `other` on this entry: its ids replace ours where present
    /// and its alignment merges key by key.
    pub fn merge(&mut self, other: &XfEntry) {
        self.num_fmt_id = other.num_fmt_id.or(self.num_fmt_id);
        self.font_id = other.font_id.or(self.font_id);
        self.fill_id = other.fill_id.or(self.fill_id);
        self.border_id = other.border_id.or(self.border_id);
        self.xf_id = other.xf_id.or(self.xf_id);
        merge_group(&mut self.alignment, &other.alignment);
    }
}

/// Every table of `xl/styles.xml` the cascade draws from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStyleTable {
    /// Custom number formats: numFmtId → format code
    pub num_fmts: AHashMap<u32, String>,
    pub fonts: Vec<StyleGroup>,
    pub fills: Vec<StyleGroup>,
    pub borders: Vec<StyleGroup>,
    /// Per-cell styles, indexed by a cell's `s` attribute
    pub cell_xfs: Vec<XfEntry>,
    /// Named (parent) styles, indexed by `xfId`
    pub cell_style_xfs: Vec<XfEntry>,
}

impl RawStyleTable {
    /// Format group for a numFmtId.
    ///
    /// A custom code yields `format-num-id` and `format-pattern`, plus
    /// `format-date` when the code is a date format; a built-in date id
    /// yields `format-num-id` and `format-date` only. Anything else has no
    /// format contribution.
    pub fn num_fmt_group(&self, id: u32) -> Option<StyleGroup> {
        let hint = StyleHint::from_num_fmt(id, &self.num_fmts)?;
        let mut group = StyleGroup::new();
        group.insert("format-num-id".into(), StyleValue::Int(id as i64));
        if let Some(code) = hint.format_code {
            group.insert("format-pattern".into(), StyleValue::Str(code));
        }
        if hint.is_date {
            group.insert("format-date".into(), StyleValue::Bool(true));
        }
        Some(group)
    }
}

/// A style index after cascading
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedStyle {
    /// Number format and alignment
    pub format: StyleGroup,
    pub font: StyleGroup,
    pub fill: StyleGroup,
    pub border: StyleGroup,
}

impl ResolvedStyle {
    /// Whether no group holds a property
    pub fn is_empty(&self) -> bool {
        self.format.is_empty() && self.font.is_empty() && self.fill.is_empty() && self.border.is_empty()
    }

    /// Collapse the groups into one mapping.
    ///
    /// Groups apply in the order font, fill, border, format; later groups
    /// overwrite colliding keys.
    pub fn flatten(&self) -> StyleGroup {
        let mut flat = StyleGroup::new();
        for group in [&self.font, &self.fill, &self.border, &self.format] {
            merge_group(&mut flat, group);
        }
        flat
    }

    /// Whether the number format displays dates
    pub fn is_date(&self) -> bool {
        self.format
            .get("format-date")
            .and_then(StyleValue::as_bool)
            .unwrap_or(false)
    }
}
