//! Cell value decoding

use stream_sheets_core::date::{format_timestamp, timestamp};
use stream_sheets_core::CellValue;

use crate::catalog::Catalog;
use crate::part::{decode_excel_escapes, XmlElement};

/// Declared type of a `<c>` element (its `t` attribute)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellKind {
    /// `n` or no attribute
    Number,
    /// `s`: `<v>` is an index into the shared strings
    SharedString,
    /// `inlineStr`: text lives in `<is>`
    InlineString,
    /// `str`: cached formula result
    FormulaString,
    /// `b`
    Boolean,
    /// `e`
    Error,
    /// `d`: ISO 8601 date text
    Date,
}

impl CellKind {
    pub(crate) fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("s") => CellKind::SharedString,
            Some("inlineStr") => CellKind::InlineString,
            Some("str") => CellKind::FormulaString,
            Some("b") => CellKind::Boolean,
            Some("e") => CellKind::Error,
            Some("d") => CellKind::Date,
            _ => CellKind::Number,
        }
    }
}

/// Style index (`s` attribute) of a cell, 0 when absent
pub(crate) fn style_index(cell: &XmlElement) -> u32 {
    cell.attr("s").and_then(|s| s.parse().ok()).unwrap_or(0)
}

/// Decode an expanded `<c>` element
pub(crate) fn decode_cell(cell: &XmlElement, catalog: &Catalog) -> CellValue {
    let kind = CellKind::from_tag(cell.attr("t"));
    let style = style_index(cell);

    let text = match (kind, cell.child("is")) {
        (CellKind::InlineString, Some(is)) => {
            decode_excel_escapes(&is.text_skipping(&["rPh"])).into_owned()
        }
        _ => cell.child("v").map(XmlElement::text_content).unwrap_or_default(),
    };

    interpret(kind, &text, style, catalog)
}

/// Turn a cell's text into a typed value.
///
/// `text` is the `<v>` content, or the concatenated `<is>` text for inline
/// strings. Shared string indices and date hints come from `catalog`.
pub(crate) fn interpret(kind: CellKind, text: &str, style: u32, catalog: &Catalog) -> CellValue {
    match kind {
        CellKind::Boolean => return CellValue::Boolean(!text.is_empty() && text != "0"),
        CellKind::InlineString => return CellValue::Text(text.to_string()),
        CellKind::Error => return CellValue::ErrorCode(text.to_string()),
        CellKind::Date => {
            return match timestamp(text, catalog.settings.date_system) {
                Some(secs) => date_value(secs, catalog),
                None => CellValue::Text(text.to_string()),
            }
        }
        _ => {}
    }

    let shared = || {
        text.trim()
            .parse::<usize>()
            .ok()
            .and_then(|i| catalog.shared_string(i))
    };

    let date_hinted = matches!(kind, CellKind::Number | CellKind::SharedString)
        && style > 0
        && !text.is_empty()
        && catalog.hint(style).is_some_and(|h| h.is_date);
    if date_hinted {
        let source = match kind {
            CellKind::SharedString => shared().unwrap_or(text),
            _ => text,
        };
        if let Some(secs) = timestamp(source, catalog.settings.date_system) {
            return date_value(secs, catalog);
        }
    }

    if kind == CellKind::SharedString {
        return CellValue::Text(shared().unwrap_or(text).to_string());
    }

    coerce_number(text)
}

/// Epoch seconds, or text when the workbook renders dates
fn date_value(secs: i64, catalog: &Catalog) -> CellValue {
    catalog
        .settings
        .date_format
        .as_deref()
        .and_then(|pattern| format_timestamp(secs, pattern))
        .map_or(CellValue::DateSeconds(secs), CellValue::Text)
}

/// Integer if the text is exactly one, then a finite float, else the text
fn coerce_number(text: &str) -> CellValue {
    if let Ok(n) = text.parse::<i64>() {
        return CellValue::Integer(n);
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => {
            // 2^53: past this not every integer is representable
            if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
                CellValue::Integer(f as i64)
            } else {
                CellValue::Float(f)
            }
        }
        _ => CellValue::Text(text.to_string()),
    }
}
