//! XLSX styles (styles.xml) reader

use stream_sheets_core::style::{RawStyleTable, StyleGroup, StyleHint, StyleValue, XfEntry};

use crate::error::XlsxResult;
use crate::part::{PartCursor, XmlElement};

/// Read every table of `xl/styles.xml` in one pass.
///
/// Each table element is expanded as a whole, so the cursor never has to
/// track which container a `<font>` or `<xf>` belongs to. Tables this
/// reader does not use (`dxfs`, `cellStyles`, `colors`) are walked past.
pub(crate) fn read_styles_xml(part: &mut PartCursor<'_>) -> XlsxResult<RawStyleTable> {
    let mut table = RawStyleTable::default();

    while let Some(node) = part.next_node()? {
        if node.kind == crate::part::NodeKind::End {
            continue;
        }
        match node.name.as_str() {
            "numFmts" => {
                let el = part.expand(node)?;
                for fmt in el.elements().filter(|e| e.name == "numFmt") {
                    let id = fmt.attr("numFmtId").and_then(|v| v.parse::<u32>().ok());
                    let code = fmt.attr("formatCode").filter(|c| !c.is_empty());
                    if let (Some(id), Some(code)) = (id, code) {
                        table.num_fmts.insert(id, code.to_string());
                    }
                }
            }
            "fonts" => {
                let el = part.expand(node)?;
                table.fonts = el.elements().map(font_group).collect();
            }
            "fills" => {
                let el = part.expand(node)?;
                table.fills = el.elements().map(fill_group).collect();
            }
            "borders" => {
                let el = part.expand(node)?;
                table.borders = el.elements().map(border_group).collect();
            }
            "cellStyleXfs" => {
                let el = part.expand(node)?;
                table.cell_style_xfs = el.elements().map(xf_entry).collect();
            }
            "cellXfs" => {
                let el = part.expand(node)?;
                table.cell_xfs = el.elements().map(xf_entry).collect();
            }
            "dxfs" => {
                // differential formats repeat font/fill/border names; skip the subtree
                part.expand(node)?;
            }
            _ => {}
        }
    }

    Ok(table)
}

/// Date hint per cellXfs entry, from its own numFmtId
pub(crate) fn style_hints(table: &RawStyleTable) -> Vec<Option<StyleHint>> {
    table
        .cell_xfs
        .iter()
        .map(|xf| StyleHint::from_num_fmt(xf.num_fmt_id.unwrap_or(0), &table.num_fmts))
        .collect()
}

/// `#RRGGBB` from an ARGB `rgb` attribute
fn rgb_color(el: &XmlElement) -> Option<StyleValue> {
    let rgb = el.attr("rgb")?;
    let rgb = rgb.get(2..).filter(|s| !s.is_empty())?;
    Some(StyleValue::Str(format!("#{}", rgb)))
}

/// `<b/>`, `<b val="1"/>` are on; `<b val="0"/>` is off
fn flag_on(el: &XmlElement) -> bool {
    !matches!(el.attr("val"), Some("0") | Some("false"))
}

fn font_group(font: &XmlElement) -> StyleGroup {
    let mut group = StyleGroup::new();
    for prop in font.elements() {
        match prop.name.as_str() {
            "b" | "i" | "strike" => {
                if flag_on(prop) {
                    let key = match prop.name.as_str() {
                        "b" => "font-style-bold",
                        "i" => "font-style-italic",
                        _ => "font-style-strike",
                    };
                    group.insert(key.into(), StyleValue::Int(1));
                }
            }
            "u" => {
                let level = match prop.attr("val") {
                    Some("none") => None,
                    Some("double") | Some("doubleAccounting") => Some(2),
                    _ => Some(1),
                };
                if let Some(level) = level {
                    group.insert("font-style-underline".into(), StyleValue::Int(level));
                }
            }
            "color" => {
                if let Some(color) = rgb_color(prop) {
                    group.insert("font-color".into(), color);
                }
            }
            name => {
                if let Some(val) = prop.attr("val").filter(|v| !v.is_empty()) {
                    let key = if name == "sz" {
                        "font-size".to_string()
                    } else {
                        format!("font-{}", name)
                    };
                    group.insert(key, StyleValue::from(val));
                }
            }
        }
    }
    group
}

fn fill_group(fill: &XmlElement) -> StyleGroup {
    let mut group = StyleGroup::new();
    for pattern in fill.elements() {
        if let Some(kind) = pattern.attr("patternType").filter(|v| !v.is_empty()) {
            group.insert("fill-pattern".into(), StyleValue::from(kind));
        }
        if let Some(color) = pattern.child("fgColor").and_then(rgb_color) {
            group.insert("fill-color".into(), color);
        }
    }
    group
}

fn border_group(border: &XmlElement) -> StyleGroup {
    let mut group = StyleGroup::new();
    for side in border.elements() {
        let style = match side.attr("style").filter(|v| !v.is_empty()) {
            Some(style) => StyleValue::from(style),
            None => StyleValue::Null,
        };
        group.insert(format!("border-{}-style", side.name), style);
        if let Some(color) = side.child("color").and_then(rgb_color) {
            group.insert(format!("border-{}-color", side.name), color);
        }
    }
    group
}

fn xf_entry(xf: &XmlElement) -> XfEntry {
    let id = |name: &str| xf.attr(name).and_then(|v| v.parse::<u32>().ok());
    let mut entry = XfEntry {
        num_fmt_id: id("numFmtId"),
        font_id: id("fontId"),
        fill_id: id("fillId"),
        border_id: id("borderId"),
        xf_id: id("xfId"),
        alignment: StyleGroup::new(),
    };

    if let Some(align) = xf.child("alignment") {
        if let Some(h) = align.attr("horizontal").filter(|v| !v.is_empty()) {
            entry
                .alignment
                .insert("format-align-horizontal".into(), StyleValue::from(h));
        }
        if let Some(v) = align.attr("vertical").filter(|v| !v.is_empty()) {
            entry
                .alignment
                .insert("format-align-vertical".into(), StyleValue::from(v));
        }
        if let Some(wrap) = align.attr("wrapText") {
            let on = matches!(wrap, "1" | "true");
            entry
                .alignment
                .insert("format-wrap-text".into(), StyleValue::Bool(on));
        }
    }

    entry
}
