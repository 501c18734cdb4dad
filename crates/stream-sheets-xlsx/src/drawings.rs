//! Pictures anchored on a worksheet
//!
//! A worksheet points at a drawing part through its relationships; the
//! drawing anchors each picture at a cell and names its media part through
//! the drawing's own relationships.

use std::io::{Read, Seek};

use ahash::AHashMap;
use log::{debug, trace};
use stream_sheets_core::col_letter;
use zip::ZipArchive;

use crate::catalog::{read_relationships, rels_path_for, Catalog};
use crate::error::XlsxResult;
use crate::part::{PartCursor, XmlElement};

/// A picture anchored on a worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetImage {
    /// Anchor cell, e.g. `"B3"`
    pub cell: String,
    /// 1-based anchor row
    pub row: u32,
    /// 1-based anchor column
    pub col: u32,
    /// Picture name from the drawing, or the anchor cell when unnamed
    pub name: String,
    /// Media part inside the package, e.g. `xl/media/image1.png`
    pub target: String,
}

impl SheetImage {
    /// File name of the media part
    pub fn file_name(&self) -> &str {
        self.target.rsplit('/').next().unwrap_or(&self.target)
    }
}

/// Drawing part attached to a worksheet, if any
pub(crate) fn drawing_part_for<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    catalog: &Catalog,
    sheet_path: &str,
) -> XlsxResult<Option<String>> {
    let rels_path = rels_path_for(sheet_path);
    if catalog.has_file(&rels_path) {
        let rels = read_relationships(archive, &rels_path)?;
        if let Some(rel) = rels.iter().find(|r| r.kind == "drawing") {
            if catalog.has_file(&rel.target) {
                return Ok(Some(rel.target.clone()));
            }
        }
    }

    // sheetN.xml conventionally pairs with drawingN.xml
    let guess = sheet_path.replace("/worksheets/sheet", "/drawings/drawing");
    Ok(catalog.has_file(&guess).then_some(guess))
}

/// Read every cell-anchored picture of a drawing part.
///
/// Pictures whose media relationship cannot be resolved are left out. Two
/// pictures anchored at the same cell keep the later one.
pub(crate) fn read_images<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    catalog: &Catalog,
    drawing_path: &str,
) -> XlsxResult<Vec<SheetImage>> {
    let anchors = read_anchors(archive, drawing_path)?;
    if anchors.is_empty() {
        return Ok(Vec::new());
    }

    let rels_path = rels_path_for(drawing_path);
    let targets: AHashMap<String, String> = if catalog.has_file(&rels_path) {
        read_relationships(archive, &rels_path)?
            .into_iter()
            .map(|r| (r.id, r.target))
            .collect()
    } else {
        AHashMap::new()
    };

    let mut images: Vec<SheetImage> = Vec::new();
    for anchor in anchors {
        let Some(target) = targets.get(&anchor.embed) else {
            trace!("picture {:?} has no media relationship", anchor.embed);
            continue;
        };
        let cell = format!("{}{}", col_letter(anchor.col), anchor.row);
        let image = SheetImage {
            name: anchor.name.unwrap_or_else(|| cell.clone()),
            cell,
            row: anchor.row,
            col: anchor.col,
            target: target.clone(),
        };
        match images.iter_mut().find(|i| i.cell == image.cell) {
            Some(existing) => *existing = image,
            None => images.push(image),
        }
    }

    debug!("{} images in {}", images.len(), drawing_path);
    Ok(images)
}

struct Anchor {
    row: u32,
    col: u32,
    name: Option<String>,
    embed: String,
}

fn read_anchors<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    drawing_path: &str,
) -> XlsxResult<Vec<Anchor>> {
    let mut part = PartCursor::open(archive, drawing_path)?;
    let mut anchors = Vec::new();

    while let Some(node) = part.next_node()? {
        if node.opens("twoCellAnchor") || node.opens("oneCellAnchor") {
            let el = part.expand(node)?;
            if let Some(anchor) = anchor_from(&el) {
                anchors.push(anchor);
            }
        }
    }

    Ok(anchors)
}

fn anchor_from(el: &XmlElement) -> Option<Anchor> {
    let pic = el.child("pic")?;
    let embed = pic.find("blip")?.attr("r:embed")?.to_string();
    let index = |name: &str| {
        el.descend(&["from", name])
            .and_then(|e| e.text_content().trim().parse::<u32>().ok())
    };
    let name = pic
        .find("cNvPr")
        .and_then(|e| e.attr("name"))
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    Some(Anchor {
        // <from> indices are 0-based
        row: index("row")?.checked_add(1)?,
        col: index("col")?.checked_add(1)?,
        name,
        embed,
    })
}
