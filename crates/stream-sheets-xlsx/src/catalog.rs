//! Workbook bootstrap: package listing, relationships, sheet registry,
//! shared strings and style tables
//!
//! Everything here is read once when a workbook is opened and stays
//! read-only afterwards.

use std::io::{Read, Seek};
use std::sync::Arc;

use log::{debug, warn};
use stream_sheets_core::{DateSystem, RawStyleTable, StyleHint, WorkbookSettings};
use zip::ZipArchive;

use crate::error::{XlsxError, XlsxResult};
use crate::part::{decode_excel_escapes, PartCursor};
use crate::styles::{read_styles_xml, style_hints};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const STYLES_PART: &str = "xl/styles.xml";

/// One `<Relationship>` of a `.rels` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    /// Last segment of the relationship type URI (`worksheet`, `styles`, ...)
    pub kind: String,
    /// Target resolved to a path inside the package
    pub target: String,
}

/// A sheet as registered in `xl/workbook.xml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    pub sheet_id: u32,
    /// Worksheet part, e.g. `xl/worksheets/sheet1.xml`
    pub path: String,
}

/// Read-only lookups shared by every read on a workbook
#[derive(Debug, Default)]
pub struct Catalog {
    pub files: Vec<String>,
    pub sheets: Vec<SheetEntry>,
    pub shared_strings: Vec<String>,
    pub styles: Arc<RawStyleTable>,
    /// Date hint per cellXfs index
    pub hints: Vec<Option<StyleHint>>,
    pub settings: WorkbookSettings,
}

impl Catalog {
    /// Bootstrap from an opened package
    pub fn load<R: Read + Seek>(archive: &mut ZipArchive<R>) -> XlsxResult<Self> {
        let files: Vec<String> = archive.file_names().map(str::to_string).collect();
        if !files.iter().any(|f| f == WORKBOOK_PART) {
            return Err(XlsxError::MissingPart(WORKBOOK_PART.into()));
        }

        let rels = read_relationships(archive, WORKBOOK_RELS_PART)?;
        let (sheets, date_system) = read_workbook_xml(archive, &rels)?;

        let strings_part = part_for(&rels, &files, "sharedStrings", SHARED_STRINGS_PART);
        let shared_strings = match strings_part {
            Some(path) => read_shared_strings(archive, &path)?,
            None => Vec::new(),
        };

        let styles = match part_for(&rels, &files, "styles", STYLES_PART) {
            Some(path) => {
                let mut part = PartCursor::open(archive, &path)?;
                read_styles_xml(&mut part)?
            }
            None => RawStyleTable::default(),
        };
        let hints = style_hints(&styles);

        debug!(
            "workbook bootstrap: {} parts, {} sheets, {} shared strings, {} cell styles, {:?}",
            files.len(),
            sheets.len(),
            shared_strings.len(),
            styles.cell_xfs.len(),
            date_system
        );

        Ok(Catalog {
            files,
            sheets,
            shared_strings,
            styles: Arc::new(styles),
            hints,
            settings: WorkbookSettings::new(date_system),
        })
    }

    /// Whether the package contains `path`
    pub fn has_file(&self, path: &str) -> bool {
        self.files.iter().any(|f| f == path)
    }

    /// Shared string by index
    pub fn shared_string(&self, index: usize) -> Option<&str> {
        self.shared_strings.get(index).map(String::as_str)
    }

    /// Date hint for a cellXfs index
    pub fn hint(&self, style: u32) -> Option<&StyleHint> {
        self.hints.get(style as usize).and_then(Option::as_ref)
    }
}

/// Part for a relationship kind, falling back to its conventional location
fn part_for(rels: &[Relationship], files: &[String], kind: &str, default: &str) -> Option<String> {
    rels.iter()
        .find(|r| r.kind == kind)
        .map(|r| r.target.clone())
        .filter(|t| files.contains(t))
        .or_else(|| files.iter().find(|f| *f == default).cloned())
}

/// Directory of a part: `xl/worksheets/sheet1.xml` → `xl/worksheets`
fn part_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// `.rels` part describing `path`: `xl/workbook.xml` → `xl/_rels/workbook.xml.rels`
pub(crate) fn rels_path_for(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", path),
    }
}

/// Resolve a relationship target against the directory of its source part
pub(crate) fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Read a `.rels` part. The source part is derived from the rels path.
pub(crate) fn read_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    rels_path: &str,
) -> XlsxResult<Vec<Relationship>> {
    // xl/_rels/workbook.xml.rels describes parts relative to xl/
    let base_dir = part_dir(part_dir(rels_path));
    let mut part = PartCursor::open(archive, rels_path)?;
    let mut rels = Vec::new();

    while let Some(node) = part.seek_start("Relationship")? {
        let (Some(id), Some(target)) = (node.attr("Id"), node.attr("Target")) else {
            continue;
        };
        let kind = node
            .attr("Type")
            .and_then(|t| t.rsplit('/').next())
            .unwrap_or_default();
        let target = if node.attr("TargetMode") == Some("External") {
            target.to_string()
        } else {
            resolve_target(base_dir, target)
        };
        rels.push(Relationship {
            id: id.to_string(),
            kind: kind.to_string(),
            target,
        });
    }

    Ok(rels)
}

fn read_workbook_xml<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    rels: &[Relationship],
) -> XlsxResult<(Vec<SheetEntry>, DateSystem)> {
    let mut part = PartCursor::open(archive, WORKBOOK_PART)?;
    let mut sheets = Vec::new();
    let mut date_1904 = false;

    while let Some(node) = part.next_node()? {
        if node.opens("workbookPr") {
            date_1904 = matches!(node.attr("date1904"), Some("1") | Some("true"));
        } else if node.opens("sheet") {
            let Some(name) = node.attr("name") else {
                continue;
            };
            let sheet_id = node
                .attr("sheetId")
                .and_then(|id| id.parse::<u32>().ok())
                .unwrap_or(sheets.len() as u32 + 1);
            let path = node
                .attr("r:id")
                .and_then(|rid| rels.iter().find(|r| r.id == rid && r.kind == "worksheet"));
            match path {
                Some(rel) => sheets.push(SheetEntry {
                    name: name.to_string(),
                    sheet_id,
                    path: rel.target.clone(),
                }),
                None => warn!("sheet \"{}\" has no worksheet relationship, skipped", name),
            }
        } else if node.closes("sheets") {
            break;
        }
    }

    Ok((sheets, DateSystem::from_1904_flag(date_1904)))
}

fn read_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> XlsxResult<Vec<String>> {
    let mut part = PartCursor::open(archive, path)?;
    let mut strings = Vec::new();

    while let Some(node) = part.next_node()? {
        if node.opens("sst") {
            if let Some(n) = node.attr("uniqueCount").and_then(|n| n.parse::<usize>().ok()) {
                strings.reserve(n);
            }
        } else if node.opens("si") {
            // Phonetic runs (<rPh>) are reading aids, not part of the text
            let si = part.expand(node)?;
            let text = si.text_skipping(&["rPh"]);
            strings.push(decode_excel_escapes(&text).into_owned());
        }
    }

    Ok(strings)
}
