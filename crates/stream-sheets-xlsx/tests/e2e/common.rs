//! Common utilities for E2E tests.

use std::io::{Cursor, Write};

use stream_sheets_xlsx::Workbook;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Style sheet shared by the formatting and date tests.
///
/// cellXfs: 0 plain, 1 built-in date (14), 2 custom date (164), 3 bordered
/// and centered under the "Accent" named style, 4 custom percent (165).
pub const STYLES_XML: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<numFmts count="2"><numFmt numFmtId="164" formatCode="yyyy\-mm\-dd hh:mm"/><numFmt numFmtId="165" formatCode="0.00%"/></numFmts>
<fonts count="2">
<font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/></font>
<font><b/><sz val="14"/><color rgb="FFFF0000"/><name val="Arial"/></font>
</fonts>
<fills count="3">
<fill><patternFill patternType="none"/></fill>
<fill><patternFill patternType="gray125"/></fill>
<fill><patternFill patternType="solid"><fgColor rgb="FFFFFF00"/><bgColor indexed="64"/></patternFill></fill>
</fills>
<borders count="2">
<border><left/><right/><top/><bottom/><diagonal/></border>
<border><left style="thin"><color rgb="FF000000"/></left><right/><top/><bottom/><diagonal/></border>
</borders>
<cellStyleXfs count="2">
<xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
<xf numFmtId="0" fontId="1" fillId="2" borderId="0"/>
</cellStyleXfs>
<cellXfs count="5">
<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
<xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
<xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
<xf numFmtId="0" fontId="0" fillId="0" borderId="1" xfId="1" applyBorder="1" applyAlignment="1"><alignment horizontal="center" wrapText="1"/></xf>
<xf numFmtId="165" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
</cellXfs>
<cellStyles count="2"><cellStyle name="Normal" xfId="0" builtinId="0"/><cellStyle name="Accent" xfId="1"/></cellStyles>
<dxfs count="1"><dxf><font><b/></font></dxf></dxfs>
</styleSheet>"##;

/// In-memory xlsx package builder.
///
/// Sheets land at `xl/worksheets/sheetN.xml` in the order they are added.
///
/// ```rust,ignore
/// let mut workbook = XlsxFixture::new()
///     .sheet("Data", &worksheet(&[row(1, &[num("A1", "42")])]))
///     .open();
/// ```
#[derive(Debug, Default, Clone)]
pub struct XlsxFixture {
    sheets: Vec<(String, u32, String)>,
    shared_strings: Vec<String>,
    styles: Option<String>,
    date_1904: bool,
    files: Vec<(String, Vec<u8>)>,
}

impl XlsxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worksheet; its sheetId is its position (1-based)
    pub fn sheet(self, name: &str, xml: &str) -> Self {
        let id = self.sheets.len() as u32 + 1;
        self.sheet_with_id(name, id, xml)
    }

    /// Add a worksheet with an explicit sheetId
    pub fn sheet_with_id(mut self, name: &str, id: u32, xml: &str) -> Self {
        self.sheets.push((name.to_string(), id, xml.to_string()));
        self
    }

    /// Set the shared string table
    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        self.shared_strings = strings.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Set `xl/styles.xml`
    pub fn styles(mut self, xml: &str) -> Self {
        self.styles = Some(xml.to_string());
        self
    }

    /// Use the 1904 date system
    pub fn date_1904(mut self) -> Self {
        self.date_1904 = true;
        self
    }

    /// Add any other part (drawings, media, sheet relationships)
    pub fn file(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.files.push((path.to_string(), contents.into()));
        self
    }

    /// Zip the package
    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default();
            let mut put = |path: &str, data: &[u8]| {
                zip.start_file(path, options).unwrap();
                zip.write_all(data).unwrap();
            };

            put("[Content_Types].xml", CONTENT_TYPES.as_bytes());
            put("_rels/.rels", ROOT_RELS.as_bytes());
            put("xl/workbook.xml", self.workbook_xml().as_bytes());
            put("xl/_rels/workbook.xml.rels", self.workbook_rels().as_bytes());

            for (i, (_, _, xml)) in self.sheets.iter().enumerate() {
                put(&format!("xl/worksheets/sheet{}.xml", i + 1), xml.as_bytes());
            }
            if !self.shared_strings.is_empty() {
                put("xl/sharedStrings.xml", self.shared_strings_xml().as_bytes());
            }
            if let Some(styles) = &self.styles {
                put("xl/styles.xml", styles.as_bytes());
            }
            for (path, data) in &self.files {
                put(path, data);
            }

            zip.finish().unwrap();
        }
        buf
    }

    /// Build and open the package
    pub fn open(&self) -> Workbook<Cursor<Vec<u8>>> {
        Workbook::from_reader(Cursor::new(self.build())).expect("fixture should open")
    }

    fn workbook_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );
        if self.date_1904 {
            xml.push_str(r#"<workbookPr date1904="1"/>"#);
        } else {
            xml.push_str(r#"<workbookPr defaultThemeVersion="124226"/>"#);
        }
        xml.push_str("<sheets>");
        for (i, (name, id, _)) in self.sheets.iter().enumerate() {
            xml.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(name),
                id,
                i + 1
            ));
        }
        xml.push_str("</sheets></workbook>");
        xml
    }

    fn workbook_rels(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for i in 0..self.sheets.len() {
            xml.push_str(&format!(
                r#"<Relationship Id="rId{0}" Type="{1}/worksheet" Target="worksheets/sheet{0}.xml"/>"#,
                i + 1,
                REL_NS
            ));
        }
        if !self.shared_strings.is_empty() {
            xml.push_str(&format!(
                r#"<Relationship Id="rIdStrings" Type="{}/sharedStrings" Target="sharedStrings.xml"/>"#,
                REL_NS
            ));
        }
        if self.styles.is_some() {
            xml.push_str(&format!(
                r#"<Relationship Id="rIdStyles" Type="{}/styles" Target="styles.xml"/>"#,
                REL_NS
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }

    fn shared_strings_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
            self.shared_strings.len()
        );
        for s in &self.shared_strings {
            xml.push_str(&format!("<si><t>{}</t></si>", escape(s)));
        }
        xml.push_str("</sst>");
        xml
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Worksheet part around the given rows
pub fn worksheet(rows: &[String]) -> String {
    worksheet_with("", rows)
}

/// Worksheet part with extra markup (dimension, cols, ...) before the rows
pub fn worksheet_with(head: &str, rows: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">{}<sheetData>{}</sheetData></worksheet>"#,
        head,
        rows.concat()
    )
}

/// `<row>` holding the given cells
pub fn row(r: u32, cells: &[String]) -> String {
    format!(r#"<row r="{}">{}</row>"#, r, cells.concat())
}

/// Plain numeric cell
pub fn num(addr: &str, value: &str) -> String {
    format!(r#"<c r="{}"><v>{}</v></c>"#, addr, value)
}

/// Numeric cell with a style index
pub fn styled(addr: &str, style: u32, value: &str) -> String {
    format!(r#"<c r="{}" s="{}"><v>{}</v></c>"#, addr, style, value)
}

/// Shared string cell
pub fn shared(addr: &str, index: usize) -> String {
    format!(r#"<c r="{}" t="s"><v>{}</v></c>"#, addr, index)
}

/// Inline string cell
pub fn inline(addr: &str, text: &str) -> String {
    format!(
        r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
        addr,
        escape(text)
    )
}

/// Cell of any type tag
pub fn typed(addr: &str, tag: &str, value: &str) -> String {
    format!(r#"<c r="{}" t="{}"><v>{}</v></c>"#, addr, tag, value)
}

/// Sheet with cells A1..D4 holding `row * 10 + col` (A1 = 11, D4 = 44)
pub fn grid_4x4() -> String {
    let rows: Vec<String> = (1..=4)
        .map(|r| {
            let cells: Vec<String> = ["A", "B", "C", "D"]
                .iter()
                .enumerate()
                .map(|(i, col)| num(&format!("{}{}", col, r), &(r * 10 + i as u32 + 1).to_string()))
                .collect();
            row(r, &cells)
        })
        .collect();
    worksheet_with(r#"<dimension ref="A1:D4"/>"#, &rows)
}

/// Write a package to a temp `.xlsx` file, removed when dropped
pub fn temp_fixture(bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("stream-sheets-")
        .suffix(".xlsx")
        .tempfile()
        .expect("create temp file");
    file.write_all(bytes).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}
