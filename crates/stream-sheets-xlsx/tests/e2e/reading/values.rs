//! Cell value decoding: types, shared strings and dates.

use pretty_assertions::assert_eq;
use stream_sheets_core::{CellValue, ReadOptions};

use crate::{inline, num, row, shared, styled, typed, worksheet, XlsxFixture, STYLES_XML};

/// 2023-03-15T00:00:00Z
const MARCH_15_2023: i64 = 1_678_838_400;

fn single_row(cells: &[String]) -> XlsxFixture {
    XlsxFixture::new()
        .styles(STYLES_XML)
        .shared_strings(&["alpha", "2024-01-02", "tab_x0009_here"])
        .sheet("Values", &worksheet(&[row(1, cells)]))
}

fn values(fixture: &XlsxFixture) -> Vec<(String, CellValue)> {
    let mut wb = fixture.open();
    let mut sheet = wb.sheet("Values").expect("sheet");
    sheet
        .read_cells(ReadOptions::new())
        .expect("read")
        .into_iter()
        .map(|(addr, cell)| (addr, cell.value))
        .collect()
}

#[test]
fn test_scalar_types() {
    let fixture = single_row(&[
        num("A1", "42"),
        num("B1", "1.5"),
        num("C1", "1E3"),
        typed("D1", "b", "1"),
        typed("E1", "b", "0"),
        typed("F1", "e", "#DIV/0!"),
        typed("G1", "str", "total"),
        typed("H1", "str", "12"),
        num("I1", "-0.25"),
    ]);

    assert_eq!(
        values(&fixture),
        vec![
            ("A1".to_string(), CellValue::Integer(42)),
            ("B1".to_string(), CellValue::Float(1.5)),
            ("C1".to_string(), CellValue::Integer(1000)),
            ("D1".to_string(), CellValue::Boolean(true)),
            ("E1".to_string(), CellValue::Boolean(false)),
            ("F1".to_string(), CellValue::ErrorCode("#DIV/0!".into())),
            ("G1".to_string(), CellValue::text("total")),
            ("H1".to_string(), CellValue::Integer(12)),
            ("I1".to_string(), CellValue::Float(-0.25)),
        ]
    );
}

#[test]
fn test_strings() {
    let fixture = single_row(&[
        shared("A1", 0),
        shared("B1", 2),
        inline("C1", "fish & chips"),
        inline("D1", "line_x000D_break"),
    ]);

    let vals = values(&fixture);
    assert_eq!(vals[0].1, CellValue::text("alpha"));
    assert_eq!(vals[1].1, CellValue::text("tab\there"));
    assert_eq!(vals[2].1, CellValue::text("fish & chips"));
    assert_eq!(vals[3].1, CellValue::text("line\rbreak"));
}

#[test]
fn test_rich_inline_string_skips_phonetic_runs() {
    let cell = r#"<c r="A1" t="inlineStr"><is><r><t>Tok</t></r><r><t>yo</t></r><rPh sb="0" eb="2"><t>トウキョウ</t></rPh></is></c>"#;
    let fixture = single_row(&[cell.to_string()]);
    assert_eq!(values(&fixture)[0].1, CellValue::text("Tokyo"));
}

#[test]
fn test_dates_follow_number_format() {
    let fixture = single_row(&[
        styled("A1", 1, "45000"),
        styled("B1", 2, "45000.5"),
        styled("C1", 4, "45000"),
        num("D1", "45000"),
        styled("E1", 1, "1"),
        styled("F1", 1, "0.75"),
    ]);

    let vals = values(&fixture);
    assert_eq!(vals[0].1, CellValue::DateSeconds(MARCH_15_2023));
    assert_eq!(vals[1].1, CellValue::DateSeconds(MARCH_15_2023 + 43_200));
    // a percent format is not a date
    assert_eq!(vals[2].1, CellValue::Integer(45000));
    assert_eq!(vals[3].1, CellValue::Integer(45000));
    // serial 1 is 1900-01-01
    assert_eq!(vals[4].1, CellValue::DateSeconds(-2_208_988_800));
    // a bare fraction is a time of day
    assert_eq!(vals[5].1, CellValue::DateSeconds(64_800));
}

#[test]
fn test_date_literals() {
    let fixture = single_row(&[
        typed("A1", "d", "2024-01-02T03:04:05Z"),
        typed("B1", "d", "not a date"),
        r#"<c r="C1" s="1" t="s"><v>1</v></c>"#.to_string(),
    ]);

    let vals = values(&fixture);
    assert_eq!(vals[0].1, CellValue::DateSeconds(1_704_164_645));
    assert_eq!(vals[1].1, CellValue::text("not a date"));
    // date-formatted shared string holding a literal date
    assert_eq!(vals[2].1, CellValue::DateSeconds(1_704_153_600));
}

#[test]
fn test_unrepresentable_date_serials_stay_numbers() {
    let fixture = single_row(&[
        styled("A1", 1, "1e20"),
        styled("B1", 2, "-1e20"),
        styled("C1", 1, "inf"),
        styled("D1", 1, "NaN"),
        typed("E1", "d", "1e20"),
        styled("F1", 1, "2958465"),
    ]);

    let vals = values(&fixture);
    assert_eq!(vals[0].1, CellValue::Float(1e20));
    assert_eq!(vals[1].1, CellValue::Float(-1e20));
    assert_eq!(vals[2].1, CellValue::text("inf"));
    assert_eq!(vals[3].1, CellValue::text("NaN"));
    assert_eq!(vals[4].1, CellValue::text("1e20"));
    // 9999-12-31 is still a date
    assert_eq!(vals[5].1, CellValue::DateSeconds(253_402_214_400));
}

#[test]
fn test_1904_date_system() {
    let fixture = single_row(&[styled("A1", 1, "1"), styled("B1", 1, "43538")]).date_1904();
    let mut wb = fixture.open();
    assert!(wb.settings().is_1904());

    let vals: Vec<CellValue> = wb
        .read_cells(ReadOptions::new())
        .expect("read")
        .into_iter()
        .map(|(_, c)| c.value)
        .collect();
    // 1904-01-02
    assert_eq!(vals[0], CellValue::DateSeconds(-2_082_758_400));
    // 43538 + 1462 = 45000
    assert_eq!(vals[1], CellValue::DateSeconds(MARCH_15_2023));
    assert_eq!(wb.timestamp("43538"), Some(MARCH_15_2023));
}

#[test]
fn test_date_format_renders_text() {
    let fixture = single_row(&[styled("A1", 1, "45000.25"), num("B1", "45000")]);
    let mut wb = fixture.open();
    wb.set_date_format(Some("%Y-%m-%d %H:%M"));
    assert_eq!(wb.date_format(), Some("%Y-%m-%d %H:%M"));

    let rows = wb.read_rows(ReadOptions::new()).expect("read");
    assert_eq!(rows[0].1.value("A"), Some(&CellValue::text("2023-03-15 06:00")));
    assert_eq!(rows[0].1.value("B"), Some(&CellValue::Integer(45000)));

    wb.set_date_format(None);
    let rows = wb.read_rows(ReadOptions::new()).expect("read");
    assert_eq!(
        rows[0].1.value("A"),
        Some(&CellValue::DateSeconds(MARCH_15_2023 + 21_600))
    );
}

#[test]
fn test_style_index_attached_on_request() {
    let fixture = single_row(&[styled("A1", 3, "1"), num("B1", "2")]);
    let mut wb = fixture.open();

    let rows = wb.read_rows(ReadOptions::new()).expect("read");
    assert_eq!(rows[0].1.get("A").and_then(|c| c.style), None);

    let rows = wb
        .read_rows(ReadOptions::new().include_styles(true))
        .expect("read");
    assert_eq!(rows[0].1.get("A").and_then(|c| c.style), Some(3));
    assert_eq!(rows[0].1.get("B").and_then(|c| c.style), Some(0));
}

#[test]
fn test_cells_outside_rows_and_empty_rows() {
    let rows = [
        row(1, &[num("A1", "1")]),
        r#"<row r="2"/>"#.to_string(),
        r#"<row r="3"><c r="A3"/></row>"#.to_string(),
        row(4, &[num("B4", "4")]),
    ];
    let mut wb = XlsxFixture::new().sheet("S", &worksheet(&rows)).open();
    let got = wb.read_rows(ReadOptions::new()).expect("read");

    // row 2 has no cells; row 3 has an empty one
    let nums: Vec<u32> = got.iter().map(|(r, _)| *r).collect();
    assert_eq!(nums, vec![1, 3, 4]);
    assert_eq!(got[1].1.value("A"), Some(&CellValue::text("")));
}
