//! Read areas: bounds, addressing forms and malformed input.

use std::ops::ControlFlow;

use pretty_assertions::assert_eq;
use stream_sheets_core::{CellValue, ReadOptions};

use crate::{grid_4x4, XlsxFixture};

fn keys(rows: &[(u32, stream_sheets_core::Row)]) -> Vec<(u32, Vec<String>)> {
    rows.iter()
        .map(|(r, row)| (*r, row.keys().map(|k| k.to_string()).collect()))
        .collect()
}

#[test]
fn test_range_area_keeps_sheet_coordinates() {
    let mut wb = XlsxFixture::new().sheet("Grid", &grid_4x4()).open();
    let mut sheet = wb.sheet("Grid").expect("sheet");
    sheet.set_read_area("B2:C3", false).expect("area");

    let rows = sheet.read_rows(ReadOptions::new()).expect("read");
    assert_eq!(
        keys(&rows),
        vec![
            (2, vec!["B".to_string(), "C".to_string()]),
            (3, vec!["B".to_string(), "C".to_string()]),
        ]
    );
    assert_eq!(rows[0].1.value("B"), Some(&CellValue::Integer(22)));
    assert_eq!(rows[1].1.value("C"), Some(&CellValue::Integer(33)));
}

#[test]
fn test_single_cell_area() {
    let mut wb = XlsxFixture::new().sheet("Grid", &grid_4x4()).open();
    let mut sheet = wb.sheet("Grid").expect("sheet");
    sheet.set_read_area("c3", false).expect("area");

    let rows = sheet.read_rows(ReadOptions::new()).expect("read");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, 3);
    assert_eq!(rows[0].1.value("C"), Some(&CellValue::Integer(33)));
}

#[test]
fn test_column_area_spans_all_rows() {
    let mut wb = XlsxFixture::new().sheet("Grid", &grid_4x4()).open();
    let mut sheet = wb.sheet("Grid").expect("sheet");
    sheet.set_read_area("B:C", false).expect("area");

    let rows = sheet.read_rows(ReadOptions::new()).expect("read");
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|(_, row)| row.len() == 2));

    sheet.set_read_area("D", false).expect("area");
    let rows = sheet.read_rows(ReadOptions::new()).expect("read");
    let values: Vec<_> = rows.iter().map(|(_, row)| row.value("D").cloned()).collect();
    assert_eq!(
        values,
        vec![
            Some(CellValue::Integer(14)),
            Some(CellValue::Integer(24)),
            Some(CellValue::Integer(34)),
            Some(CellValue::Integer(44)),
        ]
    );
}

#[test]
fn test_area_persists_until_reset() {
    let mut wb = XlsxFixture::new().sheet("Grid", &grid_4x4()).open();
    wb.sheet("Grid")
        .expect("sheet")
        .set_read_area("A1:A2", false)
        .expect("area");

    // workbook-level reads go through the selected sheet and keep its area
    let rows = wb.read_rows(ReadOptions::new()).expect("read");
    assert_eq!(rows.len(), 2);

    let mut sheet = wb.sheet("grid").expect("sheet");
    assert_eq!(sheet.area().to_string(), "A1:A2");
    sheet.reset_area();
    assert_eq!(sheet.read_rows(ReadOptions::new()).expect("read").len(), 4);
}

#[test]
fn test_bad_area_is_address_syntax_error() {
    let mut wb = XlsxFixture::new().sheet("Grid", &grid_4x4()).open();
    let mut sheet = wb.sheet("Grid").expect("sheet");

    for spec in ["", "1A", "A1:", "A1:B2:C3", "A-1"] {
        let err = sheet.set_read_area(spec, false).unwrap_err();
        assert!(err.is_address_syntax(), "{:?} gave {}", spec, err);
    }
    // the previous area is untouched by a failed call
    assert_eq!(sheet.read_rows(ReadOptions::new()).expect("read").len(), 4);
}

#[test]
fn test_limit_and_early_stop() {
    let mut wb = XlsxFixture::new().sheet("Grid", &grid_4x4()).open();
    let mut sheet = wb.sheet("Grid").expect("sheet");

    let rows = sheet.read_rows(ReadOptions::new().limit(2)).expect("read");
    assert_eq!(rows.iter().map(|(r, _)| *r).collect::<Vec<_>>(), vec![1, 2]);

    let mut seen = Vec::new();
    let visited = sheet
        .for_each_row(ReadOptions::new(), |row_num, _| {
            seen.push(row_num);
            if row_num == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .expect("visit");
    assert_eq!(visited, 2);
    assert_eq!(seen, vec![1, 2]);

    // stopping early leaves the sheet readable again from the top
    assert_eq!(sheet.read_rows(ReadOptions::new()).expect("read").len(), 4);
}

#[test]
fn test_read_callback_stops_on_break() {
    let mut wb = XlsxFixture::new().sheet("Grid", &grid_4x4()).open();
    let mut sheet = wb.sheet("Grid").expect("sheet");

    let mut visited = Vec::new();
    sheet
        .read_callback(ReadOptions::new(), |row, key, cell| {
            visited.push(format!("{}{}={}", key, row, cell.value));
            if visited.len() == 6 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .expect("callback");

    assert_eq!(
        visited,
        vec!["A1=11", "B1=12", "C1=13", "D1=14", "A2=21", "B2=22"]
    );
}

#[test]
fn test_read_cells_by_address() {
    let mut wb = XlsxFixture::new().sheet("Grid", &grid_4x4()).open();
    let mut sheet = wb.sheet("Grid").expect("sheet");
    sheet.set_read_area("C3:D4", true).expect("area");

    let cells = sheet
        .read_cells(ReadOptions::new().header_row(true))
        .expect("cells");
    let flat: Vec<(String, CellValue)> = cells.into_iter().map(|(a, c)| (a, c.value)).collect();
    assert_eq!(
        flat,
        vec![
            ("C3".to_string(), CellValue::Integer(33)),
            ("D3".to_string(), CellValue::Integer(34)),
            ("C4".to_string(), CellValue::Integer(43)),
            ("D4".to_string(), CellValue::Integer(44)),
        ]
    );
}
