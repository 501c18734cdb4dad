//! Row and column numbering modes, and column-major reads.

use pretty_assertions::assert_eq;
use stream_sheets_core::mode::{KEYS_FIRST_ROW, KEYS_ONE_BASED, KEYS_SWAP};
use stream_sheets_core::{CellValue, ColumnKey, ReadOptions, ResultMode};
use stream_sheets_xlsx::SheetData;

use crate::{grid_4x4, inline, num, row, worksheet, XlsxFixture};

#[test]
fn test_zero_based_area() {
    let mut wb = XlsxFixture::new().sheet("Grid", &grid_4x4()).open();
    let mut sheet = wb.sheet("Grid").expect("sheet");
    sheet.set_read_area("B2:C3", false).expect("area");

    let rows = sheet
        .read_rows(ReadOptions::new().mode(ResultMode::zero_based()))
        .expect("read");

    assert_eq!(rows.iter().map(|(r, _)| *r).collect::<Vec<_>>(), vec![0, 1]);
    let keys: Vec<ColumnKey> = rows[0].1.keys().cloned().collect();
    assert_eq!(keys, vec![ColumnKey::Number(0), ColumnKey::Number(1)]);
    assert_eq!(rows[0].1.value(0), Some(&CellValue::Integer(22)));
    assert_eq!(rows[1].1.value(1), Some(&CellValue::Integer(33)));
}

#[test]
fn test_one_based_area() {
    let mut wb = XlsxFixture::new().sheet("Grid", &grid_4x4()).open();
    let mut sheet = wb.sheet("Grid").expect("sheet");
    sheet.set_read_area("C3", false).expect("area");

    let rows = sheet
        .read_rows(ReadOptions::new().mode(ResultMode::one_based()))
        .expect("read");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, 1);
    assert_eq!(rows[1].0, 2);
    assert_eq!(rows[1].1.value(2), Some(&CellValue::Integer(44)));
}

#[test]
fn test_relative_numbering_starts_at_first_row_read() {
    // rows 1-2 are absent, so the first contributing row is 3
    let rows = [
        row(3, &[num("B3", "1")]),
        row(5, &[num("C5", "2")]),
    ];
    let mut wb = XlsxFixture::new().sheet("S", &worksheet(&rows)).open();
    let mut sheet = wb.sheet("S").expect("sheet");

    let rows = sheet
        .read_rows(ReadOptions::new().mode(ResultMode::zero_based()))
        .expect("read");
    assert_eq!(rows.iter().map(|(r, _)| *r).collect::<Vec<_>>(), vec![0, 2]);
    assert_eq!(rows[0].1.value(0), Some(&CellValue::Integer(1)));
    assert_eq!(rows[1].1.value(1), Some(&CellValue::Integer(2)));
}

#[test]
fn test_columns_pivot_pads_missing_cells() {
    let rows = [
        row(1, &[num("A1", "1"), num("B1", "2")]),
        row(2, &[num("A2", "3")]),
        row(3, &[num("B3", "4"), inline("C3", "x")]),
    ];
    let mut wb = XlsxFixture::new().sheet("S", &worksheet(&rows)).open();
    let mut sheet = wb.sheet("S").expect("sheet");

    let table = sheet.read_columns(ReadOptions::new()).expect("read");
    assert_eq!(table.row_keys(), &[1, 2, 3]);
    assert_eq!(table.width(), 3);

    let b: Vec<(u32, Option<CellValue>)> = table
        .column("B")
        .expect("column B")
        .map(|(r, c)| (r, c.map(|c| c.value.clone())))
        .collect();
    assert_eq!(
        b,
        vec![
            (1, Some(CellValue::Integer(2))),
            (2, None),
            (3, Some(CellValue::Integer(4))),
        ]
    );
    assert_eq!(table.get("C", 1).map(|c| c.is_none()), Some(true));
    assert!(table.get("D", 1).is_none());
}

#[test]
fn test_swapped_mode_reads_column_major() {
    let mut wb = XlsxFixture::new().sheet("Grid", &grid_4x4()).open();
    let mut sheet = wb.sheet("Grid").expect("sheet");
    sheet.set_read_area("A1:B2", false).expect("area");

    let data = sheet
        .read(ReadOptions::new().mode(ResultMode::default().swapped()))
        .expect("read");
    let SheetData::Columns(table) = data else {
        panic!("expected a column-major result");
    };
    let keys: Vec<String> = table.column_keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["A", "B"]);
    assert_eq!(
        table.get("B", 2).flatten().map(|c| c.value.clone()),
        Some(CellValue::Integer(22))
    );
}

#[test]
fn test_legacy_flags() {
    let rows = [
        row(1, &[inline("A1", "k"), inline("B1", "v")]),
        row(2, &[num("A2", "1"), num("B2", "2")]),
        row(3, &[num("A3", "3"), num("B3", "4")]),
    ];
    let mut wb = XlsxFixture::new().sheet("S", &worksheet(&rows)).open();
    let mut sheet = wb.sheet("S").expect("sheet");

    let options = ReadOptions::from_legacy_flags(KEYS_FIRST_ROW | KEYS_ONE_BASED | KEYS_SWAP);
    let SheetData::Columns(table) = sheet.read(options).expect("read") else {
        panic!("expected a column-major result");
    };
    assert_eq!(table.row_keys(), &[1, 2]);
    assert_eq!(
        table.get("v", 2).flatten().map(|c| c.value.clone()),
        Some(CellValue::Integer(4))
    );
}
