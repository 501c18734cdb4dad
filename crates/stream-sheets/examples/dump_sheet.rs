//! Example: print every row of a worksheet
//!
//! ```text
//! cargo run --example dump_sheet -- report.xlsx [sheet] [area]
//! ```

use std::env;
use std::process::ExitCode;

use stream_sheets::prelude::*;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: dump_sheet <file.xlsx> [sheet] [area]");
        return ExitCode::FAILURE;
    };

    match dump(&path, args.next(), args.next()) {
        Ok(rows) => {
            eprintln!("{} rows", rows);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn dump(path: &str, sheet: Option<String>, area: Option<String>) -> XlsxResult<usize> {
    let mut workbook = stream_sheets::open(path)?;
    let names: Vec<&str> = workbook.sheet_names().collect();
    eprintln!("sheets: {}", names.join(", "));

    let mut sheet = match sheet {
        Some(name) => workbook.sheet(&name)?,
        None => workbook.first_sheet()?,
    };
    if let Some(area) = area {
        sheet.set_read_area(&area, false)?;
    }

    let mut count = 0;
    for row in sheet.rows(ReadOptions::new())? {
        let (index, cells) = row?;
        let line: Vec<String> = cells
            .iter()
            .map(|(key, cell)| format!("{}={}", key, cell.value))
            .collect();
        println!("{}: {}", index, line.join(" | "));
        count += 1;
    }
    Ok(count)
}
