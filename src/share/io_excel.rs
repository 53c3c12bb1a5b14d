// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::share::{io_common::clean_header, *};

/// Reads a worksheet as a table. The first row holds the column names.
///
/// Without a worksheet name, the first worksheet is used.
pub fn read_excel_table(path: &str, worksheet: Option<&str>) -> ShareResult<RawTable> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    let columns: Vec<String> = header.iter().map(header_name).collect();
    debug!("read_excel_table: header: {:?}", columns);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let cells: Vec<Cell> = row.iter().map(cell_from_calamine).collect();
        // Formatting can extend the range of a sheet with blank rows.
        if cells.iter().all(|c| c.is_empty()) {
            debug!("read_excel_table: skipping blank row {}", idx + 2);
            continue;
        }
        rows.push(cells);
    }
    Ok(RawTable::new(columns, rows))
}

fn header_name(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => clean_header(s),
        DataType::Empty => "".to_string(),
        other => format!("{}", other),
    }
}

fn cell_from_calamine(cell: &DataType) -> Cell {
    match cell {
        DataType::String(s) => io_common::text_cell(s),
        DataType::Float(f) => Cell::Number(*f),
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Empty | DataType::Error(_) => Cell::Empty,
        other => Cell::Text(format!("{}", other)),
    }
}
