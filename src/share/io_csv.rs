// Primitives for reading CSV files.

use std::fs::File;
use std::io::Read;

use crate::share::{
    io_common::{clean_header, text_cell},
    *,
};

pub fn read_csv_table(path: &str, delimiter: u8) -> ShareResult<RawTable> {
    let file = File::open(path).context(CsvOpenSnafu { path })?;
    read_csv_from_reader(file, delimiter, path)
}

/// Reads a table with a header row. `path` is only used in error messages.
pub fn read_csv_from_reader<R: Read>(
    reader: R,
    delimiter: u8,
    path: &str,
) -> ShareResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    let columns: Vec<String> = rdr
        .headers()
        .context(CsvHeaderSnafu { path })?
        .iter()
        .map(clean_header)
        .collect();
    debug!("read_csv_table: header: {:?}", columns);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (idx, line_r) in rdr.byte_records().enumerate() {
        // The header is on the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let fields: Vec<&str> = match line.iter().map(std::str::from_utf8).collect() {
            Ok(fields) => fields,
            Err(e) => {
                warn!("read_csv_table: skipping line {}: {}", lineno, e);
                continue;
            }
        };
        if fields.len() != columns.len() {
            debug!(
                "read_csv_table: line {} has {} fields instead of {}",
                lineno,
                fields.len(),
                columns.len()
            );
        }
        rows.push(fields.into_iter().map(text_cell).collect());
    }
    Ok(RawTable::new(columns, rows))
}
