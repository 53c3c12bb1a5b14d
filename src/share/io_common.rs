use std::path::Path;

use crate::share::{Cell, Provider};

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The provider of a file, from its extension. CSV when in doubt.
pub fn guess_provider(path: &str) -> Provider {
    match Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("xlsx") | Some("xlsm") => Provider::Xlsx,
        _ => Provider::Csv,
    }
}

/// Header names are kept verbatim, except for a byte order mark left by some spreadsheet
/// exports.
pub fn clean_header(s: &str) -> String {
    s.trim_start_matches('\u{feff}').to_string()
}

pub fn text_cell(s: &str) -> Cell {
    if s.trim().is_empty() {
        Cell::Empty
    } else {
        Cell::Text(s.to_string())
    }
}

pub fn normalize_lines(s: &str) -> String {
    let lines: Vec<&str> = s
        .lines()
        .map(|l| l.trim_end())
        .filter(|l| !l.is_empty())
        .collect();
    lines.join("\n")
}
