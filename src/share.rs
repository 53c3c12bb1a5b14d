use log::{debug, info, warn};

use share_table::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::share::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_output;

/// The file read when no input is given, if it exists in the current directory.
pub const DEFAULT_INPUT_FILE: &str = "countriesMBTI_16types.csv";

const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Snafu)]
pub enum ShareError {
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading the header of CSV file {path}"))]
    CsvHeader { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing the CSV output"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel file {path} has no worksheet or no header row"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name:?} not found in Excel file {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening reference file {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error serializing the summary to JSON"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("No input table: use --input or --config, or add {default} to the current directory"))]
    MissingInput { default: String },
    #[snafu(display("Cannot read input type {input_type:?}: expected csv or xlsx"))]
    UnknownInputType { input_type: String },
    #[snafu(display("The table cannot be normalized: {source}"))]
    Normalize { source: NormalizeError },
    #[snafu(display("Difference detected between the normalized table and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ShareResult<T> = Result<T, ShareError>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InputSource {
    pub path: String,
    pub provider: Provider,
    pub worksheet: Option<String>,
    pub delimiter: u8,
}

/// Everything needed for one run, after merging the configuration file and the
/// command line.
#[derive(PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub source: InputSource,
    pub rules: NormalizeRules,
    pub output_path: Option<String>,
    pub summary_path: Option<String>,
    pub top_type: Option<String>,
    pub top_n: usize,
    pub reference_path: Option<String>,
}

/// What a run produces, before anything is written.
#[derive(PartialEq, Debug, Clone)]
pub struct Processed {
    pub normalization: Normalization,
    pub report: GroupSumReport,
    pub canonical_csv: String,
    pub summary: JSValue,
    pub top: Option<(String, TopN)>,
}

fn parse_provider(s: &str) -> ShareResult<Provider> {
    match s.trim().to_lowercase().as_str() {
        "csv" => Ok(Provider::Csv),
        "xlsx" | "excel" => Ok(Provider::Xlsx),
        x => UnknownInputTypeSnafu { input_type: x }.fail(),
    }
}

fn parse_delimiter(s: &str) -> ShareResult<u8> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => whatever!("The delimiter must be a single ASCII character, got {:?}", s),
    }
}

/// Merges the command line with the configuration file, if any.
///
/// `default_input` is used when neither the command line nor the configuration names
/// an input file, and only if it exists.
pub fn resolve_settings(args: &Args, default_input: &Path) -> ShareResult<RunSettings> {
    let (config, config_path) = match &args.config {
        Some(p) => (read_config(p)?, Some(p.clone())),
        None => (ShareConfig::default(), None),
    };
    // Paths in the configuration file are relative to it.
    let from_config = |p: &Option<String>| -> Option<String> {
        match (p, &config_path) {
            (Some(x), Some(cp)) => Some(resolve_relative(cp, x)),
            (x, _) => x.clone(),
        }
    };

    let path = match (&args.input, from_config(&config.source.file_path)) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => p,
        (None, None) if default_input.exists() => {
            info!(
                "No input given, reading the default file {:?}",
                default_input.display()
            );
            default_input.display().to_string()
        }
        (None, None) => {
            return MissingInputSnafu {
                default: default_input.display().to_string(),
            }
            .fail()
        }
    };

    let provider = match args
        .input_type
        .as_ref()
        .or(config.source.provider.as_ref())
    {
        Some(s) => parse_provider(s)?,
        None => io_common::guess_provider(&path),
    };

    let delimiter = match (args.delimiter, &config.source.delimiter) {
        (Some(c), _) => parse_delimiter(&c.to_string())?,
        (None, Some(s)) => parse_delimiter(s)?,
        (None, None) => b',',
    };

    let source = InputSource {
        path,
        provider,
        worksheet: args
            .excel_worksheet_name
            .clone()
            .or(config.source.excel_worksheet_name.clone()),
        delimiter,
    };

    let res = RunSettings {
        source,
        rules: config.rules.to_rules()?,
        output_path: args
            .out
            .clone()
            .or_else(|| from_config(&config.output_settings.output_path)),
        summary_path: args
            .summary
            .clone()
            .or_else(|| from_config(&config.output_settings.summary_path)),
        top_type: args
            .top_type
            .clone()
            .or(config.output_settings.top_type.clone()),
        top_n: args
            .top_n
            .or(config.output_settings.top_n)
            .unwrap_or(DEFAULT_TOP_N),
        reference_path: args.reference.clone(),
    };
    debug!("resolve_settings: {:?}", res);
    Ok(res)
}

pub fn read_table(source: &InputSource) -> ShareResult<RawTable> {
    info!(
        "Attempting to read table {:?} ({:?})",
        source.path, source.provider
    );
    let table = match source.provider {
        Provider::Csv => io_csv::read_csv_table(&source.path, source.delimiter)?,
        Provider::Xlsx => io_excel::read_excel_table(&source.path, source.worksheet.as_deref())?,
    };
    info!(
        "Read {} rows and {} columns from {:?}",
        table.num_rows(),
        table.columns().len(),
        source.path
    );
    Ok(table)
}

/// Normalizes the table and prepares all the outputs.
pub fn process(settings: &RunSettings, table: &RawTable) -> ShareResult<Processed> {
    let normalization =
        normalize_with_rules(table, &settings.rules).context(NormalizeSnafu {})?;
    if normalization.country_column.is_fallback() {
        warn!(
            "No country column found, using column {:?}: check that it contains countries",
            normalization.country_column.name
        );
    }
    let report = quality_report_with_tolerance(&normalization.rows, settings.rules.sum_tolerance);
    if !report.is_clean() {
        warn!(
            "{} countries have shares that do not add up to 100",
            report.offending.len()
        );
    }

    let canonical_csv = io_output::canonical_csv(&normalization.rows)?;
    let summary = io_output::summary_json(&settings.source.path, &normalization, &report);
    let top = settings.top_type.as_ref().map(|t| {
        (
            t.clone(),
            top_n(&normalization.rows, t.as_str(), settings.top_n),
        )
    });

    Ok(Processed {
        normalization,
        report,
        canonical_csv,
        summary,
        top,
    })
}

/// Compares the canonical table with the content of a reference file.
///
/// Line endings and trailing spaces are not significant.
pub fn check_reference(canonical_csv: &str, reference_path: &str) -> ShareResult<()> {
    let contents = fs::read_to_string(reference_path).context(OpeningReferenceSnafu {
        path: reference_path,
    })?;
    let reference = io_common::normalize_lines(&contents);
    let computed = io_common::normalize_lines(canonical_csv);
    if reference != computed {
        warn!("Found differences with the reference {:?}", reference_path);
        print_diff(reference.as_str(), computed.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The normalized table matches the reference {:?}", reference_path);
    Ok(())
}

pub fn run(args: &Args) -> ShareResult<()> {
    let settings = resolve_settings(args, Path::new(DEFAULT_INPUT_FILE))?;
    info!("settings: {:?}", settings);

    let table = read_table(&settings.source)?;
    let processed = process(&settings, &table)?;

    if let Some((type_code, top)) = &processed.top {
        print!("{}", io_output::format_top(type_code, top));
    }

    // The top listing already uses the standard output.
    match settings.output_path.as_deref() {
        None if processed.top.is_some() => {
            debug!("run: no output path, skipping the canonical table");
        }
        p => io_output::write_text(p, &processed.canonical_csv)?,
    }

    if let Some(p) = &settings.summary_path {
        let pretty_js = io_output::summary_text(&processed.summary)?;
        io_output::write_text(Some(p.as_str()), &pretty_js)?;
    }

    if let Some(reference_path) = &settings.reference_path {
        check_reference(&processed.canonical_csv, reference_path)?;
    }

    Ok(())
}
