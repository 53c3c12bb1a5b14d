// Writing the results of a normalization.

use serde::Serialize;
use serde_json::json;

use crate::share::{io_common::simplify_file_name, *};

/// Column names in the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
struct ColumnSummary {
    name: String,
    index: usize,
    #[serde(rename = "foundByName")]
    found_by_name: bool,
    #[serde(rename = "matchedBy")]
    matched_by: String,
}

impl ColumnSummary {
    fn new(pick: &ColumnPick) -> ColumnSummary {
        let matched_by = match pick.matched {
            MatchKind::Synonym => "name",
            MatchKind::Position => "position",
            MatchKind::Numeric => "numeric",
        };
        ColumnSummary {
            name: pick.name.clone(),
            index: pick.index,
            found_by_name: !pick.is_fallback(),
            matched_by: matched_by.to_string(),
        }
    }
}

/// The canonical table in CSV: `country,type,percentage`.
pub fn canonical_csv(rows: &[CanonicalRow]) -> ShareResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["country", "type", "percentage"])
        .context(CsvWriteSnafu {})?;
    for r in rows.iter() {
        wtr.write_record([
            r.country.as_str(),
            r.mbti.code(),
            r.percentage.to_string().as_str(),
        ])
        .context(CsvWriteSnafu {})?;
    }
    let bytes = match wtr.into_inner() {
        Ok(b) => b,
        Err(e) => whatever!("Could not flush the CSV output: {}", e),
    };
    let res = String::from_utf8(bytes).whatever_context("The CSV output is not valid UTF-8")?;
    Ok(res)
}

pub fn summary_json(path: &str, n: &Normalization, report: &GroupSumReport) -> JSValue {
    let shape = match n.shape {
        Shape::Wide => "wide",
        Shape::Long => "long",
    };
    let totals: serde_json::Map<String, JSValue> = report
        .offending
        .iter()
        .map(|(country, total)| (country.clone(), json!(total)))
        .collect();
    json!({
        "source": simplify_file_name(path),
        "shape": shape,
        "countryColumn": ColumnSummary::new(&n.country_column),
        "typeColumn": n.type_column.as_ref().map(ColumnSummary::new),
        "valueColumn": n.value_column.as_ref().map(ColumnSummary::new),
        "scaledFromFraction": n.scaled_from_fraction,
        "rows": n.rows.len(),
        "droppedRows": n.dropped,
        "countries": countries(&n.rows),
        "quality": {
            "tolerance": report.tolerance,
            "offendingTotals": totals,
        }
    })
}

pub fn summary_text(summary: &JSValue) -> ShareResult<String> {
    serde_json::to_string_pretty(summary).context(WritingJsonSnafu {})
}

pub fn format_top(type_code: &str, top: &TopN) -> String {
    match top {
        TopN::EmptyResult => format!("No country has data for type {}\n", type_code),
        TopN::Ranked(rows) => {
            let mut res = format!("Largest shares of {}:\n", type_code.trim().to_uppercase());
            for (idx, r) in rows.iter().enumerate() {
                res.push_str(&format!("{:>3}. {:<30} {:>8.2}\n", idx + 1, r.country, r.percentage));
            }
            res
        }
    }
}

/// Writes to a file, or to the standard output for `None` and `stdout`.
pub fn write_text(path: Option<&str>, content: &str) -> ShareResult<()> {
    match path {
        None | Some("stdout") => {
            print!("{}", content);
            Ok(())
        }
        Some(p) => {
            info!("Writing {:?}", p);
            fs::write(p, content).context(WritingOutputSnafu { path: p })
        }
    }
}
