mod config;
use log::{debug, info, warn};

use std::collections::{BTreeMap, HashSet};

pub use crate::config::*;

pub mod builder;
pub mod manual;

// **** Column names ****

/// Accepted names for the country column, in order of priority.
pub const COUNTRY_SYNONYMS: [&str; 6] = ["country", "nation", "countries", "국가", "나라", "국가명"];

/// The name of the type column in long tables.
pub const TYPE_COLUMN: &str = "type";

/// Accepted names for the value column of long tables, in order of priority.
pub const VALUE_SYNONYMS: [&str; 5] = ["percentage", "value", "ratio", "share", "percent"];

// **** Private structures ****

// A share before validation. Any of the fields may be missing at this point.
#[derive(PartialEq, Debug, Clone)]
struct PendingShare {
    country: Option<String>,
    mbti: Option<MbtiType>,
    value: Option<f64>,
}

// The result of turning pending shares into canonical rows.
struct Canonicalized {
    rows: Vec<CanonicalRow>,
    scaled_from_fraction: bool,
    dropped: usize,
}

/// Classifies a table as wide or long, using the default rules.
pub fn detect_shape(table: &RawTable) -> Shape {
    detect_shape_with_rules(table, &NormalizeRules::DEFAULT_RULES)
}

/// Classifies a table as wide or long.
///
/// A table is wide if enough of its column names are type codes. Partial exports with a
/// few missing or renamed type columns are still recognized. Everything else is long.
pub fn detect_shape_with_rules(table: &RawTable, rules: &NormalizeRules) -> Shape {
    let num_type_columns = table
        .columns()
        .iter()
        .filter(|c| MbtiType::parse_code(c).is_some())
        .count();
    debug!(
        "detect_shape: {} type columns out of {} (threshold {})",
        num_type_columns,
        table.columns().len(),
        rules.wide_column_threshold
    );
    if num_type_columns >= rules.wide_column_threshold {
        Shape::Wide
    } else {
        Shape::Long
    }
}

/// Finds the column holding the countries.
///
/// If no column has a known name, the first column is returned and flagged with
/// [`MatchKind::Position`]. This is a best-effort guess: nothing checks that this column
/// actually contains countries.
pub fn locate_country_column(table: &RawTable) -> Result<ColumnPick, NormalizeError> {
    if let Some(pick) = find_by_synonyms(table, &COUNTRY_SYNONYMS, &HashSet::new()) {
        return Ok(pick);
    }
    let name = table
        .columns()
        .first()
        .ok_or_else(|| NormalizeError::MissingColumn {
            role: ColumnRole::Country,
            columns: table.columns().to_vec(),
        })?;
    warn!(
        "locate_country_column: no country column found, using the first column {:?}",
        name
    );
    Ok(ColumnPick {
        name: name.clone(),
        index: 0,
        matched: MatchKind::Position,
    })
}

/// Finds the type column of a long table. There is no fallback.
pub fn locate_type_column(table: &RawTable) -> Result<ColumnPick, NormalizeError> {
    find_by_synonyms(table, &[TYPE_COLUMN], &HashSet::new()).ok_or_else(|| {
        NormalizeError::MissingColumn {
            role: ColumnRole::Type,
            columns: table.columns().to_vec(),
        }
    })
}

/// Finds the value column of a long table, skipping the columns already taken.
///
/// The names are tried in order of priority. If none matches, the first remaining column
/// that only holds numbers is used.
pub fn locate_value_column(
    table: &RawTable,
    taken: &[usize],
) -> Result<ColumnPick, NormalizeError> {
    let taken: HashSet<usize> = taken.iter().copied().collect();
    if let Some(pick) = find_by_synonyms(table, &VALUE_SYNONYMS, &taken) {
        return Ok(pick);
    }
    for (idx, name) in table.columns().iter().enumerate() {
        if taken.contains(&idx) {
            continue;
        }
        if is_numeric_column(table, idx) {
            warn!(
                "locate_value_column: no value column found by name, using numeric column {:?}",
                name
            );
            return Ok(ColumnPick {
                name: name.clone(),
                index: idx,
                matched: MatchKind::Numeric,
            });
        }
    }
    Err(NormalizeError::NoUsableValueColumn {
        columns: table.columns().to_vec(),
    })
}

/// Normalizes a wide table with the default rules.
pub fn normalize_wide(table: &RawTable) -> Result<Vec<CanonicalRow>, NormalizeError> {
    wide_pass(table, &NormalizeRules::DEFAULT_RULES).map(|n| n.rows)
}

/// Normalizes a long table with the default rules.
pub fn normalize_long(table: &RawTable) -> Result<Vec<CanonicalRow>, NormalizeError> {
    long_pass(table, &NormalizeRules::DEFAULT_RULES).map(|n| n.rows)
}

/// Normalizes a table of any shape into canonical rows.
///
/// Rows with an unknown type, a missing or non-numeric value, an empty country or a
/// percentage outside [0, 100] are dropped without error.
/// Duplicated (country, type) pairs are kept as they are.
pub fn normalize(table: &RawTable) -> Result<Vec<CanonicalRow>, NormalizeError> {
    normalize_with_rules(table, &NormalizeRules::DEFAULT_RULES).map(|n| n.rows)
}

/// Normalizes a table, and returns the details of how it was understood.
///
/// Arguments:
/// * `table` the table to normalize. It is not modified.
/// * `rules` the thresholds and the unit policy to apply.
pub fn normalize_with_rules(
    table: &RawTable,
    rules: &NormalizeRules,
) -> Result<Normalization, NormalizeError> {
    info!(
        "Normalizing table with {} columns and {} rows",
        table.columns().len(),
        table.num_rows()
    );
    let res = match detect_shape_with_rules(table, rules) {
        Shape::Wide => wide_pass(table, rules),
        Shape::Long => long_pass(table, rules),
    }?;
    info!(
        "Normalized {:?} table: {} rows kept, {} dropped, scaled from fractions: {}",
        res.shape,
        res.rows.len(),
        res.dropped,
        res.scaled_from_fraction
    );
    Ok(res)
}

fn wide_pass(table: &RawTable, rules: &NormalizeRules) -> Result<Normalization, NormalizeError> {
    let country_column = locate_country_column(table)?;
    let type_columns: Vec<(usize, MbtiType)> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != country_column.index)
        .filter_map(|(idx, name)| MbtiType::parse_code(name).map(|t| (idx, t)))
        .collect();
    debug!(
        "wide_pass: country column: {:?} type columns: {:?}",
        country_column, type_columns
    );

    let mut pending: Vec<PendingShare> = Vec::new();
    for row in table.rows() {
        let country = row[country_column.index].as_text();
        for (idx, mbti) in type_columns.iter() {
            pending.push(PendingShare {
                country: country.clone(),
                mbti: Some(*mbti),
                value: row[*idx].as_number(),
            });
        }
    }

    let c = canonicalize(pending, rules.unit);
    Ok(Normalization {
        shape: Shape::Wide,
        rows: c.rows,
        country_column,
        type_column: None,
        value_column: None,
        scaled_from_fraction: c.scaled_from_fraction,
        dropped: c.dropped,
    })
}

fn long_pass(table: &RawTable, rules: &NormalizeRules) -> Result<Normalization, NormalizeError> {
    let country_column = locate_country_column(table)?;
    let type_column = locate_type_column(table)?;
    let value_column = locate_value_column(table, &[country_column.index, type_column.index])?;
    debug!(
        "long_pass: country column: {:?} type column: {:?} value column: {:?}",
        country_column, type_column, value_column
    );

    let pending: Vec<PendingShare> = table
        .rows()
        .iter()
        .map(|row| PendingShare {
            country: row[country_column.index].as_text(),
            mbti: row[type_column.index]
                .as_text()
                .and_then(|s| MbtiType::parse_code(&s)),
            value: row[value_column.index].as_number(),
        })
        .collect();

    let c = canonicalize(pending, rules.unit);
    Ok(Normalization {
        shape: Shape::Long,
        rows: c.rows,
        country_column,
        type_column: Some(type_column),
        value_column: Some(value_column),
        scaled_from_fraction: c.scaled_from_fraction,
        dropped: c.dropped,
    })
}

// The unit is decided once for the whole batch: a single row cannot tell a share of 0.3%
// from a fraction of 0.3.
fn canonicalize(pending: Vec<PendingShare>, unit: UnitMode) -> Canonicalized {
    let scale = match unit {
        UnitMode::Auto => {
            let mut values = pending.iter().filter_map(|p| p.value).peekable();
            values.peek().is_some() && values.all(|x| x <= 1.0)
        }
        UnitMode::Fraction => true,
        UnitMode::Percentage => false,
    };
    let num_pending = pending.len();
    let rows: Vec<CanonicalRow> = pending
        .into_iter()
        .filter_map(|p| {
            let country = p.country?;
            let mbti = p.mbti?;
            let value = p.value?;
            let percentage = if scale { value * 100.0 } else { value };
            if (0.0..=100.0).contains(&percentage) {
                Some(CanonicalRow {
                    country,
                    mbti,
                    percentage,
                })
            } else {
                None
            }
        })
        .collect();
    let dropped = num_pending - rows.len();
    if dropped > 0 {
        debug!(
            "canonicalize: dropped {} out of {} rows",
            dropped, num_pending
        );
    }
    Canonicalized {
        rows,
        scaled_from_fraction: scale,
        dropped,
    }
}

// The first synonym (in priority order) that names a column not yet taken.
fn find_by_synonyms(
    table: &RawTable,
    synonyms: &[&str],
    taken: &HashSet<usize>,
) -> Option<ColumnPick> {
    for syn in synonyms.iter() {
        let found = table
            .columns()
            .iter()
            .enumerate()
            .find(|(idx, name)| !taken.contains(idx) && name.trim().to_lowercase() == *syn);
        if let Some((idx, name)) = found {
            return Some(ColumnPick {
                name: name.clone(),
                index: idx,
                matched: MatchKind::Synonym,
            });
        }
    }
    None
}

// At least one number, and nothing but numbers or blanks.
fn is_numeric_column(table: &RawTable, idx: usize) -> bool {
    let mut seen_number = false;
    for cell in table.column_cells(idx) {
        if cell.is_empty() {
            continue;
        }
        if cell.as_number().is_none() {
            return false;
        }
        seen_number = true;
    }
    seen_number
}

/// The total share of each country.
pub fn group_sums(rows: &[CanonicalRow]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for r in rows.iter() {
        *sums.entry(r.country.clone()).or_insert(0.0) += r.percentage;
    }
    sums
}

/// Lists the countries whose total is not within 0.5 of 100.
pub fn quality_report(rows: &[CanonicalRow]) -> GroupSumReport {
    quality_report_with_tolerance(rows, NormalizeRules::DEFAULT_RULES.sum_tolerance)
}

pub fn quality_report_with_tolerance(rows: &[CanonicalRow], tolerance: f64) -> GroupSumReport {
    let offending: BTreeMap<String, f64> = group_sums(rows)
        .into_iter()
        .filter(|(_, total)| (total - 100.0).abs() > tolerance)
        .collect();
    for (country, total) in offending.iter() {
        warn!(
            "quality_report: the shares of {:?} add up to {} (tolerance {})",
            country, total, tolerance
        );
    }
    GroupSumReport {
        tolerance,
        offending,
    }
}

/// The `n` rows with the largest share for one type, largest first.
///
/// Ties keep the order of the input. If no row has this type (or if the code is not a
/// valid type), the result is [`TopN::EmptyResult`].
pub fn top_n(rows: &[CanonicalRow], type_code: &str, n: usize) -> TopN {
    let mbti = match MbtiType::parse_code(type_code) {
        Some(t) => t,
        None => {
            warn!("top_n: {:?} is not a type code", type_code);
            return TopN::EmptyResult;
        }
    };
    let mut selected: Vec<&CanonicalRow> = rows
        .iter()
        .filter(|r| r.mbti == mbti && !r.percentage.is_nan())
        .collect();
    if selected.is_empty() {
        return TopN::EmptyResult;
    }
    // sort_by is stable.
    selected.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    TopN::Ranked(selected.into_iter().take(n).cloned().collect())
}

/// All the shares of one country, largest first. Ties keep the order of the input.
pub fn country_profile(rows: &[CanonicalRow], country: &str) -> Vec<CanonicalRow> {
    let mut res: Vec<CanonicalRow> = rows
        .iter()
        .filter(|r| r.country == country)
        .cloned()
        .collect();
    res.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    res
}

/// The distinct countries, in order of first appearance.
pub fn countries(rows: &[CanonicalRow]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut res: Vec<String> = Vec::new();
    for r in rows.iter() {
        if seen.insert(r.country.as_str()) {
            res.push(r.country.clone());
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::builder::TableBuilder;
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn row(country: &str, mbti: MbtiType, percentage: f64) -> CanonicalRow {
        CanonicalRow {
            country: country.to_string(),
            mbti,
            percentage,
        }
    }

    fn all_codes() -> Vec<&'static str> {
        MbtiType::ALL.iter().map(|t| t.code()).collect()
    }

    fn wide_table(values: &[(&str, Vec<f64>)]) -> RawTable {
        let mut columns = vec!["Country"];
        columns.extend(all_codes());
        let mut b = TableBuilder::new(&columns);
        for (country, vs) in values.iter() {
            b = b.labeled_row(country, vs);
        }
        b.build()
    }

    #[test]
    fn wide_fractions_add_up_to_100() {
        init();
        let even = vec![1.0 / 16.0; 16];
        let uneven = vec![
            0.1, 0.05, 0.05, 0.1, 0.02, 0.08, 0.04, 0.06, 0.1, 0.1, 0.05, 0.05, 0.07, 0.03, 0.06,
            0.04,
        ];
        let table = wide_table(&[("Korea", even), ("Japan", uneven)]);
        assert_eq!(detect_shape(&table), Shape::Wide);

        let rows = normalize_wide(&table).unwrap();
        assert_eq!(rows.len(), 32);
        assert!((rows[0].percentage - 6.25).abs() < 1e-9);
        assert!(quality_report(&rows).is_clean());
    }

    #[test]
    fn shape_threshold() {
        let mut ten = vec!["country"];
        ten.extend(&all_codes()[..10]);
        let table = TableBuilder::new(&ten).build();
        assert_eq!(detect_shape(&table), Shape::Wide);

        let mut nine = vec!["country"];
        nine.extend(&all_codes()[..9]);
        nine.extend(["population", "year"]);
        let table = TableBuilder::new(&nine)
            .text_row(&["Korea", "1", "2", "3", "4", "5", "6", "7", "8", "9", "51000000", "2020"])
            .build();
        assert_eq!(detect_shape(&table), Shape::Long);
        // No type column: a long table cannot be read.
        assert_eq!(
            normalize(&table),
            Err(NormalizeError::MissingColumn {
                role: ColumnRole::Type,
                columns: nine.iter().map(|s| s.to_string()).collect()
            })
        );
    }

    #[test]
    fn shape_ignores_case_and_spaces() {
        let mut columns = vec!["nation".to_string()];
        columns.extend(all_codes().iter().map(|c| format!(" {} ", c.to_lowercase())));
        let refs: Vec<&str> = columns.iter().map(|s| s.as_str()).collect();
        let table = TableBuilder::new(&refs).build();
        assert_eq!(detect_shape(&table), Shape::Wide);
    }

    #[test]
    fn wide_percentages_are_not_rescaled() {
        init();
        let table = wide_table(&[("Korea", vec![6.25; 16]), ("Japan", vec![6.25; 16])]);
        let n = normalize_with_rules(&table, &NormalizeRules::DEFAULT_RULES).unwrap();
        assert!(!n.scaled_from_fraction);
        assert!(n.rows.iter().all(|r| r.percentage == 6.25));
        assert!(quality_report(&n.rows).is_clean());
    }

    #[test]
    fn wide_drops_bad_cells() {
        let mut columns = vec!["country"];
        columns.extend(all_codes());
        let mut cells = vec![Cell::Text("Korea".to_string())];
        cells.extend((0..14).map(|_| Cell::Number(7.0)));
        cells.push(Cell::Text("n/a".to_string()));
        cells.push(Cell::Number(120.0));
        let table = TableBuilder::new(&columns)
            .row(cells)
            .row(vec![Cell::Empty, Cell::Number(5.0)])
            .build();
        let n = normalize_with_rules(&table, &NormalizeRules::DEFAULT_RULES).unwrap();
        assert_eq!(n.shape, Shape::Wide);
        assert_eq!(n.rows.len(), 14);
        assert_eq!(n.dropped, 18);
        let report = quality_report(&n.rows);
        assert_eq!(report.offending.get("Korea"), Some(&98.0));
    }

    #[test]
    fn long_type_codes() {
        init();
        let table = TableBuilder::new(&["country", "type", "percentage"])
            .text_row(&["Korea", "XYZZ", "10"])
            .text_row(&["Korea", "enfp", "12"])
            .text_row(&["Korea", " istj ", "30"])
            .build();
        let rows = normalize_long(&table).unwrap();
        assert_eq!(
            rows,
            vec![
                row("Korea", MbtiType::Enfp, 12.0),
                row("Korea", MbtiType::Istj, 30.0)
            ]
        );
    }

    #[test]
    fn long_range_filter() {
        let table = TableBuilder::new(&["Country", "Type", "Percentage"])
            .text_row(&["Korea", "INTJ", "150"])
            .text_row(&["Korea", "INTP", "-5"])
            .text_row(&["Korea", "ENTJ", "0"])
            .text_row(&["Korea", "ENTP", "100"])
            .build();
        let n = normalize_with_rules(&table, &NormalizeRules::DEFAULT_RULES).unwrap();
        assert_eq!(n.shape, Shape::Long);
        assert!(!n.scaled_from_fraction);
        assert_eq!(
            n.rows,
            vec![
                row("Korea", MbtiType::Entj, 0.0),
                row("Korea", MbtiType::Entp, 100.0)
            ]
        );
        assert_eq!(n.dropped, 2);
    }

    #[test]
    fn long_fractions_are_scaled() {
        let table = TableBuilder::new(&["country", "type", "ratio"])
            .text_row(&["Korea", "INFP", "0.25"])
            .text_row(&["Korea", "ENFP", "0.75"])
            .text_row(&["Korea", "ISFP", ""])
            .build();
        let n = normalize_with_rules(&table, &NormalizeRules::DEFAULT_RULES).unwrap();
        assert!(n.scaled_from_fraction);
        assert_eq!(n.value_column.unwrap().name, "ratio");
        assert_eq!(
            n.rows,
            vec![
                row("Korea", MbtiType::Infp, 25.0),
                row("Korea", MbtiType::Enfp, 75.0)
            ]
        );
    }

    #[test]
    fn forced_units() {
        let table = TableBuilder::new(&["country", "type", "value"])
            .text_row(&["Korea", "INFP", "0.5"])
            .build();
        let rules = NormalizeRules {
            unit: UnitMode::Percentage,
            ..NormalizeRules::DEFAULT_RULES
        };
        let rows = normalize_with_rules(&table, &rules).unwrap().rows;
        assert_eq!(rows, vec![row("Korea", MbtiType::Infp, 0.5)]);

        let rules = NormalizeRules {
            unit: UnitMode::Fraction,
            ..NormalizeRules::DEFAULT_RULES
        };
        let table = TableBuilder::new(&["country", "type", "value"])
            .text_row(&["Korea", "INFP", "2"])
            .build();
        // 200% is out of range.
        assert!(normalize_with_rules(&table, &rules).unwrap().rows.is_empty());
    }

    #[test]
    fn long_value_column_priority() {
        let table = TableBuilder::new(&["country", "share", "type", "percentage"])
            .text_row(&["Korea", "1", "INFP", "40"])
            .build();
        let n = normalize_with_rules(&table, &NormalizeRules::DEFAULT_RULES).unwrap();
        let value_column = n.value_column.unwrap();
        assert_eq!(value_column.name, "percentage");
        assert_eq!(value_column.matched, MatchKind::Synonym);
        assert_eq!(n.rows, vec![row("Korea", MbtiType::Infp, 40.0)]);
    }

    #[test]
    fn long_value_column_numeric_fallback() {
        let table = TableBuilder::new(&["country", "type", "note", "amount"])
            .text_row(&["Korea", "INFP", "survey", "12.5"])
            .text_row(&["Korea", "ENFP", "", ""])
            .build();
        let n = normalize_with_rules(&table, &NormalizeRules::DEFAULT_RULES).unwrap();
        let value_column = n.value_column.unwrap();
        assert_eq!(value_column.name, "amount");
        assert_eq!(value_column.matched, MatchKind::Numeric);
        assert!(value_column.is_fallback());
        assert_eq!(n.rows, vec![row("Korea", MbtiType::Infp, 12.5)]);
    }

    #[test]
    fn long_without_value_column() {
        let table = TableBuilder::new(&["country", "type", "note"])
            .text_row(&["Korea", "INFP", "many"])
            .build();
        assert_eq!(
            normalize(&table),
            Err(NormalizeError::NoUsableValueColumn {
                columns: vec!["country".to_string(), "type".to_string(), "note".to_string()]
            })
        );
    }

    #[test]
    fn country_fallback_is_first_column() {
        let table = TableBuilder::new(&["Region", "type", "value"])
            .text_row(&["Busan", "INFP", "20"])
            .text_row(&["Seoul", "ENFP", "30"])
            .build();
        let n = normalize_with_rules(&table, &NormalizeRules::DEFAULT_RULES).unwrap();
        assert_eq!(n.country_column.name, "Region");
        assert_eq!(n.country_column.matched, MatchKind::Position);
        assert_eq!(countries(&n.rows), vec!["Busan", "Seoul"]);
    }

    #[test]
    fn country_synonyms() {
        let table = TableBuilder::new(&["id", " 국가 ", "type", "value"]).build();
        let pick = locate_country_column(&table).unwrap();
        assert_eq!(pick.index, 1);
        assert_eq!(pick.name, " 국가 ");
        assert!(!pick.is_fallback());

        let empty = RawTable::new(vec![], vec![]);
        assert!(matches!(
            locate_country_column(&empty),
            Err(NormalizeError::MissingColumn {
                role: ColumnRole::Country,
                ..
            })
        ));
    }

    #[test]
    fn country_names_are_verbatim() {
        let table = TableBuilder::new(&["country", "type", "value"])
            .text_row(&[" Korea ", "INFP", "40"])
            .text_row(&["Korea", "ENFP", "60"])
            .text_row(&["  ", "ISTJ", "10"])
            .build();
        let rows = normalize(&table).unwrap();
        assert_eq!(
            rows,
            vec![
                row(" Korea ", MbtiType::Infp, 40.0),
                row("Korea", MbtiType::Enfp, 60.0)
            ]
        );
        assert_eq!(countries(&rows), vec![" Korea ", "Korea"]);
        let sums = group_sums(&rows);
        assert_eq!(sums.get(" Korea "), Some(&40.0));
        assert_eq!(sums.get("Korea"), Some(&60.0));
        assert_eq!(quality_report(&rows).offending.len(), 2);
    }

    #[test]
    fn duplicates_are_kept() {
        let table = TableBuilder::new(&["country", "type", "value"])
            .text_row(&["Korea", "INFP", "20"])
            .text_row(&["Korea", "INFP", "22"])
            .build();
        let rows = normalize(&table).unwrap();
        assert_eq!(
            rows,
            vec![
                row("Korea", MbtiType::Infp, 20.0),
                row("Korea", MbtiType::Infp, 22.0)
            ]
        );
    }

    #[test]
    fn top_n_is_stable() {
        let rows = vec![
            row("A", MbtiType::Infp, 12.0),
            row("B", MbtiType::Infp, 45.5),
            row("X", MbtiType::Enfp, 99.0),
            row("C", MbtiType::Infp, 45.5),
            row("D", MbtiType::Infp, 3.0),
        ];
        assert_eq!(
            top_n(&rows, "INFP", 2),
            TopN::Ranked(vec![
                row("B", MbtiType::Infp, 45.5),
                row("C", MbtiType::Infp, 45.5)
            ])
        );
        // Lowercase codes are accepted, and n may exceed the number of rows.
        match top_n(&rows, "infp", 10) {
            TopN::Ranked(r) => {
                let names: Vec<&str> = r.iter().map(|x| x.country.as_str()).collect();
                assert_eq!(names, vec!["B", "C", "A", "D"]);
            }
            TopN::EmptyResult => panic!("expected rows"),
        }
    }

    #[test]
    fn top_n_empty() {
        let rows = vec![
            row("A", MbtiType::Infp, 12.0),
            row("B", MbtiType::Enfp, 45.5),
        ];
        assert_eq!(top_n(&rows, "INTJ", 5), TopN::EmptyResult);
        assert_eq!(top_n(&rows, "XYZZ", 5), TopN::EmptyResult);
        assert_eq!(top_n(&[], "INFP", 5), TopN::EmptyResult);
        let nan = vec![row("A", MbtiType::Intj, f64::NAN)];
        assert_eq!(top_n(&nan, "INTJ", 5), TopN::EmptyResult);
    }

    #[test]
    fn profile_of_a_country() {
        let rows = vec![
            row("A", MbtiType::Infp, 12.0),
            row("B", MbtiType::Infp, 45.5),
            row("A", MbtiType::Enfp, 30.0),
            row("A", MbtiType::Istj, 12.0),
        ];
        let p = country_profile(&rows, "A");
        let types: Vec<MbtiType> = p.iter().map(|r| r.mbti).collect();
        assert_eq!(types, vec![MbtiType::Enfp, MbtiType::Infp, MbtiType::Istj]);
        assert!(country_profile(&rows, "Z").is_empty());
    }

    #[test]
    fn quality_report_tolerance() {
        let rows = vec![
            row("A", MbtiType::Infp, 60.0),
            row("A", MbtiType::Enfp, 39.6),
            row("B", MbtiType::Infp, 60.0),
            row("B", MbtiType::Enfp, 39.0),
            row("C", MbtiType::Infp, 100.4),
        ];
        let report = quality_report(&rows);
        assert_eq!(report.offending.keys().collect::<Vec<_>>(), vec!["B"]);
        assert_eq!(report.tolerance, 0.5);
        let strict = quality_report_with_tolerance(&rows, 0.1);
        assert_eq!(strict.offending.len(), 3);
    }

    #[test]
    fn type_codes() {
        assert_eq!(MbtiType::parse_code(" esfp"), Some(MbtiType::Esfp));
        assert_eq!(MbtiType::parse_code("ESF"), None);
        assert_eq!("INTJ".parse::<MbtiType>(), Ok(MbtiType::Intj));
        assert_eq!(
            "XYZZ".parse::<MbtiType>(),
            Err(UnknownTypeCode("XYZZ".to_string()))
        );
        assert_eq!(MbtiType::Enfp.to_string(), "ENFP");
        assert_eq!(MbtiType::Istp.temperament(), Temperament::SP);
        let distinct: HashSet<&str> = MbtiType::ALL.iter().map(|t| t.code()).collect();
        assert_eq!(distinct.len(), 16);
    }

    #[test]
    fn cells() {
        assert_eq!(Cell::Text(" 12.5 ".to_string()).as_number(), Some(12.5));
        assert_eq!(Cell::Text("12%".to_string()).as_number(), None);
        assert_eq!(Cell::Text("NaN".to_string()).as_number(), None);
        assert_eq!(Cell::Number(f64::INFINITY).as_number(), None);
        assert_eq!(Cell::Number(2020.0).as_text(), Some("2020".to_string()));
        assert_eq!(Cell::Text("  ".to_string()).as_text(), None);
        assert_eq!(
            Cell::Text(" Korea ".to_string()).as_text(),
            Some(" Korea ".to_string())
        );
        assert!(Cell::Text(" ".to_string()).is_empty());
    }
}
