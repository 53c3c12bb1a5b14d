// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// The content of a single cell in a raw table.
///
/// Readers should keep the cells as close as possible to what they found in the
/// source. Text that looks like a number is parsed later, only when a number is needed.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// A missing value or a blank cell.
    Empty,
}

impl Cell {
    /// The numerical value of this cell, if it has one.
    ///
    /// Text is trimmed before parsing. NaN and infinite values count as missing.
    pub fn as_number(&self) -> Option<f64> {
        let x = match self {
            Cell::Number(x) => *x,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty => return None,
        };
        if x.is_finite() {
            Some(x)
        } else {
            None
        }
    }

    /// The textual value of this cell, verbatim. Blank text is treated as missing.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(x) if x.is_finite() => Some(x.to_string()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

/// A table of unknown shape, as provided by a reader.
///
/// Invariant: every row has exactly as many cells as there are columns.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RawTable {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Creates a table. Rows that are too short are padded with empty cells, and rows that
    /// are too long are truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> RawTable {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        RawTable { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// The cells of one column, in row order.
    pub fn column_cells(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }
}

/// The 16 MBTI types.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum MbtiType {
    Intj,
    Intp,
    Entj,
    Entp,
    Infj,
    Infp,
    Enfj,
    Enfp,
    Istj,
    Isfj,
    Estj,
    Esfj,
    Istp,
    Isfp,
    Estp,
    Esfp,
}

/// The four temperament groups the types are usually presented in.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Temperament {
    /// Analysts
    NT,
    /// Diplomats
    NF,
    /// Sentinels
    SJ,
    /// Explorers
    SP,
}

impl MbtiType {
    pub const ALL: [MbtiType; 16] = [
        MbtiType::Intj,
        MbtiType::Intp,
        MbtiType::Entj,
        MbtiType::Entp,
        MbtiType::Infj,
        MbtiType::Infp,
        MbtiType::Enfj,
        MbtiType::Enfp,
        MbtiType::Istj,
        MbtiType::Isfj,
        MbtiType::Estj,
        MbtiType::Esfj,
        MbtiType::Istp,
        MbtiType::Isfp,
        MbtiType::Estp,
        MbtiType::Esfp,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            MbtiType::Intj => "INTJ",
            MbtiType::Intp => "INTP",
            MbtiType::Entj => "ENTJ",
            MbtiType::Entp => "ENTP",
            MbtiType::Infj => "INFJ",
            MbtiType::Infp => "INFP",
            MbtiType::Enfj => "ENFJ",
            MbtiType::Enfp => "ENFP",
            MbtiType::Istj => "ISTJ",
            MbtiType::Isfj => "ISFJ",
            MbtiType::Estj => "ESTJ",
            MbtiType::Esfj => "ESFJ",
            MbtiType::Istp => "ISTP",
            MbtiType::Isfp => "ISFP",
            MbtiType::Estp => "ESTP",
            MbtiType::Esfp => "ESFP",
        }
    }

    pub fn temperament(&self) -> Temperament {
        use MbtiType::*;
        match self {
            Intj | Intp | Entj | Entp => Temperament::NT,
            Infj | Infp | Enfj | Enfp => Temperament::NF,
            Istj | Isfj | Estj | Esfj => Temperament::SJ,
            Istp | Isfp | Estp | Esfp => Temperament::SP,
        }
    }

    /// Parses a type code. Surrounding whitespace and case are ignored.
    pub fn parse_code(s: &str) -> Option<MbtiType> {
        let code = s.trim().to_uppercase();
        MbtiType::ALL.iter().find(|t| t.code() == code).copied()
    }
}

impl Display for MbtiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The error returned when parsing a string that is not one of the 16 type codes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct UnknownTypeCode(pub String);

impl Error for UnknownTypeCode {}

impl Display for UnknownTypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown MBTI type {:?}", self.0)
    }
}

impl FromStr for MbtiType {
    type Err = UnknownTypeCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MbtiType::parse_code(s).ok_or_else(|| UnknownTypeCode(s.to_string()))
    }
}

// ******** Output data structures *********

/// The layout of a raw table.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Shape {
    /// One row per country, one column per type.
    Wide,
    /// One row per (country, type) pair.
    Long,
}

/// The role a column plays in the normalization.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ColumnRole {
    Country,
    Type,
}

impl Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnRole::Country => write!(f, "country"),
            ColumnRole::Type => write!(f, "type"),
        }
    }
}

/// How a column was picked for its role.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MatchKind {
    /// The name of the column is one of the known names for this role.
    Synonym,
    /// Nothing matched by name: this is the first column of the table.
    /// This is a guess.
    Position,
    /// Nothing matched by name: this is the first column holding only numbers.
    /// This is a guess.
    Numeric,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnPick {
    /// The name of the column, as written in the table.
    pub name: String,
    pub index: usize,
    pub matched: MatchKind,
}

impl ColumnPick {
    /// True if the column was not found by name.
    pub fn is_fallback(&self) -> bool {
        self.matched != MatchKind::Synonym
    }
}

/// A normalized row: the share of a type in a country.
///
/// `percentage` is in [0, 100].
#[derive(PartialEq, Debug, Clone)]
pub struct CanonicalRow {
    pub country: String,
    pub mbti: MbtiType,
    pub percentage: f64,
}

/// All the details of a normalization pass.
#[derive(PartialEq, Debug, Clone)]
pub struct Normalization {
    pub shape: Shape,
    pub rows: Vec<CanonicalRow>,
    pub country_column: ColumnPick,
    /// Only for long tables.
    pub type_column: Option<ColumnPick>,
    /// Only for long tables. Wide tables take their values from the type columns.
    pub value_column: Option<ColumnPick>,
    /// True if the values were read as fractions and multiplied by 100.
    pub scaled_from_fraction: bool,
    /// The number of candidate rows that were silently dropped.
    pub dropped: usize,
}

/// The countries whose shares do not add up to 100, with their total.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct GroupSumReport {
    pub tolerance: f64,
    pub offending: BTreeMap<String, f64>,
}

impl GroupSumReport {
    pub fn is_clean(&self) -> bool {
        self.offending.is_empty()
    }
}

/// The outcome of a ranking.
#[derive(PartialEq, Debug, Clone)]
pub enum TopN {
    Ranked(Vec<CanonicalRow>),
    /// No row has the requested type.
    EmptyResult,
}

/// Errors that prevent a table from being normalized.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NormalizeError {
    /// A required column could not be found.
    MissingColumn {
        role: ColumnRole,
        /// The columns of the table, verbatim.
        columns: Vec<String>,
    },
    /// No column of a long table can provide the values.
    NoUsableValueColumn { columns: Vec<String> },
}

impl Error for NormalizeError {}

impl Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeError::MissingColumn { role, columns } => {
                write!(f, "Missing {} column (columns: {:?})", role, columns)
            }
            NormalizeError::NoUsableValueColumn { columns } => write!(
                f,
                "No column can be used for the values (columns: {:?})",
                columns
            ),
        }
    }
}

// ********* Configuration **********

/// How the values should be interpreted.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum UnitMode {
    /// Fractions if all the values are at most 1, percentages otherwise.
    Auto,
    /// Always fractions in [0, 1].
    Fraction,
    /// Always percentages in [0, 100].
    Percentage,
}

#[derive(PartialEq, Debug, Clone)]
pub struct NormalizeRules {
    /// The number of type columns needed to consider a table as wide.
    pub wide_column_threshold: usize,
    /// The allowed distance to 100 for the total of a country.
    pub sum_tolerance: f64,
    pub unit: UnitMode,
}

impl NormalizeRules {
    pub const DEFAULT_RULES: NormalizeRules = NormalizeRules {
        wide_column_threshold: 10,
        sum_tolerance: 0.5,
        unit: UnitMode::Auto,
    };
}

impl Default for NormalizeRules {
    fn default() -> Self {
        NormalizeRules::DEFAULT_RULES
    }
}
