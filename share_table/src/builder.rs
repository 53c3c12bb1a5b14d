pub use crate::config::*;

/// A builder for assembling raw tables in code.
///
/// Readers of files usually call [`RawTable::new`] directly. The builder is more
/// convenient for small tables.
///
/// ```
/// use share_table::builder::TableBuilder;
/// use share_table::{normalize, MbtiType};
///
/// let table = TableBuilder::new(&["country", "type", "percentage"])
///     .text_row(&["Korea", "enfp", "12.5"])
///     .text_row(&["Korea", "XYZZ", "3"])
///     .build();
///
/// let rows = normalize(&table)?;
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].mbti, MbtiType::Enfp);
///
/// # Ok::<(), share_table::NormalizeError>(())
/// ```
pub struct TableBuilder {
    _columns: Vec<String>,
    _rows: Vec<Vec<Cell>>,
}

impl TableBuilder {
    pub fn new(columns: &[&str]) -> TableBuilder {
        TableBuilder {
            _columns: columns.iter().map(|c| c.to_string()).collect(),
            _rows: Vec::new(),
        }
    }

    /// Adds a row of cells.
    pub fn row(mut self, cells: Vec<Cell>) -> TableBuilder {
        self._rows.push(cells);
        self
    }

    /// Adds a row where every cell is text. Empty strings become empty cells.
    pub fn text_row(self, cells: &[&str]) -> TableBuilder {
        let cells = cells
            .iter()
            .map(|s| {
                if s.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(s.to_string())
                }
            })
            .collect();
        self.row(cells)
    }

    /// Adds a row for a wide table: a label followed by numbers.
    pub fn labeled_row(self, label: &str, values: &[f64]) -> TableBuilder {
        let mut cells = vec![Cell::Text(label.to_string())];
        cells.extend(values.iter().map(|x| Cell::Number(*x)));
        self.row(cells)
    }

    pub fn build(self) -> RawTable {
        RawTable::new(self._columns, self._rows)
    }
}
