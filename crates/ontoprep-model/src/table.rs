//! Row-oriented table model shared by every tabular stage.
//!
//! Source files are frequently ragged: trailing separators are dropped by
//! spreadsheet exports, so a row may be shorter than its header. [`Row`]
//! keeps the cells exactly as read and exposes [`Row::cell_or_blank`] so
//! padding is an explicit, testable operation instead of implicit indexing.

use serde::{Deserialize, Serialize};

/// One row of a delimited table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Number of cells physically present in this row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Returns the cell at `index`, or `None` when the row is too short.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Returns the cell at `index`, or `""` when the row is too short.
    pub fn cell_or_blank(&self, index: usize) -> &str {
        self.cell(index).unwrap_or("")
    }

    /// True when the cell is missing or contains only whitespace.
    pub fn is_blank_at(&self, index: usize) -> bool {
        self.cell_or_blank(index).trim().is_empty()
    }

    /// True when no cell carries non-whitespace content.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.trim().is_empty())
    }

    /// Replaces the cell at `index` and returns the previous value.
    ///
    /// Returns `None` without modifying the row when `index` is out of range.
    pub fn replace_cell(&mut self, index: usize, value: String) -> Option<String> {
        self.cells
            .get_mut(index)
            .map(|cell| std::mem::replace(cell, value))
    }

    /// Builds a new row from the given column positions, padding short rows
    /// with empty strings.
    pub fn project(&self, indices: &[usize]) -> Row {
        indices
            .iter()
            .map(|&index| self.cell_or_blank(index).to_string())
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<String>> for Row {
    fn from(cells: Vec<String>) -> Self {
        Self::new(cells)
    }
}

/// An ordered sequence of rows. When a table carries a header, it is the
/// first row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Convenience constructor used heavily in tests and fixtures.
    pub fn from_cells<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of rows, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }

    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Rows after the header.
    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Position of the header cell equal to `name`.
    ///
    /// The comparison is exact: case-sensitive and without trimming.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header()?
            .cells()
            .iter()
            .position(|header| header == name)
    }

    /// Raw cell values, row by row. Mostly useful for assertions.
    pub fn to_cells(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|row| row.cells().to_vec()).collect()
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_read_as_blank() {
        let row: Row = ["a", "b"].into_iter().collect();
        assert_eq!(row.cell(1), Some("b"));
        assert_eq!(row.cell(5), None);
        assert_eq!(row.cell_or_blank(5), "");
        assert!(row.is_blank_at(5));
    }

    #[test]
    fn whitespace_only_row_is_blank() {
        let row: Row = ["  ", "\t", ""].into_iter().collect();
        assert!(row.is_blank());
        let row: Row = ["  ", "x"].into_iter().collect();
        assert!(!row.is_blank());
    }

    #[test]
    fn project_pads_missing_cells() {
        let row: Row = ["a", "b"].into_iter().collect();
        let projected = row.project(&[0, 3, 1]);
        assert_eq!(projected.cells(), ["a", "", "b"]);
    }

    #[test]
    fn replace_cell_out_of_range_is_noop() {
        let mut row: Row = ["a"].into_iter().collect();
        assert_eq!(row.replace_cell(3, "z".to_string()), None);
        assert_eq!(row.cells(), ["a"]);
        assert_eq!(row.replace_cell(0, "z".to_string()), Some("a".to_string()));
        assert_eq!(row.cells(), ["z"]);
    }

    #[test]
    fn column_lookup_is_exact() {
        let table = Table::from_cells([vec!["Analysis_ID", " DOI"], vec!["1", "x"]]);
        assert_eq!(table.column_index("Analysis_ID"), Some(0));
        assert_eq!(table.column_index("analysis_id"), None);
        assert_eq!(table.column_index("DOI"), None);
        assert_eq!(table.column_index(" DOI"), Some(1));
    }

    #[test]
    fn data_rows_skip_header() {
        let table = Table::from_cells([vec!["h"], vec!["1"], vec!["2"]]);
        assert_eq!(table.data_rows().len(), 2);
        assert!(Table::default().data_rows().is_empty());
    }
}
