//! Blank row and column pruning.

use ontoprep_model::{Row, Table};
use serde::Serialize;

use crate::error::{Result, TransformError};

/// Options for [`normalize_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Only the first `max_columns` original positions may be retained.
    pub max_columns: Option<usize>,
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = Some(max_columns);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub rows_in: usize,
    pub rows_out: usize,
    pub columns_in: usize,
    pub columns_out: usize,
}

/// Result of a normalization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTable {
    pub table: Table,
    /// Retained original column positions, ascending.
    pub kept_columns: Vec<usize>,
    pub stats: NormalizeStats,
}

/// Drops blank rows, then columns that are blank across every retained row.
pub fn normalize(table: &Table) -> Result<NormalizedTable> {
    normalize_with(table, NormalizeOptions::default())
}

/// Like [`normalize`], but with a column cap.
///
/// Cells past the cap never count as content, so a row whose only values
/// lie beyond it is dropped like a blank row.
pub fn normalize_with(table: &Table, options: NormalizeOptions) -> Result<NormalizedTable> {
    let width = table.rows().iter().map(Row::len).max().unwrap_or(0);
    let candidates = options.max_columns.map_or(width, |cap| cap.min(width));
    let retained: Vec<&Row> = table
        .rows()
        .iter()
        .filter(|row| (0..candidates).any(|index| !row.is_blank_at(index)))
        .collect();
    if retained.is_empty() {
        return Err(TransformError::EmptyInput {
            rows_seen: table.len(),
        });
    }

    let kept_columns: Vec<usize> = (0..candidates)
        .filter(|&index| retained.iter().any(|row| !row.is_blank_at(index)))
        .collect();

    let normalized: Table = retained
        .iter()
        .map(|row| row.project(&kept_columns))
        .collect();

    let stats = NormalizeStats {
        rows_in: table.len(),
        rows_out: normalized.len(),
        columns_in: table.width(),
        columns_out: kept_columns.len(),
    };
    tracing::debug!(
        rows_in = stats.rows_in,
        rows_out = stats.rows_out,
        columns_in = stats.columns_in,
        columns_kept = stats.columns_out,
        "normalized table"
    );

    Ok(NormalizedTable {
        table: normalized,
        kept_columns,
        stats,
    })
}

/// Parses delimited text and normalizes it.
///
/// No file I/O happens here; callers read and write the files.
pub fn normalize_delimited(
    text: &str,
    delimiter: u8,
    options: NormalizeOptions,
) -> Result<NormalizedTable> {
    let table = ontoprep_ingest::parse_table(text, delimiter)?;
    normalize_with(&table, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_blank_rows_and_columns() {
        let table = Table::from_cells([
            vec!["CLASS", "", "sub-class 1"],
            vec!["", " ", ""],
            vec!["Eating disorders", "", "Anorexia"],
        ]);
        let result = normalize(&table).expect("normalize");
        assert_eq!(result.kept_columns, vec![0, 2]);
        assert_eq!(
            result.table.to_cells(),
            vec![
                vec!["CLASS", "sub-class 1"],
                vec!["Eating disorders", "Anorexia"]
            ]
        );
        assert_eq!(result.stats.rows_in, 3);
        assert_eq!(result.stats.rows_out, 2);
        assert_eq!(result.stats.columns_in, 3);
        assert_eq!(result.stats.columns_out, 2);
    }

    #[test]
    fn column_occupancy_ignores_dropped_rows() {
        // Column 1 only has whitespace, and the row holding it is dropped.
        let table = Table::from_cells([vec!["a", ""], vec!["", "  "], vec!["b"]]);
        let result = normalize(&table).expect("normalize");
        assert_eq!(result.kept_columns, vec![0]);
    }

    #[test]
    fn short_rows_are_padded() {
        let table = Table::from_cells([vec!["a", "b", "c"], vec!["x"]]);
        let result = normalize(&table).expect("normalize");
        assert_eq!(result.table.rows()[1].cells(), ["x", "", ""]);
    }

    #[test]
    fn cells_are_copied_untrimmed() {
        let table = Table::from_cells([vec![" a ", "b"]]);
        let result = normalize(&table).expect("normalize");
        assert_eq!(result.table.rows()[0].cells(), [" a ", "b"]);
    }

    #[test]
    fn column_cap_limits_candidates() {
        let table = Table::from_cells([vec!["a", "b", "c", "d"], vec!["1", "", "3", "4"]]);
        let options = NormalizeOptions::new().with_max_columns(3);
        let result = normalize_with(&table, options).expect("normalize");
        assert_eq!(result.kept_columns, vec![0, 1, 2]);
        assert_eq!(result.table.width(), 3);
    }

    #[test]
    fn rows_with_content_only_past_the_cap_are_dropped() {
        let table = Table::from_cells([vec!["a", "b", "c"], vec!["", "", "x"]]);
        let options = NormalizeOptions::new().with_max_columns(2);
        let result = normalize_with(&table, options).expect("normalize");
        assert_eq!(result.table.to_cells(), vec![vec!["a", "b"]]);
        assert_eq!(result.stats.rows_out, 1);

        let again = normalize_with(&result.table, options).expect("normalize");
        assert_eq!(again.table, result.table);
    }

    #[test]
    fn zero_cap_is_empty_input() {
        let table = Table::from_cells([vec!["a", "b"], vec!["c", "d"]]);
        let options = NormalizeOptions::new().with_max_columns(0);
        let err = normalize_with(&table, options).expect_err("nothing under the cap");
        assert!(matches!(err, TransformError::EmptyInput { rows_seen: 2 }));
    }

    #[test]
    fn blank_table_is_empty_input() {
        let table = Table::from_cells([vec!["", " "], vec!["\t"]]);
        let err = normalize(&table).expect_err("blank table");
        assert!(matches!(err, TransformError::EmptyInput { rows_seen: 2 }));

        let err = normalize(&Table::default()).expect_err("no rows");
        assert!(matches!(err, TransformError::EmptyInput { rows_seen: 0 }));
    }

    #[test]
    fn normalizes_semicolon_text() {
        let result = normalize_delimited("\u{feff}A;;B\n;;\n1;;2\n", b';', NormalizeOptions::new())
            .expect("normalize");
        assert_eq!(result.kept_columns, vec![0, 2]);
        assert_eq!(result.table.to_cells(), vec![vec!["A", "B"], vec!["1", "2"]]);
    }
}
