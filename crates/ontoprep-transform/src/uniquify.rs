//! Duplicate key rewriting.
//!
//! The first row carrying a key keeps it; the n-th later row gets
//! `key.n`. Counters live only for the duration of one call.

use std::collections::{HashMap, HashSet};

use ontoprep_model::Table;

use crate::error::{Result, TransformError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniquifyReport {
    pub table: Table,
    /// Position of the key column.
    pub key_index: usize,
    /// Distinct non-blank keys seen.
    pub distinct_keys: usize,
    /// Keys that occurred more than once.
    pub duplicated_keys: usize,
    /// Rows whose key received a suffix.
    pub suffixed_rows: usize,
    /// Rows that carried a non-blank key.
    pub keyed_rows: usize,
    /// Suffixed identifiers that equal a key already present in the source.
    pub colliding_keys: usize,
}

/// Rewrites duplicate values of `key_column` into unique identifiers.
///
/// The key column is located by exact header match. Rows whose key cell is
/// blank or missing are copied unchanged and do not touch any counter. The
/// header row is copied unchanged.
pub fn uniquify(table: &Table, key_column: &str) -> Result<UniquifyReport> {
    let key_index = table
        .column_index(key_column)
        .ok_or_else(|| TransformError::MissingColumn {
            column: key_column.to_string(),
            available: table
                .header()
                .map(|header| header.cells().to_vec())
                .unwrap_or_default(),
        })?;

    let source_keys: HashSet<&str> = table
        .data_rows()
        .iter()
        .map(|row| row.cell_or_blank(key_index).trim())
        .filter(|key| !key.is_empty())
        .collect();

    let mut occurrences: HashMap<String, usize> = HashMap::new();
    let mut output = Table::default();
    let mut keyed_rows = 0;
    let mut suffixed_rows = 0;
    let mut colliding_keys = 0;

    for (position, row) in table.rows().iter().enumerate() {
        let mut row = row.clone();
        if position > 0 && !row.is_blank_at(key_index) {
            let key = row.cell_or_blank(key_index).trim().to_string();
            let count = occurrences.entry(key.clone()).or_default();
            *count += 1;
            let identifier = if *count == 1 {
                key
            } else {
                suffixed_rows += 1;
                let suffixed = format!("{key}.{}", *count - 1);
                if source_keys.contains(suffixed.as_str()) {
                    colliding_keys += 1;
                    tracing::warn!(
                        key_column,
                        key = %suffixed,
                        row = position,
                        "generated identifier already exists in the source"
                    );
                }
                suffixed
            };
            row.replace_cell(key_index, identifier);
            keyed_rows += 1;
        }
        output.push(row);
    }

    let duplicated_keys = occurrences.values().filter(|&&count| count > 1).count();
    tracing::debug!(
        key_column,
        keyed_rows,
        distinct_keys = occurrences.len(),
        duplicated_keys,
        suffixed_rows,
        colliding_keys,
        "uniquified keys"
    );

    Ok(UniquifyReport {
        table: output,
        key_index,
        distinct_keys: occurrences.len(),
        duplicated_keys,
        suffixed_rows,
        keyed_rows,
        colliding_keys,
    })
}
