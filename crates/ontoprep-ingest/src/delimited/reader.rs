//! Delimited file reading.

use std::path::Path;

use csv::ReaderBuilder;
use ontoprep_model::{Row, Table};

use crate::error::{IngestError, Result};

const BOM: char = '\u{feff}';

/// Reads a whole text file, dropping a leading UTF-8 byte-order mark.
pub fn read_text(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
    Ok(match text.strip_prefix(BOM) {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Reads a delimited file into a [`Table`].
///
/// Every line becomes a row, the header included. Rows keep their physical
/// width; ragged input is not padded here.
pub fn read_table(path: &Path, delimiter: u8) -> Result<Table> {
    let text = read_text(path)?;
    let table = parse_rows(&text, delimiter).map_err(|message| IngestError::CsvParse {
        path: path.to_path_buf(),
        message,
    })?;
    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        width = table.width(),
        "read delimited table"
    );
    Ok(table)
}

/// Parses delimited text already held in memory.
///
/// A leading byte-order mark is tolerated.
pub fn parse_table(text: &str, delimiter: u8) -> Result<Table> {
    parse_rows(text, delimiter).map_err(|message| IngestError::CsvParse {
        path: "<memory>".into(),
        message,
    })
}

fn parse_rows(text: &str, delimiter: u8) -> std::result::Result<Table, String> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    let mut table = Table::default();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        table.push(record.iter().collect::<Row>());
    }
    Ok(table)
}
