//! Delimited file writing with minimal quoting.

use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use ontoprep_model::Table;

use crate::error::{IngestError, Result};

/// Renders a table as delimited text.
///
/// A field is quoted only when it contains the delimiter, a quote character
/// or a line break. Rows are written at their own width.
pub fn to_delimited_string(table: &Table, delimiter: u8) -> Result<String> {
    render(table, delimiter).map_err(|message| IngestError::CsvWrite {
        path: "<memory>".into(),
        message,
    })
}

/// Writes a table to `path`, replacing any existing file.
///
/// The write is not atomic.
pub fn write_table(path: &Path, table: &Table, delimiter: u8) -> Result<()> {
    let text = render(table, delimiter).map_err(|message| IngestError::CsvWrite {
        path: path.to_path_buf(),
        message,
    })?;
    write_text(path, &text)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        "wrote delimited table"
    );
    Ok(())
}

/// Writes text to `path`, replacing any existing file.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn render(table: &Table, delimiter: u8) -> std::result::Result<String, String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in table.rows() {
        writer.write_record(row.cells()).map_err(|e| e.to_string())?;
    }
    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}
