//! Delimited text ingestion for the ontoprep pipeline.
//!
//! Source spreadsheets are exported as semicolon-separated UTF-8, often with
//! a byte-order mark; the mapping engine consumes comma-separated files. This
//! crate moves [`Table`](ontoprep_model::Table) values between those files
//! and memory without altering cell content.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use ontoprep_ingest::{SEMICOLON, COMMA, read_table, write_table};
//!
//! let table = read_table(Path::new("data-csv/IA-DAS-Data.csv"), SEMICOLON)?;
//! write_table(Path::new("data-csv-converted/IA-DAS-Data.csv"), &table, COMMA)?;
//! ```

mod delimited;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === Delimited I/O ===
pub use delimited::{
    parse_table, read_table, read_text, to_delimited_string, write_table, write_text,
};

/// Delimiter of the raw spreadsheet exports.
pub const SEMICOLON: u8 = b';';

/// Canonical output delimiter.
pub const COMMA: u8 = b',';
