//! Error types for table transformations.

use thiserror::Error;

/// Errors raised by a single transformation.
///
/// These abort the current transformation only; the caller decides whether
/// the whole run stops.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Every row was blank after trimming.
    #[error("no usable rows: all {rows_seen} input rows are blank")]
    EmptyInput { rows_seen: usize },

    /// A required header is absent.
    #[error("required column '{column}' not found (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// Delimited text could not be parsed.
    #[error(transparent)]
    Ingest(#[from] ontoprep_ingest::IngestError),
}

pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_lists_available_headers() {
        let err = TransformError::MissingColumn {
            column: "Analysis_ID".to_string(),
            available: vec!["DOI".to_string(), "Title".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "required column 'Analysis_ID' not found (available: DOI, Title)"
        );
    }

    #[test]
    fn empty_input_display() {
        let err = TransformError::EmptyInput { rows_seen: 3 };
        assert_eq!(err.to_string(), "no usable rows: all 3 input rows are blank");
    }
}
