use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent a verification pass from running.
///
/// Disagreements between source and graph are not errors; they are
/// recorded as mismatches in the report.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Ingest(#[from] ontoprep_ingest::IngestError),

    #[error("key column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("invalid scan pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, VerifyError>;
