//! Error types for delimited text ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing source files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Input file does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited content.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to encode rows as delimited text.
    #[error("failed to write CSV {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },
}

impl IngestError {
    /// Path of the file involved in the failure.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::FileNotFound { path }
            | Self::FileRead { path, .. }
            | Self::FileWrite { path, .. }
            | Self::CsvParse { path, .. }
            | Self::CsvWrite { path, .. } => path,
        }
    }

    pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("data-csv/Sport-Hierarchy.csv"),
        };
        assert_eq!(err.to_string(), "file not found: data-csv/Sport-Hierarchy.csv");
    }

    #[test]
    fn test_not_found_is_classified() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = IngestError::read(std::path::Path::new("a.csv"), io);
        assert!(matches!(err, IngestError::FileNotFound { .. }));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = IngestError::read(std::path::Path::new("a.csv"), io);
        assert!(matches!(err, IngestError::FileRead { .. }));
        assert_eq!(err.path(), &PathBuf::from("a.csv"));
    }
}
