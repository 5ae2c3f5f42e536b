//! Table transformations for the ontoprep pipeline.
//!
//! - [`normalize`]: drop blank rows and columns, keep column order
//! - [`uniquify`]: rewrite duplicate record keys into `key`, `key.1`, ...
//! - [`extract`]: derive a concept graph from wide hierarchy columns
//! - [`clean_encoded_spaces`]: post-process generated graph text
//!
//! Everything here is a pure function over its inputs; file I/O belongs to
//! the caller.

pub mod error;
pub mod hierarchy;
pub mod normalize;
pub mod uniquify;
pub mod uri;

pub use error::{Result, TransformError};
pub use hierarchy::{DEFAULT_LEVEL_COLUMNS, TaxonomyStats, extract, taxonomy_stats, to_identifier};
pub use normalize::{
    NormalizeOptions, NormalizeStats, NormalizedTable, normalize, normalize_delimited,
    normalize_with,
};
pub use uniquify::{UniquifyReport, uniquify};
pub use uri::{CleanedText, clean_encoded_spaces};
