pub mod graph;
pub mod report;
pub mod schema;
pub mod table;

pub use graph::{ConceptGraph, Edge, LabelConflict};
pub use report::{
    BucketCount, CountReconciliation, EntityCount, FrequencyEntry, FrequencyTable,
    IntegrityMismatch, NumericKind, NumericSummary, TaxonomyReconciliation, VerificationReport,
};
pub use table::{Row, Table};
