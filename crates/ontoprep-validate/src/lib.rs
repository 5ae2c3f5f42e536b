//! Integrity verification for generated ontologies.
//!
//! The generated graph is treated as text and scanned with marker patterns
//! from [`patterns`]. Counts and distributions are compared with the tabular
//! source the mapping engine consumed; disagreements end up in
//! [`VerificationReport::mismatches`] and never abort the pass.

mod error;
pub mod patterns;

use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use ontoprep_ingest::{COMMA, read_table, read_text};
use ontoprep_model::schema::{
    ANALYSIS_CLASS, DEPENDENT_VARIABLE_CLASS, DEPENDENT_VARIABLE_PREFIX,
    INDEPENDENT_VARIABLE_CLASS, INDEPENDENT_VARIABLE_PREFIX, RELATIONS_CLASS,
};
use ontoprep_model::{
    BucketCount, ConceptGraph, CountReconciliation, EntityCount, FrequencyTable, NumericKind,
    NumericSummary, Table, TaxonomyReconciliation, VerificationReport,
};

pub use error::{Result, VerifyError};

/// A numeric property and how its literals are parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericField {
    pub name: String,
    pub kind: NumericKind,
}

impl NumericField {
    pub fn new(name: impl Into<String>, kind: NumericKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// What to scan for and compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyOptions {
    /// Source column holding the unique record identifiers.
    pub key_column: String,
    /// Ontology class each source record becomes.
    pub record_class: String,
    /// Classes whose instances are counted.
    pub entity_classes: Vec<String>,
    pub categorical_fields: Vec<String>,
    pub numeric_fields: Vec<NumericField>,
    /// Integer property bucketed into size ranges.
    pub bucket_field: Option<String>,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            key_column: "Analysis_ID".to_string(),
            record_class: ANALYSIS_CLASS.to_string(),
            entity_classes: vec![
                DEPENDENT_VARIABLE_CLASS.to_string(),
                INDEPENDENT_VARIABLE_CLASS.to_string(),
                RELATIONS_CLASS.to_string(),
            ],
            categorical_fields: [
                "gender",
                "country",
                "sportName",
                "acads",
                "studyType",
                "resultatRelation",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            numeric_fields: vec![
                NumericField::new("degreR", NumericKind::Decimal),
                NumericField::new("meanAge", NumericKind::Decimal),
                NumericField::new("sampleSize", NumericKind::Integer),
            ],
            bucket_field: Some("sampleSize".to_string()),
        }
    }
}

impl VerifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_column(mut self, column: impl Into<String>) -> Self {
        self.key_column = column.into();
        self
    }
}

/// Sample-size ranges as `(label, lower bound inclusive, upper bound exclusive)`.
pub const SAMPLE_SIZE_BUCKETS: [(&str, i64, i64); 5] = [
    ("< 50", i64::MIN, 50),
    ("50-100", 50, 100),
    ("100-500", 100, 500),
    ("500-1000", 500, 1000),
    ("> 1000", 1000, i64::MAX),
];

/// Counts integer-parseable values per sample-size range. Other values are
/// ignored.
pub fn sample_size_buckets<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<BucketCount> {
    let mut counts = [0usize; SAMPLE_SIZE_BUCKETS.len()];
    for value in values {
        let Ok(size) = value.trim().parse::<i64>() else {
            continue;
        };
        if let Some(slot) = SAMPLE_SIZE_BUCKETS
            .iter()
            .position(|&(_, low, high)| size >= low && (size < high || high == i64::MAX))
        {
            counts[slot] += 1;
        }
    }
    SAMPLE_SIZE_BUCKETS
        .iter()
        .zip(counts)
        .map(|(&(label, _, _), count)| BucketCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

/// Number of distinct non-blank key values in the source table.
pub fn count_source_keys(table: &Table, key_column: &str, path: &Path) -> Result<usize> {
    let index = table
        .column_index(key_column)
        .ok_or_else(|| VerifyError::MissingColumn {
            column: key_column.to_string(),
            path: path.to_path_buf(),
        })?;
    let keys: BTreeSet<&str> = table
        .data_rows()
        .iter()
        .filter(|row| !row.is_blank_at(index))
        .map(|row| row.cell_or_blank(index).trim())
        .collect();
    Ok(keys.len())
}

fn captures<'t>(pattern: &Regex, text: &'t str) -> Vec<&'t str> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Literal values of `property` in graph text, in document order.
pub fn property_values<'t>(text: &'t str, property: &str) -> Result<Vec<&'t str>> {
    Ok(captures(&patterns::property_value(property)?, text))
}

/// Number of instances typed with `class`.
pub fn count_type_markers(text: &str, class: &str) -> Result<usize> {
    Ok(patterns::type_marker(class)?.find_iter(text).count())
}

/// Frequencies of the concept classes given to variable instances, leaving
/// out the generic variable class itself.
pub fn concept_type_frequencies(
    text: &str,
    instance_prefix: &str,
    generic_class: &str,
) -> Result<FrequencyTable> {
    let pattern = patterns::instance_type(instance_prefix)?;
    let types = captures(&pattern, text)
        .into_iter()
        .filter(|class| *class != generic_class);
    Ok(FrequencyTable::from_values(generic_class, types))
}

/// Compares a tabular source with the graph text generated from it.
///
/// `source_path` is only used in error messages.
pub fn verify_graph(
    source: &Table,
    source_path: &Path,
    graph_text: &str,
    options: &VerifyOptions,
) -> Result<VerificationReport> {
    let source_keys = count_source_keys(source, &options.key_column, source_path)?;
    let graph_records = count_type_markers(graph_text, &options.record_class)?;
    let analyses = CountReconciliation::new("analyses", source_keys, graph_records);

    let entity_counts = options
        .entity_classes
        .iter()
        .map(|class| -> Result<EntityCount> {
            Ok(EntityCount {
                class: class.clone(),
                count: count_type_markers(graph_text, class)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let categorical = options
        .categorical_fields
        .iter()
        .map(|field| -> Result<FrequencyTable> {
            Ok(FrequencyTable::from_values(
                field.as_str(),
                property_values(graph_text, field)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let numeric = options
        .numeric_fields
        .iter()
        .map(|field| -> Result<NumericSummary> {
            Ok(NumericSummary::from_values(
                field.name.as_str(),
                field.kind,
                property_values(graph_text, &field.name)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let buckets = match &options.bucket_field {
        Some(field) => sample_size_buckets(property_values(graph_text, field)?),
        None => Vec::new(),
    };

    let mut report = VerificationReport {
        analyses,
        entity_counts,
        dependent_variable_types: concept_type_frequencies(
            graph_text,
            DEPENDENT_VARIABLE_PREFIX,
            DEPENDENT_VARIABLE_CLASS,
        )?,
        independent_variable_types: concept_type_frequencies(
            graph_text,
            INDEPENDENT_VARIABLE_PREFIX,
            INDEPENDENT_VARIABLE_CLASS,
        )?,
        categorical,
        numeric,
        sample_size_buckets: buckets,
        taxonomy: None,
        mismatches: Vec::new(),
    };
    report.collect_mismatches();
    log_outcome(&report);
    Ok(report)
}

/// Reads a comma-separated source and a graph file, then verifies them.
pub fn verify_files(
    source_csv: &Path,
    graph_ttl: &Path,
    options: &VerifyOptions,
) -> Result<VerificationReport> {
    let source = read_table(source_csv, COMMA)?;
    let graph_text = read_text(graph_ttl)?;
    tracing::debug!(
        source = %source_csv.display(),
        graph = %graph_ttl.display(),
        graph_bytes = graph_text.len(),
        "verifying generated graph"
    );
    verify_graph(&source, source_csv, &graph_text, options)
}

/// Compares a rendered taxonomy with the concept graph it was rendered from.
///
/// Each root and each distinct edge produces one class declaration; each
/// distinct edge produces one subclass relation.
pub fn verify_taxonomy(
    graph: &ConceptGraph,
    taxonomy_text: &str,
) -> Result<TaxonomyReconciliation> {
    let distinct_edges = graph.distinct_edges().len();
    let roots = graph.roots().len();
    let declared = patterns::class_declaration()?.find_iter(taxonomy_text).count();
    let related = patterns::subclass_relation()?.find_iter(taxonomy_text).count();

    Ok(TaxonomyReconciliation {
        classes: CountReconciliation::new("taxonomy classes", roots + distinct_edges, declared),
        subclass_relations: CountReconciliation::new(
            "taxonomy subclass relations",
            distinct_edges,
            related,
        ),
        roots,
        multi_parent_nodes: graph.multi_parent_nodes().len(),
        label_conflicts: graph.label_conflicts().len(),
        cycle: graph.find_cycle(),
    })
}

/// Attaches a taxonomy reconciliation to a report and refreshes mismatches.
pub fn attach_taxonomy(report: &mut VerificationReport, taxonomy: TaxonomyReconciliation) {
    report.taxonomy = Some(taxonomy);
    report.collect_mismatches();
    log_outcome(report);
}

fn log_outcome(report: &VerificationReport) {
    for mismatch in &report.mismatches {
        tracing::warn!(
            check = %mismatch.check,
            expected = %mismatch.expected,
            observed = %mismatch.observed,
            "integrity mismatch"
        );
    }
    if report.is_consistent() {
        tracing::info!(
            analyses = report.analyses.graph_count,
            "generated graph is consistent with its source"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        let buckets = sample_size_buckets([
            "49", "50", "99", "100", "499", "500", "999", "1000", "x", "12.5",
        ]);
        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 2, 2, 2, 1]);
        assert_eq!(buckets[4].label, "> 1000");
    }

    #[test]
    fn source_keys_are_distinct_and_trimmed() {
        let table = Table::from_cells([
            vec!["Analysis_ID"],
            vec!["1"],
            vec![" 1"],
            vec!["1.1"],
            vec![""],
        ]);
        let count = count_source_keys(&table, "Analysis_ID", Path::new("x.csv")).expect("count");
        assert_eq!(count, 2);
    }

    #[test]
    fn missing_key_column_names_file() {
        let table = Table::from_cells([vec!["ID"]]);
        let err = count_source_keys(&table, "Analysis_ID", Path::new("data.csv"))
            .expect_err("missing");
        assert_eq!(err.to_string(), "key column 'Analysis_ID' not found in data.csv");
    }

    #[test]
    fn generic_variable_class_is_excluded() {
        let text = concat!(
            "<http://ia-das.org/data#Variable_VI_1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ia-das.org/onto#VariableIndependante> .\n",
            "<http://ia-das.org/data#Variable_VI_1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ia-das.org/onto#Perfectionism> .\n",
            "<http://ia-das.org/data#Variable_VI_2> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ia-das.org/onto#Perfectionism> .\n",
        );
        let table =
            concept_type_frequencies(text, INDEPENDENT_VARIABLE_PREFIX, INDEPENDENT_VARIABLE_CLASS)
                .expect("frequencies");
        assert_eq!(table.total, 2);
        assert_eq!(table.count_of("Perfectionism"), 2);
        assert_eq!(table.count_of(INDEPENDENT_VARIABLE_CLASS), 0);
    }
}
