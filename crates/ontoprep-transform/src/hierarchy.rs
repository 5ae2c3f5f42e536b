//! Concept hierarchy extraction from a wide table.
//!
//! Each hierarchy level lives in its own column, outermost first. A row
//! contributes one edge per pair of consecutive non-blank levels; blank
//! levels are skipped without breaking the chain.

use ontoprep_model::{ConceptGraph, Table};
use serde::Serialize;

use crate::error::{Result, TransformError};

/// Level columns of the variable hierarchy export.
pub const DEFAULT_LEVEL_COLUMNS: [&str; 5] = [
    "CLASS",
    "sub-class 1",
    "sub-class 2",
    "sub-class 3",
    "sub-class 4",
];

/// Derives a CamelCase identifier from label text.
///
/// Characters other than alphanumerics, whitespace and hyphens are dropped,
/// the text is split on whitespace, each word gets an uppercase first letter
/// and the words are joined. Hyphens are removed last. The rest of each word
/// keeps its case, so the function is idempotent on its own output.
///
/// Returns `None` when nothing usable remains.
pub fn to_identifier(text: &str) -> Option<String> {
    let filtered: String = text
        .chars()
        .filter(|ch| ch.is_alphanumeric() || ch.is_whitespace() || *ch == '-')
        .collect();

    let mut identifier = String::with_capacity(filtered.len());
    for word in filtered.split_whitespace() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            identifier.extend(first.to_uppercase());
            identifier.extend(chars);
        }
    }
    // Uppercasing can produce combining marks; keep only what the filter allows.
    identifier.retain(char::is_alphanumeric);

    (!identifier.is_empty()).then_some(identifier)
}

/// Builds the concept graph for `level_columns`, outermost first.
///
/// Level columns missing from the header are skipped. When none of them is
/// present the table cannot describe a hierarchy and `MissingColumn` is
/// returned for the first one.
pub fn extract(table: &Table, level_columns: &[&str]) -> Result<ConceptGraph> {
    let mut levels = Vec::with_capacity(level_columns.len());
    for &name in level_columns {
        match table.column_index(name) {
            Some(index) => levels.push(index),
            None => tracing::warn!(column = name, "hierarchy level column not found, skipping"),
        }
    }
    if levels.is_empty() {
        return Err(TransformError::MissingColumn {
            column: level_columns.first().copied().unwrap_or_default().to_string(),
            available: table
                .header()
                .map(|header| header.cells().to_vec())
                .unwrap_or_default(),
        });
    }

    let mut graph = ConceptGraph::new();
    for (row_number, row) in table.data_rows().iter().enumerate() {
        let mut current_parent: Option<String> = None;
        for &index in &levels {
            let label = row.cell_or_blank(index).trim();
            let Some(identifier) = to_identifier(label) else {
                continue;
            };
            graph.register_node(&identifier, label, row_number);
            if let Some(parent) = &current_parent {
                if *parent == identifier {
                    tracing::debug!(
                        row = row_number,
                        identifier = %identifier,
                        "skipping self-loop"
                    );
                    continue;
                }
                graph.add_edge(&identifier, parent);
            }
            current_parent = Some(identifier);
        }
    }

    for conflict in graph.label_conflicts() {
        tracing::warn!(
            identifier = %conflict.identifier,
            kept = %conflict.kept_label,
            discarded = %conflict.discarded_label,
            row = conflict.row,
            "label conflict, keeping first label"
        );
    }
    for (child, parents) in graph.multi_parent_nodes() {
        tracing::warn!(
            concept = child,
            parents = parents.len(),
            "concept attached to several parents"
        );
    }
    tracing::info!(
        classes = graph.node_count(),
        relations = graph.edges().len(),
        "extracted hierarchy"
    );
    Ok(graph)
}

/// Summary of an extracted taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomyStats {
    pub classes: usize,
    pub relations: usize,
    pub distinct_relations: usize,
    /// Root labels, ordered by identifier.
    pub roots: Vec<String>,
    /// `(parent label, child label)` for the first contributed edges.
    pub example_chains: Vec<(String, String)>,
    pub multi_parent_nodes: usize,
    pub label_conflicts: usize,
    pub cycle: Option<Vec<String>>,
}

const EXAMPLE_CHAINS: usize = 5;

pub fn taxonomy_stats(graph: &ConceptGraph) -> TaxonomyStats {
    let label = |id: &str| graph.label(id).unwrap_or(id).to_string();
    TaxonomyStats {
        classes: graph.node_count(),
        relations: graph.edges().len(),
        distinct_relations: graph.distinct_edges().len(),
        roots: graph.roots().into_iter().map(label).collect(),
        example_chains: graph
            .edges()
            .iter()
            .take(EXAMPLE_CHAINS)
            .map(|edge| (label(&edge.parent), label(&edge.child)))
            .collect(),
        multi_parent_nodes: graph.multi_parent_nodes().len(),
        label_conflicts: graph.label_conflicts().len(),
        cycle: graph.find_cycle(),
    }
}
