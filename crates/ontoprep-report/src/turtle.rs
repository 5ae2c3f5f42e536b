//! Taxonomy rendering as Turtle.
//!
//! Output order is fully determined by identifiers: roots sorted, parent
//! groups sorted, children sorted within a group. Re-running on the same
//! graph yields byte-identical files.

use std::path::Path;

use anyhow::{Context, Result};

use ontoprep_model::ConceptGraph;
use ontoprep_model::schema::{
    CLASS_TYPE, COMMENT, LABEL, LABEL_LANGUAGE, ROOT_COMMENT, ROOT_COMMENT_LANGUAGE, SUBCLASS_OF,
    TAXONOMY_PREFIXES, concept_name, lang_literal,
};

const RULE: &str = "# ============================================";

/// Options for taxonomy rendering.
#[derive(Debug, Clone, Default)]
pub struct TurtleOptions {
    /// Source file named in the banner comment.
    pub source_name: Option<String>,
}

impl TurtleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }
}

/// Renders the concept graph with default options.
pub fn serialize(graph: &ConceptGraph) -> String {
    serialize_with(graph, &TurtleOptions::default())
}

pub fn serialize_with(graph: &ConceptGraph, options: &TurtleOptions) -> String {
    let roots = graph.roots();
    let groups = graph.children_by_parent();
    let relation_count: usize = groups.values().map(std::collections::BTreeSet::len).sum();

    let mut out = String::new();
    for (prefix, namespace) in TAXONOMY_PREFIXES {
        out.push_str(&format!("@prefix {prefix}: <{namespace}> .\n"));
    }
    out.push('\n');
    out.push_str(RULE);
    out.push_str("\n# Taxonomie IA-DAS - Hiérarchie des concepts\n");
    out.push_str(RULE);
    out.push('\n');
    if let Some(source) = &options.source_name {
        out.push_str(&format!("# Générée automatiquement depuis {source}\n"));
    }
    out.push_str(&format!(
        "# Total: {} classes, {relation_count} relations\n\n",
        graph.node_count()
    ));

    out.push_str("# Classes racines\n# ---------------\n\n");
    for &root in &roots {
        let label = graph.label(root).unwrap_or(root);
        out.push_str(&format!(
            "{} a {CLASS_TYPE} ;\n    {LABEL} {} ;\n    {COMMENT} {} .\n\n",
            concept_name(root),
            lang_literal(label, LABEL_LANGUAGE),
            lang_literal(ROOT_COMMENT, ROOT_COMMENT_LANGUAGE),
        ));
    }

    out.push_str("# Hiérarchie des sous-classes\n# ---------------------------\n\n");
    for (&parent, children) in &groups {
        let heading = graph.label(parent).unwrap_or(parent).replace(['\n', '\r'], " ");
        out.push_str(&format!("# Sous-classes de {heading}\n"));
        for &child in children {
            let label = graph.label(child).unwrap_or(child);
            out.push_str(&format!(
                "{} a {CLASS_TYPE} ;\n    {SUBCLASS_OF} {} ;\n    {LABEL} {} .\n\n",
                concept_name(child),
                concept_name(parent),
                lang_literal(label, LABEL_LANGUAGE),
            ));
        }
    }

    tracing::debug!(
        roots = roots.len(),
        groups = groups.len(),
        relations = relation_count,
        "rendered taxonomy"
    );
    out
}

/// Renders the taxonomy and writes it to `path`, replacing any existing file.
pub fn write_taxonomy(path: &Path, graph: &ConceptGraph, options: &TurtleOptions) -> Result<()> {
    let text = serialize_with(graph, options);
    std::fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), classes = graph.node_count(), "wrote taxonomy");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> ConceptGraph {
        let mut graph = ConceptGraph::new();
        graph.register_node("Sport", "Sport", 0);
        graph.register_node("TeamSport", "Team \"sport\"", 0);
        graph.register_node("Rugby", "Rugby", 0);
        graph.add_edge("TeamSport", "Sport");
        graph.add_edge("Rugby", "TeamSport");
        graph.add_edge("Rugby", "TeamSport");
        graph
    }

    #[test]
    fn duplicate_edges_render_once() {
        let text = serialize(&graph());
        assert_eq!(text.matches("iadas:Rugby a rdfs:Class").count(), 1);
        assert!(text.contains("# Total: 3 classes, 2 relations"));
    }

    #[test]
    fn labels_are_escaped() {
        let text = serialize(&graph());
        assert!(text.contains(r#"rdfs:label "Team \"sport\""@en"#));
        assert!(text.contains("# Sous-classes de Team \"sport\""));
    }

    #[test]
    fn source_name_appears_in_banner() {
        let options = TurtleOptions::new().with_source_name("Class-Hierarchy-V1.csv");
        let text = serialize_with(&graph(), &options);
        assert!(text.contains("# Générée automatiquement depuis Class-Hierarchy-V1.csv\n"));
    }

    #[test]
    fn output_is_stable() {
        assert_eq!(serialize(&graph()), serialize(&graph()));
    }
}
