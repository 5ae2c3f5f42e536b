//! Concept graph derived from a wide hierarchy table.
//!
//! The graph is a directed multigraph: a concept may be attached to different
//! parents by different source rows, and the same edge may be contributed
//! more than once. Nodes are deduplicated by identifier; edges are not.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A child → parent relation contributed by one source row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub child: String,
    pub parent: String,
}

impl Edge {
    pub fn new(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
        }
    }
}

/// A later row that derived an existing identifier from different label text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConflict {
    pub identifier: String,
    /// Label kept for the node (the first one observed).
    pub kept_label: String,
    /// Label text that was discarded.
    pub discarded_label: String,
    /// Zero-based data row index where the discarded label appeared.
    pub row: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptGraph {
    labels: BTreeMap<String, String>,
    edges: Vec<Edge>,
    label_conflicts: Vec<LabelConflict>,
}

#[derive(Clone, Copy)]
enum VisitState {
    InProgress,
    Done,
}

impl ConceptGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node, keeping the first label ever seen for `identifier`.
    ///
    /// Returns `true` when the node did not exist yet. A differing label for
    /// an existing node is recorded as a [`LabelConflict`].
    pub fn register_node(&mut self, identifier: &str, label: &str, row: usize) -> bool {
        match self.labels.get(identifier) {
            Some(kept) => {
                if kept != label {
                    self.label_conflicts.push(LabelConflict {
                        identifier: identifier.to_string(),
                        kept_label: kept.clone(),
                        discarded_label: label.to_string(),
                        row,
                    });
                }
                false
            }
            None => {
                self.labels
                    .insert(identifier.to_string(), label.to_string());
                true
            }
        }
    }

    pub fn add_edge(&mut self, child: &str, parent: &str) {
        self.edges.push(Edge::new(child, parent));
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.labels.contains_key(identifier)
    }

    /// Node identifiers in lexicographic order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn label(&self, identifier: &str) -> Option<&str> {
        self.labels.get(identifier).map(String::as_str)
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    /// Every contributed edge, duplicates included, in contribution order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn label_conflicts(&self) -> &[LabelConflict] {
        &self.label_conflicts
    }

    /// Nodes that never appear on the child side of any edge.
    ///
    /// Computed over the complete edge list every time; rootness is never
    /// stored per node.
    pub fn roots(&self) -> BTreeSet<&str> {
        let children: BTreeSet<&str> = self.edges.iter().map(|e| e.child.as_str()).collect();
        self.nodes()
            .filter(|node| !children.contains(node))
            .collect()
    }

    /// Distinct (child, parent) pairs.
    pub fn distinct_edges(&self) -> BTreeSet<(&str, &str)> {
        self.edges
            .iter()
            .map(|e| (e.child.as_str(), e.parent.as_str()))
            .collect()
    }

    /// Distinct children grouped by parent, both sides sorted.
    pub fn children_by_parent(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        let mut grouped: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for edge in &self.edges {
            grouped
                .entry(edge.parent.as_str())
                .or_default()
                .insert(edge.child.as_str());
        }
        grouped
    }

    pub fn parents_of(&self, identifier: &str) -> BTreeSet<&str> {
        self.edges
            .iter()
            .filter(|e| e.child == identifier)
            .map(|e| e.parent.as_str())
            .collect()
    }

    /// Nodes attached to more than one distinct parent.
    pub fn multi_parent_nodes(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        let mut parents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for edge in &self.edges {
            parents
                .entry(edge.child.as_str())
                .or_default()
                .insert(edge.parent.as_str());
        }
        parents.retain(|_, set| set.len() > 1);
        parents
    }

    /// Finds a directed cycle following child → parent edges.
    ///
    /// Rows are walked independently, so two rows can order the same pair of
    /// concepts in opposite directions. The returned path starts and ends on
    /// the same node.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut adjacency: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for edge in &self.edges {
            adjacency
                .entry(edge.child.as_str())
                .or_default()
                .insert(edge.parent.as_str());
        }
        let mut state: BTreeMap<&str, VisitState> = BTreeMap::new();
        let mut path: Vec<&str> = Vec::new();
        for &start in adjacency.keys() {
            if state.contains_key(start) {
                continue;
            }
            if let Some(cycle) = visit(start, &adjacency, &mut state, &mut path) {
                return Some(cycle);
            }
        }
        None
    }
}

fn visit<'a>(
    node: &'a str,
    adjacency: &BTreeMap<&'a str, BTreeSet<&'a str>>,
    state: &mut BTreeMap<&'a str, VisitState>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    state.insert(node, VisitState::InProgress);
    path.push(node);
    if let Some(parents) = adjacency.get(node) {
        for &parent in parents {
            match state.get(parent).copied() {
                Some(VisitState::InProgress) => {
                    let start = path.iter().position(|n| *n == parent).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|n| (*n).to_string()).collect();
                    cycle.push(parent.to_string());
                    return Some(cycle);
                }
                Some(VisitState::Done) => {}
                None => {
                    if let Some(cycle) = visit(parent, adjacency, state, path) {
                        return Some(cycle);
                    }
                }
            }
        }
    }
    path.pop();
    state.insert(node, VisitState::Done);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)]) -> ConceptGraph {
        let mut graph = ConceptGraph::new();
        for (child, parent) in edges {
            graph.register_node(parent, parent, 0);
            graph.register_node(child, child, 0);
            graph.add_edge(child, parent);
        }
        graph
    }

    #[test]
    fn first_label_wins_and_conflict_is_recorded() {
        let mut graph = ConceptGraph::new();
        assert!(graph.register_node("EatingDisorders", "Eating disorders", 0));
        assert!(!graph.register_node("EatingDisorders", "Eating Disorders", 3));
        assert!(!graph.register_node("EatingDisorders", "Eating disorders", 4));
        assert_eq!(graph.label("EatingDisorders"), Some("Eating disorders"));
        assert_eq!(graph.label_conflicts().len(), 1);
        let conflict = &graph.label_conflicts()[0];
        assert_eq!(conflict.discarded_label, "Eating Disorders");
        assert_eq!(conflict.row, 3);
    }

    #[test]
    fn roots_are_nodes_never_seen_as_child() {
        let graph = graph(&[("B", "A"), ("C", "B"), ("E", "D")]);
        let roots: Vec<&str> = graph.roots().into_iter().collect();
        assert_eq!(roots, vec!["A", "D"]);
    }

    #[test]
    fn multi_parent_nodes_are_kept() {
        let graph = graph(&[("Shared", "A"), ("Shared", "B"), ("Shared", "A")]);
        assert_eq!(graph.edges().len(), 3);
        assert_eq!(graph.distinct_edges().len(), 2);
        let multi = graph.multi_parent_nodes();
        assert_eq!(multi.len(), 1);
        assert_eq!(multi["Shared"].len(), 2);
        assert_eq!(graph.parents_of("Shared").len(), 2);
    }

    #[test]
    fn children_grouped_and_sorted() {
        let graph = graph(&[("Z", "P"), ("A", "P"), ("A", "P"), ("M", "Q")]);
        let grouped = graph.children_by_parent();
        let p: Vec<&str> = grouped["P"].iter().copied().collect();
        assert_eq!(p, vec!["A", "Z"]);
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec!["P", "Q"]);
    }

    #[test]
    fn detects_cross_row_cycle() {
        let acyclic = graph(&[("B", "A"), ("C", "B")]);
        assert!(acyclic.find_cycle().is_none());

        let cyclic = graph(&[("B", "A"), ("A", "B")]);
        let cycle = cyclic.find_cycle().expect("cycle");
        assert_eq!(cycle.first(), cycle.last());
        assert!(cycle.len() >= 3);
    }

    fn node_name(index: u8) -> String {
        format!("N{index}")
    }

    proptest::proptest! {
        #[test]
        fn roots_partition_nodes(pairs in proptest::collection::vec((0u8..8, 0u8..8), 0..24)) {
            let names: Vec<(String, String)> = pairs
                .iter()
                .map(|(child, parent)| (node_name(*child), node_name(*parent)))
                .collect();
            let edges: Vec<(&str, &str)> = names
                .iter()
                .map(|(child, parent)| (child.as_str(), parent.as_str()))
                .collect();
            let graph = graph(&edges);
            let roots = graph.roots();
            for node in graph.nodes() {
                let is_child = graph.edges().iter().any(|edge| edge.child == node);
                proptest::prop_assert_eq!(roots.contains(node), !is_child);
            }
        }

        #[test]
        fn downward_edges_never_cycle(pairs in proptest::collection::vec((0u8..8, 0u8..8), 0..24)) {
            let names: Vec<(String, String)> = pairs
                .iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (node_name(*a.max(b)), node_name(*a.min(b))))
                .collect();
            let edges: Vec<(&str, &str)> = names
                .iter()
                .map(|(child, parent)| (child.as_str(), parent.as_str()))
                .collect();
            let graph = graph(&edges);
            proptest::prop_assert!(graph.find_cycle().is_none());
        }
    }
}
