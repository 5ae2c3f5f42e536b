//! Integrity verification report types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A reconciliation check whose two sides disagree.
///
/// Mismatches are recorded in the [`VerificationReport`]; they never abort a
/// run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{check}: expected {expected}, observed {observed}")]
pub struct IntegrityMismatch {
    pub check: String,
    pub expected: String,
    pub observed: String,
}

/// Count taken from the tabular source compared with the same count taken
/// from generated graph text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountReconciliation {
    pub label: String,
    pub source_count: usize,
    pub graph_count: usize,
    pub equal: bool,
    /// `source_count - graph_count`.
    pub delta: i64,
}

impl CountReconciliation {
    pub fn new(label: impl Into<String>, source_count: usize, graph_count: usize) -> Self {
        let delta = i64::try_from(source_count).unwrap_or(i64::MAX)
            - i64::try_from(graph_count).unwrap_or(i64::MAX);
        Self {
            label: label.into(),
            source_count,
            graph_count,
            equal: source_count == graph_count,
            delta,
        }
    }

    pub fn mismatch(&self) -> Option<IntegrityMismatch> {
        (!self.equal).then(|| IntegrityMismatch {
            check: self.label.clone(),
            expected: self.source_count.to_string(),
            observed: self.graph_count.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

/// Value frequencies for one categorical field, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub field: String,
    /// Number of non-blank values counted.
    pub total: usize,
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    /// Counts values, skipping blanks. Ties are broken by value so the order
    /// is stable across runs.
    pub fn from_values<'a>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for value in values {
            if value.trim().is_empty() {
                continue;
            }
            *counts.entry(value).or_default() += 1;
        }
        let total = counts.values().sum();
        let mut entries: Vec<FrequencyEntry> = counts
            .into_iter()
            .map(|(value, count)| FrequencyEntry {
                value: value.to_string(),
                count,
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        Self {
            field: field.into(),
            total,
            entries,
        }
    }

    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn count_of(&self, value: &str) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.value == value)
            .map_or(0, |entry| entry.count)
    }

    pub fn top(&self, n: usize) -> &[FrequencyEntry] {
        &self.entries[..n.min(self.entries.len())]
    }
}

/// How raw literal values are parsed for a numeric summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    Decimal,
    Integer,
}

impl NumericKind {
    pub fn parse(self, raw: &str) -> Option<f64> {
        let raw = raw.trim();
        match self {
            NumericKind::Decimal => raw.parse::<f64>().ok().filter(|v| v.is_finite()),
            // i64 -> f64 is lossy past 2^53; sample sizes never get there.
            #[allow(clippy::cast_precision_loss)]
            NumericKind::Integer => raw.parse::<i64>().ok().map(|v| v as f64),
        }
    }
}

/// Mean/min/max over the parseable values of one numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub field: String,
    pub kind: NumericKind,
    /// Values that parsed.
    pub count: usize,
    /// Values that did not parse and were left out of the aggregate.
    pub excluded: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    pub fn from_values<'a>(
        field: impl Into<String>,
        kind: NumericKind,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut parsed = Vec::new();
        let mut excluded = 0;
        for raw in values {
            match kind.parse(raw) {
                Some(value) => parsed.push(value),
                None => excluded += 1,
            }
        }
        let count = parsed.len();
        #[allow(clippy::cast_precision_loss)]
        let mean = (count > 0).then(|| parsed.iter().sum::<f64>() / count as f64);
        let min = parsed.iter().copied().reduce(f64::min);
        let max = parsed.iter().copied().reduce(f64::max);
        Self {
            field: field.into(),
            kind,
            count,
            excluded,
            mean,
            min,
            max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub label: String,
    pub count: usize,
}

/// Number of instances typed with one ontology class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCount {
    pub class: String,
    pub count: usize,
}

/// Taxonomy file contents compared with the extracted concept graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyReconciliation {
    pub classes: CountReconciliation,
    pub subclass_relations: CountReconciliation,
    pub roots: usize,
    pub multi_parent_nodes: usize,
    pub label_conflicts: usize,
    pub cycle: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub analyses: CountReconciliation,
    pub entity_counts: Vec<EntityCount>,
    pub dependent_variable_types: FrequencyTable,
    pub independent_variable_types: FrequencyTable,
    pub categorical: Vec<FrequencyTable>,
    pub numeric: Vec<NumericSummary>,
    pub sample_size_buckets: Vec<BucketCount>,
    pub taxonomy: Option<TaxonomyReconciliation>,
    pub mismatches: Vec<IntegrityMismatch>,
}

impl VerificationReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn mismatch_count(&self) -> usize {
        self.mismatches.len()
    }

    pub fn categorical_field(&self, field: &str) -> Option<&FrequencyTable> {
        self.categorical.iter().find(|table| table.field == field)
    }

    pub fn numeric_field(&self, field: &str) -> Option<&NumericSummary> {
        self.numeric.iter().find(|summary| summary.field == field)
    }

    /// Rebuilds `mismatches` from the reconciliation checks.
    pub fn collect_mismatches(&mut self) {
        let mut mismatches: Vec<IntegrityMismatch> =
            self.analyses.mismatch().into_iter().collect();
        if let Some(taxonomy) = &self.taxonomy {
            mismatches.extend(taxonomy.classes.mismatch());
            mismatches.extend(taxonomy.subclass_relations.mismatch());
        }
        self.mismatches = mismatches;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconciliation_delta() {
        let same = CountReconciliation::new("analyses", 120, 120);
        assert!(same.equal);
        assert_eq!(same.delta, 0);
        assert!(same.mismatch().is_none());

        let short = CountReconciliation::new("analyses", 120, 118);
        assert!(!short.equal);
        assert_eq!(short.delta, 2);
        let mismatch = short.mismatch().expect("mismatch");
        assert_eq!(mismatch.to_string(), "analyses: expected 120, observed 118");
    }

    #[test]
    fn frequency_order_is_stable() {
        let table = FrequencyTable::from_values("gender", ["M", "F", "", "F", "Mixed", "M", " "]);
        assert_eq!(table.total, 5);
        let values: Vec<&str> = table.entries.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["F", "M", "Mixed"]);
        assert_eq!(table.count_of("M"), 2);
        assert_eq!(table.top(1).len(), 1);
        assert_eq!(table.top(10).len(), 3);
    }

    #[test]
    fn numeric_summary_skips_unparseable() {
        let summary =
            NumericSummary::from_values("degreR", NumericKind::Decimal, ["0.5", "n/a", "-0.1", ""]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.excluded, 2);
        assert_eq!(summary.min, Some(-0.1));
        assert_eq!(summary.max, Some(0.5));
        let mean = summary.mean.expect("mean");
        assert!((mean - 0.2).abs() < 1e-9);

        let sizes = NumericSummary::from_values("sampleSize", NumericKind::Integer, ["12.5", "40"]);
        assert_eq!(sizes.count, 1);
        assert_eq!(sizes.excluded, 1);
    }

    #[test]
    fn empty_numeric_summary_has_no_mean() {
        let summary = NumericSummary::from_values("meanAge", NumericKind::Decimal, []);
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_none());
    }
}
