//! Property tests for the table transformations.

use std::collections::{BTreeSet, HashMap};

use ontoprep_model::{ConceptGraph, Table};
use ontoprep_transform::{
    DEFAULT_LEVEL_COLUMNS, NormalizeOptions, extract, normalize, normalize_with, to_identifier,
    uniquify,
};
use proptest::prelude::*;

fn cell_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("  ".to_string()),
        "[a-c]{1,3}",
        "[a-c ]{1,4}",
    ]
}

fn table_strategy() -> impl Strategy<Value = Table> {
    prop::collection::vec(prop::collection::vec(cell_strategy(), 0..6), 0..8)
        .prop_map(Table::from_cells)
}

fn key_column_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![Just(String::new()), Just(" ".to_string()), "[1-4]"],
        0..20,
    )
}

fn hierarchy_strategy() -> impl Strategy<Value = Table> {
    let label = prop_oneof![
        Just(String::new()),
        Just("Anxiety".to_string()),
        Just("anxiety".to_string()),
        Just("Social anxiety".to_string()),
        Just("Stress".to_string()),
        Just("Coping".to_string()),
        Just("Self-esteem".to_string()),
    ];
    prop::collection::vec(prop::collection::vec(label, 0..5), 0..12).prop_map(|rows| {
        let header: Vec<String> = DEFAULT_LEVEL_COLUMNS.iter().map(ToString::to_string).collect();
        Table::from_cells(std::iter::once(header).chain(rows))
    })
}

fn key_table(keys: &[String]) -> Table {
    let header = vec!["Title".to_string(), "Analysis_ID".to_string()];
    let rows = keys
        .iter()
        .enumerate()
        .map(|(i, key)| vec![format!("row {i}"), key.clone()]);
    Table::from_cells(std::iter::once(header).chain(rows))
}

fn derived_roots(graph: &ConceptGraph) -> BTreeSet<String> {
    let children: BTreeSet<&str> = graph.edges().iter().map(|e| e.child.as_str()).collect();
    graph
        .nodes()
        .filter(|node| !children.contains(node))
        .map(ToString::to_string)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn normalize_is_a_fixed_point(table in table_strategy()) {
        if let Ok(first) = normalize(&table) {
            let second = normalize(&first.table).expect("normalized output is never empty");
            prop_assert_eq!(&second.table, &first.table);
            let all: Vec<usize> = (0..first.table.width()).collect();
            prop_assert_eq!(second.kept_columns, all);
        }
    }

    #[test]
    fn normalize_output_has_no_blank_rows_or_columns(table in table_strategy()) {
        if let Ok(result) = normalize(&table) {
            let width = result.table.width();
            for row in result.table.rows() {
                prop_assert!(!row.is_blank());
                prop_assert_eq!(row.len(), width);
            }
            for column in 0..width {
                prop_assert!(result.table.rows().iter().any(|row| !row.is_blank_at(column)));
            }
            prop_assert!(result.kept_columns.windows(2).all(|pair| pair[0] < pair[1]));
        } else {
            prop_assert!(table.rows().iter().all(|row| row.is_blank()));
        }
    }

    #[test]
    fn capped_normalize_is_stable(table in table_strategy(), cap in 0usize..6) {
        let options = NormalizeOptions::new().with_max_columns(cap);
        match normalize_with(&table, options) {
            Ok(first) => {
                prop_assert!(first.table.width() <= cap);
                prop_assert!(first.kept_columns.iter().all(|&index| index < cap));
                for row in first.table.rows() {
                    prop_assert!(!row.is_blank());
                }
                let second = normalize_with(&first.table, options)
                    .expect("capped output is never empty");
                prop_assert_eq!(&second.table, &first.table);
            }
            Err(_) => {
                for row in table.rows() {
                    prop_assert!((0..cap).all(|index| row.is_blank_at(index)));
                }
            }
        }
    }

    #[test]
    fn uniquify_produces_one_bare_key_and_numbered_copies(keys in key_column_strategy()) {
        let table = key_table(&keys);
        let report = uniquify(&table, "Analysis_ID").expect("key column present");

        let mut seen: HashMap<String, usize> = HashMap::new();
        for (input, output) in keys.iter().zip(report.table.data_rows()) {
            let written = output.cell_or_blank(1);
            if input.trim().is_empty() {
                prop_assert_eq!(written, input.as_str());
                continue;
            }
            let count = seen.entry(input.trim().to_string()).or_default();
            let expected = if *count == 0 {
                input.trim().to_string()
            } else {
                format!("{}.{}", input.trim(), count)
            };
            *count += 1;
            prop_assert_eq!(written, expected.as_str());
        }
        prop_assert_eq!(report.distinct_keys, seen.len());
        prop_assert_eq!(&report.table.rows()[0], &table.rows()[0]);
    }

    #[test]
    fn blank_keys_do_not_shift_other_counters(keys in key_column_strategy()) {
        let with_blanks = uniquify(&key_table(&keys), "Analysis_ID").expect("uniquify");
        let kept: Vec<String> = keys.iter().filter(|k| !k.trim().is_empty()).cloned().collect();
        let without_blanks = uniquify(&key_table(&kept), "Analysis_ID").expect("uniquify");

        let keyed: Vec<&str> = keys
            .iter()
            .zip(with_blanks.table.data_rows())
            .filter(|(input, _)| !input.trim().is_empty())
            .map(|(_, row)| row.cell_or_blank(1))
            .collect();
        let compact: Vec<&str> = without_blanks
            .table
            .data_rows()
            .iter()
            .map(|row| row.cell_or_blank(1))
            .collect();
        prop_assert_eq!(keyed, compact);
    }

    #[test]
    fn extracted_edges_are_well_formed(table in hierarchy_strategy()) {
        let graph = extract(&table, &DEFAULT_LEVEL_COLUMNS).expect("level columns present");
        for edge in graph.edges() {
            prop_assert_ne!(&edge.child, &edge.parent);
            prop_assert!(graph.contains(&edge.child));
            prop_assert!(graph.contains(&edge.parent));
        }
        let roots: BTreeSet<String> = graph.roots().into_iter().map(ToString::to_string).collect();
        prop_assert_eq!(roots, derived_roots(&graph));
    }

    #[test]
    fn identifier_is_idempotent(text in "[a-zA-Z0-9 é_&/-]{0,24}") {
        let once = to_identifier(&text);
        prop_assert_eq!(&to_identifier(&text), &once);
        if let Some(identifier) = once {
            prop_assert_eq!(to_identifier(&identifier), Some(identifier.clone()));
            prop_assert!(identifier.chars().all(char::is_alphanumeric));
        }
    }
}
