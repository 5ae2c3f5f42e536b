use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ontoprep_cli::pipeline::RunState;
use ontoprep_model::{
    CountReconciliation, FrequencyTable, TaxonomyReconciliation, VerificationReport,
};
use ontoprep_transform::{NormalizeStats, UniquifyReport};

use crate::types::{ConfigResult, PipelineResult, TaxonomyResult, VerifyResult};

/// Entries shown per frequency table.
const TOP_VALUES: usize = 10;

pub fn print_clean(output: &Path, stats: &NormalizeStats) {
    println!("Cleaned: {}", output.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell(""), header_cell("In"), header_cell("Out")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Rows"),
        Cell::new(stats.rows_in),
        Cell::new(stats.rows_out),
    ]);
    table.add_row(vec![
        Cell::new("Columns"),
        Cell::new(stats.columns_in),
        Cell::new(stats.columns_out),
    ]);
    println!("{table}");
}

pub fn print_convert(output: &Path, rows: usize) {
    println!("Converted {rows} rows: {}", output.display());
}

pub fn print_uniquify(output: &Path, report: &UniquifyReport) {
    println!("Unique identifiers: {}", output.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Measure"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Keyed rows"), Cell::new(report.keyed_rows)]);
    table.add_row(vec![
        Cell::new("Distinct keys"),
        Cell::new(report.distinct_keys),
    ]);
    table.add_row(vec![
        Cell::new("Keys with duplicates"),
        count_cell(report.duplicated_keys, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Suffixed rows"),
        count_cell(report.suffixed_rows, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Suffixes clashing with source keys"),
        count_cell(report.colliding_keys, Color::Red),
    ]);
    println!("{table}");
}

pub fn print_clean_uris(output: &Path, replacements: usize) {
    println!(
        "Replaced {replacements} encoded spaces: {}",
        output.display()
    );
}

pub fn print_taxonomy(result: &TaxonomyResult) {
    let stats = &result.stats;
    println!("Taxonomy: {}", result.output.display());
    println!(
        "{} classes, {} relations ({} distinct), {} roots",
        stats.classes,
        stats.relations,
        stats.distinct_relations,
        stats.roots.len()
    );
    if !stats.roots.is_empty() {
        println!("Roots: {}", stats.roots.join(", "));
    }
    if !stats.example_chains.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Parent"), header_cell("Child")]);
        apply_table_style(&mut table);
        for (parent, child) in &stats.example_chains {
            table.add_row(vec![Cell::new(parent), Cell::new(child)]);
        }
        println!("{table}");
    }
    if stats.multi_parent_nodes > 0 || stats.label_conflicts > 0 {
        println!(
            "{} concepts with several parents, {} label conflicts",
            stats.multi_parent_nodes, stats.label_conflicts
        );
    }
    if let Some(cycle) = &stats.cycle {
        eprintln!("Cycle: {}", cycle.join(" -> "));
    }
    if let Some(reconciliation) = &result.reconciliation {
        print_taxonomy_reconciliation(reconciliation);
    }
}

pub fn print_verify(result: &VerifyResult) {
    print_report(&result.report);
    if let Some(path) = &result.report_json {
        println!("Report: {}", path.display());
    }
}

pub fn print_pipeline(result: &PipelineResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Time (ms)"),
        header_cell("File"),
        header_cell("Detail"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for report in &result.run.stages {
        let mut first = true;
        for artifact in &report.artifacts {
            let file = artifact
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let detail = match &artifact.sha256 {
                Some(digest) => format!("{} sha256:{}", artifact.detail, short_digest(digest)),
                None => artifact.detail.clone(),
            };
            let (stage, duration) = if first {
                (stage_cell(report.stage.as_str()), Cell::new(report.duration_ms))
            } else {
                (dim_cell(""), dim_cell(""))
            };
            first = false;
            table.add_row(vec![stage, duration, Cell::new(file), Cell::new(detail)]);
        }
        if report.artifacts.is_empty() {
            table.add_row(vec![
                stage_cell(report.stage.as_str()),
                Cell::new(report.duration_ms),
                dim_cell("-"),
                dim_cell("-"),
            ]);
        }
    }
    println!("{table}");

    match &result.run.state {
        RunState::Done => println!("Final files: {}", result.results_dir.display()),
        RunState::Stopped { after } => println!("Stopped after {after}"),
        RunState::Failed { error } => eprintln!("Pipeline failed: {error}"),
    }
    if let Some(report) = &result.verification {
        print_report(report);
    }
}

pub fn print_config(result: &ConfigResult) {
    match &result.source {
        Some(path) => println!("# configuration: {}", path.display()),
        None => println!("# configuration: built-in defaults"),
    }
    if let Some(text) = &result.toml {
        print!("{text}");
    }
}

fn print_report(report: &VerificationReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Source"),
        header_cell("Graph"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    add_reconciliation_row(&mut table, &report.analyses);
    if let Some(taxonomy) = &report.taxonomy {
        add_reconciliation_row(&mut table, &taxonomy.classes);
        add_reconciliation_row(&mut table, &taxonomy.subclass_relations);
    }
    println!("{table}");

    if !report.entity_counts.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Class"), header_cell("Instances")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for entity in &report.entity_counts {
            table.add_row(vec![Cell::new(&entity.class), Cell::new(entity.count)]);
        }
        println!("{table}");
    }

    for frequencies in [
        &report.dependent_variable_types,
        &report.independent_variable_types,
    ]
    .into_iter()
    .chain(&report.categorical)
    {
        print_frequencies(frequencies);
    }

    if !report.numeric.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Field"),
            header_cell("Values"),
            header_cell("Excluded"),
            header_cell("Mean"),
            header_cell("Min"),
            header_cell("Max"),
        ]);
        apply_table_style(&mut table);
        for column in 1..6 {
            align_column(&mut table, column, CellAlignment::Right);
        }
        for summary in &report.numeric {
            table.add_row(vec![
                Cell::new(&summary.field),
                Cell::new(summary.count),
                count_cell(summary.excluded, Color::Yellow),
                number_cell(summary.mean),
                number_cell(summary.min),
                number_cell(summary.max),
            ]);
        }
        println!("{table}");
    }

    if !report.sample_size_buckets.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Sample size"), header_cell("Analyses")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for bucket in &report.sample_size_buckets {
            table.add_row(vec![Cell::new(&bucket.label), Cell::new(bucket.count)]);
        }
        println!("{table}");
    }

    if report.is_consistent() {
        println!("Graph is consistent with its source.");
    } else {
        eprintln!("Integrity mismatches:");
        for mismatch in &report.mismatches {
            eprintln!("- {mismatch}");
        }
    }
}

fn print_taxonomy_reconciliation(reconciliation: &TaxonomyReconciliation) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Graph"),
        header_cell("File"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    add_reconciliation_row(&mut table, &reconciliation.classes);
    add_reconciliation_row(&mut table, &reconciliation.subclass_relations);
    println!("{table}");
}

fn print_frequencies(frequencies: &FrequencyTable) {
    if frequencies.entries.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(&frequencies.field),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in frequencies.top(TOP_VALUES) {
        table.add_row(vec![Cell::new(&entry.value), Cell::new(entry.count)]);
    }
    let hidden = frequencies.distinct().saturating_sub(TOP_VALUES);
    if hidden > 0 {
        table.add_row(vec![dim_cell(format!("... {hidden} more")), dim_cell("")]);
    }
    println!("{table}");
}

fn add_reconciliation_row(table: &mut Table, reconciliation: &CountReconciliation) {
    table.add_row(vec![
        Cell::new(&reconciliation.label),
        Cell::new(reconciliation.source_count),
        Cell::new(reconciliation.graph_count),
        status_cell(reconciliation),
    ]);
}

fn status_cell(reconciliation: &CountReconciliation) -> Cell {
    if reconciliation.equal {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new(format!("Δ {}", reconciliation.delta))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.2}")),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn stage_cell(stage: &str) -> Cell {
    Cell::new(stage)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
