use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use ontoprep_cli::config::{PipelineConfig, Settings, SourceKind};
use ontoprep_cli::engine::RmlMapperEngine;
use ontoprep_cli::pipeline::{RunState, run_pipeline};
use ontoprep_ingest::{SEMICOLON, read_table, read_text, write_table, write_text};
use ontoprep_model::VerificationReport;
use ontoprep_report::{TurtleOptions, write_report_json, write_taxonomy};
use ontoprep_transform::{
    DEFAULT_LEVEL_COLUMNS, NormalizeOptions, NormalizeStats, UniquifyReport,
    clean_encoded_spaces, extract, normalize_with, taxonomy_stats, uniquify,
};
use ontoprep_validate::{VerifyOptions, attach_taxonomy, verify_files, verify_taxonomy};

use crate::cli::{
    CleanArgs, CleanUrisArgs, ConfigArgs, ConvertArgs, PipelineArgs, SettingsArgs, TaxonomyArgs,
    UniquifyArgs, VerifyArgs,
};
use crate::types::{ConfigResult, PipelineResult, TaxonomyResult, VerifyResult};

pub fn run_clean(args: &CleanArgs) -> Result<NormalizeStats> {
    let table = read_table(&args.input, args.delimiter.byte())?;
    let options = NormalizeOptions {
        max_columns: args.max_columns,
    };
    let normalized = normalize_with(&table, options)
        .with_context(|| format!("clean {}", args.input.display()))?;
    let delimiter = args.output_delimiter.unwrap_or(args.delimiter).byte();
    write_table(&args.output, &normalized.table, delimiter)?;
    info!(
        path = %args.output.display(),
        kept_columns = ?normalized.kept_columns,
        "wrote cleaned table"
    );
    Ok(normalized.stats)
}

pub fn run_convert(args: &ConvertArgs) -> Result<usize> {
    let table = read_table(&args.input, args.from.byte())?;
    write_table(&args.output, &table, args.to.byte())?;
    info!(path = %args.output.display(), rows = table.len(), "converted separators");
    Ok(table.len())
}

pub fn run_uniquify(args: &UniquifyArgs) -> Result<UniquifyReport> {
    let table = read_table(&args.input, args.delimiter.byte())?;
    let report =
        uniquify(&table, &args.key).with_context(|| format!("uniquify {}", args.input.display()))?;
    write_table(&args.output, &report.table, args.delimiter.byte())?;
    Ok(report)
}

pub fn run_taxonomy(args: &TaxonomyArgs) -> Result<TaxonomyResult> {
    let table = read_table(&args.input, args.delimiter.byte())?;
    let levels: Vec<&str> = if args.levels.is_empty() {
        DEFAULT_LEVEL_COLUMNS.to_vec()
    } else {
        args.levels.iter().map(String::as_str).collect()
    };
    let graph = extract(&table, &levels)
        .with_context(|| format!("extract hierarchy from {}", args.input.display()))?;

    let mut options = TurtleOptions::new();
    if let Some(name) = args.input.file_name() {
        options = options.with_source_name(name.to_string_lossy());
    }
    write_taxonomy(&args.output, &graph, &options)?;

    let reconciliation = if args.check {
        let text = read_text(&args.output)?;
        Some(verify_taxonomy(&graph, &text)?)
    } else {
        None
    };
    Ok(TaxonomyResult {
        output: args.output.clone(),
        stats: taxonomy_stats(&graph),
        reconciliation,
    })
}

pub fn run_clean_uris(args: &CleanUrisArgs) -> Result<(PathBuf, usize)> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_clean_path(&args.input));
    let text = read_text(&args.input)?;
    let cleaned = clean_encoded_spaces(&text);
    write_text(&output, &cleaned.text)?;
    info!(
        path = %output.display(),
        replacements = cleaned.replacements,
        "cleaned encoded spaces"
    );
    Ok((output, cleaned.replacements))
}

/// `graph.ttl` becomes `graph-clean.ttl` in the same directory.
fn default_clean_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}-clean.{}", ext.to_string_lossy()),
        None => format!("{stem}-clean"),
    };
    input.with_file_name(name)
}

pub fn run_verify(args: &VerifyArgs) -> Result<VerifyResult> {
    let settings = load_settings(&args.settings)?;
    let mut options = settings.verify;
    if let Some(key) = &args.key {
        options = options.with_key_column(key);
    }

    let mut report = verify_files(&args.source, &args.graph, &options)?;
    if let (Some(taxonomy), Some(hierarchy)) = (&args.taxonomy, &args.hierarchy) {
        let table = read_table(hierarchy, SEMICOLON)?;
        let graph = extract(&table, &DEFAULT_LEVEL_COLUMNS)
            .with_context(|| format!("extract hierarchy from {}", hierarchy.display()))?;
        let text = read_text(taxonomy)?;
        attach_taxonomy(&mut report, verify_taxonomy(&graph, &text)?);
    }

    if let Some(path) = &args.report_json {
        write_report_json(path, &report)?;
    }
    Ok(VerifyResult {
        report,
        report_json: args.report_json.clone(),
    })
}

pub fn run_pipeline_command(args: &PipelineArgs) -> Result<PipelineResult> {
    let base_dir = &args.settings.base_dir;
    let span = info_span!("pipeline", base_dir = %base_dir.display());
    let _guard = span.enter();

    let mut settings = load_settings(&args.settings)?;
    if let Some(java) = &args.java {
        settings.engine.java = java.clone();
    }
    if let Some(jar) = &args.engine_jar {
        settings.engine.jar = jar.clone();
    }
    let config = PipelineConfig::new(base_dir, settings).with_stop_after(args.stop_after);

    let engine = RmlMapperEngine::new(
        config.settings().engine.java.clone(),
        config.engine_jar(),
        config.base_dir(),
    )
    .with_extra_args(config.settings().engine.args.clone());
    let run = run_pipeline(&config, &engine);

    let verification = match run.state {
        RunState::Done if !args.skip_verify => Some(verify_final_ontology(&config)?),
        RunState::Done => {
            info!("verification skipped");
            None
        }
        _ => None,
    };
    Ok(PipelineResult {
        run,
        verification,
        results_dir: config.results_dir(),
    })
}

fn verify_final_ontology(config: &PipelineConfig) -> Result<VerificationReport> {
    let main = config.source(SourceKind::Main);
    let mut options: VerifyOptions = config.settings().verify.clone();
    if let Some(key) = &main.key_column {
        options = options.with_key_column(key);
    }
    let source = config.mapped_csv(SourceKind::Main);
    let graph = config.final_file(SourceKind::Main);
    let report = verify_files(&source, &graph, &options)
        .with_context(|| format!("verify {}", graph.display()))?;
    if !report.is_consistent() {
        warn!(
            mismatches = report.mismatch_count(),
            "final ontology does not match its source"
        );
    }
    Ok(report)
}

pub fn run_config(args: &ConfigArgs) -> Result<ConfigResult> {
    let source = Settings::locate(&args.settings.base_dir, args.settings.config.as_deref());
    let settings = load_settings(&args.settings)?;
    let toml = if args.print {
        Some(settings.to_toml()?)
    } else {
        None
    };
    Ok(ConfigResult { source, toml })
}

fn load_settings(args: &SettingsArgs) -> Result<Settings> {
    Settings::discover(&args.base_dir, args.config.as_deref())
}
