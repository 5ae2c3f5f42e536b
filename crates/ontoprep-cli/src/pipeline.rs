//! End-to-end pipeline orchestration.
//!
//! Stages run in a fixed order. Each one checks that its inputs exist,
//! overwrites its outputs, and reports what it wrote. The first error moves
//! the run to [`RunState::Failed`]; later stages are not attempted and files
//! already written stay in place. Re-running the whole pipeline is safe.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tracing::{error, info, info_span};

use ontoprep_ingest::{
    COMMA, IngestError, SEMICOLON, read_table, read_text, write_table, write_text,
};
use ontoprep_transform::{
    NormalizeOptions, TransformError, clean_encoded_spaces, normalize_with, uniquify,
};

use crate::checksum::file_sha256;
use crate::config::{PipelineConfig, SourceKind};
use crate::engine::{EngineError, MappingEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Stage {
    PrerequisiteCheck,
    CleanSport,
    CleanHierarchy,
    CleanMainData,
    ConvertSeparators,
    UniquifyIds,
    GenerateOntologies,
    CleanUris,
    CopyFinalFiles,
}

impl Stage {
    pub const ALL: [Stage; 9] = [
        Stage::PrerequisiteCheck,
        Stage::CleanSport,
        Stage::CleanHierarchy,
        Stage::CleanMainData,
        Stage::ConvertSeparators,
        Stage::UniquifyIds,
        Stage::GenerateOntologies,
        Stage::CleanUris,
        Stage::CopyFinalFiles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::PrerequisiteCheck => "prerequisite-check",
            Stage::CleanSport => "clean-sport",
            Stage::CleanHierarchy => "clean-hierarchy",
            Stage::CleanMainData => "clean-main-data",
            Stage::ConvertSeparators => "convert-separators",
            Stage::UniquifyIds => "uniquify-ids",
            Stage::GenerateOntologies => "generate-ontologies",
            Stage::CleanUris => "clean-uris",
            Stage::CopyFinalFiles => "copy-final-files",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required input file, the engine archive, or the program that
    /// launches the engine is absent.
    #[error("{stage}: required file or tool missing: {path}")]
    MissingPrerequisite { stage: Stage, path: PathBuf },

    #[error("{stage}: mapping engine failed on {mapping} ({}): {stderr}", exit_text(.status))]
    ExternalToolFailure {
        stage: Stage,
        mapping: PathBuf,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{stage}: cannot transform {path}")]
    Transform {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: TransformError,
    },

    #[error("{stage}: {source}")]
    Ingest {
        stage: Stage,
        #[source]
        source: IngestError,
    },

    #[error("{stage}: I/O error on {path}")]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage}: copy of {path} does not match its source (expected {expected}, found {actual})")]
    ChecksumMismatch {
        stage: Stage,
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

fn exit_text(status: &Option<i32>) -> String {
    status.map_or_else(
        || "no exit status".to_string(),
        |code| format!("exit status {code}"),
    )
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::MissingPrerequisite { stage, .. }
            | PipelineError::ExternalToolFailure { stage, .. }
            | PipelineError::Transform { stage, .. }
            | PipelineError::Ingest { stage, .. }
            | PipelineError::Io { stage, .. }
            | PipelineError::ChecksumMismatch { stage, .. } => *stage,
        }
    }
}

type StageResult<T> = std::result::Result<T, PipelineError>;

/// One file a stage checked or wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub detail: String,
    /// Set for final files.
    pub sha256: Option<String>,
}

impl Artifact {
    fn new(path: PathBuf, detail: impl Into<String>) -> Self {
        Self {
            path,
            detail: detail.into(),
            sha256: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub duration_ms: u64,
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug)]
pub enum RunState {
    /// Every stage completed.
    Done,
    /// Completed through the configured last stage.
    Stopped { after: Stage },
    Failed { error: PipelineError },
}

#[derive(Debug)]
pub struct PipelineRun {
    /// Completed stages, in order.
    pub stages: Vec<StageReport>,
    pub state: RunState,
}

impl PipelineRun {
    pub fn is_success(&self) -> bool {
        !matches!(self.state, RunState::Failed { .. })
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match &self.state {
            RunState::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn report(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }
}

/// Runs every stage in order against `config`, delegating graph generation
/// to `engine`.
pub fn run_pipeline(config: &PipelineConfig, engine: &dyn MappingEngine) -> PipelineRun {
    let mut stages = Vec::new();
    info!(base_dir = %config.base_dir().display(), "starting pipeline");

    for stage in Stage::ALL {
        let span = info_span!("stage", stage = %stage);
        let _guard = span.enter();
        let started = Instant::now();

        match run_stage(stage, config, engine) {
            Ok(artifacts) => {
                let duration_ms =
                    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                info!(duration_ms, artifacts = artifacts.len(), "stage complete");
                stages.push(StageReport {
                    stage,
                    duration_ms,
                    artifacts,
                });
            }
            Err(err) => {
                error!(error = %err, "stage failed");
                return PipelineRun {
                    stages,
                    state: RunState::Failed { error: err },
                };
            }
        }

        if config.stop_after() == Some(stage) {
            info!("stopping after requested stage");
            return PipelineRun {
                stages,
                state: RunState::Stopped { after: stage },
            };
        }
    }

    info!("pipeline complete");
    PipelineRun {
        stages,
        state: RunState::Done,
    }
}

fn run_stage(
    stage: Stage,
    config: &PipelineConfig,
    engine: &dyn MappingEngine,
) -> StageResult<Vec<Artifact>> {
    match stage {
        Stage::PrerequisiteCheck => check_prerequisites(config, engine),
        Stage::CleanSport => clean_source(stage, config, SourceKind::Sport),
        Stage::CleanHierarchy => clean_source(stage, config, SourceKind::Hierarchy),
        Stage::CleanMainData => clean_source(stage, config, SourceKind::Main),
        Stage::ConvertSeparators => convert_separators(config),
        Stage::UniquifyIds => uniquify_ids(config),
        Stage::GenerateOntologies => generate_ontologies(config, engine),
        Stage::CleanUris => clean_uris(config),
        Stage::CopyFinalFiles => copy_final_files(config),
    }
}

fn require(stage: Stage, path: &Path) -> StageResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PipelineError::MissingPrerequisite {
            stage,
            path: path.to_path_buf(),
        })
    }
}

fn create_dir(stage: Stage, path: &Path) -> StageResult<()> {
    fs::create_dir_all(path).map_err(io_error(stage, path))
}

fn io_error(stage: Stage, path: &Path) -> impl FnOnce(std::io::Error) -> PipelineError {
    let path = path.to_path_buf();
    move |source| PipelineError::Io {
        stage,
        path,
        source,
    }
}

fn ingest_error(stage: Stage) -> impl FnOnce(IngestError) -> PipelineError {
    move |source| PipelineError::Ingest { stage, source }
}

fn check_prerequisites(
    config: &PipelineConfig,
    engine: &dyn MappingEngine,
) -> StageResult<Vec<Artifact>> {
    let stage = Stage::PrerequisiteCheck;
    engine.check_available().map_err(|err| {
        error!(engine = engine.name(), error = %err, "mapping engine unavailable");
        let path = match err {
            EngineError::MissingArchive { path } => path,
            EngineError::Spawn { program, .. } | EngineError::Failed { program, .. } => {
                PathBuf::from(program)
            }
        };
        PipelineError::MissingPrerequisite { stage, path }
    })?;

    let mut artifacts = Vec::new();
    for kind in SourceKind::ALL {
        for path in [config.raw_csv(kind), config.mapping_file(kind)] {
            require(stage, &path)?;
            artifacts.push(Artifact::new(path, "found"));
        }
    }

    for dir in [config.converted_dir(), config.output_dir(), config.results_dir()] {
        create_dir(stage, &dir)?;
    }
    Ok(artifacts)
}

fn clean_source(
    stage: Stage,
    config: &PipelineConfig,
    kind: SourceKind,
) -> StageResult<Vec<Artifact>> {
    let input = config.raw_csv(kind);
    let output = config.cleaned_csv(kind);
    require(stage, &input)?;

    let table = read_table(&input, SEMICOLON).map_err(ingest_error(stage))?;
    let options = NormalizeOptions {
        max_columns: config.source(kind).max_columns,
    };
    let normalized = normalize_with(&table, options).map_err(|source| PipelineError::Transform {
        stage,
        path: input.clone(),
        source,
    })?;
    write_table(&output, &normalized.table, SEMICOLON).map_err(ingest_error(stage))?;

    let stats = normalized.stats;
    info!(
        source = kind.as_str(),
        rows_in = stats.rows_in,
        rows_out = stats.rows_out,
        columns_in = stats.columns_in,
        columns_kept = stats.columns_out,
        path = %output.display(),
        "cleaned source"
    );
    Ok(vec![Artifact::new(
        output,
        format!(
            "{} -> {} rows, {} -> {} columns",
            stats.rows_in, stats.rows_out, stats.columns_in, stats.columns_out
        ),
    )])
}

fn convert_separators(config: &PipelineConfig) -> StageResult<Vec<Artifact>> {
    let stage = Stage::ConvertSeparators;
    let mut artifacts = Vec::new();
    for kind in SourceKind::ALL {
        let input = config.cleaned_csv(kind);
        let output = config.converted_csv(kind);
        require(stage, &input)?;
        let table = read_table(&input, SEMICOLON).map_err(ingest_error(stage))?;
        write_table(&output, &table, COMMA).map_err(ingest_error(stage))?;
        info!(
            source = kind.as_str(),
            rows = table.len(),
            path = %output.display(),
            "converted separators"
        );
        artifacts.push(Artifact::new(output, format!("{} rows", table.len())));
    }
    Ok(artifacts)
}

fn uniquify_ids(config: &PipelineConfig) -> StageResult<Vec<Artifact>> {
    let stage = Stage::UniquifyIds;
    let mut artifacts = Vec::new();
    for kind in SourceKind::ALL {
        let (Some(key_column), Some(output)) =
            (config.source(kind).key_column.as_deref(), config.unique_csv(kind))
        else {
            continue;
        };
        let input = config.converted_csv(kind);
        require(stage, &input)?;
        let table = read_table(&input, COMMA).map_err(ingest_error(stage))?;
        let report = uniquify(&table, key_column).map_err(|source| PipelineError::Transform {
            stage,
            path: input.clone(),
            source,
        })?;
        write_table(&output, &report.table, COMMA).map_err(ingest_error(stage))?;
        info!(
            source = kind.as_str(),
            key_column,
            distinct_keys = report.distinct_keys,
            duplicated_keys = report.duplicated_keys,
            suffixed_rows = report.suffixed_rows,
            colliding_keys = report.colliding_keys,
            path = %output.display(),
            "uniquified keys"
        );
        artifacts.push(Artifact::new(
            output,
            format!(
                "{} keys, {} duplicated, {} rows suffixed",
                report.distinct_keys, report.duplicated_keys, report.suffixed_rows
            ),
        ));
    }
    Ok(artifacts)
}

fn generate_ontologies(
    config: &PipelineConfig,
    engine: &dyn MappingEngine,
) -> StageResult<Vec<Artifact>> {
    let stage = Stage::GenerateOntologies;
    let mut artifacts = Vec::new();
    for kind in SourceKind::ALL {
        let mapping = config.mapping_file(kind);
        let output = config.graph_file(kind);
        require(stage, &mapping)?;
        require(stage, &config.mapped_csv(kind))?;

        engine.run(&mapping, &output).map_err(|err| match err {
            EngineError::Failed { status, stderr, .. } => PipelineError::ExternalToolFailure {
                stage,
                mapping: mapping.clone(),
                status,
                stderr,
            },
            other => PipelineError::ExternalToolFailure {
                stage,
                mapping: mapping.clone(),
                status: None,
                stderr: other.to_string(),
            },
        })?;
        if !output.is_file() {
            return Err(PipelineError::ExternalToolFailure {
                stage,
                mapping,
                status: Some(0),
                stderr: format!("no output written to {}", output.display()),
            });
        }
        info!(source = kind.as_str(), path = %output.display(), "generated graph");
        artifacts.push(Artifact::new(
            output,
            format!("from {}", config.source(kind).mapping),
        ));
    }
    Ok(artifacts)
}

fn clean_uris(config: &PipelineConfig) -> StageResult<Vec<Artifact>> {
    let stage = Stage::CleanUris;
    let mut artifacts = Vec::new();
    for kind in SourceKind::ALL {
        let input = config.graph_file(kind);
        let output = config.cleaned_graph_file(kind);
        require(stage, &input)?;
        let text = read_text(&input).map_err(ingest_error(stage))?;
        let cleaned = clean_encoded_spaces(&text);
        write_text(&output, &cleaned.text).map_err(ingest_error(stage))?;
        info!(
            source = kind.as_str(),
            replacements = cleaned.replacements,
            path = %output.display(),
            "cleaned encoded spaces"
        );
        artifacts.push(Artifact::new(
            output,
            format!("{} encoded spaces replaced", cleaned.replacements),
        ));
    }
    Ok(artifacts)
}

fn copy_final_files(config: &PipelineConfig) -> StageResult<Vec<Artifact>> {
    let stage = Stage::CopyFinalFiles;
    let mut artifacts = Vec::new();
    for kind in SourceKind::ALL {
        let source_file = config.cleaned_graph_file(kind);
        let target = config.final_file(kind);
        require(stage, &source_file)?;

        let bytes = fs::copy(&source_file, &target).map_err(io_error(stage, &target))?;
        let expected = file_sha256(&source_file).map_err(io_error(stage, &source_file))?;
        let actual = file_sha256(&target).map_err(io_error(stage, &target))?;
        if expected != actual {
            return Err(PipelineError::ChecksumMismatch {
                stage,
                path: target,
                expected,
                actual,
            });
        }
        info!(
            source = kind.as_str(),
            bytes,
            sha256 = %actual,
            path = %target.display(),
            "copied final file"
        );
        artifacts.push(Artifact {
            path: target,
            detail: format!("{bytes} bytes"),
            sha256: Some(actual),
        });
    }
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn stages_are_ordered() {
        let mut sorted = Stage::ALL;
        sorted.sort();
        assert_eq!(sorted, Stage::ALL);
    }

    #[test]
    fn stage_names_parse_back() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_str(stage.as_str(), false), Ok(stage));
        }
    }

    #[test]
    fn error_names_stage_and_path() {
        let err = PipelineError::MissingPrerequisite {
            stage: Stage::CleanSport,
            path: PathBuf::from("data-csv/Sport-Hierarchy.csv"),
        };
        assert_eq!(err.stage(), Stage::CleanSport);
        assert_eq!(
            err.to_string(),
            "clean-sport: required file or tool missing: data-csv/Sport-Hierarchy.csv"
        );
    }

    #[test]
    fn tool_failure_message_includes_status() {
        let err = PipelineError::ExternalToolFailure {
            stage: Stage::GenerateOntologies,
            mapping: PathBuf::from("mapping/mapping-sport.ttl"),
            status: Some(1),
            stderr: "parse error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "generate-ontologies: mapping engine failed on mapping/mapping-sport.ttl (exit status 1): parse error"
        );
    }
}
