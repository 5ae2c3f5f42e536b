//! Pipeline configuration.
//!
//! Settings come from built-in defaults, then an optional `ontoprep.toml`,
//! then command-line overrides. Every missing key falls back to its default,
//! so a file only needs the values it changes:
//!
//! ```toml
//! [engine]
//! jar = "tools/rmlmapper.jar"
//!
//! [sources.hierarchy]
//! max_columns = 8
//! ```
//!
//! The resolved [`PipelineConfig`] is immutable; the orchestrator only reads
//! paths from it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ontoprep_validate::VerifyOptions;

use crate::pipeline::Stage;

/// File looked up in the base directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "ontoprep.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: Layout,
    pub engine: EngineSettings,
    pub sources: Sources,
    pub verify: VerifyOptions,
}

/// Directory names under the base directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Raw semicolon-separated exports and their cleaned copies.
    pub data_csv: String,
    /// Comma-separated files read by the mapping rules.
    pub data_converted: String,
    pub mapping: String,
    /// Raw and cleaned engine output.
    pub output: String,
    /// Final graph files.
    pub results: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            data_csv: "data-csv".to_string(),
            data_converted: "data-csv-converted".to_string(),
            mapping: "mapping".to_string(),
            output: "output".to_string(),
            results: "resultats".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub java: String,
    /// Relative paths resolve against the base directory.
    pub jar: PathBuf,
    /// Passed between the jar and the mapping arguments.
    pub args: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
            jar: PathBuf::from("rmlmapper-7.3.3-r374-all.jar"),
            args: Vec::new(),
        }
    }
}

/// One tabular source and the graph generated from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSettings {
    pub file: String,
    /// Only the first `max_columns` positions may survive cleaning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_columns: Option<usize>,
    /// Column rewritten into unique identifiers before mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_column: Option<String>,
    pub mapping: String,
    pub graph: String,
    /// Name of the cleaned graph in the results directory.
    pub final_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sources {
    pub sport: SourceSettings,
    pub hierarchy: SourceSettings,
    pub main: SourceSettings,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            sport: SourceSettings {
                file: "Sport-Hierarchy.csv".to_string(),
                max_columns: Some(5),
                key_column: None,
                mapping: "mapping-sport.ttl".to_string(),
                graph: "sport-hierarchy.ttl".to_string(),
                final_name: "sport-hierarchy-simple-clean.ttl".to_string(),
            },
            hierarchy: SourceSettings {
                file: "Class-Hierarchy-V1.csv".to_string(),
                max_columns: Some(10),
                key_column: None,
                mapping: "mapping-hierarchy.ttl".to_string(),
                graph: "variable-hierarchy.ttl".to_string(),
                final_name: "variable-hierarchy-clean.ttl".to_string(),
            },
            main: SourceSettings {
                file: "IA-DAS-Data.csv".to_string(),
                max_columns: None,
                key_column: Some("Analysis_ID".to_string()),
                mapping: "mapping-ontology.ttl".to_string(),
                graph: "ia-das-ontology.ttl".to_string(),
                final_name: "ia-das-ontology-clean.ttl".to_string(),
            },
        }
    }
}

/// The three tabular sources, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    Sport,
    Hierarchy,
    Main,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Sport, SourceKind::Hierarchy, SourceKind::Main];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Sport => "sport",
            SourceKind::Hierarchy => "hierarchy",
            SourceKind::Main => "main",
        }
    }
}

impl Sources {
    pub fn get(&self, kind: SourceKind) -> &SourceSettings {
        match kind {
            SourceKind::Sport => &self.sport,
            SourceKind::Hierarchy => &self.hierarchy,
            SourceKind::Main => &self.main,
        }
    }
}

impl Settings {
    /// Parses a settings file. Keys it omits keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parse config {}", path.display()))
    }

    /// The settings file to use: `explicit` if given, else
    /// `<base_dir>/ontoprep.toml` when it exists.
    pub fn locate(base_dir: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit.map(Path::to_path_buf).or_else(|| {
            let candidate = base_dir.join(CONFIG_FILE_NAME);
            candidate.is_file().then_some(candidate)
        })
    }

    /// Loads the located settings file, or the defaults when there is none.
    pub fn discover(base_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        match Self::locate(base_dir, explicit) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using config file");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize config")
    }
}

/// Resolved, read-only pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    base_dir: PathBuf,
    settings: Settings,
    stop_after: Option<Stage>,
}

impl PipelineConfig {
    pub fn new(base_dir: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            base_dir: base_dir.into(),
            settings,
            stop_after: None,
        }
    }

    /// Ends the run successfully once `stage` completes.
    #[must_use]
    pub fn with_stop_after(mut self, stage: Option<Stage>) -> Self {
        self.stop_after = stage;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stop_after(&self) -> Option<Stage> {
        self.stop_after
    }

    pub fn source(&self, kind: SourceKind) -> &SourceSettings {
        self.settings.sources.get(kind)
    }

    pub fn engine_jar(&self) -> PathBuf {
        self.base_dir.join(&self.settings.engine.jar)
    }

    fn dir(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    pub fn data_csv_dir(&self) -> PathBuf {
        self.dir(&self.settings.layout.data_csv)
    }

    pub fn converted_dir(&self) -> PathBuf {
        self.dir(&self.settings.layout.data_converted)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir(&self.settings.layout.output)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.dir(&self.settings.layout.results)
    }

    pub fn raw_csv(&self, kind: SourceKind) -> PathBuf {
        self.data_csv_dir().join(&self.source(kind).file)
    }

    /// Semicolon-separated cleaned copy next to the raw export.
    pub fn cleaned_csv(&self, kind: SourceKind) -> PathBuf {
        self.data_csv_dir()
            .join(with_suffix(&self.source(kind).file, "-cleaned"))
    }

    /// Comma-separated copy of the cleaned file.
    pub fn converted_csv(&self, kind: SourceKind) -> PathBuf {
        self.converted_dir()
            .join(with_suffix(&self.source(kind).file, "-cleaned"))
    }

    /// Comma-separated file with unique keys, when the source has a key column.
    pub fn unique_csv(&self, kind: SourceKind) -> Option<PathBuf> {
        self.source(kind).key_column.as_ref().map(|_| {
            self.converted_dir()
                .join(with_suffix(&self.source(kind).file, "-unique-ids"))
        })
    }

    /// The comma-separated file the mapping rules read for `kind`.
    pub fn mapped_csv(&self, kind: SourceKind) -> PathBuf {
        self.unique_csv(kind)
            .unwrap_or_else(|| self.converted_csv(kind))
    }

    pub fn mapping_file(&self, kind: SourceKind) -> PathBuf {
        self.dir(&self.settings.layout.mapping)
            .join(&self.source(kind).mapping)
    }

    pub fn graph_file(&self, kind: SourceKind) -> PathBuf {
        self.output_dir().join(&self.source(kind).graph)
    }

    pub fn cleaned_graph_file(&self, kind: SourceKind) -> PathBuf {
        self.output_dir()
            .join(with_suffix(&self.source(kind).graph, "-clean"))
    }

    pub fn final_file(&self, kind: SourceKind) -> PathBuf {
        self.results_dir().join(&self.source(kind).final_name)
    }
}

/// `name.ext` becomes `name<suffix>.ext`.
fn with_suffix(file_name: &str, suffix: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}{suffix}.{ext}"),
        _ => format!("{file_name}{suffix}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_follow_project_layout() {
        let config = PipelineConfig::new("/work", Settings::default());
        assert_eq!(
            config.cleaned_csv(SourceKind::Sport),
            PathBuf::from("/work/data-csv/Sport-Hierarchy-cleaned.csv")
        );
        assert_eq!(
            config.converted_csv(SourceKind::Hierarchy),
            PathBuf::from("/work/data-csv-converted/Class-Hierarchy-V1-cleaned.csv")
        );
        assert_eq!(
            config.mapped_csv(SourceKind::Main),
            PathBuf::from("/work/data-csv-converted/IA-DAS-Data-unique-ids.csv")
        );
        assert_eq!(config.unique_csv(SourceKind::Sport), None);
        assert_eq!(
            config.cleaned_graph_file(SourceKind::Sport),
            PathBuf::from("/work/output/sport-hierarchy-clean.ttl")
        );
        assert_eq!(
            config.final_file(SourceKind::Sport),
            PathBuf::from("/work/resultats/sport-hierarchy-simple-clean.ttl")
        );
        assert_eq!(
            config.engine_jar(),
            PathBuf::from("/work/rmlmapper-7.3.3-r374-all.jar")
        );
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [engine]
            jar = "/opt/rml.jar"

            [sources.hierarchy]
            file = "Classes.csv"
            max_columns = 8
            mapping = "mapping-hierarchy.ttl"
            graph = "variable-hierarchy.ttl"
            final_name = "variable-hierarchy-clean.ttl"

            [verify]
            categorical_fields = ["gender"]
            "#,
        )
        .expect("parse");
        assert_eq!(settings.engine.java, "java");
        assert_eq!(settings.engine.jar, PathBuf::from("/opt/rml.jar"));
        assert_eq!(settings.sources.hierarchy.max_columns, Some(8));
        assert_eq!(settings.sources.sport, Sources::default().sport);
        assert_eq!(settings.layout, Layout::default());
        assert_eq!(settings.verify.categorical_fields, vec!["gender"]);
        assert_eq!(settings.verify.key_column, "Analysis_ID");

        let config = PipelineConfig::new("/work", settings);
        assert_eq!(config.engine_jar(), PathBuf::from("/opt/rml.jar"));
    }

    #[test]
    fn printed_config_parses_back() {
        let text = Settings::default().to_toml().expect("toml");
        assert!(text.contains("[layout]"));
        assert!(text.contains("rmlmapper-7.3.3-r374-all.jar"));
        let parsed: Settings = toml::from_str(&text).expect("parse");
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn discover_prefers_base_dir_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            Settings::discover(dir.path(), None).expect("defaults"),
            Settings::default()
        );
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[layout]\nresults = \"final\"\n",
        )
        .expect("write");
        let settings = Settings::discover(dir.path(), None).expect("load");
        assert_eq!(settings.layout.results, "final");
        assert_eq!(settings.layout.output, "output");
    }

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(with_suffix("IA-DAS-Data.csv", "-cleaned"), "IA-DAS-Data-cleaned.csv");
        assert_eq!(with_suffix("noext", "-clean"), "noext-clean");
        assert_eq!(with_suffix(".hidden", "-clean"), ".hidden-clean");
    }
}
