//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use ontoprep_cli::pipeline::Stage;

#[derive(Parser)]
#[command(
    name = "ontoprep",
    version,
    about = "Prepare IA-DAS spreadsheets and generate the ontology graph",
    long_about = "Prepare IA-DAS spreadsheet exports and generate the ontology graph.\n\n\
                  Cleans semicolon-separated exports, converts them to comma-separated files,\n\
                  makes analysis identifiers unique, runs the RML mapping engine and checks the\n\
                  generated graph against its sources. Each step is also available on its own."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Append logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Drop blank rows and columns from a delimited export.
    Clean(CleanArgs),

    /// Rewrite a delimited file with another separator.
    Convert(ConvertArgs),

    /// Make a key column unique by suffixing repeated values.
    Uniquify(UniquifyArgs),

    /// Build the concept taxonomy from a hierarchy export and write Turtle.
    Taxonomy(TaxonomyArgs),

    /// Replace percent-encoded spaces in a generated graph file.
    CleanUris(CleanUrisArgs),

    /// Check a generated graph against the table it was generated from.
    Verify(VerifyArgs),

    /// Run every stage from raw exports to final graph files.
    Pipeline(PipelineArgs),

    /// Show the effective configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct CleanArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Separator of the input file.
    #[arg(long, value_enum, default_value = "semicolon")]
    pub delimiter: DelimiterArg,

    /// Separator of the output file (default: same as input).
    #[arg(long = "output-delimiter", value_enum)]
    pub output_delimiter: Option<DelimiterArg>,

    /// Keep at most the first N original columns.
    #[arg(long = "max-columns", value_name = "N")]
    pub max_columns: Option<usize>,
}

#[derive(Args)]
pub struct ConvertArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value = "semicolon")]
    pub from: DelimiterArg,

    #[arg(long, value_enum, default_value = "comma")]
    pub to: DelimiterArg,
}

#[derive(Args)]
pub struct UniquifyArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Header of the key column (exact match).
    #[arg(long, default_value = "Analysis_ID")]
    pub key: String,

    #[arg(long, value_enum, default_value = "comma")]
    pub delimiter: DelimiterArg,
}

#[derive(Args)]
pub struct TaxonomyArgs {
    /// Hierarchy export with one column per level.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Turtle file to write.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value = "semicolon")]
    pub delimiter: DelimiterArg,

    /// Level column, outermost first. Repeat for each level
    /// (default: CLASS, sub-class 1 .. sub-class 4).
    #[arg(long = "level", value_name = "COLUMN")]
    pub levels: Vec<String>,

    /// Re-read the written file and reconcile its counts with the graph.
    #[arg(long)]
    pub check: bool,
}

#[derive(Args)]
pub struct CleanUrisArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (default: <INPUT stem>-clean.<ext> next to the input).
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Comma-separated source table with unique keys.
    #[arg(long, value_name = "CSV")]
    pub source: PathBuf,

    /// Generated graph to check.
    #[arg(long, value_name = "TTL")]
    pub graph: PathBuf,

    /// Key column (default: from configuration).
    #[arg(long)]
    pub key: Option<String>,

    /// Taxonomy Turtle file to reconcile against --hierarchy.
    #[arg(long, value_name = "TTL", requires = "hierarchy")]
    pub taxonomy: Option<PathBuf>,

    /// Semicolon-separated hierarchy export the taxonomy was built from.
    #[arg(long, value_name = "CSV", requires = "taxonomy")]
    pub hierarchy: Option<PathBuf>,

    /// Also write the report as JSON.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args)]
pub struct PipelineArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Java executable used to launch the mapping engine.
    #[arg(long, value_name = "PROGRAM")]
    pub java: Option<String>,

    /// Mapping engine archive (relative to the base directory).
    #[arg(long = "engine-jar", value_name = "PATH")]
    pub engine_jar: Option<PathBuf>,

    /// Stop successfully after this stage.
    #[arg(long = "stop-after", value_enum, value_name = "STAGE")]
    pub stop_after: Option<Stage>,

    /// Do not check the final ontology against its source.
    #[arg(long = "skip-verify")]
    pub skip_verify: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Print the effective configuration as TOML.
    #[arg(long)]
    pub print: bool,
}

#[derive(Args, Clone)]
pub struct SettingsArgs {
    /// Project directory holding data-csv/, mapping/ and the engine archive.
    #[arg(long = "base-dir", value_name = "DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Configuration file (default: <BASE_DIR>/ontoprep.toml when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DelimiterArg {
    Semicolon,
    Comma,
    Tab,
}

impl DelimiterArg {
    pub fn byte(self) -> u8 {
        match self {
            DelimiterArg::Semicolon => ontoprep_ingest::SEMICOLON,
            DelimiterArg::Comma => ontoprep_ingest::COMMA,
            DelimiterArg::Tab => b'\t',
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
