use std::path::PathBuf;

use ontoprep_cli::pipeline::PipelineRun;
use ontoprep_model::{TaxonomyReconciliation, VerificationReport};
use ontoprep_transform::TaxonomyStats;

#[derive(Debug)]
pub struct TaxonomyResult {
    pub output: PathBuf,
    pub stats: TaxonomyStats,
    pub reconciliation: Option<TaxonomyReconciliation>,
}

#[derive(Debug)]
pub struct VerifyResult {
    pub report: VerificationReport,
    pub report_json: Option<PathBuf>,
}

#[derive(Debug)]
pub struct PipelineResult {
    pub run: PipelineRun,
    pub verification: Option<VerificationReport>,
    pub results_dir: PathBuf,
}

#[derive(Debug)]
pub struct ConfigResult {
    /// File the settings were read from, if any.
    pub source: Option<PathBuf>,
    pub toml: Option<String>,
}
