//! Verification report export as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use ontoprep_model::VerificationReport;

pub const REPORT_SCHEMA: &str = "ontoprep.verification-report";
pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct ReportEnvelope<'a> {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub consistent: bool,
    pub report: &'a VerificationReport,
}

impl<'a> ReportEnvelope<'a> {
    pub fn new(report: &'a VerificationReport, generated_at: DateTime<Utc>) -> Self {
        Self {
            schema: REPORT_SCHEMA,
            schema_version: REPORT_SCHEMA_VERSION,
            generated_at,
            consistent: report.is_consistent(),
            report,
        }
    }
}

pub fn report_to_json(report: &VerificationReport, generated_at: DateTime<Utc>) -> Result<String> {
    serde_json::to_string_pretty(&ReportEnvelope::new(report, generated_at))
        .context("serialize verification report")
}

/// Writes the report envelope, stamped with the current time.
pub fn write_report_json(path: &Path, report: &VerificationReport) -> Result<()> {
    let json = report_to_json(report, Utc::now())?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote verification report");
    Ok(())
}
