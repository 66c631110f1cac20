// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report generation module

pub mod formatter;
pub mod output;
pub mod sarif;

use crate::pipeline::ValidationOutcome;
use crate::types::{Finding, RunStatistics};
use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use formatter::ReportFormatter;
pub use output::ReportOutputFormat;

/// Machine-readable record of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// RFC 3339 timestamp
    pub created_at: String,
    pub valid: bool,
    pub statistics: RunStatistics,
    pub findings: Vec<Finding>,
}

impl RunReport {
    pub fn from_outcome(outcome: &ValidationOutcome) -> Self {
        Self {
            created_at: Utc::now().to_rfc3339(),
            valid: outcome.valid,
            statistics: outcome.statistics,
            findings: outcome.findings.clone(),
        }
    }
}

/// Write a report to `path` in the given format
pub fn save_report<P: AsRef<Path>>(
    report: &RunReport,
    format: ReportOutputFormat,
    path: P,
) -> Result<()> {
    let content = format.serialize(report)?;
    fs::write(path.as_ref(), content)?;
    Ok(())
}

/// Print the colored summary to the console
pub fn print_summary(report: &RunReport) {
    ReportFormatter::new().print(report);
}
