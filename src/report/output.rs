// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for printed/exported reports

use crate::report::sarif;
use crate::report::{ReportFormatter, RunReport};
use anyhow::Result;
use clap::ValueEnum;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportOutputFormat {
    Text,
    Json,
    Yaml,
    Sarif,
}

impl ReportOutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" | "txt" => Some(ReportOutputFormat::Text),
            "json" => Some(ReportOutputFormat::Json),
            "yaml" | "yml" => Some(ReportOutputFormat::Yaml),
            "sarif" => Some(ReportOutputFormat::Sarif),
            _ => None,
        }
    }

    /// Format implied by a report path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportOutputFormat::Text => "txt",
            ReportOutputFormat::Json => "json",
            ReportOutputFormat::Yaml => "yaml",
            ReportOutputFormat::Sarif => "sarif",
        }
    }

    /// Where to write the report: `target` itself, or a default file name
    /// inside it when it is a directory
    pub fn destination(&self, target: &Path) -> PathBuf {
        if target.is_dir() {
            target.join(format!("i18n-lint-report.{}", self.extension()))
        } else {
            target.to_path_buf()
        }
    }

    pub fn serialize(&self, report: &RunReport) -> Result<String> {
        match self {
            ReportOutputFormat::Text => Ok(ReportFormatter::new().render(report)),
            ReportOutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportOutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
            ReportOutputFormat::Sarif => sarif::to_sarif_json(&report.findings),
        }
    }
}
