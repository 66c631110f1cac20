// SPDX-License-Identifier: PMPL-1.0-or-later

//! SARIF 2.1.0 output for code-scanning integration
//!
//! Every finding becomes a result; each rule that fired is described once.
//! See: https://docs.oasis-open.org/sarif/sarif/v2.1.0/sarif-v2.1.0.html

use crate::types::{Category, Finding, Severity};
use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;

const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json";
const SARIF_VERSION: &str = "2.1.0";

/// Top-level SARIF log
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

/// A single SARIF run (one tool execution)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifTool {
    pub driver: SarifToolComponent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifToolComponent {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    pub short_description: SarifMessage,
    pub default_configuration: SarifConfiguration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifConfiguration {
    pub level: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<SarifRegion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifArtifactLocation {
    pub uri: String,
}

/// Region (line number)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: usize,
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

fn describe(category: Category) -> String {
    category.rule_name().replace('-', " ")
}

/// Findings without a file have no location
fn location(finding: &Finding) -> Vec<SarifLocation> {
    finding
        .file
        .as_ref()
        .map(|file| SarifLocation {
            physical_location: SarifPhysicalLocation {
                artifact_location: SarifArtifactLocation { uri: file.clone() },
                region: finding.line.map(|start_line| SarifRegion { start_line }),
            },
        })
        .into_iter()
        .collect()
}

pub fn to_sarif(findings: &[Finding]) -> SarifLog {
    let mut seen = HashSet::new();
    let mut rules = Vec::new();
    for finding in findings {
        if seen.insert(finding.category) {
            rules.push(SarifRule {
                id: finding.category.rule_id().to_string(),
                name: finding.category.rule_name().to_string(),
                short_description: SarifMessage {
                    text: describe(finding.category),
                },
                default_configuration: SarifConfiguration {
                    level: sarif_level(finding.severity).to_string(),
                },
            });
        }
    }

    let results = findings
        .iter()
        .map(|finding| SarifResult {
            rule_id: finding.category.rule_id().to_string(),
            level: sarif_level(finding.severity).to_string(),
            message: SarifMessage {
                text: finding.message.clone(),
            },
            locations: location(finding),
        })
        .collect();

    SarifLog {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifToolComponent {
                    name: env!("CARGO_PKG_NAME").to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Serialize findings to a SARIF JSON string
pub fn to_sarif_json(findings: &[Finding]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_sarif(findings))?)
}
