// SPDX-License-Identifier: PMPL-1.0-or-later

//! Console summary of a run

use crate::report::RunReport;
use crate::types::{Category, Finding, Severity};
use colored::*;
use std::collections::BTreeMap;

pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&self, report: &RunReport) {
        println!("\n{}", "=== I18N-LINT SUMMARY ===".bold().cyan());
        println!();

        let stats = &report.statistics;
        println!("  Catalogs: {} in {} group(s)", stats.catalogs, stats.groups);
        println!("  Templates: {}", stats.templates);
        println!("  Known keys: {}", stats.keys);
        println!();

        let by_rule = self.count_by_rule(report);
        if !by_rule.is_empty() {
            println!("{}", "FINDINGS BY RULE".bold().yellow());
            for ((rule_id, rule_name, severity), count) in &by_rule {
                let label = match severity {
                    Severity::Error => severity.to_string().red(),
                    Severity::Warning => severity.to_string().yellow(),
                };
                println!("  {} {:<24} {:>7}  {}", rule_id, rule_name, label, count);
            }
            println!();
        }

        println!(
            "  Errors: {}  Warnings: {}",
            stats.errors.to_string().red().bold(),
            stats.warnings.to_string().yellow().bold()
        );

        let verdict = if report.valid {
            "VALID".green().bold()
        } else {
            "INVALID".red().bold()
        };
        println!("  Result: {}", verdict);
    }

    /// Uncolored rendering for report files: one line per finding, then totals
    pub fn render(&self, report: &RunReport) -> String {
        let mut lines: Vec<String> = report.findings.iter().map(locate).collect();
        if !lines.is_empty() {
            lines.push(String::new());
        }
        let stats = &report.statistics;
        lines.push(format!(
            "Catalogs: {}  Groups: {}  Templates: {}  Keys: {}",
            stats.catalogs, stats.groups, stats.templates, stats.keys
        ));
        lines.push(format!("Errors: {}  Warnings: {}", stats.errors, stats.warnings));
        lines.push(format!(
            "Result: {}",
            if report.valid { "VALID" } else { "INVALID" }
        ));
        lines.push(String::new());
        lines.join("\n")
    }

    /// Finding counts keyed by rule, in rule-id order
    pub fn count_by_rule(
        &self,
        report: &RunReport,
    ) -> BTreeMap<(&'static str, &'static str, Severity), usize> {
        let mut counts = BTreeMap::new();
        for finding in &report.findings {
            let category: Category = finding.category;
            *counts
                .entry((category.rule_id(), category.rule_name(), finding.severity))
                .or_insert(0) += 1;
        }
        counts
    }
}

/// `file:line: severity: message`, dropping the parts a finding lacks
fn locate(finding: &Finding) -> String {
    let place = match (&finding.file, finding.line) {
        (Some(file), Some(line)) => format!("{}:{}: ", file, line),
        (Some(file), None) => format!("{}: ", file),
        (None, Some(line)) => format!("{}: ", line),
        (None, None) => String::new(),
    };
    format!("{}{}: {}", place, finding.severity, finding.message)
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Finding, RunStatistics};

    #[test]
    fn findings_are_located_when_possible() {
        assert_eq!(
            locate(&Finding::warning(Category::KeyOrder, "order").at_line(2).in_file("fr.json")),
            "fr.json:2: warning: order"
        );
        assert_eq!(
            locate(&Finding::error(Category::MissingKey, "missing").in_file("fr.json")),
            "fr.json: error: missing"
        );
        assert_eq!(
            locate(&Finding::error(Category::Configuration, "bad")),
            "error: bad"
        );
    }

    #[test]
    fn counts_group_by_rule_and_severity() {
        let report = RunReport {
            created_at: String::new(),
            valid: false,
            statistics: RunStatistics::default(),
            findings: vec![
                Finding::warning(Category::KeyOrder, "a"),
                Finding::error(Category::DuplicateKey, "b"),
                Finding::warning(Category::KeyOrder, "c"),
            ],
        };
        let counts = ReportFormatter::new().count_by_rule(&report);
        let rows: Vec<_> = counts.iter().map(|((id, _, _), n)| (*id, *n)).collect();
        assert_eq!(
            rows,
            vec![
                (Category::DuplicateKey.rule_id(), 1),
                (Category::KeyOrder.rule_id(), 2)
            ]
        );
    }
}
