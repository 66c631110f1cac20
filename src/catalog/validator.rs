// SPDX-License-Identifier: PMPL-1.0-or-later

//! Standalone validation of one catalog file

use crate::catalog::line::LineParser;
use crate::catalog::markup::{self, TagIssue};
use crate::config::{CompiledPattern, CompiledPatterns, ValidationOptions};
use crate::types::{Category, FileValidation, Finding, LineVerdict, Severity};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::OnceLock;

static KEY_CHARSET: OnceLock<Regex> = OnceLock::new();

fn key_charset() -> &'static Regex {
    KEY_CHARSET.get_or_init(|| Regex::new(r"^[A-Za-z_0-9]+$").unwrap())
}

/// Applies the per-line parser and every per-key rule to a catalog's text
pub struct CatalogValidator<'a> {
    options: &'a ValidationOptions,
    patterns: &'a CompiledPatterns,
    line_parser: LineParser,
}

impl<'a> CatalogValidator<'a> {
    pub fn new(
        options: &'a ValidationOptions,
        patterns: &'a CompiledPatterns,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            options,
            patterns,
            line_parser: LineParser::new(&options.indent_unit)?,
        })
    }

    /// Validate `content`, the text of the catalog for `language_key`.
    ///
    /// Findings are appended in line order. Parsing never stops early: a
    /// malformed line is reported and the next line is processed.
    pub fn validate(
        &self,
        content: &str,
        language_key: &str,
        findings: &mut Vec<Finding>,
    ) -> FileValidation {
        let first_finding = findings.len();
        let forbidden: &[CompiledPattern] = self
            .patterns
            .get(language_key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut result = FileValidation::default();
        let mut seen: HashSet<String> = HashSet::new();

        for (index, raw_line) in content.split('\n').enumerate() {
            let entry = self.line_parser.parse(index + 1, raw_line, findings);
            let line_number = entry.line_number;
            let LineVerdict::Pair { key, value } = entry.verdict else {
                continue;
            };

            let mut report = |finding: Finding| findings.push(finding.at_line(line_number));

            if !key_charset().is_match(&key) {
                report(Finding::error(
                    Category::KeyCharset,
                    format!(
                        "i18n keys must only contain letters, numbers and underscores. Key: {}",
                        key
                    ),
                ));
            }

            if self.options.enforce_key_prefixes
                && !self
                    .options
                    .key_prefixes
                    .iter()
                    .any(|prefix| key.starts_with(prefix.as_str()))
            {
                report(Finding::error(
                    Category::KeyPrefix,
                    format!(
                        "i18n keys must start with one of: {}. Key: {}",
                        self.options.key_prefixes.join(", "),
                        key
                    ),
                ));
            }

            if value != value.trim() {
                report(Finding::warning(
                    Category::UntrimmedValue,
                    format!("Values must not start or end with white spaces. Key: {}", key),
                ));
            }

            if value.is_empty() && !self.options.ignore_empty_values {
                report(Finding::error(
                    Category::EmptyValue,
                    format!("Empty values are not allowed. Key: {}", key),
                ));
            }

            if seen.contains(&key) {
                report(Finding::error(
                    Category::DuplicateKey,
                    format!("Duplicate key: {}", key),
                ));
            } else {
                if !self.options.ignore_order {
                    if let Some(previous) = result.ordered_keys.last() {
                        if compare_keys(&key, previous) == Ordering::Less {
                            report(Finding::warning(
                                Category::KeyOrder,
                                format!(
                                    "i18n keys must be sorted alphabetically. Key {} breaks this rule.",
                                    key
                                ),
                            ));
                        }
                    }
                }
                seen.insert(key.clone());
                result.ordered_keys.push(key.clone());
            }

            for pattern in forbidden {
                if pattern.regex.is_match(&value) {
                    report(Finding::warning(
                        Category::ForbiddenPattern,
                        pattern.message.clone(),
                    ));
                }
            }

            for issue in markup::check_balance(&value) {
                report(match issue {
                    TagIssue::Unclosed(tag) => Finding::error(
                        Category::UnclosedTag,
                        format!("A HTML tag is not closed correctly. Tag: {}. Key: {}", tag, key),
                    ),
                    TagIssue::Unopened(tag) => Finding::error(
                        Category::UnopenedTag,
                        format!("A HTML tag has no opening match. Tag: {}. Key: {}", tag, key),
                    ),
                });
            }

            result.values.insert(key, value);
        }

        for finding in &findings[first_finding..] {
            match finding.severity {
                Severity::Error => result.is_error = true,
                Severity::Warning => result.is_warning = true,
            }
        }
        result
    }
}

/// Sort form of a key: case folded, underscores dropped
fn sort_form(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Ordering used by the alphabetical rule
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    sort_form(a).cmp(&sort_form(b))
}
