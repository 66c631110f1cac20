// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation references in templates
//!
//! Two syntaxes are recognized: the directive `translate="KEY"` and the
//! filter `{{ 'KEY' | translate }}`.

use crate::template::line_of;
use crate::types::{Category, Finding};
use regex::Regex;
use std::sync::OnceLock;

static MIXED_SYNTAX: OnceLock<Regex> = OnceLock::new();
static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
static FILTER: OnceLock<Regex> = OnceLock::new();
static UNQUOTED_FILTER: OnceLock<Regex> = OnceLock::new();

fn mixed_syntax() -> &'static Regex {
    MIXED_SYNTAX
        .get_or_init(|| Regex::new(r#"(?:^|[\s<])(translate\s*=\s*"[^<>|"]*\|\s*translate)"#).unwrap())
}

fn directive() -> &'static Regex {
    DIRECTIVE.get_or_init(|| Regex::new(r#"(?:^|[\s<])translate\s*=\s*"([^"\s]+)""#).unwrap())
}

fn filter() -> &'static Regex {
    FILTER.get_or_init(|| Regex::new(r"'([^'\s]+)'\s*\|\s*translate\b").unwrap())
}

fn unquoted_filter() -> &'static Regex {
    UNQUOTED_FILTER
        .get_or_init(|| Regex::new(r"\{\{\s*([^'|{}]+)\|\s*translate\s*\}\}").unwrap())
}

/// A key referenced by a template, with the line it appears on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub key: String,
    pub line: usize,
}

/// Directive attributes whose value pipes through the translate filter
pub fn find_mixed_syntax(name: &str, content: &str) -> Vec<Finding> {
    mixed_syntax()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            Finding::error(
                Category::MixedTranslateSyntax,
                format!(
                    "Do NOT mix the translate directive and the translate filter. File in error: {}",
                    name
                ),
            )
            .at_line(line_of(content, m.start()))
            .in_file(name)
        })
        .collect()
}

/// Every referenced key: directive references first, then filter references
pub fn extract_references(content: &str) -> Vec<Reference> {
    [directive(), filter()]
        .into_iter()
        .flat_map(|pattern| {
            pattern.captures_iter(content).filter_map(|caps| {
                caps.get(1).map(|m| Reference {
                    key: m.as_str().to_string(),
                    line: line_of(content, m.start()),
                })
            })
        })
        .collect()
}

/// Filter interpolations whose operand is neither quoted nor a function call
pub fn find_malformed_filters(name: &str, content: &str) -> Vec<Finding> {
    unquoted_filter()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .filter(|operand| !operand.as_str().contains('('))
        .map(|operand| {
            Finding::error(
                Category::MalformedFilter,
                format!(
                    "Malformed declaration with the translate filter in {}. The key must be surrounded with quotes. Key name: {}",
                    name,
                    operand.as_str().trim()
                ),
            )
            .at_line(line_of(content, operand.start()))
            .in_file(name)
        })
        .collect()
}
