// SPDX-License-Identifier: PMPL-1.0-or-later

//! Inline markup inside translated values
//!
//! Two independent checks live here: tag balance within one value, and the
//! multiset comparison of tag names between two translations of one key.
//! Self-closing tags (`<br />`) never take part in either.

use regex::Regex;
use std::sync::OnceLock;

static OPENING_TAG: OnceLock<Regex> = OnceLock::new();
static CLOSING_TAG: OnceLock<Regex> = OnceLock::new();

fn opening_tag() -> &'static Regex {
    OPENING_TAG.get_or_init(|| Regex::new(r"<([^/>\s]+)(?:\s[^>]*)?>").unwrap())
}

/// Opening tags with their captures; self-closing `<name ... />` is skipped
fn openers(value: &str) -> impl Iterator<Item = regex::Captures<'_>> {
    opening_tag()
        .captures_iter(value)
        .filter(|caps| caps.get(0).map_or(false, |m| !m.as_str().ends_with("/>")))
}

fn closing_tag() -> &'static Regex {
    CLOSING_TAG.get_or_init(|| Regex::new(r"</([^>]+)>").unwrap())
}

/// Balance problem in a single value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagIssue {
    /// `<name>` with no `</name>` after it
    Unclosed(String),
    /// `</name>` left over once every pair has been matched
    Unopened(String),
}

/// Difference between a reference value's markup and a compared value's markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupDiff {
    /// Present in the compared value, absent from the reference
    Unexpected(String),
    /// Present in the reference, absent from the compared value
    Missing(String),
}

/// Names of the opening tags of a value, in order of appearance
pub fn opening_tags(value: &str) -> Vec<&str> {
    openers(value)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Pair every opening tag with the first matching closing tag after it,
/// strip both, and report what cannot be paired.
pub fn check_balance(value: &str) -> Vec<TagIssue> {
    let mut issues = Vec::new();
    let mut remaining = value.to_string();

    loop {
        let first = openers(&remaining).next();
        let Some(caps) = first else { break };
        let (open_start, open_end) = match caps.get(0) {
            Some(m) => (m.start(), m.end()),
            None => break,
        };
        let name = caps[1].to_string();
        let closing = format!("</{}>", name);

        let mut next = String::with_capacity(remaining.len());
        next.push_str(&remaining[..open_start]);
        match remaining[open_end..].find(&closing) {
            Some(offset) => {
                let close_start = open_end + offset;
                next.push_str(&remaining[open_end..close_start]);
                next.push_str(&remaining[close_start + closing.len()..]);
            }
            None => {
                issues.push(TagIssue::Unclosed(name));
                next.push_str(&remaining[open_end..]);
            }
        }
        remaining = next;
    }

    for caps in closing_tag().captures_iter(&remaining) {
        issues.push(TagIssue::Unopened(caps[1].to_string()));
    }

    issues
}

/// Multiset difference of tag names. Order and nesting are irrelevant.
///
/// Extras are reported while walking the compared value, then every tag the
/// reference still holds is reported as missing.
pub fn compare_markups(reference: &str, compared: &str) -> Vec<MarkupDiff> {
    let mut expected = opening_tags(reference);
    let mut diffs = Vec::new();

    for tag in opening_tags(compared) {
        match expected.iter().position(|candidate| *candidate == tag) {
            Some(index) => {
                expected.remove(index);
            }
            None => diffs.push(MarkupDiff::Unexpected(tag.to_string())),
        }
    }

    diffs.extend(
        expected
            .into_iter()
            .map(|tag| MarkupDiff::Missing(tag.to_string())),
    );
    diffs
}
