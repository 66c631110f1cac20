// SPDX-License-Identifier: PMPL-1.0-or-later

//! Literal text left untranslated in templates

use crate::template::line_of;
use crate::types::{Category, Finding};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;
use std::sync::OnceLock;

const TRANSLATABLE_ATTRIBUTES: &[&str] = &["alt", "title"];

static ATTRIBUTES: OnceLock<Vec<Regex>> = OnceLock::new();
static TEXT_NODE: OnceLock<Regex> = OnceLock::new();
static QUOTED_INTERPOLATION: OnceLock<Regex> = OnceLock::new();
static ENTITY: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();
static INTERPOLATION: OnceLock<Regex> = OnceLock::new();

fn attributes() -> &'static [Regex] {
    ATTRIBUTES.get_or_init(|| {
        TRANSLATABLE_ATTRIBUTES
            .iter()
            .map(|attr| {
                RegexBuilder::new(&format!(r#"\b({})\s*=\s*"([^"]*)""#, attr))
                    .case_insensitive(true)
                    .build()
                    .unwrap()
            })
            .collect()
    })
}

fn text_node() -> &'static Regex {
    TEXT_NODE.get_or_init(|| Regex::new(r">([^<>]*)<").unwrap())
}

fn quoted_interpolation() -> &'static Regex {
    QUOTED_INTERPOLATION.get_or_init(|| Regex::new(r"\{\{\s*'([^']*)'\s*\}\}").unwrap())
}

fn entity() -> &'static Regex {
    ENTITY.get_or_init(|| Regex::new(r"&#?\w+;").unwrap())
}

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn interpolation() -> &'static Regex {
    INTERPOLATION.get_or_init(|| Regex::new(r"(?s)\{\{.*?\}\}").unwrap())
}

/// Entities removed, whitespace collapsed, trimmed
fn clean(text: &str) -> String {
    let text = entity().replace_all(text, "");
    whitespace().replace_all(&text, " ").trim().to_string()
}

/// Whether a candidate counts as untranslated text: something is left once
/// every `{{ ... }}` expression is removed, and it is not excluded
fn is_literal(text: &str, exclusions: &BTreeSet<String>) -> bool {
    let rest = interpolation().replace_all(text, "");
    !rest.trim().is_empty() && !exclusions.contains(text)
}

/// Literal `alt`/`title` values, literal text nodes, and quoted literals
/// rendered through an interpolation without the translate filter.
pub fn find_untranslated(name: &str, content: &str, exclusions: &BTreeSet<String>) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut report = |offset: usize, message: String| {
        findings.push(
            Finding::warning(Category::UntranslatedText, message)
                .at_line(line_of(content, offset))
                .in_file(name),
        );
    };

    for pattern in attributes() {
        for caps in pattern.captures_iter(content) {
            let (Some(attr), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            if is_literal(&clean(value.as_str()), exclusions) {
                report(
                    attr.start(),
                    format!(
                        "Non-translated text in {}: {}=\"{}\"",
                        name,
                        attr.as_str(),
                        value.as_str()
                    ),
                );
            }
        }
    }

    for caps in text_node().captures_iter(content) {
        let Some(text) = caps.get(1) else { continue };
        let cleaned = clean(text.as_str());
        if is_literal(&cleaned, exclusions) {
            report(
                text.start() + leading_whitespace(text.as_str()),
                format!("Non-translated text between mark-ups in {}: \"{}\"", name, cleaned),
            );
        }
    }

    for caps in quoted_interpolation().captures_iter(content) {
        let Some(literal) = caps.get(1) else { continue };
        let cleaned = clean(literal.as_str());
        if is_literal(&cleaned, exclusions) {
            report(
                literal.start(),
                format!(
                    "Non-translated text might have been forgotten in {}: \"{}\"",
                    name,
                    literal.as_str().trim()
                ),
            );
        }
    }

    findings
}

fn leading_whitespace(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(content: &str) -> Vec<String> {
        find_untranslated("view.html", content, &BTreeSet::new())
            .into_iter()
            .map(|f| f.message)
            .collect()
    }

    #[test]
    fn literal_attributes() {
        let content = r#"<img alt="this was not translated" src="a.png" />
<img aLT="this was not translated too" />
<img alt="{{ 'KEY_1' | translate }}" />
<img alt="" /><img alt="&nbsp;" />"#;
        assert_eq!(
            scan(content),
            vec![
                r#"Non-translated text in view.html: alt="this was not translated""#,
                r#"Non-translated text in view.html: aLT="this was not translated too""#,
            ]
        );
    }

    #[test]
    fn attributes_are_scanned_one_name_at_a_time() {
        let content = r#"<a title="todo"></a><img alt="this was not translated" />
<a TITLE="todo 2"></a>
<a title="{{ 'KEY_2' | translate }} not totally translated"></a>"#;
        assert_eq!(
            scan(content),
            vec![
                r#"Non-translated text in view.html: alt="this was not translated""#,
                r#"Non-translated text in view.html: title="todo""#,
                r#"Non-translated text in view.html: TITLE="todo 2""#,
                r#"Non-translated text in view.html: title="{{ 'KEY_2' | translate }} not totally translated""#,
            ]
        );
    }

    #[test]
    fn text_between_markups() {
        let content = "<div>\n  <p>This is not translated. {{ 'KEY_1' | translate }}</p>\n  <p>{{ 'KEY_2' | translate }}</p>\n  <p>Not   done\n yet</p>\n  <span>&nbsp;</span>\n</div>";
        let findings = find_untranslated("view.html", content, &BTreeSet::new());
        let messages: Vec<_> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Non-translated text between mark-ups in view.html: \"This is not translated. {{ 'KEY_1' | translate }}\"",
                "Non-translated text between mark-ups in view.html: \"Not done yet\"",
            ]
        );
        assert_eq!(findings[0].line, Some(2));
        assert_eq!(findings[1].line, Some(4));
    }

    #[test]
    fn text_between_interpolations_is_literal() {
        assert_eq!(
            scan("<p>{{ 'A' | translate }} todo {{ 'B' | translate }}</p>"),
            vec!["Non-translated text between mark-ups in view.html: \"{{ 'A' | translate }} todo {{ 'B' | translate }}\""]
        );
        assert_eq!(
            scan(r#"<a title="{{ x }} todo {{ y }}"></a>"#),
            vec![r#"Non-translated text in view.html: title="{{ x }} todo {{ y }}""#]
        );
        assert!(scan("<p>{{ 'A' | translate }} {{ 'B' | translate }}</p>").is_empty());
        assert!(scan("<p>{{ vm.a }}{{ vm.b }}</p>").is_empty());
    }

    #[test]
    fn quoted_literals_without_filter() {
        assert_eq!(
            scan("{{ 'Hello' }} {{ 'KEY' | translate }}"),
            vec!["Non-translated text might have been forgotten in view.html: \"Hello\""]
        );
        assert!(scan("{{ '  ' }}").is_empty());
    }

    #[test]
    fn exclusions_silence_exact_matches() {
        let content = r#"<a title="todo"></a><p>todo</p>"#;
        assert_eq!(scan(content).len(), 2);

        let exclusions: BTreeSet<String> = ["todo".to_string()].into_iter().collect();
        assert!(find_untranslated("view.html", content, &exclusions).is_empty());
    }
}
