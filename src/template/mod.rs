// SPDX-License-Identifier: PMPL-1.0-or-later

//! Template checks
//!
//! Templates are mined with patterns, never parsed as a DOM. Per file,
//! comments are blanked first, then four sweeps run: mixed directive/filter
//! syntax, key references, unquoted filter operands and (when enabled)
//! untranslated literal text. Keys never referenced by any template are
//! handed to an [`UnusedKeyPolicy`] once every file has been scanned.

pub mod literals;
pub mod references;

use crate::config::ValidationOptions;
use crate::discovery::SourceFile;
use crate::sink::{ErrorSink, Reporter};
use crate::types::{Category, Finding, ParsedCatalog};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

static COMMENT: OnceLock<Regex> = OnceLock::new();

fn comment() -> &'static Regex {
    COMMENT.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").unwrap())
}

/// 1-based line number of a byte offset
pub fn line_of(content: &str, offset: usize) -> usize {
    let offset = offset.min(content.len());
    content.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Remove `<!-- -->` blocks, keeping their line breaks so line numbers hold
pub fn strip_comments(content: &str) -> String {
    comment()
        .replace_all(content, |caps: &regex::Captures<'_>| {
            "\n".repeat(caps[0].matches('\n').count())
        })
        .into_owned()
}

/// Union of the keys of every catalog, in first-appearance order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownKeys {
    ordered: Vec<String>,
    set: HashSet<String>,
}

impl KnownKeys {
    pub fn from_catalogs(catalogs: &[ParsedCatalog]) -> Self {
        let mut keys = Self::default();
        for catalog in catalogs {
            keys.extend(catalog.ordered_keys.iter().cloned());
        }
        keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.set.contains(key)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }
}

impl Extend<String> for KnownKeys {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for key in iter {
            if self.set.insert(key.clone()) {
                self.ordered.push(key);
            }
        }
    }
}

impl FromIterator<String> for KnownKeys {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut keys = Self::default();
        keys.extend(iter);
        keys
    }
}

/// What to do with keys no template references.
///
/// Returns whether the unused keys must fail the run.
pub trait UnusedKeyPolicy {
    fn handle(&self, reporter: &mut Reporter<'_>, unused: &[String]) -> bool;
}

/// One warning per unused key; failure is left to `fail_on_warning`
#[derive(Debug, Default, Clone, Copy)]
pub struct WarnUnusedKeys;

impl UnusedKeyPolicy for WarnUnusedKeys {
    fn handle(&self, reporter: &mut Reporter<'_>, unused: &[String]) -> bool {
        for key in unused {
            reporter.emit(Finding::warning(
                Category::UnusedKey,
                format!("Key {} is not used in any template.", key),
            ));
        }
        false
    }
}

/// External callbacks receive the raw sink and decide on their own
impl<F> UnusedKeyPolicy for F
where
    F: Fn(&mut dyn ErrorSink, &[String]) -> bool,
{
    fn handle(&self, reporter: &mut Reporter<'_>, unused: &[String]) -> bool {
        self(reporter, unused)
    }
}

/// Outcome of the template phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateOutcome {
    /// Any finding at all was produced by the template sweeps
    pub any_issue: bool,
    pub unused_keys: Vec<String>,
    /// The unused-key policy asked for the run to fail
    pub unused_failure: bool,
}

/// Runs the per-file sweeps against a fixed set of known keys
pub struct TemplateChecker<'a> {
    options: &'a ValidationOptions,
    known: &'a KnownKeys,
}

impl<'a> TemplateChecker<'a> {
    pub fn new(options: &'a ValidationOptions, known: &'a KnownKeys) -> Self {
        Self { options, known }
    }

    /// Scan one template. Referenced keys are removed from `unreferenced`.
    pub fn check_file(
        &self,
        file: &SourceFile,
        unreferenced: &mut HashSet<String>,
        findings: &mut Vec<Finding>,
    ) {
        let name = file.name.as_str();
        let content = strip_comments(&file.content);

        findings.extend(references::find_mixed_syntax(name, &content));

        for reference in references::extract_references(&content) {
            unreferenced.remove(&reference.key);
            if !self.known.contains(&reference.key) {
                findings.push(
                    Finding::error(
                        Category::UnknownKey,
                        format!(
                            "An unknown i18n key is referenced in {}. Key name: {}",
                            name, reference.key
                        ),
                    )
                    .at_line(reference.line)
                    .in_file(name),
                );
            }
        }

        findings.extend(references::find_malformed_filters(name, &content));

        if self.options.check_templates {
            findings.extend(literals::find_untranslated(
                name,
                &content,
                &self.options.exclusions,
            ));
        }
    }
}

/// Scan every template, streaming findings file by file, then apply the
/// unused-key policy to whatever was never referenced.
pub fn check_templates(
    templates: &[SourceFile],
    known: &KnownKeys,
    options: &ValidationOptions,
    reporter: &mut Reporter<'_>,
    policy: &dyn UnusedKeyPolicy,
) -> TemplateOutcome {
    let checker = TemplateChecker::new(options, known);
    let mut unreferenced: HashSet<String> = known.iter().map(str::to_string).collect();
    let mut any_issue = false;

    for file in templates {
        let mut findings = Vec::new();
        checker.check_file(file, &mut unreferenced, &mut findings);
        debug!(template = %file.name, findings = findings.len(), "template scanned");
        any_issue |= !findings.is_empty();
        reporter.emit_all(findings);
    }

    let unused_keys: Vec<String> = known
        .iter()
        .filter(|key| unreferenced.contains(*key))
        .map(str::to_string)
        .collect();

    let unused_failure = if unused_keys.is_empty() {
        false
    } else {
        policy.handle(reporter, &unused_keys)
    };

    TemplateOutcome {
        any_issue: any_issue || !unused_keys.is_empty(),
        unused_keys,
        unused_failure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CollectingSink;
    use std::path::PathBuf;

    fn template(name: &str, content: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(name),
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    fn known(keys: &[&str]) -> KnownKeys {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn line_numbers_are_one_based() {
        let content = "a\nb\nc";
        assert_eq!(line_of(content, 0), 1);
        assert_eq!(line_of(content, 2), 2);
        assert_eq!(line_of(content, 4), 3);
        assert_eq!(line_of(content, 100), 3);
    }

    #[test]
    fn comments_keep_line_layout() {
        let stripped = strip_comments("a<!-- x\ny\nz -->b\n<!-- c -->d");
        assert_eq!(stripped, "a\n\nb\nd");
    }

    #[test]
    fn known_keys_dedupe_in_order() {
        let keys: KnownKeys = ["B", "A", "B"].iter().map(|k| k.to_string()).collect();
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn reports_single_unused_key() {
        let known = known(&["KEY_1", "KEY_2"]);
        let templates = vec![template("view.html", "<p translate=\"KEY_1\"></p>")];
        let options = ValidationOptions::default();

        let mut sink = CollectingSink::new();
        let mut reporter = Reporter::new(&mut sink);
        let outcome = check_templates(&templates, &known, &options, &mut reporter, &WarnUnusedKeys);
        assert_eq!(reporter.warnings(), 1);
        assert_eq!(reporter.errors(), 0);
        assert_eq!(outcome.unused_keys, vec!["KEY_2"]);
        assert!(!outcome.unused_failure);
        assert_eq!(
            sink.texts(),
            vec!["[ WARNING ] Key KEY_2 is not used in any template."]
        );
    }

    #[test]
    fn unknown_references_are_errors() {
        let known = known(&["KEY_1"]);
        let templates = vec![template(
            "view.html",
            "<p translate=\"KEY_54\"></p>\n<p>{{ 'KEY_1' | translate }}</p>\n<p>{{ 'MY_KEY' | translate }}</p>",
        )];
        let options = ValidationOptions::default();

        let mut sink = CollectingSink::new();
        let mut reporter = Reporter::new(&mut sink);
        let outcome = check_templates(&templates, &known, &options, &mut reporter, &WarnUnusedKeys);
        assert!(outcome.any_issue);
        assert!(outcome.unused_keys.is_empty());
        assert_eq!(
            sink.messages,
            vec![
                (
                    "An unknown i18n key is referenced in view.html. Key name: KEY_54".to_string(),
                    Some(1)
                ),
                (
                    "An unknown i18n key is referenced in view.html. Key name: MY_KEY".to_string(),
                    Some(3)
                ),
            ]
        );
    }

    #[test]
    fn commented_references_do_not_count() {
        let known = known(&["KEY_1"]);
        let templates = vec![template("view.html", "<!-- <p translate=\"KEY_1\"></p> -->")];
        let options = ValidationOptions::default();
        let mut sink = CollectingSink::new();
        let mut reporter = Reporter::new(&mut sink);
        let outcome = check_templates(&templates, &known, &options, &mut reporter, &WarnUnusedKeys);
        assert_eq!(outcome.unused_keys, vec!["KEY_1"]);
    }

    #[test]
    fn literal_text_check_can_be_disabled() {
        let known = known(&["KEY_1"]);
        let templates = vec![template("view.html", "<p translate=\"KEY_1\"></p><a title=\"todo\"></a>")];
        let options = ValidationOptions {
            check_templates: false,
            ..Default::default()
        };
        let mut sink = CollectingSink::new();
        let mut reporter = Reporter::new(&mut sink);
        let outcome = check_templates(&templates, &known, &options, &mut reporter, &WarnUnusedKeys);
        assert!(!outcome.any_issue);
        assert!(sink.is_empty());
    }

    #[test]
    fn external_policy_receives_the_sink() {
        let known = known(&["KEY_1", "KEY_2", "KEY_3"]);
        let templates = vec![template("view.html", "{{ 'KEY_2' | translate }}")];
        let options = ValidationOptions::default();

        let policy = |sink: &mut dyn ErrorSink, unused: &[String]| {
            sink.report(&format!("{} unused", unused.join(",")), None);
            true
        };

        let mut sink = CollectingSink::new();
        let mut reporter = Reporter::new(&mut sink);
        let outcome = check_templates(&templates, &known, &options, &mut reporter, &policy);
        assert!(outcome.unused_failure);
        assert_eq!(reporter.warnings(), 0);
        assert_eq!(sink.texts(), vec!["KEY_1,KEY_3 unused"]);
    }
}
