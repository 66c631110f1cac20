// SPDX-License-Identifier: PMPL-1.0-or-later

//! Cross-catalog coherence
//!
//! The first catalog of a group (discovery order) is the reference. Every
//! other catalog must define exactly its keys, and every shared key must
//! carry the same markup. Messages are phrased relative to the reference.

use crate::catalog::markup::{compare_markups, MarkupDiff};
use crate::discovery::group_by_directory;
use crate::types::{Category, Finding, ParsedCatalog};
use tracing::debug;

/// Check one group of catalogs. Returns `true` when no error was found.
///
/// Groups with fewer than two catalogs have nothing to compare and pass.
pub fn check_group(catalogs: &[&ParsedCatalog], findings: &mut Vec<Finding>) -> bool {
    let Some((reference, others)) = catalogs.split_first() else {
        return true;
    };

    let first_finding = findings.len();
    for other in others {
        compare_catalogs(reference, other, findings);
    }
    !findings[first_finding..].iter().any(Finding::is_error)
}

/// Check every directory group. Returns `true` when all groups are coherent.
pub fn check_all(catalogs: &[ParsedCatalog], findings: &mut Vec<Finding>) -> bool {
    let mut valid = true;
    for group in group_by_directory(catalogs, |c| c.group.as_path()) {
        if group.len() < 2 {
            continue;
        }
        debug!(
            reference = %group[0].name,
            size = group.len(),
            "checking catalog group"
        );
        valid &= check_group(&group, findings);
    }
    valid
}

fn compare_catalogs(reference: &ParsedCatalog, other: &ParsedCatalog, findings: &mut Vec<Finding>) {
    for key in reference.ordered_keys.iter().filter(|k| !other.contains(k)) {
        findings.push(
            Finding::error(
                Category::MissingKey,
                format!(
                    "Key present in {} is missing in {}. Key: {}",
                    reference.name, other.name, key
                ),
            )
            .in_file(other.name.clone()),
        );
    }

    for key in other.ordered_keys.iter().filter(|k| !reference.contains(k)) {
        findings.push(
            Finding::error(
                Category::ExtraKey,
                format!(
                    "Extra key present in {}. It was not found in {}. Key: {}",
                    other.name, reference.name, key
                ),
            )
            .in_file(other.name.clone()),
        );
    }

    for key in &reference.ordered_keys {
        let (Some(expected), Some(actual)) = (reference.value(key), other.value(key)) else {
            continue;
        };
        for diff in compare_markups(expected, actual) {
            let message = match diff {
                MarkupDiff::Unexpected(tag) => format!(
                    "A mark-up was found for {} in {} but it was not found in {}. Mark-up: {}",
                    key, other.name, reference.name, tag
                ),
                MarkupDiff::Missing(tag) => format!(
                    "A mark-up was expected for {} in {}. See {}. Mark-up: {}",
                    key, other.name, reference.name, tag
                ),
            };
            findings.push(
                Finding::error(Category::MarkupMismatch, message).in_file(other.name.clone()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn catalog(name: &str, group: &str, pairs: &[(&str, &str)]) -> ParsedCatalog {
        ParsedCatalog {
            language_key: name.trim_end_matches(".json").to_string(),
            name: name.to_string(),
            path: PathBuf::from(group).join(name),
            group: PathBuf::from(group),
            ordered_keys: pairs.iter().map(|(k, _)| k.to_string()).collect(),
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn messages(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.message.as_str()).collect()
    }

    #[test]
    fn missing_then_extra_keys() {
        let en = catalog("en.json", "i18n", &[("KEY_1", "a"), ("KEY_2", "b <strong>c</strong>")]);
        let fr = catalog("fr.json", "i18n", &[("KEY_1", "a"), ("KEY_3", "c")]);

        let mut findings = Vec::new();
        assert!(!check_group(&[&en, &fr], &mut findings));
        assert_eq!(
            messages(&findings),
            vec![
                "Key present in en.json is missing in fr.json. Key: KEY_2",
                "Extra key present in fr.json. It was not found in en.json. Key: KEY_3",
            ]
        );
        assert_eq!(findings[0].file.as_deref(), Some("fr.json"));
    }

    #[test]
    fn identical_key_sets_pass() {
        let en = catalog("en.json", "i18n", &[("A", "x"), ("B", "<b>y</b>")]);
        let fr = catalog("fr.json", "i18n", &[("A", "z"), ("B", "<b>w</b>")]);
        let mut findings = Vec::new();
        assert!(check_group(&[&en, &fr], &mut findings));
        assert!(findings.is_empty());
    }

    #[test]
    fn markup_shape_mismatches() {
        let en = catalog(
            "en.json",
            "i18n",
            &[("KEY_1", "a"), ("KEY_2", "<strong>b</strong>"), ("KEY_3", "c")],
        );
        let fr = catalog(
            "fr.json",
            "i18n",
            &[("KEY_1", "a"), ("KEY_2", "b"), ("KEY_3", "<strong>c</strong>")],
        );
        let mut findings = Vec::new();
        assert!(!check_group(&[&en, &fr], &mut findings));
        assert_eq!(
            messages(&findings),
            vec![
                "A mark-up was expected for KEY_2 in fr.json. See en.json. Mark-up: strong",
                "A mark-up was found for KEY_3 in fr.json but it was not found in en.json. Mark-up: strong",
            ]
        );
    }

    #[test]
    fn single_catalog_has_nothing_to_compare() {
        let en = catalog("en.json", "i18n", &[("A", "x")]);
        let mut findings = Vec::new();
        assert!(check_group(&[&en], &mut findings));
        assert!(check_group(&[], &mut findings));
        assert!(findings.is_empty());
    }

    #[test]
    fn reference_is_always_the_first_catalog() {
        let en = catalog("en.json", "i18n", &[("A", "x")]);
        let fr = catalog("fr.json", "i18n", &[("A", "x"), ("B", "y")]);
        let de = catalog("de.json", "i18n", &[]);

        let mut findings = Vec::new();
        check_group(&[&en, &fr, &de], &mut findings);
        assert_eq!(
            messages(&findings),
            vec![
                "Extra key present in fr.json. It was not found in en.json. Key: B",
                "Key present in en.json is missing in de.json. Key: A",
            ]
        );
    }

    #[test]
    fn groups_are_checked_independently() {
        let catalogs = vec![
            catalog("en.json", "app", &[("A", "x")]),
            catalog("en.json", "admin", &[("B", "x")]),
            catalog("fr.json", "app", &[("A", "y")]),
            catalog("fr.json", "admin", &[("B", "y"), ("C", "z")]),
        ];
        let mut findings = Vec::new();
        assert!(!check_all(&catalogs, &mut findings));
        assert_eq!(
            messages(&findings),
            vec!["Extra key present in fr.json. It was not found in en.json. Key: C"]
        );
    }
}
