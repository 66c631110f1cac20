// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for i18n-lint

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// How much a finding weighs on the run verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// What rule produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    // === Catalog structure ===
    TrailingWhitespace,
    MalformedLine,
    KeyCharset,
    KeyPrefix,
    UntrimmedValue,
    EmptyValue,
    DuplicateKey,
    KeyOrder,
    ForbiddenPattern,
    UnclosedTag,
    UnopenedTag,

    // === Cross-catalog coherence ===
    MissingKey,
    ExtraKey,
    MarkupMismatch,

    // === Templates ===
    MixedTranslateSyntax,
    UnknownKey,
    MalformedFilter,
    UntranslatedText,
    UnusedKey,

    Configuration,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::TrailingWhitespace,
            Category::MalformedLine,
            Category::KeyCharset,
            Category::KeyPrefix,
            Category::UntrimmedValue,
            Category::EmptyValue,
            Category::DuplicateKey,
            Category::KeyOrder,
            Category::ForbiddenPattern,
            Category::UnclosedTag,
            Category::UnopenedTag,
            Category::MissingKey,
            Category::ExtraKey,
            Category::MarkupMismatch,
            Category::MixedTranslateSyntax,
            Category::UnknownKey,
            Category::MalformedFilter,
            Category::UntranslatedText,
            Category::UnusedKey,
            Category::Configuration,
        ]
    }

    /// Stable rule identifier, used by SARIF output
    pub fn rule_id(&self) -> &'static str {
        match self {
            Category::TrailingWhitespace => "I18N001",
            Category::MalformedLine => "I18N002",
            Category::KeyCharset => "I18N003",
            Category::KeyPrefix => "I18N004",
            Category::UntrimmedValue => "I18N005",
            Category::EmptyValue => "I18N006",
            Category::DuplicateKey => "I18N007",
            Category::KeyOrder => "I18N008",
            Category::ForbiddenPattern => "I18N009",
            Category::UnclosedTag => "I18N010",
            Category::UnopenedTag => "I18N011",
            Category::MissingKey => "I18N012",
            Category::ExtraKey => "I18N013",
            Category::MarkupMismatch => "I18N014",
            Category::MixedTranslateSyntax => "I18N015",
            Category::UnknownKey => "I18N016",
            Category::MalformedFilter => "I18N017",
            Category::UntranslatedText => "I18N018",
            Category::UnusedKey => "I18N019",
            Category::Configuration => "I18N020",
        }
    }

    pub fn rule_name(&self) -> &'static str {
        match self {
            Category::TrailingWhitespace => "trailing-whitespace",
            Category::MalformedLine => "malformed-line",
            Category::KeyCharset => "key-charset",
            Category::KeyPrefix => "key-prefix",
            Category::UntrimmedValue => "untrimmed-value",
            Category::EmptyValue => "empty-value",
            Category::DuplicateKey => "duplicate-key",
            Category::KeyOrder => "key-order",
            Category::ForbiddenPattern => "forbidden-pattern",
            Category::UnclosedTag => "unclosed-tag",
            Category::UnopenedTag => "unopened-tag",
            Category::MissingKey => "missing-key",
            Category::ExtraKey => "extra-key",
            Category::MarkupMismatch => "markup-mismatch",
            Category::MixedTranslateSyntax => "mixed-translate-syntax",
            Category::UnknownKey => "unknown-key",
            Category::MalformedFilter => "malformed-filter",
            Category::UntranslatedText => "untranslated-text",
            Category::UnusedKey => "unused-key",
            Category::Configuration => "configuration",
        }
    }
}

/// A single problem detected by one of the checkers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: Category,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Finding {
    pub fn error(category: Category, message: impl Into<String>) -> Self {
        Self {
            category,
            severity: Severity::Error,
            message: message.into(),
            line: None,
            file: None,
        }
    }

    pub fn warning(category: Category, message: impl Into<String>) -> Self {
        Self {
            category,
            severity: Severity::Warning,
            message: message.into(),
            line: None,
            file: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Message as handed to the error sink (warnings carry a visible marker)
    pub fn rendered(&self) -> String {
        match self.severity {
            Severity::Error => self.message.clone(),
            Severity::Warning => format!("[ WARNING ] {}", self.message),
        }
    }
}

/// Structural verdict for one physical catalog line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineVerdict {
    Skip,
    Malformed,
    Pair { key: String, value: String },
}

/// One parsed catalog line, alive for a single parse iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub line_number: usize,
    pub verdict: LineVerdict,
}

/// Result of validating one catalog's text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileValidation {
    pub is_error: bool,
    pub is_warning: bool,
    /// Keys in file order, first occurrence only
    pub ordered_keys: Vec<String>,
    /// Last occurrence wins
    pub values: HashMap<String, String>,
}

/// A catalog after its standalone validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCatalog {
    /// File stem, e.g. `en` for `en.json`
    pub language_key: String,
    /// Display name, relative to the catalog base directory
    pub name: String,
    pub path: PathBuf,
    /// Directory shared by the catalogs checked against each other
    pub group: PathBuf,
    pub ordered_keys: Vec<String>,
    pub values: HashMap<String, String>,
}

impl ParsedCatalog {
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub catalogs: usize,
    pub groups: usize,
    pub templates: usize,
    pub keys: usize,
    pub errors: usize,
    pub warnings: usize,
}
