// SPDX-License-Identifier: PMPL-1.0-or-later

//! Validation options: defaults, normalization and file loading.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

pub const DEFAULT_CATALOG_DIR: &str = "./src/i18n/";
pub const DEFAULT_TEMPLATE_DIR: &str = "./src/**/";
pub const DEFAULT_INDENT: &str = "\t";

/// Prefixes accepted when `enforce_key_prefixes` is on
pub const DEFAULT_KEY_PREFIXES: &[&str] = &[
    "title_",
    "detail_",
    "action_",
    "placeholder_",
    "validation_",
    "variable_",
    "plural_",
    "pluralCount_",
];

/// A pattern that must not appear in the values of one catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenPattern {
    pub regex: String,
    /// Case-sensitive match; insensitive by default
    #[serde(default)]
    pub sensitive: bool,
    pub msg: String,
}

/// A forbidden pattern ready for matching
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub regex: Regex,
    pub message: String,
}

/// Forbidden patterns compiled once per run, keyed by language key
pub type CompiledPatterns = HashMap<String, Vec<CompiledPattern>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    pub catalog_dir: String,
    pub template_dir: String,
    /// Search templates for non-translated text
    pub check_templates: bool,
    pub fail_on_warning: bool,
    pub ignore_order: bool,
    pub ignore_empty_values: bool,
    pub indent_unit: String,
    pub exclusions: BTreeSet<String>,
    pub forbidden_patterns: BTreeMap<String, Vec<ForbiddenPattern>>,
    pub enforce_key_prefixes: bool,
    pub key_prefixes: Vec<String>,
    pub catalog_extension: String,
    pub template_extensions: Vec<String>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            catalog_dir: DEFAULT_CATALOG_DIR.to_string(),
            template_dir: DEFAULT_TEMPLATE_DIR.to_string(),
            check_templates: true,
            fail_on_warning: false,
            ignore_order: false,
            ignore_empty_values: false,
            indent_unit: DEFAULT_INDENT.to_string(),
            exclusions: BTreeSet::new(),
            forbidden_patterns: BTreeMap::new(),
            enforce_key_prefixes: false,
            key_prefixes: DEFAULT_KEY_PREFIXES.iter().map(|p| p.to_string()).collect(),
            catalog_extension: "json".to_string(),
            template_extensions: vec!["html".to_string()],
        }
    }
}

impl ValidationOptions {
    /// Load options from a JSON or YAML file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        let options: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json configuration {}", path.display()))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml configuration {}", path.display()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf()).into()),
        };
        Ok(options.normalized())
    }

    /// Directory patterns end with a separator; an empty indent falls back to a tab.
    pub fn normalized(mut self) -> Self {
        if self.catalog_dir.is_empty() {
            self.catalog_dir = DEFAULT_CATALOG_DIR.to_string();
        }
        if !self.catalog_dir.ends_with('/') {
            self.catalog_dir.push('/');
        }

        if self.template_dir.is_empty() {
            self.template_dir = DEFAULT_TEMPLATE_DIR.to_string();
        }
        if !self.template_dir.ends_with('/') {
            self.template_dir.push('/');
        }

        if self.indent_unit.is_empty() {
            self.indent_unit = DEFAULT_INDENT.to_string();
        }

        let extension = self.catalog_extension.trim_start_matches('.').to_string();
        self.catalog_extension = extension;
        for ext in &mut self.template_extensions {
            *ext = ext.trim_start_matches('.').to_string();
        }
        self
    }

    pub fn compile_forbidden_patterns(&self) -> Result<CompiledPatterns, ConfigError> {
        let mut compiled = HashMap::new();
        for (language, patterns) in &self.forbidden_patterns {
            let mut entries = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let regex = RegexBuilder::new(&pattern.regex)
                    .case_insensitive(!pattern.sensitive)
                    .build()
                    .map_err(|source| ConfigError::InvalidPattern {
                        language: language.clone(),
                        pattern: pattern.regex.clone(),
                        source,
                    })?;
                entries.push(CompiledPattern {
                    regex,
                    message: pattern.msg.clone(),
                });
            }
            compiled.insert(language.clone(), entries);
        }
        Ok(compiled)
    }
}
