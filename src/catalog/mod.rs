// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalog parsing and per-file rules
//!
//! A catalog is one `"KEY": "value"` pair per physical line, optionally
//! wrapped in `{` / `}` lines. Each file is validated on its own here; the
//! cross-file comparison lives in [`crate::coherence`].

pub mod line;
pub mod markup;
pub mod validator;

use crate::config::ValidationOptions;
use crate::discovery::SourceFile;
use crate::types::{FileValidation, Finding, ParsedCatalog};
use anyhow::Result;

pub use line::LineParser;
pub use markup::{check_balance, compare_markups, MarkupDiff, TagIssue};
pub use validator::CatalogValidator;

/// Validate the text of a single catalog with freshly compiled options
pub fn validate(
    options: &ValidationOptions,
    content: &str,
    language_key: &str,
) -> Result<(FileValidation, Vec<Finding>)> {
    let patterns = options.compile_forbidden_patterns()?;
    let validator = CatalogValidator::new(options, &patterns)?;
    let mut findings = Vec::new();
    let result = validator.validate(content, language_key, &mut findings);
    Ok((result, findings))
}

/// Validate a discovered catalog file. Findings are tagged with the file name.
pub fn parse_file(
    validator: &CatalogValidator<'_>,
    file: &SourceFile,
) -> (ParsedCatalog, FileValidation, Vec<Finding>) {
    let language_key = file.stem();
    let mut findings = Vec::new();
    let result = validator.validate(&file.content, &language_key, &mut findings);
    for finding in &mut findings {
        finding.file = Some(file.name.clone());
    }

    let parsed = ParsedCatalog {
        language_key,
        name: file.name.clone(),
        path: file.path.clone(),
        group: file.group(),
        ordered_keys: result.ordered_keys.clone(),
        values: result.values.clone(),
    };
    (parsed, result, findings)
}
