// SPDX-License-Identifier: PMPL-1.0-or-later

//! The validation run
//!
//! Phases run strictly in order: discovery, per-catalog validation (in
//! parallel, replayed in discovery order), forbidden-pattern key check,
//! coherence per directory group, then templates.

use crate::catalog::{self, CatalogValidator};
use crate::coherence;
use crate::config::ValidationOptions;
use crate::discovery::{self, SourceFile};
use crate::sink::{ErrorSink, Reporter, StdoutSink};
use crate::template::{self, KnownKeys, UnusedKeyPolicy, WarnUnusedKeys};
use crate::types::{Category, Finding, ParsedCatalog, RunStatistics};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Everything a finished run produced
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub findings: Vec<Finding>,
    pub catalogs: Vec<ParsedCatalog>,
    pub statistics: RunStatistics,
}

/// Entry point. The sink and the unused-key policy are injected here.
pub struct Validator<'a> {
    options: ValidationOptions,
    sink: Option<&'a mut dyn ErrorSink>,
    policy: Box<dyn UnusedKeyPolicy + 'a>,
}

impl<'a> Validator<'a> {
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            options: options.normalized(),
            sink: None,
            policy: Box::new(WarnUnusedKeys),
        }
    }

    /// Findings go to standard output unless a sink is given
    pub fn with_sink(mut self, sink: &'a mut dyn ErrorSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_unused_key_policy<P: UnusedKeyPolicy + 'a>(mut self, policy: P) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Discover catalogs and templates on disk, then validate them
    pub fn run(self) -> Result<ValidationOutcome> {
        let catalogs =
            discovery::discover_catalogs(&self.options.catalog_dir, &self.options.catalog_extension)?;
        let templates = discovery::discover_templates(
            &self.options.template_dir,
            &self.options.template_extensions,
        )?;
        self.run_on(&catalogs, &templates)
    }

    /// Validate already-discovered files
    pub fn run_on(self, catalogs: &[SourceFile], templates: &[SourceFile]) -> Result<ValidationOutcome> {
        let Validator {
            options,
            sink,
            policy,
        } = self;

        let patterns = options
            .compile_forbidden_patterns()
            .context("compiling forbidden patterns")?;
        let validator = CatalogValidator::new(&options, &patterns)
            .context("building the catalog line pattern")?;

        let mut stdout = StdoutSink;
        let sink: &mut dyn ErrorSink = match sink {
            Some(sink) => sink,
            None => &mut stdout,
        };
        let mut reporter = Reporter::new(sink);
        let mut statistics = RunStatistics {
            catalogs: catalogs.len(),
            templates: templates.len(),
            ..Default::default()
        };

        debug!(catalogs = catalogs.len(), "validating catalogs");
        let results: Vec<_> = catalogs
            .par_iter()
            .map(|file| catalog::parse_file(&validator, file))
            .collect();

        let mut parsed = Vec::with_capacity(results.len());
        for (catalog, result, findings) in results {
            reporter.emit_all(findings);
            if result.is_error {
                info!("There are errors related to i18n in {}.", catalog.path.display());
            }
            parsed.push(catalog);
        }

        let mut hard_stop = false;
        for language in options.forbidden_patterns.keys() {
            if !parsed.iter().any(|c| &c.language_key == language) {
                hard_stop = true;
                reporter.emit(Finding::error(
                    Category::Configuration,
                    format!(
                        "\"{lang}.{ext}\" was not found. The forbidden patterns key \"{lang}\" is invalid.",
                        lang = language,
                        ext = options.catalog_extension
                    ),
                ));
            }
        }

        let known = KnownKeys::from_catalogs(&parsed);
        statistics.keys = known.len();
        statistics.groups =
            discovery::group_by_directory(&parsed, |c| c.group.as_path()).len();

        let mut unused_failure = false;
        if hard_stop {
            info!("configuration error, skipping coherence and template checks");
        } else {
            let mut findings = Vec::new();
            if !coherence::check_all(&parsed, &mut findings) {
                info!("There are global errors related to i18n (coherence across all the catalogs).");
            }
            reporter.emit_all(findings);

            debug!(templates = templates.len(), keys = known.len(), "checking templates");
            let outcome =
                template::check_templates(templates, &known, &options, &mut reporter, policy.as_ref());
            if outcome.any_issue {
                info!("Issues related to i18n were found in templates.");
            }
            unused_failure = outcome.unused_failure;
        }

        statistics.errors = reporter.errors();
        statistics.warnings = reporter.warnings();
        let valid = statistics.errors == 0
            && !(options.fail_on_warning && statistics.warnings > 0)
            && !unused_failure;

        Ok(ValidationOutcome {
            valid,
            findings: reporter.into_findings(),
            catalogs: parsed,
            statistics,
        })
    }
}

/// Validate the project described by `options`, reporting to standard output
pub fn validate(options: ValidationOptions) -> Result<bool> {
    Ok(Validator::new(options).run()?.valid)
}

/// Validate one catalog file on its own
pub fn validate_file(
    options: &ValidationOptions,
    path: &Path,
    sink: &mut dyn ErrorSink,
) -> Result<ValidationOutcome> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading catalog {}", path.display()))?;
    let language_key = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let (result, findings) = catalog::validate(options, &content, &language_key)?;
    let mut reporter = Reporter::new(sink);
    reporter.emit_all(findings.into_iter().map(|f| f.in_file(name.clone())));

    let statistics = RunStatistics {
        catalogs: 1,
        groups: 1,
        keys: result.ordered_keys.len(),
        errors: reporter.errors(),
        warnings: reporter.warnings(),
        ..Default::default()
    };
    let valid = !result.is_error && !(options.fail_on_warning && result.is_warning);

    let catalog = ParsedCatalog {
        language_key,
        name,
        path: path.to_path_buf(),
        group: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        ordered_keys: result.ordered_keys,
        values: result.values,
    };

    Ok(ValidationOutcome {
        valid,
        findings: reporter.into_findings(),
        catalogs: vec![catalog],
        statistics,
    })
}
