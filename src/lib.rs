// SPDX-License-Identifier: PMPL-1.0-or-later

//! i18n-lint: static validation of translation catalogs and HTML templates.
//!
//! A run goes through four phases, in order:
//! 1. **Catalogs**: every `"KEY": "value"` line is checked on its own
//!    (shape, key charset, ordering, duplicates, empty values, markup
//!    balance, forbidden patterns).
//! 2. **Configuration**: every language named by the forbidden patterns
//!    must have a catalog; otherwise the run stops here.
//! 3. **Coherence**: catalogs sharing a directory must define the same keys
//!    with the same markup as the first catalog of that directory.
//! 4. **Templates**: referenced keys must exist, the translate directive
//!    and filter must not be mixed, literal text is flagged, and keys no
//!    template uses go to an [`template::UnusedKeyPolicy`].
//!
//! Findings stream to an [`sink::ErrorSink`] as they are produced.

pub mod catalog;
pub mod coherence;
pub mod config;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod sink;
pub mod template;
pub mod types;

pub use config::{ForbiddenPattern, ValidationOptions};
pub use error::ConfigError;
pub use pipeline::{validate, validate_file, ValidationOutcome, Validator};
pub use sink::{CollectingSink, ErrorSink, Reporter, StdoutSink};
pub use template::{KnownKeys, UnusedKeyPolicy, WarnUnusedKeys};
pub use types::{Category, Finding, RunStatistics, Severity};
