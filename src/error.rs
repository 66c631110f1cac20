// SPDX-License-Identifier: PMPL-1.0-or-later

//! Operational errors. Validation findings are not errors; they go to the sink.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported configuration file extension: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("forbidden pattern {pattern:?} for \"{language}\" is not a valid regex")]
    InvalidPattern {
        language: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("catalog directory not found: {}", .0.display())]
    MissingCatalogDir(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}
