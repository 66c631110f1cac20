// SPDX-License-Identifier: PMPL-1.0-or-later

//! File discovery for catalogs and templates
//!
//! Directory patterns follow the `./src/**/` convention: the part before
//! `**` is the base directory, and `**` turns on a recursive walk.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "target"];

/// A directory, walked recursively or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirPattern {
    pub base: PathBuf,
    pub recursive: bool,
}

impl DirPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.find("**") {
            Some(idx) => {
                let base = pattern[..idx].trim_end_matches('/');
                Self {
                    base: if base.is_empty() {
                        PathBuf::from(".")
                    } else {
                        PathBuf::from(base)
                    },
                    recursive: true,
                }
            }
            None => {
                let base = pattern.trim_end_matches('/');
                Self {
                    base: if base.is_empty() {
                        PathBuf::from("/")
                    } else {
                        PathBuf::from(base)
                    },
                    recursive: false,
                }
            }
        }
    }

    /// Files under the pattern whose extension is one of `extensions`, sorted by path
    pub fn files(&self, extensions: &[String]) -> Result<Vec<PathBuf>> {
        if !self.base.exists() {
            return Ok(Vec::new());
        }
        if !self.base.is_dir() {
            return Err(ConfigError::NotADirectory(self.base.clone()).into());
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.base)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !SKIPPED_DIRS.contains(&entry.file_name().to_str().unwrap_or(""))
            });

        for entry in walker {
            let entry = entry.with_context(|| format!("walking {}", self.base.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
                .unwrap_or(false);
            if matches {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Path shown in messages: relative to the base directory
    pub fn display_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.base)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

/// A discovered file with its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub name: String,
    pub content: String,
}

impl SourceFile {
    /// File stem, used as the language key of a catalog
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Directory the file lives in
    pub fn group(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Catalog files, in discovery order. A missing base directory is an error.
pub fn discover_catalogs(pattern: &str, extension: &str) -> Result<Vec<SourceFile>> {
    let dir = DirPattern::parse(pattern);
    if !dir.base.exists() {
        return Err(ConfigError::MissingCatalogDir(dir.base).into());
    }
    let files = dir.files(&[extension.to_string()])?;
    debug!(count = files.len(), base = %dir.base.display(), "catalogs discovered");
    Ok(read_all(&dir, files))
}

/// Template files, in discovery order. A missing base directory yields nothing.
pub fn discover_templates(pattern: &str, extensions: &[String]) -> Result<Vec<SourceFile>> {
    let dir = DirPattern::parse(pattern);
    let files = dir.files(extensions)?;
    debug!(count = files.len(), base = %dir.base.display(), "templates discovered");
    Ok(read_all(&dir, files))
}

fn read_all(dir: &DirPattern, files: Vec<PathBuf>) -> Vec<SourceFile> {
    files
        .into_iter()
        .filter_map(|path| {
            read_text(&path).map(|content| SourceFile {
                name: dir.display_name(&path),
                path,
                content,
            })
        })
        .collect()
}

/// UTF-8 first, then a Latin-1 fallback
fn read_text(path: &Path) -> Option<String> {
    let raw_bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            warn!("skipping unreadable file: {} ({})", path.display(), e);
            return None;
        }
    };

    match String::from_utf8(raw_bytes) {
        Ok(s) => Some(s),
        Err(err) => {
            let raw_bytes = err.into_bytes();
            let (cow, _, had_errors) = encoding_rs::WINDOWS_1252.decode(&raw_bytes);
            if had_errors {
                warn!(
                    "skipping non-text file: {} (neither UTF-8 nor Latin-1)",
                    path.display()
                );
                return None;
            }
            Some(cow.into_owned())
        }
    }
}

/// Split catalogs into directory groups, ordered by first appearance
pub fn group_by_directory<T, F>(items: &[T], group_of: F) -> Vec<Vec<&T>>
where
    F: Fn(&T) -> &Path,
{
    let mut groups: Vec<(PathBuf, Vec<&T>)> = Vec::new();
    for item in items {
        let group = group_of(item);
        match groups.iter_mut().find(|(dir, _)| dir.as_path() == group) {
            Some((_, members)) => members.push(item),
            None => groups.push((group.to_path_buf(), vec![item])),
        }
    }
    groups.into_iter().map(|(_, members)| members).collect()
}
