// SPDX-License-Identifier: PMPL-1.0-or-later

//! Structural parsing of a single catalog line

use crate::types::{CatalogEntry, Category, Finding, LineVerdict};
use regex::Regex;

pub const MALFORMED_LINE: &str = "Lines must match the expected key/value pattern";
pub const TRAILING_SPACES: &str = "Trailing spaces must be removed.";

/// Accepts `<indent>?"KEY": "value"<,>?` for one configured indent unit
#[derive(Debug, Clone)]
pub struct LineParser {
    pattern: Regex,
}

impl LineParser {
    pub fn new(indent_unit: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r#"^(?:{})?"([^"]+)": "([^"]*)",?\s*$"#,
            regex::escape(indent_unit)
        );
        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }

    /// Parse one physical line (terminator already removed, 1-based numbering).
    /// Line-level issues are appended to `findings`.
    pub fn parse(
        &self,
        line_number: usize,
        raw_line: &str,
        findings: &mut Vec<Finding>,
    ) -> CatalogEntry {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        if line.ends_with(char::is_whitespace) {
            findings.push(
                Finding::warning(Category::TrailingWhitespace, TRAILING_SPACES).at_line(line_number),
            );
        }

        let verdict = self.verdict(line);
        if verdict == LineVerdict::Malformed {
            findings.push(
                Finding::error(
                    Category::MalformedLine,
                    format!("{} (\"key\": \"value\"). Line: {}", MALFORMED_LINE, line.trim()),
                )
                .at_line(line_number),
            );
        }

        CatalogEntry {
            line_number,
            verdict,
        }
    }

    fn verdict(&self, line: &str) -> LineVerdict {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed == "{" || trimmed == "}" {
            return LineVerdict::Skip;
        }

        match self.pattern.captures(line) {
            Some(caps) => LineVerdict::Pair {
                key: caps[1].to_string(),
                value: caps[2].to_string(),
            },
            None => LineVerdict::Malformed,
        }
    }
}
