// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error-reporting collaborator.
//!
//! Every finding is pushed through an [`ErrorSink`] as soon as its checker
//! finishes with the file at hand. The [`Reporter`] sits between the
//! pipeline and the sink and folds each finding into the run verdict.

use crate::types::{Finding, Severity};

/// Receives a message and an optional line number
pub trait ErrorSink {
    fn report(&mut self, message: &str, line: Option<usize>);
}

impl<F> ErrorSink for F
where
    F: FnMut(&str, Option<usize>),
{
    fn report(&mut self, message: &str, line: Option<usize>) {
        self(message, line)
    }
}

/// Default sink: one line per message on standard output
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ErrorSink for StdoutSink {
    fn report(&mut self, message: &str, line: Option<usize>) {
        match line {
            Some(line) => println!("{}: {}", line, message),
            None => println!("{}", message),
        }
    }
}

/// Keeps every message, mostly for tests and embedding
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub messages: Vec<(String, Option<usize>)>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.messages.iter().map(|(m, _)| m.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl ErrorSink for CollectingSink {
    fn report(&mut self, message: &str, line: Option<usize>) {
        self.messages.push((message.to_string(), line));
    }
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl ErrorSink for NullSink {
    fn report(&mut self, _message: &str, _line: Option<usize>) {}
}

/// Forwards findings to a sink while keeping the run's tallies
pub struct Reporter<'a> {
    sink: &'a mut dyn ErrorSink,
    errors: usize,
    warnings: usize,
    log: Vec<Finding>,
}

impl<'a> Reporter<'a> {
    pub fn new(sink: &'a mut dyn ErrorSink) -> Self {
        Self {
            sink,
            errors: 0,
            warnings: 0,
            log: Vec::new(),
        }
    }

    pub fn emit(&mut self, finding: Finding) {
        self.sink.report(&finding.rendered(), finding.line);
        match finding.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
        }
        self.log.push(finding);
    }

    pub fn emit_all<I: IntoIterator<Item = Finding>>(&mut self, findings: I) {
        for finding in findings {
            self.emit(finding);
        }
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.log
    }
}

/// Raw pass-through, for external policies that report on their own terms.
/// Messages sent this way are not tallied.
impl ErrorSink for Reporter<'_> {
    fn report(&mut self, message: &str, line: Option<usize>) {
        self.sink.report(message, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[test]
    fn reporter_counts_by_severity() {
        let mut sink = CollectingSink::new();
        let mut reporter = Reporter::new(&mut sink);
        reporter.emit(Finding::error(Category::DuplicateKey, "Duplicate key: A").at_line(3));
        reporter.emit(Finding::warning(Category::KeyOrder, "order"));
        reporter.emit(Finding::warning(Category::UnusedKey, "unused"));
        assert_eq!(reporter.errors(), 1);
        assert_eq!(reporter.warnings(), 2);
        assert_eq!(reporter.into_findings().len(), 3);

        assert_eq!(sink.messages[0], ("Duplicate key: A".to_string(), Some(3)));
        assert_eq!(sink.messages[1].0, "[ WARNING ] order");
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |message: &str, line: Option<usize>| {
                seen.push(format!("{:?}:{}", line, message));
            };
            let mut reporter = Reporter::new(&mut sink);
            reporter.emit(Finding::error(Category::EmptyValue, "empty").at_line(1));
        }
        assert_eq!(seen, vec!["Some(1):empty".to_string()]);
    }

    #[test]
    fn raw_reports_bypass_tallies() {
        let mut sink = CollectingSink::new();
        let mut reporter = Reporter::new(&mut sink);
        reporter.report("custom", None);
        assert_eq!(reporter.errors(), 0);
        assert_eq!(reporter.warnings(), 0);
        assert_eq!(sink.len(), 1);
    }
}
