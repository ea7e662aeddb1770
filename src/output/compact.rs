//! Compact output formatter
//!
//! One line per diagnostic, minimal output for scripting.

use super::OutputFormatter;
use crate::diagnostic::Diagnostic;
use crate::engine::LintResult;

/// Compact one-line-per-diagnostic formatter
pub struct CompactFormatter {
    /// Show severity prefix
    pub show_severity: bool,
    /// Show rule ID
    pub show_rule: bool,
}

impl CompactFormatter {
    /// Create a new compact formatter
    pub fn new() -> Self {
        Self {
            show_severity: true,
            show_rule: true,
        }
    }

    /// Hide severity prefix
    pub fn without_severity(mut self) -> Self {
        self.show_severity = false;
        self
    }

    /// Hide rule ID
    pub fn without_rule(mut self) -> Self {
        self.show_rule = false;
        self
    }
}

impl Default for CompactFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for CompactFormatter {
    fn format(&self, result: &LintResult) -> String {
        result
            .diagnostics
            .iter()
            .map(|d| self.format_diagnostic(d) + "\n")
            .collect()
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut parts = vec![format!(
            "{}:{}:{}",
            diagnostic.location.file.display(),
            diagnostic.location.line,
            diagnostic.location.column
        )];

        if self.show_severity {
            parts.push(diagnostic.severity.to_string());
        }
        if self.show_rule {
            parts.push(diagnostic.rule_id.clone());
        }

        // The full message carries remediation text; one line only needs the subject
        match (&diagnostic.source_member, &diagnostic.mapper) {
            (Some(member), Some(mapper)) => {
                parts.push(format!("{} not mapped by {}", member, mapper))
            }
            _ => parts.push(diagnostic.message.clone()),
        }

        parts.join(": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Location, Severity};
    use std::path::PathBuf;

    fn diag(line: usize) -> Diagnostic {
        Diagnostic::new(
            "MEA001",
            Severity::Error,
            "Property SourceDto.B was not mapped by MyMapper. Decide whether...",
            Location::new(PathBuf::from("Test0.mapper.yaml"), line, 6),
        )
        .with_subject("SourceDto.B", "MyMapper")
    }

    #[test]
    fn test_compact_format() {
        let output = CompactFormatter::new().format_diagnostic(&diag(6));
        assert_eq!(
            output,
            "Test0.mapper.yaml:6:6: error: MEA001: SourceDto.B not mapped by MyMapper"
        );
    }

    #[test]
    fn test_compact_minimal_without_subject() {
        let formatter = CompactFormatter::new().without_severity().without_rule();
        let diag = Diagnostic::new(
            "load-error",
            Severity::Error,
            "Load error",
            Location::new(PathBuf::from("x.mapper.yaml"), 0, 0),
        );

        assert_eq!(formatter.format_diagnostic(&diag), "x.mapper.yaml:0:0: Load error");
    }

    #[test]
    fn test_compact_result() {
        let result = LintResult {
            diagnostics: vec![diag(6), diag(12)],
            ..Default::default()
        };

        let output = CompactFormatter::new().format(&result);
        assert_eq!(output.lines().count(), 2);
    }
}
