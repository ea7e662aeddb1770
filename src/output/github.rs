//! GitHub Actions output formatter
//!
//! Outputs diagnostics in GitHub Actions workflow command format:
//! ::error file={name},line={line},col={col},title={title}::{message}

use super::OutputFormatter;
use crate::diagnostic::{Diagnostic, Severity};
use crate::engine::LintResult;

/// Formatter for GitHub Actions annotations
pub struct GithubFormatter {
    /// Whether to include summary
    pub show_summary: bool,
}

impl GithubFormatter {
    /// Create a new GitHub formatter
    pub fn new() -> Self {
        Self { show_summary: true }
    }

    /// Disable summary output
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }
}

impl Default for GithubFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

impl OutputFormatter for GithubFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();

        for diag in &result.diagnostics {
            output.push_str(&self.format_diagnostic(diag));
            output.push('\n');
        }

        if self.show_summary && !result.diagnostics.is_empty() {
            output.push_str(&format!(
                "::notice::Mapper check complete: {} error(s), {} warning(s) across {} mapper(s) in {} file(s)\n",
                result.error_count,
                result.warning_count,
                result.mappers_checked,
                result.files_processed
            ));
        }

        output
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let level = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "notice",
        };

        let title = match &diagnostic.source_member {
            Some(member) => format!("{} {}", diagnostic.rule_id, member),
            None => diagnostic.rule_id.clone(),
        };

        format!(
            "::{} file={},line={},col={},title={}::{}",
            level,
            escape_property(&diagnostic.location.file.display().to_string()),
            diagnostic.location.line.max(1),
            diagnostic.location.column.max(1),
            escape_property(&title),
            escape_data(&diagnostic.message)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Location;
    use std::path::PathBuf;

    fn make_diagnostic(severity: Severity, msg: &str) -> Diagnostic {
        Diagnostic::new(
            "MEA001",
            severity,
            msg,
            Location::new(PathBuf::from("src/Test0.mapper.yaml"), 6, 6),
        )
        .with_subject("SourceDto.B", "MyMapper")
    }

    #[test]
    fn test_format_error() {
        let output =
            GithubFormatter::new().format_diagnostic(&make_diagnostic(Severity::Error, "Unmapped"));
        assert!(output.starts_with("::error"));
        assert!(output.contains("file=src/Test0.mapper.yaml"));
        assert!(output.contains("line=6"));
        assert!(output.contains("title=MEA001 SourceDto.B"));
        assert!(output.ends_with("::Unmapped"));
    }

    #[test]
    fn test_levels() {
        let formatter = GithubFormatter::new();
        assert!(formatter
            .format_diagnostic(&make_diagnostic(Severity::Warning, "m"))
            .starts_with("::warning"));
        assert!(formatter
            .format_diagnostic(&make_diagnostic(Severity::Info, "m"))
            .starts_with("::notice"));
    }

    #[test]
    fn test_escape_newlines() {
        let output = GithubFormatter::new()
            .format_diagnostic(&make_diagnostic(Severity::Error, "Line1\nLine2"));
        assert!(output.contains("%0A"));
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_unknown_position_clamped() {
        let diag = Diagnostic::new(
            "load-error",
            Severity::Error,
            "Load error",
            Location::new(PathBuf::from("x.json"), 0, 0),
        );
        let output = GithubFormatter::new().format_diagnostic(&diag);
        assert!(output.contains("line=1,col=1,title=load-error"));
    }

    #[test]
    fn test_format_result() {
        let result = LintResult {
            diagnostics: vec![make_diagnostic(Severity::Error, "Unmapped")],
            files_processed: 1,
            mappers_checked: 1,
            error_count: 1,
            ..Default::default()
        };

        let output = GithubFormatter::new().format(&result);
        assert!(output.contains("::error"));
        assert!(output.contains("::notice::Mapper check complete: 1 error(s)"));

        let quiet = GithubFormatter::new().without_summary().format(&result);
        assert!(!quiet.contains("::notice"));
    }
}
