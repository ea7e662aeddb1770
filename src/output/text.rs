//! Human-readable text output formatter

use super::OutputFormatter;
use crate::diagnostic::{Diagnostic, Severity};
use crate::engine::LintResult;
use colored::*;
use std::collections::BTreeMap;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show help text
    pub show_help: bool,

    /// Show statistics
    pub show_stats: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_help: true,
            show_stats: true,
        }
    }
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Hide the summary footer
    pub fn without_stats(mut self) -> Self {
        self.show_stats = false;
        self
    }

    fn severity_str(&self, severity: Severity) -> ColoredString {
        let s = format!("{}", severity);
        if !self.colored {
            return s.normal();
        }
        match severity {
            Severity::Error => s.red().bold(),
            Severity::Warning => s.yellow().bold(),
            Severity::Info => s.blue(),
        }
    }

    fn format_location(&self, diag: &Diagnostic) -> String {
        format!(
            "{}:{}:{}",
            diag.location.file.display(),
            diag.location.line,
            diag.location.column
        )
    }

    fn gutter(&self, mark: &str) -> String {
        if self.colored {
            mark.blue().to_string()
        } else {
            mark.to_string()
        }
    }

    fn count(&self, n: usize, singular: &str, plural: &str, color: Color) -> String {
        let s = format!("{} {}", n, if n == 1 { singular } else { plural });
        if self.colored {
            s.color(color).to_string()
        } else {
            s
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();

        // Group diagnostics by file
        let mut by_file: BTreeMap<_, Vec<_>> = BTreeMap::new();
        for diag in &result.diagnostics {
            by_file.entry(&diag.location.file).or_default().push(diag);
        }

        for (file, diagnostics) in &by_file {
            if self.colored {
                output.push_str(&format!("{}\n", file.display().to_string().underline()));
            } else {
                output.push_str(&format!("{}\n", file.display()));
            }

            for diag in diagnostics {
                output.push_str(&self.format_diagnostic(diag));
                output.push('\n');
            }
        }

        if self.show_stats {
            output.push_str(&format!(
                "\n{} {} processed, {} {} checked",
                result.files_processed,
                if result.files_processed == 1 {
                    "file"
                } else {
                    "files"
                },
                result.mappers_checked,
                if result.mappers_checked == 1 {
                    "mapper"
                } else {
                    "mappers"
                }
            ));

            let mut counts = Vec::new();
            if result.error_count > 0 {
                counts.push(self.count(result.error_count, "error", "errors", Color::Red));
            }
            if result.warning_count > 0 {
                counts.push(self.count(
                    result.warning_count,
                    "warning",
                    "warnings",
                    Color::Yellow,
                ));
            }
            if result.info_count > 0 {
                counts.push(self.count(result.info_count, "info", "infos", Color::Blue));
            }

            if !counts.is_empty() {
                output.push_str(&format!(": {}", counts.join(", ")));
            }
            output.push('\n');

            output.push_str(&format!(
                "Finished in {:.2}s\n",
                result.duration.as_secs_f64()
            ));
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}: {}[{}]: {}\n",
            self.format_location(diag),
            self.severity_str(diag.severity),
            if self.colored {
                diag.rule_id.cyan().to_string()
            } else {
                diag.rule_id.clone()
            },
            diag.message
        ));

        if let (Some(member), Some(mapper)) = (&diag.source_member, &diag.mapper) {
            output.push_str(&format!(
                "   {} member: {}  mapper: {}\n",
                self.gutter("|"),
                if self.colored {
                    member.bold().to_string()
                } else {
                    member.clone()
                },
                mapper
            ));
        }

        if self.show_help {
            if let Some(help) = &diag.help {
                output.push_str(&format!("   {} help: {}\n", self.gutter("="), help));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Location;
    use std::path::PathBuf;

    #[test]
    fn test_format_diagnostic() {
        let formatter = TextFormatter::new().without_color();
        let diag = Diagnostic::new(
            "MEA001",
            Severity::Error,
            "Property SourceDto.B was not mapped by MyMapper.",
            Location::new(PathBuf::from("Test0.mapper.yaml"), 6, 6),
        )
        .with_subject("SourceDto.B", "MyMapper")
        .with_help("All properties should be mapped.");

        let output = formatter.format_diagnostic(&diag);
        assert!(output.contains("Test0.mapper.yaml:6:6"));
        assert!(output.contains("error[MEA001]"));
        assert!(output.contains("member: SourceDto.B  mapper: MyMapper"));
        assert!(output.contains("help:"));
    }

    #[test]
    fn test_format_result() {
        let formatter = TextFormatter::new().without_color();
        let result = LintResult {
            diagnostics: vec![Diagnostic::new(
                "MEA001",
                Severity::Warning,
                "Test",
                Location::new(PathBuf::from("a.mapper.yaml"), 1, 1),
            )],
            files_processed: 1,
            mappers_checked: 1,
            warning_count: 1,
            ..Default::default()
        };

        let output = formatter.format(&result);
        assert!(output.contains("1 file processed, 1 mapper checked"));
        assert!(output.contains("1 warning"));
    }

    #[test]
    fn test_format_without_stats() {
        let formatter = TextFormatter::new().without_color().without_stats();
        let output = formatter.format(&LintResult::default());
        assert!(output.is_empty());
    }
}
