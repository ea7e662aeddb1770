//! Output formatters for analysis results

mod compact;
mod github;
mod json;
mod sarif;
mod text;

pub use compact::CompactFormatter;
pub use github::GithubFormatter;
pub use json::JsonFormatter;
pub use sarif::SarifFormatter;
pub use text::TextFormatter;

use crate::diagnostic::Diagnostic;
use crate::engine::LintResult;

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire result
    fn format(&self, result: &LintResult) -> String;

    /// Format a single diagnostic
    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String;
}
