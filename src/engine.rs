//! Core analysis engine
//!
//! Each mapper annotation occurrence runs through a fixed pipeline; any step
//! that cannot produce its output ends the occurrence silently:
//!
//! ```text
//! not a marker -> source type unresolved -> mapper class unresolved
//!   -> enumerate members -> compute exclusions -> scan each remaining member
//! ```

use crate::config::Config;
use crate::diagnostic::{Diagnostic, Location, Severity};
use crate::exclusion::ExclusionSet;
use crate::frontend::Frontend;
use crate::host::{Host, NodeId};
use crate::members;
use crate::rule::Rule;
use crate::scanner;
use crate::schema::AnnotationSchema;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of an analysis run
#[derive(Debug, Default)]
pub struct LintResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,

    /// Files processed
    pub files_processed: usize,

    /// Files with errors
    pub files_with_errors: usize,

    /// Files with warnings
    pub files_with_warnings: usize,

    /// Mapper annotations whose source type and class resolved
    pub mappers_checked: usize,

    /// Total errors
    pub error_count: usize,

    /// Total warnings
    pub warning_count: usize,

    /// Total info messages
    pub info_count: usize,

    /// Processing duration
    pub duration: Duration,
}

impl LintResult {
    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    /// Check if result is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }

    /// Get exit code (0 = success, 1 = warnings, 2 = errors)
    pub fn exit_code(&self) -> i32 {
        if self.error_count > 0 {
            2
        } else if self.warning_count > 0 {
            1
        } else {
            0
        }
    }

    /// Add diagnostics for a single file and update counters
    fn record_file(&mut self, diagnostics: Vec<Diagnostic>) {
        let mut errors = 0;
        let mut warnings = 0;
        for diag in &diagnostics {
            match diag.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Info => self.info_count += 1,
            }
        }

        self.error_count += errors;
        self.warning_count += warnings;
        if errors > 0 {
            self.files_with_errors += 1;
        }
        if warnings > 0 {
            self.files_with_warnings += 1;
        }
        self.diagnostics.extend(diagnostics);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: LintResult) {
        self.diagnostics.extend(other.diagnostics);
        self.files_processed += other.files_processed;
        self.files_with_errors += other.files_with_errors;
        self.files_with_warnings += other.files_with_warnings;
        self.mappers_checked += other.mappers_checked;
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
        self.info_count += other.info_count;
    }
}

/// The main analysis engine
pub struct Engine {
    /// Configuration
    config: Config,

    /// Recognized annotation identities
    schema: AnnotationSchema,

    /// The completeness rule
    rule: Rule,

    /// Registered front ends (keyed by extension)
    frontends: HashMap<String, Arc<dyn Frontend>>,
}

impl Engine {
    /// Create a new engine with configuration
    pub fn new(config: Config) -> Self {
        Self {
            schema: AnnotationSchema::from_config(&config.schema),
            rule: Rule::property_not_mapped(),
            frontends: HashMap::new(),
            config,
        }
    }

    /// Register a front end
    pub fn register_frontend(&mut self, frontend: Arc<dyn Frontend>) {
        for ext in frontend.extensions() {
            self.frontends.insert(ext.to_string(), Arc::clone(&frontend));
        }
    }

    /// Get front end for a file
    fn get_frontend(&self, path: &Path) -> Option<Arc<dyn Frontend>> {
        let ext = path.extension()?.to_str()?;
        self.frontends.get(ext).cloned()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Severity applied uniformly to every diagnostic of the rule
    pub fn severity(&self) -> Severity {
        self.config
            .get_severity_override(&self.rule.id)
            .unwrap_or(self.rule.severity)
    }

    /// Analyze one annotation occurrence
    ///
    /// Never fails: an occurrence that is not a mapper, or whose types cannot
    /// be resolved, yields no diagnostics.
    pub fn analyze_occurrence<H: Host + ?Sized>(
        &self,
        host: &H,
        annotation: NodeId,
    ) -> Vec<Diagnostic> {
        self.analyze(host, annotation).unwrap_or_default()
    }

    /// `None` when the occurrence was skipped before a mapper declaration resolved
    fn analyze<H: Host + ?Sized>(&self, host: &H, annotation: NodeId) -> Option<Vec<Diagnostic>> {
        let rule = &self.rule;
        if !self.config.is_rule_enabled(&rule.id) {
            return None;
        }

        let anchor = host.location(annotation);
        if self
            .config
            .should_ignore_rule_for_file(&rule.id, &anchor.file)
        {
            return None;
        }

        let Some(args) = self.schema.resolve_arguments(host, annotation) else {
            debug!(
                "{:?} at {}:{}: not a mapper marker or source type unresolved",
                annotation,
                anchor.file.display(),
                anchor.line
            );
            return None;
        };

        let Some(decl) = self.schema.resolve_declaration(host, annotation, args) else {
            debug!(
                "{:?} at {}:{}: mapper class unresolved",
                annotation,
                anchor.file.display(),
                anchor.line
            );
            return None;
        };

        let Some(source) = host.type_symbol(decl.source_type) else {
            debug!("{}: source type symbol missing", decl.name);
            return None;
        };

        let candidates = members::enumerate(source);

        let markers = self.schema.exclusion_markers();
        let source_markers = host.member_markers(decl.source_type, markers);
        let metadata_markers = decl
            .metadata_type
            .map(|md| host.member_markers(md, markers));
        let exclusions = ExclusionSet::resolve(
            &source_markers,
            metadata_markers.as_ref(),
            decl.explicit_exclusions.iter().cloned(),
        );

        debug!(
            "{} maps {}: {} candidate(s), {} excluded",
            decl.name,
            source.qualified_name,
            candidates.len(),
            exclusions.len()
        );

        let severity = self.severity();
        let diagnostics = candidates
            .into_iter()
            .filter(|m| !exclusions.contains(&m.name))
            .filter(|m| !scanner::is_mentioned(host, &m.name, decl.body_root))
            .map(|m| {
                let qualified = format!("{}.{}", source.name, m.name);
                let message = rule.format_message(&qualified, &decl.name);
                let mut diag = Diagnostic::new(&rule.id, severity, &message, anchor.clone())
                    .with_subject(&qualified, &decl.name);
                if let Some(desc) = &rule.description {
                    diag = diag.with_help(desc);
                }
                diag
            })
            .collect();
        Some(diagnostics)
    }

    /// Run every annotation occurrence, in source order
    fn analyze_all<H: Host + ?Sized>(&self, host: &H) -> Vec<Option<Vec<Diagnostic>>> {
        let occurrences = host.annotation_occurrences();

        if self.config.engine.parallel {
            occurrences
                .par_iter()
                .map(|&node| self.analyze(host, node))
                .collect()
        } else {
            occurrences
                .iter()
                .map(|&node| self.analyze(host, node))
                .collect()
        }
    }

    /// Analyze every annotation occurrence a host reports
    pub fn check<H: Host + ?Sized>(&self, host: &H) -> Vec<Diagnostic> {
        self.analyze_all(host).into_iter().flatten().flatten().collect()
    }

    /// Analyze an already-loaded host as a single file
    pub fn lint_host<H: Host + ?Sized>(&self, host: &H) -> LintResult {
        let outcomes = self.analyze_all(host);
        let mut result = LintResult {
            files_processed: 1,
            mappers_checked: outcomes.iter().filter(|o| o.is_some()).count(),
            ..LintResult::default()
        };
        result.record_file(outcomes.into_iter().flatten().flatten().collect());
        result
    }

    /// Lint multiple files
    pub fn lint(&self, files: &[PathBuf]) -> LintResult {
        let start = Instant::now();

        let results: Vec<LintResult> = if self.config.engine.parallel {
            let jobs = if self.config.engine.jobs > 0 {
                self.config.engine.jobs
            } else {
                num_cpus::get()
            };
            match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => pool.install(|| files.par_iter().map(|f| self.lint_file(f)).collect()),
                Err(e) => {
                    warn!("Falling back to the global thread pool: {}", e);
                    files.par_iter().map(|f| self.lint_file(f)).collect()
                }
            }
        } else {
            files.iter().map(|f| self.lint_file(f)).collect()
        };

        let mut combined = LintResult::default();
        for result in results {
            combined.merge(result);
        }

        combined.duration = start.elapsed();
        info!(
            "Checked {} mapper(s) in {} file(s): {} diagnostic(s)",
            combined.mappers_checked,
            combined.files_processed,
            combined.diagnostics.len()
        );
        combined
    }

    /// Lint a single file
    pub fn lint_file(&self, path: &Path) -> LintResult {
        let Some(frontend) = self.get_frontend(path) else {
            debug!("No front end for {}", path.display());
            return LintResult {
                files_processed: 1,
                ..LintResult::default()
            };
        };

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return Self::file_failure(
                    path,
                    "file-read-error",
                    &format!("Failed to read file: {}", e),
                );
            }
        };

        match frontend.load(&content, path) {
            Ok(host) => self.lint_host(host.as_ref()),
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
                Self::file_failure(path, "load-error", &format!("Load error: {}", e))
            }
        }
    }

    fn file_failure(path: &Path, rule_id: &str, message: &str) -> LintResult {
        let mut result = LintResult {
            files_processed: 1,
            ..LintResult::default()
        };
        result.record_file(vec![Diagnostic::new(
            rule_id,
            Severity::Error,
            message,
            Location::new(path.to_path_buf(), 0, 0),
        )]);
        result
    }
}
