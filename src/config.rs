//! Configuration system for the analysis engine
//!
//! Reads configuration from:
//! - `.mapenforcerrc.yaml` / `.mapenforcerrc.json` (project-level)
//! - `~/.mapenforcerrc.yaml` (user-level)

use crate::diagnostic::Severity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Enable parallel processing
    pub parallel: bool,

    /// Number of parallel jobs (0 = auto-detect)
    pub jobs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Verbose output
    pub verbose: bool,

    /// Show statistics
    pub statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: ColorMode::Auto,
            verbose: false,
            statistics: true,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Sarif,
    Github,
    Compact,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            "github" => Ok(OutputFormat::Github),
            "compact" => Ok(OutputFormat::Compact),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// File handling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Include patterns
    pub include: Vec<String>,

    /// Exclude patterns
    pub exclude: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            include: vec![
                "**/*.mapper.yaml".to_string(),
                "**/*.mapper.yml".to_string(),
                "**/*.mapper.json".to_string(),
            ],
            exclude: vec![
                "**/node_modules/**".to_string(),
                "**/target/**".to_string(),
                "**/bin/**".to_string(),
                "**/obj/**".to_string(),
            ],
        }
    }
}

impl FilesConfig {
    /// Find files under `root` matching an include pattern and no exclude pattern
    ///
    /// Unreadable entries and invalid patterns are skipped.
    pub fn discover(&self, root: &Path) -> Vec<PathBuf> {
        let mut excludes = globset::GlobSetBuilder::new();
        for pattern in &self.exclude {
            if let Ok(glob) = globset::Glob::new(pattern) {
                excludes.add(glob);
            }
        }
        let excludes = excludes
            .build()
            .unwrap_or_else(|_| globset::GlobSet::empty());

        let mut found = BTreeSet::new();
        for pattern in &self.include {
            let full = root.join(pattern);
            let Ok(paths) = glob::glob(&full.to_string_lossy()) else {
                continue;
            };
            for entry in paths.flatten() {
                let relative = entry.strip_prefix(root).unwrap_or(&entry);
                if entry.is_file() && !excludes.is_match(relative) {
                    found.insert(entry);
                }
            }
        }

        found.into_iter().collect()
    }
}

/// Rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Severity overrides (rule_id -> severity)
    pub severity: HashMap<String, Severity>,

    /// Per-file rule ignores (glob pattern -> rule IDs)
    pub per_file: HashMap<String, Vec<String>>,
}

/// Fully qualified identities of the annotations the engine recognizes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Mapper marker annotations (one per schema revision)
    pub mapper_markers: Vec<String>,

    /// Per-member "exclude from mapping" annotations
    pub exclusion_markers: Vec<String>,

    /// Class-level annotations listing excluded member names
    pub class_exclusion_markers: Vec<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            mapper_markers: vec![
                "MapEnforcer.MapperAttribute".to_string(),
                "MapEnforcer.Attributes.MapperAttribute".to_string(),
                "NCR.Engage.RoslynAnalysis.MapperAttribute".to_string(),
                "NCR.Engage.RoslynAnalysis.Attributes.MapperAttribute".to_string(),
            ],
            exclusion_markers: vec![
                "MapEnforcer.ExcludeFromMappingAttribute".to_string(),
                "MapEnforcer.Attributes.ExcludeFromMappingAttribute".to_string(),
                "NCR.Engage.RoslynAnalysis.ExcludeFromMappingAttribute".to_string(),
                "NCR.Engage.RoslynAnalysis.Attributes.ExcludeFromMappingAttribute".to_string(),
            ],
            // The legacy spelling is the name the annotation package actually ships
            class_exclusion_markers: vec![
                "MapEnforcer.Attributes.MapperExclusionsAttribute".to_string(),
                "NCR.Engage.RoslynAnalysis.Attributes.MapperExclussionsAttribute".to_string(),
            ],
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// File handling settings
    pub files: FilesConfig,

    /// Rule configuration
    pub rules: RulesConfig,

    /// Recognized annotation identities
    pub schema: SchemaConfig,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that could never match a mapper
    fn validate(&self) -> Result<(), ConfigError> {
        if self.schema.mapper_markers.is_empty() {
            return Err(ConfigError::Invalid(
                "schema.mapper_markers must name at least one annotation".to_string(),
            ));
        }
        if let Some(bad) = self
            .schema
            .mapper_markers
            .iter()
            .chain(&self.schema.exclusion_markers)
            .chain(&self.schema.class_exclusion_markers)
            .find(|name| name.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "Empty annotation name in schema: {:?}",
                bad
            )));
        }
        for pattern in self.rules.per_file.keys() {
            globset::Glob::new(pattern).map_err(|e| {
                ConfigError::Invalid(format!("Bad per_file pattern {}: {}", pattern, e))
            })?;
        }
        Ok(())
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [
            ".mapenforcerrc.yaml",
            ".mapenforcerrc.yml",
            ".mapenforcerrc.json",
            "map-enforcer.yaml",
            "map-enforcer.yml",
            "map-enforcer.json",
        ];

        // Check current directory
        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        // Check home directory
        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        format: Option<OutputFormat>,
        verbose: Option<bool>,
        jobs: Option<usize>,
        disabled_rules: Option<Vec<String>>,
        severity: Option<Severity>,
    ) {
        if let Some(f) = format {
            self.output.format = f;
        }
        if let Some(v) = verbose {
            self.output.verbose = v;
        }
        if let Some(j) = jobs {
            self.engine.jobs = j;
        }
        if let Some(disabled) = disabled_rules {
            self.rules.disabled.extend(disabled);
        }
        if let Some(level) = severity {
            self.rules
                .severity
                .insert(crate::rule::PROPERTY_NOT_MAPPED.to_string(), level);
        }
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self
            .rules
            .disabled
            .iter()
            .any(|d| d.eq_ignore_ascii_case(rule_id))
    }

    /// Get severity override for a rule
    pub fn get_severity_override(&self, rule_id: &str) -> Option<Severity> {
        self.rules
            .severity
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(rule_id))
            .map(|(_, &level)| level)
    }

    /// Check if a rule should be ignored for a file
    pub fn should_ignore_rule_for_file(&self, rule_id: &str, file_path: &Path) -> bool {
        let file_str = file_path.to_string_lossy();

        for (pattern, rules) in &self.rules.per_file {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(file_str.as_ref())
                    && rules.iter().any(|r| r == "all" || r == rule_id)
                {
                    return true;
                }
            }
        }

        false
    }
}
