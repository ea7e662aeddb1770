//! Map Enforcer CLI
//!
//! Reports source-type properties that mapper classes never mention.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use glob::glob;
use log::{debug, info};
use map_enforcer::config::{ColorMode, Config, OutputFormat};
use map_enforcer::output::{
    CompactFormatter, GithubFormatter, JsonFormatter, OutputFormatter, SarifFormatter,
    TextFormatter,
};
use map_enforcer::rule::{builtin_rules, find_rule};
use map_enforcer::{Engine, Rule, Severity, SnapshotFrontend};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "map-enforcer",
    version,
    about = "Mapper completeness linter",
    long_about = "Reports every source-type property a mapper class never mentions \
                  and has not excluded."
)]
struct Cli {
    /// Snapshot files or glob patterns to check (defaults to config include patterns)
    files: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    /// Severity for unmapped-property diagnostics
    #[arg(long, value_enum)]
    severity: Option<Level>,

    /// Show statistics
    #[arg(long)]
    stats: bool,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Exit with 0 even if errors are found
    #[arg(long)]
    exit_zero: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show detailed information about a rule
    Explain {
        /// Rule ID or name to explain
        rule_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Sarif,
    Github,
    Compact,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Sarif => OutputFormat::Sarif,
            Format::Github => OutputFormat::Github,
            Format::Compact => OutputFormat::Compact,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Info,
    Warning,
    Error,
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Info => Severity::Info,
            Level::Warning => Severity::Warning,
            Level::Error => Severity::Error,
        }
    }
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Error => "error".red(),
        Severity::Warning => "warning".yellow(),
        Severity::Info => "info".blue(),
    }
}

fn print_rule(rule: &Rule) {
    println!(
        "    {} [{}] ({})",
        rule.id.cyan(),
        severity_label(rule.severity),
        rule.category
    );
    if let Some(desc) = &rule.description {
        println!("      {}", desc);
    }
    if !rule.tags.is_empty() {
        println!("      Tags: {}", rule.tags.join(", "));
    }
}

fn explain_rule(rule: &Rule) {
    println!("{}", "Rule Details".bold());
    println!();
    println!("  {}: {}", "ID".bold(), rule.id.cyan());
    if let Some(name) = &rule.name {
        println!("  {}: {}", "Name".bold(), name);
    }
    println!("  {}: {}", "Severity".bold(), severity_label(rule.severity));
    println!("  {}: {}", "Category".bold(), rule.category);

    if let Some(desc) = &rule.description {
        println!();
        println!("  {}", "Description".bold());
        println!("  {}", desc);
    }

    if let Some(rationale) = &rule.rationale {
        println!();
        println!("  {}", "Rationale".bold());
        println!("  {}", rationale);
    }

    println!();
    println!("  {}", "Message".bold());
    println!("  {}", rule.message);

    if let Some(bad) = &rule.example_bad {
        println!();
        println!("  {} {}", "Example".bold(), "(incorrect)".red());
        for line in bad.lines() {
            println!("    {}", line);
        }
    }

    if let Some(good) = &rule.example_good {
        println!();
        println!("  {} {}", "Example".bold(), "(correct)".green());
        for line in good.lines() {
            println!("    {}", line);
        }
    }
}

/// Expand CLI patterns, or fall back to config include patterns
fn collect_files(patterns: &[String], config: &Config) -> Result<Vec<PathBuf>> {
    if patterns.is_empty() {
        let files = config.files.discover(Path::new("."));
        debug!("Discovered {} file(s) from include patterns", files.len());
        return Ok(files);
    }

    let mut files = Vec::new();
    for pattern in patterns {
        let paths = glob(pattern).with_context(|| format!("Invalid pattern '{}'", pattern))?;
        files.extend(paths.flatten().filter(|p| p.is_file()));
    }
    Ok(files)
}

fn run(cli: Cli) -> Result<i32> {
    if let Some(Commands::Explain { rule_id }) = &cli.command {
        let Some(rule) = find_rule(rule_id) else {
            bail!(
                "Unknown rule '{}'. Use --list-rules to see available rules",
                rule_id
            );
        };
        explain_rule(&rule);
        return Ok(0);
    }

    if cli.list_rules {
        println!("{}", "Available rules:".bold());
        println!();
        for rule in builtin_rules() {
            print_rule(&rule);
        }
        return Ok(0);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default().context("Failed to load config")?,
    };

    config.merge_cli(
        cli.format.map(OutputFormat::from),
        cli.verbose.then_some(true),
        cli.jobs,
        cli.disable.clone(),
        cli.severity.map(Severity::from),
    );
    if cli.stats {
        config.output.statistics = true;
    }

    let use_color = !cli.no_color
        && match config.output.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        };
    colored::control::set_override(use_color);

    let files = collect_files(&cli.files, &config)?;
    if files.is_empty() {
        bail!("No files found to check");
    }
    info!("Checking {} file(s)", files.len());

    let format = config.output.format;
    let statistics = config.output.statistics || config.output.verbose;

    let mut engine = Engine::new(config);
    engine.register_frontend(Arc::new(SnapshotFrontend::new()));
    let result = engine.lint(&files);

    let formatter: Box<dyn OutputFormatter> = match format {
        OutputFormat::Text => {
            let mut text = TextFormatter::new();
            text.colored = use_color;
            text.show_stats = statistics || !result.is_clean();
            Box::new(text)
        }
        OutputFormat::Json => Box::new(JsonFormatter::new().pretty()),
        OutputFormat::Sarif => Box::new(SarifFormatter::new(
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
        )),
        OutputFormat::Github => Box::new(GithubFormatter::new()),
        OutputFormat::Compact => Box::new(CompactFormatter::new()),
    };

    print!("{}", formatter.format(&result));

    if cli.exit_zero {
        Ok(0)
    } else {
        Ok(result.exit_code())
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(2);
        }
    }
}
