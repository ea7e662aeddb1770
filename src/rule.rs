//! Rule definitions

use crate::diagnostic::Severity;
use std::fmt;

/// Identifier of the mapper completeness rule
pub const PROPERTY_NOT_MAPPED: &str = "MEA001";

/// Rule category shown by `--list-rules` and `explain`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleCategory {
    /// Code that is definitely wrong or loses data
    #[default]
    Correctness,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Correctness => write!(f, "correctness"),
        }
    }
}

/// A lint rule definition
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique rule identifier (e.g., "MEA001")
    pub id: String,

    /// Human-readable name
    pub name: Option<String>,

    /// Detailed description
    pub description: Option<String>,

    /// Default severity level
    pub severity: Severity,

    /// Rule category
    pub category: RuleCategory,

    /// Message template with `{member}` and `{mapper}` slots
    pub message: String,

    /// Tags for categorization
    pub tags: Vec<String>,

    /// Rationale explaining why this rule exists
    pub rationale: Option<String>,

    /// Example of code that violates this rule
    pub example_bad: Option<String>,

    /// Example of correct code
    pub example_good: Option<String>,
}

impl Rule {
    /// Create a new rule with minimal required fields
    pub fn new(id: &str, message: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            description: None,
            severity: Severity::Warning,
            category: RuleCategory::default(),
            message: message.to_string(),
            tags: Vec::new(),
            rationale: None,
            example_bad: None,
            example_good: None,
        }
    }

    /// The mapper completeness rule
    pub fn property_not_mapped() -> Self {
        Self::new(
            PROPERTY_NOT_MAPPED,
            "Property {member} was not mapped by {mapper}. Decide whether this is the intended \
             behavior -- you should consider adding proper mapping code into {mapper} so the \
             content of {member} won't get lost. If you are sure this property should not be \
             mapped, add it to the list of Mapper attribute exceptions.",
        )
        .with_name("property-not-mapped")
        .with_severity(Severity::Error)
        .with_category(RuleCategory::Correctness)
        .with_description("All properties of a mapper's source type should be mapped.")
        .with_rationale(
            "When a data-transfer object gains a new property, hand-written mapping code \
             keeps compiling and silently drops the new value.",
        )
        .with_example_bad(
            "[Mapper(typeof(SourceDto))]\nclass MyMapper {\n    Target Map(SourceDto s) => new Target { A = s.A };\n}\n// SourceDto.B is never read",
        )
        .with_example_good(
            "[Mapper(typeof(SourceDto), \"B\")]\nclass MyMapper {\n    Target Map(SourceDto s) => new Target { A = s.A };\n}",
        )
        .with_tag("mapping")
        .with_tag("completeness")
    }

    /// Render the message for one unmapped member
    pub fn format_message(&self, member: &str, mapper: &str) -> String {
        self.message
            .replace("{member}", member)
            .replace("{mapper}", mapper)
    }

    /// Set the human-readable name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the rule category
    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the rationale
    pub fn with_rationale(mut self, rationale: &str) -> Self {
        self.rationale = Some(rationale.to_string());
        self
    }

    /// Set bad example
    pub fn with_example_bad(mut self, example: &str) -> Self {
        self.example_bad = Some(example.to_string());
        self
    }

    /// Set good example
    pub fn with_example_good(mut self, example: &str) -> Self {
        self.example_good = Some(example.to_string());
        self
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    /// Set the description
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// All rules shipped with the engine
pub fn builtin_rules() -> Vec<Rule> {
    vec![Rule::property_not_mapped()]
}

/// Look up a built-in rule by id (case-insensitive) or name
pub fn find_rule(id_or_name: &str) -> Option<Rule> {
    builtin_rules().into_iter().find(|r| {
        r.id.eq_ignore_ascii_case(id_or_name) || r.name.as_deref() == Some(id_or_name)
    })
}
