//! SARIF (Static Analysis Results Interchange Format) output formatter
//!
//! SARIF is a standard format for static analysis tools, supported by
//! GitHub code scanning, Azure DevOps, and other CI/CD systems.

use super::OutputFormatter;
use crate::diagnostic::{Diagnostic, Severity};
use crate::engine::LintResult;
use crate::rule::find_rule;
use serde::Serialize;
use std::collections::BTreeMap;

/// SARIF formatter for CI/CD integration
#[derive(Default)]
pub struct SarifFormatter {
    /// Tool name
    pub tool_name: String,

    /// Tool version
    pub tool_version: String,
}

impl SarifFormatter {
    /// Create a new SARIF formatter
    pub fn new(tool_name: &str, tool_version: &str) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            tool_version: tool_version.to_string(),
        }
    }
}

#[derive(Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    short_description: SarifMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_description: Option<SarifMessage>,
    default_configuration: SarifConfiguration,
}

#[derive(Serialize)]
struct SarifConfiguration {
    level: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: &'static str,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<SarifProperties>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifProperties {
    source_member: String,
    mapper: String,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRegion {
    start_line: usize,
    start_column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_column: Option<usize>,
}

fn severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn to_rule(diag: &Diagnostic) -> SarifRule {
    match find_rule(&diag.rule_id) {
        Some(rule) => SarifRule {
            id: rule.id,
            name: rule.name,
            short_description: SarifMessage {
                text: rule
                    .description
                    .unwrap_or_else(|| diag.message.clone()),
            },
            full_description: rule.rationale.map(|text| SarifMessage { text }),
            default_configuration: SarifConfiguration {
                level: severity_to_level(rule.severity),
            },
        },
        // Load and read failures have no catalogue entry
        None => SarifRule {
            id: diag.rule_id.clone(),
            name: None,
            short_description: SarifMessage {
                text: diag.message.clone(),
            },
            full_description: None,
            default_configuration: SarifConfiguration {
                level: severity_to_level(diag.severity),
            },
        },
    }
}

fn to_result(d: &Diagnostic) -> SarifResult {
    let properties = match (&d.source_member, &d.mapper) {
        (Some(member), Some(mapper)) => Some(SarifProperties {
            source_member: member.clone(),
            mapper: mapper.clone(),
        }),
        _ => None,
    };

    SarifResult {
        rule_id: d.rule_id.clone(),
        level: severity_to_level(d.severity),
        message: SarifMessage {
            text: d.message.clone(),
        },
        locations: vec![SarifLocation {
            physical_location: SarifPhysicalLocation {
                artifact_location: SarifArtifactLocation {
                    uri: d.location.file.display().to_string(),
                },
                region: SarifRegion {
                    // SARIF regions are 1-based
                    start_line: d.location.line.max(1),
                    start_column: d.location.column.max(1),
                    end_column: (d.location.length > 0)
                        .then(|| d.location.column.max(1) + d.location.length),
                },
            },
        }],
        properties,
    }
}

impl OutputFormatter for SarifFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut rules: BTreeMap<&str, SarifRule> = BTreeMap::new();
        for diag in &result.diagnostics {
            rules
                .entry(diag.rule_id.as_str())
                .or_insert_with(|| to_rule(diag));
        }

        let report = SarifReport {
            schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            version: "2.1.0",
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: self.tool_name.clone(),
                        version: self.tool_version.clone(),
                        rules: rules.into_values().collect(),
                    },
                },
                results: result.diagnostics.iter().map(to_result).collect(),
            }],
        };

        serde_json::to_string_pretty(&report).unwrap_or_default()
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        serde_json::to_string_pretty(&to_result(diagnostic)).unwrap_or_default()
    }
}
