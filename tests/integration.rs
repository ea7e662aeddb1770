//! Integration tests for map-enforcer

use map_enforcer::{
    config::Config,
    diagnostic::Severity,
    engine::{Engine, LintResult},
    output::{JsonFormatter, OutputFormatter, SarifFormatter},
    SnapshotFrontend,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn engine_with(config: Config) -> Engine {
    let mut engine = Engine::new(config);
    engine.register_frontend(Arc::new(SnapshotFrontend::new()));
    engine
}

fn engine() -> Engine {
    engine_with(Config::default())
}

fn lint(fixture: &str) -> LintResult {
    engine().lint_file(&fixtures_path().join(fixture))
}

fn unmapped(result: &LintResult) -> Vec<&str> {
    result
        .diagnostics
        .iter()
        .filter_map(|d| d.source_member.as_deref())
        .collect()
}

#[test]
fn test_scenario_a_reports_unmentioned_members_in_order() {
    let result = lint("scenario_a.mapper.yaml");

    assert_eq!(unmapped(&result), vec!["SourceDto.B", "SourceDto.C"]);
    assert_eq!(result.mappers_checked, 1);
    assert_eq!(result.error_count, 2);

    let first = &result.diagnostics[0];
    assert_eq!(first.rule_id, "MEA001");
    assert_eq!(first.severity, Severity::Error);
    assert_eq!(first.mapper.as_deref(), Some("MyMapper"));
    assert_eq!((first.location.line, first.location.column), (6, 6));
    assert!(first.message.contains("Property SourceDto.B was not mapped by MyMapper."));
    assert!(first.message.contains("Mapper attribute exceptions"));
}

#[test]
fn test_scenario_b_marked_member_is_excluded() {
    let result = lint("scenario_b.mapper.yaml");
    assert_eq!(unmapped(&result), vec!["SourceDto.B"]);
}

#[test]
fn test_scenario_c_receiver_position_counts() {
    let result = lint("scenario_c.mapper.yaml");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.mappers_checked, 1);
    assert!(result.is_clean());
}

#[test]
fn test_scenario_d_unmarked_class_is_ignored() {
    let result = lint("scenario_d.mapper.yaml");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.mappers_checked, 0);
    assert_eq!(result.exit_code(), 0);
}

#[test]
fn test_scenario_e_explicit_exclusions() {
    let result = lint("scenario_e.mapper.yaml");
    assert_eq!(unmapped(&result), vec!["SourceDto.C"]);
}

#[test]
fn test_metadata_type_shadows_source_markers() {
    let result = lint("metadata.mapper.yaml");

    // B is excluded by the metadata marker; C's source marker is shadowed
    assert_eq!(unmapped(&result), vec!["SourceDto.A", "SourceDto.C"]);
}

#[test]
fn test_class_level_exclusions_and_partial_types() {
    let result = lint("class_exclusions.mapper.json");

    assert_eq!(unmapped(&result), vec!["OrderDto.Total"]);
    assert_eq!(result.diagnostics[0].mapper.as_deref(), Some("OrderMapper"));
    assert_eq!(result.diagnostics[0].location.line, 11);
}

#[test]
fn test_each_mapper_is_checked_independently() {
    let result = lint("two_mappers.mapper.yaml");

    assert_eq!(result.mappers_checked, 2);
    assert_eq!(unmapped(&result), vec!["SourceDto.A", "SourceDto.B"]);
    assert!(result
        .diagnostics
        .iter()
        .all(|d| d.mapper.as_deref() == Some("SecondMapper") && d.location.line == 20));
}

#[test]
fn test_unresolved_source_type_is_silent() {
    let result = lint("unresolved_source.mapper.yaml");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.mappers_checked, 0);
}

#[test]
fn test_legacy_namespace_annotations_are_recognized() {
    let result = lint("legacy_namespace.mapper.yaml");

    // AuditMapper excludes B at class level and C by its member marker
    assert_eq!(result.mappers_checked, 2);
    assert_eq!(unmapped(&result), vec!["SourceDto.B"]);
    assert_eq!(result.diagnostics[0].mapper.as_deref(), Some("MyMapper"));
}

#[test]
fn test_lowercase_severity_key_in_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("map-enforcer.yaml");
    std::fs::write(&config_path, "rules:\n  severity:\n    mea001: info\n").unwrap();

    let config = Config::load(&config_path).unwrap();
    let result = engine_with(config).lint_file(&fixtures_path().join("scenario_a.mapper.yaml"));

    assert_eq!(result.info_count, 2);
    assert_eq!(result.exit_code(), 0);
}

#[test]
fn test_broken_snapshot_reports_load_error() {
    let result = lint("broken.mapper.yaml");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].rule_id, "load-error");
    assert_eq!(result.exit_code(), 2);
}

#[test]
fn test_lint_many_files() {
    let files: Vec<PathBuf> = [
        "scenario_a.mapper.yaml",
        "scenario_b.mapper.yaml",
        "scenario_c.mapper.yaml",
        "scenario_d.mapper.yaml",
        "scenario_e.mapper.yaml",
    ]
    .iter()
    .map(|f| fixtures_path().join(f))
    .collect();

    let result = engine().lint(&files);

    assert_eq!(result.files_processed, 5);
    assert_eq!(result.files_with_errors, 3);
    assert_eq!(result.mappers_checked, 4);
    assert_eq!(result.error_count, 4);
}

#[test]
fn test_severity_override_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("map-enforcer.yaml");
    std::fs::write(
        &config_path,
        "engine:\n  parallel: false\nrules:\n  severity:\n    MEA001: warning\n",
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    let result = engine_with(config).lint_file(&fixtures_path().join("scenario_a.mapper.yaml"));

    assert_eq!(result.warning_count, 2);
    assert_eq!(result.error_count, 0);
    assert_eq!(result.exit_code(), 1);
}

#[test]
fn test_custom_exclusion_marker_from_config() {
    let mut config = Config::default();
    config.schema.exclusion_markers = vec!["Acme.NotMapped".to_string()];

    // The default marker on C is no longer recognized
    let result = engine_with(config).lint_file(&fixtures_path().join("scenario_b.mapper.yaml"));
    assert_eq!(unmapped(&result), vec!["SourceDto.B", "SourceDto.C"]);
}

#[test]
fn test_json_and_sarif_reports() {
    let result = lint("scenario_a.mapper.yaml");

    let json: serde_json::Value =
        serde_json::from_str(&JsonFormatter::new().format(&result)).unwrap();
    assert_eq!(json["diagnostics"].as_array().unwrap().len(), 2);
    assert_eq!(json["diagnostics"][0]["mapper"], "MyMapper");

    let sarif: serde_json::Value =
        serde_json::from_str(&SarifFormatter::new("map-enforcer", "0.1.0").format(&result))
            .unwrap();
    assert_eq!(sarif["runs"][0]["results"].as_array().unwrap().len(), 2);
    assert_eq!(sarif["runs"][0]["results"][1]["properties"]["sourceMember"], "SourceDto.C");
}
