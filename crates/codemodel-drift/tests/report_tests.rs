use chrono::{TimeZone, Utc};
use codemodel_core::{DriftFinding, DriftSeverity};
use codemodel_drift::ValidationReportGenerator;
use std::collections::BTreeMap;

fn finding(drift_type: &str, severity: DriftSeverity) -> DriftFinding {
    DriftFinding {
        drift_type: drift_type.to_string(),
        description: format!("{drift_type} happened"),
        severity,
        metadata: Default::default(),
    }
}

fn fixed_clock() -> ValidationReportGenerator {
    ValidationReportGenerator::new()
        .with_clock(Box::new(|| Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()))
}

#[test]
fn summary_counts_balance() {
    let findings = vec![
        finding("API_REMOVED", DriftSeverity::High),
        finding("API_PATH_CHANGED", DriftSeverity::Medium),
        finding("DEPENDENCY_ADDED", DriftSeverity::Low),
        finding("DEPENDENCY_ADDED", DriftSeverity::Low),
    ];
    let report = fixed_clock().generate(findings, None);

    assert_eq!(report.summary.total_findings, 4);
    assert_eq!(report.summary.total_findings, report.findings.len());
    let by_severity: usize = report
        .summary
        .counts_by_severity
        .iter()
        .map(|(_, count)| count)
        .sum();
    let by_type: usize = report
        .summary
        .counts_by_type
        .iter()
        .map(|(_, count)| count)
        .sum();
    assert_eq!(by_severity, 4);
    assert_eq!(by_type, 4);
}

#[test]
fn severity_counts_follow_display_order_with_zeroes() {
    let report = fixed_clock().generate(vec![finding("X", DriftSeverity::Low)], None);
    let keys: Vec<&str> = report
        .summary
        .counts_by_severity
        .iter()
        .map(|(key, _)| key.as_str())
        .collect();
    assert_eq!(keys, vec!["HIGH", "MEDIUM", "LOW"]);
    assert_eq!(report.summary.counts_by_severity[0].1, 0);
    assert_eq!(report.summary.counts_by_severity[2].1, 1);
}

#[test]
fn severities_outside_the_configured_order_are_appended() {
    let generator = fixed_clock().with_severity_order(vec![DriftSeverity::High]);
    let report = generator.generate(
        vec![
            finding("A", DriftSeverity::Medium),
            finding("B", DriftSeverity::High),
        ],
        None,
    );
    let keys: Vec<&str> = report
        .summary
        .counts_by_severity
        .iter()
        .map(|(key, _)| key.as_str())
        .collect();
    assert_eq!(keys, vec!["HIGH", "MEDIUM"]);
}

#[test]
fn type_counts_are_lexicographic() {
    let report = fixed_clock().generate(
        vec![
            finding("ZEBRA", DriftSeverity::Low),
            finding("ALPHA", DriftSeverity::Low),
            finding("ALPHA", DriftSeverity::Low),
        ],
        None,
    );
    let keys: Vec<&str> = report
        .summary
        .counts_by_type
        .iter()
        .map(|(key, _)| key.as_str())
        .collect();
    assert_eq!(keys, vec!["ALPHA", "ZEBRA"]);
}

#[test]
fn json_rendering_uses_string_enum_values_and_iso_timestamp() {
    let generator = fixed_clock();
    let report = generator.generate(vec![finding("API_REMOVED", DriftSeverity::High)], None);
    let value = generator.to_value(&report).unwrap();

    assert_eq!(value["summary"]["total_findings"], 1);
    assert_eq!(value["summary"]["counts_by_severity"]["HIGH"], 1);
    assert_eq!(value["findings"][0]["severity"], "HIGH");
    let timestamp = value["generated_at"].as_str().unwrap();
    assert!(timestamp.starts_with("2024-05-01T12:00:00"));
}

#[test]
fn markdown_groups_by_severity_and_suppresses_empty_groups() {
    let generator = fixed_clock();
    let report = generator.generate(
        vec![
            finding("DEPENDENCY_ADDED", DriftSeverity::Low),
            finding("API_REMOVED", DriftSeverity::High),
            finding("API_HANDLER_MISSING", DriftSeverity::High),
        ],
        None,
    );
    let markdown = generator.to_markdown(&report);

    assert!(markdown.starts_with("# Validation Report"));
    assert!(markdown.contains("## Summary"));
    assert!(markdown.contains("- Total Findings: 3"));
    assert!(markdown.contains("## HIGH (2)"));
    assert!(markdown.contains("## LOW (1)"));
    assert!(!markdown.contains("## MEDIUM"));
    assert!(markdown.contains("- **API_REMOVED**: API_REMOVED happened"));

    let high_pos = markdown.find("## HIGH").unwrap();
    let low_pos = markdown.find("## LOW").unwrap();
    assert!(high_pos < low_pos);
    assert!(!markdown.ends_with('\n'));
}

#[test]
fn report_metadata_passes_through() {
    let mut metadata = BTreeMap::new();
    metadata.insert(
        "repository".to_string(),
        codemodel_core::MetaValue::Str("demo".to_string()),
    );
    let report = fixed_clock().generate(vec![], Some(metadata));
    assert_eq!(report.summary.total_findings, 0);
    assert!(report.metadata.contains_key("repository"));
}

#[test]
fn generation_is_deterministic_under_a_fixed_clock() {
    let generator = fixed_clock();
    let first = generator.generate(vec![finding("X", DriftSeverity::Low)], None);
    let second = generator.generate(vec![finding("X", DriftSeverity::Low)], None);
    assert_eq!(first, second);
}
