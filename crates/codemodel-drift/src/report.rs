use chrono::{DateTime, Utc};
use codemodel_core::{DriftFinding, DriftSeverity, MetaValue, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Summary of findings: total, counts per severity in display order, and
/// counts per drift type in lexicographic order. Serializes as ordered
/// maps.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub total_findings: usize,
    pub counts_by_severity: Vec<(String, usize)>,
    pub counts_by_type: Vec<(String, usize)>,
}

impl Serialize for ReportSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("total_findings", &self.total_findings)?;
        map.serialize_entry("counts_by_severity", &OrderedCounts(&self.counts_by_severity))?;
        map.serialize_entry("counts_by_type", &OrderedCounts(&self.counts_by_type))?;
        map.end()
    }
}

struct OrderedCounts<'a>(&'a [(String, usize)]);

impl Serialize for OrderedCounts<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, count) in self.0 {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub summary: ReportSummary,
    pub findings: Vec<DriftFinding>,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, MetaValue>,
}

pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

const DEFAULT_SEVERITY_ORDER: [DriftSeverity; 3] = [
    DriftSeverity::High,
    DriftSeverity::Medium,
    DriftSeverity::Low,
];

/// Renders findings into a `ValidationReport`, a JSON mapping, or Markdown.
/// The clock is injectable so reports are reproducible under test.
pub struct ValidationReportGenerator {
    severity_order: Vec<DriftSeverity>,
    clock: Clock,
}

impl Default for ValidationReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationReportGenerator {
    pub fn new() -> Self {
        Self {
            severity_order: DEFAULT_SEVERITY_ORDER.to_vec(),
            clock: Box::new(Utc::now),
        }
    }

    pub fn with_severity_order(mut self, order: Vec<DriftSeverity>) -> Self {
        self.severity_order = order;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn generate(
        &self,
        findings: impl IntoIterator<Item = DriftFinding>,
        metadata: Option<BTreeMap<String, MetaValue>>,
    ) -> ValidationReport {
        let findings: Vec<DriftFinding> = findings.into_iter().collect();
        let summary = self.summarize(&findings);
        ValidationReport {
            summary,
            findings,
            generated_at: (self.clock)(),
            metadata: metadata.unwrap_or_default(),
        }
    }

    fn summarize(&self, findings: &[DriftFinding]) -> ReportSummary {
        let mut counts_by_severity: Vec<(String, usize)> = self
            .severity_order
            .iter()
            .map(|severity| (severity.to_string(), 0))
            .collect();
        let mut counts_by_type: BTreeMap<String, usize> = BTreeMap::new();

        for finding in findings {
            let key = finding.severity.to_string();
            match counts_by_severity.iter_mut().find(|(name, _)| *name == key) {
                Some((_, count)) => *count += 1,
                // Severities outside the configured order are appended in
                // first-occurrence order.
                None => counts_by_severity.push((key, 1)),
            }
            *counts_by_type.entry(finding.drift_type.clone()).or_insert(0) += 1;
        }

        ReportSummary {
            total_findings: findings.len(),
            counts_by_severity,
            counts_by_type: counts_by_type.into_iter().collect(),
        }
    }

    pub fn to_value(&self, report: &ValidationReport) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(report)?)
    }

    /// Markdown rendering: summary header, then one section per non-empty
    /// severity group.
    pub fn to_markdown(&self, report: &ValidationReport) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.push("# Validation Report".to_string());
        lines.push(String::new());
        lines.push(format!("Generated: {}", report.generated_at.to_rfc3339()));
        lines.push(String::new());
        lines.push("## Summary".to_string());
        lines.push(format!("- Total Findings: {}", report.summary.total_findings));

        if !report.summary.counts_by_severity.is_empty() {
            lines.push("- Severity Counts:".to_string());
            for (severity, count) in &report.summary.counts_by_severity {
                lines.push(format!("  - {severity}: {count}"));
            }
        }
        if !report.summary.counts_by_type.is_empty() {
            lines.push("- Drift Types:".to_string());
            for (drift_type, count) in &report.summary.counts_by_type {
                lines.push(format!("  - {drift_type}: {count}"));
            }
        }
        lines.push(String::new());

        for (severity, group) in self.group_by_severity(&report.findings) {
            if group.is_empty() {
                continue;
            }
            lines.push(format!("## {severity} ({})", group.len()));
            for finding in group {
                lines.push(format!("- **{}**: {}", finding.drift_type, finding.description));
            }
            lines.push(String::new());
        }

        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines.join("\n")
    }

    fn group_by_severity<'a>(
        &self,
        findings: &'a [DriftFinding],
    ) -> Vec<(String, Vec<&'a DriftFinding>)> {
        let mut groups: Vec<(DriftSeverity, Vec<&DriftFinding>)> = self
            .severity_order
            .iter()
            .map(|severity| (*severity, Vec::new()))
            .collect();
        for finding in findings {
            match groups.iter_mut().find(|(severity, _)| *severity == finding.severity) {
                Some((_, group)) => group.push(finding),
                None => groups.push((finding.severity, vec![finding])),
            }
        }
        groups
            .into_iter()
            .map(|(severity, group)| (severity.to_string(), group))
            .collect()
    }
}
