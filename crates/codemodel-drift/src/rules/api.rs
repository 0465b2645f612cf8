use crate::identity::{
    build_handler_map, endpoint_meta, handler_identity_meta,
};
use codemodel_core::{AnalysisArtifacts, DriftFinding, DriftRule, DriftSeverity};
use std::collections::BTreeMap;

/// Handler identity present in the baseline but absent from the current
/// snapshot.
#[derive(Debug, Default)]
pub struct EndpointRemovedRule;

impl DriftRule for EndpointRemovedRule {
    fn name(&self) -> &'static str {
        "EndpointRemoved"
    }

    fn evaluate(
        &self,
        baseline: &AnalysisArtifacts,
        current: &AnalysisArtifacts,
    ) -> Vec<DriftFinding> {
        let baseline_map = build_handler_map(&baseline.endpoints);
        let current_map = build_handler_map(&current.endpoints);
        let mut findings = Vec::new();
        for (identity, endpoint) in &baseline_map {
            if current_map.contains_key(identity) {
                continue;
            }
            let mut metadata = BTreeMap::new();
            metadata.insert("baseline_endpoint".to_string(), endpoint_meta(endpoint));
            metadata.insert(
                "handler_identity".to_string(),
                handler_identity_meta(identity),
            );
            findings.push(DriftFinding {
                drift_type: "API_REMOVED".to_string(),
                description: format!(
                    "Endpoint {} {} is not present in the current artifacts.",
                    endpoint.http_method.to_uppercase(),
                    endpoint.path
                ),
                severity: DriftSeverity::High,
                metadata,
            });
        }
        findings
    }
}

/// Same handler identity, different path.
#[derive(Debug, Default)]
pub struct EndpointPathChangedRule;

impl DriftRule for EndpointPathChangedRule {
    fn name(&self) -> &'static str {
        "EndpointPathChanged"
    }

    fn evaluate(
        &self,
        baseline: &AnalysisArtifacts,
        current: &AnalysisArtifacts,
    ) -> Vec<DriftFinding> {
        let baseline_map = build_handler_map(&baseline.endpoints);
        let current_map = build_handler_map(&current.endpoints);
        let mut findings = Vec::new();
        for (identity, baseline_endpoint) in &baseline_map {
            let Some(current_endpoint) = current_map.get(identity) else {
                continue;
            };
            if baseline_endpoint.path == current_endpoint.path {
                continue;
            }
            let mut metadata = BTreeMap::new();
            metadata.insert(
                "baseline_endpoint".to_string(),
                endpoint_meta(baseline_endpoint),
            );
            metadata.insert(
                "current_endpoint".to_string(),
                endpoint_meta(current_endpoint),
            );
            metadata.insert(
                "handler_identity".to_string(),
                handler_identity_meta(identity),
            );
            findings.push(DriftFinding {
                drift_type: "API_PATH_CHANGED".to_string(),
                description: format!(
                    "Endpoint path changed from {} {} to {} {}.",
                    baseline_endpoint.http_method.to_uppercase(),
                    baseline_endpoint.path,
                    current_endpoint.http_method.to_uppercase(),
                    current_endpoint.path
                ),
                severity: DriftSeverity::Medium,
                metadata,
            });
        }
        findings
    }
}

/// Same handler identity, different HTTP method (compared uppercase).
#[derive(Debug, Default)]
pub struct EndpointMethodChangedRule;

impl DriftRule for EndpointMethodChangedRule {
    fn name(&self) -> &'static str {
        "EndpointMethodChanged"
    }

    fn evaluate(
        &self,
        baseline: &AnalysisArtifacts,
        current: &AnalysisArtifacts,
    ) -> Vec<DriftFinding> {
        let baseline_map = build_handler_map(&baseline.endpoints);
        let current_map = build_handler_map(&current.endpoints);
        let mut findings = Vec::new();
        for (identity, baseline_endpoint) in &baseline_map {
            let Some(current_endpoint) = current_map.get(identity) else {
                continue;
            };
            if baseline_endpoint.http_method.to_uppercase()
                == current_endpoint.http_method.to_uppercase()
            {
                continue;
            }
            let mut metadata = BTreeMap::new();
            metadata.insert(
                "baseline_endpoint".to_string(),
                endpoint_meta(baseline_endpoint),
            );
            metadata.insert(
                "current_endpoint".to_string(),
                endpoint_meta(current_endpoint),
            );
            metadata.insert(
                "handler_identity".to_string(),
                handler_identity_meta(identity),
            );
            findings.push(DriftFinding {
                drift_type: "API_METHOD_CHANGED".to_string(),
                description: format!(
                    "Endpoint {} changed method from {} to {}.",
                    baseline_endpoint.path,
                    baseline_endpoint.http_method.to_uppercase(),
                    current_endpoint.http_method.to_uppercase()
                ),
                severity: DriftSeverity::Medium,
                metadata,
            });
        }
        findings
    }
}
