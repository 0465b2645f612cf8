use crate::identity::{
    build_dependency_set, dependency_identity_meta, index_dependencies, relation_meta,
};
use codemodel_core::{AnalysisArtifacts, DriftFinding, DriftRule, DriftSeverity};
use std::collections::BTreeMap;

/// Import/depends relation in the current snapshot but not the baseline.
#[derive(Debug, Default)]
pub struct DependencyAddedRule;

impl DriftRule for DependencyAddedRule {
    fn name(&self) -> &'static str {
        "DependencyAdded"
    }

    fn evaluate(
        &self,
        baseline: &AnalysisArtifacts,
        current: &AnalysisArtifacts,
    ) -> Vec<DriftFinding> {
        let baseline_set = build_dependency_set(&baseline.relations);
        let current_set = build_dependency_set(&current.relations);
        let current_index = index_dependencies(&current.relations);

        let mut findings = Vec::new();
        for identity in current_set.difference(&baseline_set) {
            let Some(relation) = current_index.get(identity) else {
                continue;
            };
            let mut metadata = BTreeMap::new();
            metadata.insert(
                "dependency".to_string(),
                dependency_identity_meta(identity),
            );
            metadata.insert("relation".to_string(), relation_meta(relation));
            findings.push(DriftFinding {
                drift_type: "DEPENDENCY_ADDED".to_string(),
                description: format!(
                    "Dependency {} from {} to {} added.",
                    identity.1, identity.2, identity.3
                ),
                severity: DriftSeverity::Low,
                metadata,
            });
        }
        findings
    }
}

/// Import/depends relation in the baseline but not the current snapshot.
#[derive(Debug, Default)]
pub struct DependencyRemovedRule;

impl DriftRule for DependencyRemovedRule {
    fn name(&self) -> &'static str {
        "DependencyRemoved"
    }

    fn evaluate(
        &self,
        baseline: &AnalysisArtifacts,
        current: &AnalysisArtifacts,
    ) -> Vec<DriftFinding> {
        let baseline_set = build_dependency_set(&baseline.relations);
        let current_set = build_dependency_set(&current.relations);
        let baseline_index = index_dependencies(&baseline.relations);

        let mut findings = Vec::new();
        for identity in baseline_set.difference(&current_set) {
            let Some(relation) = baseline_index.get(identity) else {
                continue;
            };
            let mut metadata = BTreeMap::new();
            metadata.insert(
                "dependency".to_string(),
                dependency_identity_meta(identity),
            );
            metadata.insert("relation".to_string(), relation_meta(relation));
            findings.push(DriftFinding {
                drift_type: "DEPENDENCY_REMOVED".to_string(),
                description: format!(
                    "Dependency {} from {} to {} removed.",
                    identity.1, identity.2, identity.3
                ),
                severity: DriftSeverity::Medium,
                metadata,
            });
        }
        findings
    }
}
