use crate::rules::{
    ApiHandlerMissingRule, DependencyAddedRule, DependencyRemovedRule, EndpointMethodChangedRule,
    EndpointPathChangedRule, EndpointRemovedRule, SymbolReferenceMissingRule,
};
use codemodel_core::{AnalysisArtifacts, DriftFinding, DriftRule};
use tracing::debug;

/// Ordered list of drift rules. Rules are independent and order-
/// insensitive; the engine is the only place that orders them, and
/// `evaluate` simply concatenates each rule's findings.
pub struct DriftEngine {
    rules: Vec<Box<dyn DriftRule>>,
}

impl Default for DriftEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DriftEngine {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(EndpointRemovedRule),
                Box::new(EndpointPathChangedRule),
                Box::new(EndpointMethodChangedRule),
                Box::new(DependencyAddedRule),
                Box::new(DependencyRemovedRule),
                Box::new(ApiHandlerMissingRule),
                Box::new(SymbolReferenceMissingRule),
            ],
        }
    }

    pub fn with_rules(rules: Vec<Box<dyn DriftRule>>) -> Self {
        Self { rules }
    }

    pub fn add_rule(&mut self, rule: Box<dyn DriftRule>) {
        self.rules.push(rule);
    }

    pub fn extend_rules(&mut self, rules: impl IntoIterator<Item = Box<dyn DriftRule>>) {
        self.rules.extend(rules);
    }

    pub fn rules(&self) -> &[Box<dyn DriftRule>] {
        &self.rules
    }

    pub fn evaluate(
        &self,
        baseline: &AnalysisArtifacts,
        current: &AnalysisArtifacts,
    ) -> Vec<DriftFinding> {
        let mut findings = Vec::new();
        for rule in &self.rules {
            let rule_findings = rule.evaluate(baseline, current);
            debug!("rule {} produced {} findings", rule.name(), rule_findings.len());
            findings.extend(rule_findings);
        }
        findings
    }
}
