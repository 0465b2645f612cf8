use crate::identity::{
    build_symbol_name_set, candidate_handler_names, endpoint_meta, is_symbol_reference_relation,
    relation_meta, SymbolIdentity,
};
use codemodel_core::{AnalysisArtifacts, DriftFinding, DriftRule, DriftSeverity, MetaValue};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Endpoint whose handler symbol existed in the baseline but is absent
/// from the current symbol table.
#[derive(Debug, Default)]
pub struct ApiHandlerMissingRule;

impl DriftRule for ApiHandlerMissingRule {
    fn name(&self) -> &'static str {
        "ApiHandlerMissing"
    }

    fn evaluate(
        &self,
        baseline: &AnalysisArtifacts,
        current: &AnalysisArtifacts,
    ) -> Vec<DriftFinding> {
        let baseline_symbols = build_symbol_name_set(&baseline.symbols);
        let current_symbols = build_symbol_name_set(&current.symbols);

        let mut findings = Vec::new();
        for endpoint in &baseline.endpoints {
            let lookup_keys: BTreeSet<SymbolIdentity> = candidate_handler_names(endpoint)
                .into_iter()
                .map(|name| (endpoint.language, name))
                .collect();
            if !lookup_keys.iter().any(|key| baseline_symbols.contains(key)) {
                continue;
            }
            if lookup_keys.iter().any(|key| current_symbols.contains(key)) {
                continue;
            }
            let mut endpoint_map = BTreeMap::new();
            endpoint_map.insert(
                "handler_candidates".to_string(),
                MetaValue::List(
                    lookup_keys
                        .iter()
                        .map(|(_, name)| MetaValue::Str(name.clone()))
                        .collect(),
                ),
            );
            endpoint_map.insert("details".to_string(), endpoint_meta(endpoint));
            let mut metadata = BTreeMap::new();
            metadata.insert("endpoint".to_string(), MetaValue::Map(endpoint_map));
            findings.push(DriftFinding {
                drift_type: "API_HANDLER_MISSING".to_string(),
                description: format!(
                    "Handler for endpoint {} {} is missing from current symbols.",
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

/// Call/reference relation in the current snapshot whose source or target
/// symbol was defined in the baseline but is gone from the current symbol
/// table. Deduplicates within the rule so one relation never produces the
/// same finding twice.
#[derive(Debug, Default)]
pub struct SymbolReferenceMissingRule;

impl DriftRule for SymbolReferenceMissingRule {
    fn name(&self) -> &'static str {
        "SymbolReferenceMissing"
    }

    fn evaluate(
        &self,
        baseline: &AnalysisArtifacts,
        current: &AnalysisArtifacts,
    ) -> Vec<DriftFinding> {
        let baseline_symbols = build_symbol_name_set(&baseline.symbols);
        let current_symbols = build_symbol_name_set(&current.symbols);

        let mut findings = Vec::new();
        let mut reported: HashSet<(&'static str, String, String, String, String)> =
            HashSet::new();

        for relation in &current.relations {
            if !is_symbol_reference_relation(relation) {
                continue;
            }
            let language = relation.language;
            for (role, symbol_name) in
                [("source", &relation.source), ("target", &relation.target)]
            {
                let key = (language, symbol_name.clone());
                if current_symbols.contains(&key) || !baseline_symbols.contains(&key) {
                    continue;
                }
                let dedup_key = (
                    role,
                    relation.kind.as_wire().to_string(),
                    relation.source.clone(),
                    relation.target.clone(),
                    symbol_name.clone(),
                );
                if !reported.insert(dedup_key) {
                    continue;
                }
                let mut metadata = BTreeMap::new();
                metadata.insert("relation".to_string(), relation_meta(relation));
                metadata.insert(
                    "missing_symbol".to_string(),
                    MetaValue::Str(symbol_name.clone()),
                );
                metadata.insert("role".to_string(), MetaValue::Str(role.to_string()));
                findings.push(DriftFinding {
                    drift_type: "SYMBOL_REFERENCE_MISSING".to_string(),
                    description: format!(
                        "Relation {} references {role} symbol {symbol_name} which is not defined in current symbols.",
                        relation.kind.as_wire()
                    ),
                    severity: DriftSeverity::High,
                    metadata,
                });
            }
        }
        findings
    }
}
