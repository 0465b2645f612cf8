use codemodel_core::{
    qual, AnalysisArtifacts, ApiEndpoint, Dependency, DependencyAnalyzer, DependencyKind,
    Language, MetaValue, Relation, RelationKind,
};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// `API_DEPENDS_ON` edges: endpoint → handler, then endpoint → everything
/// the handler statically calls or imports.
///
/// Handler candidates are matched by dotted-name suffix against the symbol
/// table, which is best-effort syntactic: identical final segments in
/// different packages can collide. Precise resolution belongs to a
/// cross-file type resolver this pipeline deliberately does not have.
#[derive(Debug, Default)]
pub struct ApiDependencyAnalyzer;

type Signature = (String, String, Language, &'static str);

impl ApiDependencyAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn api_identifier(endpoint: &ApiEndpoint) -> String {
        format!("{}:{}", endpoint.framework, endpoint.path)
    }

    fn handler_candidates(
        endpoint: &ApiEndpoint,
        artifacts: &AnalysisArtifacts,
    ) -> BTreeSet<String> {
        let mut candidates = BTreeSet::new();
        let handler = &endpoint.handler_name;

        if !handler.is_empty() {
            candidates.insert(handler.clone());
            if let Some(class_name) = &endpoint.class_name {
                candidates.insert(format!("{class_name}.{handler}"));
            }
            let suffix = qual::last_segment(handler);
            for symbol in &artifacts.symbols {
                if symbol.name.ends_with(suffix) {
                    candidates.insert(symbol.name.clone());
                }
            }
        }
        if let Some(class_name) = &endpoint.class_name {
            for symbol in &artifacts.symbols {
                if symbol.name.ends_with(class_name.as_str()) {
                    candidates.insert(symbol.name.clone());
                }
            }
        }

        candidates
    }

    fn relation_dependencies(
        api_identifier: &str,
        endpoint: &ApiEndpoint,
        candidates: &BTreeSet<String>,
        relations: &[&Relation],
        role: &'static str,
        seen: &mut HashSet<Signature>,
    ) -> Vec<Dependency> {
        let mut dependencies = Vec::new();
        for relation in relations {
            if !candidates.contains(&relation.source) || relation.target.is_empty() {
                continue;
            }
            let signature = (
                api_identifier.to_string(),
                relation.target.clone(),
                endpoint.language,
                role,
            );
            if !seen.insert(signature) {
                continue;
            }
            let mut metadata = BTreeMap::new();
            metadata.insert(
                "via_handler".to_string(),
                MetaValue::Str(relation.source.clone()),
            );
            metadata.insert(
                "relation_type".to_string(),
                MetaValue::Str(relation.kind.as_wire().to_string()),
            );
            metadata.insert(
                "relation_file_path".to_string(),
                MetaValue::Str(relation.file_path.clone()),
            );
            dependencies.push(Dependency {
                source: api_identifier.to_string(),
                target: relation.target.clone(),
                kind: DependencyKind::ApiDependsOn,
                language: endpoint.language,
                metadata,
            });
        }
        dependencies
    }
}

impl DependencyAnalyzer for ApiDependencyAnalyzer {
    fn analyze(&self, artifacts: &AnalysisArtifacts) -> Vec<Dependency> {
        let mut dependencies = Vec::new();
        let mut seen: HashSet<Signature> = HashSet::new();

        let call_relations: Vec<&Relation> = artifacts
            .relations
            .iter()
            .filter(|r| r.kind == RelationKind::Calls)
            .collect();
        let import_relations: Vec<&Relation> = artifacts
            .relations
            .iter()
            .filter(|r| r.kind == RelationKind::Imports)
            .collect();

        for endpoint in &artifacts.endpoints {
            let api_identifier = Self::api_identifier(endpoint);
            let handler_name = if endpoint.handler_name.is_empty() {
                "<anonymous>".to_string()
            } else {
                endpoint.handler_name.clone()
            };

            let handler_signature = (
                api_identifier.clone(),
                handler_name.clone(),
                endpoint.language,
                "handler",
            );
            if seen.insert(handler_signature) {
                let mut metadata = BTreeMap::new();
                metadata.insert(
                    "file_path".to_string(),
                    MetaValue::Str(endpoint.file_path.clone()),
                );
                metadata.insert(
                    "http_method".to_string(),
                    MetaValue::Str(endpoint.http_method.clone()),
                );
                metadata.insert(
                    "framework".to_string(),
                    MetaValue::Str(endpoint.framework.to_string()),
                );
                if let Some(class_name) = &endpoint.class_name {
                    metadata.insert(
                        "class_name".to_string(),
                        MetaValue::Str(class_name.clone()),
                    );
                }
                if !endpoint.metadata.is_empty() {
                    metadata.insert(
                        "endpoint_metadata".to_string(),
                        MetaValue::Map(endpoint.metadata.clone()),
                    );
                }
                dependencies.push(Dependency {
                    source: api_identifier.clone(),
                    target: handler_name,
                    kind: DependencyKind::ApiDependsOn,
                    language: endpoint.language,
                    metadata,
                });
            }

            let candidates = Self::handler_candidates(endpoint, artifacts);

            dependencies.extend(Self::relation_dependencies(
                &api_identifier,
                endpoint,
                &candidates,
                &call_relations,
                "CALLS",
                &mut seen,
            ));
            dependencies.extend(Self::relation_dependencies(
                &api_identifier,
                endpoint,
                &candidates,
                &import_relations,
                "IMPORTS",
                &mut seen,
            ));
        }

        dependencies
    }
}
