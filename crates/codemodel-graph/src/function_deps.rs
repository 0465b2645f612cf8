use codemodel_core::{
    AnalysisArtifacts, Dependency, DependencyAnalyzer, DependencyKind, MetaValue, RelationKind,
};
use std::collections::BTreeMap;
use std::collections::HashSet;

/// One `FUNCTION_CALLS` edge per distinct `(source, target, language)`
/// call relation with both endpoints present.
#[derive(Debug, Default)]
pub struct FunctionDependencyAnalyzer;

impl FunctionDependencyAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl DependencyAnalyzer for FunctionDependencyAnalyzer {
    fn analyze(&self, artifacts: &AnalysisArtifacts) -> Vec<Dependency> {
        let mut dependencies = Vec::new();
        let mut seen = HashSet::new();

        for relation in &artifacts.relations {
            if relation.kind != RelationKind::Calls {
                continue;
            }
            if relation.source.is_empty() || relation.target.is_empty() {
                continue;
            }
            let signature = (
                relation.source.clone(),
                relation.target.clone(),
                relation.language,
            );
            if !seen.insert(signature) {
                continue;
            }
            let mut metadata = BTreeMap::new();
            metadata.insert(
                "file_path".to_string(),
                MetaValue::Str(relation.file_path.clone()),
            );
            dependencies.push(Dependency {
                source: relation.source.clone(),
                target: relation.target.clone(),
                kind: DependencyKind::FunctionCalls,
                language: relation.language,
                metadata,
            });
        }

        dependencies
    }
}
