use codemodel_core::{
    AnalysisArtifacts, Dependency, DependencyAnalyzer, DependencyKind, MetaValue, RelationKind,
};
use std::collections::BTreeMap;
use std::collections::HashSet;

/// One `MODULE_DEPENDS_ON` edge per distinct `(source, target, language)`
/// import, sourcing from the file path when the relation has no scope.
#[derive(Debug, Default)]
pub struct ModuleDependencyAnalyzer;

impl ModuleDependencyAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl DependencyAnalyzer for ModuleDependencyAnalyzer {
    fn analyze(&self, artifacts: &AnalysisArtifacts) -> Vec<Dependency> {
        let mut dependencies = Vec::new();
        let mut seen = HashSet::new();

        for relation in &artifacts.relations {
            if relation.kind != RelationKind::Imports {
                continue;
            }
            let source = if relation.source.is_empty() {
                relation.file_path.clone()
            } else {
                relation.source.clone()
            };
            if source.is_empty() || relation.target.is_empty() {
                continue;
            }
            let signature = (source.clone(), relation.target.clone(), relation.language);
            if !seen.insert(signature) {
                continue;
            }
            let mut metadata = BTreeMap::new();
            metadata.insert(
                "file_path".to_string(),
                MetaValue::Str(relation.file_path.clone()),
            );
            dependencies.push(Dependency {
                source,
                target: relation.target.clone(),
                kind: DependencyKind::ModuleDependsOn,
                language: relation.language,
                metadata,
            });
        }

        dependencies
    }
}
