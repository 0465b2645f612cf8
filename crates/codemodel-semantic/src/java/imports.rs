use super::package_name;
use codemodel_core::{Artifact, AstAnalyzer, AstNode, Language, NodeType, Relation, RelationKind};

/// Emits `IMPORTS` for each import declaration and a single `DEFINES`
/// from the file to its declared package.
#[derive(Debug, Default)]
pub struct JavaImportAnalyzer;

impl JavaImportAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn walk(
        &self,
        node: &AstNode,
        file_path: &str,
        package: Option<String>,
        acc: &mut Vec<Artifact>,
    ) -> Option<String> {
        let mut current_package = package;

        if let Some(name) = package_name(node) {
            if current_package.as_deref() != Some(name.as_str()) {
                current_package = Some(name.clone());
                acc.push(
                    Relation::new(
                        file_path,
                        name,
                        RelationKind::Defines,
                        Language::Java,
                        file_path,
                    )
                    .into(),
                );
            }
        }

        if node.node_type == NodeType::ImportDeclaration {
            if let Some(target) = node.identifier() {
                acc.push(
                    Relation::new(
                        file_path,
                        target,
                        RelationKind::Imports,
                        Language::Java,
                        file_path,
                    )
                    .into(),
                );
            }
        }

        for child in &node.children {
            let child_package = self.walk(child, file_path, current_package.clone(), acc);
            if child_package.is_some() && child_package != current_package {
                current_package = child_package;
            }
        }

        current_package
    }
}

impl AstAnalyzer for JavaImportAnalyzer {
    fn analyze(&self, ast: &AstNode, file_path: &str) -> Vec<Artifact> {
        let mut acc = Vec::new();
        self.walk(ast, file_path, None, &mut acc);
        acc
    }
}
