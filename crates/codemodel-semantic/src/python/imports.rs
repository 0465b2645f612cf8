use super::{is_scope_node, scope_names, ScopeEntry};
use codemodel_core::{
    qual, Artifact, AstAnalyzer, AstNode, Language, NodeDetail, Relation, RelationKind,
};
use std::collections::BTreeSet;

/// Emits one `Relation(IMPORTS)` per imported target, sourced from the
/// enclosing scope's qualified name or the file path at module level.
#[derive(Debug, Default)]
pub struct PythonImportAnalyzer;

impl PythonImportAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn walk(
        &self,
        node: &AstNode,
        file_path: &str,
        context: &[ScopeEntry],
        acc: &mut Vec<Artifact>,
    ) {
        if let Some(targets) = import_targets(node) {
            let source = scope_identifier(context, file_path);
            for target in targets {
                acc.push(
                    Relation::new(
                        source.clone(),
                        target,
                        RelationKind::Imports,
                        Language::Python,
                        file_path,
                    )
                    .into(),
                );
            }
        }

        let mut next_context = context.to_vec();
        if is_scope_node(&node.node_type) {
            if let Some(name) = &node.name {
                next_context.push(ScopeEntry {
                    name: Some(name.clone()),
                    is_class: false,
                });
            }
        }

        for child in &node.children {
            self.walk(child, file_path, &next_context, acc);
        }
    }
}

impl AstAnalyzer for PythonImportAnalyzer {
    fn analyze(&self, ast: &AstNode, file_path: &str) -> Vec<Artifact> {
        let mut acc = Vec::new();
        self.walk(ast, file_path, &[], &mut acc);
        acc
    }
}

/// Targets in deterministic (sorted) order: `import a.b` → `a.b`;
/// `from M import a, b` → `M.a`, `M.b`.
fn import_targets(node: &AstNode) -> Option<BTreeSet<String>> {
    match &node.detail {
        NodeDetail::Import { modules } => Some(modules.iter().cloned().collect()),
        NodeDetail::ImportFrom { module, names } => Some(
            names
                .iter()
                .map(|name| match module {
                    Some(prefix) if name != prefix => format!("{prefix}.{name}"),
                    _ => name.clone(),
                })
                .collect(),
        ),
        _ => None,
    }
}

fn scope_identifier(context: &[ScopeEntry], file_path: &str) -> String {
    let names = scope_names(context);
    let qualified = qual::qualify(&names, None);
    if qualified.is_empty() {
        file_path.to_string()
    } else {
        qualified
    }
}
