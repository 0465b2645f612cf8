use super::{is_function_node, is_scope_node, scope_names, ScopeEntry};
use codemodel_core::{
    qual, Artifact, AstAnalyzer, AstNode, Language, NodeDetail, NodeType, Relation, RelationKind,
};

/// Emits one `Relation(CALLS)` per call with a statically derivable
/// target. The caller is the nearest enclosing callable's qualified name,
/// falling back to the file path at module scope. Self-referential calls
/// are kept; filtering is a downstream concern.
#[derive(Debug, Default)]
pub struct PythonCallAnalyzer;

impl PythonCallAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn walk(
        &self,
        node: &AstNode,
        file_path: &str,
        context: &[ScopeEntry],
        current_callable: Option<&str>,
        acc: &mut Vec<Artifact>,
    ) {
        let mut next_context = context.to_vec();
        let mut next_callable = current_callable.map(str::to_string);

        if is_scope_node(&node.node_type) {
            if is_function_node(&node.node_type) {
                if let Some(name) = &node.name {
                    let names = scope_names(context);
                    next_callable = Some(qual::qualify(&names, Some(name)));
                }
            }
            next_context.push(ScopeEntry {
                name: node.name.clone(),
                is_class: matches!(node.node_type, NodeType::PyClassDef),
            });
        }

        if node.node_type == NodeType::PyCall {
            if let NodeDetail::Call {
                callee: Some(callee),
            } = &node.detail
            {
                let caller = next_callable
                    .clone()
                    .unwrap_or_else(|| file_path.to_string());
                acc.push(
                    Relation::new(
                        caller,
                        callee.clone(),
                        RelationKind::Calls,
                        Language::Python,
                        file_path,
                    )
                    .into(),
                );
            }
        }

        for child in &node.children {
            self.walk(child, file_path, &next_context, next_callable.as_deref(), acc);
        }
    }
}

impl AstAnalyzer for PythonCallAnalyzer {
    fn analyze(&self, ast: &AstNode, file_path: &str) -> Vec<Artifact> {
        let mut acc = Vec::new();
        self.walk(ast, file_path, &[], None, &mut acc);
        acc
    }
}
