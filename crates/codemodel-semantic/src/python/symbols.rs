use super::{is_class_node, is_function_node, scope_names, ScopeEntry};
use codemodel_core::{qual, Artifact, AstAnalyzer, AstNode, Language, Symbol, SymbolKind};

/// Emits one `Symbol` per class and callable definition, qualified by the
/// enclosing class/function scopes in pre-order.
#[derive(Debug, Default)]
pub struct PythonSymbolAnalyzer;

impl PythonSymbolAnalyzer {
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
        let mut next_context = context.to_vec();

        if is_class_node(&node.node_type) {
            if let Some(name) = &node.name {
                let names = scope_names(context);
                let qualified = qual::qualify(&names, Some(name));
                acc.push(
                    Symbol::new(qualified, SymbolKind::Class, Language::Python, file_path)
                        .with_parent(qual::qualify(&names, None))
                        .into(),
                );
                next_context.push(ScopeEntry {
                    name: Some(name.clone()),
                    is_class: true,
                });
            }
        } else if is_function_node(&node.node_type) {
            if let Some(name) = &node.name {
                let names = scope_names(context);
                let qualified = qual::qualify(&names, Some(name));
                let kind = if context.iter().any(|entry| entry.is_class) {
                    SymbolKind::Method
                } else {
                    SymbolKind::Function
                };
                acc.push(
                    Symbol::new(qualified, kind, Language::Python, file_path)
                        .with_parent(qual::qualify(&names, None))
                        .into(),
                );
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

impl AstAnalyzer for PythonSymbolAnalyzer {
    fn analyze(&self, ast: &AstNode, file_path: &str) -> Vec<Artifact> {
        let mut acc = Vec::new();
        self.walk(ast, file_path, &[], &mut acc);
        acc
    }
}
