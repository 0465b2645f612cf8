use super::{is_callable_node, is_type_node, package_name, qualify};
use codemodel_core::{Artifact, AstAnalyzer, AstNode, Language, Symbol, SymbolKind};

/// Emits class symbols for type declarations and method symbols for
/// methods and constructors, qualified by package and enclosing types.
///
/// The package is discovered mid-tree (a `PackageDeclaration` sibling
/// precedes the type declarations), so the walk reduces over children and
/// adopts a package reported by an earlier sibling.
#[derive(Debug, Default)]
pub struct JavaSymbolAnalyzer;

impl JavaSymbolAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn walk(
        &self,
        node: &AstNode,
        file_path: &str,
        context: &[String],
        package: Option<String>,
        acc: &mut Vec<Artifact>,
    ) -> Option<String> {
        let mut current_package = package;
        let mut next_context = context.to_vec();

        if let Some(extracted) = package_name(node) {
            current_package = Some(extracted);
        }

        if is_type_node(&node.node_type) {
            if let Some(name) = &node.name {
                let qualified = qualify(current_package.as_deref(), context, Some(name));
                let parent = {
                    let scoped = qualify(current_package.as_deref(), context, None);
                    if scoped.is_empty() {
                        current_package.clone().unwrap_or_default()
                    } else {
                        scoped
                    }
                };
                acc.push(
                    Symbol::new(qualified, SymbolKind::Class, Language::Java, file_path)
                        .with_parent(parent)
                        .into(),
                );
                next_context.push(name.clone());
            }
        } else if is_callable_node(&node.node_type) {
            if let Some(name) = &node.name {
                let qualified = qualify(current_package.as_deref(), context, Some(name));
                let parent = qualify(current_package.as_deref(), context, None);
                acc.push(
                    Symbol::new(qualified, SymbolKind::Method, Language::Java, file_path)
                        .with_parent(parent)
                        .into(),
                );
            }
        }

        for child in &node.children {
            let child_package =
                self.walk(child, file_path, &next_context, current_package.clone(), acc);
            if child_package.is_some() && child_package != current_package {
                current_package = child_package;
            }
        }

        current_package
    }
}

impl AstAnalyzer for JavaSymbolAnalyzer {
    fn analyze(&self, ast: &AstNode, file_path: &str) -> Vec<Artifact> {
        let mut acc = Vec::new();
        self.walk(ast, file_path, &[], None, &mut acc);
        acc
    }
}
