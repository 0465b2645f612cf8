use super::{is_callable_node, is_type_node, package_name, qualify};
use codemodel_core::{Artifact, AstAnalyzer, AstNode, Language, NodeType, Relation, RelationKind};

/// Emits `CALLS` for each method invocation with a derivable callee.
///
/// Callees that are neither dotted nor already package-qualified are
/// prefixed with the current package, matching how unqualified invocations
/// resolve within a compilation unit.
#[derive(Debug, Default)]
pub struct JavaCallAnalyzer;

impl JavaCallAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn walk(
        &self,
        node: &AstNode,
        file_path: &str,
        context: &[String],
        package: Option<String>,
        current_callable: Option<&str>,
        acc: &mut Vec<Artifact>,
    ) -> Option<String> {
        let mut current_package = package;
        let mut next_context = context.to_vec();
        let mut next_callable = current_callable.map(str::to_string);

        if let Some(extracted) = package_name(node) {
            current_package = Some(extracted);
        }

        if is_type_node(&node.node_type) {
            if let Some(name) = &node.name {
                next_context.push(name.clone());
            }
        }

        if is_callable_node(&node.node_type) {
            if let Some(name) = &node.name {
                next_callable = Some(qualify(current_package.as_deref(), context, Some(name)));
            }
        }

        if node.node_type == NodeType::MethodInvocation {
            let caller = next_callable.clone().unwrap_or_else(|| {
                let scoped = qualify(current_package.as_deref(), context, None);
                if scoped.is_empty() {
                    file_path.to_string()
                } else {
                    scoped
                }
            });
            if let Some(callee) = node.identifier() {
                let target = qualify_call_target(current_package.as_deref(), &callee);
                acc.push(
                    Relation::new(caller, target, RelationKind::Calls, Language::Java, file_path)
                        .into(),
                );
            }
        }

        for child in &node.children {
            let child_package = self.walk(
                child,
                file_path,
                &next_context,
                current_package.clone(),
                next_callable.as_deref(),
                acc,
            );
            if child_package.is_some() && child_package != current_package {
                current_package = child_package;
            }
        }

        current_package
    }
}

impl AstAnalyzer for JavaCallAnalyzer {
    fn analyze(&self, ast: &AstNode, file_path: &str) -> Vec<Artifact> {
        let mut acc = Vec::new();
        self.walk(ast, file_path, &[], None, None, &mut acc);
        acc
    }
}

fn qualify_call_target(package: Option<&str>, callee: &str) -> String {
    let Some(package) = package else {
        return callee.to_string();
    };
    if callee.starts_with(&format!("{package}.")) || callee.contains('.') {
        return callee.to_string();
    }
    format!("{package}.{callee}")
}

#[cfg(test)]
mod tests {
    use super::qualify_call_target;

    #[test]
    fn unqualified_callee_gains_package_prefix() {
        assert_eq!(
            qualify_call_target(Some("com.example"), "init"),
            "com.example.init"
        );
    }

    #[test]
    fn dotted_or_qualified_callees_are_untouched() {
        assert_eq!(
            qualify_call_target(Some("com.example"), "repository.save"),
            "repository.save"
        );
        assert_eq!(
            qualify_call_target(Some("com.example"), "com.example.init"),
            "com.example.init"
        );
        assert_eq!(qualify_call_target(None, "init"), "init");
    }
}
