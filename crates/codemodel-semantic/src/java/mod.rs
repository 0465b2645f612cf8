pub mod calls;
pub mod imports;
pub mod symbols;

pub use calls::JavaCallAnalyzer;
pub use imports::JavaImportAnalyzer;
pub use symbols::JavaSymbolAnalyzer;

use codemodel_core::{AstNode, NodeDetail, NodeType};

pub(crate) fn is_type_node(node_type: &NodeType) -> bool {
    matches!(
        node_type,
        NodeType::ClassDeclaration
            | NodeType::InterfaceDeclaration
            | NodeType::EnumDeclaration
            | NodeType::AnnotationDeclaration
    )
}

pub(crate) fn is_callable_node(node_type: &NodeType) -> bool {
    matches!(
        node_type,
        NodeType::MethodDeclaration | NodeType::ConstructorDeclaration
    )
}

pub(crate) fn package_name(node: &AstNode) -> Option<String> {
    if node.node_type != NodeType::PackageDeclaration {
        return None;
    }
    match &node.detail {
        NodeDetail::Package { name } if !name.is_empty() => Some(name.clone()),
        _ => node.identifier(),
    }
}

/// Qualified name of `name` under `package` and the enclosing type names.
pub(crate) fn qualify(package: Option<&str>, context: &[String], name: Option<&str>) -> String {
    codemodel_core::qual::join(
        package
            .into_iter()
            .chain(context.iter().map(String::as_str))
            .chain(name),
    )
}
