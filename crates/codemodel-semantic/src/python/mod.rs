pub mod calls;
pub mod imports;
pub mod symbols;

pub use calls::PythonCallAnalyzer;
pub use imports::PythonImportAnalyzer;
pub use symbols::PythonSymbolAnalyzer;

use codemodel_core::NodeType;

pub(crate) fn is_class_node(node_type: &NodeType) -> bool {
    matches!(node_type, NodeType::PyClassDef)
}

pub(crate) fn is_function_node(node_type: &NodeType) -> bool {
    matches!(
        node_type,
        NodeType::PyFunctionDef | NodeType::PyAsyncFunctionDef
    )
}

pub(crate) fn is_scope_node(node_type: &NodeType) -> bool {
    is_class_node(node_type) || is_function_node(node_type)
}

/// One enclosing scope: its name (anonymous scopes keep a `None` slot so
/// depth is preserved) and whether it is a class.
#[derive(Debug, Clone)]
pub(crate) struct ScopeEntry {
    pub name: Option<String>,
    pub is_class: bool,
}

pub(crate) fn scope_names(context: &[ScopeEntry]) -> Vec<String> {
    context
        .iter()
        .filter_map(|entry| entry.name.clone())
        .collect()
}
