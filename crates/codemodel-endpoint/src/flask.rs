use crate::EndpointDetector;
use codemodel_core::{
    Annotation, ApiEndpoint, Artifact, AstAnalyzer, AstNode, Framework, Language, MetaValue,
    NodeType,
};
use std::collections::BTreeMap;

/// Flask route detection: any function decorator whose dotted name ends in
/// `.route` (or is exactly `route`), on `app`, a blueprint, or anything
/// else. Methods come from the `methods` keyword, defaulting to GET.
#[derive(Debug, Default)]
pub struct FlaskApiDetector;

const ROUTE_DECORATOR: &str = "route";

impl FlaskApiDetector {
    pub fn new() -> Self {
        Self
    }

    fn walk(
        &self,
        node: &AstNode,
        file_path: &str,
        class_stack: &[String],
        acc: &mut Vec<ApiEndpoint>,
    ) {
        let mut next_stack = class_stack.to_vec();
        if node.node_type == NodeType::PyClassDef {
            if let Some(name) = &node.name {
                next_stack.push(name.clone());
            }
        }

        if matches!(
            node.node_type,
            NodeType::PyFunctionDef | NodeType::PyAsyncFunctionDef
        ) {
            let class_name = (!next_stack.is_empty()).then(|| next_stack.join("."));
            self.extract_endpoints(node, file_path, class_name.as_deref(), acc);
        }

        for child in &node.children {
            self.walk(child, file_path, &next_stack, acc);
        }
    }

    fn extract_endpoints(
        &self,
        node: &AstNode,
        file_path: &str,
        class_name: Option<&str>,
        acc: &mut Vec<ApiEndpoint>,
    ) {
        for decorator in &node.decorations {
            if !is_route_decorator(decorator) {
                continue;
            }
            let paths = extract_paths(decorator);
            let methods = extract_methods(decorator);
            let methods = if methods.is_empty() {
                vec!["GET".to_string()]
            } else {
                methods
            };
            let handler_name = node.name.clone().unwrap_or_else(|| "<anonymous>".to_string());
            for path in &paths {
                for method in &methods {
                    let mut metadata = BTreeMap::new();
                    metadata.insert("decorator".to_string(), decorator.to_meta());
                    acc.push(ApiEndpoint {
                        path: path.clone(),
                        http_method: method.to_uppercase(),
                        handler_name: handler_name.clone(),
                        class_name: class_name.map(str::to_string),
                        language: Language::Python,
                        file_path: file_path.to_string(),
                        framework: Framework::Flask,
                        metadata,
                    });
                }
            }
        }
    }
}

impl EndpointDetector for FlaskApiDetector {
    fn detect(&self, ast: &AstNode, file_path: &str) -> Vec<ApiEndpoint> {
        let mut acc = Vec::new();
        self.walk(ast, file_path, &[], &mut acc);
        acc
    }
}

impl AstAnalyzer for FlaskApiDetector {
    fn analyze(&self, ast: &AstNode, file_path: &str) -> Vec<Artifact> {
        self.detect(ast, file_path).into_iter().map(Into::into).collect()
    }
}

fn is_route_decorator(decorator: &Annotation) -> bool {
    decorator.name == ROUTE_DECORATOR
        || decorator.name.ends_with(&format!(".{ROUTE_DECORATOR}"))
}

fn extract_paths(decorator: &Annotation) -> Vec<String> {
    let mut paths: Vec<String> = decorator
        .args
        .iter()
        .filter_map(|arg| arg.as_str().map(str::to_string))
        .collect();
    for key in ["rule", "path", "url"] {
        if let Some(MetaValue::Str(value)) = decorator.keyword(key) {
            paths.push(value.clone());
        }
    }
    if paths.is_empty() {
        paths.push("/".to_string());
    }
    paths
}

fn extract_methods(decorator: &Annotation) -> Vec<String> {
    match decorator.keyword("methods") {
        Some(MetaValue::Str(method)) => vec![method.clone()],
        Some(value) => value.string_items(),
        None => Vec::new(),
    }
}
