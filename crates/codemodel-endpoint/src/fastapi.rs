use crate::EndpointDetector;
use codemodel_core::{
    Annotation, ApiEndpoint, Artifact, AstAnalyzer, AstNode, Framework, Language, MetaValue,
    NodeType,
};
use std::collections::BTreeMap;

/// FastAPI detection: decorators named after an HTTP verb on an app or
/// router object (`@app.get`, `@router.patch`, …).
#[derive(Debug, Default)]
pub struct FastApiDetector;

const HTTP_DECORATORS: &[(&str, &str)] = &[
    ("get", "GET"),
    ("post", "POST"),
    ("put", "PUT"),
    ("delete", "DELETE"),
    ("patch", "PATCH"),
    ("options", "OPTIONS"),
    ("head", "HEAD"),
];

impl FastApiDetector {
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
            for decorator in &node.decorations {
                let Some(http_method) = http_method_of(decorator) else {
                    continue;
                };
                let paths = extract_paths(decorator);
                let paths = if paths.is_empty() {
                    vec!["/".to_string()]
                } else {
                    paths
                };
                let handler_name =
                    node.name.clone().unwrap_or_else(|| "<anonymous>".to_string());
                for path in paths {
                    let mut metadata = BTreeMap::new();
                    metadata.insert("decorator".to_string(), decorator.to_meta());
                    acc.push(ApiEndpoint {
                        path,
                        http_method: http_method.to_string(),
                        handler_name: handler_name.clone(),
                        class_name: class_name.clone(),
                        language: Language::Python,
                        file_path: file_path.to_string(),
                        framework: Framework::FastApi,
                        metadata,
                    });
                }
            }
        }

        for child in &node.children {
            self.walk(child, file_path, &next_stack, acc);
        }
    }
}

impl EndpointDetector for FastApiDetector {
    fn detect(&self, ast: &AstNode, file_path: &str) -> Vec<ApiEndpoint> {
        let mut acc = Vec::new();
        self.walk(ast, file_path, &[], &mut acc);
        acc
    }
}

impl AstAnalyzer for FastApiDetector {
    fn analyze(&self, ast: &AstNode, file_path: &str) -> Vec<Artifact> {
        self.detect(ast, file_path).into_iter().map(Into::into).collect()
    }
}

fn http_method_of(decorator: &Annotation) -> Option<&'static str> {
    HTTP_DECORATORS.iter().find_map(|(suffix, method)| {
        let matches = decorator.name == *suffix
            || decorator.name.ends_with(&format!(".{suffix}"));
        matches.then_some(*method)
    })
}

fn extract_paths(decorator: &Annotation) -> Vec<String> {
    let mut paths: Vec<String> = decorator
        .args
        .iter()
        .filter_map(|arg| arg.as_str().map(str::to_string))
        .collect();
    for key in ["path", "url", "route", "rule"] {
        if let Some(MetaValue::Str(value)) = decorator.keyword(key) {
            paths.push(value.clone());
        }
    }
    paths
}
