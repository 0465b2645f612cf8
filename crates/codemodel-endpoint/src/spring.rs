use crate::EndpointDetector;
use codemodel_core::{
    Annotation, ApiEndpoint, Artifact, AstAnalyzer, AstNode, Framework, Language, MetaValue,
    NodeType,
};
use std::collections::BTreeMap;

/// Spring MVC detection: classes annotated `@RestController`/`@Controller`,
/// their class-level `@RequestMapping` path, and one endpoint per mapping
/// annotation on each method, with class and method paths joined.
#[derive(Debug, Default)]
pub struct SpringApiDetector;

const CLASS_ANNOTATIONS: &[&str] = &["RestController", "Controller"];

const MAPPING_ANNOTATIONS: &[(&str, Option<&str>)] = &[
    ("GetMapping", Some("GET")),
    ("PostMapping", Some("POST")),
    ("PutMapping", Some("PUT")),
    ("DeleteMapping", Some("DELETE")),
    ("PatchMapping", Some("PATCH")),
    ("RequestMapping", None),
];

impl SpringApiDetector {
    pub fn new() -> Self {
        Self
    }

    fn walk(
        &self,
        node: &AstNode,
        file_path: &str,
        current_class: Option<&str>,
        class_path: Option<&str>,
        acc: &mut Vec<ApiEndpoint>,
    ) {
        let mut next_class = current_class.map(str::to_string);
        let mut next_class_path = class_path.map(str::to_string);

        if node.node_type == NodeType::ClassDeclaration {
            if let Some(name) = &node.name {
                if has_controller_annotation(&node.decorations) {
                    next_class = Some(name.clone());
                    next_class_path = class_level_path(&node.decorations);
                }
            }
        }

        if node.node_type == NodeType::MethodDeclaration {
            if let (Some(name), Some(handler_class)) = (&node.name, current_class) {
                self.extract_method_endpoints(
                    node,
                    name,
                    file_path,
                    handler_class,
                    class_path,
                    acc,
                );
            }
        }

        for child in &node.children {
            self.walk(
                child,
                file_path,
                next_class.as_deref(),
                next_class_path.as_deref(),
                acc,
            );
        }
    }

    fn extract_method_endpoints(
        &self,
        node: &AstNode,
        method_name: &str,
        file_path: &str,
        handler_class: &str,
        class_path: Option<&str>,
        acc: &mut Vec<ApiEndpoint>,
    ) {
        for annotation in &node.decorations {
            let Some(mapped) = MAPPING_ANNOTATIONS
                .iter()
                .find(|(name, _)| *name == annotation.short_name())
            else {
                continue;
            };
            let http_method = mapped
                .1
                .map(str::to_string)
                .or_else(|| request_mapping_method(annotation))
                .unwrap_or_else(|| "GET".to_string());

            let mut paths = extract_paths(annotation);
            if let Some(class_path) = class_path {
                paths = paths
                    .iter()
                    .map(|path| join_paths(class_path, path))
                    .collect();
            }

            for path in paths {
                let mut metadata = BTreeMap::new();
                metadata.insert("annotation".to_string(), annotation.to_meta());
                acc.push(ApiEndpoint {
                    path,
                    http_method: http_method.clone(),
                    handler_name: method_name.to_string(),
                    class_name: Some(handler_class.to_string()),
                    language: Language::Java,
                    file_path: file_path.to_string(),
                    framework: Framework::Spring,
                    metadata,
                });
            }
        }
    }
}

impl EndpointDetector for SpringApiDetector {
    fn detect(&self, ast: &AstNode, file_path: &str) -> Vec<ApiEndpoint> {
        let mut acc = Vec::new();
        self.walk(ast, file_path, None, None, &mut acc);
        acc
    }
}

impl AstAnalyzer for SpringApiDetector {
    fn analyze(&self, ast: &AstNode, file_path: &str) -> Vec<Artifact> {
        self.detect(ast, file_path).into_iter().map(Into::into).collect()
    }
}

fn has_controller_annotation(annotations: &[Annotation]) -> bool {
    annotations
        .iter()
        .any(|annotation| CLASS_ANNOTATIONS.contains(&annotation.short_name()))
}

fn class_level_path(annotations: &[Annotation]) -> Option<String> {
    annotations.iter().find_map(|annotation| {
        let is_mapping = MAPPING_ANNOTATIONS
            .iter()
            .any(|(name, _)| *name == annotation.short_name());
        if !is_mapping {
            return None;
        }
        extract_declared_paths(annotation).into_iter().next()
    })
}

/// Paths declared on the annotation, or `/` when none resolve.
fn extract_paths(annotation: &Annotation) -> Vec<String> {
    let paths = extract_declared_paths(annotation);
    if paths.is_empty() {
        vec!["/".to_string()]
    } else {
        paths
    }
}

fn extract_declared_paths(annotation: &Annotation) -> Vec<String> {
    let mut paths: Vec<String> = annotation
        .args
        .iter()
        .filter_map(|arg| arg.as_str().map(str::to_string))
        .collect();
    for key in ["value", "path"] {
        if let Some(value) = annotation.keyword(key) {
            paths.extend(value.string_items());
        }
    }
    paths
}

fn request_mapping_method(annotation: &Annotation) -> Option<String> {
    match annotation.keyword("method")? {
        MetaValue::Str(method) => Some(method.to_uppercase()),
        MetaValue::List(items) => items
            .iter()
            .find_map(|item| item.as_str())
            .map(str::to_uppercase),
        _ => None,
    }
}

/// Join class and method paths with exactly one slash between them.
fn join_paths(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let parent = if parent.is_empty() { "/" } else { parent };
    let child = child.trim_start_matches('/');
    if child.is_empty() {
        return parent.to_string();
    }
    if parent == "/" {
        format!("/{child}")
    } else {
        format!("{parent}/{child}")
    }
}
