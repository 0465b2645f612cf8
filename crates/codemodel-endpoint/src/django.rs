use crate::EndpointDetector;
use codemodel_core::{
    qual, ApiEndpoint, Artifact, AstAnalyzer, AstNode, Framework, Language, MetaValue, NodeDetail,
    NodeType,
};
use std::collections::BTreeMap;

/// Django URL configuration detection: crawls every assignment to the
/// `urlpatterns` identifier (`=`, `+=`, annotated, or a direct single-call
/// assignment) and turns each `path`/`re_path`/`url` call inside the
/// assigned sequence into an endpoint.
///
/// Django routes do not name a method, so `http_method` is the sentinel
/// `ANY`; consumers that need a concrete set must expand it themselves.
#[derive(Debug, Default)]
pub struct DjangoApiDetector;

const SUPPORTED_CALLS: &[&str] = &["path", "re_path", "url"];

impl DjangoApiDetector {
    pub fn new() -> Self {
        Self
    }

    fn collect_urlpattern_calls<'a>(&self, root: &'a AstNode) -> Vec<&'a AstNode> {
        let mut calls = Vec::new();
        root.visit(&mut |node| {
            calls.extend(self.calls_from_assignment(node));
        });
        calls
    }

    fn calls_from_assignment<'a>(&self, node: &'a AstNode) -> Vec<&'a AstNode> {
        if !matches!(
            node.node_type,
            NodeType::PyAssign | NodeType::PyAnnAssign | NodeType::PyAugAssign
        ) {
            return Vec::new();
        }
        if !targets_urlpatterns(node) {
            return Vec::new();
        }

        let mut sequences: Vec<&AstNode> = node
            .children
            .iter()
            .filter(|child| matches!(child.node_type, NodeType::PyList | NodeType::PyTuple))
            .collect();

        // Direct single-call assignment: urlpatterns = path(...)
        if node.node_type == NodeType::PyAssign && sequences.is_empty() {
            return node
                .children
                .iter()
                .filter(|child| child.node_type == NodeType::PyCall)
                .collect();
        }

        let mut calls = Vec::new();
        while let Some(seq) = sequences.pop() {
            for child in &seq.children {
                match child.node_type {
                    NodeType::PyCall => calls.push(child),
                    NodeType::PyList | NodeType::PyTuple => sequences.push(child),
                    _ => {}
                }
            }
        }
        calls
    }

    fn call_to_endpoint(&self, call: &AstNode, file_path: &str) -> Option<ApiEndpoint> {
        let NodeDetail::Call {
            callee: Some(func_name),
        } = &call.detail
        else {
            return None;
        };
        if !SUPPORTED_CALLS.contains(&qual::last_segment(func_name)) {
            return None;
        }

        let (args, keywords) = split_call_arguments(call);
        let first = args.first()?;
        let MetaValue::Str(mut path_value) = literal_value(first)? else {
            return None;
        };
        if !path_value.starts_with('/') && !path_value.starts_with('^') {
            path_value.insert(0, '/');
        }

        let handler_name = args
            .get(1)
            .and_then(|view| literal_value(view))
            .and_then(|value| value.as_str().map(str::to_string));
        let class_name = handler_name.as_deref().and_then(|handler| {
            handler
                .strip_suffix(".as_view")
                .map(str::to_string)
                .filter(|prefix| !prefix.is_empty())
        });

        let route_name = keyword_value(&keywords, "name");

        let mut metadata = BTreeMap::new();
        metadata.insert("resolver".to_string(), MetaValue::Str(func_name.clone()));
        metadata.insert(
            "route_name".to_string(),
            route_name.unwrap_or(MetaValue::Null),
        );
        if let Some(view) = &handler_name {
            metadata.insert("view".to_string(), MetaValue::Str(view.clone()));
        }

        Some(ApiEndpoint {
            path: path_value,
            http_method: "ANY".to_string(),
            handler_name: handler_name.unwrap_or_else(|| "<anonymous>".to_string()),
            class_name,
            language: Language::Python,
            file_path: file_path.to_string(),
            framework: Framework::Django,
            metadata,
        })
    }
}

impl EndpointDetector for DjangoApiDetector {
    fn detect(&self, ast: &AstNode, file_path: &str) -> Vec<ApiEndpoint> {
        self.collect_urlpattern_calls(ast)
            .into_iter()
            .filter_map(|call| self.call_to_endpoint(call, file_path))
            .collect()
    }
}

impl AstAnalyzer for DjangoApiDetector {
    fn analyze(&self, ast: &AstNode, file_path: &str) -> Vec<Artifact> {
        self.detect(ast, file_path).into_iter().map(Into::into).collect()
    }
}

fn targets_urlpatterns(node: &AstNode) -> bool {
    node.children.iter().any(|child| {
        matches!(
            &child.detail,
            NodeDetail::NameRef { id, .. } if id == "urlpatterns"
        )
    })
}

/// A call's children lead with the callee expression; positional arguments
/// and keywords follow.
fn split_call_arguments(call: &AstNode) -> (Vec<&AstNode>, Vec<&AstNode>) {
    let mut args = Vec::new();
    let mut keywords = Vec::new();
    for child in call.children.iter().skip(1) {
        if child.node_type == NodeType::PyKeyword {
            keywords.push(child);
        } else {
            args.push(child);
        }
    }
    (args, keywords)
}

fn keyword_value(keywords: &[&AstNode], name: &str) -> Option<MetaValue> {
    keywords.iter().find_map(|keyword| {
        let NodeDetail::Keyword { arg: Some(arg) } = &keyword.detail else {
            return None;
        };
        if arg != name {
            return None;
        }
        keyword.children.first().and_then(literal_value)
    })
}

fn literal_value(node: &AstNode) -> Option<MetaValue> {
    match (&node.node_type, &node.detail) {
        (_, NodeDetail::Constant { value }) => Some(value.clone()),
        (NodeType::PyList | NodeType::PyTuple, _) => Some(MetaValue::List(
            node.children.iter().filter_map(literal_value).collect(),
        )),
        (_, NodeDetail::NameRef { id, .. }) => Some(MetaValue::Str(id.clone())),
        (_, NodeDetail::AttributeRef { attr, dotted }) => Some(MetaValue::Str(
            dotted.clone().unwrap_or_else(|| attr.clone()),
        )),
        (_, NodeDetail::Call { callee }) => callee.clone().map(MetaValue::Str),
        _ => None,
    }
}
