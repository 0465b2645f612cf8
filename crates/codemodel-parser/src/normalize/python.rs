//! Lowers tree-sitter Python parse trees into the shared AST schema.
//!
//! Node types follow Python's own AST vocabulary (`ClassDef`, `Call`,
//! `ImportFrom`, …) because the downstream walking rules are stated in
//! those terms. Decorators are serialized onto the definition they
//! decorate and never appear as children, so call extraction cannot wander
//! into them; parameter lists are dropped for the same reason.

use codemodel_core::{Annotation, AstNode, Language, MetaValue, NameRole, NodeDetail, NodeType};
use std::collections::BTreeMap;
use tree_sitter::{Node, Tree};

pub struct PythonNormalizer<'a> {
    source: &'a str,
}

impl<'a> PythonNormalizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn normalize(&self, tree: &Tree) -> AstNode {
        let root = tree.root_node();
        let mut module = AstNode::new(NodeType::Module, Language::Python);
        for child in named_children(root) {
            if let Some(lowered) = self.lower(child, NameRole::Load) {
                module.push_child(lowered);
            }
        }
        module
    }

    fn lower(&self, node: Node, role: NameRole) -> Option<AstNode> {
        match node.kind() {
            "comment" => None,
            "decorated_definition" => self.lower_decorated(node),
            "class_definition" => Some(self.lower_class(node, Vec::new())),
            "function_definition" => Some(self.lower_function(node, Vec::new())),
            "import_statement" => Some(self.lower_import(node)),
            "import_from_statement" => Some(self.lower_import_from(node)),
            "expression_statement" => self.lower_expression_statement(node),
            "assignment" | "augmented_assignment" => Some(self.lower_assignment(node)),
            "call" => Some(self.lower_call(node)),
            "attribute" => Some(self.lower_attribute(node)),
            "identifier" => Some(self.lower_identifier(node, role)),
            "keyword_argument" => Some(self.lower_keyword(node)),
            "string" | "integer" | "float" | "true" | "false" | "none" => {
                Some(self.lower_literal(node))
            }
            "list" => Some(self.lower_container(node, NodeType::PyList, role)),
            "tuple" | "pattern_list" | "expression_list" => {
                Some(self.lower_container(node, NodeType::PyTuple, role))
            }
            "set" => Some(self.lower_container(node, NodeType::PySet, role)),
            "dictionary" => Some(self.lower_container(node, NodeType::PyDict, role)),
            "parenthesized_expression" => {
                let inner = named_children(node).next()?;
                self.lower(inner, role)
            }
            _ => Some(self.lower_opaque(node)),
        }
    }

    fn lower_decorated(&self, node: Node) -> Option<AstNode> {
        let mut decorations = Vec::new();
        for child in named_children(node) {
            if child.kind() == "decorator" {
                if let Some(annotation) = self.serialize_decorator(child) {
                    decorations.push(annotation);
                }
            }
        }
        let definition = node.child_by_field_name("definition")?;
        match definition.kind() {
            "class_definition" => Some(self.lower_class(definition, decorations)),
            "function_definition" => Some(self.lower_function(definition, decorations)),
            _ => self.lower(definition, NameRole::Load),
        }
    }

    fn lower_class(&self, node: Node, decorations: Vec<Annotation>) -> AstNode {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string());

        let mut bases = Vec::new();
        if let Some(superclasses) = node.child_by_field_name("superclasses") {
            for base in named_children(superclasses) {
                match base.kind() {
                    "identifier" | "attribute" => {
                        if let Some(dotted) = self.dotted(base) {
                            bases.push(dotted);
                        }
                    }
                    _ => {}
                }
            }
        }

        let mut out = AstNode::new(NodeType::PyClassDef, Language::Python)
            .with_detail(NodeDetail::ClassDef { bases })
            .with_decorations(decorations);
        out.name = name;
        out.children = self.lower_body(node);
        out
    }

    fn lower_function(&self, node: Node, decorations: Vec<Annotation>) -> AstNode {
        let is_async = node.child(0).is_some_and(|c| c.kind() == "async");
        let node_type = if is_async {
            NodeType::PyAsyncFunctionDef
        } else {
            NodeType::PyFunctionDef
        };
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string());

        let mut out = AstNode::new(node_type, Language::Python).with_decorations(decorations);
        out.name = name;
        out.children = self.lower_body(node);
        out
    }

    fn lower_body(&self, node: Node) -> Vec<AstNode> {
        let Some(body) = node.child_by_field_name("body") else {
            return Vec::new();
        };
        named_children(body)
            .filter_map(|child| self.lower(child, NameRole::Load))
            .collect()
    }

    fn lower_import(&self, node: Node) -> AstNode {
        let mut modules = Vec::new();
        let mut children = Vec::new();
        for child in named_children(node) {
            let module = match child.kind() {
                "dotted_name" => Some(self.text(child).to_string()),
                // `import a.b as ab` still targets a.b
                "aliased_import" => child
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string()),
                _ => None,
            };
            if let Some(module) = module {
                children.push(
                    AstNode::new(NodeType::PyAlias, Language::Python).with_name(module.clone()),
                );
                modules.push(module);
            }
        }
        AstNode::new(NodeType::PyImport, Language::Python)
            .with_detail(NodeDetail::Import { modules })
            .with_children(children)
    }

    fn lower_import_from(&self, node: Node) -> AstNode {
        let module = node.child_by_field_name("module_name").and_then(|m| {
            let text = self.text(m).trim_start_matches('.').to_string();
            (!text.is_empty()).then_some(text)
        });

        let mut names = Vec::new();
        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            let name = match child.kind() {
                "dotted_name" => Some(self.text(child).to_string()),
                "aliased_import" => child
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string()),
                _ => None,
            };
            if let Some(name) = name {
                names.push(name);
            }
        }
        if names.is_empty()
            && named_children(node).any(|child| child.kind() == "wildcard_import")
        {
            names.push("*".to_string());
        }

        let children = names
            .iter()
            .map(|name| AstNode::new(NodeType::PyAlias, Language::Python).with_name(name.clone()))
            .collect();
        AstNode::new(NodeType::PyImportFrom, Language::Python)
            .with_detail(NodeDetail::ImportFrom { module, names })
            .with_children(children)
    }

    fn lower_expression_statement(&self, node: Node) -> Option<AstNode> {
        let mut children: Vec<Node> = named_children(node).collect();
        if children.len() == 1 {
            let only = children.remove(0);
            if matches!(only.kind(), "assignment" | "augmented_assignment") {
                return Some(self.lower_assignment(only));
            }
            return self.lower(only, NameRole::Load);
        }
        Some(self.lower_opaque(node))
    }

    fn lower_assignment(&self, node: Node) -> AstNode {
        let node_type = match node.kind() {
            "augmented_assignment" => NodeType::PyAugAssign,
            _ if node.child_by_field_name("type").is_some() => NodeType::PyAnnAssign,
            _ => NodeType::PyAssign,
        };
        let mut children = Vec::new();
        if let Some(left) = node.child_by_field_name("left") {
            if let Some(lowered) = self.lower(left, NameRole::Store) {
                children.push(lowered);
            }
        }
        if let Some(right) = node.child_by_field_name("right") {
            if let Some(lowered) = self.lower(right, NameRole::Load) {
                children.push(lowered);
            }
        }
        AstNode::new(node_type, Language::Python).with_children(children)
    }

    fn lower_call(&self, node: Node) -> AstNode {
        let callee = node
            .child_by_field_name("function")
            .and_then(|f| self.dotted(f));
        // The callee expression leads the child list, as in Python's own
        // AST; consumers iterating positional arguments skip it.
        let mut children = Vec::new();
        if let Some(function) = node.child_by_field_name("function") {
            if let Some(lowered) = self.lower(function, NameRole::Load) {
                children.push(lowered);
            }
        }
        if let Some(arguments) = node.child_by_field_name("arguments") {
            for arg in named_children(arguments) {
                if let Some(lowered) = self.lower(arg, NameRole::Load) {
                    children.push(lowered);
                }
            }
        }
        AstNode::new(NodeType::PyCall, Language::Python)
            .with_detail(NodeDetail::Call { callee })
            .with_children(children)
    }

    fn lower_attribute(&self, node: Node) -> AstNode {
        let attr = node
            .child_by_field_name("attribute")
            .map(|a| self.text(a).to_string())
            .unwrap_or_default();
        let dotted = self.dotted(node);
        let mut children = Vec::new();
        if let Some(object) = node.child_by_field_name("object") {
            if let Some(lowered) = self.lower(object, NameRole::Load) {
                children.push(lowered);
            }
        }
        AstNode::new(NodeType::PyAttribute, Language::Python)
            .with_name(attr.clone())
            .with_detail(NodeDetail::AttributeRef { attr, dotted })
            .with_children(children)
    }

    fn lower_identifier(&self, node: Node, role: NameRole) -> AstNode {
        let id = self.text(node).to_string();
        AstNode::new(NodeType::PyName, Language::Python)
            .with_name(id.clone())
            .with_detail(NodeDetail::NameRef { id, role })
    }

    fn lower_keyword(&self, node: Node) -> AstNode {
        let arg = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string());
        let mut children = Vec::new();
        if let Some(value) = node.child_by_field_name("value") {
            if let Some(lowered) = self.lower(value, NameRole::Load) {
                children.push(lowered);
            }
        }
        let mut out = AstNode::new(NodeType::PyKeyword, Language::Python)
            .with_detail(NodeDetail::Keyword { arg: arg.clone() })
            .with_children(children);
        out.name = arg;
        out
    }

    fn lower_literal(&self, node: Node) -> AstNode {
        let value = self.literal_value(node).unwrap_or(MetaValue::Null);
        AstNode::new(NodeType::PyConstant, Language::Python)
            .with_detail(NodeDetail::Constant { value })
    }

    fn lower_container(&self, node: Node, node_type: NodeType, role: NameRole) -> AstNode {
        let children = named_children(node)
            .filter_map(|child| self.lower(child, role))
            .collect();
        AstNode::new(node_type, Language::Python).with_children(children)
    }

    fn lower_opaque(&self, node: Node) -> AstNode {
        let children = named_children(node)
            .filter_map(|child| self.lower(child, NameRole::Load))
            .collect();
        AstNode::opaque(node.kind(), Language::Python).with_children(children)
    }

    fn serialize_decorator(&self, decorator: Node) -> Option<Annotation> {
        let expr = named_children(decorator).next()?;
        match expr.kind() {
            "identifier" | "attribute" => Some(Annotation::named(self.dotted(expr)?)),
            "call" => {
                let name = self.dotted(expr.child_by_field_name("function")?)?;
                let mut annotation = Annotation::named(name);
                if let Some(arguments) = expr.child_by_field_name("arguments") {
                    for arg in named_children(arguments) {
                        if arg.kind() == "keyword_argument" {
                            let Some(key) = arg.child_by_field_name("name") else {
                                continue;
                            };
                            if let Some(value) =
                                arg.child_by_field_name("value").and_then(|v| self.literal_value(v))
                            {
                                annotation
                                    .keywords
                                    .insert(self.text(key).to_string(), value);
                            }
                        } else if let Some(value) = self.literal_value(arg) {
                            annotation.args.push(value);
                        }
                    }
                }
                Some(annotation)
            }
            _ => None,
        }
    }

    /// Literal value of an expression where statically resolvable.
    fn literal_value(&self, node: Node) -> Option<MetaValue> {
        match node.kind() {
            "string" => Some(MetaValue::Str(self.string_content(node))),
            "integer" => {
                let text = self.text(node);
                Some(
                    text.parse::<i64>()
                        .map(MetaValue::Int)
                        .unwrap_or_else(|_| MetaValue::Str(text.to_string())),
                )
            }
            "float" => self.text(node).parse::<f64>().ok().map(MetaValue::Float),
            "true" => Some(MetaValue::Bool(true)),
            "false" => Some(MetaValue::Bool(false)),
            "none" => Some(MetaValue::Null),
            "list" | "tuple" | "set" => Some(MetaValue::List(
                named_children(node)
                    .filter_map(|child| self.literal_value(child))
                    .collect(),
            )),
            "dictionary" => {
                let mut map = BTreeMap::new();
                for pair in named_children(node) {
                    if pair.kind() != "pair" {
                        continue;
                    }
                    let Some(MetaValue::Str(key)) = pair
                        .child_by_field_name("key")
                        .and_then(|k| self.literal_value(k))
                    else {
                        continue;
                    };
                    let value = pair
                        .child_by_field_name("value")
                        .and_then(|v| self.literal_value(v))
                        .unwrap_or(MetaValue::Null);
                    map.insert(key, value);
                }
                Some(MetaValue::Map(map))
            }
            "identifier" | "attribute" => self.dotted(node).map(MetaValue::Str),
            "parenthesized_expression" => {
                self.literal_value(named_children(node).next()?)
            }
            _ => None,
        }
    }

    /// Dotted text of an identifier or attribute chain; partial chains
    /// (base is a call or subscript) keep the attribute segments only.
    fn dotted(&self, node: Node) -> Option<String> {
        match node.kind() {
            "identifier" => Some(self.text(node).to_string()),
            "attribute" => {
                let mut parts = Vec::new();
                let mut current = node;
                while current.kind() == "attribute" {
                    let attr = current.child_by_field_name("attribute")?;
                    parts.push(self.text(attr).to_string());
                    match current.child_by_field_name("object") {
                        Some(object) => current = object,
                        None => break,
                    }
                }
                if current.kind() == "identifier" {
                    parts.push(self.text(current).to_string());
                }
                parts.reverse();
                (!parts.is_empty()).then(|| parts.join("."))
            }
            _ => None,
        }
    }

    fn string_content(&self, node: Node) -> String {
        let mut out = String::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "string_content" {
                out.push_str(self.text(child));
            }
        }
        out
    }

    fn text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

fn named_children<'t>(node: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    (0..node.named_child_count()).filter_map(move |i| node.named_child(i))
}
