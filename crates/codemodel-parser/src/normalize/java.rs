//! Lowers tree-sitter Java parse trees into the shared AST schema.
//!
//! Node types follow the declaration vocabulary the analyzers walk
//! (`ClassDeclaration`, `MethodInvocation`, `PackageDeclaration`, …).
//! Annotations are harvested from the `modifiers` child and serialized onto
//! the declaration; the annotation `value` element is flattened into the
//! positional argument list, arrays spliced in order.

use codemodel_core::{Annotation, AstNode, Language, MetaValue, NodeDetail, NodeType};
use tree_sitter::{Node, Tree};

pub struct JavaNormalizer<'a> {
    source: &'a str,
}

impl<'a> JavaNormalizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn normalize(&self, tree: &Tree) -> AstNode {
        let root = tree.root_node();
        let children = named_children(root)
            .filter_map(|child| self.lower(child))
            .collect();
        AstNode::new(NodeType::CompilationUnit, Language::Java).with_children(children)
    }

    fn lower(&self, node: Node) -> Option<AstNode> {
        match node.kind() {
            "comment" | "line_comment" | "block_comment" => None,
            "package_declaration" => Some(self.lower_package(node)),
            "import_declaration" => Some(self.lower_import(node)),
            "class_declaration" => Some(self.lower_declaration(node, NodeType::ClassDeclaration)),
            "interface_declaration" => {
                Some(self.lower_declaration(node, NodeType::InterfaceDeclaration))
            }
            "enum_declaration" => Some(self.lower_declaration(node, NodeType::EnumDeclaration)),
            "annotation_type_declaration" => {
                Some(self.lower_declaration(node, NodeType::AnnotationDeclaration))
            }
            "method_declaration" => {
                Some(self.lower_declaration(node, NodeType::MethodDeclaration))
            }
            "constructor_declaration" => {
                Some(self.lower_declaration(node, NodeType::ConstructorDeclaration))
            }
            "method_invocation" => Some(self.lower_invocation(node)),
            "identifier" => {
                Some(AstNode::opaque("identifier", Language::Java).with_name(self.text(node)))
            }
            _ => Some(self.lower_opaque(node)),
        }
    }

    fn lower_package(&self, node: Node) -> AstNode {
        let name = named_children(node)
            .find(|child| matches!(child.kind(), "scoped_identifier" | "identifier"))
            .map(|child| self.text(child).to_string())
            .unwrap_or_default();
        AstNode::new(NodeType::PackageDeclaration, Language::Java)
            .with_name(name.clone())
            .with_detail(NodeDetail::Package { name })
    }

    fn lower_import(&self, node: Node) -> AstNode {
        let mut path = named_children(node)
            .find(|child| matches!(child.kind(), "scoped_identifier" | "identifier"))
            .map(|child| self.text(child).to_string())
            .unwrap_or_default();
        let wildcard = {
            let mut cursor = node.walk();
            let has_asterisk = node.children(&mut cursor).any(|c| c.kind() == "asterisk");
            has_asterisk
        };
        if wildcard {
            path.push_str(".*");
        }
        AstNode::new(NodeType::ImportDeclaration, Language::Java)
            .with_name(path.clone())
            .with_detail(NodeDetail::Import {
                modules: vec![path],
            })
    }

    fn lower_declaration(&self, node: Node, node_type: NodeType) -> AstNode {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string());
        let mut out = AstNode::new(node_type, Language::Java)
            .with_decorations(self.annotations_of(node));
        out.name = name;
        out.children = self.lower_body(node);
        out
    }

    fn lower_body(&self, node: Node) -> Vec<AstNode> {
        let Some(body) = node.child_by_field_name("body") else {
            return Vec::new();
        };
        named_children(body)
            .filter_map(|child| self.lower(child))
            .collect()
    }

    fn lower_invocation(&self, node: Node) -> AstNode {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let qualifier = node
            .child_by_field_name("object")
            .and_then(|object| self.qualifier_text(object));
        let mut children = Vec::new();
        if let Some(object) = node.child_by_field_name("object") {
            if let Some(lowered) = self.lower(object) {
                children.push(lowered);
            }
        }
        if let Some(arguments) = node.child_by_field_name("arguments") {
            for arg in named_children(arguments) {
                if let Some(lowered) = self.lower(arg) {
                    children.push(lowered);
                }
            }
        }
        AstNode::new(NodeType::MethodInvocation, Language::Java)
            .with_name(name.clone())
            .with_detail(NodeDetail::Invocation { name, qualifier })
            .with_children(children)
    }

    fn lower_opaque(&self, node: Node) -> AstNode {
        let children = named_children(node)
            .filter_map(|child| self.lower(child))
            .collect();
        AstNode::opaque(node.kind(), Language::Java).with_children(children)
    }

    /// Dotted text of a statically derivable receiver; calls and other
    /// dynamic receivers yield no qualifier.
    fn qualifier_text(&self, node: Node) -> Option<String> {
        match node.kind() {
            "identifier" | "field_access" | "scoped_identifier" | "this" | "super" => {
                Some(self.text(node).to_string())
            }
            _ => None,
        }
    }

    fn annotations_of(&self, node: Node) -> Vec<Annotation> {
        let mut out = Vec::new();
        for child in named_children(node) {
            if child.kind() != "modifiers" {
                continue;
            }
            for modifier in named_children(child) {
                match modifier.kind() {
                    "annotation" | "marker_annotation" => {
                        if let Some(annotation) = self.serialize_annotation(modifier) {
                            out.push(annotation);
                        }
                    }
                    _ => {}
                }
            }
        }
        out
    }

    fn serialize_annotation(&self, node: Node) -> Option<Annotation> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())?;
        let mut annotation = Annotation::named(name);
        let Some(arguments) = node.child_by_field_name("arguments") else {
            return Some(annotation);
        };
        for element in named_children(arguments) {
            if element.kind() == "element_value_pair" {
                let key = element
                    .child_by_field_name("key")
                    .map(|k| self.text(k).to_string())?;
                let value = element
                    .child_by_field_name("value")
                    .and_then(|v| self.annotation_value(v));
                let Some(value) = value else { continue };
                if key == "value" {
                    push_flattened(&mut annotation.args, value);
                } else {
                    annotation.keywords.insert(key, value);
                }
            } else if let Some(value) = self.annotation_value(element) {
                push_flattened(&mut annotation.args, value);
            }
        }
        Some(annotation)
    }

    fn annotation_value(&self, node: Node) -> Option<MetaValue> {
        match node.kind() {
            "string_literal" => Some(MetaValue::Str(self.string_content(node))),
            "true" => Some(MetaValue::Bool(true)),
            "false" => Some(MetaValue::Bool(false)),
            "decimal_integer_literal" | "hex_integer_literal" => {
                let text = self.text(node);
                Some(
                    text.parse::<i64>()
                        .map(MetaValue::Int)
                        .unwrap_or_else(|_| MetaValue::Str(text.to_string())),
                )
            }
            "identifier" => Some(MetaValue::Str(self.text(node).to_string())),
            "field_access" | "scoped_identifier" => Some(self.member_reference(node)),
            "element_value_array_initializer" => Some(MetaValue::List(
                named_children(node)
                    .filter_map(|child| self.annotation_value(child))
                    .collect(),
            )),
            "annotation" | "marker_annotation" => {
                self.serialize_annotation(node).map(|a| a.to_meta())
            }
            _ => None,
        }
    }

    /// `RequestMethod.PUT` resolves to `PUT`; other member references keep
    /// their dotted form.
    fn member_reference(&self, node: Node) -> MetaValue {
        let dotted = self.text(node).to_string();
        match dotted.rsplit_once('.') {
            Some((qualifier, member)) if qualifier.eq_ignore_ascii_case("requestmethod") => {
                MetaValue::Str(member.to_uppercase())
            }
            _ => MetaValue::Str(dotted),
        }
    }

    fn string_content(&self, node: Node) -> String {
        let mut out = String::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "string_fragment" {
                out.push_str(self.text(child));
            }
        }
        out
    }

    fn text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

fn push_flattened(args: &mut Vec<MetaValue>, value: MetaValue) {
    match value {
        MetaValue::List(items) => args.extend(items),
        other => args.push(other),
    }
}

fn named_children<'t>(node: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    (0..node.named_child_count()).filter_map(move |i| node.named_child(i))
}
