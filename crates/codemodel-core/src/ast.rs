//! Language-agnostic AST schema shared by every normalizer and analyzer.
//!
//! Normalizers lower grammar-specific parse trees into this one node shape.
//! The node type set is a single closed enumeration so the normalizers and
//! the extractors cannot drift apart; language-specific detail lives in a
//! small per-node-type payload (`NodeDetail`) instead of an open attribute
//! map. Downstream analyzers inspect only `node_type`, `name`, `children`,
//! `detail`, and `decorations`.

use crate::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical node types produced by the normalizers.
///
/// Python constructs use the `Py` prefix, Java constructs the grammar's
/// declaration names. Grammar kinds with no analyzer contract pass through
/// as `Opaque` containers, children intact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    // Python
    Module,
    PyClassDef,
    PyFunctionDef,
    PyAsyncFunctionDef,
    PyCall,
    PyImport,
    PyImportFrom,
    PyAlias,
    PyName,
    PyAttribute,
    PyKeyword,
    PyConstant,
    PyAssign,
    PyAugAssign,
    PyAnnAssign,
    PyList,
    PyTuple,
    PySet,
    PyDict,
    // Java
    CompilationUnit,
    PackageDeclaration,
    ImportDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    AnnotationDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    MethodInvocation,
    // Pass-through container for unrecognized grammar kinds
    Opaque(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Module => "Module",
            NodeType::PyClassDef => "ClassDef",
            NodeType::PyFunctionDef => "FunctionDef",
            NodeType::PyAsyncFunctionDef => "AsyncFunctionDef",
            NodeType::PyCall => "Call",
            NodeType::PyImport => "Import",
            NodeType::PyImportFrom => "ImportFrom",
            NodeType::PyAlias => "alias",
            NodeType::PyName => "Name",
            NodeType::PyAttribute => "Attribute",
            NodeType::PyKeyword => "keyword",
            NodeType::PyConstant => "Constant",
            NodeType::PyAssign => "Assign",
            NodeType::PyAugAssign => "AugAssign",
            NodeType::PyAnnAssign => "AnnAssign",
            NodeType::PyList => "List",
            NodeType::PyTuple => "Tuple",
            NodeType::PySet => "Set",
            NodeType::PyDict => "Dict",
            NodeType::CompilationUnit => "CompilationUnit",
            NodeType::PackageDeclaration => "PackageDeclaration",
            NodeType::ImportDeclaration => "ImportDeclaration",
            NodeType::ClassDeclaration => "ClassDeclaration",
            NodeType::InterfaceDeclaration => "InterfaceDeclaration",
            NodeType::EnumDeclaration => "EnumDeclaration",
            NodeType::AnnotationDeclaration => "AnnotationDeclaration",
            NodeType::MethodDeclaration => "MethodDeclaration",
            NodeType::ConstructorDeclaration => "ConstructorDeclaration",
            NodeType::MethodInvocation => "MethodInvocation",
            NodeType::Opaque(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an identifier reference writes or reads its binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameRole {
    Load,
    Store,
}

/// Scalar, list, or map value carried by annotation arguments and record
/// metadata. The only place the model stays schemaless on purpose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    List(Vec<MetaValue>),
    Map(BTreeMap<String, MetaValue>),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MetaValue]> {
        match self {
            MetaValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// String content of this value: the scalar itself, or each string
    /// element of a list. Non-string entries are dropped.
    pub fn string_items(&self) -> Vec<String> {
        match self {
            MetaValue::Str(s) => vec![s.clone()],
            MetaValue::List(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Str(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Str(s)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

/// Serialized decorator (Python) or annotation (Java): dotted name, ordered
/// positional arguments, and keyword/element-value bindings. Arguments that
/// are not statically resolvable literals are absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<MetaValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keywords: BTreeMap<String, MetaValue>,
}

impl Annotation {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Final dotted segment, e.g. `route` for `app.route`.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn keyword(&self, key: &str) -> Option<&MetaValue> {
        self.keywords.get(key)
    }

    pub fn to_meta(&self) -> MetaValue {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), MetaValue::Str(self.name.clone()));
        if !self.args.is_empty() {
            map.insert("args".to_string(), MetaValue::List(self.args.clone()));
        }
        if !self.keywords.is_empty() {
            map.insert("keywords".to_string(), MetaValue::Map(self.keywords.clone()));
        }
        MetaValue::Map(map)
    }
}

/// Per-node-type payload preserving the attributes downstream analyzers
/// require. The variant set is the normalization contract: a normalizer
/// must fill the matching variant whenever the construct is present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum NodeDetail {
    #[default]
    None,
    /// Literal constant value.
    Constant { value: MetaValue },
    /// Identifier reference and its binding role.
    NameRef { id: String, role: NameRole },
    /// Qualified access `a.b.c`: final attribute plus the dotted string
    /// when the chain is statically derivable.
    AttributeRef {
        attr: String,
        dotted: Option<String>,
    },
    /// Call with the callee resolved to a dotted string where possible.
    Call { callee: Option<String> },
    /// Keyword argument binding (`arg=None` for `**kwargs` splats).
    Keyword { arg: Option<String> },
    /// `import a.b, c`: one entry per imported module.
    Import { modules: Vec<String> },
    /// `from M import a, b`: source module plus imported names.
    ImportFrom {
        module: Option<String>,
        names: Vec<String>,
    },
    /// Class declaration bases, as written.
    ClassDef { bases: Vec<String> },
    /// Java package declaration, dotted.
    Package { name: String },
    /// Java method invocation: simple name plus dotted qualifier.
    Invocation {
        name: String,
        qualifier: Option<String>,
    },
}

/// One node of the normalized, language-agnostic AST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AstNode>,
    #[serde(default, skip_serializing_if = "detail_is_none")]
    pub detail: NodeDetail,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorations: Vec<Annotation>,
}

fn detail_is_none(detail: &NodeDetail) -> bool {
    matches!(detail, NodeDetail::None)
}

impl AstNode {
    pub fn new(node_type: NodeType, language: Language) -> Self {
        Self {
            node_type,
            name: None,
            language,
            children: Vec::new(),
            detail: NodeDetail::None,
            decorations: Vec::new(),
        }
    }

    pub fn opaque(kind: impl Into<String>, language: Language) -> Self {
        Self::new(NodeType::Opaque(kind.into()), language)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_detail(mut self, detail: NodeDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_children(mut self, children: Vec<AstNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_decorations(mut self, decorations: Vec<Annotation>) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn push_child(&mut self, child: AstNode) {
        self.children.push(child);
    }

    /// Pre-order depth-first visit.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a AstNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Dotted identifier carried by this node, in the fixed priority the
    /// extractors rely on: qualified invocation > name > id > dotted
    /// attribute > literal string value.
    pub fn identifier(&self) -> Option<String> {
        match &self.detail {
            NodeDetail::Invocation { name, qualifier } => Some(match qualifier {
                Some(q) => format!("{q}.{name}"),
                None => name.clone(),
            }),
            _ => {
                if let Some(name) = &self.name {
                    return Some(name.clone());
                }
                match &self.detail {
                    NodeDetail::NameRef { id, .. } => Some(id.clone()),
                    NodeDetail::AttributeRef { attr, dotted } => {
                        Some(dotted.clone().unwrap_or_else(|| attr.clone()))
                    }
                    NodeDetail::Package { name } => Some(name.clone()),
                    NodeDetail::Constant { value } => {
                        value.as_str().map(str::to_string)
                    }
                    _ => None,
                }
            }
        }
    }
}
