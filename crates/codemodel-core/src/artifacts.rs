use crate::{DependencyKind, DriftSeverity, Framework, Language, MetaValue, RelationKind, SymbolKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named program entity with its dot-qualified path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    #[serde(rename = "symbol_type")]
    pub kind: SymbolKind,
    pub language: Language,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Symbol {
    pub fn new(
        name: impl Into<String>,
        kind: SymbolKind,
        language: Language,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            language,
            file_path: file_path.into(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        self.parent = (!parent.is_empty()).then_some(parent);
        self
    }
}

/// Directed edge between two named entities within one file's analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub source: String,
    pub target: String,
    #[serde(rename = "relation_type")]
    pub kind: RelationKind,
    pub language: Language,
    pub file_path: String,
}

impl Relation {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: RelationKind,
        language: Language,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            language,
            file_path: file_path.into(),
        }
    }
}

/// A detected HTTP endpoint. `path` is the raw route literal as written;
/// `http_method` is uppercase (Django's sentinel is `ANY`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub path: String,
    pub http_method: String,
    pub handler_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub language: Language,
    pub file_path: String,
    pub framework: Framework,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, MetaValue>,
}

/// Derived edge emitted by the dependency analyzers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub source: String,
    pub target: String,
    #[serde(rename = "dependency_type")]
    pub kind: DependencyKind,
    pub language: Language,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, MetaValue>,
}

/// One detected difference between two artifact snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftFinding {
    pub drift_type: String,
    pub description: String,
    pub severity: DriftSeverity,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, MetaValue>,
}

/// Snapshot of everything extracted from a scan. Insertion order is
/// preserved; uniqueness is a consumer concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisArtifacts {
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default, rename = "api_endpoints")]
    pub endpoints: Vec<ApiEndpoint>,
}

impl AnalysisArtifacts {
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.relations.is_empty() && self.endpoints.is_empty()
    }
}

/// Sum of the record types an AST analyzer may emit, so one registry can
/// host symbol extractors, relation extractors, and endpoint detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Artifact {
    Symbol(Symbol),
    Relation(Relation),
    Endpoint(ApiEndpoint),
}

impl From<Symbol> for Artifact {
    fn from(symbol: Symbol) -> Self {
        Artifact::Symbol(symbol)
    }
}

impl From<Relation> for Artifact {
    fn from(relation: Relation) -> Self {
        Artifact::Relation(relation)
    }
}

impl From<ApiEndpoint> for Artifact {
    fn from(endpoint: ApiEndpoint) -> Self {
        Artifact::Endpoint(endpoint)
    }
}
