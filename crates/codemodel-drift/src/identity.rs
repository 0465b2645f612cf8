//! Identity model used to match entities across two snapshots.
//!
//! Handler identity is deliberately decoupled from path and method so a
//! changed path or method is detected as a change rather than a removal.
//! Dependency and reference predicates operate on the relation kind's wire
//! string to stay stable across naming variants.

use codemodel_core::{ApiEndpoint, Framework, Language, MetaValue, Relation, Symbol};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// `(language, framework, class_name or "", handler_name)`.
pub type HandlerIdentity = (Language, Framework, String, String);

/// `(language, qualified name)`.
pub type SymbolIdentity = (Language, String);

/// `(language, relation wire type, source, target)`.
pub type DependencyIdentity = (String, String, String, String);

pub fn handler_identity(endpoint: &ApiEndpoint) -> HandlerIdentity {
    (
        endpoint.language,
        endpoint.framework,
        endpoint.class_name.clone().unwrap_or_default(),
        endpoint.handler_name.clone(),
    )
}

/// Last endpoint wins per identity, keyed in a deterministic order.
pub fn build_handler_map(
    endpoints: &[ApiEndpoint],
) -> BTreeMap<HandlerIdentity, &ApiEndpoint> {
    let mut mapping = BTreeMap::new();
    for endpoint in endpoints {
        mapping.insert(handler_identity(endpoint), endpoint);
    }
    mapping
}

pub fn build_symbol_name_set(symbols: &[Symbol]) -> BTreeSet<SymbolIdentity> {
    symbols
        .iter()
        .map(|symbol| (symbol.language, symbol.name.clone()))
        .collect()
}

/// Names under which an endpoint's handler may be defined as a symbol.
pub fn candidate_handler_names(endpoint: &ApiEndpoint) -> Vec<String> {
    let mut names = vec![endpoint.handler_name.clone()];
    if let Some(class_name) = &endpoint.class_name {
        names.push(format!("{class_name}.{}", endpoint.handler_name));
        names.push(class_name.clone());
    }
    names
}

pub fn is_dependency_relation(relation: &Relation) -> bool {
    let kind = relation.kind.as_wire();
    kind.contains("IMPORT") || kind.contains("DEPEND")
}

pub fn is_symbol_reference_relation(relation: &Relation) -> bool {
    const TOKENS: &[&str] = &["CALL", "REFERENCE", "REFERS", "USE", "USES", "INVOKE"];
    let kind = relation.kind.as_wire();
    TOKENS.iter().any(|token| kind.contains(token))
}

pub fn dependency_identity(relation: &Relation) -> DependencyIdentity {
    (
        relation.language.to_string(),
        relation.kind.as_wire().to_string(),
        relation.source.clone(),
        relation.target.clone(),
    )
}

pub fn build_dependency_set(relations: &[Relation]) -> BTreeSet<DependencyIdentity> {
    relations
        .iter()
        .filter(|relation| is_dependency_relation(relation))
        .map(dependency_identity)
        .collect()
}

/// Last relation wins per identity.
pub fn index_dependencies(relations: &[Relation]) -> HashMap<DependencyIdentity, &Relation> {
    relations
        .iter()
        .filter(|relation| is_dependency_relation(relation))
        .map(|relation| (dependency_identity(relation), relation))
        .collect()
}

pub fn handler_identity_meta(identity: &HandlerIdentity) -> MetaValue {
    MetaValue::List(vec![
        MetaValue::Str(identity.0.to_string()),
        MetaValue::Str(identity.1.to_string()),
        MetaValue::Str(identity.2.clone()),
        MetaValue::Str(identity.3.clone()),
    ])
}

pub fn endpoint_meta(endpoint: &ApiEndpoint) -> MetaValue {
    let mut map = BTreeMap::new();
    map.insert("path".to_string(), MetaValue::Str(endpoint.path.clone()));
    map.insert(
        "http_method".to_string(),
        MetaValue::Str(endpoint.http_method.clone()),
    );
    map.insert(
        "handler_name".to_string(),
        MetaValue::Str(endpoint.handler_name.clone()),
    );
    map.insert(
        "class_name".to_string(),
        endpoint
            .class_name
            .clone()
            .map(MetaValue::Str)
            .unwrap_or(MetaValue::Null),
    );
    map.insert(
        "language".to_string(),
        MetaValue::Str(endpoint.language.to_string()),
    );
    map.insert(
        "file_path".to_string(),
        MetaValue::Str(endpoint.file_path.clone()),
    );
    map.insert(
        "framework".to_string(),
        MetaValue::Str(endpoint.framework.to_string()),
    );
    if !endpoint.metadata.is_empty() {
        map.insert(
            "metadata".to_string(),
            MetaValue::Map(endpoint.metadata.clone()),
        );
    }
    MetaValue::Map(map)
}

pub fn relation_meta(relation: &Relation) -> MetaValue {
    let mut map = BTreeMap::new();
    map.insert(
        "source".to_string(),
        MetaValue::Str(relation.source.clone()),
    );
    map.insert(
        "target".to_string(),
        MetaValue::Str(relation.target.clone()),
    );
    map.insert(
        "relation_type".to_string(),
        MetaValue::Str(relation.kind.as_wire().to_string()),
    );
    map.insert(
        "language".to_string(),
        MetaValue::Str(relation.language.to_string()),
    );
    map.insert(
        "file_path".to_string(),
        MetaValue::Str(relation.file_path.clone()),
    );
    MetaValue::Map(map)
}

pub fn dependency_identity_meta(identity: &DependencyIdentity) -> MetaValue {
    MetaValue::List(vec![
        MetaValue::Str(identity.0.clone()),
        MetaValue::Str(identity.1.clone()),
        MetaValue::Str(identity.2.clone()),
        MetaValue::Str(identity.3.clone()),
    ])
}
