use codemodel_core::{Artifact, AstAnalyzer, AstNode, Language, Relation, RelationKind, Symbol, SymbolKind};
use codemodel_parser::SourceParser;
use codemodel_semantic::{JavaCallAnalyzer, JavaImportAnalyzer, JavaSymbolAnalyzer};

fn parse(source: &str) -> AstNode {
    SourceParser::new()
        .parse_source(Language::Java, source)
        .unwrap()
}

fn symbols(source: &str, file_path: &str) -> Vec<Symbol> {
    JavaSymbolAnalyzer::new()
        .analyze(&parse(source), file_path)
        .into_iter()
        .filter_map(|artifact| match artifact {
            Artifact::Symbol(symbol) => Some(symbol),
            _ => None,
        })
        .collect()
}

fn relations(analyzer: &dyn AstAnalyzer, source: &str, file_path: &str) -> Vec<Relation> {
    analyzer
        .analyze(&parse(source), file_path)
        .into_iter()
        .filter_map(|artifact| match artifact {
            Artifact::Relation(relation) => Some(relation),
            _ => None,
        })
        .collect()
}

const SAMPLE: &str = r#"
package com.example.app;

import java.util.List;
import com.example.repo.ItemRepository;

public class ItemService {

    private final ItemRepository repository;

    public ItemService(ItemRepository repository) {
        this.repository = repository;
    }

    public List<String> findAll() {
        audit();
        return repository.findAll();
    }

    private void audit() {
    }

    public static class Page {
        public int size() {
            return 0;
        }
    }
}
"#;

#[test]
fn classes_are_qualified_by_package_and_nesting() {
    let symbols = symbols(SAMPLE, "ItemService.java");
    let classes: Vec<(&str, Option<&str>)> = symbols
        .iter()
        .filter(|s| s.kind == SymbolKind::Class)
        .map(|s| (s.name.as_str(), s.parent.as_deref()))
        .collect();
    assert_eq!(
        classes,
        vec![
            ("com.example.app.ItemService", Some("com.example.app")),
            (
                "com.example.app.ItemService.Page",
                Some("com.example.app.ItemService")
            ),
        ]
    );
}

#[test]
fn constructors_and_methods_are_methods() {
    let symbols = symbols(SAMPLE, "ItemService.java");
    let methods: Vec<&str> = symbols
        .iter()
        .filter(|s| s.kind == SymbolKind::Method)
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(
        methods,
        vec![
            "com.example.app.ItemService.ItemService",
            "com.example.app.ItemService.findAll",
            "com.example.app.ItemService.audit",
            "com.example.app.ItemService.Page.size",
        ]
    );
}

#[test]
fn imports_emit_from_file_path_and_package_defines_once() {
    let relations = relations(&JavaImportAnalyzer::new(), SAMPLE, "ItemService.java");
    let defines: Vec<&Relation> = relations
        .iter()
        .filter(|r| r.kind == RelationKind::Defines)
        .collect();
    assert_eq!(defines.len(), 1);
    assert_eq!(defines[0].source, "ItemService.java");
    assert_eq!(defines[0].target, "com.example.app");

    let imports: Vec<&str> = relations
        .iter()
        .filter(|r| r.kind == RelationKind::Imports)
        .map(|r| r.target.as_str())
        .collect();
    assert_eq!(imports, vec!["java.util.List", "com.example.repo.ItemRepository"]);
}

#[test]
fn wildcard_imports_keep_the_star() {
    let source = "package p;\nimport java.util.*;\nclass A {}\n";
    let relations = relations(&JavaImportAnalyzer::new(), source, "A.java");
    let imports: Vec<&str> = relations
        .iter()
        .filter(|r| r.kind == RelationKind::Imports)
        .map(|r| r.target.as_str())
        .collect();
    assert_eq!(imports, vec!["java.util.*"]);
}

#[test]
fn calls_source_from_the_enclosing_method() {
    let relations = relations(&JavaCallAnalyzer::new(), SAMPLE, "ItemService.java");
    let pairs: Vec<(&str, &str)> = relations
        .iter()
        .map(|r| (r.source.as_str(), r.target.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (
                "com.example.app.ItemService.findAll",
                "com.example.app.audit"
            ),
            ("com.example.app.ItemService.findAll", "repository.findAll"),
        ]
    );
}

#[test]
fn unqualified_callees_gain_the_package_prefix() {
    let relations = relations(&JavaCallAnalyzer::new(), SAMPLE, "ItemService.java");
    assert!(relations
        .iter()
        .any(|r| r.target == "com.example.app.audit"));
}

#[test]
fn files_without_a_package_leave_callees_bare() {
    let source = r#"
class Plain {
    void run() {
        helper();
    }
}
"#;
    let relations = relations(&JavaCallAnalyzer::new(), source, "Plain.java");
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].source, "Plain.run");
    assert_eq!(relations[0].target, "helper");
}
