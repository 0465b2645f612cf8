use codemodel_core::{Artifact, AstNode, Language, Relation, RelationKind, Symbol, SymbolKind};
use codemodel_parser::SourceParser;
use codemodel_semantic::{PythonCallAnalyzer, PythonImportAnalyzer, PythonSymbolAnalyzer};
use codemodel_core::AstAnalyzer;

fn parse(source: &str) -> AstNode {
    SourceParser::new()
        .parse_source(Language::Python, source)
        .unwrap()
}

fn symbols(source: &str, file_path: &str) -> Vec<Symbol> {
    PythonSymbolAnalyzer::new()
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
import ast
from typing import List

class Processor:
    def __init__(self, data):
        self.data = data

    def process(self):
        return transform(self.data)

def helper_func():
    pass
"#;

#[test]
fn classes_methods_and_functions_are_qualified() {
    let symbols = symbols(SAMPLE, "pkg/sample.py");
    let by_name: Vec<(&str, SymbolKind, Option<&str>)> = symbols
        .iter()
        .map(|s| (s.name.as_str(), s.kind, s.parent.as_deref()))
        .collect();
    assert_eq!(
        by_name,
        vec![
            ("Processor", SymbolKind::Class, None),
            ("Processor.__init__", SymbolKind::Method, Some("Processor")),
            ("Processor.process", SymbolKind::Method, Some("Processor")),
            ("helper_func", SymbolKind::Function, None),
        ]
    );
}

#[test]
fn nested_functions_are_functions_unless_a_class_encloses() {
    let source = r#"
def outer():
    def inner():
        pass

class C:
    def m(self):
        def local():
            pass
"#;
    let symbols = symbols(source, "f.py");
    let kind_of = |name: &str| symbols.iter().find(|s| s.name == name).map(|s| s.kind);
    assert_eq!(kind_of("outer"), Some(SymbolKind::Function));
    assert_eq!(kind_of("outer.inner"), Some(SymbolKind::Function));
    assert_eq!(kind_of("C.m"), Some(SymbolKind::Method));
    // Class ancestry anywhere in the context marks the callable a method.
    assert_eq!(kind_of("C.m.local"), Some(SymbolKind::Method));
}

#[test]
fn async_functions_extract_like_regular_functions() {
    let symbols = symbols("async def update_user():\n    pass\n", "api.py");
    assert_eq!(symbols[0].name, "update_user");
    assert_eq!(symbols[0].kind, SymbolKind::Function);
}

#[test]
fn module_level_imports_source_from_file_path() {
    let relations = relations(&PythonImportAnalyzer::new(), SAMPLE, "pkg/sample.py");
    let targets: Vec<(&str, &str)> = relations
        .iter()
        .map(|r| (r.source.as_str(), r.target.as_str()))
        .collect();
    assert_eq!(
        targets,
        vec![("pkg/sample.py", "ast"), ("pkg/sample.py", "typing.List")]
    );
    assert!(relations.iter().all(|r| r.kind == RelationKind::Imports));
}

#[test]
fn from_import_fans_out_per_name() {
    let relations = relations(
        &PythonImportAnalyzer::new(),
        "from module.utils import fetch_status, save_status\n",
        "views.py",
    );
    let targets: Vec<&str> = relations.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(targets, vec!["module.utils.fetch_status", "module.utils.save_status"]);
}

#[test]
fn function_scoped_import_sources_from_qualified_scope() {
    let source = r#"
def lazy():
    import json
"#;
    let relations = relations(&PythonImportAnalyzer::new(), source, "m.py");
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].source, "lazy");
    assert_eq!(relations[0].target, "json");
}

#[test]
fn calls_attribute_to_enclosing_callable() {
    let source = r#"
from module.utils import fetch_status

def status_view():
    return fetch_status()

def item_detail_view(item_id):
    return fetch_status()
"#;
    let relations = relations(&PythonCallAnalyzer::new(), source, "module/views.py");
    let pairs: Vec<(&str, &str)> = relations
        .iter()
        .map(|r| (r.source.as_str(), r.target.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("status_view", "fetch_status"),
            ("item_detail_view", "fetch_status"),
        ]
    );
}

#[test]
fn module_scope_calls_source_from_file_path() {
    let relations = relations(
        &PythonCallAnalyzer::new(),
        "app = Flask(__name__)\n",
        "app.py",
    );
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].source, "app.py");
    assert_eq!(relations[0].target, "Flask");
}

#[test]
fn method_calls_are_qualified_by_class_context() {
    let source = r#"
class Processor:
    def process(self):
        return self.helper()
"#;
    let relations = relations(&PythonCallAnalyzer::new(), source, "p.py");
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].source, "Processor.process");
    assert_eq!(relations[0].target, "self.helper");
}

#[test]
fn decorator_calls_do_not_inflate_the_call_graph() {
    let source = r#"
@app.route("/hello")
def hello_route():
    return render()
"#;
    let relations = relations(&PythonCallAnalyzer::new(), source, "app.py");
    let targets: Vec<&str> = relations.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(targets, vec!["render"]);
}

#[test]
fn chained_call_receivers_are_still_visited() {
    let source = r#"
def fetch():
    return session.get(url).json()
"#;
    let relations = relations(&PythonCallAnalyzer::new(), source, "f.py");
    let targets: Vec<&str> = relations.iter().map(|r| r.target.as_str()).collect();
    assert!(targets.contains(&"session.get"));
}
