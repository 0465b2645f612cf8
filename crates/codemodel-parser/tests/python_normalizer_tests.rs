use codemodel_core::{AstNode, Language, MetaValue, NameRole, NodeDetail, NodeType};
use codemodel_parser::SourceParser;

fn parse_py(source: &str) -> AstNode {
    SourceParser::new()
        .parse_source(Language::Python, source)
        .expect("python source should parse")
}

fn find<'a>(root: &'a AstNode, node_type: &NodeType) -> Option<&'a AstNode> {
    let mut found = None;
    root.visit(&mut |node| {
        if found.is_none() && node.node_type == *node_type {
            found = Some(node);
        }
    });
    found
}

fn find_all<'a>(root: &'a AstNode, node_type: &NodeType) -> Vec<&'a AstNode> {
    let mut out = Vec::new();
    root.visit(&mut |node| {
        if node.node_type == *node_type {
            out.push(node);
        }
    });
    out
}

#[test]
fn module_root_carries_language() {
    let ast = parse_py("x = 1\n");
    assert_eq!(ast.node_type, NodeType::Module);
    assert_eq!(ast.language, Language::Python);
    let mut all_python = true;
    ast.visit(&mut |node| all_python &= node.language == Language::Python);
    assert!(all_python);
}

#[test]
fn route_decorator_preserves_name_args_and_keywords() {
    let ast = parse_py(
        r#"
@app.route("/hello", methods=["GET", "POST"])
def hello_route():
    return "hi"
"#,
    );
    let func = find(&ast, &NodeType::PyFunctionDef).expect("function");
    assert_eq!(func.name.as_deref(), Some("hello_route"));
    assert_eq!(func.decorations.len(), 1);

    let decorator = &func.decorations[0];
    assert_eq!(decorator.name, "app.route");
    assert_eq!(decorator.short_name(), "route");
    assert_eq!(decorator.args, vec![MetaValue::Str("/hello".to_string())]);
    let methods = decorator.keyword("methods").expect("methods keyword");
    assert_eq!(methods.string_items(), vec!["GET", "POST"]);
}

#[test]
fn bare_decorator_serializes_name_only() {
    let ast = parse_py("@staticmethod\ndef f():\n    pass\n");
    let func = find(&ast, &NodeType::PyFunctionDef).expect("function");
    assert_eq!(func.decorations[0].name, "staticmethod");
    assert!(func.decorations[0].args.is_empty());
}

#[test]
fn decorators_never_appear_as_children() {
    let ast = parse_py(
        r#"
@register(audit_call())
def f():
    pass
"#,
    );
    let func = find(&ast, &NodeType::PyFunctionDef).expect("function");
    // The audit_call() inside the decorator must not surface as a Call child.
    assert!(find(func, &NodeType::PyCall).is_none());
}

#[test]
fn async_function_is_distinguished() {
    let ast = parse_py("async def update_user():\n    pass\n");
    assert!(find(&ast, &NodeType::PyAsyncFunctionDef).is_some());
    assert!(find(&ast, &NodeType::PyFunctionDef).is_none());
}

#[test]
fn import_records_target_modules() {
    let ast = parse_py("import os, sys.path\nimport numpy as np\n");
    let imports = find_all(&ast, &NodeType::PyImport);
    assert_eq!(imports.len(), 2);
    match &imports[0].detail {
        NodeDetail::Import { modules } => assert_eq!(modules, &["os", "sys.path"]),
        other => panic!("unexpected detail: {other:?}"),
    }
    // Aliased import targets the real module name.
    match &imports[1].detail {
        NodeDetail::Import { modules } => assert_eq!(modules, &["numpy"]),
        other => panic!("unexpected detail: {other:?}"),
    }
}

#[test]
fn import_from_records_module_and_names() {
    let ast = parse_py("from flask import Flask, Blueprint\n");
    let import = find(&ast, &NodeType::PyImportFrom).expect("import-from");
    match &import.detail {
        NodeDetail::ImportFrom { module, names } => {
            assert_eq!(module.as_deref(), Some("flask"));
            assert_eq!(names, &["Flask", "Blueprint"]);
        }
        other => panic!("unexpected detail: {other:?}"),
    }
}

#[test]
fn relative_import_strips_leading_dots() {
    let ast = parse_py("from . import views\nfrom .models import Item\n");
    let imports = find_all(&ast, &NodeType::PyImportFrom);
    match &imports[0].detail {
        NodeDetail::ImportFrom { module, names } => {
            assert_eq!(module.as_deref(), None);
            assert_eq!(names, &["views"]);
        }
        other => panic!("unexpected detail: {other:?}"),
    }
    match &imports[1].detail {
        NodeDetail::ImportFrom { module, names } => {
            assert_eq!(module.as_deref(), Some("models"));
            assert_eq!(names, &["Item"]);
        }
        other => panic!("unexpected detail: {other:?}"),
    }
}

#[test]
fn call_resolves_dotted_callee() {
    let ast = parse_py(
        r#"
foo()
app.get("/x")
self.helper(1)
"#,
    );
    let callees: Vec<Option<String>> = find_all(&ast, &NodeType::PyCall)
        .iter()
        .map(|call| match &call.detail {
            NodeDetail::Call { callee } => callee.clone(),
            _ => None,
        })
        .collect();
    assert_eq!(
        callees,
        vec![
            Some("foo".to_string()),
            Some("app.get".to_string()),
            Some("self.helper".to_string()),
        ]
    );
}

#[test]
fn assignment_targets_carry_store_role() {
    let ast = parse_py("urlpatterns = []\nvalue = urlpatterns\n");
    let names = find_all(&ast, &NodeType::PyName);
    let roles: Vec<(String, NameRole)> = names
        .iter()
        .filter_map(|node| match &node.detail {
            NodeDetail::NameRef { id, role } => Some((id.clone(), *role)),
            _ => None,
        })
        .collect();
    assert!(roles.contains(&("urlpatterns".to_string(), NameRole::Store)));
    assert!(roles.contains(&("urlpatterns".to_string(), NameRole::Load)));
    assert!(roles.contains(&("value".to_string(), NameRole::Store)));
}

#[test]
fn attribute_preserves_final_attr_and_dotted_chain() {
    let ast = parse_py("handler = views.ItemDetailView.as_view\n");
    let attr = find(&ast, &NodeType::PyAttribute).expect("attribute");
    match &attr.detail {
        NodeDetail::AttributeRef { attr, dotted } => {
            assert_eq!(attr, "as_view");
            assert_eq!(dotted.as_deref(), Some("views.ItemDetailView.as_view"));
        }
        other => panic!("unexpected detail: {other:?}"),
    }
}

#[test]
fn keyword_argument_records_parameter_name() {
    let ast = parse_py("f(name=\"item-detail\")\n");
    let keyword = find(&ast, &NodeType::PyKeyword).expect("keyword");
    match &keyword.detail {
        NodeDetail::Keyword { arg } => assert_eq!(arg.as_deref(), Some("name")),
        other => panic!("unexpected detail: {other:?}"),
    }
    let constant = find(keyword, &NodeType::PyConstant).expect("value");
    match &constant.detail {
        NodeDetail::Constant { value } => {
            assert_eq!(value.as_str(), Some("item-detail"));
        }
        other => panic!("unexpected detail: {other:?}"),
    }
}

#[test]
fn class_bases_are_recorded() {
    let ast = parse_py("class ItemDetailView(generic.DetailView):\n    pass\n");
    let class = find(&ast, &NodeType::PyClassDef).expect("class");
    assert_eq!(class.name.as_deref(), Some("ItemDetailView"));
    match &class.detail {
        NodeDetail::ClassDef { bases } => assert_eq!(bases, &["generic.DetailView"]),
        other => panic!("unexpected detail: {other:?}"),
    }
}

#[test]
fn syntax_errors_are_rejected_not_partially_emitted() {
    let broken = "def broken_function(\n    print(\"This is a syntax error\")\n";
    let result = SourceParser::new().parse_source(Language::Python, broken);
    assert!(result.is_err());
}

#[test]
fn languages_without_parser_signal_unsupported() {
    let parser = SourceParser::new();
    assert!(parser.parse_source(Language::C, "int main() {}").is_err());
    assert!(parser.parse_source(Language::Cpp, "int main() {}").is_err());
}
