use codemodel_core::{ApiEndpoint, AstNode, Framework, Language, MetaValue};
use codemodel_endpoint::{DjangoApiDetector, EndpointDetector, FastApiDetector, FlaskApiDetector};
use codemodel_parser::SourceParser;

fn parse(source: &str) -> AstNode {
    SourceParser::new()
        .parse_source(Language::Python, source)
        .unwrap()
}

const FLASK_APP: &str = r#"
from flask import Blueprint, Flask

app = Flask(__name__)

@app.route("/hello", methods=["GET", "POST"])
def hello_route():
    return "hello"

@app.route("/ping")
def ping_route():
    return "pong"

blueprint = Blueprint("api", __name__)

@blueprint.route("/items", methods=["PUT"])
def blueprint_route():
    return "updated"
"#;

#[test]
fn flask_route_with_methods_list_emits_one_endpoint_per_method() {
    let endpoints = FlaskApiDetector::new().detect(&parse(FLASK_APP), "app.py");
    let hello: Vec<&ApiEndpoint> = endpoints
        .iter()
        .filter(|e| e.handler_name == "hello_route")
        .collect();
    assert_eq!(hello.len(), 2);
    for endpoint in &hello {
        assert_eq!(endpoint.path, "/hello");
        assert_eq!(endpoint.class_name, None);
        assert_eq!(endpoint.framework, Framework::Flask);
        assert_eq!(endpoint.language, Language::Python);
    }
    let methods: Vec<&str> = hello.iter().map(|e| e.http_method.as_str()).collect();
    assert_eq!(methods, vec!["GET", "POST"]);
}

#[test]
fn flask_route_without_methods_defaults_to_get() {
    let endpoints = FlaskApiDetector::new().detect(&parse(FLASK_APP), "app.py");
    let ping = endpoints
        .iter()
        .find(|e| e.handler_name == "ping_route")
        .expect("ping endpoint");
    assert_eq!(ping.path, "/ping");
    assert_eq!(ping.http_method, "GET");
}

#[test]
fn blueprint_route_decorators_are_recognized() {
    let endpoints = FlaskApiDetector::new().detect(&parse(FLASK_APP), "app.py");
    let item = endpoints
        .iter()
        .find(|e| e.handler_name == "blueprint_route")
        .expect("blueprint endpoint");
    assert_eq!(item.path, "/items");
    assert_eq!(item.http_method, "PUT");
}

#[test]
fn flask_route_inside_class_contributes_class_name() {
    let source = r#"
class ItemApi:
    @app.route("/items")
    def list_items(self):
        return []
"#;
    let endpoints = FlaskApiDetector::new().detect(&parse(source), "app.py");
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].class_name.as_deref(), Some("ItemApi"));
}

const FASTAPI_APP: &str = r#"
from fastapi import APIRouter, FastAPI

app = FastAPI()

@app.get("/health")
async def health_check():
    return {"status": "healthy"}

@app.post("/items")
async def create_item(item: dict):
    return item

router = APIRouter(prefix="/v1")

@router.patch("/users/{user_id}")
async def update_user(user_id: str, payload: dict):
    return {"id": user_id}
"#;

#[test]
fn fastapi_decorator_suffix_selects_http_method() {
    let endpoints = FastApiDetector::new().detect(&parse(FASTAPI_APP), "api.py");
    let summary: Vec<(&str, &str, &str)> = endpoints
        .iter()
        .map(|e| (e.http_method.as_str(), e.path.as_str(), e.handler_name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("GET", "/health", "health_check"),
            ("POST", "/items", "create_item"),
            ("PATCH", "/users/{user_id}", "update_user"),
        ]
    );
    assert!(endpoints.iter().all(|e| e.framework == Framework::FastApi));
}

#[test]
fn fastapi_path_defaults_to_root_when_absent() {
    let endpoints = FastApiDetector::new().detect(&parse("@app.get()\ndef root():\n    pass\n"), "api.py");
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].path, "/");
}

#[test]
fn flask_detector_ignores_fastapi_verb_decorators() {
    let endpoints = FlaskApiDetector::new().detect(&parse(FASTAPI_APP), "api.py");
    assert!(endpoints.is_empty());
}

const DJANGO_URLS: &str = r#"
from django.urls import path, re_path

from . import views

urlpatterns = [
    path("health/", views.health_view, name="health"),
    path("items/<int:item_id>/", views.ItemDetailView.as_view(), name="item-detail"),
    re_path(r"^legacy/$", views.legacy_view, name="legacy"),
]

urlpatterns += [
    path("status/", views.status_view),
]
"#;

#[test]
fn django_urlpatterns_emit_any_method_endpoints() {
    let endpoints = DjangoApiDetector::new().detect(&parse(DJANGO_URLS), "module/urls.py");
    assert_eq!(endpoints.len(), 4);
    assert!(endpoints.iter().all(|e| e.http_method == "ANY"));
    assert!(endpoints.iter().all(|e| e.framework == Framework::Django));

    let paths: Vec<&str> = endpoints.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/health/",
            "/items/<int:item_id>/",
            "^legacy/$",
            "/status/",
        ]
    );
}

#[test]
fn django_class_based_view_yields_class_name_and_route_name() {
    let endpoints = DjangoApiDetector::new().detect(&parse(DJANGO_URLS), "module/urls.py");
    let detail = endpoints
        .iter()
        .find(|e| e.path == "/items/<int:item_id>/")
        .expect("item detail endpoint");
    assert_eq!(detail.handler_name, "views.ItemDetailView.as_view");
    assert_eq!(detail.class_name.as_deref(), Some("views.ItemDetailView"));
    assert_eq!(
        detail.metadata.get("route_name"),
        Some(&MetaValue::Str("item-detail".to_string()))
    );
}

#[test]
fn django_function_views_have_no_class_name() {
    let endpoints = DjangoApiDetector::new().detect(&parse(DJANGO_URLS), "module/urls.py");
    let health = endpoints
        .iter()
        .find(|e| e.path == "/health/")
        .expect("health endpoint");
    assert_eq!(health.handler_name, "views.health_view");
    assert_eq!(health.class_name, None);
    assert_eq!(
        health.metadata.get("resolver"),
        Some(&MetaValue::Str("path".to_string()))
    );
}

#[test]
fn django_direct_single_call_assignment_is_crawled() {
    let source = r#"
urlpatterns = path("only/", views.only_view)
"#;
    let endpoints = DjangoApiDetector::new().detect(&parse(source), "urls.py");
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].path, "/only/");
}

#[test]
fn django_unrelated_assignments_are_ignored() {
    let source = r#"
routes = [path("x/", views.x_view)]
"#;
    let endpoints = DjangoApiDetector::new().detect(&parse(source), "urls.py");
    assert!(endpoints.is_empty());
}
