use codemodel_core::{AstParser, Language, NodeType};
use codemodel_parser::SourceParser;
use std::fs::File;
use std::io::Write;

fn write_temp_file(ext: &str, content: &[u8]) -> std::path::PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("test.{}", ext));
    // Keep dir alive by leaking it; OS cleans up after process
    std::mem::forget(dir);
    let mut f = File::create(&path).unwrap();
    f.write_all(content).unwrap();
    path
}

#[tokio::test]
async fn parses_python_file_from_disk() {
    let parser = SourceParser::new();
    let path = write_temp_file("py", b"def add(a, b):\n    return a + b\n");
    let ast = parser.parse_file(path.to_str().unwrap()).await.unwrap();
    assert_eq!(ast.node_type, NodeType::Module);
    assert_eq!(ast.children.len(), 1);
}

#[tokio::test]
async fn invalid_utf8_bytes_are_tolerated() {
    let parser = SourceParser::new();
    let mut content = b"x = \"caf".to_vec();
    content.push(0xE9); // lone latin-1 byte
    content.extend_from_slice(b"\"\n");
    let path = write_temp_file("py", &content);
    let ast = parser.parse_file(path.to_str().unwrap()).await;
    assert!(ast.is_ok(), "lossy decode should salvage the file: {ast:?}");
}

#[tokio::test]
async fn unsupported_extension_is_an_explicit_skip_signal() {
    let parser = SourceParser::new();
    let path = write_temp_file("md", b"# readme\n");
    let err = parser.parse_file(path.to_str().unwrap()).await;
    assert!(err.is_err());
}

#[tokio::test]
async fn c_files_are_recognized_but_have_no_parser() {
    let parser = SourceParser::new();
    let path = write_temp_file("c", b"int main(void) { return 0; }\n");
    let err = parser.parse_file(path.to_str().unwrap()).await;
    assert!(err.is_err());
    assert_eq!(
        parser.supported_languages(),
        vec![Language::Python, Language::Java]
    );
}

#[tokio::test]
async fn unchanged_files_hit_the_cache() {
    let parser = SourceParser::new();
    let path = write_temp_file("py", b"value = 1\n");
    let first = parser.parse_file(path.to_str().unwrap()).await.unwrap();
    let second = parser.parse_file(path.to_str().unwrap()).await.unwrap();
    assert_eq!(first, second);
}
