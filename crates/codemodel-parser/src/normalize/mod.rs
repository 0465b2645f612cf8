pub mod java;
pub mod python;

use codemodel_core::{AstNode, CodeModelError, Language, Result};
use tree_sitter::Tree;

pub use java::JavaNormalizer;
pub use python::PythonNormalizer;

/// Lower a grammar tree into the shared AST schema.
pub fn normalize(language: Language, tree: &Tree, source: &str) -> Result<AstNode> {
    match language {
        Language::Python => Ok(PythonNormalizer::new(source).normalize(tree)),
        Language::Java => Ok(JavaNormalizer::new(source).normalize(tree)),
        other => Err(CodeModelError::UnsupportedLanguage(other.to_string())),
    }
}
