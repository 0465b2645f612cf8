use codemodel_core::{CodeModelError, Language, Result};
use std::path::Path;

/// Maps file extensions to languages and languages to grammars.
///
/// Every extension in the table is recognized; only Python and Java carry
/// a grammar. Asking for a parser for the others is the explicit
/// "no parser" signal the driver turns into a skip.
#[derive(Debug, Default)]
pub struct LanguageRegistry;

const EXTENSION_TABLE: &[(&str, Language)] = &[
    ("py", Language::Python),
    ("java", Language::Java),
    ("c", Language::C),
    ("h", Language::C),
    ("cpp", Language::Cpp),
    ("hpp", Language::Cpp),
];

impl LanguageRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn detect_language(&self, file_path: &str) -> Option<Language> {
        let ext = Path::new(file_path).extension()?.to_str()?;
        EXTENSION_TABLE
            .iter()
            .find(|(known, _)| ext.eq_ignore_ascii_case(known))
            .map(|(_, lang)| *lang)
    }

    pub fn has_parser(&self, language: Language) -> bool {
        matches!(language, Language::Python | Language::Java)
    }

    pub fn grammar(&self, language: Language) -> Result<tree_sitter::Language> {
        match language {
            Language::Python => Ok(tree_sitter_python::LANGUAGE.into()),
            Language::Java => Ok(tree_sitter_java::LANGUAGE.into()),
            other => Err(CodeModelError::UnsupportedLanguage(other.to_string())),
        }
    }

    pub fn parsed_languages(&self) -> Vec<Language> {
        vec![Language::Python, Language::Java]
    }

    /// Extensions the file collector should pick up.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        EXTENSION_TABLE.iter().map(|(ext, _)| *ext).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_extension() {
        let registry = LanguageRegistry::new();
        assert_eq!(registry.detect_language("pkg/app.py"), Some(Language::Python));
        assert_eq!(registry.detect_language("A.java"), Some(Language::Java));
        assert_eq!(registry.detect_language("x.h"), Some(Language::C));
        assert_eq!(registry.detect_language("x.hpp"), Some(Language::Cpp));
        assert_eq!(registry.detect_language("readme.md"), None);
        assert_eq!(registry.detect_language("Makefile"), None);
    }

    #[test]
    fn c_family_has_no_parser() {
        let registry = LanguageRegistry::new();
        assert!(registry.has_parser(Language::Python));
        assert!(registry.has_parser(Language::Java));
        assert!(!registry.has_parser(Language::C));
        assert!(!registry.has_parser(Language::Cpp));
        assert!(registry.grammar(Language::Cpp).is_err());
    }
}
