use crate::java::{JavaCallAnalyzer, JavaImportAnalyzer, JavaSymbolAnalyzer};
use crate::python::{PythonCallAnalyzer, PythonImportAnalyzer, PythonSymbolAnalyzer};
use codemodel_core::{
    Artifact, AstAnalyzer, AstNode, CodeModelError, Language, Result,
};
use std::collections::HashMap;
use tracing::debug;

/// Language-keyed registry of semantic analyzers. Each registered analyzer
/// runs against every file of its language; the outputs concatenate in
/// registration order.
pub struct AnalyzerRegistry {
    analyzers: HashMap<Language, Vec<Box<dyn AstAnalyzer>>>,
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        let mut analyzers: HashMap<Language, Vec<Box<dyn AstAnalyzer>>> = HashMap::new();
        analyzers.insert(
            Language::Python,
            vec![
                Box::new(PythonSymbolAnalyzer::new()),
                Box::new(PythonImportAnalyzer::new()),
                Box::new(PythonCallAnalyzer::new()),
            ],
        );
        analyzers.insert(
            Language::Java,
            vec![
                Box::new(JavaSymbolAnalyzer::new()),
                Box::new(JavaImportAnalyzer::new()),
                Box::new(JavaCallAnalyzer::new()),
            ],
        );
        Self { analyzers }
    }

    pub fn register(&mut self, language: Language, analyzer: Box<dyn AstAnalyzer>) {
        self.analyzers.entry(language).or_default().push(analyzer);
    }

    pub fn analyze(
        &self,
        ast: &AstNode,
        file_path: &str,
        language: Language,
    ) -> Result<Vec<Artifact>> {
        let Some(analyzers) = self.analyzers.get(&language) else {
            return Err(CodeModelError::UnsupportedLanguage(format!(
                "no semantic analyzers for {language}"
            )));
        };
        let mut artifacts = Vec::new();
        for analyzer in analyzers {
            artifacts.extend(analyzer.analyze(ast, file_path));
        }
        debug!("{file_path}: {} semantic artifacts", artifacts.len());
        Ok(artifacts)
    }
}
