pub mod api_deps;
pub mod function_deps;
pub mod module_deps;

pub use api_deps::ApiDependencyAnalyzer;
pub use function_deps::FunctionDependencyAnalyzer;
pub use module_deps::ModuleDependencyAnalyzer;

use codemodel_core::{AnalysisArtifacts, Dependency, DependencyAnalyzer};

/// The configured set of dependency analyzers, run in order over one
/// snapshot. Each family deduplicates independently.
pub struct DependencyAnalyzerSet {
    analyzers: Vec<Box<dyn DependencyAnalyzer>>,
}

impl Default for DependencyAnalyzerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyAnalyzerSet {
    pub fn new() -> Self {
        Self {
            analyzers: vec![
                Box::new(ModuleDependencyAnalyzer::new()),
                Box::new(FunctionDependencyAnalyzer::new()),
                Box::new(ApiDependencyAnalyzer::new()),
            ],
        }
    }

    pub fn with_analyzers(analyzers: Vec<Box<dyn DependencyAnalyzer>>) -> Self {
        Self { analyzers }
    }

    pub fn analyze(&self, artifacts: &AnalysisArtifacts) -> Vec<Dependency> {
        let dependencies: Vec<Dependency> = self
            .analyzers
            .iter()
            .flat_map(|analyzer| analyzer.analyze(artifacts))
            .collect();
        tracing::debug!("derived {} dependency edges", dependencies.len());
        dependencies
    }
}
