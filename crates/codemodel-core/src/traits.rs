use crate::{AnalysisArtifacts, Artifact, AstNode, Dependency, DriftFinding, Language, Result};
use async_trait::async_trait;

/// Parses one source file into the normalized AST schema.
#[async_trait]
pub trait AstParser {
    async fn parse_file(&self, file_path: &str) -> Result<AstNode>;
    fn supported_languages(&self) -> Vec<Language>;
}

/// Walks a normalized AST and emits artifacts. One registry hosts both
/// semantic extractors and endpoint detectors behind this contract.
pub trait AstAnalyzer: Send + Sync {
    fn analyze(&self, ast: &AstNode, file_path: &str) -> Vec<Artifact>;
}

/// Pure transform from a complete artifact snapshot to one family of
/// dependency edges.
pub trait DependencyAnalyzer: Send + Sync {
    fn analyze(&self, artifacts: &AnalysisArtifacts) -> Vec<Dependency>;
}

/// One drift rule. Rules are independent and order-insensitive; output is
/// a pure function of the two snapshots.
pub trait DriftRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(
        &self,
        baseline: &AnalysisArtifacts,
        current: &AnalysisArtifacts,
    ) -> Vec<DriftFinding>;
}
