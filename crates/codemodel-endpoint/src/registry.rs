use crate::{DjangoApiDetector, EndpointDetector, FastApiDetector, FlaskApiDetector, SpringApiDetector};
use codemodel_core::{ApiEndpoint, AstNode, Language};
use std::collections::HashMap;

/// Language-keyed registry of endpoint detectors. Every detector of a
/// language runs against every file of that language; languages without
/// detectors yield nothing.
pub struct DetectorRegistry {
    detectors: HashMap<Language, Vec<Box<dyn EndpointDetector>>>,
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorRegistry {
    pub fn new() -> Self {
        let mut detectors: HashMap<Language, Vec<Box<dyn EndpointDetector>>> = HashMap::new();
        detectors.insert(
            Language::Python,
            vec![
                Box::new(FlaskApiDetector::new()),
                Box::new(FastApiDetector::new()),
                Box::new(DjangoApiDetector::new()),
            ],
        );
        detectors.insert(Language::Java, vec![Box::new(SpringApiDetector::new())]);
        Self { detectors }
    }

    pub fn register(&mut self, language: Language, detector: Box<dyn EndpointDetector>) {
        self.detectors.entry(language).or_default().push(detector);
    }

    pub fn detect(&self, ast: &AstNode, file_path: &str, language: Language) -> Vec<ApiEndpoint> {
        let Some(detectors) = self.detectors.get(&language) else {
            return Vec::new();
        };
        let endpoints: Vec<ApiEndpoint> = detectors
            .iter()
            .flat_map(|detector| detector.detect(ast, file_path))
            .collect();
        if !endpoints.is_empty() {
            tracing::debug!("{file_path}: {} endpoints detected", endpoints.len());
        }
        endpoints
    }
}
