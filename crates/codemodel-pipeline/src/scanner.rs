use crate::ScanConfig;
use codemodel_core::{AnalysisArtifacts, ArtifactStore, AstNode, CodeModelError, Language, Result};
use codemodel_endpoint::DetectorRegistry;
use codemodel_parser::{collect_source_files, SourceParser};
use codemodel_semantic::AnalyzerRegistry;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Counters for one scan. Failed files were seen but could not be parsed;
/// skipped files carry a recognized extension with no parser behind it.
#[derive(Debug, Clone, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub parsed_files: usize,
    pub failed_files: usize,
    pub skipped_files: usize,
    pub total_lines: usize,
    pub duration: Duration,
    pub files_per_second: f64,
}

enum FileOutcome {
    Parsed { lines: usize },
    Skipped,
    Failed,
}

/// Drives the per-file pipeline: collect → parse → normalize → extract →
/// detect → store. Files are processed concurrently at file granularity;
/// the artifact store is the only shared mutable state and appends in
/// arrival order.
pub struct RepositoryScanner {
    parser: Arc<SourceParser>,
    analyzers: Arc<AnalyzerRegistry>,
    detectors: Arc<DetectorRegistry>,
    config: ScanConfig,
}

impl Default for RepositoryScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryScanner {
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self {
            parser: Arc::new(SourceParser::new()),
            analyzers: Arc::new(AnalyzerRegistry::new()),
            detectors: Arc::new(DetectorRegistry::new()),
            config,
        }
    }

    /// Scan every supported source file under `dir` into `store`.
    ///
    /// Single-file failures are logged and counted, never fatal.
    pub async fn scan_directory(
        &self,
        dir: &str,
        store: &ArtifactStore,
    ) -> Result<ScanStatistics> {
        let start_time = Instant::now();
        info!("scanning directory {dir}");

        let mut files = {
            let dir = Path::new(dir).to_path_buf();
            let config = self.config.collection_config();
            let parser = self.parser.clone();
            tokio::task::spawn_blocking(move || {
                collect_source_files(&dir, parser.registry(), &config)
            })
            .await
            .map_err(|e| CodeModelError::InvalidOperation(e.to_string()))??
        };
        // Schedule big files first to reduce tail latency.
        files.sort_by(|a, b| b.1.cmp(&a.1));
        let total_files = files.len();
        info!("found {total_files} source files");

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_files.max(1)));
        let mut outcomes = stream::iter(files.into_iter().map(|(path, _)| {
            let semaphore = semaphore.clone();
            async move {
                let _permit = semaphore.acquire().await;
                self.process_file(&path.to_string_lossy(), store).await
            }
        }))
        .buffer_unordered(self.config.max_concurrent_files.max(1));

        let mut stats = ScanStatistics {
            total_files,
            ..Default::default()
        };
        while let Some(outcome) = outcomes.next().await {
            match outcome {
                FileOutcome::Parsed { lines } => {
                    stats.parsed_files += 1;
                    stats.total_lines += lines;
                }
                FileOutcome::Skipped => stats.skipped_files += 1,
                FileOutcome::Failed => stats.failed_files += 1,
            }
        }

        stats.duration = start_time.elapsed();
        let secs = stats.duration.as_secs_f64();
        stats.files_per_second = if secs > 0.0 {
            stats.parsed_files as f64 / secs
        } else {
            0.0
        };
        info!(
            "scan complete: {}/{} parsed, {} failed, {} skipped in {:.2?}",
            stats.parsed_files, stats.total_files, stats.failed_files, stats.skipped_files,
            stats.duration
        );
        Ok(stats)
    }

    /// Convenience: scan a directory and return an owned snapshot.
    pub async fn scan_to_snapshot(&self, dir: &str) -> Result<AnalysisArtifacts> {
        let store = ArtifactStore::new();
        self.scan_directory(dir, &store).await?;
        Ok(store.snapshot())
    }

    /// Run the per-file pipeline on an in-memory source.
    pub fn scan_source(
        &self,
        file_path: &str,
        language: Language,
        source: &str,
        store: &ArtifactStore,
    ) -> Result<()> {
        let ast = self.parser.parse_source(language, source)?;
        self.store_artifacts(&ast, file_path, language, store)
    }

    async fn process_file(&self, file_path: &str, store: &ArtifactStore) -> FileOutcome {
        let Some(language) = self.parser.registry().detect_language(file_path) else {
            return FileOutcome::Skipped;
        };
        if !self.parser.registry().has_parser(language) {
            debug!("no parser for {language}, skipping {file_path}");
            return FileOutcome::Skipped;
        }

        let (ast, lines) = match self.parser.parse_path_with_stats(file_path).await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("failed to parse {file_path}: {e}");
                return FileOutcome::Failed;
            }
        };

        match self.store_artifacts(&ast, file_path, language, store) {
            Ok(()) => FileOutcome::Parsed { lines },
            Err(e) => {
                warn!("failed to analyze {file_path}: {e}");
                FileOutcome::Failed
            }
        }
    }

    fn store_artifacts(
        &self,
        ast: &AstNode,
        file_path: &str,
        language: Language,
        store: &ArtifactStore,
    ) -> Result<()> {
        let artifacts = self.analyzers.analyze(ast, file_path, language)?;
        store.add_artifacts(artifacts);
        let endpoints = self.detectors.detect(ast, file_path, language);
        if !endpoints.is_empty() {
            store.add_endpoints(endpoints);
        }
        Ok(())
    }
}
