use codemodel_parser::FileCollectionConfig;
use serde::{Deserialize, Serialize};

/// Scan configuration. Defaults mirror a full recursive repository scan
/// with gitignore-aware walking and a per-file size cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub recursive: bool,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub max_file_size: Option<u64>,
    /// Upper bound on concurrently processed files.
    pub max_concurrent_files: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            include_patterns: vec![],
            exclude_patterns: vec![],
            max_file_size: Some(2 * 1024 * 1024),
            max_concurrent_files: num_cpus::get() * 2,
        }
    }
}

impl ScanConfig {
    pub(crate) fn collection_config(&self) -> FileCollectionConfig {
        FileCollectionConfig {
            recursive: self.recursive,
            include_patterns: self.include_patterns.clone(),
            exclude_patterns: self.exclude_patterns.clone(),
            max_file_size: self.max_file_size,
        }
    }
}
