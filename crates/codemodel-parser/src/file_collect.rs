use crate::LanguageRegistry;
use codemodel_core::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration for file collection.
#[derive(Debug, Clone)]
pub struct FileCollectionConfig {
    pub recursive: bool,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    /// Files larger than this are skipped. `None` disables the cap.
    pub max_file_size: Option<u64>,
}

impl Default for FileCollectionConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            include_patterns: vec![],
            exclude_patterns: vec![],
            max_file_size: Some(2 * 1024 * 1024),
        }
    }
}

const DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git/**",
    "**/target/**",
    "**/node_modules/**",
    "**/build/**",
    "**/dist/**",
    "**/__pycache__/**",
    "**/.pytest_cache/**",
    "**/.venv/**",
];

/// Collect source files with a supported extension under `dir`, returning
/// paths with their sizes. Walker errors are logged and skipped.
pub fn collect_source_files(
    dir: &Path,
    registry: &LanguageRegistry,
    config: &FileCollectionConfig,
) -> Result<Vec<(PathBuf, u64)>> {
    let mut combined_excludes: Vec<String> =
        DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
    combined_excludes.extend(config.exclude_patterns.clone());

    let exclude_set = build_globset(&combined_excludes);
    let include_set = if config.include_patterns.is_empty() {
        None
    } else {
        build_globset(&config.include_patterns)
    };

    let mut walker_builder = WalkBuilder::new(dir);
    walker_builder
        .hidden(false)
        .git_ignore(true)
        .git_exclude(true)
        .ignore(true);
    if !config.recursive {
        walker_builder.max_depth(Some(1));
    }

    let extensions = registry.supported_extensions();
    let mut paths = Vec::new();

    for dent in walker_builder.build() {
        let dent = match dent {
            Ok(d) => d,
            Err(e) => {
                warn!("walker error: {e}");
                continue;
            }
        };
        let path = dent.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ref set) = exclude_set {
            if set.is_match(path) {
                continue;
            }
        }
        if let Some(ref set) = include_set {
            if !set.is_match(path) {
                continue;
            }
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| extensions.iter().any(|known| ext.eq_ignore_ascii_case(known)))
            .unwrap_or(false);
        if !supported {
            continue;
        }
        let size = dent.metadata().map(|m| m.len()).unwrap_or(0);
        if let Some(cap) = config.max_file_size {
            if size > cap {
                debug!("skipping oversized file {:?} ({size} bytes)", path);
                continue;
            }
        }
        paths.push((path.to_path_buf(), size));
    }

    debug!("collected {} source files under {:?}", paths.len(), dir);
    Ok(paths)
}

fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut added = false;
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
                added = true;
            }
            Err(e) => warn!("invalid glob pattern {pattern:?}: {e}"),
        }
    }
    if !added {
        return None;
    }
    builder.build().ok()
}
