use crate::normalize;
use crate::LanguageRegistry;
use async_trait::async_trait;
use codemodel_core::{AstNode, AstParser, CodeModelError, Language, Result};
use dashmap::DashMap;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};
use tree_sitter::Parser;

#[derive(Clone)]
struct CachedParse {
    content_hash: String,
    ast: AstNode,
    lines: usize,
}

/// Parses source files into normalized ASTs.
///
/// Tree-sitter parsers are stateful, so a small pool of per-language parser
/// sets is recycled across calls instead of constructing one per file. A
/// content-hash cache skips re-normalizing files whose bytes are unchanged
/// between scans.
pub struct SourceParser {
    registry: Arc<LanguageRegistry>,
    parser_pool: Arc<Mutex<Vec<HashMap<Language, Parser>>>>,
    cache: Arc<DashMap<String, CachedParse>>,
}

impl Default for SourceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(LanguageRegistry::new()),
            parser_pool: Arc::new(Mutex::new(Vec::new())),
            cache: Arc::new(DashMap::new()),
        }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Parse and normalize one compilation unit.
    ///
    /// Fails with `UnsupportedLanguage` when no grammar is registered and
    /// with `Parse` when the tree contains syntax errors; partial ASTs are
    /// never emitted.
    pub fn parse_source(&self, language: Language, source: &str) -> Result<AstNode> {
        if !self.registry.has_parser(language) {
            return Err(CodeModelError::UnsupportedLanguage(language.to_string()));
        }
        let tree = self.with_parser(language, |parser| parser.parse(source, None))?;
        let tree = tree.ok_or_else(|| {
            CodeModelError::Parse(format!("tree-sitter produced no tree for {language}"))
        })?;
        if tree.root_node().has_error() {
            return Err(CodeModelError::Parse(format!(
                "syntax errors in {language} source"
            )));
        }
        normalize::normalize(language, &tree, source)
    }

    /// Read, detect, parse, and normalize one file. Invalid UTF-8 bytes are
    /// tolerated (lossy decode); unchanged files are served from the cache.
    pub async fn parse_path(&self, file_path: &str) -> Result<AstNode> {
        Ok(self.parse_path_with_stats(file_path).await?.0)
    }

    /// As `parse_path`, also reporting the file's line count for scan
    /// statistics.
    pub async fn parse_path_with_stats(&self, file_path: &str) -> Result<(AstNode, usize)> {
        let language = self
            .registry
            .detect_language(file_path)
            .ok_or_else(|| CodeModelError::UnsupportedLanguage(file_path.to_string()))?;
        if !self.registry.has_parser(language) {
            return Err(CodeModelError::UnsupportedLanguage(language.to_string()));
        }

        let bytes = tokio::fs::read(file_path).await?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        let content_hash = hash_content(&content);

        if let Some(cached) = self.cache.get(file_path) {
            if cached.content_hash == content_hash {
                trace!("cache hit for {file_path}");
                return Ok((cached.ast.clone(), cached.lines));
            }
        }

        debug!("parsing {file_path} ({language})");
        let lines = content.lines().count();
        let ast = self.parse_source(language, &content)?;
        self.cache.insert(
            file_path.to_string(),
            CachedParse {
                content_hash,
                ast: ast.clone(),
                lines,
            },
        );
        Ok((ast, lines))
    }

    fn with_parser<T>(
        &self,
        language: Language,
        f: impl FnOnce(&mut Parser) -> T,
    ) -> Result<T> {
        let mut set = self.parser_pool.lock().pop().unwrap_or_default();
        let parser = match set.entry(language) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(slot) => {
                let mut parser = Parser::new();
                parser
                    .set_language(&self.registry.grammar(language)?)
                    .map_err(|e| CodeModelError::Parse(e.to_string()))?;
                slot.insert(parser)
            }
        };
        let out = f(parser);
        self.parser_pool.lock().push(set);
        Ok(out)
    }
}

#[async_trait]
impl AstParser for SourceParser {
    async fn parse_file(&self, file_path: &str) -> Result<AstNode> {
        self.parse_path(file_path).await
    }

    fn supported_languages(&self) -> Vec<Language> {
        self.registry.parsed_languages()
    }
}

fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
