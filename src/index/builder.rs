use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::search_index::SearchIndex;
use super::term_table::TermTable;
use crate::config::{StemmerAlgorithm, TokenizerConfig};
use crate::models::{Document, DocumentId, Posting};
use crate::tokenizer::Tokenizer;
use crate::Result;

/// Source file extensions picked up by [`IndexBuilder::add_dir`]
pub const SOURCE_EXTENSIONS: &[&str] = &["rst", "md", "txt"];

/// Offline index construction.
///
/// Body tokens land in the term table and title tokens in the title term
/// table. A token is recorded once per document with weight 1.0, however
/// often it occurs.
pub struct IndexBuilder {
    tokenizer: Tokenizer,
    stemmer: StemmerAlgorithm,
    documents: Vec<Document>,
    terms: TermTable,
    title_terms: TermTable,
}

impl IndexBuilder {
    pub fn new(config: &TokenizerConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(config),
            stemmer: config.stemmer,
            documents: Vec::new(),
            terms: TermTable::new(),
            title_terms: TermTable::new(),
        }
    }

    /// Add a document and return its id. Ids are assigned from 0 in call order.
    pub fn add_document(&mut self, title: &str, path: &str, body: &str) -> DocumentId {
        let id = self.documents.len() as DocumentId;

        for token in self.tokenizer.unique_terms(body) {
            self.terms.add_posting(&token, Posting::new(id));
        }
        for token in self.tokenizer.unique_terms(title) {
            self.title_terms.add_posting(&token, Posting::new(id));
        }

        debug!(id, title, path, "indexed document");
        self.documents.push(Document::new(id, title, path));
        id
    }

    /// Add every source file under `dir`, visiting paths in sorted order.
    /// Symbolic links are not followed.
    ///
    /// The title is the first non-empty line with heading markup removed;
    /// the path is relative to `dir` with `/` separators.
    pub fn add_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut files = collect_source_files(dir)?;
        files.sort();

        for file in &files {
            let body = std::fs::read_to_string(file)?;
            let relative = file.strip_prefix(dir).unwrap_or(file);
            let path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let title = extract_title(&body).unwrap_or_else(|| path.clone());
            self.add_document(&title, &path, &body);
        }

        info!(dir = %dir.display(), files = files.len(), "indexed source directory");
        Ok(files.len())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Finish building and validate the result
    pub fn build(self) -> Result<SearchIndex> {
        let index = SearchIndex::from_parts(self.documents, self.terms, self.title_terms)?
            .with_stemmer(self.stemmer);
        let stats = index.stats();
        info!(
            documents = stats.documents,
            terms = stats.terms,
            title_terms = stats.title_terms,
            "built search index"
        );
        Ok(index)
    }
}

fn collect_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_source = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| SOURCE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_source {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// First non-empty line that is not pure heading underline, stripped of
/// `#`, `=`, `-` and `*` markup.
pub fn extract_title(text: &str) -> Option<String> {
    text.lines()
        .map(|line| line.trim_matches(|c: char| c.is_whitespace() || matches!(c, '#' | '=' | '-' | '*')))
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
