use std::path::Path;
use tracing::{info, warn};

use super::search_index::SearchIndex;
use crate::error::DocsearchError;
use crate::sphinx;
use crate::Result;

/// On-disk encodings of a search index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexFormat {
    /// The JSON exchange format
    Json,
    /// A documentation generator's `searchindex.js`
    Sphinx,
    /// Versioned bincode snapshot
    Snapshot,
}

impl IndexFormat {
    /// Pick a format from the file extension: `.json`, `.js`, anything else
    /// is a snapshot.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("json") => IndexFormat::Json,
            Some("js") => IndexFormat::Sphinx,
            _ => IndexFormat::Snapshot,
        }
    }
}

impl SearchIndex {
    /// Load and validate an index file.
    ///
    /// A file that cannot be read is reported as `IndexUnavailable`; content
    /// problems keep their specific error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = IndexFormat::from_path(path);
        let bytes = std::fs::read(path).map_err(|e| {
            DocsearchError::IndexUnavailable(format!("{}: {}", path.display(), e))
        })?;

        let index = match format {
            IndexFormat::Json => SearchIndex::from_json_reader(bytes.as_slice())?,
            IndexFormat::Sphinx => {
                let text = String::from_utf8(bytes).map_err(|e| {
                    DocsearchError::SphinxImport(format!("index is not UTF-8: {}", e))
                })?;
                sphinx::import_str(&text)?
            }
            IndexFormat::Snapshot => SearchIndex::from_snapshot_bytes(&bytes)?,
        };

        let stats = index.stats();
        info!(
            path = %path.display(),
            format = ?format,
            documents = stats.documents,
            terms = stats.terms,
            "loaded search index"
        );
        Ok(index)
    }

    /// Load an index, falling back to an empty one if it is missing or
    /// malformed. Searches against the fallback return no results.
    pub fn open_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match SearchIndex::open(path) {
            Ok(index) => index,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    corrupt = e.is_corrupt_index(),
                    "search index unavailable, serving no results"
                );
                SearchIndex::empty()
            }
        }
    }

    /// Write the index in the format implied by the file extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = match IndexFormat::from_path(path) {
            IndexFormat::Json => self.to_json_string()?.into_bytes(),
            IndexFormat::Snapshot => self.to_snapshot_bytes()?,
            IndexFormat::Sphinx => {
                return Err(DocsearchError::UnsupportedFormat(format!(
                    "cannot write searchindex.js output to {}",
                    path.display()
                )))
            }
        };
        std::fs::write(path, bytes)?;
        info!(path = %path.display(), "saved search index");
        Ok(())
    }
}
