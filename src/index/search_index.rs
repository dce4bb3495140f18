use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::term_table::TermTable;
use crate::config::StemmerAlgorithm;
use crate::error::DocsearchError;
use crate::models::{Document, DocumentId};
use crate::Result;

/// Size summary of a loaded index
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub documents: usize,
    pub terms: usize,
    pub title_terms: usize,
    pub postings: usize,
}

/// Read-only search index: document registry plus term tables.
///
/// Every constructor validates the registry/posting invariants, so a value of
/// this type never holds a posting for an unknown document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchIndex {
    documents: Vec<Document>,
    terms: TermTable,
    title_terms: TermTable,
    stemmer: StemmerAlgorithm,
}

impl SearchIndex {
    /// An index with no documents. Every query against it finds nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble and validate an index from its parts
    pub fn from_parts(
        mut documents: Vec<Document>,
        mut terms: TermTable,
        mut title_terms: TermTable,
    ) -> Result<Self> {
        documents.sort_by_key(|d| d.id);
        if let Some(pair) = documents.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(DocsearchError::DuplicateDocument(pair[0].id));
        }

        terms.prune_empty();
        title_terms.prune_empty();

        let known: HashSet<DocumentId> = documents.iter().map(|d| d.id).collect();
        for table in [&terms, &title_terms] {
            for (token, list) in table.iter() {
                if token.is_empty() {
                    return Err(DocsearchError::EmptyToken);
                }
                for posting in list.iter() {
                    if !known.contains(&posting.doc) {
                        return Err(DocsearchError::DanglingPosting {
                            token: token.to_string(),
                            doc: posting.doc,
                        });
                    }
                    if !posting.weight.is_finite() || posting.weight < 0.0 {
                        return Err(DocsearchError::InvalidWeight {
                            token: token.to_string(),
                            weight: posting.weight,
                        });
                    }
                }
            }
        }

        Ok(Self {
            documents,
            terms,
            title_terms,
            stemmer: StemmerAlgorithm::default(),
        })
    }

    /// Record the stemmer that produced the index tokens
    pub fn with_stemmer(mut self, stemmer: StemmerAlgorithm) -> Self {
        self.stemmer = stemmer;
        self
    }

    /// Stemmer queries must use to reach the index tokens
    pub fn stemmer(&self) -> StemmerAlgorithm {
        self.stemmer
    }

    /// Look up a document in the registry
    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents
            .binary_search_by_key(&id, |d| d.id)
            .ok()
            .map(|pos| &self.documents[pos])
    }

    /// Documents in id order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn terms(&self) -> &TermTable {
        &self.terms
    }

    pub fn title_terms(&self) -> &TermTable {
        &self.title_terms
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.documents.len(),
            terms: self.terms.len(),
            title_terms: self.title_terms.len(),
            postings: self.terms.posting_count() + self.title_terms.posting_count(),
        }
    }
}
