use serde::{Deserialize, Serialize};

use super::search_index::SearchIndex;
use super::term_table::TermTable;
use crate::config::StemmerAlgorithm;
use crate::error::DocsearchError;
use crate::models::{Document, PostingList};
use crate::Result;

/// Snapshot version for compatibility checking
pub const SNAPSHOT_VERSION: u32 = 2;

/// Binary form of a search index.
///
/// Term tables are stored as entry lists so that a repeated token is
/// reported on load rather than collapsed.
#[derive(Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub version: u32,
    pub stemmer: StemmerAlgorithm,
    pub documents: Vec<Document>,
    pub terms: Vec<(String, PostingList)>,
    pub title_terms: Vec<(String, PostingList)>,
}

impl IndexSnapshot {
    /// Capture an index at the current snapshot version
    pub fn new(index: &SearchIndex) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            stemmer: index.stemmer(),
            documents: index.documents().to_vec(),
            terms: index.terms().to_entries(),
            title_terms: index.title_terms().to_entries(),
        }
    }

    /// Serialize snapshot to bytes
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize snapshot from bytes
    pub fn from_bytes(data: &[u8]) -> std::result::Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }

    /// Check if this snapshot version is compatible
    pub fn is_compatible(&self) -> bool {
        self.version == SNAPSHOT_VERSION
    }

    /// Validate and convert into a searchable index
    pub fn into_index(self) -> Result<SearchIndex> {
        if !self.is_compatible() {
            return Err(DocsearchError::IncompatibleSnapshot {
                expected: SNAPSHOT_VERSION,
                actual: self.version,
            });
        }
        let terms = TermTable::from_entries(self.terms)?;
        let title_terms = TermTable::from_entries(self.title_terms)?;
        Ok(SearchIndex::from_parts(self.documents, terms, title_terms)?.with_stemmer(self.stemmer))
    }
}

impl SearchIndex {
    /// Encode the index as a versioned binary snapshot
    pub fn to_snapshot_bytes(&self) -> Result<Vec<u8>> {
        Ok(IndexSnapshot::new(self).to_bytes()?)
    }

    /// Decode and validate a binary snapshot
    pub fn from_snapshot_bytes(data: &[u8]) -> Result<Self> {
        IndexSnapshot::from_bytes(data)?.into_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Posting;

    fn sample_index() -> SearchIndex {
        let mut terms = TermTable::new();
        terms.add_posting("radar", Posting::new(0));
        terms.add_posting("swath", Posting::with_weight(1, 2.0));
        let mut title_terms = TermTable::new();
        title_terms.add_posting("plot", Posting::new(1));

        SearchIndex::from_parts(
            vec![
                Document::new(0, "Getting Started", "getting_started.rst"),
                Document::new(1, "Advanced Plotting", "advanced_plotting.rst"),
            ],
            terms,
            title_terms,
        )
        .unwrap()
    }

    #[test]
    fn test_snapshot_restores_index() {
        let index = sample_index();
        let bytes = index.to_snapshot_bytes().unwrap();
        let restored = SearchIndex::from_snapshot_bytes(&bytes).unwrap();

        assert_eq!(restored.stats(), index.stats());
        assert_eq!(restored.terms().get("swath").unwrap().weight_for(1), Some(2.0));
    }

    #[test]
    fn test_newer_snapshot_rejected() {
        let mut snapshot = IndexSnapshot::new(&sample_index());
        snapshot.version = SNAPSHOT_VERSION + 1;
        assert!(!snapshot.is_compatible());

        let bytes = snapshot.to_bytes().unwrap();
        let err = SearchIndex::from_snapshot_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            DocsearchError::IncompatibleSnapshot { expected, actual }
                if expected == SNAPSHOT_VERSION && actual == SNAPSHOT_VERSION + 1
        ));
    }

    #[derive(Serialize)]
    struct StoredSnapshot {
        version: u32,
        stemmer: StemmerAlgorithm,
        documents: Vec<Document>,
        terms: Vec<(String, Vec<Posting>)>,
        title_terms: Vec<(String, Vec<Posting>)>,
    }

    fn stored(terms: Vec<(String, Vec<Posting>)>) -> Vec<u8> {
        let snapshot = StoredSnapshot {
            version: SNAPSHOT_VERSION,
            stemmer: StemmerAlgorithm::English,
            documents: vec![
                Document::new(0, "Getting Started", "getting_started.rst"),
                Document::new(1, "Installation", "installation.rst"),
                Document::new(2, "Advanced Plotting", "advanced_plotting.rst"),
            ],
            terms,
            title_terms: Vec::new(),
        };
        bincode::serialize(&snapshot).unwrap()
    }

    #[test]
    fn test_unsorted_postings_normalized_on_load() {
        let postings: Vec<Posting> = [2, 0, 1, 0].into_iter().map(Posting::new).collect();
        let index = SearchIndex::from_snapshot_bytes(&stored(vec![("radar".to_string(), postings)])).unwrap();

        let radar = index.terms().get("radar").unwrap();
        assert_eq!(radar.doc_ids().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(radar.document_frequency(), 3);
        assert_eq!(radar.weight_for(2), Some(1.0));
        assert_eq!(index.stats().postings, 3);
    }

    #[test]
    fn test_repeated_token_rejected_on_load() {
        let terms = vec![
            ("radar".to_string(), vec![Posting::new(0)]),
            ("radar".to_string(), vec![Posting::new(1)]),
        ];
        assert!(matches!(
            SearchIndex::from_snapshot_bytes(&stored(terms)).unwrap_err(),
            DocsearchError::DuplicateToken(ref t) if t == "radar"
        ));
    }

    #[test]
    fn test_stemmer_survives_snapshot() {
        let index = sample_index().with_stemmer(StemmerAlgorithm::Porter);
        let restored = SearchIndex::from_snapshot_bytes(&index.to_snapshot_bytes().unwrap()).unwrap();
        assert_eq!(restored.stemmer(), StemmerAlgorithm::Porter);
        assert_eq!(restored, index);
    }

    #[test]
    fn test_truncated_snapshot_is_serialization_error() {
        let bytes = sample_index().to_snapshot_bytes().unwrap();
        let err = SearchIndex::from_snapshot_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, DocsearchError::Serialization(_)));
    }
}
