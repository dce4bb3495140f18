//! JSON exchange format for search indices
//!
//! ```json
//! {
//!   "documents": [{"id": 2, "title": "Installation", "path": "installation.html"}],
//!   "terms": {"install": [2, {"doc": 2, "weight": 1.5}]},
//!   "title_terms": {"instal": [2]},
//!   "stemmer": "porter"
//! }
//! ```
//!
//! A posting is a bare document id (weight 1.0) or a `{doc, weight}` object.
//! Term maps are read as ordered entry lists so that a repeated token key is
//! reported instead of silently overwriting the earlier list. `stemmer` names
//! the algorithm the keys were stemmed with and defaults to `english`.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::search_index::SearchIndex;
use super::term_table::TermTable;
use crate::config::StemmerAlgorithm;
use crate::models::{Document, DocumentId, Posting, PostingList};
use crate::Result;

/// One posting as written in JSON
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostingEntry {
    Id(DocumentId),
    Weighted(Posting),
}

impl From<PostingEntry> for Posting {
    fn from(entry: PostingEntry) -> Self {
        match entry {
            PostingEntry::Id(doc) => Posting::new(doc),
            PostingEntry::Weighted(posting) => posting,
        }
    }
}

impl From<&Posting> for PostingEntry {
    fn from(posting: &Posting) -> Self {
        if posting.weight == 1.0 {
            PostingEntry::Id(posting.doc)
        } else {
            PostingEntry::Weighted(*posting)
        }
    }
}

/// Token map in file order, duplicates preserved
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTermMap(pub Vec<(String, Vec<PostingEntry>)>);

impl<'de> Deserialize<'de> for RawTermMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawTermMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from token to a list of postings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<RawTermMap, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((token, postings)) = map.next_entry::<String, Vec<PostingEntry>>()? {
                    entries.push((token, postings));
                }
                Ok(RawTermMap(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl Serialize for RawTermMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (token, postings) in &self.0 {
            map.serialize_entry(token, postings)?;
        }
        map.end()
    }
}

impl RawTermMap {
    fn into_table(self) -> Result<TermTable> {
        TermTable::from_entries(self.0.into_iter().map(|(token, postings)| {
            let list: PostingList = postings.into_iter().map(Posting::from).collect();
            (token, list)
        }))
    }

    fn from_table(table: &TermTable) -> Self {
        RawTermMap(
            table
                .iter()
                .map(|(token, list)| (token.to_string(), list.iter().map(PostingEntry::from).collect()))
                .collect(),
        )
    }
}

/// Serialized form of a search index
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IndexFile {
    pub documents: Vec<Document>,
    pub terms: RawTermMap,
    #[serde(default)]
    pub title_terms: RawTermMap,
    #[serde(default)]
    pub stemmer: StemmerAlgorithm,
}

impl IndexFile {
    /// Validate and convert into a searchable index
    pub fn into_index(self) -> Result<SearchIndex> {
        let terms = self.terms.into_table()?;
        let title_terms = self.title_terms.into_table()?;
        Ok(SearchIndex::from_parts(self.documents, terms, title_terms)?.with_stemmer(self.stemmer))
    }
}

impl From<&SearchIndex> for IndexFile {
    fn from(index: &SearchIndex) -> Self {
        IndexFile {
            documents: index.documents().to_vec(),
            terms: RawTermMap::from_table(index.terms()),
            title_terms: RawTermMap::from_table(index.title_terms()),
            stemmer: index.stemmer(),
        }
    }
}

impl SearchIndex {
    /// Parse and validate an index from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: IndexFile = serde_json::from_str(json)?;
        file.into_index()
    }

    /// Parse and validate an index from a JSON reader
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let file: IndexFile = serde_json::from_reader(reader)?;
        file.into_index()
    }

    /// Render the index in the JSON exchange format
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&IndexFile::from(self))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocsearchError;

    const FIXTURE: &str = r#"{
        "documents": [
            {"id": 1, "title": "Getting Started", "path": "getting_started.html"},
            {"id": 2, "title": "Installation", "path": "installation.html"}
        ],
        "terms": {
            "install": [2],
            "start": [1, {"doc": 2, "weight": 0.5}]
        }
    }"#;

    #[test]
    fn test_parse_fixture() {
        let index = SearchIndex::from_json_str(FIXTURE).unwrap();
        assert_eq!(index.documents().len(), 2);
        assert!(index.title_terms().is_empty());
        assert_eq!(index.stemmer(), StemmerAlgorithm::English);

        let start = index.terms().get("start").unwrap();
        assert_eq!(start.weight_for(1), Some(1.0));
        assert_eq!(start.weight_for(2), Some(0.5));
    }

    #[test]
    fn test_duplicate_token_key_rejected() {
        let json = r#"{
            "documents": [{"id": 0, "title": "Index", "path": "index.html"}],
            "terms": {"radar": [0], "radar": [0]}
        }"#;
        let err = SearchIndex::from_json_str(json).unwrap_err();
        assert!(matches!(err, DocsearchError::DuplicateToken(ref t) if t == "radar"));
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let json = r#"{
            "documents": [{"id": 0, "title": "Index", "path": "index.html"}],
            "terms": {"radar": [0, 4]}
        }"#;
        let err = SearchIndex::from_json_str(json).unwrap_err();
        assert!(matches!(err, DocsearchError::DanglingPosting { doc: 4, .. }));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = SearchIndex::from_json_str("{\"documents\": [").unwrap_err();
        assert!(matches!(err, DocsearchError::Json(_)));

        let err = SearchIndex::from_json_str(r#"{"terms": {}}"#).unwrap_err();
        assert!(matches!(err, DocsearchError::Json(_)));
    }

    #[test]
    fn test_json_output_uses_compact_postings() {
        let index = SearchIndex::from_json_str(FIXTURE).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&index.to_json_string().unwrap()).unwrap();

        assert_eq!(value["terms"]["install"], serde_json::json!([2]));
        assert_eq!(
            value["terms"]["start"],
            serde_json::json!([1, {"doc": 2, "weight": 0.5}])
        );
        assert_eq!(SearchIndex::from_json_reader(index.to_json_string().unwrap().as_bytes()).unwrap(), index);
    }

    #[test]
    fn test_stemmer_written_and_read() {
        let index = SearchIndex::from_json_str(FIXTURE)
            .unwrap()
            .with_stemmer(StemmerAlgorithm::Porter);
        let json = index.to_json_string().unwrap();
        assert!(json.contains(r#""stemmer": "porter""#));
        assert_eq!(SearchIndex::from_json_str(&json).unwrap().stemmer(), StemmerAlgorithm::Porter);
    }

    #[test]
    fn test_unsorted_postings_normalized() {
        let json = r#"{
            "documents": [
                {"id": 0, "title": "Index", "path": "index.html"},
                {"id": 1, "title": "Installation", "path": "installation.html"}
            ],
            "terms": {"radar": [1, 0, {"doc": 1, "weight": 2.0}]}
        }"#;
        let radar = SearchIndex::from_json_str(json).unwrap().terms().get("radar").cloned().unwrap();
        assert_eq!(radar.doc_ids().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(radar.weight_for(1), Some(2.0));
    }
}
