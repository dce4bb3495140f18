use serde::{Deserialize, Serialize};

/// Document identifier, positional in the generated index
pub type DocumentId = u32;

/// An indexed page or section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub path: String,
}

impl Document {
    pub fn new(id: DocumentId, title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            path: path.into(),
        }
    }
}

fn default_weight() -> f32 {
    1.0
}

/// Association between a token and a document
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc: DocumentId,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

impl Posting {
    pub fn new(doc: DocumentId) -> Self {
        Self { doc, weight: 1.0 }
    }

    pub fn with_weight(doc: DocumentId, weight: f32) -> Self {
        Self { doc, weight }
    }
}

/// Postings for a single token, kept sorted by document id.
///
/// Deserialization goes through [`PostingList::add`], so decoded lists are
/// sorted and free of repeated documents whatever order they were stored in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Posting>", into = "Vec<Posting>")]
pub struct PostingList {
    postings: Vec<Posting>,
}

impl PostingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a posting. A document already present keeps the larger weight.
    pub fn add(&mut self, posting: Posting) {
        match self
            .postings
            .binary_search_by(|p| p.doc.cmp(&posting.doc))
        {
            Ok(pos) => {
                let existing = &mut self.postings[pos];
                if posting.weight > existing.weight {
                    existing.weight = posting.weight;
                }
            }
            Err(pos) => self.postings.insert(pos, posting),
        }
    }

    /// Weight recorded for a document, if it has a posting
    pub fn weight_for(&self, doc: DocumentId) -> Option<f32> {
        self.postings
            .binary_search_by(|p| p.doc.cmp(&doc))
            .ok()
            .map(|pos| self.postings[pos].weight)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Posting> {
        self.postings.iter()
    }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.postings.iter().map(|p| p.doc)
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Number of documents containing this token
    pub fn document_frequency(&self) -> usize {
        self.postings.len()
    }
}

impl FromIterator<Posting> for PostingList {
    fn from_iter<I: IntoIterator<Item = Posting>>(iter: I) -> Self {
        let mut list = PostingList::new();
        for posting in iter {
            list.add(posting);
        }
        list
    }
}

impl From<Vec<Posting>> for PostingList {
    fn from(postings: Vec<Posting>) -> Self {
        postings.into_iter().collect()
    }
}

impl From<PostingList> for Vec<Posting> {
    fn from(list: PostingList) -> Self {
        list.postings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_list_operations() {
        let mut list = PostingList::new();
        assert!(list.is_empty());

        list.add(Posting::new(3));
        list.add(Posting::new(1));
        list.add(Posting::with_weight(2, 0.5));
        assert_eq!(list.document_frequency(), 3);
        assert_eq!(list.doc_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(list.weight_for(2), Some(0.5));
        assert_eq!(list.weight_for(9), None);
    }

    #[test]
    fn test_duplicate_posting_keeps_larger_weight() {
        let mut list = PostingList::new();
        list.add(Posting::with_weight(4, 1.0));
        list.add(Posting::with_weight(4, 2.5));
        list.add(Posting::with_weight(4, 0.1));

        assert_eq!(list.document_frequency(), 1);
        assert_eq!(list.weight_for(4), Some(2.5));
    }

    #[test]
    fn test_deserialize_normalizes_order_and_duplicates() {
        let list: PostingList = serde_json::from_str(
            r#"[{"doc": 2}, {"doc": 0}, {"doc": 1, "weight": 0.5}, {"doc": 0, "weight": 3.0}]"#,
        )
        .unwrap();

        assert_eq!(list.doc_ids().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(list.document_frequency(), 3);
        assert_eq!(list.weight_for(0), Some(3.0));
        assert_eq!(list.weight_for(2), Some(1.0));
    }

    #[test]
    fn test_posting_default_weight_on_deserialize() {
        let posting: Posting = serde_json::from_str(r#"{"doc": 5}"#).unwrap();
        assert_eq!(posting, Posting::new(5));
    }
}
