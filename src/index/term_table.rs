use std::collections::BTreeMap;

use crate::error::DocsearchError;
use crate::models::{Posting, PostingList};
use crate::Result;

/// Token to posting list mapping. Iteration is in token order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TermTable {
    entries: BTreeMap<String, PostingList>,
}

impl TermTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored entries. A token listed twice is an error.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, PostingList)>) -> Result<Self> {
        let mut table = TermTable::new();
        for (token, list) in entries {
            if table.entries.contains_key(&token) {
                return Err(DocsearchError::DuplicateToken(token));
            }
            table.entries.insert(token, list);
        }
        Ok(table)
    }

    /// Entries in token order, the inverse of [`TermTable::from_entries`]
    pub fn to_entries(&self) -> Vec<(String, PostingList)> {
        self.entries
            .iter()
            .map(|(token, list)| (token.clone(), list.clone()))
            .collect()
    }

    pub fn get(&self, token: &str) -> Option<&PostingList> {
        self.entries.get(token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Record a posting, creating the token's list on first use
    pub fn add_posting(&mut self, token: &str, posting: Posting) {
        match self.entries.get_mut(token) {
            Some(list) => list.add(posting),
            None => {
                let mut list = PostingList::new();
                list.add(posting);
                self.entries.insert(token.to_string(), list);
            }
        }
    }

    /// Drop tokens whose posting lists are empty
    pub fn prune_empty(&mut self) {
        self.entries.retain(|_, list| !list.is_empty());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PostingList)> {
        self.entries.iter().map(|(token, list)| (token.as_str(), list))
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of postings across all tokens
    pub fn posting_count(&self) -> usize {
        self.entries.values().map(PostingList::document_frequency).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_posting_groups_by_token() {
        let mut table = TermTable::new();
        table.add_posting("radar", Posting::new(0));
        table.add_posting("radar", Posting::new(2));
        table.add_posting("swath", Posting::new(0));

        assert_eq!(table.len(), 2);
        assert_eq!(table.posting_count(), 3);
        assert_eq!(
            table.get("radar").unwrap().doc_ids().collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert!(table.get("missing").is_none());
    }

    #[test]
    fn test_tokens_sorted_and_prune() {
        let mut table = TermTable::from_entries(vec![
            ("zoom".to_string(), PostingList::from(vec![Posting::new(0)])),
            ("empty".to_string(), PostingList::new()),
            ("axi".to_string(), PostingList::from(vec![Posting::new(0)])),
        ])
        .unwrap();

        table.prune_empty();
        let tokens: Vec<&str> = table.iter().map(|(token, _)| token).collect();
        assert_eq!(tokens, vec!["axi", "zoom"]);
    }

    #[test]
    fn test_from_entries_rejects_repeated_token() {
        let list: PostingList = vec![Posting::new(0)].into_iter().collect();
        let entries = vec![
            ("radar".to_string(), list.clone()),
            ("radar".to_string(), list.clone()),
        ];
        assert!(matches!(
            TermTable::from_entries(entries),
            Err(DocsearchError::DuplicateToken(ref t)) if t == "radar"
        ));

        let table = TermTable::from_entries(vec![("swath".to_string(), list)]).unwrap();
        assert_eq!(TermTable::from_entries(table.to_entries()).unwrap(), table);
    }
}
