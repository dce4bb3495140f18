//! Invariant checking framework for search results
//!
//! Each invariant runs a set of sample queries against a [`Searcher`] and
//! reports the first violation it finds.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::search::Searcher;

/// A violation of an invariant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub invariant: String,
    pub description: String,
    pub query: String,
    pub context: HashMap<String, String>,
}

impl Violation {
    fn new(invariant: &str, query: &str, description: impl Into<String>) -> Self {
        Self {
            invariant: invariant.to_string(),
            description: description.into(),
            query: query.to_string(),
            context: HashMap::new(),
        }
    }

    fn with_context(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "INVARIANT VIOLATION: {}", self.invariant)?;
        writeln!(f, "  Description: {}", self.description)?;
        writeln!(f, "  Query: {:?}", self.query)?;
        if !self.context.is_empty() {
            writeln!(f, "  Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "    {}: {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// Trait for invariant checkers
pub trait Invariant: Send + Sync {
    /// Name of the invariant
    fn name(&self) -> &str;

    /// Check the invariant against the searcher using the sample queries
    fn check(&self, searcher: &Searcher, queries: &[&str]) -> Result<(), Violation>;

    /// Human-readable description
    fn description(&self) -> &str {
        "No description provided"
    }
}

/// Check all invariants and return violations
pub fn check_all_invariants(
    searcher: &Searcher,
    queries: &[&str],
    invariants: &[Box<dyn Invariant>],
) -> Vec<Violation> {
    invariants
        .iter()
        .filter_map(|invariant| invariant.check(searcher, queries).err())
        .collect()
}

/// Every invariant defined here
pub fn default_invariants() -> Vec<Box<dyn Invariant>> {
    vec![
        Box::new(NoDanglingReferences),
        Box::new(EmptyQueryFindsNothing),
        Box::new(IdempotentSearch),
        Box::new(MonotonicScoring),
        Box::new(RankingOrder),
    ]
}

/// Invariant: results only reference registered documents, with the
/// registry's title and path
pub struct NoDanglingReferences;

impl Invariant for NoDanglingReferences {
    fn name(&self) -> &str {
        "NoDanglingReferences"
    }

    fn description(&self) -> &str {
        "Every hit refers to a document in the registry"
    }

    fn check(&self, searcher: &Searcher, queries: &[&str]) -> Result<(), Violation> {
        for query in queries {
            for hit in searcher.search(query) {
                match searcher.index().document(hit.document_id) {
                    Some(doc) if doc.title == hit.title && doc.path == hit.path => {}
                    Some(_) => {
                        return Err(Violation::new(self.name(), query, "hit disagrees with registry")
                            .with_context("document_id", hit.document_id))
                    }
                    None => {
                        return Err(Violation::new(self.name(), query, "hit for unknown document")
                            .with_context("document_id", hit.document_id))
                    }
                }
            }
        }
        Ok(())
    }
}

/// Invariant: queries without usable tokens match nothing
pub struct EmptyQueryFindsNothing;

impl Invariant for EmptyQueryFindsNothing {
    fn name(&self) -> &str {
        "EmptyQueryFindsNothing"
    }

    fn description(&self) -> &str {
        "Queries that normalize to no tokens return no hits"
    }

    fn check(&self, searcher: &Searcher, queries: &[&str]) -> Result<(), Violation> {
        let fixed = ["", "   ", "?!.,;"];
        for query in fixed.iter().chain(queries.iter()) {
            if !searcher.tokenizer().query_terms(query).is_empty() {
                continue;
            }
            let hits = searcher.search(query);
            if !hits.is_empty() {
                return Err(Violation::new(self.name(), query, "token-free query returned hits")
                    .with_context("hits", hits.len()));
            }
        }
        Ok(())
    }
}

/// Invariant: repeating a query gives identical output
pub struct IdempotentSearch;

impl Invariant for IdempotentSearch {
    fn name(&self) -> &str {
        "IdempotentSearch"
    }

    fn description(&self) -> &str {
        "Identical queries on an unchanged index return identical results"
    }

    fn check(&self, searcher: &Searcher, queries: &[&str]) -> Result<(), Violation> {
        for query in queries {
            let first = searcher.search(query);
            let second = searcher.search(query);
            if first != second {
                return Err(Violation::new(self.name(), query, "repeated search differed"));
            }
        }
        Ok(())
    }
}

/// Invariant: removing words from a query never raises a document's score.
///
/// Sub-queries checked are every prefix, every single word, and every
/// query with one word left out.
pub struct MonotonicScoring;

impl MonotonicScoring {
    fn sub_queries(words: &[&str]) -> Vec<String> {
        let mut subs: Vec<String> = (0..words.len()).map(|len| words[..len].join(" ")).collect();
        subs.extend(words.iter().map(|word| word.to_string()));
        if words.len() > 2 {
            for skip in 0..words.len() {
                let rest: Vec<&str> = words
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, word)| *word)
                    .collect();
                subs.push(rest.join(" "));
            }
        }
        subs.sort();
        subs.dedup();
        subs
    }
}

impl Invariant for MonotonicScoring {
    fn name(&self) -> &str {
        "MonotonicScoring"
    }

    fn description(&self) -> &str {
        "A document's score for a query is at least its score for any sub-query"
    }

    fn check(&self, searcher: &Searcher, queries: &[&str]) -> Result<(), Violation> {
        for query in queries {
            let words: Vec<&str> = query.split_whitespace().collect();
            let full = searcher.score_documents(query);

            for sub_query in Self::sub_queries(&words) {
                for (doc, sub_score) in searcher.score_documents(&sub_query) {
                    let full_score = full.get(&doc).copied().unwrap_or(0.0);
                    if full_score < sub_score {
                        return Err(Violation::new(self.name(), query, "score dropped for superset query")
                            .with_context("sub_query", &sub_query)
                            .with_context("document_id", doc)
                            .with_context("sub_score", sub_score)
                            .with_context("full_score", full_score));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Invariant: hits are ordered by descending score, ties by ascending id
pub struct RankingOrder;

impl Invariant for RankingOrder {
    fn name(&self) -> &str {
        "RankingOrder"
    }

    fn description(&self) -> &str {
        "Hits are sorted by score, then by document id"
    }

    fn check(&self, searcher: &Searcher, queries: &[&str]) -> Result<(), Violation> {
        for query in queries {
            let hits = searcher.search(query);
            for pair in hits.windows(2) {
                let ordered = pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].document_id < pair[1].document_id);
                if !ordered {
                    return Err(Violation::new(self.name(), query, "hits out of order")
                        .with_context("first", pair[0].document_id)
                        .with_context("second", pair[1].document_id));
                }
            }
        }
        Ok(())
    }
}
