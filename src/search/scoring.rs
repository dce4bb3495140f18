//! Score accumulation and ranking

use ordered_float::OrderedFloat;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::models::{DocumentId, PostingList};

/// Per-document contributions of a single query token.
///
/// Within one token a document keeps its best contribution, so a token never
/// counts twice for the same document through different index entries.
#[derive(Debug, Default)]
pub struct TokenScores {
    scores: HashMap<DocumentId, f32>,
}

impl TokenScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer every posting of a list, scaled by `multiplier`
    pub fn offer_list(&mut self, list: &PostingList, multiplier: f32) {
        for posting in list.iter() {
            self.offer(posting.doc, multiplier * posting.weight);
        }
    }

    /// Keep the larger of the current and offered contribution
    pub fn offer(&mut self, doc: DocumentId, score: f32) {
        self.scores
            .entry(doc)
            .and_modify(|s| {
                if score > *s {
                    *s = score;
                }
            })
            .or_insert(score);
    }

    pub fn contains(&self, doc: DocumentId) -> bool {
        self.scores.contains_key(&doc)
    }

    /// Fold in another set of contributions for the same token
    pub fn absorb(&mut self, other: TokenScores) {
        for (doc, score) in other.scores {
            self.offer(doc, score);
        }
    }
}

/// Running document scores for a whole query
#[derive(Debug, Default)]
pub struct ScoreBoard {
    scores: HashMap<DocumentId, f32>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one token's contributions
    pub fn add(&mut self, token: TokenScores) {
        for (doc, score) in token.scores {
            *self.scores.entry(doc).or_insert(0.0) += score;
        }
    }

    pub fn get(&self, doc: DocumentId) -> Option<f32> {
        self.scores.get(&doc).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn into_scores(self) -> HashMap<DocumentId, f32> {
        self.scores
    }
}

/// Heap entry ordered by score, then by lower document id
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ScoreEntry {
    score: OrderedFloat<f32>,
    doc_id: DocumentId,
}

impl Ord for ScoreEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.doc_id.cmp(&self.doc_id))
    }
}

impl PartialOrd for ScoreEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Highest scores first, ties by ascending document id. `None` keeps all.
pub fn rank(scores: HashMap<DocumentId, f32>, top_k: Option<usize>) -> Vec<(DocumentId, f32)> {
    let top_k = top_k.unwrap_or(scores.len());
    if top_k == 0 || scores.is_empty() {
        return Vec::new();
    }

    let mut heap: BinaryHeap<Reverse<ScoreEntry>> = BinaryHeap::with_capacity(top_k + 1);
    for (doc_id, score) in scores {
        let entry = ScoreEntry {
            score: OrderedFloat(score),
            doc_id,
        };
        if heap.len() < top_k {
            heap.push(Reverse(entry));
        } else if let Some(min) = heap.peek() {
            if entry > min.0 {
                heap.pop();
                heap.push(Reverse(entry));
            }
        }
    }

    let mut results: Vec<ScoreEntry> = heap.into_iter().map(|Reverse(entry)| entry).collect();
    results.sort_by(|a, b| b.cmp(a));
    results
        .into_iter()
        .map(|entry| (entry.doc_id, entry.score.0))
        .collect()
}
