use serde::{Deserialize, Serialize};

use super::document::{Document, DocumentId};

/// A ranked search result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub document_id: DocumentId,
    pub title: String,
    pub path: String,
    pub score: f32,
}

impl SearchHit {
    pub fn new(document: &Document, score: f32) -> Self {
        Self {
            document_id: document.id,
            title: document.title.clone(),
            path: document.path.clone(),
            score,
        }
    }
}

/// Search request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Search response with timing information
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub total_hits: usize,
    pub took_ms: u64,
}
