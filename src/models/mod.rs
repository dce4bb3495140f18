pub mod document;
pub mod search;

pub use document::{Document, DocumentId, Posting, PostingList};
pub use search::{SearchHit, SearchRequest, SearchResponse};
