pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod search;
pub mod sphinx;
pub mod testing;
pub mod tokenizer;

pub use config::{ScoringConfig, SearchConfig, StemmerAlgorithm, StopWordList, TokenizerConfig};
pub use error::{DocsearchError, Result};
pub use index::{IndexBuilder, IndexFormat, IndexStats, SearchIndex, TermTable};
pub use models::*;
pub use search::Searcher;
pub use tokenizer::Tokenizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
