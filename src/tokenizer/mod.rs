#[allow(clippy::module_inception)]
mod tokenizer;

pub use tokenizer::{QueryTerm, Tokenizer, SPHINX_STOPWORDS};
