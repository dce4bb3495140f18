use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{BTreeSet, HashSet};
use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::{StemmerAlgorithm, StopWordList, TokenizerConfig};

/// English stop words dropped by documentation-site search
pub const SPHINX_STOPWORDS: &[&str] = &[
    "a", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "near", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
    "these", "they", "this", "to", "was", "will", "with",
];

/// A normalized query word with every form it was written in
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryTerm {
    pub stemmed: String,
    /// Distinct unstemmed spellings, in query order
    pub raws: Vec<String>,
}

impl QueryTerm {
    /// Forms to look up: the stem, then each raw spelling that differs from it
    pub fn lookup_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.stemmed.as_str()).chain(
            self.raws
                .iter()
                .map(String::as_str)
                .filter(move |raw| *raw != self.stemmed),
        )
    }
}

enum TokenStemmer {
    Snowball(Stemmer),
    Porter,
}

/// Text tokenizer with stemming and stopword removal
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<TokenStemmer>,
    stopwords: HashSet<String>,
}

impl Tokenizer {
    /// Create a new tokenizer from configuration
    pub fn new(config: &TokenizerConfig) -> Self {
        let stemmer = if config.stem {
            Some(match config.stemmer {
                StemmerAlgorithm::English => TokenStemmer::Snowball(Stemmer::create(Algorithm::English)),
                StemmerAlgorithm::Porter => TokenStemmer::Porter,
            })
        } else {
            None
        };

        let stopwords = if config.remove_stopwords {
            match config.stopword_list {
                StopWordList::Sphinx => SPHINX_STOPWORDS.iter().map(|s| s.to_string()).collect(),
                StopWordList::Iso => get(LANGUAGE::English)
                    .into_iter()
                    .map(|s| s.to_lowercase())
                    .collect(),
                StopWordList::None => HashSet::new(),
            }
        } else {
            HashSet::new()
        };

        Self {
            config: config.clone(),
            stemmer,
            stopwords,
        }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Split into words and apply case folding and the length/stopword filters.
    /// Returns the surviving words before stemming.
    fn filtered_words<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        text.unicode_words()
            .map(|word| {
                if self.config.lowercase {
                    word.to_lowercase()
                } else {
                    word.to_string()
                }
            })
            .filter(|token| {
                let len = token.chars().count();
                len >= self.config.min_token_length
                    && len <= self.config.max_token_length
                    && !self.is_stopword(token)
            })
    }

    fn stem(&self, token: &str) -> String {
        match &self.stemmer {
            Some(TokenStemmer::Snowball(stemmer)) => stemmer.stem(token).into_owned(),
            // the Porter rules are defined over ASCII letters only
            Some(TokenStemmer::Porter) if token.is_ascii() => porter_stemmer::stem(token),
            _ => token.to_string(),
        }
    }

    /// Tokenize text into a vector of terms, in order and with repeats
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.filtered_words(text)
            .map(|token| self.stem(&token))
            .collect()
    }

    /// Distinct terms of a text in sorted order
    pub fn unique_terms(&self, text: &str) -> BTreeSet<String> {
        self.tokenize(text).into_iter().collect()
    }

    /// Normalize a user query into distinct terms, keeping first-seen order.
    ///
    /// Words that stem to the same term share one entry, which keeps every
    /// distinct spelling so each can still be looked up.
    pub fn query_terms(&self, query: &str) -> Vec<QueryTerm> {
        let mut terms: Vec<QueryTerm> = Vec::new();

        for raw in self.filtered_words(query) {
            let stemmed = self.stem(&raw);
            if stemmed.is_empty() {
                continue;
            }
            match terms.iter_mut().find(|t| t.stemmed == stemmed) {
                Some(term) => {
                    if !term.raws.contains(&raw) {
                        term.raws.push(raw);
                    }
                }
                None => terms.push(QueryTerm {
                    stemmed,
                    raws: vec![raw],
                }),
            }
        }

        terms
    }
}
