use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::scoring::{rank, ScoreBoard, TokenScores};
use crate::config::{ScoringConfig, SearchConfig};
use crate::index::{SearchIndex, TermTable};
use crate::models::{DocumentId, SearchHit, SearchRequest, SearchResponse};
use crate::tokenizer::{QueryTerm, Tokenizer};
use crate::Result;

/// Query matcher over an immutable index.
///
/// Cloning is cheap and clones share the index, so one `Searcher` can serve
/// many threads.
#[derive(Clone)]
pub struct Searcher {
    index: Arc<SearchIndex>,
    tokenizer: Arc<Tokenizer>,
    scoring: ScoringConfig,
    default_limit: usize,
}

impl Searcher {
    /// Create a searcher, rejecting configurations with unusable weights.
    ///
    /// Queries are stemmed with the algorithm the index was built with,
    /// whatever `config.tokenizer.stemmer` says.
    pub fn new(index: Arc<SearchIndex>, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(index, config))
    }

    /// Searcher with the default configuration
    pub fn with_defaults(index: Arc<SearchIndex>) -> Self {
        Self::assemble(index, SearchConfig::default())
    }

    fn assemble(index: Arc<SearchIndex>, config: SearchConfig) -> Self {
        let mut tokenizer_config = config.tokenizer;
        tokenizer_config.stemmer = index.stemmer();
        Self {
            index,
            tokenizer: Arc::new(Tokenizer::new(&tokenizer_config)),
            scoring: config.scoring,
            default_limit: config.default_limit,
        }
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Every matching document, best first.
    ///
    /// Empty, punctuation-only and all-stopword queries match nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.ranked_hits(query, None)
    }

    /// The `top_k` best matching documents
    pub fn search_top_k(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        self.ranked_hits(query, Some(top_k))
    }

    /// Run a request, applying the default limit when none is given
    pub fn execute(&self, request: &SearchRequest) -> SearchResponse {
        let start = Instant::now();
        let scores = self.score_documents(&request.query);
        let total_hits = scores.len();
        let limit = request.limit.unwrap_or(self.default_limit);
        let results = self.hydrate(rank(scores, Some(limit)));

        SearchResponse {
            query: request.query.clone(),
            results,
            total_hits,
            took_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Raw per-document scores for a query, before ranking
    pub fn score_documents(&self, query: &str) -> HashMap<DocumentId, f32> {
        let terms = self.tokenizer.query_terms(query);
        if terms.is_empty() || self.index.is_empty() {
            return HashMap::new();
        }

        let mut board = ScoreBoard::new();
        for term in &terms {
            board.add(self.score_term(term, self.index.terms(), self.scoring.term_weight));
            board.add(self.score_term(term, self.index.title_terms(), self.scoring.title_boost));
        }

        debug!(query, terms = terms.len(), matches = board.len(), "scored query");
        board.into_scores()
    }

    fn ranked_hits(&self, query: &str, top_k: Option<usize>) -> Vec<SearchHit> {
        if top_k == Some(0) {
            return Vec::new();
        }
        self.hydrate(rank(self.score_documents(query), top_k))
    }

    fn hydrate(&self, ranked: Vec<(DocumentId, f32)>) -> Vec<SearchHit> {
        ranked
            .into_iter()
            .filter_map(|(doc_id, score)| {
                self.index
                    .document(doc_id)
                    .map(|doc| SearchHit::new(doc, score))
            })
            .collect()
    }

    /// Contributions of one query term against one table.
    ///
    /// Every written form of the term is looked up and a document keeps its
    /// best contribution, so extra spellings can only add matches.
    fn score_term(&self, term: &QueryTerm, table: &TermTable, multiplier: f32) -> TokenScores {
        let mut exact = TokenScores::new();
        let mut exact_forms: Vec<&str> = Vec::new();
        for form in term.lookup_forms() {
            if let Some(list) = table.get(form) {
                exact.offer_list(list, multiplier);
                exact_forms.push(form);
            }
        }

        if !self.scoring.partial_matches
            || term.stemmed.chars().count() < self.scoring.min_partial_length
        {
            return exact;
        }

        let partial_multiplier = multiplier * self.scoring.partial_weight;
        let mut partial = TokenScores::new();
        for (token, list) in table.iter() {
            if exact_forms.contains(&token) || !token.contains(term.stemmed.as_str()) {
                continue;
            }
            for posting in list.iter() {
                if !exact.contains(posting.doc) {
                    partial.offer(posting.doc, partial_multiplier * posting.weight);
                }
            }
        }

        exact.absorb(partial);
        exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StemmerAlgorithm;
    use crate::models::{Document, Posting};

    fn two_document_index() -> Arc<SearchIndex> {
        let mut terms = TermTable::new();
        terms.add_posting("install", Posting::new(2));
        Arc::new(
            SearchIndex::from_parts(
                vec![
                    Document::new(1, "Getting Started", "getting_started.html"),
                    Document::new(2, "Installation", "installation.html"),
                ],
                terms,
                TermTable::new(),
            )
            .unwrap(),
        )
    }

    fn plotting_index() -> Arc<SearchIndex> {
        let mut terms = TermTable::new();
        terms.add_posting("plot", Posting::new(0));
        terms.add_posting("plot", Posting::new(1));
        terms.add_posting("swath", Posting::new(0));
        terms.add_posting("snowfal", Posting::new(0));
        terms.add_posting("snowprofil", Posting::new(1));
        let mut title_terms = TermTable::new();
        title_terms.add_posting("plot", Posting::new(0));

        Arc::new(
            SearchIndex::from_parts(
                vec![
                    Document::new(0, "Advanced Plotting", "advanced_plotting.html"),
                    Document::new(1, "Getting Started", "getting_started.html"),
                ],
                terms,
                title_terms,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_unstemmed_fixture_token_matches() {
        let searcher = Searcher::with_defaults(two_document_index());
        let hits = searcher.search("install");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document_id, 2);
        assert_eq!(hits[0].title, "Installation");
        assert_eq!(hits[0].score, 1.0);
    }

    #[test]
    fn test_same_stem_spellings_keep_matching() {
        let searcher = Searcher::with_defaults(two_document_index());
        let single = searcher.score_documents("install");

        for query in ["installation install", "install installation"] {
            let scores = searcher.score_documents(query);
            assert_eq!(scores.get(&2), single.get(&2), "query {:?}", query);
        }
        assert_eq!(searcher.search("installation install")[0].document_id, 2);
    }

    #[test]
    fn test_queries_use_index_stemmer() {
        let mut terms = TermTable::new();
        terms.add_posting("commun", Posting::new(0));
        let index = SearchIndex::from_parts(
            vec![Document::new(0, "Welcome", "index.rst")],
            terms,
            TermTable::new(),
        )
        .unwrap()
        .with_stemmer(StemmerAlgorithm::Porter);
        let searcher = Searcher::with_defaults(Arc::new(index));

        assert_eq!(searcher.search("community").len(), 1);
        assert_eq!(searcher.search("communication").len(), 1);
    }

    #[test]
    fn test_no_match_and_empty_queries() {
        let searcher = Searcher::with_defaults(two_document_index());
        assert!(searcher.search("xyz_not_present").is_empty());
        assert!(searcher.search("").is_empty());
        assert!(searcher.search("the and of").is_empty());
        assert!(searcher.search("!!! ???").is_empty());
    }

    #[test]
    fn test_title_boost_ranks_title_match_first() {
        let searcher = Searcher::with_defaults(plotting_index());
        let hits = searcher.search("plotting");

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document_id, 0);
        assert_eq!(hits[0].score, 3.0);
        assert_eq!(hits[1].document_id, 1);
        assert_eq!(hits[1].score, 1.0);
    }

    #[test]
    fn test_ties_broken_by_document_id() {
        let config = SearchConfig::default().with_title_boost(0.0);
        let searcher = Searcher::new(plotting_index(), config).unwrap();
        let hits = searcher.search("plot");

        assert_eq!(hits[0].score, hits[1].score);
        assert_eq!(hits[0].document_id, 0);
        assert_eq!(hits[1].document_id, 1);
    }

    #[test]
    fn test_repeated_query_words_count_once() {
        let searcher = Searcher::with_defaults(plotting_index());
        let once = searcher.score_documents("swath");
        let twice = searcher.score_documents("swath swath swaths");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_more_matching_words_score_higher() {
        let searcher = Searcher::with_defaults(plotting_index());
        let hits = searcher.search("plot swath");
        assert_eq!(hits[0].document_id, 0);
        assert_eq!(hits[0].score, 4.0);
    }

    #[test]
    fn test_partial_matches() {
        let config = SearchConfig::default().with_partial_matches(true);
        let searcher = Searcher::new(plotting_index(), config).unwrap();

        let scores = searcher.score_documents("snow");
        assert_eq!(scores.get(&0), Some(&0.5));
        assert_eq!(scores.get(&1), Some(&0.5));

        let default_searcher = Searcher::with_defaults(plotting_index());
        assert!(default_searcher.search("snow").is_empty());
    }

    #[test]
    fn test_search_top_k() {
        let searcher = Searcher::with_defaults(plotting_index());
        assert_eq!(searcher.search_top_k("plot", 1).len(), 1);
        assert!(searcher.search_top_k("plot", 0).is_empty());
    }

    #[test]
    fn test_execute_applies_default_limit() {
        let config = SearchConfig::default().with_default_limit(1);
        let searcher = Searcher::new(plotting_index(), config).unwrap();

        let response = searcher.execute(&SearchRequest::new("plot"));
        assert_eq!(response.total_hits, 2);
        assert_eq!(response.results.len(), 1);

        let response = searcher.execute(&SearchRequest::new("plot").with_limit(5));
        assert_eq!(response.results.len(), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SearchConfig::default().with_title_boost(-3.0);
        assert!(Searcher::new(plotting_index(), config).is_err());
    }

    #[test]
    fn test_empty_index_finds_nothing() {
        let searcher = Searcher::with_defaults(Arc::new(SearchIndex::empty()));
        assert!(searcher.search("plot").is_empty());
    }
}
