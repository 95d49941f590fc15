use crate::analyzers::{PageRankAnalyzer, TfIdfAnalyzer};
use crate::config::RankConfig;
use crate::heap::top_k_sort;
use crate::page::{unique_pages, Page, PageId};
use crate::Result;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub uri: PageId,
    /// `relevance * page_rank`
    pub score: f64,
    pub relevance: f64,
    pub page_rank: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    /// Pages with non-zero relevance, before truncation to `k`.
    pub total_hits: usize,
    pub hits: Vec<SearchHit>,
}

/// Orders hits by score, then by uri so that equal scores rank deterministically.
struct Ranked(SearchHit);

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .score
            .total_cmp(&other.0.score)
            .then_with(|| other.0.uri.cmp(&self.0.uri))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

/// Both analyses over one page collection, combined into a ranked search.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    page_ranks: PageRankAnalyzer,
    relevance: TfIdfAnalyzer,
    uris: Vec<PageId>,
}

impl SearchEngine {
    pub fn new(pages: &[Page], config: RankConfig) -> Result<Self> {
        let page_ranks = PageRankAnalyzer::new(pages, config)?;
        let relevance = TfIdfAnalyzer::new(pages);
        let uris = unique_pages(pages).into_iter().map(|page| page.uri.clone()).collect();
        Ok(Self { page_ranks, relevance, uris })
    }

    /// The `k` best pages for `query`, highest score first. Pages the query is irrelevant to
    /// are never returned.
    pub fn search<S: AsRef<str>>(&self, query: &[S], k: usize) -> SearchResults {
        let candidates: Vec<Ranked> = self.uris.iter().filter_map(|uri| {
            let relevance = self.relevance.compute_relevance(query, uri).ok()?;
            if relevance <= 0.0 {
                return None;
            }
            let page_rank = self.page_ranks.compute_page_rank(uri);
            Some(Ranked(SearchHit { uri: uri.clone(), score: relevance * page_rank, relevance, page_rank }))
        }).collect();
        let total_hits = candidates.len();
        let top = top_k_sort(k, candidates);
        let hits: Vec<SearchHit> = top.into_iter().rev().map(|ranked| ranked.0).collect();
        debug!(total_hits, returned = hits.len(), "search complete");
        SearchResults { total_hits, hits }
    }

    pub fn page_rank(&self, uri: &str) -> f64 {
        self.page_ranks.compute_page_rank(uri)
    }

    pub fn relevance<S: AsRef<str>>(&self, query: &[S], uri: &str) -> Result<f64> {
        self.relevance.compute_relevance(query, uri)
    }

    pub fn page_ranks(&self) -> &PageRankAnalyzer {
        &self.page_ranks
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<Page> {
        vec![
            Page::new("hub", ["rust", "go"], "systems programming hub".split(' ')),
            Page::new("rust", ["hub"], "rust systems programming language".split(' ')),
            Page::new("go", ["hub", "rust"], "go programming language".split(' ')),
            Page::new("cooking", Vec::<String>::new(), "pasta recipes".split(' ')),
        ]
    }

    #[test]
    fn ranks_by_relevance_times_page_rank() {
        let engine = SearchEngine::new(&pages(), RankConfig::default()).unwrap();
        let results = engine.search(&["systems"], 10);
        assert_eq!(results.total_hits, 2);
        let uris: Vec<&str> = results.hits.iter().map(|hit| hit.uri.as_str()).collect();
        assert!(uris.contains(&"hub") && uris.contains(&"rust"));
        assert!(results.hits[0].score >= results.hits[1].score);
        for hit in &results.hits {
            assert!((hit.score - hit.relevance * hit.page_rank).abs() < 1e-12);
        }
    }

    #[test]
    fn truncates_to_k() {
        let engine = SearchEngine::new(&pages(), RankConfig::default()).unwrap();
        let results = engine.search(&["language"], 1);
        assert_eq!(results.total_hits, 2);
        assert_eq!(results.hits.len(), 1);
    }

    #[test]
    fn irrelevant_query_has_no_hits() {
        let engine = SearchEngine::new(&pages(), RankConfig::default()).unwrap();
        let results = engine.search(&["quantum"], 10);
        assert_eq!(results.total_hits, 0);
        assert!(results.hits.is_empty());
    }
}
