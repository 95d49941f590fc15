//! Analyses computed once over a page collection and then queried read-only.

pub mod pagerank;
pub mod tfidf;

pub use pagerank::PageRankAnalyzer;
pub use tfidf::{TermVector, TfIdfAnalyzer};
