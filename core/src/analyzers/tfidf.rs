use crate::dict::{ChainedHashDictionary, Dictionary};
use crate::page::{unique_pages, Page, PageId};
use crate::set::ChainedHashSet;
use crate::{Error, Result};
use tracing::debug;

/// Term to weight.
pub type TermVector = ChainedHashDictionary<String, f64>;

/// Scores how relevant a document is to a query by the cosine similarity of their TF-IDF
/// vectors. IDF scores, document vectors and their norms are computed once, up front.
#[derive(Debug, Clone)]
pub struct TfIdfAnalyzer {
    idf_scores: TermVector,
    document_vectors: ChainedHashDictionary<PageId, TermVector>,
    document_norms: ChainedHashDictionary<PageId, f64>,
}

impl TfIdfAnalyzer {
    pub fn new(pages: &[Page]) -> Self {
        let pages = unique_pages(pages);
        let idf_scores = compute_idf_scores(&pages);

        let mut document_vectors: ChainedHashDictionary<PageId, TermVector> = ChainedHashDictionary::new();
        let mut document_norms: ChainedHashDictionary<PageId, f64> = ChainedHashDictionary::new();
        for page in &pages {
            let mut vector = TermVector::new();
            for (word, tf) in &compute_tf_scores(&page.words) {
                let idf = idf_scores.get(*word).copied().unwrap_or(0.0);
                vector.put(word.to_string(), tf * idf);
            }
            document_norms.put(page.uri.clone(), norm(&vector));
            document_vectors.put(page.uri.clone(), vector);
        }
        debug!(documents = pages.len(), terms = idf_scores.len(), "built tf-idf vectors");

        Self { idf_scores, document_vectors, document_norms }
    }

    /// Cosine similarity between `query` and the document at `uri`.
    ///
    /// Query terms never seen in the corpus weigh zero. When either vector has zero length the
    /// similarity is `0.0`. Fails with `InvalidArgument` if `uri` was not in the collection.
    pub fn compute_relevance<S: AsRef<str>>(&self, query: &[S], uri: &str) -> Result<f64> {
        let document = self
            .document_vectors
            .get(uri)
            .map_err(|_| Error::invalid(format!("unknown document: {uri}")))?;
        let document_norm = self.document_norms.get(uri).copied().unwrap_or(0.0);

        let mut numerator = 0.0;
        let mut query_norm = 0.0;
        let query_tf = compute_tf_scores(query);
        for (word, tf) in &query_tf {
            let query_weight = tf * self.idf(word).unwrap_or(0.0);
            query_norm += query_weight * query_weight;
            numerator += query_weight * document.get(*word).copied().unwrap_or(0.0);
        }

        let denominator = document_norm * query_norm.sqrt();
        if denominator == 0.0 {
            Ok(0.0)
        } else {
            Ok(numerator / denominator)
        }
    }

    /// `ln(documents / documents containing term)`, or `None` for a term outside the corpus.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf_scores.get(term).ok().copied()
    }

    pub fn document_vector(&self, uri: &str) -> Option<&TermVector> {
        self.document_vectors.get(uri).ok()
    }

    pub fn document_norm(&self, uri: &str) -> Option<f64> {
        self.document_norms.get(uri).ok().copied()
    }

    pub fn len(&self) -> usize {
        self.document_vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document_vectors.is_empty()
    }
}

fn compute_idf_scores(pages: &[&Page]) -> TermVector {
    let mut document_frequency: ChainedHashDictionary<&str, usize> = ChainedHashDictionary::new();
    for page in pages {
        let distinct: ChainedHashSet<&str> = page.words.iter().map(String::as_str).collect();
        for word in &distinct {
            match document_frequency.get_mut(*word) {
                Ok(count) => *count += 1,
                Err(_) => {
                    document_frequency.put(*word, 1);
                }
            }
        }
    }

    let total = pages.len() as f64;
    document_frequency
        .iter()
        .map(|(word, count)| (word.to_string(), (total / *count as f64).ln()))
        .collect()
}

/// Each occurrence of a word adds `1 / words.len()` to its weight.
fn compute_tf_scores<S: AsRef<str>>(words: &[S]) -> ChainedHashDictionary<&str, f64> {
    let mut scores: ChainedHashDictionary<&str, f64> = ChainedHashDictionary::new();
    let increment = 1.0 / words.len() as f64;
    for word in words {
        let word = word.as_ref();
        match scores.get_mut(word) {
            Ok(score) => *score += increment,
            Err(_) => {
                scores.put(word, increment);
            }
        }
    }
    scores
}

fn norm(vector: &TermVector) -> f64 {
    vector.iter().map(|(_, weight)| weight * weight).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(uri: &str, text: &str) -> Page {
        Page::new(uri, Vec::<String>::new(), text.split_whitespace())
    }

    fn corpus() -> Vec<Page> {
        vec![
            doc("a", "the quick brown fox"),
            doc("b", "the lazy dog sleeps"),
            doc("c", "the quick dog runs quick"),
        ]
    }

    #[test]
    fn identical_query_scores_one() {
        let analyzer = TfIdfAnalyzer::new(&corpus());
        let query: Vec<&str> = "the quick dog runs quick".split_whitespace().collect();
        let score = analyzer.compute_relevance(&query, "c").unwrap();
        assert!((score - 1.0).abs() < 1e-9, "{score}");
    }

    #[test]
    fn disjoint_query_scores_zero() {
        let analyzer = TfIdfAnalyzer::new(&corpus());
        for uri in ["a", "b", "c"] {
            assert_eq!(analyzer.compute_relevance(&["zebra", "piano"], uri), Ok(0.0));
        }
    }

    #[test]
    fn empty_query_scores_zero() {
        let analyzer = TfIdfAnalyzer::new(&corpus());
        let empty: [&str; 0] = [];
        assert_eq!(analyzer.compute_relevance(&empty, "a"), Ok(0.0));
    }

    #[test]
    fn unknown_document_is_invalid() {
        let analyzer = TfIdfAnalyzer::new(&corpus());
        let err = analyzer.compute_relevance(&["quick"], "nope").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn term_in_every_document_has_zero_idf() {
        let analyzer = TfIdfAnalyzer::new(&corpus());
        assert_eq!(analyzer.idf("the"), Some(0.0));
        assert_eq!(analyzer.compute_relevance(&["the"], "a"), Ok(0.0));
        assert_eq!(analyzer.idf("unseen"), None);
    }

    #[test]
    fn idf_counts_documents_not_occurrences() {
        let analyzer = TfIdfAnalyzer::new(&corpus());
        // "quick" occurs three times but in two of three documents.
        let idf = analyzer.idf("quick").unwrap();
        assert!((idf - (3.0f64 / 2.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn term_frequency_accumulates_per_occurrence() {
        let analyzer = TfIdfAnalyzer::new(&corpus());
        let vector = analyzer.document_vector("c").unwrap();
        let quick = vector.get("quick").copied().unwrap();
        assert!((quick - 2.0 / 5.0 * (1.5f64).ln()).abs() < 1e-12);
        let norm = analyzer.document_norm("c").unwrap();
        assert!(norm > 0.0);
    }

    #[test]
    fn document_without_words_scores_zero() {
        let mut pages = corpus();
        pages.push(doc("blank", ""));
        let analyzer = TfIdfAnalyzer::new(&pages);
        assert_eq!(analyzer.document_norm("blank"), Some(0.0));
        assert_eq!(analyzer.compute_relevance(&["quick"], "blank"), Ok(0.0));
    }
}
