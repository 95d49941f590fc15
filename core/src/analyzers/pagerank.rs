use crate::config::RankConfig;
use crate::dict::{ChainedHashDictionary, Dictionary};
use crate::page::{unique_pages, Page, PageId};
use crate::set::ChainedHashSet;
use crate::Result;
use tracing::debug;

/// Adjacency map: page uri to the uris it links to within the collection.
type Graph = ChainedHashDictionary<PageId, ChainedHashSet<PageId>>;

type Scores = ChainedHashDictionary<PageId, f64>;

/// Authority score of every page, computed once by damped power iteration over the link graph.
#[derive(Debug, Clone)]
pub struct PageRankAnalyzer {
    ranks: Scores,
    out_degrees: ChainedHashDictionary<PageId, usize>,
    iterations: usize,
    converged: bool,
}

struct Outcome {
    ranks: Scores,
    iterations: usize,
    converged: bool,
}

impl PageRankAnalyzer {
    pub fn new(pages: &[Page], config: RankConfig) -> Result<Self> {
        config.validate()?;
        let graph = make_graph(pages);
        debug!(pages = graph.len(), "built link graph");

        let outcome = make_page_ranks(&graph, &config);
        let out_degrees = graph.iter().map(|(uri, links)| (uri.clone(), links.len())).collect();
        Ok(Self {
            ranks: outcome.ranks,
            out_degrees,
            iterations: outcome.iterations,
            converged: outcome.converged,
        })
    }

    /// Score of `uri`, or `0.0` for a page that was not part of the collection.
    pub fn compute_page_rank(&self, uri: &str) -> f64 {
        self.ranks.get(uri).copied().unwrap_or(0.0)
    }

    /// Iterations actually run (`0` when the limit was zero).
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the scores settled within epsilon before the iteration limit.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Number of links kept for `uri` once self, duplicate and external links are dropped.
    pub fn out_degree(&self, uri: &str) -> Option<usize> {
        self.out_degrees.get(uri).ok().copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PageId, f64)> + '_ {
        self.ranks.iter().map(|(uri, rank)| (uri, *rank))
    }
}

fn make_graph(pages: &[Page]) -> Graph {
    let pages = unique_pages(pages);
    let uris: ChainedHashSet<&str> = pages.iter().map(|page| page.uri.as_str()).collect();

    let mut graph = Graph::new();
    for page in pages {
        let mut links: ChainedHashSet<PageId> = ChainedHashSet::new();
        for link in &page.links {
            if *link != page.uri && uris.contains(link.as_str()) {
                links.add(link.clone());
            }
        }
        graph.put(page.uri.clone(), links);
    }
    graph
}

fn make_page_ranks(graph: &Graph, config: &RankConfig) -> Outcome {
    let n = graph.len() as f64;
    let mut previous: Scores = graph.iter().map(|(uri, _)| (uri.clone(), 1.0 / n)).collect();
    if config.limit == 0 {
        return Outcome { ranks: previous, iterations: 0, converged: false };
    }

    let surfers = (1.0 - config.decay) / n;
    for iteration in 1..=config.limit {
        // A page without links hands its mass to every page, itself included.
        let dangling: f64 = graph
            .iter()
            .filter(|(_, links)| links.is_empty())
            .map(|(uri, _)| config.decay * rank_of(&previous, uri) / n)
            .sum();
        let mut computed: Scores =
            graph.iter().map(|(uri, _)| (uri.clone(), surfers + dangling)).collect();

        for (uri, links) in graph {
            if links.is_empty() {
                continue;
            }
            let share = config.decay * rank_of(&previous, uri) / links.len() as f64;
            for target in links {
                if let Ok(score) = computed.get_mut(target) {
                    *score += share;
                }
            }
        }

        let converged = computed
            .iter()
            .all(|(uri, score)| (score - rank_of(&previous, uri)).abs() <= config.epsilon);
        if converged {
            debug!(iteration, "page rank converged");
            return Outcome { ranks: computed, iterations: iteration, converged: true };
        }
        previous = computed;
    }

    debug!(limit = config.limit, "page rank reached its iteration limit");
    Outcome { ranks: previous, iterations: config.limit, converged: false }
}

fn rank_of(scores: &Scores, uri: &str) -> f64 {
    scores.get(uri).copied().unwrap_or(0.0)
}
