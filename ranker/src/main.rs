use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use linkrank::corpus::load_corpus;
use linkrank::tokenizer::tokenize;
use linkrank::{top_k_sort, PageRankAnalyzer, RankConfig, SearchEngine};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use std::cmp::Ordering;
use std::io::{self, BufWriter, Write};

#[derive(Parser)]
#[command(name = "ranker")]
#[command(about = "Rank crawled pages by link structure and search them by TF-IDF relevance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the page rank of every page as JSON lines, best first
    Rank {
        /// Input path (file or directory of .json/.jsonl page records)
        #[arg(long)]
        input: String,
        /// Only print the best N pages
        #[arg(long)]
        top: Option<usize>,
        #[command(flatten)]
        rank: RankArgs,
    },
    /// Run a query and print the best matches as JSON
    Search {
        #[arg(long)]
        input: String,
        #[arg(long)]
        query: String,
        /// Number of results
        #[arg(long, default_value_t = 10)]
        k: usize,
        #[command(flatten)]
        rank: RankArgs,
    },
}

#[derive(Args)]
struct RankArgs {
    /// Probability of following a link instead of jumping to a random page
    #[arg(long, default_value_t = 0.85)]
    decay: f64,
    /// Stop once no score changes by more than this
    #[arg(long, default_value_t = 1e-4)]
    epsilon: f64,
    /// Maximum number of iterations
    #[arg(long, default_value_t = 100)]
    limit: usize,
}

impl From<RankArgs> for RankConfig {
    fn from(args: RankArgs) -> Self {
        RankConfig { decay: args.decay, epsilon: args.epsilon, limit: args.limit }
    }
}

#[derive(Serialize)]
struct RankLine<'a> {
    uri: &'a str,
    page_rank: f64,
}

/// Orders by rank, breaking ties so that the smaller uri sorts higher.
struct ByRank<'a>(RankLine<'a>);

impl PartialEq for ByRank<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ByRank<'_> {}

impl PartialOrd for ByRank<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByRank<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.page_rank.total_cmp(&other.0.page_rank).then_with(|| other.0.uri.cmp(self.0.uri))
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank { input, top, rank } => rank_pages(&input, top, rank.into()),
        Commands::Search { input, query, k, rank } => search(&input, &query, k, rank.into()),
    }
}

fn rank_pages(input: &str, top: Option<usize>, config: RankConfig) -> Result<()> {
    let corpus = load_corpus(input)?;
    let analyzer = PageRankAnalyzer::new(&corpus.pages, config)?;
    tracing::info!(
        pages = analyzer.len(),
        iterations = analyzer.iterations(),
        converged = analyzer.converged(),
        "computed page ranks"
    );

    let lines = analyzer.iter().map(|(uri, page_rank)| ByRank(RankLine { uri, page_rank }));
    let ranked = top_k_sort(top.unwrap_or(analyzer.len()), lines);

    let mut out = BufWriter::new(io::stdout().lock());
    for ByRank(line) in ranked.into_iter().rev() {
        serde_json::to_writer(&mut out, &line)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn search(input: &str, query: &str, k: usize, config: RankConfig) -> Result<()> {
    let corpus = load_corpus(input)?;
    let engine = SearchEngine::new(&corpus.pages, config)?;
    let terms = tokenize(query);
    let results = engine.search(&terms, k);
    tracing::info!(query, total_hits = results.total_hits, returned = results.hits.len(), "search complete");

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &results)?;
    writeln!(out)?;
    Ok(())
}
